use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub label: Style,
}

impl Theme {
    /// Colors on a terminal, plain text when piped
    pub fn detect() -> Self {
        if console::Term::stdout().is_term() {
            Self {
                header: Style::new().cyan().bold(),
                success: Style::new().green().bold(),
                error: Style::new().red().bold(),
                warn: Style::new().yellow().bold(),
                label: Style::new().white().dimmed(),
            }
        } else {
            Self {
                header: Style::new(),
                success: Style::new(),
                error: Style::new(),
                warn: Style::new(),
                label: Style::new(),
            }
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
