use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Suppress decorative output. First call wins; `BANK_REVIEWS_QUIET` still applies.
pub fn set_quiet(quiet: bool) {
    let _ = QUIET.set(quiet || quiet_from_env());
}

pub fn is_quiet() -> bool {
    *QUIET.get_or_init(quiet_from_env)
}

fn quiet_from_env() -> bool {
    std::env::var("BANK_REVIEWS_QUIET")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
