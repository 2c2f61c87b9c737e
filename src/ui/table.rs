use crate::storage::{schema, SchemaReport};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct ObjectRow {
    #[tabled(rename = "Object")]
    name: &'static str,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Present")]
    present: &'static str,
}

pub fn metrics_table(metrics: &[(&str, String)]) -> String {
    if metrics.is_empty() {
        return String::new();
    }
    let rows: Vec<MetricRow> = metrics
        .iter()
        .map(|(metric, value)| MetricRow {
            metric: metric.to_string(),
            value: value.clone(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// One row per expected table and index, marking which ones exist
pub fn schema_table(report: &SchemaReport) -> String {
    let tables = schema::TABLES.iter().map(|&name| ObjectRow {
        name,
        kind: "table",
        present: yes_no(report.tables.iter().any(|t| t == name)),
    });
    let indexes = schema::INDEXES.iter().map(|&name| ObjectRow {
        name,
        kind: "index",
        present: yes_no(report.indexes.iter().any(|i| i == name)),
    });
    Table::new(tables.chain(indexes)).with(Style::rounded()).to_string()
}

fn yes_no(present: bool) -> &'static str {
    if present { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(indexes: &[&str]) -> SchemaReport {
        SchemaReport {
            tables: vec!["banks".into(), "reviews".into()],
            indexes: indexes.iter().map(|s| s.to_string()).collect(),
            banks: 0,
            reviews: 0,
            foreign_keys: true,
        }
    }

    #[test]
    fn test_schema_table_lists_every_object() {
        let rendered = schema_table(&report(schema::INDEXES));
        for name in schema::TABLES.iter().chain(schema::INDEXES) {
            assert!(rendered.contains(name));
        }
        assert!(!rendered.contains(" no "));
    }

    #[test]
    fn test_schema_table_marks_missing_index() {
        let rendered = schema_table(&report(&["idx_reviews_bank_id"]));
        assert!(rendered.contains(" no "));
    }

    #[test]
    fn test_empty_metrics() {
        assert!(metrics_table(&[]).is_empty());
        let rendered = metrics_table(&[("Banks", "3".to_string())]);
        assert!(rendered.contains("Banks"));
        assert!(rendered.contains('3'));
    }
}
