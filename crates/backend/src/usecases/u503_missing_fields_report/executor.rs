use contracts::domain::a001_business::Dataset;
use contracts::projections::p902_missing_fields::{missing_fields, MissingField};
use contracts::shared::category_policy::CategoryPolicyTable;

/// Executor для UseCase проверки обязательных полей
pub struct MissingFieldsExecutor<'a> {
    table: &'a CategoryPolicyTable,
}

impl<'a> MissingFieldsExecutor<'a> {
    pub fn new(table: &'a CategoryPolicyTable) -> Self {
        Self { table }
    }

    pub fn run(&self, dataset: &Dataset) -> Vec<MissingField> {
        let report = missing_fields(dataset, self.table);
        if report.is_empty() {
            tracing::info!("QA: all required fields present ({} records)", dataset.len());
        } else {
            tracing::warn!("QA: {} required field(s) missing", report.len());
        }
        report
    }
}

pub fn format_report(report: &[MissingField]) -> String {
    if report.is_empty() {
        return "All good: no category-required fields missing.".to_string();
    }
    let mut out = String::from("Missing fields (friendly):");
    for item in report {
        out.push_str(&format!("\n - {}: {}", item.slug, item.field));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_report() {
        assert_eq!(format_report(&[]), "All good: no category-required fields missing.");

        let report = vec![
            MissingField {
                slug: "al-bustan".to_string(),
                field: "actions.phone".to_string(),
            },
            MissingField {
                slug: "kargeen".to_string(),
                field: "hours".to_string(),
            },
        ];
        assert_eq!(
            format_report(&report),
            "Missing fields (friendly):\n - al-bustan: actions.phone\n - kargeen: hours"
        );
    }

    #[test]
    fn test_run() {
        let dataset = Dataset::from_json(r#"[{"name": "Avenues Mall", "categories": ["Malls"]}]"#).unwrap();
        let report = MissingFieldsExecutor::new(CategoryPolicyTable::builtin()).run(&dataset);
        let fields: Vec<&str> = report.iter().map(|m| m.field.as_str()).collect();
        assert_eq!(fields, vec!["actions.website", "images.hero", "location.address", "hours"]);
        assert!(report.iter().all(|m| m.slug == "avenues-mall"));
    }
}
