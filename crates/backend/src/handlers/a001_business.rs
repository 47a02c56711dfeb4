use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use contracts::domain::a001_business::Dataset;
use contracts::projections::p900_business_detail::BusinessDetailView;
use contracts::projections::p901_business_list::{self, ListPage, ListQuery};
use contracts::shared::category_policy::CategoryPolicyTable;
use contracts::shared::routes::{canonical_category_path, category_alias, record_category_slug};

use crate::shared::data::{dataset, policy};

/// Категория в навигации сайта
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub slug: String,
    pub alias: String,
    pub path: String,
    pub count: usize,
}

fn loaded_dataset() -> Result<&'static Dataset, StatusCode> {
    dataset::get_dataset().ok_or_else(|| {
        tracing::error!("Dataset requested before initialization");
        StatusCode::SERVICE_UNAVAILABLE
    })
}

/// GET /api/businesses
pub async fn list(Query(query): Query<ListQuery>) -> Result<Json<ListPage>, StatusCode> {
    let dataset = loaded_dataset()?;
    Ok(Json(p901_business_list::list(dataset, &query)))
}

/// GET /api/businesses/:slug
pub async fn get_by_slug(Path(slug): Path<String>) -> Result<Json<BusinessDetailView>, StatusCode> {
    let dataset = loaded_dataset()?;
    match detail_view(dataset, policy::get_policy(), &slug) {
        Some(view) => Ok(Json(view)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// GET /api/categories
pub async fn categories() -> Result<Json<Vec<CategorySummary>>, StatusCode> {
    let dataset = loaded_dataset()?;
    Ok(Json(category_summaries(dataset, policy::get_policy())))
}

pub fn detail_view(dataset: &Dataset, table: &CategoryPolicyTable, slug: &str) -> Option<BusinessDetailView> {
    let record = dataset.find_by_slug(slug)?;
    Some(BusinessDetailView::build(record, table))
}

pub fn category_summaries(dataset: &Dataset, table: &CategoryPolicyTable) -> Vec<CategorySummary> {
    dataset
        .primary_categories()
        .into_iter()
        .map(|slug| {
            let count = dataset
                .iter()
                .filter(|r| record_category_slug(r) == slug)
                .count();
            CategorySummary {
                alias: category_alias(&slug, table),
                path: canonical_category_path(&slug, table),
                slug,
                count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::FeatureKey;

    const FIXTURE: &str = r#"[
        {"name": "Al Angham", "slug": "al-angham", "categories": ["Restaurants"],
         "about": "Omani fine dining", "cuisines": ["Omani"], "rating_overall": 4.7},
        {"name": "Muscat Jazz Night", "categories": ["Events"], "fact_venue": "Royal Opera House",
         "cuisines": ["Omani"]},
        {"name": "Chedi Spa", "categories": ["Spas"]}
    ]"#;

    fn install() -> &'static Dataset {
        dataset::install_for_tests(Dataset::from_json(FIXTURE).unwrap())
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        install();
        let Json(view) = get_by_slug(Path("al-angham".to_string())).await.unwrap();
        assert_eq!(view.name, "Al Angham");
        assert!(view.visibility.is_visible(FeatureKey::Cuisines));
        assert!(view.visibility.is_visible(FeatureKey::About));
    }

    #[tokio::test]
    async fn test_get_by_slug_not_found() {
        install();
        let err = get_by_slug(Path("nope".to_string())).await.unwrap_err();
        assert_eq!(err, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_event_hides_cuisines() {
        install();
        let Json(view) = get_by_slug(Path("muscat-jazz-night".to_string())).await.unwrap();
        assert!(!view.visibility.is_visible(FeatureKey::Cuisines));
        assert!(view.facts.iter().any(|f| f.label == "Venue"));
    }

    #[tokio::test]
    async fn test_list() {
        install();
        let query = ListQuery {
            category: Some("spas".to_string()),
            ..Default::default()
        };
        let Json(page) = list(Query(query)).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].slug, "chedi-spa");
    }

    #[tokio::test]
    async fn test_categories() {
        install();
        let Json(summaries) = categories().await.unwrap();
        let aliases: Vec<&str> = summaries.iter().map(|c| c.alias.as_str()).collect();
        assert_eq!(aliases, vec!["events-planning", "places-to-eat", "spas"]);
        assert_eq!(summaries[1].path, "/places-to-eat/");
        assert_eq!(summaries[1].count, 1);
    }
}
