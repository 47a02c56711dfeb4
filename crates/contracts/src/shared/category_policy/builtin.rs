use std::collections::BTreeMap;

use super::{CategoryPolicy, CategoryPolicyTable, FactField};
use crate::enums::FeatureKey;

const NON_FOOD_HIDDEN: &[FeatureKey] = &[FeatureKey::Cuisines, FeatureKey::Meals];

fn policy(
    alias: &str,
    facts: &[(&str, Option<&str>)],
    hide: &[FeatureKey],
    sections: &[(FeatureKey, bool)],
    required: &[&str],
) -> CategoryPolicy {
    CategoryPolicy {
        sections: sections
            .iter()
            .map(|(key, allowed)| (key.code().to_string(), *allowed))
            .collect(),
        hide_sections: hide.to_vec(),
        facts: facts
            .iter()
            .map(|(label, key)| match key {
                Some(key) => FactField::keyed(label, key),
                None => FactField::composite(label),
            })
            .collect(),
        route_alias: Some(alias.to_string()),
        required_fields: required.iter().map(|s| s.to_string()).collect(),
    }
}

/// Набор фактов для большинства заведений с адресом
const VENUE_FACTS: &[(&str, Option<&str>)] = &[
    ("Neighbourhood", Some("neighborhood")),
    ("City / Country", None),
    ("Price Range", Some("price_range")),
    ("Website", None),
    ("Phone", None),
];

/// Выездные сервисы: район не важен
const SERVICE_FACTS: &[(&str, Option<&str>)] = &[
    ("City / Country", None),
    ("Price Range", Some("price_range")),
    ("Website", None),
    ("Phone", None),
];

const NO_EVENT_FACTS: &[(FeatureKey, bool)] = &[(FeatureKey::EventFacts, false)];

pub(super) fn build() -> CategoryPolicyTable {
    let mut categories = BTreeMap::new();

    categories.insert(
        "hotels".to_string(),
        policy(
            "places-to-stay",
            VENUE_FACTS,
            NON_FOOD_HIDDEN,
            NO_EVENT_FACTS,
            &["actions.website", "actions.phone", "images.hero", "location.address"],
        ),
    );
    categories.insert(
        "restaurants".to_string(),
        policy(
            "places-to-eat",
            VENUE_FACTS,
            &[],
            NO_EVENT_FACTS,
            &["actions.phone", "images.hero", "location.address", "hours"],
        ),
    );
    categories.insert(
        "malls".to_string(),
        policy(
            "shopping-malls",
            &[
                ("Neighbourhood", Some("neighborhood")),
                ("City / Country", None),
                ("Website", None),
                ("Phone", None),
            ],
            NON_FOOD_HIDDEN,
            NO_EVENT_FACTS,
            &["actions.website", "images.hero", "location.address", "hours"],
        ),
    );
    for slug in ["schools", "spas", "clinics"] {
        categories.insert(
            slug.to_string(),
            policy(slug, VENUE_FACTS, NON_FOOD_HIDDEN, NO_EVENT_FACTS, &[]),
        );
    }
    for slug in [
        "car-repair-garages",
        "home-maintenance-and-repair",
        "moving-and-storage",
    ] {
        categories.insert(
            slug.to_string(),
            policy(
                slug,
                SERVICE_FACTS,
                NON_FOOD_HIDDEN,
                &[(FeatureKey::EventFacts, false), (FeatureKey::Amenities, false)],
                &[],
            ),
        );
    }
    categories.insert(
        "catering-services".to_string(),
        policy(
            "catering-services",
            SERVICE_FACTS,
            &[],
            NO_EVENT_FACTS,
            &[],
        ),
    );
    categories.insert(
        "events".to_string(),
        policy(
            "events-planning",
            &[
                ("Venue", Some("fact_venue")),
                ("Date", Some("fact_date")),
                ("Time", Some("fact_time")),
                ("Ticket Price", Some("fact_ticket_price")),
                ("City / Country", None),
                ("Website", None),
                ("Phone", None),
            ],
            NON_FOOD_HIDDEN,
            &[(FeatureKey::Hours, false), (FeatureKey::Amenities, false)],
            &[],
        ),
    );
    categories.insert(
        "events-planning".to_string(),
        policy(
            "events-planning",
            SERVICE_FACTS,
            NON_FOOD_HIDDEN,
            &[],
            &[],
        ),
    );

    CategoryPolicyTable { categories }
}
