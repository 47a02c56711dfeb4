pub mod u501_generate_sitemap;
pub mod u502_generate_route_stubs;
pub mod u503_missing_fields_report;
pub mod u504_normalize_dataset;
pub mod u505_build_best_things;
pub mod u506_import_places_csv;
