pub mod p900_business_detail;
pub mod p901_business_list;
pub mod p902_missing_fields;
