pub mod category_policy;
pub mod routes;
pub mod slug;
pub mod text;
