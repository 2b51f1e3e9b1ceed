pub mod json_store;
pub mod plan_store;
pub mod schema;
