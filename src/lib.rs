pub mod api;
pub mod extremes;
pub mod models;
pub mod pipeline;
pub mod store;
