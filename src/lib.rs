pub mod api;
pub mod error;
pub mod models;
pub mod reports;
pub mod state;
pub mod store;
