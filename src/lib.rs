pub mod app;
pub mod config;
pub mod error;
pub mod graphql;
pub mod lifecycle;
pub mod logging;
pub mod query;
pub mod ui;
pub mod users;
