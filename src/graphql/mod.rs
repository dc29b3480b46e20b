//! Minimal GraphQL-over-HTTP client.
//!
//! One `POST` per execution, JSON in and out. Responses are validated here so
//! callers only ever see decoded `data` or a [`QueryError`](crate::error::QueryError).

pub mod client;
pub mod request;
pub mod response;

pub use client::QueryClient;
pub use request::{GraphQlRequest, QueryDocument};
pub use response::{GraphQlError, GraphQlResponse};
