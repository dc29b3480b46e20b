pub mod fetcher;

use crate::error::QueryError;
use crate::graphql::QueryDocument;
use crate::lifecycle::MountId;
use crate::query::{self, QueryResult};
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// One user as returned by the server. `id` is the list identity key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl UserRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            phone: None,
            website: None,
        }
    }
}

/// Which user fields the query selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FieldSet {
    /// `getUsers { id name }`
    #[default]
    Basic,
    /// `users { id name email phone website }`
    Full,
}

const BASIC_DOCUMENT: QueryDocument = QueryDocument::named(
    "getUsers",
    "query getUsers {\n  getUsers {\n    id\n    name\n  }\n}",
);

const FULL_DOCUMENT: QueryDocument = QueryDocument::named(
    "getUsers",
    "query getUsers {\n  users {\n    id\n    name\n    email\n    phone\n    website\n  }\n}",
);

/// The users query for one field set, and how to read its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsersQuery {
    fields: FieldSet,
}

impl UsersQuery {
    pub fn new(fields: FieldSet) -> Self {
        Self { fields }
    }

    pub fn document(&self) -> QueryDocument {
        match self.fields {
            FieldSet::Basic => BASIC_DOCUMENT,
            FieldSet::Full => FULL_DOCUMENT,
        }
    }

    pub fn root_field(&self) -> &'static str {
        match self.fields {
            FieldSet::Basic => "getUsers",
            FieldSet::Full => "users",
        }
    }

    /// Pull the user list out of a `data` object, keeping server order.
    pub fn decode(&self, mut data: Value) -> Result<Vec<UserRecord>, QueryError> {
        let root = self.root_field();
        let users = match data.get_mut(root).map(Value::take) {
            Some(Value::Null) | None => {
                return Err(QueryError::Decode(format!(
                    "missing field `{}` in response data",
                    root
                )))
            }
            Some(users) => users,
        };

        serde_json::from_value(users)
            .map_err(|e| QueryError::Decode(format!("bad `{}` payload: {}", root, e)))
    }
}

/// Result snapshot routed back to the view that asked for it.
#[derive(Debug, Clone)]
pub struct UsersMessage {
    pub mount: MountId,
    pub result: QueryResult<Vec<UserRecord>>,
}

pub type UsersSnapshots = BoxStream<'static, QueryResult<Vec<UserRecord>>>;

#[async_trait]
pub trait UserSource: Send + Sync + 'static {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, QueryError>;

    /// Snapshot stream for one execution: `Pending`, then the terminal result.
    fn users(self: Arc<Self>) -> UsersSnapshots {
        query::snapshots(async move { self.fetch_users().await })
    }
}
