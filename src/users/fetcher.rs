use super::{UserRecord, UserSource, UsersQuery, UsersSnapshots};
use crate::config::Config;
use crate::error::QueryError;
use crate::graphql::QueryClient;
use crate::query::QueryResult;
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;

/// Fetches users from the configured GraphQL endpoint.
pub struct GraphQlUserSource {
    client: QueryClient,
    query: UsersQuery,
}

impl GraphQlUserSource {
    pub fn new(client: QueryClient, query: UsersQuery) -> Self {
        Self { client, query }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = QueryClient::new(config.endpoint.clone(), &config.api_key, config.timeout)?;
        Ok(Self::new(client, UsersQuery::new(config.fields)))
    }
}

#[async_trait]
impl UserSource for GraphQlUserSource {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, QueryError> {
        let data = self.client.fetch(&self.query.document()).await?;
        let users = self.query.decode(data)?;
        tracing::info!(count = users.len(), "fetched users");
        Ok(users)
    }

    fn users(self: Arc<Self>) -> UsersSnapshots {
        let query = self.query;
        self.client
            .execute(query.document())
            .map(move |snapshot| snapshot.and_then(|data| query.decode(data)))
            .inspect(|snapshot| {
                if let QueryResult::Succeeded(users) = snapshot {
                    tracing::info!(count = users.len(), "fetched users");
                }
            })
            .boxed()
    }
}
