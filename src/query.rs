use crate::error::QueryError;
use futures::future;
use futures::stream::{self, BoxStream, StreamExt};
use std::future::Future;

/// Snapshot of one query execution.
///
/// Moves `Pending -> Failed` or `Pending -> Succeeded` and never back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult<T> {
    Pending,
    Failed(String),
    Succeeded(T),
}

impl<T> QueryResult<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryResult::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Post-process a successful snapshot; a failing step turns it into `Failed`.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Result<U, QueryError>) -> QueryResult<U> {
        match self {
            QueryResult::Pending => QueryResult::Pending,
            QueryResult::Failed(message) => QueryResult::Failed(message),
            QueryResult::Succeeded(data) => QueryResult::from(f(data)),
        }
    }
}

impl<T> From<Result<T, QueryError>> for QueryResult<T> {
    fn from(result: Result<T, QueryError>) -> Self {
        match result {
            Ok(data) => QueryResult::Succeeded(data),
            Err(e) => QueryResult::Failed(e.to_string()),
        }
    }
}

/// Turn one pending request into its snapshot stream: `Pending`, then exactly
/// one terminal result.
pub fn snapshots<T, F>(request: F) -> BoxStream<'static, QueryResult<T>>
where
    T: Send + 'static,
    F: Future<Output = Result<T, QueryError>> + Send + 'static,
{
    stream::once(future::ready(QueryResult::Pending))
        .chain(stream::once(async move { QueryResult::from(request.await) }))
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshots_success() {
        let results: Vec<QueryResult<u32>> = snapshots(async { Ok(7) }).collect().await;
        assert_eq!(results, vec![QueryResult::Pending, QueryResult::Succeeded(7)]);
    }

    #[tokio::test]
    async fn test_snapshots_failure() {
        let results: Vec<QueryResult<u32>> =
            snapshots(async { Err(QueryError::Transport("Network error".to_string())) })
                .collect()
                .await;
        assert_eq!(
            results,
            vec![
                QueryResult::Pending,
                QueryResult::Failed("Network error".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_pending_is_yielded_before_request_resolves() {
        let (tx, rx) = tokio::sync::oneshot::channel::<u32>();
        let mut stream = snapshots(async move {
            rx.await
                .map_err(|e| QueryError::Transport(e.to_string()))
        });

        assert_eq!(stream.next().await, Some(QueryResult::Pending));
        tx.send(3).unwrap();
        assert_eq!(stream.next().await, Some(QueryResult::Succeeded(3)));
        assert_eq!(stream.next().await, None);
    }

    #[test]
    fn test_and_then() {
        let failed: QueryResult<u32> = QueryResult::Failed("boom".to_string());
        assert_eq!(
            failed.and_then(|n| Ok(n + 1)),
            QueryResult::Failed("boom".to_string())
        );
        assert_eq!(
            QueryResult::Succeeded(1).and_then(|n| Ok(n + 1)),
            QueryResult::Succeeded(2)
        );
        assert!(QueryResult::<u32>::Pending
            .and_then(|n| Ok(n + 1))
            .is_pending());

        let rejected: QueryResult<u32> = QueryResult::Succeeded(1)
            .and_then(|_| Err(QueryError::Decode("missing field".to_string())));
        assert_eq!(
            rejected,
            QueryResult::Failed("invalid response: missing field".to_string())
        );
    }

    #[test]
    fn test_terminal_flags() {
        assert!(!QueryResult::<()>::Pending.is_terminal());
        assert!(QueryResult::<()>::Failed(String::new()).is_terminal());
        assert!(QueryResult::Succeeded(()).is_terminal());
    }
}
