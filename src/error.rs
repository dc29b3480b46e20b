use std::path::PathBuf;
use thiserror::Error;

/// Startup failures. Any of these stops the app before a query is issued.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no GraphQL endpoint configured (set `endpoint` in the config file or USERTUI_ENDPOINT)")]
    MissingEndpoint,

    #[error("no API key configured (set `api_key` in the config file or USERTUI_API_KEY)")]
    MissingApiKey,

    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Query-time failures. The `Display` text is what the view shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("{0}")]
    Transport(String),

    #[error("HTTP error: {status}")]
    Http { status: u16 },

    #[error("{}", .messages.join("; "))]
    GraphQl { messages: Vec<String> },

    #[error("invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        let message = describe_chain(&err);
        if err.is_decode() {
            QueryError::Decode(message)
        } else {
            QueryError::Transport(message)
        }
    }
}

/// `outer: cause: root cause`, skipping causes the outer text already repeats.
fn describe_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_messages_joined() {
        let err = QueryError::GraphQl {
            messages: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(err.to_string(), "first; second");
    }

    #[test]
    fn test_transport_message_verbatim() {
        let err = QueryError::Transport("Network error".to_string());
        assert_eq!(err.to_string(), "Network error");
    }

    #[derive(Debug, Error)]
    #[error("error sending request")]
    struct Outer(#[source] Middle);

    #[derive(Debug, Error)]
    #[error("tcp connect error")]
    struct Middle(#[source] std::io::Error);

    #[test]
    fn test_chain_keeps_root_cause() {
        let err = Outer(Middle(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "Connection refused",
        )));
        assert_eq!(
            describe_chain(&err),
            "error sending request: tcp connect error: Connection refused"
        );
    }

    #[test]
    fn test_chain_skips_repeated_cause() {
        #[derive(Debug, Error)]
        #[error("request failed: tcp connect error")]
        struct Wrapping(#[source] Middle);

        let err = Wrapping(Middle(std::io::Error::other("reset")));
        assert_eq!(describe_chain(&err), "request failed: tcp connect error: reset");
    }

    #[test]
    fn test_http_status_message() {
        let err = QueryError::Http { status: 502 };
        assert_eq!(err.to_string(), "HTTP error: 502");
    }
}
