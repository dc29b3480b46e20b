use serde::Serialize;
use serde_json::{Map, Value};

/// An immutable GraphQL document plus the operation it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDocument {
    source: &'static str,
    operation_name: Option<&'static str>,
}

impl QueryDocument {
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            operation_name: None,
        }
    }

    pub const fn named(operation_name: &'static str, source: &'static str) -> Self {
        Self {
            source,
            operation_name: Some(operation_name),
        }
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn operation_name(&self) -> Option<&'static str> {
        self.operation_name
    }
}

/// JSON body of a GraphQL HTTP request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<&'a str>,
    pub variables: Map<String, Value>,
}

impl<'a> From<&'a QueryDocument> for GraphQlRequest<'a> {
    fn from(document: &'a QueryDocument) -> Self {
        Self {
            query: document.source,
            operation_name: document.operation_name,
            variables: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_named_request_body() {
        let document = QueryDocument::named("getUsers", "query getUsers { getUsers { id name } }");
        let body = serde_json::to_value(GraphQlRequest::from(&document)).unwrap();
        assert_eq!(
            body,
            json!({
                "query": "query getUsers { getUsers { id name } }",
                "operationName": "getUsers",
                "variables": {}
            })
        );
    }

    #[test]
    fn test_anonymous_request_omits_operation_name() {
        let document = QueryDocument::new("{ users { id } }");
        let body = serde_json::to_value(GraphQlRequest::from(&document)).unwrap();
        assert!(body.get("operationName").is_none());
        assert_eq!(body["query"], "{ users { id } }");
    }
}
