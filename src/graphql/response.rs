use crate::error::QueryError;
use serde::Deserialize;
use serde_json::Value;

/// JSON body of a GraphQL HTTP response.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub path: Vec<Value>,
}

impl GraphQlError {
    /// The message, suffixed with the response path it refers to, if any.
    pub fn describe(&self) -> String {
        if self.path.is_empty() {
            return self.message.clone();
        }

        let path: Vec<String> = self
            .path
            .iter()
            .map(|segment| match segment {
                Value::String(field) => field.clone(),
                other => other.to_string(),
            })
            .collect();
        format!("{} (at {})", self.message, path.join("."))
    }
}

impl GraphQlResponse {
    /// Server-reported errors win over partial data.
    pub fn into_data(self) -> Result<Value, QueryError> {
        if let Some(errors) = self.errors.filter(|errors| !errors.is_empty()) {
            return Err(QueryError::GraphQl {
                messages: errors.iter().map(GraphQlError::describe).collect(),
            });
        }

        match self.data {
            Some(Value::Null) | None => Err(QueryError::Decode(
                "response contained no data".to_string(),
            )),
            Some(data) => Ok(data),
        }
    }
}
