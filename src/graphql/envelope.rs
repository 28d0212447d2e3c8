//! `{ data, error }` response envelopes shared by the GraphQL APIs.
//!
//! Expected failures (not found, not authorized, rule violations) are
//! returned inside the envelope instead of as GraphQL errors.

use crate::error::CmsError;
use async_graphql::{Json, SimpleObject};
use serde_json::Value;

pub const SECURITY_NOT_AUTHORIZED: &str = "SECURITY_NOT_AUTHORIZED";
pub const NOT_AUTHORIZED_MESSAGE: &str = "Not authorized!";

#[derive(SimpleObject, Debug, Clone, Default, PartialEq)]
#[graphql(name = "I18NError")]
pub struct ErrorObject {
    pub code: Option<String>,
    pub message: Option<String>,
    pub data: Option<Json<Value>>,
}

impl ErrorObject {
    pub fn new(code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        if !data.is_null() {
            self.data = Some(Json(data));
        }
        self
    }

    pub fn not_authorized() -> Self {
        Self::new(Some(SECURITY_NOT_AUTHORIZED.to_string()), NOT_AUTHORIZED_MESSAGE)
    }
}

impl From<&CmsError> for ErrorObject {
    fn from(error: &CmsError) -> Self {
        let object = Self::new(Some(error.code()), error.to_string());
        match error {
            CmsError::Storage(storage) => Self {
                message: Some(storage.message.clone()),
                ..object
            }
            .with_data(storage.data.clone()),
            _ => object,
        }
    }
}

#[derive(SimpleObject, Debug, Clone, Default, PartialEq)]
#[graphql(name = "I18NBooleanResponse")]
pub struct BooleanResponse {
    pub data: Option<bool>,
    pub error: Option<ErrorObject>,
}

impl BooleanResponse {
    pub fn ok(value: bool) -> Self {
        Self {
            data: Some(value),
            error: None,
        }
    }

    pub fn failed(error: ErrorObject) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }
}
