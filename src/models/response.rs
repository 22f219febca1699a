//! Execution response model
//!
//! Every request produces exactly one response of this shape:
//!
//! ```json
//! {"status": 1, "response": [{"x": 1}]}
//! {"status": 1, "response": 0}
//! {"status": 0, "response": "no such table: missing"}
//! ```
//!
//! `status` is 1 for handled success and 0 for handled failure. The
//! payload is a row array for statements that return data, a 0/1
//! affected-row indicator for writes, or an error message string.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub status: u8,
    pub response: ResponsePayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    /// Ordered column→value mappings, one per result row.
    Rows(Vec<Map<String, Value>>),
    /// 0 when the write modified no rows, 1 otherwise.
    Affected(u8),
    /// Human-readable failure detail.
    Message(String),
}

impl ExecuteResponse {
    /// Successful response for a statement that returned rows.
    pub fn rows(rows: Vec<Map<String, Value>>) -> Self {
        Self {
            status: 1,
            response: ResponsePayload::Rows(rows),
        }
    }

    /// Successful response for a write statement.
    pub fn affected(count: u64) -> Self {
        Self {
            status: 1,
            response: ResponsePayload::Affected(u8::from(count > 0)),
        }
    }

    /// Handled-failure response with an explanatory message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            response: ResponsePayload::Message(message.into()),
        }
    }
}
