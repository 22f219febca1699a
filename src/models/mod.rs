//! Wire and pipeline data models

pub mod request;
pub mod response;

pub use request::ExecutionRequest;
pub use response::{ExecuteResponse, ResponsePayload};
