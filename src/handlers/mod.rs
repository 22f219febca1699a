//! HTTP request handlers

pub mod execute;

pub use execute::execute_query;
