//! HTTP access to the study-group backend.

mod client;
pub mod response;

pub use client::HttpGroupRepository;
pub use response::{classify, ApiOutcome};
