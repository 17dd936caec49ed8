//! Core types for the memory service client.
//!
//! Request/response DTOs mirror the JSON shapes of the remote REST API. Memory
//! records themselves stay opaque (`serde_json::Value`); only the envelopes this
//! client needs to inspect are typed.

mod dto;
mod entity;
mod telemetry;
mod traits;

pub use dto::*;
pub use entity::*;
pub use telemetry::*;
pub use traits::*;
