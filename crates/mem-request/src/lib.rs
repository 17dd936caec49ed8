//! Side-effect-free request planning shared by the blocking and async clients.
//!
//! Both clients reconcile identifiers, build payloads and pick endpoints through
//! this crate only, so the two execution modes cannot drift apart.

mod payload;
pub mod plan;
mod query;
mod reconcile;
pub mod routes;

pub use mem_types::{ClientError, Params, Result};
pub use payload::message_payload;
pub use plan::{ApiRequest, Method};
pub use query::query_pairs;
pub use reconcile::{strip_nulls, Identifiers};
