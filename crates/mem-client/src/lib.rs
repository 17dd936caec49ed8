//! Clients for the hosted memory service.
//!
//! [`MemoryClient`] blocks the calling thread for each round trip;
//! [`AsyncMemoryClient`] exposes the same operations as futures. Both plan
//! requests through `mem-request`, so identifier handling and request shapes
//! are identical between them.
//!
//! ```no_run
//! use mem_client::{ClientConfig, MemoryClient, MemoryOptions};
//!
//! let client = MemoryClient::new(ClientConfig::from_env())?;
//! client.add("I'm vegetarian", MemoryOptions::new().user_id("alex"))?;
//! let hits = client.search("what do I eat?", Default::default(), MemoryOptions::new().user_id("alex"))?;
//! # Ok::<(), mem_client::ClientError>(())
//! ```

mod async_client;
mod blocking;
mod config;
pub mod identity;
mod session;

pub use async_client::AsyncMemoryClient;
pub use blocking::MemoryClient;
pub use config::{ClientConfig, API_KEY_ENV, DEFAULT_HOST, DEFAULT_TIMEOUT};
pub use mem_request::Identifiers;
pub use mem_types::{
    ApiVersion, BatchDelete, BatchUpdate, ClientError, Entity, EntityList, Message,
    MessageResponse, Messages, MemoryOptions, Params, ProjectUpdate, Result,
};
pub use session::{Session, USER_ID_HEADER};
