//! # ctxroute Core
//!
//! Domain types, traits, and error definitions for the ctxroute context
//! router. This crate performs **no I/O**; it defines the model that the
//! router, provider, and journal crates work against.
//!
//! ## Design Philosophy
//!
//! Everything a routing decision needs arrives in a [`RouteInput`].
//! Nothing is held in process-wide state.
//!
//! The completion endpoint is a trait ([`Provider`]) so that the concrete
//! wire shape is picked by configuration and tests can script responses.

pub mod catalog;
pub mod error;
pub mod message;
pub mod provider;
pub mod route;

mod serde_helpers;

// Re-export key types at crate root for ergonomics
pub use catalog::{Catalog, DocItem, SessionState, SkillItem};
pub use error::{ProviderError, RouteError};
pub use message::{ConversationTurn, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use route::{RouteInput, RouteResult, RouteStatus};
