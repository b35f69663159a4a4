//! Completion endpoint implementations for ctxroute.
//!
//! All providers implement the `ctxroute_core::Provider` trait.
//! [`build_from_config`] picks exactly one of them from configuration.

mod http;
pub mod openai_compat;
pub mod responses;
pub mod select;

pub use openai_compat::OpenAiCompatProvider;
pub use responses::ResponsesProvider;
pub use select::{build_from_config, build_with_key};
