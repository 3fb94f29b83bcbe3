//! Shared-state bundle: one engine published to many consumers.
//!
//! A [`Bundle`] owns an ambient channel. Mounting a provider instantiates
//! exactly one engine and publishes it for the lifetime of the returned
//! guard; any consumer holding the bundle reads the nearest mounted engine
//! without parameter threading. Dropping the guard unpublishes the engine
//! and closes it, making in-flight deferred merges inert.

mod channel;
mod provider;

pub use channel::{AmbientChannel, ScopeId};
pub use provider::{Bundle, Provider};
