//! Action-driven state management with same-turn coherence.
//!
//! Binds an initial state, an action type, and a shared context into a live
//! `{state, actions}` pair: a committed state snapshot plus a dispatcher
//! whose actions can read the latest state, invoke each other, and return an
//! immediate or deferred state update. Every successful update is
//! shallow-merged into the committed state and surfaced to the host through
//! a single re-render request.
//!
//! # Architecture
//!
//! ```text
//! dispatch(action) ──→ perform(pending, actions, context) ──→ Outcome
//!                                                               │
//!             held state ←── merge ←── Update / resolved Deferred
//!                  │
//!                  └──→ observer callback + re-render request
//! ```
//!
//! Actions dispatched in sequence within one synchronous turn read a shared
//! pending-state reference, so each observes the cumulative effect of the
//! calls before it even though nothing has been committed to the host yet.
//! Deferred results merge when they resolve, in resolution order.
//!
//! The [`bundle`] module wraps an engine in a provider/consumer pair backed
//! by an ambient scope stack, so multiple consumers can share one engine
//! instance without parameter threading.

pub mod bundle;
pub mod engine;

pub use bundle::{AmbientChannel, Bundle, Provider, ScopeId};
pub use engine::{
    Action, ActionError, Actions, Dispatched, Engine, EngineBuilder, Merge, NullScheduler,
    Outcome, RenderScheduler, UpdateObserver,
};
