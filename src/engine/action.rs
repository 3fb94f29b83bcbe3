//! Action definitions: the two-stage payload/perform split.

use std::future::Future;
use std::pin::Pin;

use crate::engine::dispatch::Actions;

/// Boxed future for an action result that resolves later.
pub type DeferredResult<S> = Pin<Box<dyn Future<Output = Option<S>> + Send>>;

/// What an action's second stage proposes.
pub enum Outcome<S> {
    /// No state change. Nothing is merged and no re-render is requested.
    Unchanged,
    /// An immediate result, merged into the held state before dispatch
    /// returns. Under a map-shaped state this may be a partial value.
    Update(S),
    /// A result that resolves later. The merge runs when the future
    /// completes; dispatch itself returns immediately.
    Deferred(DeferredResult<S>),
}

impl<S> Outcome<S> {
    /// Wrap a future as a deferred outcome.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Option<S>> + Send + 'static,
    {
        Outcome::Deferred(Box::pin(future))
    }
}

/// A named, user-invocable operation that may read current state and context
/// and propose a new state.
///
/// Constructing a variant binds the call-time payload; [`Action::perform`]
/// is the second stage, invoked with the pending state, the full action set,
/// and the shared context. Dispatch is a match on the variant, so the action
/// table is fixed at the call site rather than discovered dynamically.
///
/// Actions are consumed by value: each dispatch takes its own payload, so
/// repeated calls with different payloads are independent.
pub trait Action<S, C>: Sized + Send + 'static {
    /// Action name for logging and filtering.
    fn name(&self) -> &'static str;

    /// Second stage: decide what should happen given the current state.
    ///
    /// `actions` is the complete, already-constructed action set, so one
    /// action may synchronously invoke others; each nested dispatch runs the
    /// full merge protocol before it returns. A deferred outcome that needs
    /// the action set after an await point should capture a clone of it.
    fn perform(self, state: &S, actions: &Actions<S, Self, C>, context: &C) -> Outcome<S>;
}
