//! The engine core: shared state cells, dispatch, and the merge protocol.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::engine::action::{Action, Outcome};
use crate::engine::error::ActionError;
use crate::engine::merge::Merge;
use crate::engine::render::{NullScheduler, RenderScheduler};

/// Observer invoked after every successful merge with `(previous, next)`.
pub type UpdateObserver<S> = Box<dyn Fn(&S, &S) + Send + Sync>;

struct EngineShared<S, C> {
    /// Last committed state; the value hosts render from.
    held: RwLock<S>,
    /// Most recent raw action result within the current turn. Actions read
    /// this, not the held state, so sequential dispatches compose.
    pending: Mutex<S>,
    context: C,
    observer: Option<UpdateObserver<S>>,
    scheduler: Box<dyn RenderScheduler>,
    runtime: Handle,
    closed: AtomicBool,
}

impl<S, C> EngineShared<S, C>
where
    S: Merge,
{
    /// The merge/update step, shared by the sync and deferred paths.
    ///
    /// Pending takes the raw result; the commit merges onto the held state,
    /// not the pending snapshot, so a stale concurrent write cannot be
    /// resurrected through the merge base.
    fn apply(&self, name: &'static str, result: &S) {
        if self.closed.load(Ordering::SeqCst) {
            tracing::trace!(action = name, "merge dropped: engine closed");
            return;
        }

        *self.pending.lock() = result.clone();

        let (previous, next) = {
            let mut held = self.held.write();
            let previous = held.clone();
            let next = previous.merge(result);
            *held = next.clone();
            (previous, next)
        };
        tracing::debug!(action = name, "state committed");

        if let Some(observer) = &self.observer {
            observer(&previous, &next);
        }
        self.scheduler.request_render();
    }
}

/// The action set: a cheaply cloneable dispatcher over one engine instance.
///
/// Clones share the same state cells, so an action set handed to a deferred
/// stage keeps dispatching into the same engine.
pub struct Actions<S, A, C> {
    shared: Arc<EngineShared<S, C>>,
    _actions: PhantomData<fn(A)>,
}

impl<S, A, C> Clone for Actions<S, A, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            _actions: PhantomData,
        }
    }
}

impl<S, A, C> Actions<S, A, C>
where
    S: Merge + Send + Sync + 'static,
    A: Action<S, C>,
    C: Send + Sync + 'static,
{
    /// Invoke an action.
    ///
    /// The action's second stage runs with a snapshot of the pending state,
    /// this action set, and the shared context. An immediate result merges
    /// before this call returns; a deferred result is spawned onto the
    /// runtime and merges when it resolves, in resolution order. When two
    /// in-flight deferred actions mutate overlapping keys with full-value
    /// results, the later resolution overwrites the earlier effect; callers
    /// that care must serialize those actions themselves.
    ///
    /// A panic inside a synchronous second stage propagates to this caller.
    /// A panic inside a deferred stage is observable only through
    /// [`Dispatched::settled`]; nothing is merged for it either way.
    pub fn dispatch(&self, action: A) -> Dispatched<S> {
        let name = action.name();
        tracing::trace!(action = name, "dispatch");

        let pending = self.shared.pending.lock().clone();
        match action.perform(&pending, self, &self.shared.context) {
            Outcome::Unchanged => Dispatched::settled_now(None),
            Outcome::Update(result) => {
                self.shared.apply(name, &result);
                Dispatched::settled_now(Some(result))
            }
            Outcome::Deferred(future) => {
                let shared = Arc::clone(&self.shared);
                let handle = self.shared.runtime.spawn(async move {
                    let result = future.await;
                    if let Some(result) = &result {
                        shared.apply(name, result);
                    }
                    result
                });
                Dispatched::in_flight(handle)
            }
        }
    }
}

enum DispatchedInner<S> {
    Settled(Option<S>),
    Pending(JoinHandle<Option<S>>),
}

/// Handle returned by [`Actions::dispatch`].
///
/// Dispatch is fire-and-forget: dropping this handle never cancels the
/// deferred stage or its merge. Callers that want to sequence on completion
/// await [`settled`](Dispatched::settled) instead.
pub struct Dispatched<S> {
    inner: DispatchedInner<S>,
}

impl<S> Dispatched<S> {
    fn settled_now(result: Option<S>) -> Self {
        Self {
            inner: DispatchedInner::Settled(result),
        }
    }

    fn in_flight(handle: JoinHandle<Option<S>>) -> Self {
        Self {
            inner: DispatchedInner::Pending(handle),
        }
    }

    /// Whether the result was produced synchronously.
    pub fn is_settled(&self) -> bool {
        matches!(self.inner, DispatchedInner::Settled(_))
    }

    /// Wait for the action's raw result.
    ///
    /// `Ok(None)` means the action proposed no state change. Any merge the
    /// result triggered has already been applied (or dropped, if the engine
    /// closed first) by the time this returns.
    pub async fn settled(self) -> Result<Option<S>, ActionError> {
        match self.inner {
            DispatchedInner::Settled(result) => Ok(result),
            DispatchedInner::Pending(handle) => handle.await.map_err(ActionError::from),
        }
    }
}

/// A live `{state, actions}` pair.
///
/// Clones share one instance: reading [`state`](Engine::state) on any clone
/// observes the merges dispatched through any other.
pub struct Engine<S, A, C> {
    actions: Actions<S, A, C>,
}

impl<S, A, C> Clone for Engine<S, A, C> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
        }
    }
}

impl<S, A, C> Engine<S, A, C> {
    /// The action set bound to this engine.
    pub fn actions(&self) -> &Actions<S, A, C> {
        &self.actions
    }

    /// Stop accepting merges.
    ///
    /// In-flight deferred results become inert: on resolution they are
    /// dropped without a commit, an observer call, or a re-render request.
    /// Closing twice is a no-op.
    pub fn close(&self) {
        if !self.actions.shared.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("engine closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.actions.shared.closed.load(Ordering::SeqCst)
    }
}

impl<S: Clone, A, C> Engine<S, A, C> {
    /// Snapshot of the held (committed) state.
    pub fn state(&self) -> S {
        self.actions.shared.held.read().clone()
    }
}

impl<S, A, C> Engine<S, A, C>
where
    S: Merge + Send + Sync + 'static,
    A: Action<S, C>,
    C: Send + Sync + 'static,
{
    /// Start building an engine from its initial state and context.
    pub fn builder(initial_state: S, context: C) -> EngineBuilder<S, A, C> {
        EngineBuilder {
            initial_state,
            context,
            observer: None,
            scheduler: Box::new(NullScheduler),
            _actions: PhantomData,
        }
    }

    /// Build an engine with no observer and no render hook.
    pub fn new(initial_state: S, context: C) -> Self {
        Self::builder(initial_state, context).build()
    }

    /// Shorthand for `engine.actions().dispatch(action)`.
    pub fn dispatch(&self, action: A) -> Dispatched<S> {
        self.actions.dispatch(action)
    }
}

/// Configuration for one engine instance.
pub struct EngineBuilder<S, A, C> {
    initial_state: S,
    context: C,
    observer: Option<UpdateObserver<S>>,
    scheduler: Box<dyn RenderScheduler>,
    _actions: PhantomData<fn(A)>,
}

impl<S, A, C> EngineBuilder<S, A, C>
where
    S: Merge + Send + Sync + 'static,
    A: Action<S, C>,
    C: Send + Sync + 'static,
{
    /// Observe every successful merge with `(previous, next)`.
    pub fn on_update<F>(mut self, observer: F) -> Self
    where
        F: Fn(&S, &S) + Send + Sync + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Route commit notifications to the host's render loop.
    pub fn render_with<R>(mut self, scheduler: R) -> Self
    where
        R: RenderScheduler + 'static,
    {
        self.scheduler = Box::new(scheduler);
        self
    }

    /// Build the engine.
    ///
    /// Captures the current tokio runtime handle for deferred outcomes, so
    /// this must be called within a runtime context; dispatch itself may
    /// then happen from any thread.
    pub fn build(self) -> Engine<S, A, C> {
        let shared = Arc::new(EngineShared {
            pending: Mutex::new(self.initial_state.clone()),
            held: RwLock::new(self.initial_state),
            context: self.context,
            observer: self.observer,
            scheduler: self.scheduler,
            runtime: Handle::current(),
            closed: AtomicBool::new(false),
        });
        Engine {
            actions: Actions {
                shared,
                _actions: PhantomData,
            },
        }
    }
}
