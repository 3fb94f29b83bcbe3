//! Provider/consumer pairing over an ambient channel.

use std::sync::Arc;

use crate::bundle::channel::{AmbientChannel, ScopeId};
use crate::engine::{Action, Engine, EngineBuilder, Merge};

/// A shareable `{state, actions}` source.
///
/// Create one per logical store, typically at module scope behind a
/// `OnceLock`. Consumers call [`shared`](Bundle::shared); a host component
/// that owns the state's lifetime calls [`mount`](Bundle::mount) and keeps
/// the guard alive for as long as the state should exist.
pub struct Bundle<S, A, C> {
    channel: Arc<AmbientChannel<Engine<S, A, C>>>,
}

impl<S, A, C> Clone for Bundle<S, A, C> {
    fn clone(&self) -> Self {
        Self {
            channel: Arc::clone(&self.channel),
        }
    }
}

impl<S, A, C> Bundle<S, A, C>
where
    S: Merge + Send + Sync + 'static,
    A: Action<S, C>,
    C: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            channel: Arc::new(AmbientChannel::new()),
        }
    }

    /// The underlying ambient channel.
    pub fn channel(&self) -> &AmbientChannel<Engine<S, A, C>> {
        &self.channel
    }

    /// Build exactly one engine from `builder` and publish it.
    ///
    /// The engine lives as long as the returned guard; see [`Provider`].
    pub fn mount(&self, builder: EngineBuilder<S, A, C>) -> Provider<S, A, C> {
        let engine = builder.build();
        let scope = self.channel.publish(engine.clone());
        tracing::debug!(?scope, "provider mounted");
        Provider {
            engine,
            channel: Arc::clone(&self.channel),
            scope,
        }
    }

    /// The nearest mounted engine.
    ///
    /// `None` outside every provider. The caller must guard; there is no
    /// error and no panic at this layer.
    pub fn shared(&self) -> Option<Engine<S, A, C>> {
        self.channel.current()
    }
}

impl<S, A, C> Default for Bundle<S, A, C>
where
    S: Merge + Send + Sync + 'static,
    A: Action<S, C>,
    C: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Guard for one mounted engine.
///
/// Dropping it unpublishes the engine and closes it: consumers that kept an
/// engine clone can still read the last held state, but every late-resolving
/// deferred merge is silently dropped.
pub struct Provider<S, A, C> {
    engine: Engine<S, A, C>,
    channel: Arc<AmbientChannel<Engine<S, A, C>>>,
    scope: ScopeId,
}

impl<S, A, C> Provider<S, A, C> {
    /// The engine this provider owns.
    pub fn engine(&self) -> &Engine<S, A, C> {
        &self.engine
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }
}

impl<S, A, C> Drop for Provider<S, A, C> {
    fn drop(&mut self) {
        self.channel.unpublish(self.scope);
        self.engine.close();
        tracing::debug!(scope = ?self.scope, "provider unmounted");
    }
}
