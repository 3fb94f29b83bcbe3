//! Host-framework seam: one re-render request per commit.

/// Hook through which the engine asks the host to redraw.
///
/// The engine calls [`request_render`](RenderScheduler::request_render)
/// exactly once per successful merge and never for a no-op dispatch. Hosts
/// typically box the sender half of their event channel here; a plain
/// closure also works via the blanket impl.
pub trait RenderScheduler: Send + Sync {
    fn request_render(&self);
}

impl<F> RenderScheduler for F
where
    F: Fn() + Send + Sync,
{
    fn request_render(&self) {
        self()
    }
}

/// Scheduler for headless hosts that poll state instead of reacting to it.
pub struct NullScheduler;

impl RenderScheduler for NullScheduler {
    fn request_render(&self) {}
}
