mod common;

use std::sync::Arc;

use action_state::{Action, Actions, Engine, Outcome};
use parking_lot::Mutex;
use serde_json::{json, Value};

/// Collects what the second stage observed, so tests can see the pending
/// snapshot an action reads.
type Probe = Arc<Mutex<Vec<Value>>>;

enum DocAction {
    Patch(Value),
    Observe,
}

impl Action<Value, Probe> for DocAction {
    fn name(&self) -> &'static str {
        match self {
            DocAction::Patch(_) => "patch",
            DocAction::Observe => "observe",
        }
    }

    fn perform(
        self,
        state: &Value,
        _actions: &Actions<Value, Self, Probe>,
        probe: &Probe,
    ) -> Outcome<Value> {
        match self {
            DocAction::Patch(patch) => Outcome::Update(patch),
            DocAction::Observe => {
                probe.lock().push(state.clone());
                Outcome::Unchanged
            }
        }
    }
}

fn doc_engine(probe: &Probe) -> Engine<Value, DocAction, Probe> {
    Engine::new(json!({"a": 1, "b": 2}), Arc::clone(probe))
}

#[tokio::test]
async fn partial_patch_shallow_merges_into_held_state() {
    common::init_tracing();
    let engine = doc_engine(&Probe::default());

    engine.dispatch(DocAction::Patch(json!({"b": 3})));

    assert_eq!(engine.state(), json!({"a": 1, "b": 3}));
}

#[tokio::test]
async fn merge_base_is_the_held_state() {
    let engine = doc_engine(&Probe::default());

    engine.dispatch(DocAction::Patch(json!({"b": 3})));
    engine.dispatch(DocAction::Patch(json!({"c": 4})));

    // "a" survives both commits even though neither pending snapshot
    // carried it: the merge base is the held state.
    assert_eq!(engine.state(), json!({"a": 1, "b": 3, "c": 4}));
}

#[tokio::test]
async fn pending_state_holds_the_raw_result() {
    let probe = Probe::default();
    let engine = doc_engine(&probe);

    engine.dispatch(DocAction::Patch(json!({"b": 3})));
    engine.dispatch(DocAction::Observe);

    // The next action reads exactly what the previous one set: the raw
    // partial value, not the merged state.
    assert_eq!(*probe.lock(), vec![json!({"b": 3})]);
    assert_eq!(engine.state(), json!({"a": 1, "b": 3}));
}
