//! Shared fixtures: the three-lamp state used across the integration tests.

#![allow(dead_code)]

use action_state::{Action, Actions, Engine, Merge, Outcome};
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lamps {
    pub red: bool,
    pub yellow: bool,
    pub blue: bool,
}

impl Lamps {
    pub fn initial() -> Self {
        Self {
            red: false,
            yellow: false,
            blue: true,
        }
    }
}

impl Merge for Lamps {
    fn merge(&self, patch: &Self) -> Self {
        patch.clone()
    }
}

pub enum LampAction {
    SetRed(bool),
    SetYellow(bool),
    SetBlue(bool),
    ToggleRed,
    /// Flips all three lamps by invoking the setters in sequence; each
    /// nested dispatch must see the previous one's effect.
    ToggleAll,
    /// Deferred red toggle that resolves as soon as the runtime polls it.
    ToggleRedLater,
    /// Deferred full-state write gated on an external signal, for tests
    /// that control resolution order.
    SetAllWhen {
        gate: oneshot::Receiver<()>,
        next: Lamps,
    },
    /// Deferred stage that dispatches a sibling instead of returning state.
    RelayToggleRed,
    /// Deferred stage that panics before producing a result.
    FailLater,
    Noop,
}

impl Action<Lamps, ()> for LampAction {
    fn name(&self) -> &'static str {
        match self {
            LampAction::SetRed(_) => "set_red",
            LampAction::SetYellow(_) => "set_yellow",
            LampAction::SetBlue(_) => "set_blue",
            LampAction::ToggleRed => "toggle_red",
            LampAction::ToggleAll => "toggle_all",
            LampAction::ToggleRedLater => "toggle_red_later",
            LampAction::SetAllWhen { .. } => "set_all_when",
            LampAction::RelayToggleRed => "relay_toggle_red",
            LampAction::FailLater => "fail_later",
            LampAction::Noop => "noop",
        }
    }

    fn perform(
        self,
        state: &Lamps,
        actions: &Actions<Lamps, Self, ()>,
        _context: &(),
    ) -> Outcome<Lamps> {
        match self {
            LampAction::SetRed(red) => Outcome::Update(Lamps {
                red,
                ..state.clone()
            }),
            LampAction::SetYellow(yellow) => Outcome::Update(Lamps {
                yellow,
                ..state.clone()
            }),
            LampAction::SetBlue(blue) => Outcome::Update(Lamps {
                blue,
                ..state.clone()
            }),
            LampAction::ToggleRed => Outcome::Update(Lamps {
                red: !state.red,
                ..state.clone()
            }),
            LampAction::ToggleAll => {
                actions.dispatch(LampAction::SetRed(!state.red));
                actions.dispatch(LampAction::SetYellow(!state.yellow));
                actions.dispatch(LampAction::SetBlue(!state.blue));
                Outcome::Unchanged
            }
            LampAction::ToggleRedLater => {
                let next = Lamps {
                    red: !state.red,
                    ..state.clone()
                };
                Outcome::deferred(async move { Some(next) })
            }
            LampAction::SetAllWhen { gate, next } => Outcome::deferred(async move {
                let _ = gate.await;
                Some(next)
            }),
            LampAction::RelayToggleRed => {
                let actions = actions.clone();
                Outcome::deferred(async move {
                    actions.dispatch(LampAction::ToggleRed);
                    None
                })
            }
            LampAction::FailLater => {
                Outcome::deferred(async move { panic!("lamp controller unplugged") })
            }
            LampAction::Noop => Outcome::Unchanged,
        }
    }
}

pub fn lamp_engine() -> Engine<Lamps, LampAction, ()> {
    Engine::builder(Lamps::initial(), ()).build()
}

/// Install a subscriber so `RUST_LOG` shows commit logs during test runs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
