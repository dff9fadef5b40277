//! Scripted request timelines played against a running actor.

use std::time::Duration;

use action_runtime::{ActorHandle, RuntimeError};
use anyhow::Result;
use clap::ValueEnum;
use strum::{Display, EnumIter};
use tracing::{info, warn};

/// One beat of a timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cue {
    /// Request an action with the target at `distance`.
    Request {
        action: &'static str,
        distance: f32,
    },
    /// Let the worker run for this many ticks.
    Wait(u32),
    Cancel,
}

impl Cue {
    const fn request(action: &'static str) -> Self {
        Cue::Request {
            action,
            distance: 0.0,
        }
    }
}

/// Named demo timelines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Scenario {
    /// A low-priority idle action is interrupted by combat.
    Preempt,
    /// A conversation turns down every request until it finishes.
    Conversation,
    /// An out-of-range spell still cancels the running action.
    OutOfRange,
    /// A manual cancel in the middle of a run.
    Interrupt,
}

const PREEMPT: &[Cue] = &[
    Cue::request("Sit"),
    Cue::Wait(2),
    Cue::request("Attack"),
    Cue::request("Sit"),
    Cue::Wait(4),
];

const CONVERSATION: &[Cue] = &[
    Cue::request("Talk"),
    Cue::Wait(1),
    Cue::request("Magic"),
    Cue::request("Attack"),
    Cue::Wait(4),
    Cue::request("Attack"),
    Cue::Wait(4),
];

const OUT_OF_RANGE: &[Cue] = &[
    Cue::request("Attack"),
    Cue::Request {
        action: "Magic",
        distance: 25.0,
    },
    Cue::Wait(1),
    Cue::Request {
        action: "Magic",
        distance: 4.0,
    },
    Cue::Wait(6),
];

const INTERRUPT: &[Cue] = &[
    Cue::request("Sit"),
    Cue::Wait(2),
    Cue::Cancel,
    Cue::request("Attack"),
    Cue::Wait(4),
];

impl Scenario {
    pub fn cues(self) -> &'static [Cue] {
        match self {
            Scenario::Preempt => PREEMPT,
            Scenario::Conversation => CONVERSATION,
            Scenario::OutOfRange => OUT_OF_RANGE,
            Scenario::Interrupt => INTERRUPT,
        }
    }
}

/// Plays `cues` against `handle`, pacing waits by `tick_interval`.
pub async fn play(handle: &ActorHandle, cues: &[Cue], tick_interval: Duration) -> Result<()> {
    for cue in cues {
        match *cue {
            Cue::Request { action, distance } => {
                let context = handle.context().with_distance(distance);
                match handle.execute(action, context).await {
                    Ok(()) => info!(action, distance, "Request accepted"),
                    Err(RuntimeError::Rejected(reason)) => {
                        info!(action, distance, %reason, "Request rejected")
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            Cue::Wait(ticks) => tokio::time::sleep(tick_interval * ticks).await,
            Cue::Cancel => {
                if handle.cancel().await? {
                    info!("Cancelled running action");
                } else {
                    warn!("Cancel requested while idle");
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_scenario_requests_something() {
        for scenario in Scenario::iter() {
            assert!(
                scenario
                    .cues()
                    .iter()
                    .any(|cue| matches!(cue, Cue::Request { .. })),
                "{scenario} has no requests"
            );
        }
    }

    #[test]
    fn scenario_names_match_cli_values() {
        for scenario in Scenario::iter() {
            let value = scenario.to_possible_value().unwrap();
            assert_eq!(value.get_name(), scenario.to_string());
        }
    }
}
