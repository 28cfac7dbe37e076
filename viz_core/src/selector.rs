//! Per-event gating: decides whether a publish event is buffered.
//!
//! Rules are applied in order, first match wins:
//! 1. end-of-run → trigger the terminal export instead of buffering
//! 2. in-progress solver pass with display policy `None` → reject
//! 3. zero data elements → accept but nothing to extract
//! 4. function-scoped provider failing visibility rules → reject
//! 5. fewer than 7 numeric fields → malformed, accept but do not extract
//! 6. fixed-stride decimation on a monotone event counter

use crate::body::Roster;
use crate::types::PublishEvent;
use serde::{Deserialize, Serialize};

/// Solver/run phase the sample stream is currently in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Normal propagation of a converged/accepted trajectory.
    Running,
    /// An in-progress solver pass; samples are iteration guesses.
    Solving,
    /// The final pass of a solver after convergence.
    SolvedPass,
    /// The run has reached its terminal state.
    EndOfRun,
}

/// Which solver iterations should reach the buffer.
///
/// Only `None` is currently reachable from configuration; the other options
/// exist for hosts that publish intermediate solver trajectories.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverIterOption {
    #[default]
    None,
    Current,
    All,
}

/// Per-event context supplied by the host alongside the data vector.
#[derive(Clone, Copy, Debug)]
pub struct EventContext {
    pub run_state: RunState,
    /// True when the producing command runs inside a host function scope.
    pub in_function: bool,
}

impl EventContext {
    pub fn running() -> Self {
        Self {
            run_state: RunState::Running,
            in_function: false,
        }
    }

    pub fn end_of_run() -> Self {
        Self {
            run_state: RunState::EndOfRun,
            in_function: false,
        }
    }
}

/// Verdict for one publish event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Terminal state reached: export instead of buffering.
    TriggerExport,
    /// Gated out (solver pass, visibility, or stride miss).
    Reject,
    /// Accepted but carries nothing extractable (empty or malformed).
    NoOp,
    /// Proceed to extraction and buffering.
    Buffer,
}

/// Stateful event gate. One instance per pipeline, reset per run.
#[derive(Clone, Debug)]
pub struct SampleSelector {
    stride: u32,
    solver_display: SolverIterOption,
    /// Whether this pipeline instance is a global object in the host script.
    interface_global: bool,
    events_seen: u64,
}

impl SampleSelector {
    pub fn new(stride: u32, solver_display: SolverIterOption, interface_global: bool) -> Self {
        Self {
            stride: stride.max(1),
            solver_display,
            interface_global,
            events_seen: 0,
        }
    }

    /// Number of events that have reached the decimation rule.
    pub fn events_seen(&self) -> u64 {
        self.events_seen
    }

    /// Re-arm for a fresh run.
    pub fn reset(&mut self) {
        self.events_seen = 0;
    }

    /// Apply the gate ladder to one event.
    pub fn accept(
        &mut self,
        event: &PublishEvent,
        ctx: &EventContext,
        roster: &Roster,
    ) -> Selection {
        if ctx.run_state == RunState::EndOfRun {
            return Selection::TriggerExport;
        }

        if ctx.run_state == RunState::Solving && self.solver_display == SolverIterOption::None {
            return Selection::Reject;
        }

        if event.is_empty() {
            return Selection::NoOp;
        }

        if ctx.in_function && !self.event_visible(roster) {
            return Selection::Reject;
        }

        if event.len() < 7 {
            return Selection::NoOp;
        }

        // Counter covers every event that reaches decimation, including the
        // ones the stride then rejects.
        self.events_seen += 1;
        if self.events_seen == 1 || self.events_seen % self.stride as u64 == 0 {
            Selection::Buffer
        } else {
            Selection::Reject
        }
    }

    /// Visibility of a function-scoped event: one out-of-scope body hides
    /// the whole event.
    fn event_visible(&self, roster: &Roster) -> bool {
        for (_, body) in roster.iter() {
            if self.interface_global && body.is_local() {
                return false;
            }
            if !body.is_global() && !body.is_local() {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyKind, BodyModel, RadiusPolicy, Roster};
    use crate::error::ExtractError;
    use crate::types::{Epoch, State6};

    struct Stub {
        global: bool,
        local: bool,
    }

    impl BodyModel for Stub {
        fn name(&self) -> &str {
            "Stub"
        }
        fn kind(&self) -> BodyKind {
            BodyKind::Mover
        }
        fn is_global(&self) -> bool {
            self.global
        }
        fn is_local(&self) -> bool {
            self.local
        }
        fn state_at(&self, _epoch: Epoch) -> Result<State6, ExtractError> {
            Ok(State6::zeros())
        }
    }

    fn roster(global: bool, local: bool) -> Roster {
        Roster::build(
            vec![Box::new(Stub { global, local })],
            RadiusPolicy {
                min_body_radius: 50.0,
                derive_radii: false,
            },
        )
        .unwrap()
    }

    fn full_event() -> PublishEvent {
        PublishEvent::new(
            (0..7).map(|i| format!("f{i}")).collect(),
            vec![0.0; 7],
        )
    }

    #[test]
    fn stride_decimation_counts_rejected_events() {
        let roster = roster(true, false);
        let mut sel = SampleSelector::new(3, SolverIterOption::None, false);
        let ctx = EventContext::running();

        let verdicts: Vec<Selection> = (0..7)
            .map(|_| sel.accept(&full_event(), &ctx, &roster))
            .collect();

        // Counter values 1..=7; accepted at 1, 3, 6.
        let accepted = verdicts.iter().filter(|v| **v == Selection::Buffer).count();
        assert_eq!(accepted, 3);
        assert_eq!(verdicts[0], Selection::Buffer);
        assert_eq!(verdicts[1], Selection::Reject);
        assert_eq!(verdicts[2], Selection::Buffer);
        assert_eq!(sel.events_seen(), 7);
    }

    #[test]
    fn stride_one_accepts_everything() {
        let roster = roster(true, false);
        let mut sel = SampleSelector::new(1, SolverIterOption::None, false);
        let ctx = EventContext::running();
        for _ in 0..5 {
            assert_eq!(sel.accept(&full_event(), &ctx, &roster), Selection::Buffer);
        }
    }

    #[test]
    fn solving_is_rejected_under_none_policy() {
        let roster = roster(true, false);
        let mut sel = SampleSelector::new(1, SolverIterOption::None, false);
        let ctx = EventContext {
            run_state: RunState::Solving,
            in_function: false,
        };
        assert_eq!(sel.accept(&full_event(), &ctx, &roster), Selection::Reject);
        // Rejected before the counter rule: nothing counted.
        assert_eq!(sel.events_seen(), 0);
    }

    #[test]
    fn end_of_run_triggers_export() {
        let roster = roster(true, false);
        let mut sel = SampleSelector::new(1, SolverIterOption::None, false);
        assert_eq!(
            sel.accept(&full_event(), &EventContext::end_of_run(), &roster),
            Selection::TriggerExport
        );
    }

    #[test]
    fn short_and_empty_events_are_noops() {
        let roster = roster(true, false);
        let mut sel = SampleSelector::new(1, SolverIterOption::None, false);
        let ctx = EventContext::running();

        let empty = PublishEvent::new(vec![], vec![]);
        assert_eq!(sel.accept(&empty, &ctx, &roster), Selection::NoOp);

        let short = PublishEvent::new(vec!["t".into()], vec![21545.0]);
        assert_eq!(sel.accept(&short, &ctx, &roster), Selection::NoOp);
        assert_eq!(sel.events_seen(), 0);
    }

    #[test]
    fn global_interface_skips_local_bodies_in_functions() {
        let roster = roster(false, true); // body is local
        let mut sel = SampleSelector::new(1, SolverIterOption::None, true);
        let ctx = EventContext {
            run_state: RunState::Running,
            in_function: true,
        };
        assert_eq!(sel.accept(&full_event(), &ctx, &roster), Selection::Reject);

        // Outside a function the same event passes.
        assert_eq!(
            sel.accept(&full_event(), &EventContext::running(), &roster),
            Selection::Buffer
        );
    }

    #[test]
    fn unscoped_bodies_hide_function_events() {
        let roster = roster(false, false); // neither global nor local
        let mut sel = SampleSelector::new(1, SolverIterOption::None, false);
        let ctx = EventContext {
            run_state: RunState::Running,
            in_function: true,
        };
        assert_eq!(sel.accept(&full_event(), &ctx, &roster), Selection::Reject);
    }
}
