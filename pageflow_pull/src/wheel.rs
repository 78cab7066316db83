// Copyright 2025 the Pageflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accumulation of discrete wheel ticks into a continuous pull.

use crate::{
    COMMIT_THRESHOLD, Direction, NavContext, PullState, ScrollEdges, WHEEL_GAIN,
    WHEEL_IDLE_TIMEOUT_MS, WHEEL_OPPOSING_DECAY,
};

/// Which scroll axis a wheel event moved along.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WheelAxis {
    /// Vertical scrolling (the common wheel).
    Vertical,
    /// Horizontal scrolling (trackpads, tilt wheels).
    Horizontal,
}

/// What a wheel event (or an idle tick) produced.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum WheelUpdate {
    /// Nothing to publish.
    None,
    /// An updated (possibly zero) pull.
    Pull(PullState),
    /// Accumulation crossed the commit threshold; the accumulator has been
    /// zeroed.
    Commit(Direction),
}

/// Converts discrete wheel deltas into the same continuous pull model used
/// by drag gestures.
///
/// Classification mirrors the drag rules: a positive vertical delta at the
/// bottom edge pulls forward (gate permitting), a negative vertical delta at
/// the top edge pulls backward, a positive horizontal delta reveals the
/// panel, a negative horizontal delta pulls forward.
///
/// Accumulation rules (the accumulator remembers which axis its events
/// came from; opposition is only ever judged along that axis):
///
/// - a matching event adds `|delta| × WHEEL_GAIN`;
/// - an event on the same axis classified to that axis's opposite sense
///   *decays* the accumulator by `|delta| × WHEEL_OPPOSING_DECAY`, floored
///   at zero — no direction switch, so a brief counter-scroll softens
///   rather than kills the pull;
/// - an event classified to an unrelated direction (in particular, any
///   classified event on the other axis) resets the accumulator to zero
///   and accepts the new direction (no carry-over);
/// - unclassifiable motion against the accumulation on its own axis also
///   decays; any other unclassifiable motion is ignored.
///
/// Each accumulating event restarts (not extends) an idle deadline; if the
/// host's [`tick`](Self::tick) observes the deadline pass, the accumulator
/// snaps back to zero. Commits zero the accumulator immediately. Timestamps
/// are caller-supplied milliseconds; the accumulator never reads a clock.
#[derive(Clone, Debug)]
pub struct WheelAccumulator {
    accumulated: f64,
    active: Option<Direction>,
    axis: Option<WheelAxis>,
    idle_deadline: Option<u64>,
}

impl WheelAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accumulated: 0.0,
            active: None,
            axis: None,
            idle_deadline: None,
        }
    }

    /// Feeds one wheel event. `now` is a millisecond timestamp.
    pub fn on_wheel(
        &mut self,
        axis: WheelAxis,
        delta: f64,
        ctx: NavContext,
        now: u64,
    ) -> WheelUpdate {
        let magnitude = delta.abs();
        let candidate = classify(axis, delta, ctx);

        match (candidate, self.active) {
            (Some(d), Some(active)) if d == active => {
                self.accumulated += magnitude * WHEEL_GAIN;
                self.axis = Some(axis);
                self.idle_deadline = Some(now + WHEEL_IDLE_TIMEOUT_MS);
            }
            (Some(d), Some(active)) if self.axis == Some(axis) && opposes(axis, d, active) => {
                return self.decay(magnitude);
            }
            (Some(d), _) => {
                // New or switched direction: no carry-over.
                self.accumulated = magnitude * WHEEL_GAIN;
                self.active = Some(d);
                self.axis = Some(axis);
                self.idle_deadline = Some(now + WHEEL_IDLE_TIMEOUT_MS);
            }
            (None, Some(active))
                if self.axis == Some(axis) && motion_opposes(axis, delta, active) =>
            {
                return self.decay(magnitude);
            }
            (None, _) => return WheelUpdate::None,
        }

        if self.accumulated >= COMMIT_THRESHOLD {
            let direction = self.active.take().expect("accumulating implies a direction");
            self.reset();
            return WheelUpdate::Commit(direction);
        }
        WheelUpdate::Pull(self.pull())
    }

    /// Observes the passage of time. Returns a zero pull to publish when the
    /// idle deadline has passed, `None` otherwise.
    pub fn tick(&mut self, now: u64) -> Option<PullState> {
        match self.idle_deadline {
            Some(deadline) if now >= deadline => {
                self.reset();
                Some(PullState::ZERO)
            }
            _ => None,
        }
    }

    /// Unconditionally clears all accumulation state and the idle deadline.
    /// Called on teardown.
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
        self.active = None;
        self.axis = None;
        self.idle_deadline = None;
    }

    /// The current pull.
    #[must_use]
    pub fn pull(&self) -> PullState {
        PullState {
            distance: self.accumulated,
            direction: self.active,
        }
    }

    fn decay(&mut self, magnitude: f64) -> WheelUpdate {
        self.accumulated = (self.accumulated - magnitude * WHEEL_OPPOSING_DECAY).max(0.0);
        if self.accumulated == 0.0 {
            self.reset();
            return WheelUpdate::Pull(PullState::ZERO);
        }
        WheelUpdate::Pull(self.pull())
    }
}

impl Default for WheelAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Classifies one wheel event against the navigation context, mirroring the
/// drag classifier's rules.
fn classify(axis: WheelAxis, delta: f64, ctx: NavContext) -> Option<Direction> {
    match axis {
        WheelAxis::Vertical => {
            if delta > 0.0 && ctx.edges.contains(ScrollEdges::AT_BOTTOM) && ctx.can_advance {
                Some(Direction::Forward)
            } else if delta < 0.0 && ctx.edges.contains(ScrollEdges::AT_TOP) && ctx.can_go_back {
                Some(Direction::Backward)
            } else {
                None
            }
        }
        WheelAxis::Horizontal => {
            if delta > 0.0 && !ctx.panel_open {
                Some(Direction::RevealPanel)
            } else if delta < 0.0 && ctx.can_advance {
                Some(Direction::Forward)
            } else {
                None
            }
        }
    }
}

/// Whether `incoming` and `active` are the two opposite senses of `axis`.
/// `Forward` pairs with `Backward` vertically and with `RevealPanel`
/// horizontally; across axes nothing opposes.
fn opposes(axis: WheelAxis, incoming: Direction, active: Direction) -> bool {
    match axis {
        WheelAxis::Vertical => matches!(
            (incoming, active),
            (Direction::Forward, Direction::Backward) | (Direction::Backward, Direction::Forward)
        ),
        WheelAxis::Horizontal => matches!(
            (incoming, active),
            (Direction::Forward, Direction::RevealPanel)
                | (Direction::RevealPanel, Direction::Forward)
        ),
    }
}

/// Whether raw, unclassifiable motion runs against the active accumulation
/// (for example scrolling back up mid-content while forward-accumulating).
fn motion_opposes(axis: WheelAxis, delta: f64, active: Direction) -> bool {
    match (axis, active) {
        (WheelAxis::Vertical, Direction::Forward) => delta < 0.0,
        (WheelAxis::Vertical, Direction::Backward) => delta > 0.0,
        (WheelAxis::Horizontal, Direction::RevealPanel) => delta < 0.0,
        (WheelAxis::Horizontal, Direction::Forward) => delta > 0.0,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bottom() -> NavContext {
        NavContext {
            edges: ScrollEdges::AT_BOTTOM,
            can_advance: true,
            can_go_back: true,
            panel_open: false,
        }
    }

    #[test]
    fn gain_accumulates_and_commits_on_second_tick() {
        let mut w = WheelAccumulator::new();
        let update = w.on_wheel(WheelAxis::Vertical, 50.0, bottom(), 0);
        assert_eq!(
            update,
            WheelUpdate::Pull(PullState::new(60.0, Direction::Forward))
        );
        // 60 + 60 = 120 >= threshold: the commit fires on the second event.
        let update = w.on_wheel(WheelAxis::Vertical, 50.0, bottom(), 100);
        assert_eq!(update, WheelUpdate::Commit(Direction::Forward));
        assert!(w.pull().is_zero());
    }

    #[test]
    fn gated_vertical_scroll_accumulates_nothing() {
        let mut w = WheelAccumulator::new();
        let mid = NavContext {
            edges: ScrollEdges::empty(),
            ..bottom()
        };
        assert_eq!(w.on_wheel(WheelAxis::Vertical, 50.0, mid, 0), WheelUpdate::None);
        let unanswered = NavContext {
            can_advance: false,
            ..bottom()
        };
        assert_eq!(
            w.on_wheel(WheelAxis::Vertical, 50.0, unanswered, 0),
            WheelUpdate::None
        );
    }

    #[test]
    fn opposing_event_decays_instead_of_resetting() {
        let mut w = WheelAccumulator::new();
        w.on_wheel(WheelAxis::Vertical, 50.0, bottom(), 0); // 60 forward
        // Scrolling back up (classifies Backward at top edge) opposes.
        let both = NavContext {
            edges: ScrollEdges::AT_TOP | ScrollEdges::AT_BOTTOM,
            ..bottom()
        };
        let update = w.on_wheel(WheelAxis::Vertical, -40.0, both, 50);
        assert_eq!(
            update,
            WheelUpdate::Pull(PullState::new(40.0, Direction::Forward))
        );
    }

    #[test]
    fn unclassifiable_opposing_motion_also_decays() {
        let mut w = WheelAccumulator::new();
        w.on_wheel(WheelAxis::Vertical, 50.0, bottom(), 0); // 60 forward
        // Not at top, so the up-scroll classifies to nothing, but it still
        // runs against the accumulation.
        let update = w.on_wheel(WheelAxis::Vertical, -40.0, bottom(), 50);
        assert_eq!(
            update,
            WheelUpdate::Pull(PullState::new(40.0, Direction::Forward))
        );
        // Decay floors at zero and clears the direction.
        let update = w.on_wheel(WheelAxis::Vertical, -200.0, bottom(), 80);
        assert_eq!(update, WheelUpdate::Pull(PullState::ZERO));
        assert!(w.pull().is_zero());
    }

    #[test]
    fn direction_switch_has_no_carry_over() {
        let mut w = WheelAccumulator::new();
        w.on_wheel(WheelAxis::Vertical, 50.0, bottom(), 0); // 60 forward
        // Horizontal reveal is unrelated to vertical forward: reset, accept.
        let update = w.on_wheel(WheelAxis::Horizontal, 30.0, bottom(), 50);
        assert_eq!(
            update,
            WheelUpdate::Pull(PullState::new(36.0, Direction::RevealPanel))
        );
        // And back again: vertical forward is unrelated to horizontal reveal.
        let update = w.on_wheel(WheelAxis::Vertical, 40.0, bottom(), 100);
        assert_eq!(
            update,
            WheelUpdate::Pull(PullState::new(48.0, Direction::Forward))
        );
    }

    #[test]
    fn same_axis_opposition_decays_a_horizontal_pull() {
        let mut w = WheelAccumulator::new();
        w.on_wheel(WheelAxis::Horizontal, -50.0, bottom(), 0); // 60 forward
        // A positive horizontal delta classifies to reveal, the opposite
        // sense of the same axis: decay, not switch.
        let update = w.on_wheel(WheelAxis::Horizontal, 40.0, bottom(), 50);
        assert_eq!(
            update,
            WheelUpdate::Pull(PullState::new(40.0, Direction::Forward))
        );
    }

    #[test]
    fn cross_axis_unclassifiable_motion_is_ignored() {
        let mut w = WheelAccumulator::new();
        w.on_wheel(WheelAxis::Horizontal, -50.0, bottom(), 0); // 60 forward
        // An up-scroll away from the top edge classifies to nothing; it is
        // on the other axis, so it neither decays nor resets.
        let update = w.on_wheel(WheelAxis::Vertical, -40.0, bottom(), 50);
        assert_eq!(update, WheelUpdate::None);
        assert_eq!(w.pull(), PullState::new(60.0, Direction::Forward));
    }

    #[test]
    fn horizontal_negative_is_forward() {
        let mut w = WheelAccumulator::new();
        let update = w.on_wheel(WheelAxis::Horizontal, -50.0, bottom(), 0);
        assert_eq!(
            update,
            WheelUpdate::Pull(PullState::new(60.0, Direction::Forward))
        );
    }

    #[test]
    fn reveal_is_gated_on_panel_closed() {
        let mut w = WheelAccumulator::new();
        let open = NavContext {
            panel_open: true,
            ..bottom()
        };
        assert_eq!(
            w.on_wheel(WheelAxis::Horizontal, 50.0, open, 0),
            WheelUpdate::None
        );
    }

    #[test]
    fn idle_deadline_zeroes_the_accumulator() {
        let mut w = WheelAccumulator::new();
        w.on_wheel(WheelAxis::Vertical, 50.0, bottom(), 1000);
        assert_eq!(w.tick(1300), None);
        assert_eq!(w.tick(1400), Some(PullState::ZERO));
        assert!(w.pull().is_zero());
        // Fired once; the deadline is gone.
        assert_eq!(w.tick(2000), None);
    }

    #[test]
    fn accepted_event_restarts_the_deadline() {
        let mut w = WheelAccumulator::new();
        w.on_wheel(WheelAxis::Vertical, 10.0, bottom(), 1000);
        w.on_wheel(WheelAxis::Vertical, 10.0, bottom(), 1300);
        // 1000 + 400 has passed, but the second event restarted the clock.
        assert_eq!(w.tick(1450), None);
        assert_eq!(w.tick(1700), Some(PullState::ZERO));
    }

    #[test]
    fn reset_clears_everything() {
        let mut w = WheelAccumulator::new();
        w.on_wheel(WheelAxis::Vertical, 50.0, bottom(), 0);
        w.reset();
        assert!(w.pull().is_zero());
        assert_eq!(w.tick(10_000), None);
    }
}
