// Copyright 2025 the Pageflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-locked classification of pointer drag gestures.

use kurbo::{Point, Vec2};

use crate::{
    AXIS_DOMINANCE, COMMIT_THRESHOLD, Direction, MIN_MOVEMENT, NavContext, PullState, ScrollEdges,
};

/// The axis a gesture has locked to, decided once per gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Axis {
    Unlocked,
    Horizontal,
    Vertical,
}

/// What a pointer sample produced.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GestureUpdate {
    /// Nothing to publish; the underlying viewport keeps the event.
    None,
    /// An updated (possibly zero) pull for the renderer and affordance.
    Pull(PullState),
    /// The gesture crossed the commit threshold. Emitted exactly once per
    /// gesture; the classifier is inert afterwards.
    Commit(Direction),
}

/// Per-gesture classifier for pointer drags.
///
/// Lifecycle: [`on_down`](Self::on_down) begins a gesture and resets all
/// per-gesture state; [`on_move`](Self::on_move) samples feed the axis lock,
/// classification, and pull tracking; [`on_up`](Self::on_up) ends it. A
/// gesture that starts inside a region owning its own input (an embedded
/// interactive widget) is inert for its whole duration — a hard escape
/// hatch, not a classification outcome.
///
/// Classification consults a [`NavContext`] snapshot per sample and resolves
/// at the moment the axis locks:
///
/// - horizontal, opening direction: [`Direction::RevealPanel`] iff the panel
///   is closed;
/// - horizontal, closing direction: [`Direction::Forward`] iff the advance
///   gate passes;
/// - vertical, away while at the bottom edge: [`Direction::Forward`] (same
///   gate);
/// - vertical, toward while at the top edge: [`Direction::Backward`] iff a
///   previous page exists;
/// - any other vertical motion is ordinary scrolling and is not intercepted.
///
/// A failed classification leaves the gesture inert so native scrolling
/// proceeds undisturbed; ambiguity (neither axis dominant) locks nothing and
/// waits for more samples.
#[derive(Clone, Debug)]
pub struct GestureClassifier {
    start: Point,
    axis: Axis,
    direction: Option<Direction>,
    active: bool,
    inert: bool,
    committed: bool,
    suppress_tap: bool,
}

impl GestureClassifier {
    /// Creates an idle classifier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Point::ZERO,
            axis: Axis::Unlocked,
            direction: None,
            active: false,
            inert: false,
            committed: false,
            suppress_tap: false,
        }
    }

    /// Begins a gesture at `position`.
    ///
    /// `widget_owned` marks a gesture beginning inside a region that owns
    /// its own input; such gestures are ignored entirely.
    pub fn on_down(&mut self, position: Point, widget_owned: bool) {
        self.start = position;
        self.axis = Axis::Unlocked;
        self.direction = None;
        self.active = true;
        self.inert = widget_owned;
        self.committed = false;
    }

    /// Feeds a movement sample.
    pub fn on_move(&mut self, position: Point, ctx: NavContext) -> GestureUpdate {
        if !self.active || self.inert {
            return GestureUpdate::None;
        }
        let delta = position - self.start;

        if self.axis == Axis::Unlocked {
            if !self.try_lock(delta, ctx) {
                return GestureUpdate::None;
            }
            if self.direction.is_none() {
                // Locked but unclassifiable: native scrolling (or a gated
                // direction). Stay out of the way for the rest of the gesture.
                self.inert = true;
                return GestureUpdate::None;
            }
        }

        let Some(direction) = self.direction else {
            return GestureUpdate::None;
        };
        let distance = (self.primary_pull(delta) - MIN_MOVEMENT).max(0.0);
        if distance >= COMMIT_THRESHOLD {
            // One commit per gesture, and the finishing swipe must not also
            // register as a tap on whatever ends up under the pointer.
            self.committed = true;
            self.suppress_tap = true;
            self.inert = true;
            return GestureUpdate::Commit(direction);
        }
        GestureUpdate::Pull(PullState {
            distance,
            direction: Some(direction),
        })
    }

    /// Ends the gesture.
    ///
    /// A release below the commit threshold is the elastic no-op path: the
    /// pull snaps back to zero and no navigation state was ever touched.
    pub fn on_up(&mut self) -> GestureUpdate {
        let was_tracking = self.active && self.direction.is_some() && !self.committed;
        self.active = false;
        self.axis = Axis::Unlocked;
        self.direction = None;
        if was_tracking {
            GestureUpdate::Pull(PullState::ZERO)
        } else {
            GestureUpdate::None
        }
    }

    /// Returns and clears the tap-suppression flag.
    ///
    /// Set when a drag commits, so the host can swallow the tap event the
    /// same physical gesture synthesizes on release.
    pub fn take_tap_suppression(&mut self) -> bool {
        core::mem::take(&mut self.suppress_tap)
    }

    /// Attempts to lock the axis and classify. Returns false while the
    /// movement is too small or too ambiguous to decide.
    fn try_lock(&mut self, delta: Vec2, ctx: NavContext) -> bool {
        let (dx, dy) = (delta.x.abs(), delta.y.abs());
        if dx.max(dy) < MIN_MOVEMENT {
            return false;
        }
        if dx > AXIS_DOMINANCE * dy {
            self.axis = Axis::Horizontal;
            self.direction = if delta.x > 0.0 {
                (!ctx.panel_open).then_some(Direction::RevealPanel)
            } else {
                ctx.can_advance.then_some(Direction::Forward)
            };
            true
        } else if dy > AXIS_DOMINANCE * dx {
            self.axis = Axis::Vertical;
            self.direction = if delta.y < 0.0 {
                (ctx.edges.contains(ScrollEdges::AT_BOTTOM) && ctx.can_advance)
                    .then_some(Direction::Forward)
            } else {
                (ctx.edges.contains(ScrollEdges::AT_TOP) && ctx.can_go_back)
                    .then_some(Direction::Backward)
            };
            true
        } else {
            false
        }
    }

    /// Signed delta along the classified direction's pulling sense.
    fn primary_pull(&self, delta: Vec2) -> f64 {
        match (self.axis, self.direction) {
            (Axis::Horizontal, Some(Direction::RevealPanel)) => delta.x,
            (Axis::Horizontal, Some(Direction::Forward)) => -delta.x,
            (Axis::Vertical, Some(Direction::Forward)) => -delta.y,
            (Axis::Vertical, Some(Direction::Backward)) => delta.y,
            _ => 0.0,
        }
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScrollEdges;

    fn ctx() -> NavContext {
        NavContext {
            edges: ScrollEdges::default(),
            can_advance: true,
            can_go_back: true,
            panel_open: false,
        }
    }

    fn pull_of(update: GestureUpdate) -> PullState {
        match update {
            GestureUpdate::Pull(p) => p,
            other => panic!("expected pull, got {other:?}"),
        }
    }

    #[test]
    fn small_movement_locks_nothing() {
        let mut g = GestureClassifier::new();
        g.on_down(Point::new(100.0, 100.0), false);
        assert_eq!(g.on_move(Point::new(105.0, 103.0), ctx()), GestureUpdate::None);
        // Still free to lock once movement grows.
        let update = g.on_move(Point::new(60.0, 100.0), ctx());
        assert_eq!(pull_of(update).direction, Some(Direction::Forward));
    }

    #[test]
    fn ambiguous_diagonal_waits_for_more_samples() {
        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), false);
        // 20/18: neither axis exceeds 1.2x the other.
        assert_eq!(g.on_move(Point::new(20.0, 18.0), ctx()), GestureUpdate::None);
        // A later, clearly horizontal sample still locks.
        let update = g.on_move(Point::new(60.0, 18.0), ctx());
        assert_eq!(pull_of(update).direction, Some(Direction::RevealPanel));
    }

    #[test]
    fn widget_owned_start_is_a_hard_escape_hatch() {
        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), true);
        assert_eq!(g.on_move(Point::new(-200.0, 0.0), ctx()), GestureUpdate::None);
        assert_eq!(g.on_up(), GestureUpdate::None);
        assert!(!g.take_tap_suppression());
    }

    #[test]
    fn horizontal_open_classifies_reveal_only_when_panel_closed() {
        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), false);
        let update = g.on_move(Point::new(40.0, 0.0), ctx());
        assert_eq!(pull_of(update).direction, Some(Direction::RevealPanel));

        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), false);
        let open = NavContext {
            panel_open: true,
            ..ctx()
        };
        assert_eq!(g.on_move(Point::new(40.0, 0.0), open), GestureUpdate::None);
        // The lock held: later motion in a gated direction stays dead.
        assert_eq!(g.on_move(Point::new(-200.0, 0.0), open), GestureUpdate::None);
    }

    #[test]
    fn horizontal_close_is_forward_subject_to_gate() {
        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), false);
        let gated = NavContext {
            can_advance: false,
            ..ctx()
        };
        assert_eq!(g.on_move(Point::new(-40.0, 0.0), gated), GestureUpdate::None);

        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), false);
        let update = g.on_move(Point::new(-40.0, 0.0), ctx());
        assert_eq!(pull_of(update).direction, Some(Direction::Forward));
    }

    #[test]
    fn vertical_mid_scroll_is_not_intercepted() {
        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), false);
        let mid = NavContext {
            edges: ScrollEdges::empty(),
            ..ctx()
        };
        assert_eq!(g.on_move(Point::new(0.0, -80.0), mid), GestureUpdate::None);
        assert_eq!(g.on_move(Point::new(0.0, -300.0), mid), GestureUpdate::None);
        assert_eq!(g.on_up(), GestureUpdate::None);
    }

    #[test]
    fn vertical_away_at_bottom_is_forward() {
        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), false);
        let bottom = NavContext {
            edges: ScrollEdges::AT_BOTTOM,
            ..ctx()
        };
        let pull = pull_of(g.on_move(Point::new(0.0, -52.0), bottom));
        assert_eq!(pull.direction, Some(Direction::Forward));
        assert_eq!(pull.distance, 40.0);
    }

    #[test]
    fn vertical_toward_at_top_is_backward_unless_at_first_page() {
        let top = NavContext {
            edges: ScrollEdges::AT_TOP,
            ..ctx()
        };
        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), false);
        let pull = pull_of(g.on_move(Point::new(0.0, 52.0), top));
        assert_eq!(pull.direction, Some(Direction::Backward));

        let first_page = NavContext {
            can_go_back: false,
            ..top
        };
        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), false);
        assert_eq!(g.on_move(Point::new(0.0, 52.0), first_page), GestureUpdate::None);
    }

    #[test]
    fn distance_subtracts_dead_zone_and_never_goes_negative() {
        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), false);
        let pull = pull_of(g.on_move(Point::new(92.0, 0.0), ctx()));
        assert_eq!(pull.distance, 80.0);
        // Reversing past the start floors at zero, not negative.
        let pull = pull_of(g.on_move(Point::new(-30.0, 0.0), ctx()));
        assert_eq!(pull.distance, 0.0);
    }

    #[test]
    fn commit_fires_exactly_once_then_gesture_is_inert() {
        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), false);
        assert!(matches!(
            g.on_move(Point::new(60.0, 0.0), ctx()),
            GestureUpdate::Pull(_)
        ));
        assert_eq!(
            g.on_move(Point::new(140.0, 0.0), ctx()),
            GestureUpdate::Commit(Direction::RevealPanel)
        );
        // Further samples and the release are swallowed.
        assert_eq!(g.on_move(Point::new(300.0, 0.0), ctx()), GestureUpdate::None);
        assert_eq!(g.on_up(), GestureUpdate::None);
    }

    #[test]
    fn release_below_threshold_resets_pull_to_zero() {
        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), false);
        let pull = pull_of(g.on_move(Point::new(92.0, 0.0), ctx()));
        assert_eq!(pull.distance, 80.0);
        assert_eq!(g.on_up(), GestureUpdate::Pull(PullState::ZERO));
        assert!(!g.take_tap_suppression());
    }

    #[test]
    fn tap_suppression_is_set_by_commit_and_cleared_on_take() {
        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), false);
        g.on_move(Point::new(140.0, 0.0), ctx());
        assert!(g.take_tap_suppression());
        assert!(!g.take_tap_suppression());
    }

    #[test]
    fn new_gesture_resets_per_gesture_state() {
        let mut g = GestureClassifier::new();
        g.on_down(Point::new(0.0, 0.0), false);
        g.on_move(Point::new(140.0, 0.0), ctx());
        // A fresh down starts clean even after a committed gesture.
        g.on_down(Point::new(0.0, 0.0), false);
        let pull = pull_of(g.on_move(Point::new(-60.0, 0.0), ctx()));
        assert_eq!(pull.direction, Some(Direction::Forward));
    }
}
