// Copyright 2025 the Pageflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pageflow Pull: the continuous model behind navigation gestures.
//!
//! Every input modality the navigator understands — touch drags, trackpad
//! wheel deltas, explicit commands — is funneled into one shared abstraction:
//! a non-negative *pull distance* toward a [`Direction`], measured against a
//! fixed commit threshold. This crate provides:
//!
//! - [`PullState`]: the shared value model (distance, direction, and the
//!   derived progress ratio in `[0, 1]`).
//! - [`GestureClassifier`]: consumes raw pointer samples, locks a motion
//!   axis once per gesture, classifies the gesture, and tracks its elastic
//!   pull distance until release or commit.
//! - [`WheelAccumulator`]: converts discrete wheel ticks into the same
//!   continuous pull, with opposing-motion decay and an idle snap-back.
//! - [`NavContext`]: the per-sample snapshot of everything classification
//!   depends on (scroll edges, the advance gate, panel state), so the
//!   classifiers stay pure of the rest of the navigator.
//!
//! Both producers are sans-io: the classifier is driven by pointer samples,
//! the accumulator by wheel events carrying caller-supplied millisecond
//! timestamps, with idle decay observed through [`WheelAccumulator::tick`].
//! Neither mutates any navigation state; they only *propose* commits, which
//! the transition orchestrator accepts or rejects.
//!
//! ## Coordinate conventions
//!
//! Pointer positions are screen-space [`kurbo::Point`]s, y growing downward.
//! For drags, the finger moves the content: dragging left (`dx < 0`) pulls
//! forward, dragging right (`dx > 0`) reveals the side panel, dragging up at
//! the bottom edge (`dy < 0`) pulls forward, dragging down at the top edge
//! (`dy > 0`) pulls backward. Wheel deltas follow scroll convention instead:
//! a positive vertical delta scrolls toward the bottom (forward), a positive
//! horizontal delta reveals the panel.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use pageflow_pull::{
//!     COMMIT_THRESHOLD, Direction, GestureClassifier, GestureUpdate, NavContext, ScrollEdges,
//! };
//!
//! let mut gesture = GestureClassifier::new();
//! let ctx = NavContext {
//!     edges: ScrollEdges::AT_BOTTOM,
//!     can_advance: true,
//!     can_go_back: false,
//!     panel_open: false,
//! };
//!
//! gesture.on_down(Point::new(200.0, 400.0), false);
//! // Drag up past the axis-lock threshold: vertical, away, at the bottom
//! // edge, gate open — a forward pull.
//! match gesture.on_move(Point::new(200.0, 360.0), ctx) {
//!     GestureUpdate::Pull(pull) => {
//!         assert_eq!(pull.direction, Some(Direction::Forward));
//!         assert!(pull.progress() < 1.0);
//!     }
//!     other => panic!("expected a pull, got {other:?}"),
//! }
//! // Drag far enough and the gesture commits exactly once.
//! let update = gesture.on_move(Point::new(200.0, 400.0 - COMMIT_THRESHOLD - 20.0), ctx);
//! assert_eq!(update, GestureUpdate::Commit(Direction::Forward));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod gesture;
mod wheel;

pub use gesture::{GestureClassifier, GestureUpdate};
pub use wheel::{WheelAccumulator, WheelAxis, WheelUpdate};

/// Pull distance at which an in-progress gesture commits, in abstract units
/// (logical pixels for pointer input).
pub const COMMIT_THRESHOLD: f64 = 120.0;

/// Minimum movement magnitude before a gesture's axis may lock, and the dead
/// zone subtracted from the primary-axis delta when computing pull distance.
pub const MIN_MOVEMENT: f64 = 12.0;

/// Dominance ratio one axis must have over the other before locking. Motion
/// inside the ambiguous band locks nothing and waits for more samples.
pub const AXIS_DOMINANCE: f64 = 1.2;

/// Gain applied to wheel delta magnitudes while accumulating.
pub const WHEEL_GAIN: f64 = 1.2;

/// Fraction of an opposing wheel delta's magnitude subtracted from the
/// accumulator (decay, not reset).
pub const WHEEL_OPPOSING_DECAY: f64 = 0.5;

/// Idle time after the last accepted wheel event before the accumulator
/// snaps back to zero, in milliseconds.
pub const WHEEL_IDLE_TIMEOUT_MS: u64 = 400;

/// A navigation direction a gesture can pull toward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward the next page (or lesson completion on the last page).
    Forward,
    /// Toward the previous page.
    Backward,
    /// Toward revealing the auxiliary side panel.
    RevealPanel,
}

bitflags::bitflags! {
    /// Which edges of the content viewport the scroll position currently
    /// touches. Content shorter than the viewport touches both.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ScrollEdges: u8 {
        /// Scrolled to the very top.
        const AT_TOP    = 0b0000_0001;
        /// Scrolled to the very bottom.
        const AT_BOTTOM = 0b0000_0010;
    }
}

impl Default for ScrollEdges {
    fn default() -> Self {
        Self::AT_TOP | Self::AT_BOTTOM
    }
}

/// Snapshot of the navigation state a classifier consults, captured by the
/// caller per sample. Classification never reads ambient state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NavContext {
    /// Scroll edges currently touched by the content viewport.
    pub edges: ScrollEdges,
    /// Result of the advance gate for the current page.
    pub can_advance: bool,
    /// Whether a previous page exists.
    pub can_go_back: bool,
    /// Whether the side panel is already open.
    pub panel_open: bool,
}

/// The shared continuous pull model.
///
/// Ephemeral: reset to [`PullState::ZERO`] after every commit and after every
/// release-without-commit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PullState {
    /// Non-negative pull distance in abstract units.
    pub distance: f64,
    /// Direction of the pull; `None` when at rest.
    pub direction: Option<Direction>,
}

impl PullState {
    /// The resting state: zero distance, no direction.
    pub const ZERO: Self = Self {
        distance: 0.0,
        direction: None,
    };

    /// Creates a pull of `distance` toward `direction`.
    #[must_use]
    pub fn new(distance: f64, direction: Direction) -> Self {
        Self {
            distance: distance.max(0.0),
            direction: Some(direction),
        }
    }

    /// Progress toward commit: `min(distance / COMMIT_THRESHOLD, 1)`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        (self.distance / COMMIT_THRESHOLD).min(1.0)
    }

    /// Whether this is the resting state.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.distance == 0.0 && self.direction.is_none()
    }
}

impl Default for PullState {
    fn default() -> Self {
        Self::ZERO
    }
}
