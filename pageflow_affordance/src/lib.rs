// Copyright 2025 the Pageflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pageflow Affordance: the visual face of the pull model.
//!
//! [`map`] is a pure function from the live pull (or the frozen confirmed
//! direction while a transition is in flight) to the parameters of the
//! morphing navigation control: size, color, icon, and two opacity ramps.
//! It holds no state and performs no side effects; it exists so the visual
//! mapping is testable with no gesture plumbing at all.
//!
//! The label fades out faster than the icon fades in: the label is fully
//! transparent by 40% progress and the icon only starts appearing at 60%,
//! so there is always a brief all-transparent moment instead of an overlap.
//!
//! ```rust
//! use pageflow_affordance::{Icon, map};
//! use pageflow_pull::{Direction, PullState};
//! use pageflow_transition::TransitionPhase;
//!
//! let rest = map(PullState::ZERO, TransitionPhase::Idle, None);
//! assert_eq!(rest.label_opacity, 1.0);
//! assert_eq!(rest.icon_opacity, 0.0);
//!
//! let committed = map(
//!     PullState::new(200.0, Direction::Forward),
//!     TransitionPhase::Idle,
//!     None,
//! );
//! assert_eq!(committed.icon, Some(Icon::ArrowForward));
//! assert_eq!(committed.icon_opacity, 1.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use pageflow_pull::{Direction, PullState};
use pageflow_transition::TransitionPhase;

/// Diameter of the control at rest, logical pixels.
pub const REST_DIAMETER: f64 = 56.0;

/// Diameter of the control at full commit progress.
pub const COMMITTED_DIAMETER: f64 = 72.0;

/// Progress at which the resting label is fully faded out.
pub const LABEL_FADE_END: f64 = 0.4;

/// Progress at which the direction icon starts fading in.
pub const ICON_FADE_START: f64 = 0.6;

/// An sRGB color, no alpha (opacity is carried separately).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Channel-wise linear interpolation from `self` to `other` by `t`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "channel math stays in [0, 255] by construction"
        )]
        fn ch(a: u8, b: u8, t: f64) -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
        }
        let t = t.clamp(0.0, 1.0);
        Self {
            r: ch(self.r, other.r, t),
            g: ch(self.g, other.g, t),
            b: ch(self.b, other.b, t),
        }
    }
}

/// The control's resting color.
pub const REST_COLOR: Color = Color {
    r: 0x42,
    g: 0x46,
    b: 0x4e,
};

/// Target color for a forward pull.
pub const FORWARD_COLOR: Color = Color {
    r: 0x2e,
    g: 0xa4,
    b: 0x4f,
};

/// Target color for a backward pull.
pub const BACKWARD_COLOR: Color = Color {
    r: 0x2d,
    g: 0x6c,
    b: 0xdf,
};

/// Target color for a panel-reveal pull.
pub const REVEAL_COLOR: Color = Color {
    r: 0xd9,
    g: 0x8e,
    b: 0x04,
};

/// The icon shown as commit progress approaches 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Icon {
    /// Forward arrow.
    ArrowForward,
    /// Backward arrow.
    ArrowBackward,
    /// Side-panel glyph.
    Panel,
}

/// Everything the renderer needs to paint the morphing control.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VisualParams {
    /// Control diameter, interpolated by progress.
    pub diameter: f64,
    /// Control fill color, interpolated toward the direction's target.
    pub color: Color,
    /// The direction icon, if a direction is engaged.
    pub icon: Option<Icon>,
    /// Opacity of the resting label, fading out first.
    pub label_opacity: f64,
    /// Opacity of the direction icon, fading in last.
    pub icon_opacity: f64,
}

/// Maps the pull and transition phase to visual parameters.
///
/// While a transition is in flight (any non-idle phase) the live pull is
/// ignored and the mapping reads `confirmed` at full progress — the control
/// holds its committed form for the duration of the animation, whatever new
/// gesture input arrives meanwhile.
#[must_use]
pub fn map(
    pull: PullState,
    phase: TransitionPhase,
    confirmed: Option<Direction>,
) -> VisualParams {
    let (direction, progress) = if phase == TransitionPhase::Idle {
        (pull.direction, pull.progress())
    } else {
        (confirmed, 1.0)
    };

    let Some(direction) = direction else {
        return VisualParams {
            diameter: REST_DIAMETER,
            color: REST_COLOR,
            icon: None,
            label_opacity: 1.0,
            icon_opacity: 0.0,
        };
    };

    let (target_color, icon) = match direction {
        Direction::Forward => (FORWARD_COLOR, Icon::ArrowForward),
        Direction::Backward => (BACKWARD_COLOR, Icon::ArrowBackward),
        Direction::RevealPanel => (REVEAL_COLOR, Icon::Panel),
    };

    VisualParams {
        diameter: REST_DIAMETER + (COMMITTED_DIAMETER - REST_DIAMETER) * progress,
        color: REST_COLOR.lerp(target_color, progress),
        icon: Some(icon),
        label_opacity: (1.0 - progress / LABEL_FADE_END).max(0.0),
        icon_opacity: ((progress - ICON_FADE_START) / (1.0 - ICON_FADE_START)).clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulled(distance: f64, direction: Direction) -> VisualParams {
        map(
            PullState::new(distance, direction),
            TransitionPhase::Idle,
            None,
        )
    }

    #[test]
    fn rest_shows_label_only() {
        let params = map(PullState::ZERO, TransitionPhase::Idle, None);
        assert_eq!(params.diameter, REST_DIAMETER);
        assert_eq!(params.color, REST_COLOR);
        assert_eq!(params.icon, None);
        assert_eq!(params.label_opacity, 1.0);
        assert_eq!(params.icon_opacity, 0.0);
    }

    #[test]
    fn diameter_interpolates_with_progress() {
        // 60/120 = half progress.
        let params = pulled(60.0, Direction::Forward);
        assert_eq!(params.diameter, (REST_DIAMETER + COMMITTED_DIAMETER) / 2.0);
        let params = pulled(240.0, Direction::Forward);
        assert_eq!(params.diameter, COMMITTED_DIAMETER);
    }

    #[test]
    fn label_is_gone_before_the_icon_appears() {
        // Progress 0.5 sits in the all-transparent band.
        let params = pulled(60.0, Direction::Forward);
        assert_eq!(params.label_opacity, 0.0);
        assert_eq!(params.icon_opacity, 0.0);

        // Progress 0.25: label fading, icon still absent.
        let params = pulled(30.0, Direction::Forward);
        assert!(params.label_opacity > 0.0 && params.label_opacity < 1.0);
        assert_eq!(params.icon_opacity, 0.0);

        // Progress 0.8: label gone, icon fading in.
        let params = pulled(96.0, Direction::Forward);
        assert_eq!(params.label_opacity, 0.0);
        assert!(params.icon_opacity > 0.0 && params.icon_opacity < 1.0);
    }

    #[test]
    fn each_direction_has_its_own_target() {
        let f = pulled(120.0, Direction::Forward);
        let b = pulled(120.0, Direction::Backward);
        let r = pulled(120.0, Direction::RevealPanel);
        assert_eq!(f.icon, Some(Icon::ArrowForward));
        assert_eq!(b.icon, Some(Icon::ArrowBackward));
        assert_eq!(r.icon, Some(Icon::Panel));
        assert_ne!(f.color, b.color);
        assert_ne!(b.color, r.color);
        assert_ne!(f.color, r.color);
    }

    #[test]
    fn in_flight_phases_read_the_frozen_confirmation() {
        // A fresh gesture mid-transition must not change the control: the
        // live pull is ignored in favor of the confirmed direction.
        let live = PullState::new(10.0, Direction::Backward);
        let params = map(live, TransitionPhase::Exiting, Some(Direction::Forward));
        assert_eq!(params.icon, Some(Icon::ArrowForward));
        assert_eq!(params.icon_opacity, 1.0);
        assert_eq!(params.diameter, COMMITTED_DIAMETER);

        let params = map(live, TransitionPhase::Entering, Some(Direction::Forward));
        assert_eq!(params.icon, Some(Icon::ArrowForward));
    }

    #[test]
    fn color_lerp_endpoints_and_midpoint() {
        let a = Color { r: 0, g: 100, b: 200 };
        let b = Color { r: 100, g: 0, b: 200 };
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color { r: 50, g: 50, b: 200 });
    }
}
