// Copyright 2025 the Pageflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pageflow Navigator: the reusable facade over the navigation crates.
//!
//! A [`Navigator`] owns one loaded lesson and funnels every input modality —
//! pointer drags, wheel deltas, and imperative commands — into the single
//! pull model and the single-writer transition orchestrator. It is the one
//! type a host UI talks to:
//!
//! - input enters through [`pointer_down`](Navigator::pointer_down) /
//!   [`pointer_move`](Navigator::pointer_move) /
//!   [`pointer_up`](Navigator::pointer_up), [`wheel`](Navigator::wheel),
//!   and the imperative [`request_advance`](Navigator::request_advance) /
//!   [`request_back`](Navigator::request_back) /
//!   [`request_reveal_panel`](Navigator::request_reveal_panel) commands
//!   (identical guards either way);
//! - time enters through [`tick`](Navigator::tick), which drives the wheel
//!   idle decay and the animation phase machine and returns the edge events
//!   the host reacts to;
//! - the renderer reads [`current_page`](Navigator::current_page),
//!   [`position`](Navigator::position), [`pull`](Navigator::pull),
//!   [`phase`](Navigator::phase), [`panel_open`](Navigator::panel_open),
//!   and [`interstitial_pending`](Navigator::interstitial_pending).
//!
//! While a transition is in flight the published pull is *frozen*: producer
//! output is still collected, but [`pull`](Navigator::pull) holds the
//! confirmed commit until the exit animation zeroes it. Guard rejections
//! ("nothing happened") are the expected steady state and never surface as
//! errors.
//!
//! The lesson player and an authoring preview share this one type: what
//! differs is only the [`PageSource`] behind [`Navigator::load`] and whether
//! the host calls [`Navigator::persist_completion`] when the
//! [`TransitionEvent::LessonComplete`] event fires.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;
use pageflow_pull::{
    COMMIT_THRESHOLD, Direction, GestureClassifier, GestureUpdate, NavContext, PullState,
    ScrollEdges, WheelAccumulator, WheelAxis, WheelUpdate,
};
use pageflow_sequence::{Module, NavigationCursor, PageSequence, PageState, can_advance};
use pageflow_transition::{Events, TransitionEvent, TransitionOrchestrator, TransitionPhase};
use thiserror::Error;

/// Failure loading a lesson's page sequence.
///
/// Surfaced to the user as an empty/error state; never retried by the
/// navigator, and no partial sequence is ever shown.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The lesson does not exist.
    #[error("lesson not found")]
    NotFound,
    /// The content service could not be reached.
    #[error("network failure while loading lesson")]
    Network,
}

/// Failure persisting lesson completion. Logged and swallowed; local
/// navigation state remains the source of truth for "did the user finish".
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("completion could not be persisted: {0}")]
pub struct PersistError(pub String);

/// The content collaborator the navigator loads from.
///
/// The original interface is asynchronous; this trait is deliberately
/// synchronous and sans-io — hosts adapt (pre-resolve, block, or spawn) the
/// same way they supply timestamps instead of timers.
pub trait PageSource {
    /// The host's page type.
    type Page: PageState;

    /// Loads the module tree for `lesson_id`.
    fn load(&mut self, lesson_id: &str) -> Result<Vec<Module<Self::Page>>, LoadError>;
}

/// Where lesson completion is persisted. Fire-and-forget from the
/// navigator's point of view.
pub trait CompletionSink {
    /// Persists that `lesson_id` was completed.
    fn persist(&mut self, lesson_id: &str) -> Result<(), PersistError>;
}

/// The navigator facade for one loaded lesson.
#[derive(Clone, Debug)]
pub struct Navigator<P: PageState> {
    lesson_id: String,
    sequence: PageSequence<P>,
    orchestrator: TransitionOrchestrator,
    gesture: GestureClassifier,
    wheel: WheelAccumulator,
    pull: PullState,
    edges: ScrollEdges,
    completed: bool,
}

impl<P: PageState> Navigator<P> {
    /// Loads `lesson_id` from `source`, optionally seeding the cursor with a
    /// "start at page N" request (clamped into range).
    ///
    /// An `Err` is the host's cue for the error state; an `Ok` navigator
    /// over an empty sequence (see [`is_empty`](Self::is_empty)) is the cue
    /// for "nothing to display".
    pub fn load<S>(
        source: &mut S,
        lesson_id: &str,
        start_at: Option<usize>,
    ) -> Result<Self, LoadError>
    where
        S: PageSource<Page = P>,
    {
        let modules = source.load(lesson_id)?;
        Ok(Self::new(
            lesson_id,
            PageSequence::build(modules),
            start_at,
        ))
    }

    /// Creates a navigator over an already-built sequence (the authoring
    /// preview path).
    #[must_use]
    pub fn new(lesson_id: &str, sequence: PageSequence<P>, start_at: Option<usize>) -> Self {
        let cursor = NavigationCursor::new(sequence.len(), start_at);
        Self {
            lesson_id: String::from(lesson_id),
            sequence,
            orchestrator: TransitionOrchestrator::new(cursor),
            gesture: GestureClassifier::new(),
            wheel: WheelAccumulator::new(),
            pull: PullState::ZERO,
            edges: ScrollEdges::default(),
            completed: false,
        }
    }

    // ---- renderer-facing view ----------------------------------------

    /// The lesson this navigator is showing.
    #[must_use]
    pub fn lesson_id(&self) -> &str {
        &self.lesson_id
    }

    /// Whether there is nothing to display.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The current page, if the sequence is non-empty.
    #[must_use]
    pub fn current_page(&self) -> Option<&P> {
        self.sequence.page(self.orchestrator.index())
    }

    /// Mutable access to the current page, for the content layer to record
    /// answer changes.
    pub fn current_page_mut(&mut self) -> Option<&mut P> {
        self.sequence.page_mut(self.orchestrator.index())
    }

    /// Cursor position as `(index, total)`.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.orchestrator.index(), self.sequence.len())
    }

    /// The published pull. Frozen at the confirmed commit while a
    /// transition is in flight.
    #[must_use]
    pub fn pull(&self) -> PullState {
        self.pull
    }

    /// The transition phase.
    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.orchestrator.phase()
    }

    /// The direction confirmed at commit, while in flight.
    #[must_use]
    pub fn confirmed_direction(&self) -> Option<Direction> {
        self.orchestrator.confirmed_direction()
    }

    /// Whether the side panel is open.
    #[must_use]
    pub fn panel_open(&self) -> bool {
        self.orchestrator.panel_open()
    }

    /// The module boundary whose interstitial is showing, if any.
    #[must_use]
    pub fn interstitial_pending(&self) -> Option<usize> {
        self.orchestrator.interstitial_pending()
    }

    /// Whether the advance gate currently passes (for disabling an explicit
    /// "continue" control).
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.current_page().is_some_and(can_advance)
    }

    /// Whether a forward commit on the last page has signaled completion.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    // ---- input -------------------------------------------------------

    /// Reports the content viewport's current scroll edges.
    pub fn set_scroll_edges(&mut self, edges: ScrollEdges) {
        self.edges = edges;
    }

    /// A pointer went down at `position`. `widget_owned` marks a press
    /// inside an embedded interactive widget, which owns its own input.
    pub fn pointer_down(&mut self, position: Point, widget_owned: bool) {
        self.gesture.on_down(position, widget_owned);
    }

    /// A pointer moved. Returns whether this sample crossed the commit
    /// threshold and the commit was accepted; the transition's events then
    /// arrive from [`tick`](Self::tick).
    pub fn pointer_move(&mut self, position: Point, now: u64) -> bool {
        let ctx = self.nav_context();
        match self.gesture.on_move(position, ctx) {
            GestureUpdate::None => false,
            GestureUpdate::Pull(pull) => {
                self.publish(pull);
                false
            }
            GestureUpdate::Commit(direction) => self.try_commit(direction, now),
        }
    }

    /// The pointer went up, ending the gesture.
    pub fn pointer_up(&mut self) {
        if let GestureUpdate::Pull(zero) = self.gesture.on_up() {
            self.publish(zero);
        }
    }

    /// Whether the tap synthesized by the gesture that just ended must be
    /// swallowed (set when a drag commits). Clears on read.
    pub fn take_tap_suppression(&mut self) -> bool {
        self.gesture.take_tap_suppression()
    }

    /// A wheel event arrived. Returns whether this event pushed the
    /// accumulator over the commit threshold and the commit was accepted;
    /// the transition's events then arrive from [`tick`](Self::tick).
    pub fn wheel(&mut self, axis: WheelAxis, delta: f64, now: u64) -> bool {
        let ctx = self.nav_context();
        match self.wheel.on_wheel(axis, delta, ctx, now) {
            WheelUpdate::None => false,
            WheelUpdate::Pull(pull) => {
                self.publish(pull);
                false
            }
            WheelUpdate::Commit(direction) => self.try_commit(direction, now),
        }
    }

    // ---- imperative commands -----------------------------------------

    /// Explicit "continue" control. Identical guards as a forward gesture.
    /// Returns whether the commit was accepted.
    pub fn request_advance(&mut self, now: u64) -> bool {
        self.try_commit(Direction::Forward, now)
    }

    /// Explicit "back" control. Returns whether the commit was accepted.
    pub fn request_back(&mut self, now: u64) -> bool {
        self.try_commit(Direction::Backward, now)
    }

    /// Explicit panel-reveal control. Returns whether the commit was
    /// accepted.
    pub fn request_reveal_panel(&mut self, now: u64) -> bool {
        self.try_commit(Direction::RevealPanel, now)
    }

    /// Dismisses a showing module interstitial, performing the deferred
    /// page change.
    pub fn dismiss_interstitial(&mut self, now: u64) -> Events {
        self.orchestrator.dismiss_interstitial(now)
    }

    /// Closes the side panel (immediate, not animated).
    pub fn close_panel(&mut self) {
        self.orchestrator.close_panel();
    }

    // ---- time --------------------------------------------------------

    /// Observes the passage of time: wheel idle decay and animation phase
    /// edges. Returns the transition events that fired, in order.
    pub fn tick(&mut self, now: u64) -> Events {
        if let Some(zero) = self.wheel.tick(now) {
            self.publish(zero);
        }
        let events = self.orchestrator.tick(&self.sequence, now);
        self.apply(&events);
        events
    }

    /// Persists completion through `sink`, logging and swallowing failure.
    /// The completion UI proceeds regardless; local state is the source of
    /// truth for "did the user finish".
    pub fn persist_completion<S: CompletionSink>(&self, sink: &mut S) {
        if let Err(err) = sink.persist(&self.lesson_id) {
            log::warn!("completion not persisted for {}: {err}", self.lesson_id);
        }
    }

    // ---- internals ---------------------------------------------------

    fn nav_context(&self) -> NavContext {
        NavContext {
            edges: self.edges,
            can_advance: self.can_advance(),
            can_go_back: self.orchestrator.index() > 0,
            panel_open: self.orchestrator.panel_open(),
        }
    }

    /// Publishes a producer's pull unless a transition holds it frozen.
    fn publish(&mut self, pull: PullState) {
        if !self.orchestrator.is_transitioning() {
            self.pull = pull;
        }
    }

    fn try_commit(&mut self, direction: Direction, now: u64) -> bool {
        let accepted = self.orchestrator.commit(direction, &self.sequence, now);
        if accepted {
            // Freeze the published pull at the confirmed commit; it stays
            // there until the exit animation zeroes it.
            self.pull = PullState::new(COMMIT_THRESHOLD, direction);
        }
        accepted
    }

    fn apply(&mut self, events: &Events) {
        for event in events {
            match event {
                TransitionEvent::PullReset => self.pull = PullState::ZERO,
                TransitionEvent::LessonComplete => self.completed = true,
                _ => {}
            }
        }
    }
}
