// Copyright 2025 the Pageflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pageflow Transition: the phase machine that owns page changes.
//!
//! Exactly one component is allowed to mutate the current page index, and
//! this is it. [`TransitionOrchestrator`] sequences every committed
//! navigation through `Idle → Exiting → (model mutation) → Entering → Idle`,
//! with a module-interstitial sub-state that defers the mutation until the
//! user dismisses it. Input producers (drag classifier, wheel accumulator,
//! imperative commands) only *propose* commits; a proposal made while a
//! transition is in flight is silently ignored, which is defined behavior
//! rather than an error.
//!
//! The machine is sans-io: animation durations are fixed millisecond spans
//! measured against caller-supplied timestamps, and phase edges are observed
//! by calling [`tick`](TransitionOrchestrator::tick). This keeps the whole
//! sequence testable without real time passing.
//!
//! ```rust
//! use pageflow_pull::Direction;
//! use pageflow_sequence::{Module, NavigationCursor, PageKind, PageSequence, PageState};
//! use pageflow_transition::{EXIT_DURATION_MS, TransitionEvent, TransitionOrchestrator};
//!
//! #[derive(Clone)]
//! struct Page;
//! impl PageState for Page {
//!     fn kind(&self) -> PageKind {
//!         PageKind::Content
//!     }
//!     fn answer_state(&self) -> pageflow_sequence::AnswerState {
//!         pageflow_sequence::AnswerState::Unanswered
//!     }
//! }
//!
//! let seq = PageSequence::build([Module::new("m", vec![Page, Page])]);
//! let mut orch = TransitionOrchestrator::new(NavigationCursor::new(seq.len(), None));
//!
//! assert!(orch.commit(Direction::Forward, &seq, 1000));
//! // The index is untouched until the exit animation has run its course.
//! assert_eq!(orch.index(), 0);
//! let events = orch.tick(&seq, 1000 + EXIT_DURATION_MS);
//! assert!(events.contains(&TransitionEvent::PageChanged { index: 1 }));
//! assert_eq!(orch.index(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use pageflow_pull::Direction;
use pageflow_sequence::{NavigationCursor, PageSequence, PageState, can_advance};
use smallvec::SmallVec;

/// Duration of the exit animation, milliseconds. The single blocking step
/// before any model change.
pub const EXIT_DURATION_MS: u64 = 350;

/// Duration of the enter animation, milliseconds.
pub const ENTER_DURATION_MS: u64 = 380;

/// The externally visible transition phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    /// No transition in flight; the pull model is live.
    Idle,
    /// The outgoing page is animating away. No model mutation yet.
    Exiting,
    /// A module interstitial is showing; the index mutation is deferred
    /// until the user dismisses it.
    Interstitial,
    /// The incoming page (or panel) is animating in; the mutation has
    /// already happened.
    Entering,
}

/// Edge events emitted by [`TransitionOrchestrator::tick`] and
/// [`TransitionOrchestrator::dismiss_interstitial`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransitionEvent {
    /// The exit animation finished; the live pull must be zeroed now.
    PullReset,
    /// The cursor moved. The content layer should reset any per-page
    /// transient state it owns (selected answer, revealed explanation).
    PageChanged {
        /// The new current index.
        index: usize,
    },
    /// The side panel opened instead of a page change.
    PanelOpened,
    /// A forward commit crossed an unseen module boundary; the interstitial
    /// sub-state has been entered.
    InterstitialDue {
        /// The boundary index the interstitial belongs to.
        boundary: usize,
    },
    /// A forward commit fired on the last page: the lesson is complete. No
    /// index mutation happens; the host persists completion and closes.
    LessonComplete,
    /// The enter animation finished; the machine is idle again.
    Finished,
}

/// Events produced by one phase edge. Never more than a handful.
pub type Events = SmallVec<[TransitionEvent; 4]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Exiting { deadline: u64 },
    Interstitial { boundary: usize },
    Entering { deadline: u64 },
}

/// The single writer of navigation state.
///
/// Owns the [`NavigationCursor`], the panel-open flag, the phase, and the
/// direction confirmed at commit time. The confirmed direction is captured
/// once and decoupled from the live pull, so a new gesture starting during
/// the exit animation cannot corrupt an in-flight transition.
#[derive(Clone, Debug)]
pub struct TransitionOrchestrator {
    cursor: NavigationCursor,
    panel_open: bool,
    phase: Phase,
    confirmed: Option<Direction>,
}

impl TransitionOrchestrator {
    /// Creates an idle orchestrator over `cursor`.
    #[must_use]
    pub fn new(cursor: NavigationCursor) -> Self {
        Self {
            cursor,
            panel_open: false,
            phase: Phase::Idle,
            confirmed: None,
        }
    }

    /// The current page index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.cursor.index()
    }

    /// The owned cursor.
    #[must_use]
    pub fn cursor(&self) -> &NavigationCursor {
        &self.cursor
    }

    /// Whether the side panel is open.
    #[must_use]
    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Closes the side panel. Immediate, not animated, and independent of
    /// the phase machine, so RevealPanel becomes commit-able again.
    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    /// The externally visible phase.
    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        match self.phase {
            Phase::Idle => TransitionPhase::Idle,
            Phase::Exiting { .. } => TransitionPhase::Exiting,
            Phase::Interstitial { .. } => TransitionPhase::Interstitial,
            Phase::Entering { .. } => TransitionPhase::Entering,
        }
    }

    /// Whether a transition is in flight. The one narrow accessor every
    /// input handler queries; there is no side-channel flag.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// The direction confirmed at commit, present from commit until the
    /// machine returns to idle.
    #[must_use]
    pub fn confirmed_direction(&self) -> Option<Direction> {
        self.confirmed
    }

    /// The boundary whose interstitial is currently showing, if any.
    #[must_use]
    pub fn interstitial_pending(&self) -> Option<usize> {
        match self.phase {
            Phase::Interstitial { boundary } => Some(boundary),
            _ => None,
        }
    }

    /// Proposes a commit toward `direction` at time `now`.
    ///
    /// Returns false — with no other effect — if a transition is already in
    /// flight or the direction's guard fails. Guards here re-check what the
    /// classifiers already checked: forward requires the advance gate (and a
    /// non-empty sequence), backward requires a previous page, reveal
    /// requires a closed panel.
    pub fn commit<P: PageState>(
        &mut self,
        direction: Direction,
        sequence: &PageSequence<P>,
        now: u64,
    ) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        let permitted = match direction {
            Direction::Forward => sequence
                .page(self.cursor.index())
                .is_some_and(|page| can_advance(page)),
            Direction::Backward => !self.cursor.at_start(),
            Direction::RevealPanel => !self.panel_open,
        };
        if !permitted {
            return false;
        }
        self.confirmed = Some(direction);
        self.phase = Phase::Exiting {
            deadline: now + EXIT_DURATION_MS,
        };
        true
    }

    /// Advances the machine against the clock. Call whenever time passes;
    /// returns the edge events that fired, in order.
    pub fn tick<P: PageState>(&mut self, sequence: &PageSequence<P>, now: u64) -> Events {
        let mut events = Events::new();
        match self.phase {
            Phase::Exiting { deadline } if now >= deadline => {
                events.push(TransitionEvent::PullReset);
                self.finish_exit(sequence, now, &mut events);
            }
            Phase::Entering { deadline } if now >= deadline => {
                self.phase = Phase::Idle;
                self.confirmed = None;
                events.push(TransitionEvent::Finished);
            }
            _ => {}
        }
        events
    }

    /// Dismisses the showing interstitial, performing the deferred index
    /// mutation and starting the enter animation. No-op in any other phase.
    pub fn dismiss_interstitial(&mut self, now: u64) -> Events {
        let mut events = Events::new();
        if let Phase::Interstitial { boundary } = self.phase {
            self.cursor.mark_interstitial_seen(boundary);
            self.cursor.advance();
            events.push(TransitionEvent::PageChanged {
                index: self.cursor.index(),
            });
            self.phase = Phase::Entering {
                deadline: now + ENTER_DURATION_MS,
            };
        }
        events
    }

    /// The exit animation completed: branch on the confirmed direction.
    fn finish_exit<P: PageState>(
        &mut self,
        sequence: &PageSequence<P>,
        now: u64,
        events: &mut Events,
    ) {
        let direction = self.confirmed.expect("exiting implies a confirmed direction");
        let index = self.cursor.index();

        if direction == Direction::Forward && self.cursor.at_end() {
            // Lesson complete: no index mutation, no enter animation. The
            // host persists and closes.
            self.phase = Phase::Idle;
            self.confirmed = None;
            events.push(TransitionEvent::LessonComplete);
            return;
        }

        if direction == Direction::Forward
            && sequence.is_module_boundary(index)
            && !self.cursor.interstitial_seen(index)
        {
            self.phase = Phase::Interstitial { boundary: index };
            events.push(TransitionEvent::InterstitialDue { boundary: index });
            return;
        }

        match direction {
            Direction::Forward => {
                self.cursor.advance();
                events.push(TransitionEvent::PageChanged {
                    index: self.cursor.index(),
                });
            }
            Direction::Backward => {
                self.cursor.retreat();
                events.push(TransitionEvent::PageChanged {
                    index: self.cursor.index(),
                });
            }
            Direction::RevealPanel => {
                self.panel_open = true;
                events.push(TransitionEvent::PanelOpened);
            }
        }
        self.phase = Phase::Entering {
            deadline: now + ENTER_DURATION_MS,
        };
    }
}
