// Copyright 2025 the Pageflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pageflow Sequence: the linear page model behind a paginated content view.
//!
//! This crate flattens a tree of named modules into one zero-indexed strip of
//! pages and answers the structural questions the rest of the navigator asks:
//!
//! - [`PageSequence`]: the immutable-per-load flattening, with the index of
//!   each module's last page recorded as a *module boundary*.
//! - [`can_advance`]: the rule gating forward navigation on quiz answers.
//! - [`NavigationCursor`]: the mutable position within a sequence, including
//!   which module interstitials have already been shown.
//!
//! Pages themselves are owned by the host's content layer; this crate is
//! generic over the page payload and only reads it through [`PageState`].
//!
//! ## Minimal example
//!
//! ```rust
//! use pageflow_sequence::{
//!     AnswerState, Module, PageKind, PageSequence, PageState, can_advance,
//! };
//!
//! #[derive(Clone, Debug)]
//! enum Page {
//!     Content,
//!     Quiz(AnswerState),
//! }
//!
//! impl PageState for Page {
//!     fn kind(&self) -> PageKind {
//!         match self {
//!             Page::Content => PageKind::Content,
//!             Page::Quiz(_) => PageKind::Quiz,
//!         }
//!     }
//!     fn answer_state(&self) -> AnswerState {
//!         match self {
//!             Page::Content => AnswerState::Unanswered,
//!             Page::Quiz(state) => *state,
//!         }
//!     }
//! }
//!
//! let seq = PageSequence::build([
//!     Module::new("Intro", vec![Page::Content, Page::Content]),
//!     Module::new("Check", vec![Page::Quiz(AnswerState::Unanswered)]),
//! ]);
//!
//! assert_eq!(seq.len(), 3);
//! // Index 1 ends the first module and is not the final page.
//! assert!(seq.is_module_boundary(1));
//! // The final page never triggers an interstitial; it triggers completion.
//! assert!(!seq.is_module_boundary(2));
//! // An unanswered quiz blocks forward motion.
//! assert!(!can_advance(seq.page(2).unwrap()));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashSet;
use smallvec::SmallVec;

/// The kind of a page, as far as navigation cares.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// Ordinary content; never blocks forward motion.
    Content,
    /// A quiz; blocks forward motion until answered correctly.
    Quiz,
}

/// Answer state of a quiz page.
///
/// Meaningless for [`PageKind::Content`] pages; implementations may return
/// any value for them since [`can_advance`] never consults it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnswerState {
    /// No answer submitted yet.
    Unanswered,
    /// The last submitted answer was correct.
    Correct,
    /// The last submitted answer was incorrect.
    Incorrect,
}

/// Read-only view of a page, implemented by the host's content type.
///
/// The navigator never inspects page content; these two properties are the
/// entirety of its interest in a page.
pub trait PageState {
    /// The page's kind.
    fn kind(&self) -> PageKind;
    /// The page's answer state. Only consulted for [`PageKind::Quiz`].
    fn answer_state(&self) -> AnswerState;
}

/// Whether forward navigation away from `page` is currently permitted.
///
/// True for any non-quiz page; for a quiz, true iff the answer is
/// [`AnswerState::Correct`]. Consulted by the gesture classifier before it
/// will classify input as forward, by the transition orchestrator as a
/// defensive re-check at commit, and by renderers to disable an explicit
/// "continue" control.
#[must_use]
pub fn can_advance<P: PageState>(page: &P) -> bool {
    match page.kind() {
        PageKind::Content => true,
        PageKind::Quiz => page.answer_state() == AnswerState::Correct,
    }
}

/// A named group of pages, the unit the content layer authors in.
#[derive(Clone, Debug)]
pub struct Module<P> {
    /// Display name of the module.
    pub name: String,
    /// Pages in authored order. May be empty; empty modules contribute no
    /// pages and no boundary.
    pub pages: Vec<P>,
}

impl<P> Module<P> {
    /// Creates a module from a name and its pages.
    pub fn new(name: impl Into<String>, pages: Vec<P>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }
}

/// An ordered, immutable-per-load flattening of modules into one page strip.
///
/// Built once per lesson load. Records, for each non-empty module, the index
/// of its last page (its *boundary*). Boundaries are strictly increasing by
/// construction.
#[derive(Clone, Debug)]
pub struct PageSequence<P> {
    pages: Vec<P>,
    boundaries: SmallVec<[usize; 8]>,
}

impl<P> PageSequence<P> {
    /// Flattens `modules` in order, pages in authored order within each.
    ///
    /// An empty tree yields an empty sequence; callers must treat that as
    /// "nothing to display", not as a degenerate single page.
    #[must_use]
    pub fn build(modules: impl IntoIterator<Item = Module<P>>) -> Self {
        let mut pages = Vec::new();
        let mut boundaries = SmallVec::new();
        for module in modules {
            if module.pages.is_empty() {
                continue;
            }
            pages.extend(module.pages);
            boundaries.push(pages.len() - 1);
        }
        Self { pages, boundaries }
    }

    /// Number of pages in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the sequence has no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// The page at `index`, if in range.
    #[must_use]
    pub fn page(&self, index: usize) -> Option<&P> {
        self.pages.get(index)
    }

    /// Mutable access to the page at `index`, for the content layer to
    /// record answer-state changes. The sequence's shape never changes.
    pub fn page_mut(&mut self, index: usize) -> Option<&mut P> {
        self.pages.get_mut(index)
    }

    /// The recorded module boundaries, strictly increasing.
    #[must_use]
    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    /// Whether `index` is the last page of a module *and* not the final page
    /// of the whole sequence. The final page triggers lesson completion, not
    /// a module interstitial, so it is never a boundary here.
    #[must_use]
    pub fn is_module_boundary(&self, index: usize) -> bool {
        !self.pages.is_empty()
            && index != self.pages.len() - 1
            && self.boundaries.binary_search(&index).is_ok()
    }

    /// Which module (by position in build order, counting only non-empty
    /// modules) the page at `index` belongs to, if in range.
    #[must_use]
    pub fn module_of(&self, index: usize) -> Option<usize> {
        if index >= self.pages.len() {
            return None;
        }
        Some(match self.boundaries.binary_search(&index) {
            Ok(m) | Err(m) => m,
        })
    }
}

/// The mutable position within a [`PageSequence`].
///
/// Created when a lesson is opened, optionally seeded with a "start at page
/// N" request (clamped into range), destroyed when the lesson view closes.
/// Only the transition orchestrator advances it; every other component reads.
#[derive(Clone, Debug)]
pub struct NavigationCursor {
    index: usize,
    len: usize,
    seen_interstitials: HashSet<usize>,
}

impl NavigationCursor {
    /// Creates a cursor over `len` pages, starting at `start_at` clamped to
    /// `[0, len)` (index 0 for an empty sequence).
    #[must_use]
    pub fn new(len: usize, start_at: Option<usize>) -> Self {
        let index = match start_at {
            Some(n) if len > 0 => n.min(len - 1),
            _ => 0,
        };
        Self {
            index,
            len,
            seen_interstitials: HashSet::new(),
        }
    }

    /// The current page index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the cursor is on the first page.
    #[must_use]
    pub fn at_start(&self) -> bool {
        self.index == 0
    }

    /// Whether the cursor is on the last page (true for an empty sequence).
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.len == 0 || self.index == self.len - 1
    }

    /// Moves one page forward. Callers must have checked [`Self::at_end`].
    pub fn advance(&mut self) {
        debug_assert!(!self.at_end(), "advance past the last page");
        self.index += 1;
    }

    /// Moves one page back. Callers must have checked [`Self::at_start`].
    pub fn retreat(&mut self) {
        debug_assert!(!self.at_start(), "retreat past the first page");
        self.index -= 1;
    }

    /// Records that the interstitial for `boundary` has been shown.
    pub fn mark_interstitial_seen(&mut self, boundary: usize) {
        self.seen_interstitials.insert(boundary);
    }

    /// Whether the interstitial for `boundary` has already been shown.
    #[must_use]
    pub fn interstitial_seen(&self, boundary: usize) -> bool {
        self.seen_interstitials.contains(&boundary)
    }
}
