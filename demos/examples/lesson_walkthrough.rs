// Copyright 2025 the Pageflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walks a three-page lesson through the navigator with simulated input:
//! a drag that falls short and snaps back, wheel ticks that accumulate to a
//! commit, a gated quiz, a module interstitial, and final completion.

use kurbo::Point;
use pageflow_affordance::map;
use pageflow_navigator::{CompletionSink, Navigator, PageSource, PersistError};
use pageflow_pull::{ScrollEdges, WheelAxis};
use pageflow_sequence::{AnswerState, Module, PageKind, PageState};
use pageflow_transition::{ENTER_DURATION_MS, EXIT_DURATION_MS, TransitionEvent};

#[derive(Clone, Debug)]
enum Page {
    Content(&'static str),
    Quiz(AnswerState),
}

impl PageState for Page {
    fn kind(&self) -> PageKind {
        match self {
            Page::Content(_) => PageKind::Content,
            Page::Quiz(_) => PageKind::Quiz,
        }
    }
    fn answer_state(&self) -> AnswerState {
        match self {
            Page::Content(_) => AnswerState::Unanswered,
            Page::Quiz(state) => *state,
        }
    }
}

struct DemoLibrary;

impl PageSource for DemoLibrary {
    type Page = Page;
    fn load(
        &mut self,
        _lesson_id: &str,
    ) -> Result<Vec<Module<Page>>, pageflow_navigator::LoadError> {
        Ok(vec![
            Module::new(
                "Fractions",
                vec![
                    Page::Content("What a fraction is"),
                    Page::Quiz(AnswerState::Unanswered),
                ],
            ),
            Module::new("Decimals", vec![Page::Content("From fractions to decimals")]),
        ])
    }
}

struct Console;

impl CompletionSink for Console {
    fn persist(&mut self, lesson_id: &str) -> Result<(), PersistError> {
        println!("  [persisted completion of {lesson_id}]");
        Ok(())
    }
}

fn report(nav: &Navigator<Page>) {
    let (index, total) = nav.position();
    let control = map(nav.pull(), nav.phase(), nav.confirmed_direction());
    println!(
        "  page {}/{} phase {:?} pull {:>5.1} control {:.0}px {:?}",
        index + 1,
        total,
        nav.phase(),
        nav.pull().distance,
        control.diameter,
        control.icon,
    );
}

fn settle(nav: &mut Navigator<Page>, start: u64) {
    for event in nav.tick(start + EXIT_DURATION_MS) {
        println!("  event: {event:?}");
    }
    for event in nav.tick(start + EXIT_DURATION_MS + ENTER_DURATION_MS) {
        println!("  event: {event:?}");
    }
}

fn main() {
    let mut nav = Navigator::load(&mut DemoLibrary, "fractions-101", None).unwrap();
    nav.set_scroll_edges(ScrollEdges::default());

    println!("A drag that falls short of the threshold snaps back:");
    nav.pointer_down(Point::new(200.0, 400.0), false);
    nav.pointer_move(Point::new(110.0, 400.0), 0);
    report(&nav);
    nav.pointer_up();
    report(&nav);

    println!("Wheel ticks accumulate into a forward commit:");
    let mut now = 1_000;
    while nav.phase() == pageflow_transition::TransitionPhase::Idle {
        nav.wheel(WheelAxis::Vertical, 50.0, now);
        report(&nav);
        now += 100;
    }
    settle(&mut nav, now - 100);
    report(&nav);

    println!("The quiz gates forward motion until answered correctly:");
    nav.request_advance(10_000);
    report(&nav);
    *nav.current_page_mut().unwrap() = Page::Quiz(AnswerState::Correct);
    nav.request_advance(11_000);
    let events = nav.tick(11_000 + EXIT_DURATION_MS);
    for event in &events {
        println!("  event: {event:?}");
    }
    if events.contains(&TransitionEvent::InterstitialDue { boundary: 1 }) {
        println!("Module interstitial, dismissed by the user:");
        nav.dismiss_interstitial(12_000);
        nav.tick(12_000 + ENTER_DURATION_MS);
        report(&nav);
    }

    println!("Forward on the last page completes the lesson:");
    nav.request_advance(20_000);
    for event in nav.tick(20_000 + EXIT_DURATION_MS) {
        println!("  event: {event:?}");
    }
    if nav.completed() {
        nav.persist_completion(&mut Console);
    }
}
