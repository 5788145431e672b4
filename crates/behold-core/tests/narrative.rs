//! Narrative integration tests
//!
//! Drives whole sessions through the public API: captures, presentation
//! sequences, headline resolution and the stage machine.

use behold_core::capture::CaptureWindow;
use behold_core::{
    BeholdConfig, CaptureOutcome, EventKind, IgnoreReason, SeedPolicy, Session, SimulationState,
    TvDisplay, Vec2,
};
use behold_events::{GamePhase, HeadlineResult, Mood, NarrativeStage, PresentationPhase, Shape};

const FRAME_MS: u32 = 16;

fn recruit_config() -> BeholdConfig {
    let mut config = BeholdConfig::default();
    config.narrative.seed_policy = SeedPolicy::Recruit;
    config
}

fn playing(config: BeholdConfig, seed: u64) -> Session {
    let mut session = Session::new(config, seed);
    assert!(session.start());
    session
}

/// Answers every outstanding headline request with a generated headline.
fn resolve_all(session: &mut Session) {
    for request in session.take_headline_requests() {
        session.resolve_headline(
            request.session_id,
            request.capture_id,
            HeadlineResult::generated(format!("headline {}", request.capture_id)),
        );
    }
}

/// Runs frames until the presentation sequence is idle again.
fn finish_presentation(session: &mut Session) {
    resolve_all(session);
    let mut guard = 0;
    while session.presentation() != PresentationPhase::Idle {
        session.frame(FRAME_MS);
        guard += 1;
        assert!(guard < 10_000, "presentation never finished");
    }
}

fn centre_of(session: &Session, id: u64) -> Vec2 {
    let size = session.config().population.peep_size;
    session.state().get(id).expect("peep exists").center(size)
}

fn empty_spot(session: &Session) -> Vec2 {
    let config = session.config();
    let half = config.capture.window_size / 2.0;
    let mut y = half;
    while y <= config.arena.height - half {
        let mut x = half;
        while x <= config.arena.width - half {
            let pointer = Vec2::new(x, y);
            let window = CaptureWindow::centered_on(pointer, config.capture.window_size);
            if !session
                .state()
                .peeps
                .iter()
                .any(|p| window.captures(p, config.population.peep_size))
            {
                return pointer;
            }
            x += 8.0;
        }
        y += 8.0;
    }
    panic!("no empty spot in the arena");
}

/// Runs the simulation until some peep matches, returning its id.
fn wait_for(session: &mut Session, predicate: impl Fn(&behold_core::Peep) -> bool) -> u64 {
    for _ in 0..500_000 {
        if let Some(id) = session.state().first_where(&predicate) {
            return id;
        }
        session.frame(FRAME_MS);
    }
    panic!("no peep ever matched in stage {}", session.stage());
}

fn capture_accepted(session: &mut Session, pointer: Vec2) {
    let outcome = session.capture_at(pointer);
    assert!(
        outcome.is_accepted(),
        "capture in {} was {:?}",
        session.stage(),
        outcome
    );
}

fn advance_past_start(session: &mut Session) {
    let spot = empty_spot(session);
    capture_accepted(session, spot);
    finish_presentation(session);
}

#[test]
fn test_start_capture_of_empty_space() {
    let mut session = playing(BeholdConfig::default(), 42);

    advance_past_start(&mut session);

    assert_eq!(session.stage(), NarrativeStage::AwaitCricket);
    assert_eq!(session.feed().len(), 1);
    assert_eq!(session.feed()[0].stage, NarrativeStage::Start);
    assert!(session.feed()[0].captured_peeps.is_empty());
    let tagged = session.state().ids_where(|p| p.event_kind() == Some(EventKind::Cricket));
    assert_eq!(tagged.len(), 1);
}

#[test]
fn test_population_frozen_until_sequence_completes() {
    let mut session = playing(BeholdConfig::default(), 7);
    let spot = empty_spot(&session);
    capture_accepted(&mut session, spot);
    resolve_all(&mut session);

    let before: SimulationState = session.state().clone();
    while session.presentation() != PresentationPhase::ZoomOut {
        session.frame(FRAME_MS);
        assert_eq!(session.state(), &before);
    }
    // last ZoomOut frames still leave the arena alone
    while session.presentation() == PresentationPhase::ZoomOut {
        let report = session.frame(FRAME_MS);
        if report.effect.is_none() {
            assert_eq!(session.state(), &before);
        }
    }
    assert_ne!(session.state(), &before);
}

#[test]
fn test_irrelevant_capture_changes_nothing() {
    let mut session = playing(BeholdConfig::default(), 42);
    advance_past_start(&mut session);

    let state = session.state().clone();
    let feed = session.feed().to_vec();
    let spot = empty_spot(&session);

    assert_eq!(
        session.capture_at(spot),
        CaptureOutcome::Ignored(IgnoreReason::PredicateFailed)
    );
    assert_eq!(session.state(), &state);
    assert_eq!(session.feed(), feed.as_slice());
    assert_eq!(session.stage(), NarrativeStage::AwaitCricket);
    assert_eq!(session.presentation(), PresentationPhase::Idle);
    assert!(session.take_headline_requests().is_empty());
}

#[test]
fn test_cricket_capture_spreads_anger_and_hats() {
    let mut session = playing(BeholdConfig::default(), 42);
    advance_past_start(&mut session);

    let cricket = session
        .state()
        .event_holder(EventKind::Cricket)
        .map(|p| p.id)
        .expect("cricket seeded");
    let pointer = centre_of(&session, cricket);
    capture_accepted(&mut session, pointer);
    assert_eq!(session.stage(), NarrativeStage::AwaitHatHate);
    finish_presentation(&mut session);

    let state = session.state();
    assert_eq!(state.get(cricket).map(|p| p.mood), Some(Mood::Angry));
    // the hat goes to the first square still Normal after the spread
    let hatted = state.peeps.iter().any(|p| p.shape == Shape::Square && p.has_hat);
    let calm_square = state
        .peeps
        .iter()
        .any(|p| p.shape == Shape::Square && p.mood == Mood::Normal);
    assert!(hatted || !calm_square);
    assert!(state.count_mood(Mood::Angry) >= 1);
    assert!(state.event_holder(EventKind::Cricket).is_none());
}

#[test]
fn test_no_second_capture_while_presenting() {
    let mut session = playing(BeholdConfig::default(), 11);
    let spot = empty_spot(&session);
    capture_accepted(&mut session, spot);

    while session.presentation() != PresentationPhase::Idle {
        assert_eq!(
            session.capture_at(spot),
            CaptureOutcome::Ignored(IgnoreReason::Busy)
        );
        session.frame(FRAME_MS);
    }
    assert_eq!(session.take_headline_requests().len(), 1);
    assert!(session.pending_mutation().is_none());
}

#[test]
fn test_tv_binds_post_resolved_before_zoom_in() {
    let mut session = playing(BeholdConfig::default(), 3);
    let spot = empty_spot(&session);
    capture_accepted(&mut session, spot);
    resolve_all(&mut session);

    assert_eq!(session.tv(), &TvDisplay::Blank);
    while session.presentation() != PresentationPhase::ZoomIn {
        session.frame(FRAME_MS);
    }
    assert_eq!(session.tv(), &TvDisplay::Post(session.feed()[0].id.clone()));
}

#[test]
fn test_full_story_reaches_ending_under_recruit() {
    let mut session = playing(recruit_config(), 42);
    let mut judged = Vec::new();

    // Start
    let spot = empty_spot(&session);
    judged.push(session.stage());
    capture_accepted(&mut session, spot);
    finish_presentation(&mut session);

    // AwaitCricket
    let cricket = wait_for(&mut session, |p| p.event_kind() == Some(EventKind::Cricket));
    judged.push(session.stage());
    let pointer = centre_of(&session, cricket);
    capture_accepted(&mut session, pointer);
    finish_presentation(&mut session);

    // AwaitHatHate
    let follower = wait_for(&mut session, |p| p.event_kind() == Some(EventKind::HatHate));
    judged.push(session.stage());
    let pointer = centre_of(&session, follower);
    capture_accepted(&mut session, pointer);
    finish_presentation(&mut session);

    // AwaitViolence and AwaitSquareAnger both wait for someone to fall
    for _ in 0..2 {
        let fallen = wait_for(&mut session, |p| p.mood == Mood::Fallen);
        judged.push(session.stage());
        let pointer = centre_of(&session, fallen);
        capture_accepted(&mut session, pointer);
        finish_presentation(&mut session);
    }

    // AwaitMassViolence
    assert_eq!(session.stage(), NarrativeStage::AwaitMassViolence);
    assert!(session
        .state()
        .peeps
        .iter()
        .all(|p| p.mood == Mood::Angry && p.event_kind() == Some(EventKind::MassViolence)));
    let angry = wait_for(&mut session, |p| p.mood == Mood::Angry);
    judged.push(session.stage());
    let pointer = centre_of(&session, angry);
    capture_accepted(&mut session, pointer);

    assert_eq!(
        judged,
        vec![
            NarrativeStage::Start,
            NarrativeStage::AwaitCricket,
            NarrativeStage::AwaitHatHate,
            NarrativeStage::AwaitViolence,
            NarrativeStage::AwaitSquareAnger,
            NarrativeStage::AwaitMassViolence,
        ]
    );
    assert_eq!(session.stage(), NarrativeStage::End);

    // Ending lands exactly 4000 ms after judging, whatever the player does.
    resolve_all(&mut session);
    for _ in 0..399 {
        session.frame(10);
        let _ = session.capture_at(pointer);
        assert_eq!(session.phase(), GamePhase::Playing);
    }
    let report = session.frame(10);
    assert_eq!(report.phase_change, Some(GamePhase::Ending));
    assert_eq!(session.phase(), GamePhase::Ending);
    assert_eq!(session.feed().len(), 6);

    // No capture counts once the story is over.
    assert_eq!(
        session.capture_at(pointer),
        CaptureOutcome::Ignored(IgnoreReason::NotPlaying)
    );

    // Ending, final message, then a fresh start.
    assert!(session.acknowledge());
    assert_eq!(session.phase(), GamePhase::FinalMessage);
    for _ in 0..250 {
        session.frame(FRAME_MS);
    }
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.stage(), NarrativeStage::Start);
    assert!(session.feed().is_empty());
    assert!(session.show_instruction());
}

#[test]
fn test_stale_headline_after_reset_is_ignored() {
    let mut session = playing(BeholdConfig::default(), 8);
    let spot = empty_spot(&session);
    capture_accepted(&mut session, spot);
    let request = session.take_headline_requests().remove(0);

    session.reset();

    let outcome = session.resolve_headline(
        request.session_id,
        request.capture_id,
        HeadlineResult::generated("late"),
    );
    assert_eq!(outcome, behold_core::ResolveOutcome::Stale);
    assert!(session.feed().is_empty());
    assert_eq!(session.stage(), NarrativeStage::Start);
    assert_eq!(session.presentation(), PresentationPhase::Idle);
}

#[test]
fn test_population_never_overlaps_tv() {
    let config = BeholdConfig::default();
    let tv = config.arena.tv_box();

    for seed in 0..20 {
        let mut session = playing(config.clone(), seed);
        for frame in 0..600 {
            if frame % 100 == 0 {
                for peep in &session.state().peeps {
                    assert!(!peep.footprint(config.population.peep_size).overlaps(&tv));
                }
            }
            session.frame(FRAME_MS);
        }
    }
}
