//! Session
//!
//! A [`Session`] owns everything one playthrough needs: the population, the
//! current narrative stage, the presentation sequencer, the feed and the
//! screen timers. It is a synchronous state machine advanced by
//! [`Session::frame`]; headline generation happens outside, through the
//! request outbox and [`Session::resolve_headline`].

use std::collections::BTreeMap;

use behold_events::{
    generate_post_id, CaptureImage, CapturedPeep, GamePhase, HeadlineRequest, HeadlineResult,
    NarrativeStage, NewsPost, PresentationPhase,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capture::{frame_capture, Snapshot};
use crate::components::geometry::Vec2;
use crate::components::peep::PeepIdAllocator;
use crate::config::BeholdConfig;
use crate::narrative::{
    apply_stage_effect, capture_satisfies, hint_for, prompt_for, EffectReport, PendingMutation,
};
use crate::presentation::{Sequencer, TvDisplay};
use crate::setup::create_initial_population;
use crate::state::SimulationState;
use crate::systems::{self, TickReport};
use crate::SimRng;

/// Why a capture was ignored. Ignored captures change nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Title, ending or final message screen is up
    NotPlaying,
    /// A presentation sequence is still running
    Busy,
    /// The frame does not satisfy the current stage
    PredicateFailed,
}

/// A capture accepted for the current stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureReceipt {
    pub capture_id: u64,
    /// Stage the capture was judged against
    pub stage: NarrativeStage,
    /// Stage the session moved on to
    pub next_stage: NarrativeStage,
    pub captured: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Accepted(CaptureReceipt),
    Ignored(IgnoreReason),
}

impl CaptureOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CaptureOutcome::Accepted(_))
    }
}

/// Result of handing a headline back to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// A post with this id was added to the feed
    Posted(String),
    /// The request belongs to an earlier session or was already resolved
    Stale,
}

/// Transient headline-service notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    pub remaining_ms: u32,
}

/// What happened during one call to [`Session::frame`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub tick: Option<TickReport>,
    pub entered: Vec<PresentationPhase>,
    pub effect: Option<EffectReport>,
    /// Game phase change made by a timer this frame
    pub phase_change: Option<GamePhase>,
}

/// End-of-run statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub seed: u64,
    pub phase: GamePhase,
    pub stage: NarrativeStage,
    pub elapsed_ms: u64,
    pub population: usize,
    pub posts: usize,
    pub captures_accepted: u64,
    pub captures_ignored: u64,
    pub fallback_headlines: u64,
    pub resets: u64,
}

/// Capture whose headline has not come back yet
#[derive(Debug, Clone)]
struct UnresolvedCapture {
    stage: NarrativeStage,
    image: CaptureImage,
    peeps: Vec<CapturedPeep>,
}

/// Builds a session generation id from the session RNG.
fn generation_id(rng: &mut SmallRng) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

/// Counts a timer down by `dt_ms`. Returns true the frame it expires.
fn run_timer(timer: &mut Option<u32>, dt_ms: u32) -> bool {
    match timer {
        Some(remaining) => {
            *remaining = remaining.saturating_sub(dt_ms);
            if *remaining == 0 {
                *timer = None;
                true
            } else {
                false
            }
        }
        None => false,
    }
}

pub struct Session {
    config: BeholdConfig,
    seed: u64,
    rng: SimRng,
    ids: PeepIdAllocator,
    generation: Uuid,
    phase: GamePhase,
    stage: NarrativeStage,
    state: SimulationState,
    sequencer: Sequencer,
    /// Newest post first
    feed: Vec<NewsPost>,
    tv: TvDisplay,
    /// Capture currently being presented
    on_air: Option<u64>,
    unresolved: BTreeMap<u64, UnresolvedCapture>,
    outbox: Vec<HeadlineRequest>,
    notice: Option<Notice>,
    pointer: Vec2,
    ending_timer: Option<u32>,
    final_timer: Option<u32>,
    capture_seq: u64,
    elapsed_ms: u64,
    captures_accepted: u64,
    captures_ignored: u64,
    fallback_headlines: u64,
    resets: u64,
}

impl Session {
    /// Creates a session on the title screen with a freshly spawned arena.
    pub fn new(config: BeholdConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut ids = PeepIdAllocator::new();
        let generation = generation_id(&mut rng);
        let (state, _) =
            create_initial_population(&config.arena, &config.population, &mut ids, &mut rng);
        let sequencer = Sequencer::new(config.presentation.clone());

        tracing::info!(%generation, seed, peeps = state.len(), "session created");

        Self {
            pointer: Vec2::new(config.arena.width / 2.0, config.arena.height / 2.0),
            config,
            seed,
            rng: SimRng(rng),
            ids,
            generation,
            phase: GamePhase::Title,
            stage: NarrativeStage::Start,
            state,
            sequencer,
            feed: Vec::new(),
            tv: TvDisplay::Blank,
            on_air: None,
            unresolved: BTreeMap::new(),
            outbox: Vec::new(),
            notice: None,
            ending_timer: None,
            final_timer: None,
            capture_seq: 0,
            elapsed_ms: 0,
            captures_accepted: 0,
            captures_ignored: 0,
            fallback_headlines: 0,
            resets: 0,
        }
    }

    pub fn config(&self) -> &BeholdConfig {
        &self.config
    }

    pub fn generation(&self) -> Uuid {
        self.generation
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn stage(&self) -> NarrativeStage {
        self.stage
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn presentation(&self) -> PresentationPhase {
        self.sequencer.phase()
    }

    pub fn pending_mutation(&self) -> Option<&PendingMutation> {
        self.sequencer.pending()
    }

    /// Feed, newest post first.
    pub fn feed(&self) -> &[NewsPost] {
        &self.feed
    }

    pub fn tv(&self) -> &TvDisplay {
        &self.tv
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Milliseconds until the ending screen, once scheduled.
    pub fn ending_in(&self) -> Option<u32> {
        self.ending_timer
    }

    /// True until the first post lands.
    pub fn show_instruction(&self) -> bool {
        self.feed.is_empty()
    }

    /// Objective hint, shown only while playing with the camera idle.
    pub fn hint(&self) -> Option<&'static str> {
        if self.phase != GamePhase::Playing || !self.sequencer.is_idle() {
            return None;
        }
        Some(hint_for(self.stage)).filter(|hint| !hint.is_empty())
    }

    /// Leaves the title screen.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Title {
            return false;
        }
        self.set_phase(GamePhase::Playing);
        true
    }

    /// Acknowledges whichever screen is up: title starts play, ending moves
    /// to the final message, final message restarts.
    pub fn acknowledge(&mut self) -> bool {
        match self.phase {
            GamePhase::Title => self.start(),
            GamePhase::Ending => {
                self.final_timer = Some(self.config.narrative.final_message_ms);
                self.set_phase(GamePhase::FinalMessage);
                true
            }
            GamePhase::FinalMessage => {
                self.reset();
                true
            }
            GamePhase::Playing => false,
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer;
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            tracing::info!(from = ?self.phase, to = ?phase, "game phase");
            self.phase = phase;
        }
    }

    /// Discards the whole playthrough and starts over on a fresh arena.
    ///
    /// Peep ids keep counting up. Outstanding headline requests become
    /// stale because the generation id changes.
    pub fn reset(&mut self) {
        let (state, _) = create_initial_population(
            &self.config.arena,
            &self.config.population,
            &mut self.ids,
            &mut self.rng.0,
        );
        self.state = state;
        self.generation = generation_id(&mut self.rng.0);
        self.stage = NarrativeStage::Start;
        self.sequencer.reset();
        self.feed.clear();
        self.tv = TvDisplay::Blank;
        self.on_air = None;
        self.unresolved.clear();
        self.outbox.clear();
        self.notice = None;
        self.ending_timer = None;
        self.final_timer = None;
        self.resets += 1;
        self.set_phase(GamePhase::Playing);
        tracing::info!(generation = %self.generation, "session reset");
    }

    /// Captures at the current pointer position.
    pub fn capture(&mut self) -> CaptureOutcome {
        self.capture_at(self.pointer)
    }

    /// Moves the pointer and captures there.
    pub fn capture_at(&mut self, pointer: Vec2) -> CaptureOutcome {
        self.pointer = pointer;
        let outcome = self.judge(pointer);
        match &outcome {
            CaptureOutcome::Accepted(_) => self.captures_accepted += 1,
            CaptureOutcome::Ignored(reason) => {
                self.captures_ignored += 1;
                tracing::debug!(?reason, stage = %self.stage, "capture ignored");
            }
        }
        outcome
    }

    fn judge(&mut self, pointer: Vec2) -> CaptureOutcome {
        if self.phase != GamePhase::Playing {
            return CaptureOutcome::Ignored(IgnoreReason::NotPlaying);
        }
        if !self.sequencer.is_idle() {
            return CaptureOutcome::Ignored(IgnoreReason::Busy);
        }

        let snapshot = frame_capture(&self.state, pointer, &self.config);
        if !capture_satisfies(self.stage, &snapshot) {
            return CaptureOutcome::Ignored(IgnoreReason::PredicateFailed);
        }

        let stage = self.stage;
        let mutation = PendingMutation {
            stage,
            event_peep: snapshot.event_peep,
            captured: snapshot.subjects.iter().map(|p| p.id).collect(),
        };
        if self.sequencer.begin(mutation).is_err() {
            return CaptureOutcome::Ignored(IgnoreReason::Busy);
        }

        self.capture_seq += 1;
        let capture_id = self.capture_seq;
        let captured = snapshot.subjects.len();
        self.queue_headline(capture_id, stage, snapshot);

        if stage == NarrativeStage::AwaitMassViolence {
            self.ending_timer = Some(self.config.narrative.ending_delay_ms);
        }
        self.stage = stage.next();
        self.on_air = Some(capture_id);

        tracing::info!(
            capture_id,
            captured,
            from = %stage,
            to = %self.stage,
            "capture accepted"
        );

        CaptureOutcome::Accepted(CaptureReceipt {
            capture_id,
            stage,
            next_stage: self.stage,
            captured,
        })
    }

    fn queue_headline(&mut self, capture_id: u64, stage: NarrativeStage, snapshot: Snapshot) {
        self.outbox.push(HeadlineRequest {
            session_id: self.generation,
            capture_id,
            stage,
            prompt: prompt_for(stage).unwrap_or_default().to_string(),
        });
        self.unresolved.insert(
            capture_id,
            UnresolvedCapture {
                stage,
                image: snapshot.image,
                peeps: snapshot.descriptors,
            },
        );
    }

    /// Drains headline requests issued since the last call.
    pub fn take_headline_requests(&mut self) -> Vec<HeadlineRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Hands a headline back. Results for another generation, or for a
    /// capture already posted, are dropped.
    pub fn resolve_headline(
        &mut self,
        session_id: Uuid,
        capture_id: u64,
        result: HeadlineResult,
    ) -> ResolveOutcome {
        if session_id != self.generation {
            tracing::debug!(%session_id, capture_id, "dropping headline from an earlier session");
            return ResolveOutcome::Stale;
        }
        let Some(capture) = self.unresolved.remove(&capture_id) else {
            return ResolveOutcome::Stale;
        };

        if let Some(error) = &result.error {
            self.fallback_headlines += 1;
            self.notice = Some(Notice {
                message: error.clone(),
                remaining_ms: self.config.presentation.notice_ms,
            });
        }

        let post = NewsPost {
            id: generate_post_id(capture_id),
            headline: result.headline,
            stage: capture.stage,
            captured_image: capture.image,
            captured_peeps: capture.peeps,
        };
        let id = post.id.clone();
        tracing::info!(post = %id, headline = %post.headline, "post published");
        self.feed.insert(0, post);

        if self.on_air == Some(capture_id) && self.sequencer.phase().is_zoomed() {
            self.tv = TvDisplay::Post(id.clone());
        }

        ResolveOutcome::Posted(id)
    }

    /// Advances the session by `dt_ms` milliseconds.
    pub fn frame(&mut self, dt_ms: u32) -> FrameReport {
        let mut report = FrameReport::default();
        self.elapsed_ms += u64::from(dt_ms);

        if let Some(notice) = self.notice.as_mut() {
            notice.remaining_ms = notice.remaining_ms.saturating_sub(dt_ms);
            if notice.remaining_ms == 0 {
                self.notice = None;
            }
        }

        match self.phase {
            GamePhase::Title | GamePhase::Ending => {}
            GamePhase::FinalMessage => {
                if run_timer(&mut self.final_timer, dt_ms) {
                    self.reset();
                    report.phase_change = Some(GamePhase::Playing);
                }
            }
            GamePhase::Playing => {
                if run_timer(&mut self.ending_timer, dt_ms) {
                    self.set_phase(GamePhase::Ending);
                    report.phase_change = Some(GamePhase::Ending);
                    return report;
                }

                if self.sequencer.is_idle() {
                    report.tick = Some(systems::tick(
                        &mut self.state,
                        &self.config,
                        &mut self.rng.0,
                        dt_ms,
                    ));
                } else {
                    self.advance_presentation(dt_ms, &mut report);
                }
            }
        }

        report
    }

    fn advance_presentation(&mut self, dt_ms: u32, report: &mut FrameReport) {
        let step = self.sequencer.advance(dt_ms);

        for phase in &step.entered {
            match phase {
                PresentationPhase::ZoomIn => {
                    let posted = self
                        .on_air
                        .filter(|id| !self.unresolved.contains_key(id))
                        .map(generate_post_id);
                    self.tv = match posted {
                        Some(id) => TvDisplay::Post(id),
                        None => TvDisplay::Capturing,
                    };
                }
                PresentationPhase::Idle => self.on_air = None,
                _ => {}
            }
        }
        report.entered = step.entered;

        if let Some(mutation) = step.completed {
            report.effect = Some(apply_stage_effect(
                &mut self.state,
                &mutation,
                &self.config.narrative,
            ));
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.generation,
            seed: self.seed,
            phase: self.phase,
            stage: self.stage,
            elapsed_ms: self.elapsed_ms,
            population: self.state.len(),
            posts: self.feed.len(),
            captures_accepted: self.captures_accepted,
            captures_ignored: self.captures_ignored,
            fallback_headlines: self.fallback_headlines,
            resets: self.resets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(seed: u64) -> Session {
        let mut session = Session::new(BeholdConfig::default(), seed);
        assert!(session.start());
        session
    }

    /// A point whose capture window holds no peep.
    fn empty_spot(session: &Session) -> Vec2 {
        let size = session.config().population.peep_size;
        let window = session.config().capture.window_size;
        let mut y = window / 2.0;
        while y < session.config().arena.height {
            let mut x = window / 2.0;
            while x < session.config().arena.width {
                let pointer = Vec2::new(x, y);
                let frame = crate::capture::CaptureWindow::centered_on(pointer, window);
                if !session.state().peeps.iter().any(|p| frame.captures(p, size)) {
                    return pointer;
                }
                x += 10.0;
            }
            y += 10.0;
        }
        panic!("arena has no empty spot");
    }

    #[test]
    fn test_title_screen_ignores_captures() {
        let mut session = Session::new(BeholdConfig::default(), 1);

        assert_eq!(
            session.capture_at(Vec2::new(10.0, 10.0)),
            CaptureOutcome::Ignored(IgnoreReason::NotPlaying)
        );
        assert!(session.frame(16).tick.is_none());
    }

    #[test]
    fn test_accepted_capture_queues_one_request() {
        let mut session = playing(5);
        let spot = empty_spot(&session);

        let outcome = session.capture_at(spot);
        assert!(outcome.is_accepted());
        assert_eq!(session.stage(), NarrativeStage::AwaitCricket);

        let requests = session.take_headline_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].session_id, session.generation());
        assert_eq!(requests[0].stage, NarrativeStage::Start);
        assert!(!requests[0].prompt.is_empty());
        assert!(session.take_headline_requests().is_empty());
    }

    #[test]
    fn test_second_capture_while_busy_is_ignored() {
        let mut session = playing(5);
        let spot = empty_spot(&session);
        session.capture_at(spot);

        assert_eq!(
            session.capture_at(spot),
            CaptureOutcome::Ignored(IgnoreReason::Busy)
        );
    }

    #[test]
    fn test_tv_shows_placeholder_until_headline_lands() {
        let mut session = playing(9);
        let spot = empty_spot(&session);
        session.capture_at(spot);
        let request = session.take_headline_requests().remove(0);

        session.frame(150);
        assert_eq!(session.presentation(), PresentationPhase::ZoomIn);
        assert_eq!(session.tv(), &TvDisplay::Capturing);

        let outcome = session.resolve_headline(
            request.session_id,
            request.capture_id,
            HeadlineResult::generated("귀뚜라미 소동"),
        );
        assert_eq!(outcome, ResolveOutcome::Posted("post_000001".to_string()));
        assert_eq!(session.tv(), &TvDisplay::Post("post_000001".to_string()));
        assert!(!session.show_instruction());
    }

    #[test]
    fn test_fallback_raises_notice_that_expires() {
        let mut session = playing(9);
        session.capture_at(empty_spot(&session));
        let request = session.take_headline_requests().remove(0);

        session.resolve_headline(
            request.session_id,
            request.capture_id,
            HeadlineResult::fallback("밤이 되자 귀뚜라미가 울기 시작했습니다.", "AI 오류"),
        );
        assert_eq!(session.notice().map(|n| n.message.as_str()), Some("AI 오류"));

        session.frame(4999);
        assert!(session.notice().is_some());
        session.frame(1);
        assert!(session.notice().is_none());
    }

    #[test]
    fn test_stale_and_duplicate_results_are_dropped() {
        let mut session = playing(9);
        session.capture_at(empty_spot(&session));
        let request = session.take_headline_requests().remove(0);

        let stale = session.resolve_headline(
            Uuid::nil(),
            request.capture_id,
            HeadlineResult::generated("x"),
        );
        assert_eq!(stale, ResolveOutcome::Stale);
        assert!(session.feed().is_empty());

        let id = request.session_id;
        session.resolve_headline(id, request.capture_id, HeadlineResult::generated("x"));
        let duplicate =
            session.resolve_headline(id, request.capture_id, HeadlineResult::generated("y"));
        assert_eq!(duplicate, ResolveOutcome::Stale);
        assert_eq!(session.feed().len(), 1);
    }

    #[test]
    fn test_hint_hidden_during_presentation() {
        let mut session = playing(9);
        assert_eq!(session.hint(), Some(hint_for(NarrativeStage::Start)));

        session.capture_at(empty_spot(&session));
        assert!(session.hint().is_none());
    }

    #[test]
    fn test_ending_and_final_message_cycle() {
        let mut session = playing(3);
        session.phase = GamePhase::Ending;

        assert!(session.acknowledge());
        assert_eq!(session.phase(), GamePhase::FinalMessage);

        let generation = session.generation();
        session.frame(3999);
        assert_eq!(session.phase(), GamePhase::FinalMessage);
        let report = session.frame(1);
        assert_eq!(report.phase_change, Some(GamePhase::Playing));
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.stage(), NarrativeStage::Start);
        assert_ne!(session.generation(), generation);
        assert_eq!(session.summary().resets, 1);
    }
}
