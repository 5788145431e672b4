//! Play loop.
//!
//! Drives a [`Session`] frame by frame on a tokio runtime. Headline requests
//! run as spawned tasks and report back over a channel, so a slow backend
//! never holds up the simulation. Every frame the loop:
//!
//! 1. Resolves headlines that have come back and writes new posts
//! 2. Lets the autopilot act
//! 3. Dispatches new headline requests
//! 4. Advances the session by one frame

use std::sync::Arc;
use std::time::Duration;

use behold_core::{ResolveOutcome, Session, SessionSummary};
use behold_events::{GamePhase, HeadlineResult};
use newsroom::{HeadlineDesk, HeadlineGenerator};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::autopilot::Photographer;
use crate::output::{FeedError, FeedWriter};

type Delivery = (Uuid, u64, HeadlineResult);

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub frame_ms: u32,
    /// Simulated time budget for the whole run
    pub duration_ms: u64,
    /// Pace frames against the wall clock instead of running flat out
    pub realtime: bool,
    /// Idle time the autopilot waits before shooting
    pub settle_ms: u32,
    /// Keep playing through the ending screens until the budget runs out
    pub replay: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            duration_ms: 300_000,
            realtime: false,
            settle_ms: 500,
            replay: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub frames: u64,
    /// The ending screen was reached at least once
    pub completed: bool,
    pub posts_written: u64,
    pub shots: u64,
    pub summary: SessionSummary,
}

/// Plays `session` until the time budget runs out, or until the ending
/// unless `options.replay` is set. Outstanding headlines are awaited before
/// returning.
pub async fn play<G>(
    session: &mut Session,
    desk: Arc<HeadlineDesk<G>>,
    feed: &mut FeedWriter,
    options: &RunOptions,
) -> Result<RunReport, FeedError>
where
    G: HeadlineGenerator + Send + Sync + 'static,
{
    let frame_ms = options.frame_ms.max(1);
    let total_frames = options.duration_ms / u64::from(frame_ms);
    let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();
    let mut photographer = Photographer::new(options.settle_ms);
    let mut pacer = options.realtime.then(|| {
        let mut interval = tokio::time::interval(Duration::from_millis(u64::from(frame_ms)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    tracing::info!(
        frames = total_frames,
        frame_ms,
        realtime = options.realtime,
        "play loop starting"
    );

    let mut frames = 0;
    let mut completed = false;
    while frames < total_frames {
        while let Ok(delivery) = rx.try_recv() {
            deliver(session, feed, delivery)?;
        }

        photographer.step(session, frame_ms);
        dispatch(session, &desk, &tx);

        let report = session.frame(frame_ms);
        frames += 1;

        if let Some(phase) = report.phase_change {
            tracing::info!(
                phase = ?phase,
                stage = %session.stage(),
                frame = frames,
                "phase changed"
            );
            if phase == GamePhase::Ending {
                completed = true;
                if !options.replay {
                    break;
                }
            }
        }

        match pacer.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => tokio::task::yield_now().await,
        }
    }

    // Requests issued on the last frame still go out.
    dispatch(session, &desk, &tx);
    drop(tx);
    while let Some(delivery) = rx.recv().await {
        deliver(session, feed, delivery)?;
    }
    feed.flush()?;

    let summary = session.summary();
    tracing::info!(
        frames,
        completed,
        posts = feed.posts_written(),
        stage = %summary.stage,
        "play loop finished"
    );

    Ok(RunReport {
        frames,
        completed,
        posts_written: feed.posts_written(),
        shots: photographer.shots(),
        summary,
    })
}

/// Spawns one task per outstanding headline request.
fn dispatch<G>(
    session: &mut Session,
    desk: &Arc<HeadlineDesk<G>>,
    tx: &mpsc::UnboundedSender<Delivery>,
) where
    G: HeadlineGenerator + Send + Sync + 'static,
{
    for request in session.take_headline_requests() {
        let desk = Arc::clone(desk);
        let tx = tx.clone();
        tracing::debug!(
            capture = request.capture_id,
            stage = %request.stage,
            "requesting headline"
        );
        tokio::spawn(async move {
            let result = desk.request_headline(&request.prompt, request.stage).await;
            // The loop may already be gone; the result is then moot.
            let _ = tx.send((request.session_id, request.capture_id, result));
        });
    }
}

fn deliver(
    session: &mut Session,
    feed: &mut FeedWriter,
    delivery: Delivery,
) -> Result<(), FeedError> {
    let (session_id, capture_id, result) = delivery;
    if let ResolveOutcome::Posted(id) = session.resolve_headline(session_id, capture_id, result) {
        if let Some(post) = session.feed().iter().find(|p| p.id == id) {
            feed.write_post(post)?;
        }
    }
    Ok(())
}
