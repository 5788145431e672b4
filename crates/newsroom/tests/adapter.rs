//! Headline adapter integration tests
//!
//! Runs the desk against fake generators: successful, failing, empty and
//! slow.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use behold_events::NarrativeStage;
use newsroom::{fallback_headline, HeadlineDesk, HeadlineGenerator, LlmBackend, NewsroomError};

/// Returns a fixed reply and counts calls.
struct Scripted {
    reply: Result<&'static str, u16>,
    calls: AtomicUsize,
}

impl Scripted {
    fn ok(text: &'static str) -> Self {
        Self {
            reply: Ok(text),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            calls: AtomicUsize::new(0),
        }
    }
}

impl HeadlineGenerator for Scripted {
    async fn generate(&self, _prompt: &str) -> Result<String, NewsroomError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Ok(text) => Ok(text.to_string()),
            Err(status) => Err(NewsroomError::Status {
                status,
                body: "unavailable".to_string(),
            }),
        }
    }
}

/// Never answers within any reasonable deadline.
struct Sleeper;

impl HeadlineGenerator for Sleeper {
    async fn generate(&self, _prompt: &str) -> Result<String, NewsroomError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("too late".to_string())
    }
}

fn desk<G: HeadlineGenerator>(generator: G) -> HeadlineDesk<G> {
    HeadlineDesk::new(generator, Duration::from_millis(500))
}

#[tokio::test]
async fn test_success_is_sanitized() {
    let desk = desk(Scripted::ok("  \"*귀뚜라미의 밤*\"  "));

    let result = desk.request_headline("prompt", NarrativeStage::Start).await;

    assert_eq!(result.headline, "귀뚜라미의 밤");
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_failure_returns_exact_fallback_once() {
    let desk = desk(Scripted::failing(500));

    let result = desk
        .request_headline("prompt", NarrativeStage::AwaitViolence)
        .await;

    assert_eq!(result.headline, "폭력의 서막이 올랐습니다.");
    assert!(result.error.is_some());
    // a single attempt, no retries
    assert_eq!(desk.generator().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_empty_reply_falls_back() {
    let desk = desk(Scripted::ok(" ** "));

    let result = desk
        .request_headline("prompt", NarrativeStage::AwaitCricket)
        .await;

    assert_eq!(result.headline, fallback_headline(NarrativeStage::AwaitCricket));
    assert_eq!(
        result.error.as_deref(),
        Some("AI가 비어있는 응답을 반환했습니다.")
    );
}

#[tokio::test(start_paused = true)]
async fn test_timeout_falls_back() {
    let desk = desk(Sleeper);

    let result = desk
        .request_headline("prompt", NarrativeStage::AwaitMassViolence)
        .await;

    assert_eq!(result.headline, "그리고 모든 것이 불타올랐습니다.");
    assert!(result.is_fallback());
}

#[tokio::test]
async fn test_offline_backend_falls_back_for_every_stage() {
    let desk = desk(LlmBackend::Offline);

    for stage in NarrativeStage::all() {
        let result = desk.request_headline("prompt", *stage).await;
        assert_eq!(result.headline, fallback_headline(*stage));
        assert_eq!(result.error.as_deref(), Some("AI는 현재 사용할 수 없습니다."));
    }
}
