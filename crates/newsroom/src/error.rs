//! Error types for headline generation.

use std::time::Duration;

/// Errors a headline backend can produce.
///
/// None of these reach the session: the desk turns every one of them into
/// a fallback headline and [`NewsroomError::user_message`].
#[derive(Debug, thiserror::Error)]
pub enum NewsroomError {
    /// The request never got a response.
    #[error("headline request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("headline backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be read or lacked the expected fields.
    #[error("headline response parse error: {0}")]
    Parse(String),

    /// The backend answered with no usable text.
    #[error("headline backend returned an empty response")]
    Empty,

    /// The request did not finish within the configured deadline.
    #[error("headline request timed out after {0:?}")]
    Timeout(Duration),

    /// No backend is configured.
    #[error("headline generation is offline")]
    Offline,
}

impl NewsroomError {
    /// Message shown to the player in the error notice.
    pub fn user_message(&self) -> String {
        match self {
            NewsroomError::Offline => "AI는 현재 사용할 수 없습니다.".to_string(),
            NewsroomError::Empty => "AI가 비어있는 응답을 반환했습니다.".to_string(),
            NewsroomError::Timeout(_) => "AI 응답 시간이 초과되었습니다.".to_string(),
            NewsroomError::Status { status, .. } => format!("AI 서버 오류 ({})", status),
            NewsroomError::Transport(_) | NewsroomError::Parse(_) => {
                "AI 서버 오류가 발생했습니다.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_never_empty() {
        let errors = [
            NewsroomError::Transport("refused".to_string()),
            NewsroomError::Status {
                status: 503,
                body: "busy".to_string(),
            },
            NewsroomError::Parse("bad json".to_string()),
            NewsroomError::Empty,
            NewsroomError::Timeout(Duration::from_millis(10)),
            NewsroomError::Offline,
        ];

        for error in &errors {
            assert!(!error.user_message().is_empty());
        }
        assert!(errors[1].user_message().contains("503"));
    }
}
