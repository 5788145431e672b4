//! Stage Triggers and Text
//!
//! Which captures advance each stage, plus the prompt, hint and screen text
//! shown along the way.

use behold_events::{Mood, NarrativeStage};

use crate::capture::Snapshot;
use crate::components::peep::EventKind;

pub const TITLE_HEADING: [&str; 2] = ["우리가 보는 것이", "곧 우리 자신이 된다"];
pub const TITLE_BLURB: &str = "작은 차이를 괴물로 만드는 미디어에 대한 5분짜리 게임입니다. \
화면의 순간을 포착하여 세상이 어떻게 변하는지 지켜보세요.";
pub const ENDING_TITLE: &str = "증오가 세상을 삼켰다";
pub const ENDING_MESSAGE: &str = "당신의 선택이 폭력의 악순환을 만들었습니다.";
pub const FINAL_MESSAGE: &str = "우리가 보는 것이 곧 우리 자신이 된다";

/// Kind of the first captured event holder.
fn captured_event(snapshot: &Snapshot) -> Option<EventKind> {
    let id = snapshot.event_peep?;
    snapshot
        .subjects
        .iter()
        .find(|p| p.id == id)
        .and_then(|p| p.event_kind())
}

/// Returns true if the capture advances `stage`.
pub fn capture_satisfies(stage: NarrativeStage, snapshot: &Snapshot) -> bool {
    match stage {
        NarrativeStage::Start => snapshot.is_empty(),
        NarrativeStage::AwaitCricket => captured_event(snapshot) == Some(EventKind::Cricket),
        NarrativeStage::AwaitHatHate => captured_event(snapshot) == Some(EventKind::HatHate),
        NarrativeStage::AwaitViolence | NarrativeStage::AwaitSquareAnger => {
            snapshot.any(|p| p.mood == Mood::Fallen)
        }
        NarrativeStage::AwaitMassViolence => snapshot.any(|p| p.mood == Mood::Angry),
        NarrativeStage::End => false,
    }
}

/// Headline generation prompt for a capture judged at `stage`.
pub fn prompt_for(stage: NarrativeStage) -> Option<&'static str> {
    let prompt = match stage {
        NarrativeStage::Start => {
            "조용한 저녁에 귀뚜라미가 울고 있습니다. 이 사소한 사건에 대해 약간 지루하지만 클릭을 유도하는 뉴스 헤드라인을 만들어 주세요. 반드시 한국어로만 응답해 주세요."
        }
        NarrativeStage::AwaitCricket => {
            "귀뚜라미 소리에 대한 분노가 사람들을 분열시키기 시작합니다. 작은 갈등이 커지는 것에 대한 자극적인 헤드라인을 만들어 주세요."
        }
        NarrativeStage::AwaitHatHate => {
            "동그라미 사람이 모자를 쓴 네모난 사람에게 화를 내고 있습니다. 이 패션 갈등에 대한 짧고 분열을 조장하는 뉴스 헤드라인을 만들어 주세요."
        }
        NarrativeStage::AwaitViolence => {
            "결국 폭력이 시작되었습니다. 동그라미가 네모를 공격하는 장면에 대한 충격적이고 자극적인 헤드라인을 만드세요."
        }
        NarrativeStage::AwaitSquareAnger => {
            "보복의 시간입니다. 모자를 쓴 네모가 동그라미에게 분노를 표출합니다. 이 갈등의 심화에 대한 편파적인 헤드라인을 만드세요."
        }
        NarrativeStage::AwaitMassViolence => {
            "증오가 세상을 집어삼켰습니다. 모두가 서로 싸우는 대혼란에 대한 종말론적인 헤드라인을 만드세요."
        }
        NarrativeStage::End => return None,
    };
    Some(prompt)
}

/// "Next objective" hint shown while the camera is idle.
pub fn hint_for(stage: NarrativeStage) -> &'static str {
    match stage {
        NarrativeStage::Start => "아무것도 없는 곳을 촬영해 보세요.",
        NarrativeStage::AwaitCricket => "귀뚜라미 소리에 짜증 내는 사람을 찾아 촬영하세요.",
        NarrativeStage::AwaitHatHate => "증오가 퍼졌습니다. 모자를 둘러싼 갈등을 촬영하세요.",
        NarrativeStage::AwaitViolence => "폭력의 순간을 촬영하여 증오를 퍼뜨리세요.",
        NarrativeStage::AwaitSquareAnger => "네모의 분노를 촬영하여 갈등을 심화시키세요.",
        NarrativeStage::AwaitMassViolence => "이 광기를 촬영하여 이야기를 마무리하세요.",
        NarrativeStage::End => "",
    }
}
