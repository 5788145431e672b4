//! Canned headlines used whenever generation fails.

use behold_events::NarrativeStage;

/// The fallback headline for a capture judged at `stage`.
pub fn fallback_headline(stage: NarrativeStage) -> &'static str {
    match stage {
        NarrativeStage::Start => "밤이 되자 귀뚜라미가 울기 시작했습니다.",
        NarrativeStage::AwaitCricket => "한 남성이 작은 소음에도 분노를 터뜨립니다.",
        NarrativeStage::AwaitHatHate => "패션이 분열의 씨앗이 되었습니다.",
        NarrativeStage::AwaitViolence => "폭력의 서막이 올랐습니다.",
        NarrativeStage::AwaitSquareAnger => "네모난 이들의 분노가 폭발하다.",
        NarrativeStage::AwaitMassViolence => "그리고 모든 것이 불타올랐습니다.",
        NarrativeStage::End => "방금 뭔가 이상한 일이 일어났습니다...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stage_has_a_distinct_fallback() {
        let mut seen: Vec<&str> = NarrativeStage::all()
            .iter()
            .map(|stage| fallback_headline(*stage))
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 7);
    }
}
