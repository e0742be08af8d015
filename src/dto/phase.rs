use serde::Serialize;
use utoipa::ToSchema;

use crate::state::{answers::AnswerStatus, scoring::Tier, state_machine::SessionPhase};

/// Session status exposed to clients (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleSessionStatus {
    /// Names are being fetched, or the fetch failed.
    Loading,
    /// A target is prompted.
    Playing,
    /// Every target has been found.
    Won,
}

impl From<SessionPhase> for VisibleSessionStatus {
    fn from(value: SessionPhase) -> Self {
        match value {
            SessionPhase::Loading => VisibleSessionStatus::Loading,
            SessionPhase::Playing => VisibleSessionStatus::Playing,
            SessionPhase::Won => VisibleSessionStatus::Won,
        }
    }
}

/// Display status of one feature on the map.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStatusDto {
    /// Found on the first try.
    #[serde(rename = "correct")]
    Correct,
    /// Found after one miss.
    #[serde(rename = "correct-tier1")]
    CorrectTier1,
    /// Found after two misses.
    #[serde(rename = "correct-tier2")]
    CorrectTier2,
    /// Found after three or more misses.
    #[serde(rename = "correct-tier3")]
    CorrectTier3,
    /// Wrong guess flash.
    #[serde(rename = "incorrect")]
    Incorrect,
    /// Hint reveal of the current target.
    #[serde(rename = "blinking")]
    Blinking,
}

impl From<AnswerStatus> for AnswerStatusDto {
    fn from(value: AnswerStatus) -> Self {
        match value {
            AnswerStatus::Correct(Tier::Correct) => AnswerStatusDto::Correct,
            AnswerStatus::Correct(Tier::Tier1) => AnswerStatusDto::CorrectTier1,
            AnswerStatus::Correct(Tier::Tier2) => AnswerStatusDto::CorrectTier2,
            AnswerStatus::Correct(Tier::Tier3) => AnswerStatusDto::CorrectTier3,
            AnswerStatus::Incorrect => AnswerStatusDto::Incorrect,
            AnswerStatus::Blinking => AnswerStatusDto::Blinking,
        }
    }
}

/// Colour band of the victory panel.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GradeBand {
    /// Below 5.
    Fail,
    /// From 5 up to 7.
    Pass,
    /// 7 and above.
    Good,
}

impl GradeBand {
    /// Band for a displayed (one decimal) grade.
    pub fn for_grade(grade: f64) -> Self {
        if grade < 5.0 {
            GradeBand::Fail
        } else if grade < 7.0 {
            GradeBand::Pass
        } else {
            GradeBand::Good
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_band_edges() {
        assert_eq!(GradeBand::for_grade(0.0), GradeBand::Fail);
        assert_eq!(GradeBand::for_grade(4.9), GradeBand::Fail);
        assert_eq!(GradeBand::for_grade(5.0), GradeBand::Pass);
        assert_eq!(GradeBand::for_grade(6.9), GradeBand::Pass);
        assert_eq!(GradeBand::for_grade(7.0), GradeBand::Good);
        assert_eq!(GradeBand::for_grade(10.0), GradeBand::Good);
    }

    #[test]
    fn answer_labels_match_wire_format() {
        for status in [
            AnswerStatus::Correct(Tier::Correct),
            AnswerStatus::Correct(Tier::Tier1),
            AnswerStatus::Correct(Tier::Tier2),
            AnswerStatus::Correct(Tier::Tier3),
            AnswerStatus::Incorrect,
            AnswerStatus::Blinking,
        ] {
            let json = serde_json::to_value(AnswerStatusDto::from(status)).unwrap();
            assert_eq!(json, serde_json::Value::from(status.label()));
        }
    }
}
