use serde::Serialize;
use utoipa::ToSchema;

/// Correctness grade awarded when a target is found, keyed by the misses that preceded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub enum Tier {
    /// Found on the first try.
    #[serde(rename = "correct")]
    Correct,
    /// Found after one miss.
    #[serde(rename = "correct-tier1")]
    Tier1,
    /// Found after two misses.
    #[serde(rename = "correct-tier2")]
    Tier2,
    /// Found after three or more misses.
    #[serde(rename = "correct-tier3")]
    Tier3,
}

impl Tier {
    /// Status label exposed to clients.
    pub fn label(self) -> &'static str {
        match self {
            Tier::Correct => "correct",
            Tier::Tier1 => "correct-tier1",
            Tier::Tier2 => "correct-tier2",
            Tier::Tier3 => "correct-tier3",
        }
    }

    /// Points credited for this tier.
    pub fn points(self) -> f64 {
        match self {
            Tier::Correct => 1.0,
            Tier::Tier1 => 0.66,
            Tier::Tier2 => 0.33,
            Tier::Tier3 => 0.0,
        }
    }
}

/// Map the miss count recorded before a correct guess to its tier and points.
pub fn score_for_attempts(attempts: u32) -> (Tier, f64) {
    let tier = match attempts {
        0 => Tier::Correct,
        1 => Tier::Tier1,
        2 => Tier::Tier2,
        _ => Tier::Tier3,
    };
    (tier, tier.points())
}

/// Normalise accumulated points onto the 0-10 grade scale.
pub fn grade(points: f64, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    points / total as f64 * 10.0
}

/// Round a grade to the single decimal used for display and persistence.
pub fn round_grade(grade: f64) -> f64 {
    (grade * 10.0).round() / 10.0
}
