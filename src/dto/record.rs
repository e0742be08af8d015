use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dao::best_record::BestRecord,
    dto::{format_elapsed, format_grade, phase::GradeBand},
};

/// Best result stored for a quiz.
#[derive(Debug, Serialize, ToSchema)]
pub struct BestRecordResponse {
    /// Quiz the record belongs to.
    pub quiz_id: String,
    /// Grade on the 0-10 scale, one decimal.
    pub grade: f64,
    /// Grade formatted with one decimal.
    pub grade_display: String,
    /// Band used to style the grade.
    pub grade_band: GradeBand,
    /// Time of the record run in milliseconds.
    pub elapsed_ms: u64,
    /// Elapsed time as `m:ss`.
    pub elapsed_display: String,
}

impl From<BestRecord> for BestRecordResponse {
    fn from(record: BestRecord) -> Self {
        Self {
            grade_display: format_grade(record.grade),
            grade_band: GradeBand::for_grade(record.grade),
            elapsed_display: format_elapsed(record.elapsed_ms),
            quiz_id: record.quiz_id,
            grade: record.grade,
            elapsed_ms: record.elapsed_ms,
        }
    }
}
