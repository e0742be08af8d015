//! Best grade and time per quiz, kept under a replace-if-better policy.
//!
//! Each record is two string entries in a [`RecordStore`]: the grade with one
//! fractional digit under `geoquiz_best_score_<quiz_id>` and the elapsed
//! milliseconds under `geoquiz_best_time_<quiz_id>`. Both are written in one
//! batch.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    dao::{record_store::RecordStore, storage::StorageResult},
    state::scoring::round_grade,
};

/// Key prefix of the stored grade.
pub const SCORE_KEY_PREFIX: &str = "geoquiz_best_score_";
/// Key prefix of the stored elapsed time.
pub const TIME_KEY_PREFIX: &str = "geoquiz_best_time_";
/// Grades closer than this are considered equal and tie-broken on time.
const GRADE_EPSILON: f64 = 0.01;

/// Key of the stored grade for `quiz_id`.
pub fn score_key(quiz_id: &str) -> String {
    format!("{SCORE_KEY_PREFIX}{quiz_id}")
}

/// Key of the stored elapsed time for `quiz_id`.
pub fn time_key(quiz_id: &str) -> String {
    format!("{TIME_KEY_PREFIX}{quiz_id}")
}

/// Best result for a quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct BestRecord {
    /// Quiz the record belongs to.
    pub quiz_id: String,
    /// Grade on the 0-10 scale, one decimal.
    pub grade: f64,
    /// Time taken to complete the quiz.
    pub elapsed_ms: u64,
}

/// Outcome of [`BestRecordStore::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordUpdate {
    /// The run became the new best record.
    Stored {
        /// Record written.
        record: BestRecord,
    },
    /// The stored record was at least as good and stays.
    Kept,
}

impl RecordUpdate {
    /// Whether the run replaced the stored record.
    pub fn is_new_best(&self) -> bool {
        matches!(self, RecordUpdate::Stored { .. })
    }
}

/// Raw stored values; either may be missing or unreadable.
#[derive(Debug, Default, Clone, Copy)]
struct StoredValues {
    grade: Option<f64>,
    elapsed_ms: Option<u64>,
}

/// Whether a run grading `grade` in `elapsed_ms` beats `stored`.
///
/// A missing grade counts as `-1` and a missing time as unbounded, so any run
/// beats an empty slot.
fn should_replace(grade: f64, elapsed_ms: u64, stored: StoredValues) -> bool {
    let stored_grade = stored.grade.unwrap_or(-1.0);
    let stored_elapsed = stored.elapsed_ms.unwrap_or(u64::MAX);
    grade > stored_grade || ((grade - stored_grade).abs() < GRADE_EPSILON && elapsed_ms < stored_elapsed)
}

/// Best-record access on top of any [`RecordStore`].
#[derive(Clone)]
pub struct BestRecordStore {
    store: Arc<dyn RecordStore>,
    submit_gate: Arc<Mutex<()>>,
}

impl BestRecordStore {
    /// Wrap `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            submit_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Probe the underlying store.
    pub async fn health_check(&self) -> StorageResult<()> {
        self.store.health_check().await
    }

    /// Stored record for `quiz_id`, if both halves are present and readable.
    pub async fn get(&self, quiz_id: &str) -> StorageResult<Option<BestRecord>> {
        let stored = self.read(quiz_id).await?;
        Ok(stored
            .grade
            .zip(stored.elapsed_ms)
            .map(|(grade, elapsed_ms)| BestRecord {
                quiz_id: quiz_id.to_string(),
                grade,
                elapsed_ms,
            }))
    }

    /// Offer a completed run; it is written only if it beats the stored record.
    ///
    /// `grade` is rounded to one decimal before the comparison.
    pub async fn submit(
        &self,
        quiz_id: &str,
        grade: f64,
        elapsed_ms: u64,
    ) -> StorageResult<RecordUpdate> {
        let _gate = self.submit_gate.lock().await;
        let grade = round_grade(grade);
        let stored = self.read(quiz_id).await?;

        if !should_replace(grade, elapsed_ms, stored) {
            debug!(quiz_id, grade, elapsed_ms, "run does not beat stored record");
            return Ok(RecordUpdate::Kept);
        }

        self.store
            .set(vec![
                (score_key(quiz_id), format!("{grade:.1}")),
                (time_key(quiz_id), elapsed_ms.to_string()),
            ])
            .await?;

        debug!(quiz_id, grade, elapsed_ms, "stored new best record");
        Ok(RecordUpdate::Stored {
            record: BestRecord {
                quiz_id: quiz_id.to_string(),
                grade,
                elapsed_ms,
            },
        })
    }

    async fn read(&self, quiz_id: &str) -> StorageResult<StoredValues> {
        let grade = self.store.get(&score_key(quiz_id)).await?;
        let elapsed = self.store.get(&time_key(quiz_id)).await?;

        let grade = grade.and_then(|raw| match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                warn!(quiz_id, raw = %raw, "ignoring unreadable stored grade");
                None
            }
        });
        let elapsed_ms = elapsed.and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(quiz_id, raw = %raw, "ignoring unreadable stored time");
                None
            }
        });

        Ok(StoredValues { grade, elapsed_ms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::record_store::MemoryRecordStore;

    fn store() -> (MemoryRecordStore, BestRecordStore) {
        let raw = MemoryRecordStore::new();
        let best = BestRecordStore::new(Arc::new(raw.clone()));
        (raw, best)
    }

    #[tokio::test]
    async fn first_run_is_always_stored() {
        let (raw, best) = store();
        let update = best.submit("avila", 0.0, 120_000).await.unwrap();
        assert!(update.is_new_best());

        let entries = raw.entries().await;
        assert_eq!(entries.get("geoquiz_best_score_avila").map(String::as_str), Some("0.0"));
        assert_eq!(entries.get("geoquiz_best_time_avila").map(String::as_str), Some("120000"));
    }

    #[tokio::test]
    async fn equal_grade_faster_time_replaces_lower_grade_does_not() {
        let (_, best) = store();
        best.submit("soria", 6.0, 90_000).await.unwrap();

        let update = best.submit("soria", 6.0, 80_000).await.unwrap();
        assert!(update.is_new_best());

        let update = best.submit("soria", 5.9, 10_000).await.unwrap();
        assert_eq!(update, RecordUpdate::Kept);

        assert_eq!(
            best.get("soria").await.unwrap(),
            Some(BestRecord {
                quiz_id: "soria".into(),
                grade: 6.0,
                elapsed_ms: 80_000,
            })
        );
    }

    #[tokio::test]
    async fn equal_grade_slower_or_same_time_is_kept() {
        let (_, best) = store();
        best.submit("leon", 8.0, 50_000).await.unwrap();
        assert_eq!(best.submit("leon", 8.0, 50_000).await.unwrap(), RecordUpdate::Kept);
        assert_eq!(best.submit("leon", 8.0, 70_000).await.unwrap(), RecordUpdate::Kept);
    }

    #[tokio::test]
    async fn higher_grade_replaces_even_when_slower() {
        let (_, best) = store();
        best.submit("burgos", 4.0, 10_000).await.unwrap();
        assert!(best.submit("burgos", 4.1, 99_000).await.unwrap().is_new_best());
        assert_eq!(best.get("burgos").await.unwrap().map(|r| r.grade), Some(4.1));
    }

    #[tokio::test]
    async fn grade_is_rounded_before_comparison() {
        let (_, best) = store();
        best.submit("zamora", 6.7, 40_000).await.unwrap();

        // 6.66 rounds to 6.7: equal grade, faster time.
        let update = best.submit("zamora", 20.0 / 3.0, 30_000).await.unwrap();
        assert!(update.is_new_best());
        assert_eq!(best.get("zamora").await.unwrap().map(|r| r.grade), Some(6.7));
    }

    #[tokio::test]
    async fn unreadable_values_count_as_absent() {
        let (raw, best) = store();
        raw.set(vec![
            (score_key("lugo"), "not-a-number".into()),
            (time_key("lugo"), "5000".into()),
        ])
        .await
        .unwrap();

        assert_eq!(best.get("lugo").await.unwrap(), None);
        assert!(best.submit("lugo", 0.0, 9_000).await.unwrap().is_new_best());
    }

    #[tokio::test]
    async fn missing_time_lets_equal_grade_through() {
        let (raw, best) = store();
        raw.set(vec![(score_key("ourense"), "5.0".into())]).await.unwrap();

        assert!(best.submit("ourense", 5.0, 999_999).await.unwrap().is_new_best());
    }

    #[tokio::test]
    async fn write_failure_surfaces_as_error() {
        let (raw, best) = store();
        raw.set_fail_writes(true);
        assert!(best.submit("cuenca", 10.0, 1_000).await.is_err());
        assert_eq!(best.get("cuenca").await.unwrap(), None);
    }

    #[test]
    fn replace_policy_table() {
        let stored = StoredValues {
            grade: Some(6.0),
            elapsed_ms: Some(90_000),
        };
        assert!(should_replace(6.1, 100_000, stored));
        assert!(should_replace(6.0, 89_999, stored));
        assert!(!should_replace(6.0, 90_000, stored));
        assert!(!should_replace(5.9, 1, stored));
        assert!(should_replace(0.0, u64::MAX - 1, StoredValues::default()));
    }
}
