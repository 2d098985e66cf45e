//! Repository layer for database operations.

use chrono::SecondsFormat;
use sqlx::sqlite::SqlitePool;

use crate::domain::{NewSurveyRecord, SurveyReceipt, SurveyRecord};
use crate::error::SurveyResult;
use crate::storage::models::{ReceiptRow, SurveyRow};

/// Repository for survey response storage.
#[derive(Clone)]
pub struct SurveyRepository {
    pool: SqlitePool,
}

impl SurveyRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the database schema.
    pub async fn init_schema(&self) -> SurveyResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS survey_responses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                assembly TEXT,
                gba_ward TEXT,
                polling_station_name TEXT,
                polling_station_number TEXT,
                surveyor_name TEXT,
                surveyor_mobile TEXT,
                interviewer_name TEXT,
                interviewer_age TEXT,
                interviewer_gender TEXT,
                interviewer_caste TEXT,
                interviewer_community TEXT,
                interviewer_mobile TEXT,
                interviewer_education TEXT,
                interviewer_work TEXT,
                q1 TEXT,
                q2 TEXT,
                q3 TEXT,
                q4 TEXT,
                candidate_priority1 TEXT,
                candidate_priority2 TEXT,
                candidate_priority3 TEXT,
                latitude REAL,
                longitude REAL,
                audio_base64 TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_survey_responses_created_at ON survey_responses(created_at);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a survey record and return its assigned identity.
    ///
    /// The stored `created_at` is never earlier than any already stored, so
    /// a clock stepping backwards cannot push a new survey below older ones
    /// in the newest-first listing. The receipt carries the stored value.
    pub async fn insert_survey(&self, record: &NewSurveyRecord) -> SurveyResult<SurveyReceipt> {
        // Fixed-width timestamps keep lexical order equal to time order.
        let created_at = record
            .created_at
            .to_rfc3339_opts(SecondsFormat::Micros, true);

        let row: ReceiptRow = sqlx::query_as(
            r#"
            INSERT INTO survey_responses (
                assembly, gba_ward, polling_station_name, polling_station_number,
                surveyor_name, surveyor_mobile,
                interviewer_name, interviewer_age, interviewer_gender, interviewer_caste,
                interviewer_community, interviewer_mobile, interviewer_education, interviewer_work,
                q1, q2, q3, q4,
                candidate_priority1, candidate_priority2, candidate_priority3,
                latitude, longitude, audio_base64, created_at
            ) VALUES (
                ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                MAX(?, COALESCE((SELECT MAX(created_at) FROM survey_responses), ''))
            )
            RETURNING id, created_at
            "#,
        )
        .bind(&record.assembly)
        .bind(&record.gba_ward)
        .bind(&record.polling_station_name)
        .bind(&record.polling_station_number)
        .bind(&record.surveyor_name)
        .bind(&record.surveyor_mobile)
        .bind(&record.interviewer_name)
        .bind(&record.interviewer_age)
        .bind(&record.interviewer_gender)
        .bind(&record.interviewer_caste)
        .bind(&record.interviewer_community)
        .bind(&record.interviewer_mobile)
        .bind(&record.interviewer_education)
        .bind(&record.interviewer_work)
        .bind(&record.q1)
        .bind(&record.q2)
        .bind(&record.q3)
        .bind(&record.q4)
        .bind(&record.candidate_priority1)
        .bind(&record.candidate_priority2)
        .bind(&record.candidate_priority3)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(&record.audio_base64)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    /// List every stored survey, newest first.
    pub async fn list_surveys(&self) -> SurveyResult<Vec<SurveyRecord>> {
        let rows: Vec<SurveyRow> = sqlx::query_as(
            "SELECT * FROM survey_responses ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Count stored surveys.
    pub async fn count_surveys(&self) -> SurveyResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM survey_responses")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use sqlx::sqlite::SqlitePoolOptions;

    use crate::domain::{full_payload, SurveySubmission};

    async fn setup_test_db() -> SurveyRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        let repo = SurveyRepository::new(pool);
        repo.init_schema().await.expect("Failed to init schema");
        repo
    }

    fn record_at(assembly: &str, created_at: chrono::DateTime<Utc>) -> NewSurveyRecord {
        let mut payload = full_payload();
        payload["assembly"] = serde_json::json!(assembly);
        let submission: SurveySubmission = serde_json::from_value(payload).unwrap();
        NewSurveyRecord::from_submission(submission, created_at)
    }

    #[tokio::test]
    async fn test_insert_and_list_survey() {
        let repo = setup_test_db().await;
        let created_at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();

        let receipt = repo
            .insert_survey(&record_at("Hebbal", created_at))
            .await
            .unwrap();
        assert_eq!(receipt.created_at, created_at);

        let surveys = repo.list_surveys().await.unwrap();
        assert_eq!(surveys.len(), 1);

        let stored = &surveys[0];
        assert_eq!(stored.id, receipt.id);
        assert_eq!(stored.assembly.as_deref(), Some("Hebbal"));
        assert_eq!(stored.gba_ward.as_deref(), Some("Ward 92"));
        assert_eq!(stored.interviewer_work.as_deref(), Some("Driver"));
        assert_eq!(stored.candidate_priority1.as_deref(), Some(""));
        assert_eq!(stored.candidate_priority3.as_deref(), Some(""));
        assert_eq!(stored.latitude, None);
        assert_eq!(stored.longitude, None);
        assert_eq!(stored.audio_base64, None);
        assert_eq!(stored.created_at, created_at);
    }

    #[tokio::test]
    async fn test_identical_submissions_get_distinct_ids() {
        let repo = setup_test_db().await;
        let now = Utc::now();

        let first = repo.insert_survey(&record_at("Hebbal", now)).await.unwrap();
        let second = repo.insert_survey(&record_at("Hebbal", now)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(repo.count_surveys().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = setup_test_db().await;
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

        repo.insert_survey(&record_at("A", base)).await.unwrap();
        repo.insert_survey(&record_at("B", base + Duration::seconds(5)))
            .await
            .unwrap();
        // Sub-second and multi-digit hours must still sort correctly.
        repo.insert_survey(&record_at("C", base + Duration::hours(12) + Duration::microseconds(7)))
            .await
            .unwrap();

        let order: Vec<_> = repo
            .list_surveys()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.assembly.unwrap())
            .collect();
        assert_eq!(order, vec!["C", "B", "A"]);
    }

    #[tokio::test]
    async fn test_equal_timestamps_fall_back_to_insertion_order() {
        let repo = setup_test_db().await;
        let now = Utc::now();

        let first = repo.insert_survey(&record_at("A", now)).await.unwrap();
        let second = repo.insert_survey(&record_at("B", now)).await.unwrap();

        let surveys = repo.list_surveys().await.unwrap();
        assert_eq!(surveys[0].id, second.id);
        assert_eq!(surveys[1].id, first.id);
    }

    #[tokio::test]
    async fn test_clock_stepping_back_keeps_newest_first() {
        let repo = setup_test_db().await;
        let now = Utc::now();

        let first = repo.insert_survey(&record_at("A", now)).await.unwrap();
        let second = repo
            .insert_survey(&record_at("B", now - Duration::milliseconds(3)))
            .await
            .unwrap();

        assert!(second.created_at >= first.created_at);

        let surveys = repo.list_surveys().await.unwrap();
        let order: Vec<_> = surveys.iter().map(|s| s.assembly.as_deref().unwrap()).collect();
        assert_eq!(order, vec!["B", "A"]);
        assert_eq!(surveys[0].id, second.id);
        assert_eq!(surveys[0].created_at, second.created_at);
    }

    #[tokio::test]
    async fn test_coordinates_and_audio_round_trip() {
        let repo = setup_test_db().await;
        let mut record = record_at("Hebbal", Utc::now());
        record.latitude = Some(12.9716);
        record.longitude = Some(77.5946);
        record.audio_base64 = Some("UklGRiQAAABXQVZF".to_string());

        repo.insert_survey(&record).await.unwrap();

        let stored = repo.list_surveys().await.unwrap().remove(0);
        assert_eq!(stored.latitude, Some(12.9716));
        assert_eq!(stored.longitude, Some(77.5946));
        assert_eq!(stored.audio_base64.as_deref(), Some("UklGRiQAAABXQVZF"));
    }

    #[tokio::test]
    async fn test_closed_pool_reports_storage_unavailable() {
        let repo = setup_test_db().await;
        repo.pool().close().await;

        let err = repo.list_surveys().await.unwrap_err();
        assert!(matches!(err, crate::error::SurveyError::StorageUnavailable(_)));
    }
}
