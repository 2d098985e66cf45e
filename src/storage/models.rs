//! Database models for the survey intake service.
//!
//! These are the row types returned by SQLx queries.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::{SurveyReceipt, SurveyRecord};
use crate::error::SurveyError;

/// Database row for survey_responses table.
#[derive(Debug, Clone, FromRow)]
pub struct SurveyRow {
    pub id: i64,
    pub assembly: Option<String>,
    pub gba_ward: Option<String>,
    pub polling_station_name: Option<String>,
    pub polling_station_number: Option<String>,
    pub surveyor_name: Option<String>,
    pub surveyor_mobile: Option<String>,
    pub interviewer_name: Option<String>,
    pub interviewer_age: Option<String>,
    pub interviewer_gender: Option<String>,
    pub interviewer_caste: Option<String>,
    pub interviewer_community: Option<String>,
    pub interviewer_mobile: Option<String>,
    pub interviewer_education: Option<String>,
    pub interviewer_work: Option<String>,
    pub q1: Option<String>,
    pub q2: Option<String>,
    pub q3: Option<String>,
    pub q4: Option<String>,
    pub candidate_priority1: Option<String>,
    pub candidate_priority2: Option<String>,
    pub candidate_priority3: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub audio_base64: Option<String>,
    pub created_at: String,
}

impl TryFrom<SurveyRow> for SurveyRecord {
    type Error = SurveyError;

    fn try_from(row: SurveyRow) -> Result<Self, Self::Error> {
        Ok(SurveyRecord {
            id: row.id,
            assembly: row.assembly,
            gba_ward: row.gba_ward,
            polling_station_name: row.polling_station_name,
            polling_station_number: row.polling_station_number,
            surveyor_name: row.surveyor_name,
            surveyor_mobile: row.surveyor_mobile,
            interviewer_name: row.interviewer_name,
            interviewer_age: row.interviewer_age,
            interviewer_gender: row.interviewer_gender,
            interviewer_caste: row.interviewer_caste,
            interviewer_community: row.interviewer_community,
            interviewer_mobile: row.interviewer_mobile,
            interviewer_education: row.interviewer_education,
            interviewer_work: row.interviewer_work,
            q1: row.q1,
            q2: row.q2,
            q3: row.q3,
            q4: row.q4,
            candidate_priority1: row.candidate_priority1,
            candidate_priority2: row.candidate_priority2,
            candidate_priority3: row.candidate_priority3,
            latitude: row.latitude,
            longitude: row.longitude,
            audio_base64: row.audio_base64,
            created_at: parse_created_at(row.id, &row.created_at)?,
        })
    }
}

/// Identity and stored timestamp handed back by an insert.
#[derive(Debug, Clone, FromRow)]
pub struct ReceiptRow {
    pub id: i64,
    pub created_at: String,
}

impl TryFrom<ReceiptRow> for SurveyReceipt {
    type Error = SurveyError;

    fn try_from(row: ReceiptRow) -> Result<Self, Self::Error> {
        Ok(SurveyReceipt {
            id: row.id,
            created_at: parse_created_at(row.id, &row.created_at)?,
        })
    }
}

fn parse_created_at(id: i64, raw: &str) -> Result<DateTime<Utc>, SurveyError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            SurveyError::Internal(format!(
                "Survey {} has an unreadable created_at: {}",
                id, e
            ))
        })
}
