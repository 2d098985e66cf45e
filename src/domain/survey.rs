//! Survey submission and record types.
//!
//! A submission arrives with camelCase keys and is mapped onto the
//! snake_case attributes of a stored record.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Incoming survey payload as sent by field clients.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveySubmission {
    pub assembly: String,
    pub gba_ward: String,
    pub polling_station_name: String,
    pub polling_station_number: String,
    pub surveyor_name: String,
    pub surveyor_mobile: String,

    pub interviewer_name: String,
    pub interviewer_age: String,
    pub interviewer_gender: String,
    pub interviewer_caste: String,
    pub interviewer_community: String,
    pub interviewer_mobile: String,
    pub interviewer_education: String,
    pub interviewer_work: String,

    pub q1: String,
    pub q2: String,
    pub q3: String,
    pub q4: String,

    #[serde(default)]
    pub candidate_priority1: Option<String>,
    #[serde(default)]
    pub candidate_priority2: Option<String>,
    #[serde(default)]
    pub candidate_priority3: Option<String>,

    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub longitude: Option<f64>,

    /// Base64-encoded audio clip. Kept under its historical snake_case key.
    #[serde(default, rename = "audio_base64", alias = "audioBase64")]
    pub audio_base64: Option<String>,
}

/// Accepts a JSON number, a numeric string, or null.
fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Coordinate {
        Number(f64),
        Text(String),
    }

    match Option::<Coordinate>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Coordinate::Number(value)) => Ok(Some(value)),
        Some(Coordinate::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Some)
            .ok_or_else(|| {
                serde::de::Error::custom(format!("`{}` is not a valid coordinate", text))
            }),
    }
}

/// A validated record ready to be inserted.
///
/// Candidate priorities are empty strings when omitted; every other
/// optional attribute stays absent.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSurveyRecord {
    pub assembly: String,
    pub gba_ward: String,
    pub polling_station_name: String,
    pub polling_station_number: String,
    pub surveyor_name: String,
    pub surveyor_mobile: String,
    pub interviewer_name: String,
    pub interviewer_age: String,
    pub interviewer_gender: String,
    pub interviewer_caste: String,
    pub interviewer_community: String,
    pub interviewer_mobile: String,
    pub interviewer_education: String,
    pub interviewer_work: String,
    pub q1: String,
    pub q2: String,
    pub q3: String,
    pub q4: String,
    pub candidate_priority1: String,
    pub candidate_priority2: String,
    pub candidate_priority3: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub audio_base64: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewSurveyRecord {
    /// Map a submission onto storage attributes, stamping the creation time.
    pub fn from_submission(submission: SurveySubmission, created_at: DateTime<Utc>) -> Self {
        Self {
            assembly: submission.assembly,
            gba_ward: submission.gba_ward,
            polling_station_name: submission.polling_station_name,
            polling_station_number: submission.polling_station_number,
            surveyor_name: submission.surveyor_name,
            surveyor_mobile: submission.surveyor_mobile,
            interviewer_name: submission.interviewer_name,
            interviewer_age: submission.interviewer_age,
            interviewer_gender: submission.interviewer_gender,
            interviewer_caste: submission.interviewer_caste,
            interviewer_community: submission.interviewer_community,
            interviewer_mobile: submission.interviewer_mobile,
            interviewer_education: submission.interviewer_education,
            interviewer_work: submission.interviewer_work,
            q1: submission.q1,
            q2: submission.q2,
            q3: submission.q3,
            q4: submission.q4,
            candidate_priority1: submission.candidate_priority1.unwrap_or_default(),
            candidate_priority2: submission.candidate_priority2.unwrap_or_default(),
            candidate_priority3: submission.candidate_priority3.unwrap_or_default(),
            latitude: submission.latitude,
            longitude: submission.longitude,
            audio_base64: submission.audio_base64,
            // Stored precision is microseconds.
            created_at: created_at.trunc_subsecs(6),
        }
    }
}

/// A stored survey record, as returned by the read endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SurveyRecord {
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
    pub created_at: DateTime<Utc>,
}

/// Identity and timestamp assigned to a freshly stored record.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SurveyReceipt {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

/// A complete submission body, as a client would post it.
#[cfg(test)]
pub(crate) fn full_payload() -> serde_json::Value {
    serde_json::json!({
        "assembly": "Shivajinagar",
        "gbaWard": "Ward 92",
        "pollingStationName": "Govt Primary School",
        "pollingStationNumber": "114",
        "surveyorName": "Asha",
        "surveyorMobile": "9000000001",
        "interviewerName": "Ravi",
        "interviewerAge": "34",
        "interviewerGender": "Male",
        "interviewerCaste": "OBC",
        "interviewerCommunity": "Hindu",
        "interviewerMobile": "9000000002",
        "interviewerEducation": "Graduate",
        "interviewerWork": "Driver",
        "q1": "Yes",
        "q2": "No",
        "q3": "Maybe",
        "q4": "Yes"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_submission_defaults() {
        let submission: SurveySubmission = serde_json::from_value(full_payload()).unwrap();
        let record = NewSurveyRecord::from_submission(submission, Utc::now());

        assert_eq!(record.gba_ward, "Ward 92");
        assert_eq!(record.interviewer_work, "Driver");
        assert_eq!(record.candidate_priority1, "");
        assert_eq!(record.candidate_priority2, "");
        assert_eq!(record.candidate_priority3, "");
        assert_eq!(record.latitude, None);
        assert_eq!(record.longitude, None);
        assert_eq!(record.audio_base64, None);
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let mut payload = full_payload();
        payload.as_object_mut().unwrap().remove("interviewerName");

        let err = serde_json::from_value::<SurveySubmission>(payload).unwrap_err();
        assert!(err.to_string().contains("interviewerName"));
    }

    #[test]
    fn test_null_required_field_rejected() {
        let mut payload = full_payload();
        payload["q3"] = serde_json::Value::Null;

        assert!(serde_json::from_value::<SurveySubmission>(payload).is_err());
    }

    #[test]
    fn test_coordinates_accept_numbers_and_numeric_strings() {
        let mut payload = full_payload();
        payload["latitude"] = json!(12.9716);
        payload["longitude"] = json!(" 77.5946 ");

        let submission: SurveySubmission = serde_json::from_value(payload).unwrap();
        assert_eq!(submission.latitude, Some(12.9716));
        assert_eq!(submission.longitude, Some(77.5946));
    }

    #[test]
    fn test_malformed_coordinate_rejected() {
        let mut payload = full_payload();
        payload["latitude"] = json!("north-ish");
        assert!(serde_json::from_value::<SurveySubmission>(payload).is_err());

        let mut payload = full_payload();
        payload["longitude"] = json!(true);
        assert!(serde_json::from_value::<SurveySubmission>(payload).is_err());
    }

    #[test]
    fn test_null_coordinate_is_absent() {
        let mut payload = full_payload();
        payload["latitude"] = serde_json::Value::Null;

        let submission: SurveySubmission = serde_json::from_value(payload).unwrap();
        assert_eq!(submission.latitude, None);
    }

    #[test]
    fn test_audio_key_and_priorities_kept() {
        let mut payload = full_payload();
        payload["audio_base64"] = json!("UklGRiQAAABXQVZF");
        payload["candidatePriority2"] = json!("Roads");

        let submission: SurveySubmission = serde_json::from_value(payload).unwrap();
        let record = NewSurveyRecord::from_submission(submission, Utc::now());
        assert_eq!(record.audio_base64.as_deref(), Some("UklGRiQAAABXQVZF"));
        assert_eq!(record.candidate_priority1, "");
        assert_eq!(record.candidate_priority2, "Roads");

        let mut payload = full_payload();
        payload["audioBase64"] = json!("AAAA");
        let submission: SurveySubmission = serde_json::from_value(payload).unwrap();
        assert_eq!(submission.audio_base64.as_deref(), Some("AAAA"));
    }
}
