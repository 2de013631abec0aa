//! Try-on jobs and their lifecycle.

use std::fmt;

use base64::prelude::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ImageInput;
use crate::{Error, Result};

/// Upper bound the server accepts for one batch (paid plans; free plans get 5).
pub const MAX_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TryOnMode {
    /// Upper-body garment only.
    #[default]
    Top,
    /// Top plus bottom garment.
    Full,
}

impl TryOnMode {
    pub fn credit_cost(self) -> u32 {
        match self {
            TryOnMode::Top => 1,
            TryOnMode::Full => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TryOnMode::Top => "top",
            TryOnMode::Full => "full",
        }
    }
}

impl fmt::Display for TryOnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether `self -> next` is a legal observation. Repeating the same
    /// status is always legal; nothing leaves a terminal status.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        match (self, next) {
            (a, b) if a == b => true,
            (Queued, Processing | Completed | Failed) => true,
            (Processing, Completed | Failed) => true,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryOnJob {
    pub id: String,
    pub mode: TryOnMode,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_image_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub credits_used: u32,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        with = "super::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryOnJob {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Decoded result image (PNG). `None` until the job completes.
    pub fn result_image_bytes(&self) -> Option<Result<Vec<u8>>> {
        self.result_image_base64.as_deref().map(decode_image)
    }
}

/// A single try-on submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TryOnRequest {
    pub mode: TryOnMode,
    pub person_image_base64: String,
    pub clothing_image_base64: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_image_base64: Option<String>,
}

impl TryOnRequest {
    pub fn top(person: &ImageInput, clothing: &ImageInput) -> Self {
        Self {
            mode: TryOnMode::Top,
            person_image_base64: person.to_data_url(),
            clothing_image_base64: clothing.to_data_url(),
            bottom_image_base64: None,
        }
    }

    pub fn full(person: &ImageInput, top: &ImageInput, bottom: &ImageInput) -> Self {
        Self {
            mode: TryOnMode::Full,
            person_image_base64: person.to_data_url(),
            clothing_image_base64: top.to_data_url(),
            bottom_image_base64: Some(bottom.to_data_url()),
        }
    }

    pub fn credit_cost(&self) -> u32 {
        self.mode.credit_cost()
    }

    /// Full mode needs a bottom garment; every image must be non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.person_image_base64.is_empty() {
            return Err(Error::invalid_request("person image is required"));
        }
        if self.clothing_image_base64.is_empty() {
            return Err(Error::invalid_request("clothing image is required"));
        }
        match (self.mode, self.bottom_image_base64.as_deref()) {
            (TryOnMode::Full, None | Some("")) => Err(Error::invalid_request(
                "bottom image is required for full mode",
            )),
            _ => Ok(()),
        }
    }
}

/// Batch items carry the same payload as a single request.
pub type BatchItem = TryOnRequest;

/// Job created by a batch submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchJob {
    pub id: String,
    pub status: JobStatus,
    pub mode: TryOnMode,
}

/// Entry of `/batch/tryon/status`. Jobs the server cannot find are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchJobStatus {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub result_image_base64: Option<String>,
}

impl BatchJobStatus {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobHistory {
    pub jobs: Vec<TryOnJob>,
    pub skip: u32,
    pub limit: u32,
}

/// Accepts bare base64 or a `data:` URL.
fn decode_image(encoded: &str) -> Result<Vec<u8>> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };
    BASE64_STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::invalid_request(format!("malformed result image: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImageInput {
        ImageInput::from_bytes(vec![0x89, 0x50, 0x4E, 0x47], "image/png").unwrap()
    }

    #[test]
    fn test_transitions() {
        use JobStatus::*;
        assert!(Queued.can_transition_to(Processing));
        assert!(Queued.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Failed));
        assert!(Processing.can_transition_to(Processing));
        assert!(!Processing.can_transition_to(Queued));
        assert!(!Completed.can_transition_to(Processing));
        assert!(!Failed.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Completed));
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn test_mode_cost() {
        assert_eq!(TryOnMode::Top.credit_cost(), 1);
        assert_eq!(TryOnMode::Full.credit_cost(), 2);
        assert_eq!(TryOnMode::default(), TryOnMode::Top);
    }

    #[test]
    fn test_parse_job_response() {
        let json = r#"{
            "id": "0b7f6a52-1c1e-4c7e-9a7f-0d3e2c1b9a88",
            "mode": "full",
            "status": "completed",
            "result_image_base64": "iVBORw0KGgo=",
            "error_message": null,
            "credits_used": 2,
            "created_at": "2025-03-01T09:00:00.250000",
            "completed_at": "2025-03-01T09:00:41.100000"
        }"#;

        let job: TryOnJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.mode, TryOnMode::Full);
        assert!(job.is_terminal());
        assert!(job.completed_at.unwrap() > job.created_at);
        assert_eq!(
            job.result_image_bytes().unwrap().unwrap(),
            vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
        );
    }

    #[test]
    fn test_queued_job_has_no_result() {
        let json = r#"{"id":"j1","mode":"top","status":"queued","credits_used":1,
                       "created_at":"2025-03-01T09:00:00"}"#;
        let job: TryOnJob = serde_json::from_str(json).unwrap();
        assert!(job.result_image_bytes().is_none());
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn test_request_validation() {
        let img = image();
        assert!(TryOnRequest::top(&img, &img).validate().is_ok());
        assert!(TryOnRequest::full(&img, &img, &img).validate().is_ok());

        let mut missing_bottom = TryOnRequest::full(&img, &img, &img);
        missing_bottom.bottom_image_base64 = None;
        assert!(matches!(
            missing_bottom.validate(),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_request_serialization() {
        let img = image();
        let json = serde_json::to_value(TryOnRequest::top(&img, &img)).unwrap();
        assert_eq!(json["mode"], "top");
        assert!(json.get("bottom_image_base64").is_none());
        assert!(
            json["person_image_base64"]
                .as_str()
                .unwrap()
                .starts_with("data:image/png;base64,")
        );
    }

    #[test]
    fn test_decode_data_url() {
        assert_eq!(decode_image("data:image/png;base64,AQID").unwrap(), vec![1, 2, 3]);
        assert_eq!(decode_image("AQID").unwrap(), vec![1, 2, 3]);
        assert!(decode_image("%%%").is_err());
    }
}
