//! Create/edit form state for a single job.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AppError;
use crate::models::{Job, JobPayload, JobStatus};

/// Date format of the form's publish-date input.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Editable copy of a job. Text fields are kept as typed; empty optional
/// fields are left out of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub job_type: String,
    pub job_location: String,
    pub description: String,
    pub link: String,
    pub published_at: String,
    pub status: JobStatus,
    pub tags: Vec<String>,
}

impl Default for JobDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            job_type: String::new(),
            job_location: String::new(),
            description: String::new(),
            link: String::new(),
            published_at: String::new(),
            status: JobStatus::Imported,
            tags: Vec::new(),
        }
    }
}

impl JobDraft {
    /// Pre-fills the form from an existing job.
    pub fn from_job(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            company: job.company.clone().unwrap_or_default(),
            job_type: job.job_type.clone().unwrap_or_default(),
            job_location: job.job_location.clone().unwrap_or_default(),
            description: job.description.clone().unwrap_or_default(),
            link: job.link.clone().unwrap_or_default(),
            published_at: job
                .published_at
                .map(|at| at.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            status: job.status,
            tags: job.tags.iter().cloned().collect(),
        }
    }

    /// Adds a trimmed tag. Returns false for empty or duplicate tags.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Checks every field and reports all problems in one error.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut problems: Vec<(&str, &str)> = Vec::new();

        if self.title.trim().is_empty() {
            problems.push(("title", "Title is required."));
        }

        let link = self.link.trim();
        if !link.is_empty() && Url::parse(link).is_err() {
            problems.push(("link", "Link must be an absolute URL."));
        }

        let published = self.published_at.trim();
        if !published.is_empty() && !is_valid_date(published) {
            problems.push((
                "publishedAt",
                "Published date must be YYYY-MM-DD or an RFC 3339 timestamp.",
            ));
        }

        if problems.is_empty() {
            return Ok(());
        }

        let field = problems.iter().map(|(f, _)| *f).collect::<Vec<_>>().join(", ");
        let message = problems.iter().map(|(_, m)| *m).collect::<Vec<_>>().join(" ");
        Err(AppError::Validation { field, message })
    }

    /// Request body for create/update. Call [`validate`](Self::validate) first.
    pub fn into_payload(self) -> JobPayload {
        JobPayload {
            title: Some(self.title.trim().to_string()),
            company: non_empty(self.company),
            job_type: non_empty(self.job_type),
            job_location: non_empty(self.job_location),
            description: non_empty(self.description),
            link: non_empty(self.link),
            published_at: non_empty(self.published_at),
            status: Some(self.status),
            tags: Some(self.tags),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> JobDraft {
        JobDraft {
            title: "Backend Engineer".into(),
            link: "https://jobs.example.com/1".into(),
            published_at: "2024-03-01".into(),
            ..Default::default()
        }
    }

    #[test]
    fn from_job_formats_publish_date() {
        let job: Job = serde_json::from_value(serde_json::json!({
            "_id": "1",
            "title": "Dev",
            "company": "Acme",
            "publishedAt": "2024-03-01T15:30:00Z",
            "status": "updated",
            "tags": ["b", "a"]
        }))
        .unwrap();

        let draft = JobDraft::from_job(&job);

        assert_eq!(draft.published_at, "2024-03-01");
        assert_eq!(draft.company, "Acme");
        assert_eq!(draft.link, "");
        assert_eq!(draft.status, JobStatus::Updated);
        assert_eq!(draft.tags, vec!["a", "b"]);
    }

    #[test]
    fn valid_draft_passes() {
        assert!(valid_draft().validate().is_ok());
        assert!(JobDraft {
            published_at: "2024-03-01T10:00:00+02:00".into(),
            ..valid_draft()
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn reports_all_problems_at_once() {
        let draft = JobDraft {
            title: "   ".into(),
            link: "/relative/path".into(),
            published_at: "March 1st".into(),
            ..Default::default()
        };

        match draft.validate() {
            Err(AppError::Validation { field, message }) => {
                assert_eq!(field, "title, link, publishedAt");
                assert!(message.contains("Title is required."));
                assert!(message.contains("absolute URL"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn tags_are_trimmed_and_unique() {
        let mut draft = JobDraft::default();

        assert!(draft.add_tag("  rust "));
        assert!(!draft.add_tag("rust"));
        assert!(!draft.add_tag("   "));
        assert!(draft.add_tag("remote"));
        assert!(draft.remove_tag("rust"));
        assert!(!draft.remove_tag("rust"));

        assert_eq!(draft.tags, vec!["remote"]);
    }

    #[test]
    fn payload_omits_empty_fields() {
        let payload = JobDraft {
            company: "  ".into(),
            ..valid_draft()
        }
        .into_payload();

        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["title"], "Backend Engineer");
        assert!(value.get("company").is_none());
        assert!(value.get("description").is_none());
        assert_eq!(value["publishedAt"], "2024-03-01");
        assert_eq!(value["status"], "imported");
    }
}
