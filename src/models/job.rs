//! Job posting listing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::listing::{non_blank, Listing, ListingKind};
use crate::models::user::Owner;
use crate::stats::{Aggregate, Dimension, StatusSet, Tally};

pub const CATEGORY: &str = "category";
pub const TYPE: &str = "type";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Closed,
    Draft,
}

impl StatusSet for JobStatus {
    const ALL: &'static [Self] = &[JobStatus::Active, JobStatus::Closed, JobStatus::Draft];

    fn as_str(self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Closed => "closed",
            JobStatus::Draft => "draft",
        }
    }

    fn label(self) -> &'static str {
        match self {
            JobStatus::Active => "Active",
            JobStatus::Closed => "Closed",
            JobStatus::Draft => "Draft",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
    pub description: String,
    pub requirements: Vec<String>,
    /// Employment type, e.g. `Full-time`.
    #[serde(rename = "type")]
    pub job_type: String,
    pub category: String,
    pub owner_id: Uuid,
    pub owner_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: JobStatus,
}

#[allow(clippy::ptr_arg)]
fn has_requirement(requirements: &Vec<String>) -> Result<(), ValidationError> {
    if requirements.iter().any(|r| !r.trim().is_empty()) {
        Ok(())
    } else {
        Err(ValidationError::new("requirements")
            .with_message("at least one requirement is required".into()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJob {
    #[validate(length(min = 1, max = 100, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "company is required"))]
    pub company: String,
    #[validate(length(min = 1, max = 100, message = "location is required"))]
    pub location: String,
    pub salary: Option<String>,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(custom(function = "has_requirement"))]
    pub requirements: Vec<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50, message = "type is required"))]
    pub job_type: String,
    #[validate(length(min = 1, max = 50, message = "category is required"))]
    pub category: String,
    #[serde(default)]
    pub status: JobStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateJob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "title must not be empty"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "has_requirement"))]
    pub requirements: Option<Vec<String>>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "type must not be empty"))]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "category must not be empty"))]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

/// Job dashboard statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub active: u64,
    pub closed: u64,
    pub draft: u64,
    pub by_category: BTreeMap<String, u64>,
    pub by_type: BTreeMap<String, u64>,
}

impl From<&Aggregate<JobStatus>> for JobStats {
    fn from(agg: &Aggregate<JobStatus>) -> Self {
        Self {
            active: agg.count(JobStatus::Active),
            closed: agg.count(JobStatus::Closed),
            draft: agg.count(JobStatus::Draft),
            by_category: agg.dimension(CATEGORY).cloned().unwrap_or_default(),
            by_type: agg.dimension(TYPE).cloned().unwrap_or_default(),
        }
    }
}

fn category(job: &Job) -> &str {
    &job.category
}

fn job_type(job: &Job) -> &str {
    &job.job_type
}

const DIMENSIONS: &[Dimension<Job>] = &[
    Dimension {
        name: CATEGORY,
        value: category,
    },
    Dimension {
        name: TYPE,
        value: job_type,
    },
];

impl Tally for Job {
    type Status = JobStatus;

    fn key(&self) -> Uuid {
        self.id
    }

    fn status(&self) -> JobStatus {
        self.status
    }

    fn dimensions() -> &'static [Dimension<Self>] {
        DIMENSIONS
    }
}

impl Listing for Job {
    type Draft = CreateJob;
    type Patch = UpdateJob;
    type Stats = JobStats;

    const KIND: ListingKind = ListingKind {
        noun: "Job",
        singular: "job",
        plural: "jobs",
    };

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(draft: CreateJob, id: Uuid, owner: &Owner, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            company: draft.company,
            location: draft.location,
            salary: draft.salary,
            description: draft.description,
            requirements: non_blank(draft.requirements),
            job_type: draft.job_type,
            category: draft.category,
            owner_id: owner.id,
            owner_name: owner.name.clone(),
            created_at,
            status: draft.status,
        }
    }

    fn apply_patch(&mut self, patch: UpdateJob) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if patch.salary.is_some() {
            self.salary = patch.salary;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(requirements) = patch.requirements {
            self.requirements = non_blank(requirements);
        }
        if let Some(job_type) = patch.job_type {
            self.job_type = job_type;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(category: &str, job_type: &str, status: JobStatus) -> CreateJob {
        CreateJob {
            title: "Backend Engineer".to_string(),
            company: "Data Systems Corp".to_string(),
            location: "Remote".to_string(),
            salary: Some("$130,000 - $160,000".to_string()),
            description: "Build APIs".to_string(),
            requirements: vec!["Rust".to_string(), " ".to_string()],
            job_type: job_type.to_string(),
            category: category.to_string(),
            status,
        }
    }

    fn owner() -> Owner {
        Owner {
            id: Uuid::nil(),
            name: None,
        }
    }

    #[test]
    fn type_field_uses_wire_name() {
        let job = Job::from_draft(
            draft("Development", "Full-time", JobStatus::Active),
            Uuid::now_v7(),
            &owner(),
            Utc::now(),
        );
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["type"], "Full-time");
        assert!(json.get("job_type").is_none());
    }

    #[test]
    fn blank_requirements_are_dropped() {
        let job = Job::from_draft(
            draft("Development", "Full-time", JobStatus::Active),
            Uuid::now_v7(),
            &owner(),
            Utc::now(),
        );
        assert_eq!(job.requirements, vec!["Rust"]);
    }

    #[test]
    fn draft_requires_a_non_blank_requirement() {
        let mut d = draft("Development", "Full-time", JobStatus::Active);
        assert!(d.validate().is_ok());
        d.requirements = vec!["  ".to_string()];
        let errors = d.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("requirements"));
    }

    #[test]
    fn stats_count_both_dimensions() {
        let o = owner();
        let now = Utc::now();
        let jobs = vec![
            Job::from_draft(draft("Development", "Full-time", JobStatus::Active), Uuid::now_v7(), &o, now),
            Job::from_draft(draft("Development", "Contract", JobStatus::Closed), Uuid::now_v7(), &o, now),
            Job::from_draft(draft("Design", "Full-time", JobStatus::Draft), Uuid::now_v7(), &o, now),
        ];
        let stats = Job::stats(&jobs);
        assert_eq!((stats.active, stats.closed, stats.draft), (1, 1, 1));
        assert_eq!(stats.by_category.get("Development"), Some(&2));
        assert_eq!(stats.by_type.get("Full-time"), Some(&2));
        assert_eq!(stats.by_type.get("Contract"), Some(&1));

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("byType").is_some());
    }

    #[test]
    fn patch_renames_type() {
        let patch: UpdateJob = serde_json::from_str(r#"{"type":"Internship"}"#).unwrap();
        assert_eq!(patch.job_type.as_deref(), Some("Internship"));
        let mut job = Job::from_draft(
            draft("Development", "Full-time", JobStatus::Active),
            Uuid::now_v7(),
            &owner(),
            Utc::now(),
        );
        job.apply_patch(patch);
        assert_eq!(job.job_type, "Internship");
        assert_eq!(job.category, "Development");
    }
}
