//! Outreach campaign listing.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::listing::{non_blank, Listing, ListingKind};
use crate::models::user::Owner;
use crate::stats::descriptor::{major_units, minor_units};
use crate::stats::{Aggregate, Dimension, Mean, Measure, Qualifier, StatusSet, Tally};

pub const PLATFORM: &str = "platform";
pub const TOTAL_BUDGET: &str = "total_budget";
pub const TOTAL_LEADS: &str = "total_leads";
pub const TOTAL_CONVERSIONS: &str = "total_conversions";
pub const CONVERSION_RATE: &str = "conversion_rate";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Completed,
    #[default]
    Draft,
}

impl StatusSet for CampaignStatus {
    const ALL: &'static [Self] = &[
        CampaignStatus::Active,
        CampaignStatus::Completed,
        CampaignStatus::Draft,
    ];

    fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Draft => "draft",
        }
    }

    fn label(self) -> &'static str {
        match self {
            CampaignStatus::Active => "Active",
            CampaignStatus::Completed => "Completed",
            CampaignStatus::Draft => "Draft",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub target_audience: String,
    pub platform: String,
    pub budget: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: CampaignStatus,
    pub leads_count: u32,
    pub responses_count: u32,
    /// Percentage of leads that responded; derived, never submitted.
    pub conversion_rate: f64,
    pub message_template: Option<String>,
    pub owner_id: Uuid,
    pub owner_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// Responses per lead as a percentage, zero without leads.
pub fn conversion_rate(leads: u32, responses: u32) -> f64 {
    if leads == 0 {
        0.0
    } else {
        f64::from(responses) * 100.0 / f64::from(leads)
    }
}

fn dates_in_order(draft: &CreateCampaign) -> Result<(), ValidationError> {
    match (draft.start_date, draft.end_date) {
        (Some(start), Some(end)) if end < start => Err(ValidationError::new("dates")
            .with_message("end date must not be before start date".into())),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "dates_in_order"))]
pub struct CreateCampaign {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_audience: String,
    #[validate(length(min = 1, max = 50, message = "platform is required"))]
    pub platform: String,
    #[validate(range(min = 0.0, max = 1_000_000_000_000.0, message = "budget must be between 0 and 1 trillion"))]
    pub budget: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: CampaignStatus,
    #[serde(default)]
    pub leads_count: u32,
    #[serde(default)]
    pub responses_count: u32,
    pub message_template: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCampaign {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "platform must not be empty"))]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1_000_000_000_000.0, message = "budget must be between 0 and 1 trillion"))]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leads_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Campaign dashboard statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStats {
    pub active: u64,
    pub completed: u64,
    pub draft: u64,
    pub by_platform: BTreeMap<String, u64>,
    /// Budget of active and completed campaigns.
    pub total_budget: f64,
    pub total_leads: i64,
    pub total_conversions: i64,
    /// Mean conversion rate over campaigns with at least one lead.
    pub average_conversion_rate: f64,
}

impl From<&Aggregate<CampaignStatus>> for CampaignStats {
    fn from(agg: &Aggregate<CampaignStatus>) -> Self {
        Self {
            active: agg.count(CampaignStatus::Active),
            completed: agg.count(CampaignStatus::Completed),
            draft: agg.count(CampaignStatus::Draft),
            by_platform: agg.dimension(PLATFORM).cloned().unwrap_or_default(),
            total_budget: major_units(agg.sum(TOTAL_BUDGET)),
            total_leads: saturate(agg.sum(TOTAL_LEADS)),
            total_conversions: saturate(agg.sum(TOTAL_CONVERSIONS)),
            average_conversion_rate: agg.mean(CONVERSION_RATE).value() / RATE_SCALE,
        }
    }
}

/// Millionths of a percentage point per rate sample.
const RATE_SCALE: f64 = 1_000_000.0;

fn saturate(total: i128) -> i64 {
    i64::try_from(total).unwrap_or(if total < 0 { i64::MIN } else { i64::MAX })
}

fn platform(campaign: &Campaign) -> &str {
    &campaign.platform
}

fn budget(campaign: &Campaign) -> i64 {
    minor_units(campaign.budget)
}

fn leads(campaign: &Campaign) -> i64 {
    i64::from(campaign.leads_count)
}

fn responses(campaign: &Campaign) -> i64 {
    i64::from(campaign.responses_count)
}

fn has_leads(campaign: &Campaign) -> bool {
    campaign.leads_count > 0
}

fn rate(campaign: &Campaign) -> i64 {
    (campaign.conversion_rate * RATE_SCALE).round() as i64
}

const DIMENSIONS: &[Dimension<Campaign>] = &[Dimension {
    name: PLATFORM,
    value: platform,
}];

const MEASURES: &[Measure<Campaign>] = &[
    Measure {
        name: TOTAL_BUDGET,
        when: Qualifier::InStatus(&[CampaignStatus::Active, CampaignStatus::Completed]),
        amount: budget,
    },
    Measure {
        name: TOTAL_LEADS,
        when: Qualifier::Always,
        amount: leads,
    },
    Measure {
        name: TOTAL_CONVERSIONS,
        when: Qualifier::Always,
        amount: responses,
    },
];

const MEANS: &[Mean<Campaign>] = &[Mean {
    name: CONVERSION_RATE,
    include: has_leads,
    sample: rate,
}];

impl Tally for Campaign {
    type Status = CampaignStatus;

    fn key(&self) -> Uuid {
        self.id
    }

    fn status(&self) -> CampaignStatus {
        self.status
    }

    fn dimensions() -> &'static [Dimension<Self>] {
        DIMENSIONS
    }

    fn measures() -> &'static [Measure<Self>] {
        MEASURES
    }

    fn means() -> &'static [Mean<Self>] {
        MEANS
    }
}

/// Trimmed, non-blank tags in first-seen order without duplicates.
fn distinct_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in non_blank(tags) {
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

impl Listing for Campaign {
    type Draft = CreateCampaign;
    type Patch = UpdateCampaign;
    type Stats = CampaignStats;

    const KIND: ListingKind = ListingKind {
        noun: "Campaign",
        singular: "campaign",
        plural: "campaigns",
    };

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(
        draft: CreateCampaign,
        id: Uuid,
        owner: &Owner,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            target_audience: draft.target_audience,
            platform: draft.platform,
            budget: draft.budget,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: draft.status,
            leads_count: draft.leads_count,
            responses_count: draft.responses_count,
            conversion_rate: conversion_rate(draft.leads_count, draft.responses_count),
            message_template: draft.message_template,
            owner_id: owner.id,
            owner_name: owner.name.clone(),
            created_at,
            tags: distinct_tags(draft.tags),
        }
    }

    fn apply_patch(&mut self, patch: UpdateCampaign) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(target_audience) = patch.target_audience {
            self.target_audience = target_audience;
        }
        if let Some(platform) = patch.platform {
            self.platform = platform;
        }
        if let Some(budget) = patch.budget {
            self.budget = budget;
        }
        if patch.start_date.is_some() {
            self.start_date = patch.start_date;
        }
        if patch.end_date.is_some() {
            self.end_date = patch.end_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(leads) = patch.leads_count {
            self.leads_count = leads;
        }
        if let Some(responses) = patch.responses_count {
            self.responses_count = responses;
        }
        if patch.message_template.is_some() {
            self.message_template = patch.message_template;
        }
        if let Some(tags) = patch.tags {
            self.tags = distinct_tags(tags);
        }
        self.conversion_rate = conversion_rate(self.leads_count, self.responses_count);
    }
}
