//! Behaviour shared by every listing type: create from a draft, merge a
//! partial patch, and summarise into a typed statistics view.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::Owner;
use crate::stats::{initialize, Aggregate, Tally};

/// Names used in routes, logs and notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingKind {
    /// Capitalised noun, e.g. `Item`.
    pub noun: &'static str,
    /// Lower-case singular, e.g. `item`.
    pub singular: &'static str,
    /// Lower-case plural used as the route segment, e.g. `items`.
    pub plural: &'static str,
}

pub trait Listing:
    Tally + Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Fields submitted when creating a listing.
    type Draft: Validate + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Partial update; absent fields keep their value.
    type Patch: Validate
        + Clone
        + Debug
        + Default
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Statistics shape returned by the stats endpoint.
    type Stats: for<'a> From<&'a Aggregate<Self::Status>>
        + Clone
        + Debug
        + PartialEq
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    const KIND: ListingKind;

    fn owner_id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;

    fn from_draft(draft: Self::Draft, id: Uuid, owner: &Owner, created_at: DateTime<Utc>) -> Self;

    fn apply_patch(&mut self, patch: Self::Patch);

    fn stats(listings: &[Self]) -> Self::Stats {
        Self::Stats::from(&initialize(listings))
    }
}

/// Trim every entry and drop the blank ones.
pub(crate) fn non_blank(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
