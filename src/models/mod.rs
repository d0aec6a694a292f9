//! Domain models and DTOs for users and the three listing types.

pub mod campaign;
pub mod item;
pub mod job;
pub mod listing;
pub mod user;

pub use campaign::{Campaign, CampaignStats, CampaignStatus, CreateCampaign, UpdateCampaign};
pub use item::{CreateItem, Item, ItemStats, ItemStatus, UpdateItem};
pub use job::{CreateJob, Job, JobStats, JobStatus, UpdateJob};
pub use listing::{Listing, ListingKind};
