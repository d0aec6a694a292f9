//! Per-user dashboard: the owner's listings, their running statistics, a
//! selection and a queue of user-facing notices.
//!
//! Every mutation goes through the [`ListingSource`] first and is folded into
//! the local collection and aggregate only after the source confirms it, with
//! the same before/after values on both sides. Mutations take `&mut self`, so
//! at most one request per dashboard is in flight.

pub mod format;

use uuid::Uuid;

use crate::client::{ClientError, ListingSource};
use crate::models::user::Owner;
use crate::models::Listing;
use crate::stats::collection;
use crate::stats::{apply_create, apply_delete, apply_update, initialize, Aggregate, ChartPoint};

/// Errors from dashboard operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Source(#[from] ClientError),

    /// No successful load yet.
    #[error("Dashboard data has not been loaded")]
    NotLoaded,

    #[error("No such listing: {0}")]
    UnknownListing(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

struct Loaded<L: Listing> {
    owner: Owner,
    aggregate: Aggregate<L::Status>,
}

pub struct Dashboard<L: Listing, S> {
    source: S,
    listings: Vec<L>,
    loaded: Option<Loaded<L>>,
    selected: Option<Uuid>,
    loading: bool,
    notices: Vec<Notice>,
}

impl<L: Listing, S: ListingSource<L>> Dashboard<L, S> {
    /// A dashboard that is loading until the first [`Dashboard::load`].
    pub fn new(source: S) -> Self {
        Self {
            source,
            listings: Vec::new(),
            loaded: None,
            selected: None,
            loading: true,
            notices: Vec::new(),
        }
    }

    /// Fetch the owner's listings and rebuild the statistics from scratch.
    pub async fn load(&mut self, owner: &Owner) -> Result<(), DashboardError> {
        self.loading = true;
        let result = self.source.fetch_all(owner.id).await;
        self.loading = false;

        match result {
            Ok(listings) => {
                tracing::debug!(kind = L::KIND.singular, count = listings.len(), "Dashboard loaded");
                self.loaded = Some(Loaded {
                    owner: owner.clone(),
                    aggregate: initialize(&listings),
                });
                if self
                    .selected
                    .is_some_and(|id| collection::find(&listings, id).is_none())
                {
                    self.selected = None;
                }
                self.listings = listings;
                Ok(())
            }
            Err(e) => {
                self.fail("Failed to load dashboard data".to_string(), &e);
                Err(e.into())
            }
        }
    }

    /// Create a listing for the loaded owner.
    ///
    /// The source decides the final owner (a REST source takes it from the
    /// session token). A listing that comes back owned by someone else is
    /// returned but kept out of this dashboard's collection and statistics.
    pub async fn create(&mut self, draft: L::Draft) -> Result<L, DashboardError> {
        let Some(owner) = self.loaded.as_ref().map(|loaded| loaded.owner.clone()) else {
            return Err(self.refuse("create", DashboardError::NotLoaded));
        };

        self.loading = true;
        let result = self.source.create(&owner, draft).await;
        self.loading = false;

        match result {
            Ok(created) if created.owner_id() != owner.id => {
                tracing::warn!(
                    kind = L::KIND.singular,
                    id = %created.key(),
                    owner = %owner.id,
                    assigned = %created.owner_id(),
                    "Created listing belongs to another owner"
                );
                self.succeed("created");
                Ok(created)
            }
            Ok(created) => {
                self.listings = collection::insert(&self.listings, created.clone());
                self.fold(|aggregate| apply_create(aggregate, &created));
                self.succeed("created");
                Ok(created)
            }
            Err(e) => Err(self.fail_action("create", e)),
        }
    }

    pub async fn update(&mut self, id: Uuid, patch: L::Patch) -> Result<L, DashboardError> {
        let previous = self.existing("update", id)?;

        self.loading = true;
        let result = self.source.update(id, patch).await;
        self.loading = false;

        match result {
            Ok(next) => {
                self.listings = collection::replace(&self.listings, next.clone());
                self.fold(|aggregate| apply_update(aggregate, &previous, &next));
                self.succeed("updated");
                Ok(next)
            }
            Err(e) => Err(self.fail_action("update", e)),
        }
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<(), DashboardError> {
        let previous = self.existing("delete", id)?;

        self.loading = true;
        let result = self.source.delete(id).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.listings = collection::remove(&self.listings, id);
                self.fold(|aggregate| apply_delete(aggregate, &previous));
                if self.selected == Some(id) {
                    self.selected = None;
                }
                self.succeed("deleted");
                Ok(())
            }
            Err(e) => Err(self.fail_action("delete", e)),
        }
    }

    pub fn select(&mut self, id: Uuid) -> Result<&L, DashboardError> {
        let listing =
            collection::find(&self.listings, id).ok_or(DashboardError::UnknownListing(id))?;
        self.selected = Some(id);
        Ok(listing)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The selected listing as currently stored.
    pub fn selected(&self) -> Option<&L> {
        self.selected
            .and_then(|id| collection::find(&self.listings, id))
    }

    pub fn listings(&self) -> &[L] {
        &self.listings
    }

    pub fn aggregate(&self) -> Option<&Aggregate<L::Status>> {
        self.loaded.as_ref().map(|loaded| &loaded.aggregate)
    }

    pub fn stats(&self) -> Option<L::Stats> {
        self.aggregate().map(L::Stats::from)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn total(&self) -> u64 {
        self.aggregate().map(Aggregate::total).unwrap_or(0)
    }

    pub fn status_chart(&self) -> Vec<ChartPoint> {
        self.aggregate()
            .map(Aggregate::status_points)
            .unwrap_or_default()
    }

    pub fn dimension_chart(&self, name: &str) -> Vec<ChartPoint> {
        self.aggregate()
            .map(|aggregate| aggregate.dimension_points(name))
            .unwrap_or_default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain the pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn existing(&mut self, action: &str, id: Uuid) -> Result<L, DashboardError> {
        if self.loaded.is_none() {
            return Err(self.refuse(action, DashboardError::NotLoaded));
        }
        if let Some(listing) = collection::find(&self.listings, id) {
            return Ok(listing.clone());
        }
        Err(self.refuse(action, DashboardError::UnknownListing(id)))
    }

    fn fold(&mut self, reduce: impl FnOnce(&Aggregate<L::Status>) -> Aggregate<L::Status>) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.aggregate = reduce(&loaded.aggregate);
        }
    }

    fn succeed(&mut self, verb: &str) {
        let message = format!("{} {verb} successfully", L::KIND.noun);
        tracing::info!(kind = L::KIND.singular, "{message}");
        self.notices.push(Notice {
            level: NoticeLevel::Success,
            message,
        });
    }

    fn refuse(&mut self, action: &str, err: DashboardError) -> DashboardError {
        self.fail(format!("Failed to {action} {}", L::KIND.singular), &err);
        err
    }

    fn fail_action(&mut self, action: &str, err: ClientError) -> DashboardError {
        self.fail(format!("Failed to {action} {}", L::KIND.singular), &err);
        err.into()
    }

    fn fail(&mut self, message: String, err: &dyn std::error::Error) {
        tracing::warn!(kind = L::KIND.singular, error = %err, "{message}");
        self.notices.push(Notice {
            level: NoticeLevel::Error,
            message,
        });
    }
}
