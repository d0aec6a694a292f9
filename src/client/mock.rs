//! In-process listing source for demo sessions.

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::client::{ClientError, ListingSource};
use crate::db::demo::{demo_owner, DemoData};
use crate::db::Table;
use crate::errors::AppError;
use crate::models::user::Owner;
use crate::models::Listing;

/// Listing source backed by a local table instead of the API.
#[derive(Debug)]
pub struct MockSource<L> {
    table: Table<L>,
}

impl<L: Listing> Default for MockSource<L> {
    fn default() -> Self {
        Self::with_rows(Vec::new())
    }
}

impl<L: Listing> MockSource<L> {
    pub fn with_rows(rows: Vec<L>) -> Self {
        Self {
            table: Table::with_rows(rows),
        }
    }

    /// Every listing, newest first.
    pub async fn snapshot(&self) -> Vec<L> {
        self.table.all().await
    }
}

impl<L: DemoData> MockSource<L> {
    /// Seeded with the demo listings owned by the demo administrator.
    pub fn with_demo_data() -> Self {
        Self::with_rows(L::demo_rows(&demo_owner()))
    }
}

impl<L: Listing> ListingSource<L> for MockSource<L> {
    async fn fetch_all(&self, owner: Uuid) -> Result<Vec<L>, ClientError> {
        Ok(self.table.by_owner(owner).await)
    }

    async fn create(&self, owner: &Owner, draft: L::Draft) -> Result<L, ClientError> {
        draft.validate().map_err(AppError::from)?;
        let listing = L::from_draft(draft, Uuid::now_v7(), owner, Utc::now());
        Ok(self.table.insert(listing).await)
    }

    async fn update(&self, id: Uuid, patch: L::Patch) -> Result<L, ClientError> {
        patch.validate().map_err(AppError::from)?;
        let listing = self
            .table
            .modify(id, |listing| {
                listing.apply_patch(patch);
                Ok(())
            })
            .await?;
        Ok(listing)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        self.table.remove(id, |_| Ok(())).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::DEMO_ADMIN_ID;
    use crate::models::{Campaign, CampaignStatus, UpdateCampaign};

    #[tokio::test]
    async fn demo_data_belongs_to_demo_admin() {
        let source = MockSource::<Campaign>::with_demo_data();
        let campaigns = source.fetch_all(DEMO_ADMIN_ID).await.unwrap();
        assert_eq!(campaigns.len(), 4);
        assert!(source.fetch_all(Uuid::nil()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let source = MockSource::<Campaign>::with_demo_data();
        let err = source.delete(Uuid::nil()).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
        let err = source
            .update(Uuid::nil(), UpdateCampaign::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_returns_full_listing() {
        let source = MockSource::<Campaign>::with_demo_data();
        let draft = source
            .snapshot()
            .await
            .into_iter()
            .find(|c| c.status == CampaignStatus::Draft)
            .unwrap();
        let patch = UpdateCampaign {
            status: Some(CampaignStatus::Active),
            leads_count: Some(10),
            responses_count: Some(3),
            ..Default::default()
        };
        let updated = source.update(draft.id, patch).await.unwrap();
        assert_eq!(updated.status, CampaignStatus::Active);
        assert_eq!(updated.name, draft.name);
        assert_eq!(updated.conversion_rate, 30.0);
    }
}
