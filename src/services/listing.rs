//! Listing service: CRUD and per-owner statistics for any stored listing type.

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::db::{MemoryStore, Stored};
use crate::errors::AppError;
use crate::models::user::Owner;

/// Who is asking to change a listing.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub is_admin: bool,
}

/// Only the owner or an administrator may change a listing.
pub fn ensure_can_modify<L: Stored>(listing: &L, actor: Actor) -> Result<(), AppError> {
    if actor.is_admin || listing.owner_id() == actor.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Only the owner can modify this {}",
            L::KIND.singular
        )))
    }
}

pub async fn list_all<L: Stored>(store: &MemoryStore) -> Vec<L> {
    L::table(store).all().await
}

/// Listings of one owner, newest first.
pub async fn list_by_owner<L: Stored>(store: &MemoryStore, owner: Uuid) -> Vec<L> {
    L::table(store).by_owner(owner).await
}

pub async fn stats_for_owner<L: Stored>(store: &MemoryStore, owner: Uuid) -> L::Stats {
    L::stats(&L::table(store).by_owner(owner).await)
}

/// Validate the draft and store a new listing owned by `owner`.
pub async fn create<L: Stored>(
    store: &MemoryStore,
    owner: &Owner,
    draft: L::Draft,
) -> Result<L, AppError> {
    draft.validate()?;
    let listing = L::from_draft(draft, Uuid::now_v7(), owner, Utc::now());
    let listing = L::table(store).insert(listing).await;
    tracing::info!(kind = L::KIND.singular, id = %listing.key(), owner = %owner.id, "Listing created");
    Ok(listing)
}

/// Merge `patch` into the listing after the ownership check.
pub async fn update<L: Stored>(
    store: &MemoryStore,
    id: Uuid,
    actor: Actor,
    patch: L::Patch,
) -> Result<L, AppError> {
    patch.validate()?;
    let listing = L::table(store)
        .modify(id, |listing| {
            ensure_can_modify(listing, actor)?;
            listing.apply_patch(patch);
            Ok(())
        })
        .await?;
    tracing::info!(kind = L::KIND.singular, %id, "Listing updated");
    Ok(listing)
}

pub async fn delete<L: Stored>(store: &MemoryStore, id: Uuid, actor: Actor) -> Result<L, AppError> {
    let removed = L::table(store)
        .remove(id, |listing| ensure_can_modify(listing, actor))
        .await?;
    tracing::info!(kind = L::KIND.singular, %id, "Listing deleted");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateJob, Job, JobStatus, UpdateJob};

    fn draft() -> CreateJob {
        CreateJob {
            title: "Frontend Developer".to_string(),
            company: "Tech Solutions Inc.".to_string(),
            location: "San Francisco, CA".to_string(),
            salary: None,
            description: "React".to_string(),
            requirements: vec!["TypeScript".to_string()],
            job_type: "Full-time".to_string(),
            category: "Development".to_string(),
            status: JobStatus::Active,
        }
    }

    fn owner(n: u128) -> Owner {
        Owner {
            id: Uuid::from_u128(n),
            name: Some(format!("user {n}")),
        }
    }

    fn actor(n: u128, is_admin: bool) -> Actor {
        Actor {
            id: Uuid::from_u128(n),
            is_admin,
        }
    }

    #[tokio::test]
    async fn create_rejects_invalid_draft() {
        let store = MemoryStore::default();
        let mut bad = draft();
        bad.requirements.clear();
        let result = create::<Job>(&store, &owner(1), bad).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.jobs.len().await, 0);
    }

    #[tokio::test]
    async fn only_owner_or_admin_may_update() {
        let store = MemoryStore::default();
        let job: Job = create(&store, &owner(1), draft()).await.unwrap();
        let patch = UpdateJob {
            status: Some(JobStatus::Closed),
            ..Default::default()
        };

        let denied = update::<Job>(&store, job.id, actor(2, false), patch.clone()).await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));
        assert_eq!(store.jobs.find(job.id).await.unwrap().status, JobStatus::Active);

        let by_admin: Job = update(&store, job.id, actor(2, true), patch).await.unwrap();
        assert_eq!(by_admin.status, JobStatus::Closed);
        assert_eq!(by_admin.owner_id, Uuid::from_u128(1));
    }

    #[tokio::test]
    async fn delete_checks_owner_and_stats_follow() {
        let store = MemoryStore::default();
        let job: Job = create(&store, &owner(1), draft()).await.unwrap();
        create::<Job>(&store, &owner(2), draft()).await.unwrap();

        assert_eq!(stats_for_owner::<Job>(&store, Uuid::from_u128(1)).await.active, 1);

        let denied = delete::<Job>(&store, job.id, actor(2, false)).await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));

        delete::<Job>(&store, job.id, actor(1, false)).await.unwrap();
        assert_eq!(stats_for_owner::<Job>(&store, Uuid::from_u128(1)).await.active, 0);
        assert_eq!(list_all::<Job>(&store).await.len(), 1);

        let again = delete::<Job>(&store, job.id, actor(1, false)).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }
}
