//! In-memory tables backing the listings API and the mock data source.

pub mod demo;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;
use crate::models::{Campaign, Item, Job, Listing};

/// One listing table guarded by a single lock; every operation holds the
/// lock for its whole duration.
#[derive(Debug)]
pub struct Table<L> {
    rows: RwLock<Vec<L>>,
}

impl<L: Listing> Default for Table<L> {
    fn default() -> Self {
        Self::with_rows(Vec::new())
    }
}

impl<L: Listing> Table<L> {
    pub fn with_rows(rows: Vec<L>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Every row, newest first.
    pub async fn all(&self) -> Vec<L> {
        let mut rows = self.rows.read().await.clone();
        rows.sort_by_key(|row| std::cmp::Reverse(row.created_at()));
        rows
    }

    /// Rows owned by `owner`, newest first.
    pub async fn by_owner(&self, owner: Uuid) -> Vec<L> {
        let mut rows: Vec<L> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|row| row.owner_id() == owner)
            .cloned()
            .collect();
        rows.sort_by_key(|row| std::cmp::Reverse(row.created_at()));
        rows
    }

    pub async fn find(&self, id: Uuid) -> Result<L, AppError> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.key() == id)
            .cloned()
            .ok_or_else(|| not_found::<L>())
    }

    pub async fn insert(&self, row: L) -> L {
        self.rows.write().await.push(row.clone());
        row
    }

    /// Apply `change` to a copy of the row and store it only if `change`
    /// succeeds.
    pub async fn modify<F>(&self, id: Uuid, change: F) -> Result<L, AppError>
    where
        F: FnOnce(&mut L) -> Result<(), AppError>,
    {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|row| row.key() == id)
            .ok_or_else(|| not_found::<L>())?;
        let mut next = row.clone();
        change(&mut next)?;
        *row = next.clone();
        Ok(next)
    }

    /// Remove the row if `check` allows it, returning the removed row.
    pub async fn remove<F>(&self, id: Uuid, check: F) -> Result<L, AppError>
    where
        F: FnOnce(&L) -> Result<(), AppError>,
    {
        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|row| row.key() == id)
            .ok_or_else(|| not_found::<L>())?;
        check(&rows[index])?;
        Ok(rows.remove(index))
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

fn not_found<L: Listing>() -> AppError {
    AppError::NotFound(format!("{} not found", L::KIND.noun))
}

/// Registered users.
#[derive(Debug, Default)]
pub struct UserTable {
    rows: RwLock<Vec<User>>,
}

impl UserTable {
    /// Insert a user; emails are unique ignoring case.
    pub async fn insert(&self, user: User) -> Result<User, AppError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        rows.push(user.clone());
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.rows
            .read()
            .await
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub async fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.rows.read().await.iter().find(|u| u.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

/// All tables of the listings API.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub users: UserTable,
    pub items: Table<Item>,
    pub jobs: Table<Job>,
    pub campaigns: Table<Campaign>,
}

/// Listing types with a table in [`MemoryStore`].
pub trait Stored: Listing {
    fn table(store: &MemoryStore) -> &Table<Self>;
}

impl Stored for Item {
    fn table(store: &MemoryStore) -> &Table<Self> {
        &store.items
    }
}

impl Stored for Job {
    fn table(store: &MemoryStore) -> &Table<Self> {
        &store.jobs
    }
}

impl Stored for Campaign {
    fn table(store: &MemoryStore) -> &Table<Self> {
        &store.campaigns
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::models::item::{CreateItem, ItemStatus};
    use crate::models::user::{Owner, UserRole};

    fn item(owner: Uuid, age_days: i64, title: &str) -> Item {
        let draft = CreateItem {
            title: title.to_string(),
            description: "d".to_string(),
            price: 10.0,
            location: "Chicago, IL".to_string(),
            category: "Vehicles".to_string(),
            image_url: None,
            contact_phone: None,
            contact_email: None,
            status: ItemStatus::Active,
        };
        let owner = Owner {
            id: owner,
            name: None,
        };
        Item::from_draft(
            draft,
            Uuid::now_v7(),
            &owner,
            Utc::now() - Duration::days(age_days),
        )
    }

    #[tokio::test]
    async fn by_owner_filters_and_sorts_newest_first() {
        let alice = Uuid::from_u128(1);
        let bob = Uuid::from_u128(2);
        let table = Table::with_rows(vec![
            item(alice, 3, "old"),
            item(bob, 0, "bob"),
            item(alice, 1, "new"),
        ]);

        let titles: Vec<_> = table.by_owner(alice).await.into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["new", "old"]);
        assert_eq!(table.all().await.len(), 3);
    }

    #[tokio::test]
    async fn failed_modify_leaves_row_untouched() {
        let row = item(Uuid::nil(), 0, "keep");
        let table = Table::with_rows(vec![row.clone()]);

        let result = table
            .modify(row.id, |i| {
                i.title = "changed".to_string();
                Err(AppError::Forbidden("no".to_string()))
            })
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(table.find(row.id).await.unwrap().title, "keep");
    }

    #[tokio::test]
    async fn remove_unknown_id_is_not_found() {
        let table: Table<Item> = Table::default();
        let err = table.remove(Uuid::now_v7(), |_| Ok(())).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: Item not found");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let users = UserTable::default();
        let user = User {
            id: Uuid::now_v7(),
            name: "A".to_string(),
            email: "a@example.com".to_string(),
            password_hash: "h".to_string(),
            role: UserRole::User,
            created_at: Utc::now(),
        };
        users.insert(user.clone()).await.unwrap();
        let dup = User {
            id: Uuid::now_v7(),
            email: "A@Example.com".to_string(),
            ..user
        };
        assert!(matches!(users.insert(dup).await, Err(AppError::Conflict(_))));
        assert_eq!(users.len().await, 1);
    }
}
