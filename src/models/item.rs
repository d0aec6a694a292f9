//! Marketplace item listing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::listing::{Listing, ListingKind};
use crate::models::user::Owner;
use crate::stats::descriptor::{major_units, minor_units};
use crate::stats::{Aggregate, Dimension, Measure, Qualifier, StatusSet, Tally};

pub const CATEGORY: &str = "category";
pub const TOTAL_VALUE: &str = "total_value";
pub const SOLD_VALUE: &str = "sold_value";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Active,
    Sold,
    Draft,
}

impl StatusSet for ItemStatus {
    const ALL: &'static [Self] = &[ItemStatus::Active, ItemStatus::Sold, ItemStatus::Draft];

    fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Sold => "sold",
            ItemStatus::Draft => "draft",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ItemStatus::Active => "Active",
            ItemStatus::Sold => "Sold",
            ItemStatus::Draft => "Draft",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub category: String,
    pub image_url: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub owner_id: Uuid,
    pub owner_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: ItemStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateItem {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(range(exclusive_min = 0.0, max = 1_000_000_000_000.0, message = "price must be greater than zero and at most 1 trillion"))]
    pub price: f64,
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    pub image_url: Option<String>,
    pub contact_phone: Option<String>,
    #[validate(email(message = "contact email is invalid"))]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "title must not be empty"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0, max = 1_000_000_000_000.0, message = "price must be greater than zero and at most 1 trillion"))]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "category must not be empty"))]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "contact email is invalid"))]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

/// Item dashboard statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStats {
    pub active: u64,
    pub sold: u64,
    pub draft: u64,
    pub by_category: BTreeMap<String, u64>,
    /// Value of active listings.
    pub total_value: f64,
    pub sold_value: f64,
}

impl From<&Aggregate<ItemStatus>> for ItemStats {
    fn from(agg: &Aggregate<ItemStatus>) -> Self {
        Self {
            active: agg.count(ItemStatus::Active),
            sold: agg.count(ItemStatus::Sold),
            draft: agg.count(ItemStatus::Draft),
            by_category: agg.dimension(CATEGORY).cloned().unwrap_or_default(),
            total_value: major_units(agg.sum(TOTAL_VALUE)),
            sold_value: major_units(agg.sum(SOLD_VALUE)),
        }
    }
}

fn category(item: &Item) -> &str {
    &item.category
}

fn price(item: &Item) -> i64 {
    minor_units(item.price)
}

const DIMENSIONS: &[Dimension<Item>] = &[Dimension {
    name: CATEGORY,
    value: category,
}];

const MEASURES: &[Measure<Item>] = &[
    Measure {
        name: TOTAL_VALUE,
        when: Qualifier::InStatus(&[ItemStatus::Active]),
        amount: price,
    },
    Measure {
        name: SOLD_VALUE,
        when: Qualifier::InStatus(&[ItemStatus::Sold]),
        amount: price,
    },
];

impl Tally for Item {
    type Status = ItemStatus;

    fn key(&self) -> Uuid {
        self.id
    }

    fn status(&self) -> ItemStatus {
        self.status
    }

    fn dimensions() -> &'static [Dimension<Self>] {
        DIMENSIONS
    }

    fn measures() -> &'static [Measure<Self>] {
        MEASURES
    }
}

impl Listing for Item {
    type Draft = CreateItem;
    type Patch = UpdateItem;
    type Stats = ItemStats;

    const KIND: ListingKind = ListingKind {
        noun: "Item",
        singular: "item",
        plural: "items",
    };

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(draft: CreateItem, id: Uuid, owner: &Owner, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            price: draft.price,
            location: draft.location,
            category: draft.category,
            image_url: draft.image_url,
            contact_phone: draft.contact_phone,
            contact_email: draft.contact_email,
            owner_id: owner.id,
            owner_name: owner.name.clone(),
            created_at,
            status: draft.status,
        }
    }

    fn apply_patch(&mut self, patch: UpdateItem) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if patch.image_url.is_some() {
            self.image_url = patch.image_url;
        }
        if patch.contact_phone.is_some() {
            self.contact_phone = patch.contact_phone;
        }
        if patch.contact_email.is_some() {
            self.contact_email = patch.contact_email;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(price: f64, status: ItemStatus) -> CreateItem {
        CreateItem {
            title: "iPhone 13 Pro".to_string(),
            description: "Like new".to_string(),
            price,
            location: "New York, NY".to_string(),
            category: "Electronics".to_string(),
            image_url: None,
            contact_phone: None,
            contact_email: Some("admin@example.com".to_string()),
            status,
        }
    }

    fn owner() -> Owner {
        Owner {
            id: Uuid::nil(),
            name: Some("Administrator".to_string()),
        }
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ItemStatus::Sold).unwrap(), "\"sold\"");
        assert_eq!(ItemStatus::default(), ItemStatus::Active);
    }

    #[test]
    fn draft_requires_positive_price() {
        assert!(draft(899.99, ItemStatus::Active).validate().is_ok());
        let errors = draft(0.0, ItemStatus::Active).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn price_is_bounded() {
        assert!(draft(1e12, ItemStatus::Active).validate().is_ok());
        let errors = draft(1e17, ItemStatus::Active).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
        let patch = UpdateItem {
            price: Some(1e17),
            ..UpdateItem::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn prices_at_the_bound_sum_exactly() {
        let o = owner();
        let now = Utc::now();
        let items = vec![
            Item::from_draft(draft(1e12, ItemStatus::Active), Uuid::now_v7(), &o, now),
            Item::from_draft(draft(1e12, ItemStatus::Active), Uuid::now_v7(), &o, now),
        ];
        assert_eq!(Item::stats(&items).total_value, 2e12);
    }

    #[test]
    fn missing_status_defaults_to_active() {
        let json = serde_json::json!({
            "title": "Sofa",
            "description": "Leather",
            "price": 650.0,
            "location": "Los Angeles, CA",
            "category": "Furniture",
            "image_url": null,
            "contact_phone": null,
            "contact_email": null
        });
        let parsed: CreateItem = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.status, ItemStatus::Active);
    }

    #[test]
    fn from_draft_stamps_owner_and_id() {
        let id = Uuid::now_v7();
        let now = Utc::now();
        let item = Item::from_draft(draft(10.0, ItemStatus::Draft), id, &owner(), now);
        assert_eq!(item.id, id);
        assert_eq!(item.owner_id, Uuid::nil());
        assert_eq!(item.owner_name.as_deref(), Some("Administrator"));
        assert_eq!(item.created_at, now);
        assert_eq!(item.status, ItemStatus::Draft);
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut item = Item::from_draft(draft(10.0, ItemStatus::Active), Uuid::now_v7(), &owner(), Utc::now());
        let created = item.created_at;
        item.apply_patch(UpdateItem {
            price: Some(15.0),
            status: Some(ItemStatus::Sold),
            ..UpdateItem::default()
        });
        assert_eq!(item.price, 15.0);
        assert_eq!(item.status, ItemStatus::Sold);
        assert_eq!(item.title, "iPhone 13 Pro");
        assert_eq!(item.created_at, created);
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        assert_eq!(serde_json::to_string(&UpdateItem::default()).unwrap(), "{}");
    }

    #[test]
    fn stats_use_status_conditional_values() {
        let o = owner();
        let now = Utc::now();
        let items = vec![
            Item::from_draft(draft(899.99, ItemStatus::Active), Uuid::now_v7(), &o, now),
            Item::from_draft(draft(650.0, ItemStatus::Active), Uuid::now_v7(), &o, now),
            Item::from_draft(draft(18_500.0, ItemStatus::Sold), Uuid::now_v7(), &o, now),
            Item::from_draft(draft(1_200.0, ItemStatus::Draft), Uuid::now_v7(), &o, now),
        ];
        let stats = Item::stats(&items);
        assert_eq!((stats.active, stats.sold, stats.draft), (2, 1, 1));
        assert_eq!(stats.total_value, 1_549.99);
        assert_eq!(stats.sold_value, 18_500.0);
        assert_eq!(stats.by_category.get("Electronics"), Some(&4));

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("byCategory").is_some());
        assert!(json.get("totalValue").is_some());
    }
}
