//! Descriptor trait that tells the reducer how to read a listing.
//!
//! Each listing type names its status enumeration, the categorical fields
//! counted per observed value, and the numeric measures together with the
//! statuses that qualify an entity for each sum.

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// Number of minor units (cents) per major unit.
pub const MINOR_UNITS: i64 = 100;

/// Convert a currency or percentage value to exact minor units.
pub fn minor_units(value: f64) -> i64 {
    (value * MINOR_UNITS as f64).round() as i64
}

/// Convert minor units back to the major unit used on the wire.
pub fn major_units(minor: i128) -> f64 {
    minor as f64 / MINOR_UNITS as f64
}

/// A closed status enumeration.
pub trait StatusSet:
    Copy + Ord + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Every status, in display order.
    const ALL: &'static [Self];

    /// Wire name, e.g. `active`.
    fn as_str(self) -> &'static str;

    /// Human-readable name for charts, e.g. `Active`.
    fn label(self) -> &'static str;
}

/// Which entities contribute to a measure.
#[derive(Debug, Clone, Copy)]
pub enum Qualifier<S: 'static> {
    /// Every entity, whatever its status.
    Always,
    /// Only entities currently in one of these statuses.
    InStatus(&'static [S]),
}

impl<S: PartialEq> Qualifier<S> {
    pub fn admits(&self, status: &S) -> bool {
        match self {
            Self::Always => true,
            Self::InStatus(statuses) => statuses.contains(status),
        }
    }
}

/// A categorical field counted per observed value.
pub struct Dimension<T> {
    pub name: &'static str,
    pub value: fn(&T) -> &str,
}

/// A numeric total, possibly conditional on status.
pub struct Measure<T: Tally> {
    pub name: &'static str,
    pub when: Qualifier<T::Status>,
    /// Contribution in exact integer units.
    pub amount: fn(&T) -> i64,
}

/// A running mean over the entities accepted by `include`.
pub struct Mean<T> {
    pub name: &'static str,
    pub include: fn(&T) -> bool,
    pub sample: fn(&T) -> i64,
}

/// Everything the reducer needs to know about an entity type.
pub trait Tally: Sized + 'static {
    type Status: StatusSet;

    fn key(&self) -> Uuid;

    fn status(&self) -> Self::Status;

    fn dimensions() -> &'static [Dimension<Self>];

    fn measures() -> &'static [Measure<Self>] {
        &[]
    }

    fn means() -> &'static [Mean<Self>] {
        &[]
    }
}

impl<T: Tally> Measure<T> {
    /// Contribution of `entity` to this measure, evaluated on its own status.
    pub fn contribution(&self, entity: &T) -> i64 {
        if self.when.admits(&entity.status()) {
            (self.amount)(entity)
        } else {
            0
        }
    }
}

impl<T> Mean<T> {
    /// `(total, samples)` contributed by `entity`.
    pub fn contribution(&self, entity: &T) -> (i64, u64) {
        if (self.include)(entity) {
            ((self.sample)(entity), 1)
        } else {
            (0, 0)
        }
    }
}
