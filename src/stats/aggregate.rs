//! Aggregate statistics and the pure reducer that maintains them.
//!
//! `initialize` scans a collection once. After that every create, update and
//! delete is folded in by `apply_create`, `apply_update` and `apply_delete`,
//! each returning a new snapshot and leaving the input untouched.

use std::collections::BTreeMap;

use serde::Serialize;

use super::descriptor::{StatusSet, Tally};

/// Running `(total, samples)` pair behind a mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunningMean {
    pub total: i128,
    pub samples: u64,
}

impl RunningMean {
    /// Mean in the units of the samples, zero when there are none.
    pub fn value(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.total as f64 / self.samples as f64
        }
    }
}

/// One slice of a pie or bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: u64,
}

/// Summary statistics over one collection of listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregate<S: StatusSet> {
    status_counts: BTreeMap<S, u64>,
    dimensions: BTreeMap<&'static str, BTreeMap<String, u64>>,
    sums: BTreeMap<&'static str, i128>,
    means: BTreeMap<&'static str, RunningMean>,
}

impl<S: StatusSet> Aggregate<S> {
    /// All-zero aggregate for the entity type `T`.
    pub fn empty<T: Tally<Status = S>>() -> Self {
        Self {
            status_counts: S::ALL.iter().map(|s| (*s, 0)).collect(),
            dimensions: T::dimensions()
                .iter()
                .map(|d| (d.name, BTreeMap::new()))
                .collect(),
            sums: T::measures().iter().map(|m| (m.name, 0)).collect(),
            means: T::means()
                .iter()
                .map(|m| (m.name, RunningMean::default()))
                .collect(),
        }
    }

    /// Number of entities currently in `status`.
    pub fn count(&self, status: S) -> u64 {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    /// Sum of every status bucket.
    pub fn total(&self) -> u64 {
        self.status_counts.values().sum()
    }

    pub fn status_counts(&self) -> &BTreeMap<S, u64> {
        &self.status_counts
    }

    /// Per-value counts of one categorical dimension.
    pub fn dimension(&self, name: &str) -> Option<&BTreeMap<String, u64>> {
        self.dimensions.get(name)
    }

    /// Count for one value of a dimension; `None` if the value was never seen.
    pub fn dimension_count(&self, name: &str, value: &str) -> Option<u64> {
        self.dimensions.get(name)?.get(value).copied()
    }

    /// Total of a measure in exact units; zero for an unknown name.
    ///
    /// Totals are wider than a single contribution, so summing any number of
    /// `i64` amounts cannot overflow.
    pub fn sum(&self, name: &str) -> i128 {
        self.sums.get(name).copied().unwrap_or(0)
    }

    pub fn mean(&self, name: &str) -> RunningMean {
        self.means.get(name).copied().unwrap_or_default()
    }

    /// Status distribution in enumeration order.
    pub fn status_points(&self) -> Vec<ChartPoint> {
        S::ALL
            .iter()
            .map(|s| ChartPoint {
                name: s.label().to_string(),
                value: self.count(*s),
            })
            .collect()
    }

    /// Distribution of one dimension, including values that dropped to zero.
    pub fn dimension_points(&self, name: &str) -> Vec<ChartPoint> {
        self.dimension(name)
            .map(|buckets| {
                buckets
                    .iter()
                    .map(|(value, count)| ChartPoint {
                        name: value.clone(),
                        value: *count,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn increment_status(&mut self, status: S) {
        *self.status_counts.entry(status).or_insert(0) += 1;
    }

    fn decrement_status(&mut self, status: S) {
        if let Some(count) = self.status_counts.get_mut(&status) {
            *count = count.saturating_sub(1);
        }
    }

    fn increment_bucket(&mut self, dimension: &'static str, value: &str) {
        *self
            .dimensions
            .entry(dimension)
            .or_default()
            .entry(value.to_string())
            .or_insert(0) += 1;
    }

    // Buckets are never removed, only floored at zero.
    fn decrement_bucket(&mut self, dimension: &'static str, value: &str) {
        if let Some(count) = self
            .dimensions
            .get_mut(dimension)
            .and_then(|buckets| buckets.get_mut(value))
        {
            *count = count.saturating_sub(1);
        }
    }

    fn shift_sum(&mut self, name: &'static str, delta: i128) {
        *self.sums.entry(name).or_insert(0) += delta;
    }

    fn shift_mean(&mut self, name: &'static str, removed: (i64, u64), added: (i64, u64)) {
        let mean = self.means.entry(name).or_default();
        mean.total += i128::from(added.0) - i128::from(removed.0);
        mean.samples = (mean.samples + added.1).saturating_sub(removed.1);
    }

    fn add<T: Tally<Status = S>>(&mut self, entity: &T) {
        self.increment_status(entity.status());
        for dimension in T::dimensions() {
            self.increment_bucket(dimension.name, (dimension.value)(entity));
        }
        for measure in T::measures() {
            self.shift_sum(measure.name, i128::from(measure.contribution(entity)));
        }
        for mean in T::means() {
            self.shift_mean(mean.name, (0, 0), mean.contribution(entity));
        }
    }

    fn subtract<T: Tally<Status = S>>(&mut self, entity: &T) {
        self.decrement_status(entity.status());
        for dimension in T::dimensions() {
            self.decrement_bucket(dimension.name, (dimension.value)(entity));
        }
        for measure in T::measures() {
            self.shift_sum(measure.name, -i128::from(measure.contribution(entity)));
        }
        for mean in T::means() {
            self.shift_mean(mean.name, mean.contribution(entity), (0, 0));
        }
    }
}

/// Build the aggregate of a full collection in a single scan.
pub fn initialize<T: Tally>(entities: &[T]) -> Aggregate<T::Status> {
    let mut aggregate = Aggregate::empty::<T>();
    for entity in entities {
        aggregate.add(entity);
    }
    aggregate
}

/// Fold a newly created entity into the aggregate.
pub fn apply_create<T: Tally>(aggregate: &Aggregate<T::Status>, entity: &T) -> Aggregate<T::Status> {
    let mut next = aggregate.clone();
    next.add(entity);
    next
}

/// Remove a deleted entity, using its status at deletion time.
pub fn apply_delete<T: Tally>(aggregate: &Aggregate<T::Status>, entity: &T) -> Aggregate<T::Status> {
    let mut next = aggregate.clone();
    next.subtract(entity);
    next
}

/// Rebalance the aggregate for an entity that changed from `previous` to
/// `next`.
///
/// Status, each dimension and each measure are handled independently. Every
/// measure contribution is recomputed from scratch for both versions, so an
/// unchanged status yields exactly `next - previous` and a status change moves
/// the whole amount between the conditional sums.
pub fn apply_update<T: Tally>(
    aggregate: &Aggregate<T::Status>,
    previous: &T,
    next: &T,
) -> Aggregate<T::Status> {
    debug_assert_eq!(previous.key(), next.key());

    let mut updated = aggregate.clone();

    let (from, to) = (previous.status(), next.status());
    if from != to {
        updated.decrement_status(from);
        updated.increment_status(to);
    }

    for dimension in T::dimensions() {
        let (old, new) = ((dimension.value)(previous), (dimension.value)(next));
        if old != new {
            updated.decrement_bucket(dimension.name, old);
            updated.increment_bucket(dimension.name, new);
        }
    }

    for measure in T::measures() {
        let delta = i128::from(measure.contribution(next)) - i128::from(measure.contribution(previous));
        if delta != 0 {
            updated.shift_sum(measure.name, delta);
        }
    }

    for mean in T::means() {
        updated.shift_mean(mean.name, mean.contribution(previous), mean.contribution(next));
    }

    updated
}
