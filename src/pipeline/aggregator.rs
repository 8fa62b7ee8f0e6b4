//! Streaming aggregation of sample rows
//!
//! `RowAggregator` is owned by the streaming loop and folded one row at a
//! time. Once the input is exhausted it is consumed by [`RowAggregator::freeze`]
//! into an [`IndexSnapshot`], which has no mutating methods and can be shared
//! by reference across the report and mutual information stages.

use std::collections::{HashMap, HashSet};

use super::parser::SampleRow;

/// Running indices built during the single pass over the input
#[derive(Debug)]
pub struct RowAggregator {
    group_tags: Vec<String>,
    row_count: u64,
    positive_count: u64,
    negative_count: u64,
    min_width: usize,
    max_width: usize,
    feature_width_sum: u64,
    coverage: HashMap<String, u64>,
    group_matches: Vec<u64>,
    appearance: HashMap<String, u64>,
    positive_appearance: HashMap<String, u64>,
}

impl RowAggregator {
    /// Create an empty aggregator that tracks the given group tags
    pub fn new(group_tags: &[String]) -> Self {
        Self {
            group_tags: group_tags.to_vec(),
            row_count: 0,
            positive_count: 0,
            negative_count: 0,
            min_width: usize::MAX,
            max_width: 0,
            feature_width_sum: 0,
            coverage: HashMap::new(),
            group_matches: vec![0; group_tags.len()],
            appearance: HashMap::new(),
            positive_appearance: HashMap::new(),
        }
    }

    /// Fold one parsed row into the running indices
    pub fn observe(&mut self, row: &SampleRow<'_>) {
        self.row_count += 1;
        let positive = row.label.is_positive();
        if positive {
            self.positive_count += 1;
        } else {
            self.negative_count += 1;
        }

        let width = row.width();
        self.min_width = self.min_width.min(width);
        self.max_width = self.max_width.max(width);
        self.feature_width_sum += width as u64;

        // Credit each tag at most once per row
        for (tag, matches) in self.group_tags.iter().zip(self.group_matches.iter_mut()) {
            if row.features.iter().any(|feature| feature.contains(tag.as_str())) {
                *matches += 1;
            }
        }

        // Borrowed from the row
        let mut seen: HashSet<&str> = HashSet::with_capacity(row.features.len());
        for &feature in &row.features {
            increment(&mut self.coverage, feature);

            if !seen.insert(feature) {
                continue;
            }
            increment(&mut self.appearance, feature);
            if positive {
                increment(&mut self.positive_appearance, feature);
            }
        }
    }

    /// Number of rows observed so far
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// End the pass and hand the indices over as an immutable snapshot
    pub fn freeze(self) -> IndexSnapshot {
        let group_coverage = self
            .group_tags
            .into_iter()
            .zip(self.group_matches)
            .collect();

        IndexSnapshot {
            row_count: self.row_count,
            positive_count: self.positive_count,
            negative_count: self.negative_count,
            min_width: self.min_width,
            max_width: self.max_width,
            feature_width_sum: self.feature_width_sum,
            coverage: self.coverage,
            group_coverage,
            appearance: self.appearance,
            positive_appearance: self.positive_appearance,
        }
    }
}

fn increment(map: &mut HashMap<String, u64>, key: &str) {
    // Avoid allocating a key for features already seen
    if let Some(count) = map.get_mut(key) {
        *count += 1;
    } else {
        map.insert(key.to_string(), 1);
    }
}

/// Frozen result of the aggregation pass
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    row_count: u64,
    positive_count: u64,
    negative_count: u64,
    min_width: usize,
    max_width: usize,
    feature_width_sum: u64,
    coverage: HashMap<String, u64>,
    group_coverage: Vec<(String, u64)>,
    appearance: HashMap<String, u64>,
    positive_appearance: HashMap<String, u64>,
}

impl IndexSnapshot {
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    pub fn positive_count(&self) -> u64 {
        self.positive_count
    }

    pub fn negative_count(&self) -> u64 {
        self.negative_count
    }

    /// Number of distinct features seen
    pub fn feature_count(&self) -> usize {
        self.appearance.len()
    }

    /// Smallest row width, `None` before any row was seen
    pub fn min_width(&self) -> Option<usize> {
        (self.row_count > 0).then_some(self.min_width)
    }

    /// Largest row width, `None` before any row was seen
    pub fn max_width(&self) -> Option<usize> {
        (self.row_count > 0).then_some(self.max_width)
    }

    pub fn feature_width_sum(&self) -> u64 {
        self.feature_width_sum
    }

    /// Mean row width, `None` when no rows were seen
    pub fn average_width(&self) -> Option<f64> {
        (self.row_count > 0).then(|| self.feature_width_sum as f64 / self.row_count as f64)
    }

    /// Token count per feature
    pub fn coverage(&self) -> &HashMap<String, u64> {
        &self.coverage
    }

    /// Row match count per group tag, in configured order
    pub fn group_coverage(&self) -> &[(String, u64)] {
        &self.group_coverage
    }

    /// Number of rows each feature appears in
    pub fn appearance(&self) -> &HashMap<String, u64> {
        &self.appearance
    }

    /// Number of positive rows a feature appears in
    pub fn positive_appearance(&self, feature: &str) -> u64 {
        self.positive_appearance.get(feature).copied().unwrap_or(0)
    }
}
