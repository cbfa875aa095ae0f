//! CART decision trees grown on bootstrap index sets.
//!
//! Nodes live in a flat arena; node 0 is the root. Leaves hold a class
//! distribution for classification trees and a single mean for regression
//! trees.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Minimum impurity decrease for a split to be kept.
const MIN_IMPURITY_DECREASE: f64 = 1e-12;

/// How many features each split may consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// `floor(sqrt(n))`, at least one.
    Sqrt,
    All,
}

impl MaxFeatures {
    pub fn resolve(&self, n_features: usize) -> usize {
        match self {
            MaxFeatures::Sqrt => ((n_features as f64).sqrt() as usize).max(1),
            MaxFeatures::All => n_features,
        }
        .min(n_features)
    }
}

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParams {
    /// `None` grows until leaves are pure or too small to split.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub max_features: MaxFeatures,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grows a Gini classification tree over the rows named by `sample`.
    ///
    /// `sample` may repeat rows (bootstrap). Every label must be below
    /// `n_classes`; callers validate this.
    pub fn fit_classifier<R: Rng>(
        rows: &[Vec<f64>],
        labels: &[usize],
        n_classes: usize,
        sample: &mut [usize],
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let criterion = Gini { labels, n_classes };
        TreeBuilder::new(rows, criterion, params, rng).grow(sample)
    }

    /// Grows a variance-reduction regression tree over the rows named by `sample`.
    pub fn fit_regressor<R: Rng>(
        rows: &[Vec<f64>],
        targets: &[f64],
        sample: &mut [usize],
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let criterion = Variance { targets };
        TreeBuilder::new(rows, criterion, params, rng).grow(sample)
    }

    /// Leaf value reached by `row`.
    ///
    /// Rows must be at least as wide as the training rows.
    pub fn leaf_value(&self, row: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }
}

/// Impurity bookkeeping for one target kind.
trait SplitCriterion {
    type Stats: Clone;

    fn empty(&self) -> Self::Stats;
    fn push(&self, stats: &mut Self::Stats, row: usize);
    fn difference(&self, total: &Self::Stats, part: &Self::Stats) -> Self::Stats;
    /// Node impurity multiplied by the node's sample count.
    fn weighted_impurity(&self, stats: &Self::Stats) -> f64;
    fn leaf_value(&self, stats: &Self::Stats) -> Vec<f64>;
}

struct Gini<'a> {
    labels: &'a [usize],
    n_classes: usize,
}

#[derive(Clone)]
struct ClassCounts {
    counts: Vec<f64>,
    total: f64,
}

impl SplitCriterion for Gini<'_> {
    type Stats = ClassCounts;

    fn empty(&self) -> ClassCounts {
        ClassCounts {
            counts: vec![0.0; self.n_classes],
            total: 0.0,
        }
    }

    fn push(&self, stats: &mut ClassCounts, row: usize) {
        stats.counts[self.labels[row]] += 1.0;
        stats.total += 1.0;
    }

    fn difference(&self, total: &ClassCounts, part: &ClassCounts) -> ClassCounts {
        ClassCounts {
            counts: total
                .counts
                .iter()
                .zip(&part.counts)
                .map(|(t, p)| t - p)
                .collect(),
            total: total.total - part.total,
        }
    }

    fn weighted_impurity(&self, stats: &ClassCounts) -> f64 {
        if stats.total <= 0.0 {
            return 0.0;
        }
        let sum_sq: f64 = stats.counts.iter().map(|c| c * c).sum();
        (stats.total - sum_sq / stats.total).max(0.0)
    }

    fn leaf_value(&self, stats: &ClassCounts) -> Vec<f64> {
        if stats.total <= 0.0 {
            return vec![0.0; self.n_classes];
        }
        stats.counts.iter().map(|c| c / stats.total).collect()
    }
}

struct Variance<'a> {
    targets: &'a [f64],
}

#[derive(Clone)]
struct Moments {
    count: f64,
    sum: f64,
    sum_sq: f64,
}

impl SplitCriterion for Variance<'_> {
    type Stats = Moments;

    fn empty(&self) -> Moments {
        Moments {
            count: 0.0,
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    fn push(&self, stats: &mut Moments, row: usize) {
        let y = self.targets[row];
        stats.count += 1.0;
        stats.sum += y;
        stats.sum_sq += y * y;
    }

    fn difference(&self, total: &Moments, part: &Moments) -> Moments {
        Moments {
            count: total.count - part.count,
            sum: total.sum - part.sum,
            sum_sq: total.sum_sq - part.sum_sq,
        }
    }

    fn weighted_impurity(&self, stats: &Moments) -> f64 {
        if stats.count <= 0.0 {
            return 0.0;
        }
        (stats.sum_sq - stats.sum * stats.sum / stats.count).max(0.0)
    }

    fn leaf_value(&self, stats: &Moments) -> Vec<f64> {
        if stats.count <= 0.0 {
            return vec![0.0];
        }
        vec![stats.sum / stats.count]
    }
}

struct Split {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

struct TreeBuilder<'a, C, R> {
    rows: &'a [Vec<f64>],
    criterion: C,
    params: &'a TreeParams,
    rng: &'a mut R,
    n_features: usize,
    nodes: Vec<Node>,
}

impl<'a, C: SplitCriterion, R: Rng> TreeBuilder<'a, C, R> {
    fn new(rows: &'a [Vec<f64>], criterion: C, params: &'a TreeParams, rng: &'a mut R) -> Self {
        let n_features = rows.first().map_or(0, Vec::len);
        Self {
            rows,
            criterion,
            params,
            rng,
            n_features,
            nodes: Vec::new(),
        }
    }

    fn grow(mut self, sample: &mut [usize]) -> DecisionTree {
        self.build(sample, 0);
        DecisionTree { nodes: self.nodes }
    }

    fn stats_of(&self, sample: &[usize]) -> C::Stats {
        let mut stats = self.criterion.empty();
        for &row in sample {
            self.criterion.push(&mut stats, row);
        }
        stats
    }

    fn build(&mut self, sample: &mut [usize], depth: usize) -> usize {
        let stats = self.stats_of(sample);
        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: self.criterion.leaf_value(&stats),
        });

        let impurity = self.criterion.weighted_impurity(&stats);
        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        if depth_reached
            || sample.len() < self.params.min_samples_split.max(2)
            || impurity <= MIN_IMPURITY_DECREASE
        {
            return node_id;
        }

        let Some(split) = self.best_split(sample, &stats, impurity) else {
            return node_id;
        };

        let mid = partition(sample, |row| {
            self.rows[row][split.feature] <= split.threshold
        });
        let (left_sample, right_sample) = sample.split_at_mut(mid);
        let left = self.build(left_sample, depth + 1);
        let right = self.build(right_sample, depth + 1);

        self.nodes[node_id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_id
    }

    fn best_split(&mut self, sample: &[usize], total: &C::Stats, parent: f64) -> Option<Split> {
        let n_candidates = self.params.max_features.resolve(self.n_features);
        let candidates = rand::seq::index::sample(&mut *self.rng, self.n_features, n_candidates);

        let mut order = sample.to_vec();
        let mut best: Option<Split> = None;

        for feature in candidates.iter() {
            let rows = self.rows;
            order.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

            let mut left = self.criterion.empty();
            for pos in 0..order.len() - 1 {
                self.criterion.push(&mut left, order[pos]);
                let here = rows[order[pos]][feature];
                let next = rows[order[pos + 1]][feature];
                if here >= next {
                    continue;
                }

                let right = self.criterion.difference(total, &left);
                let impurity = self.criterion.weighted_impurity(&left)
                    + self.criterion.weighted_impurity(&right);
                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    best = Some(Split {
                        feature,
                        threshold: here + (next - here) / 2.0,
                        impurity,
                    });
                }
            }
        }

        best.filter(|b| parent - b.impurity > MIN_IMPURITY_DECREASE)
    }
}

/// Moves rows satisfying `goes_left` to the front; returns how many did.
fn partition(sample: &mut [usize], goes_left: impl Fn(usize) -> bool) -> usize {
    let mut mid = 0;
    for i in 0..sample.len() {
        if goes_left(sample[i]) {
            sample.swap(i, mid);
            mid += 1;
        }
    }
    mid
}
