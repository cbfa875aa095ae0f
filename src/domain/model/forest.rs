//! Bagged random forests for risk classification and category regression.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::errors::ModelError;
use super::tree::{DecisionTree, MaxFeatures, TreeParams};

/// Forest-wide fitting parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

impl ForestParams {
    fn validate(&self) -> Result<(), ModelError> {
        if self.n_estimators == 0 {
            return Err(ModelError::invalid_parameter("n_estimators must be at least 1"));
        }
        if self.min_samples_split < 2 {
            return Err(ModelError::invalid_parameter(
                "min_samples_split must be at least 2",
            ));
        }
        Ok(())
    }

    fn tree_params(&self, max_features: MaxFeatures) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            max_features,
        }
    }
}

/// Checks that `rows` is non-empty and rectangular; returns its width.
fn check_rows(rows: &[Vec<f64>], targets: usize) -> Result<usize, ModelError> {
    let width = rows.first().map(Vec::len).ok_or(ModelError::EmptyDataSet)?;
    if width == 0 {
        return Err(ModelError::invalid_parameter("rows must have at least one feature"));
    }
    if let Some(row) = rows.iter().find(|r| r.len() != width) {
        return Err(ModelError::FeatureCountMismatch {
            expected: width,
            actual: row.len(),
        });
    }
    if targets != rows.len() {
        return Err(ModelError::TargetCountMismatch {
            samples: rows.len(),
            targets,
        });
    }
    Ok(width)
}

fn check_width(expected: usize, row: &[f64]) -> Result<(), ModelError> {
    if row.len() != expected {
        return Err(ModelError::FeatureCountMismatch {
            expected,
            actual: row.len(),
        });
    }
    Ok(())
}

fn bootstrap(rng: &mut StdRng, n: usize) -> Vec<usize> {
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}

/// Random forest classifier with Gini trees and `sqrt` feature sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTree>,
    n_classes: usize,
    n_features: usize,
}

impl RandomForestClassifier {
    /// Fits `params.n_estimators` trees on bootstrap resamples.
    ///
    /// Labels are class indices below `n_classes`. Fitting is fully
    /// determined by `params.seed`.
    pub fn fit(
        rows: &[Vec<f64>],
        labels: &[usize],
        n_classes: usize,
        params: &ForestParams,
    ) -> Result<Self, ModelError> {
        params.validate()?;
        let n_features = check_rows(rows, labels.len())?;
        if n_classes == 0 {
            return Err(ModelError::invalid_parameter("n_classes must be at least 1"));
        }
        if let Some(&bad) = labels.iter().find(|&&l| l >= n_classes) {
            return Err(ModelError::UnknownClass(bad));
        }

        let tree_params = params.tree_params(MaxFeatures::Sqrt);
        let mut rng = StdRng::seed_from_u64(params.seed);
        let trees = (0..params.n_estimators)
            .map(|_| {
                let mut sample = bootstrap(&mut rng, rows.len());
                DecisionTree::fit_classifier(
                    rows,
                    labels,
                    n_classes,
                    &mut sample,
                    &tree_params,
                    &mut rng,
                )
            })
            .collect();

        Ok(Self {
            trees,
            n_classes,
            n_features,
        })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    /// Class probabilities averaged over all trees.
    pub fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_width(self.n_features, row)?;
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (p, v) in proba.iter_mut().zip(tree.leaf_value(row)) {
                *p += v;
            }
        }
        let count = self.trees.len().max(1) as f64;
        proba.iter_mut().for_each(|p| *p /= count);
        Ok(proba)
    }

    /// Most probable class index; the lowest index wins ties.
    pub fn predict(&self, row: &[f64]) -> Result<usize, ModelError> {
        let proba = self.predict_proba(row)?;
        Ok(argmax(&proba))
    }
}

pub(crate) fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best_i, best_v), (i, &v)| {
            if v > best_v {
                (i, v)
            } else {
                (best_i, best_v)
            }
        })
        .0
}

/// Random forest regressor with variance-reduction trees over all features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForestRegressor {
    pub fn fit(rows: &[Vec<f64>], targets: &[f64], params: &ForestParams) -> Result<Self, ModelError> {
        params.validate()?;
        let n_features = check_rows(rows, targets.len())?;

        let tree_params = params.tree_params(MaxFeatures::All);
        let mut rng = StdRng::seed_from_u64(params.seed);
        let trees = (0..params.n_estimators)
            .map(|_| {
                let mut sample = bootstrap(&mut rng, rows.len());
                DecisionTree::fit_regressor(rows, targets, &mut sample, &tree_params, &mut rng)
            })
            .collect();

        Ok(Self { trees, n_features })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Mean of the tree predictions.
    pub fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        check_width(self.n_features, row)?;
        let sum: f64 = self
            .trees
            .iter()
            .map(|tree| tree.leaf_value(row).first().copied().unwrap_or(0.0))
            .sum();
        Ok(sum / self.trees.len().max(1) as f64)
    }
}

/// One independent regressor per output column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiOutputRegressor {
    estimators: Vec<RandomForestRegressor>,
}

impl MultiOutputRegressor {
    /// Fits one forest per output. Every forest uses the same parameters,
    /// seed included.
    ///
    /// `targets` holds one output row per input row.
    pub fn fit(
        rows: &[Vec<f64>],
        targets: &[Vec<f64>],
        params: &ForestParams,
    ) -> Result<Self, ModelError> {
        check_rows(rows, targets.len())?;
        let n_outputs = targets.first().map_or(0, Vec::len);
        if n_outputs == 0 {
            return Err(ModelError::invalid_parameter("targets must have at least one output"));
        }
        if let Some(row) = targets.iter().find(|t| t.len() != n_outputs) {
            return Err(ModelError::inconsistent(format!(
                "target rows have {} and {} outputs",
                n_outputs,
                row.len()
            )));
        }

        let estimators = (0..n_outputs)
            .map(|output| {
                let column: Vec<f64> = targets.iter().map(|t| t[output]).collect();
                RandomForestRegressor::fit(rows, &column, params)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { estimators })
    }

    pub fn n_outputs(&self) -> usize {
        self.estimators.len()
    }

    pub fn n_features(&self) -> usize {
        self.estimators.first().map_or(0, RandomForestRegressor::n_features)
    }

    pub fn predict(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.estimators.iter().map(|e| e.predict(row)).collect()
    }
}
