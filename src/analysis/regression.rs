//! Ordinary least-squares linear regression.
//!
//! Columns are standardized before the normal equations are solved and the
//! coefficients are mapped back to the raw feature scale afterwards.

use serde::Serialize;
use thiserror::Error;

const PIVOT_EPSILON: f64 = 1e-10;

#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    #[error("need more than {features} samples to fit {features} features, got {samples}")]
    NotEnoughSamples { samples: usize, features: usize },
    #[error("sample {index} has {got} features, expected {expected}")]
    RaggedRow {
        index: usize,
        expected: usize,
        got: usize,
    },
    #[error("feature and target counts differ ({features} vs {targets})")]
    LengthMismatch { features: usize, targets: usize },
    #[error("features are linearly dependent; least-squares system is singular")]
    Singular,
}

/// A fitted `y = intercept + Σ coefficient_i * x_i` model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn fit(rows: &[Vec<f64>], targets: &[f64]) -> Result<Self, EstimateError> {
        if rows.len() != targets.len() {
            return Err(EstimateError::LengthMismatch {
                features: rows.len(),
                targets: targets.len(),
            });
        }

        let width = rows.first().map_or(0, Vec::len);
        if rows.len() <= width {
            return Err(EstimateError::NotEnoughSamples {
                samples: rows.len(),
                features: width,
            });
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(EstimateError::RaggedRow {
                index,
                expected: width,
                got: row.len(),
            });
        }

        let n = rows.len() as f64;
        let means: Vec<f64> = (0..width)
            .map(|j| rows.iter().map(|r| r[j]).sum::<f64>() / n)
            .collect();
        let scales: Vec<f64> = (0..width)
            .map(|j| {
                let variance = rows.iter().map(|r| (r[j] - means[j]).powi(2)).sum::<f64>() / n;
                variance.sqrt()
            })
            .collect();
        let target_mean = targets.iter().sum::<f64>() / n;

        // Constant columns carry no information once centered; they get a zero coefficient.
        let active: Vec<usize> = (0..width).filter(|&j| scales[j] > PIVOT_EPSILON).collect();

        let standardized: Vec<Vec<f64>> = rows
            .iter()
            .map(|r| active.iter().map(|&j| (r[j] - means[j]) / scales[j]).collect())
            .collect();
        let centered: Vec<f64> = targets.iter().map(|y| y - target_mean).collect();

        let k = active.len();
        let mut system = vec![vec![0.0; k + 1]; k];
        for (z, y) in standardized.iter().zip(&centered) {
            for a in 0..k {
                for b in 0..k {
                    system[a][b] += z[a] * z[b];
                }
                system[a][k] += z[a] * y;
            }
        }

        let solution = solve(system)?;

        let mut coefficients = vec![0.0; width];
        for (slot, &j) in active.iter().enumerate() {
            coefficients[j] = solution[slot] / scales[j];
        }
        let intercept = target_mean
            - coefficients
                .iter()
                .zip(&means)
                .map(|(c, m)| c * m)
                .sum::<f64>();

        Ok(Self {
            intercept,
            coefficients,
        })
    }

    pub fn predict(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

/// Gaussian elimination with partial pivoting on an augmented `k × (k+1)` matrix.
fn solve(mut m: Vec<Vec<f64>>) -> Result<Vec<f64>, EstimateError> {
    let k = m.len();

    for col in 0..k {
        let pivot_row = (col..k)
            .max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))
            .ok_or(EstimateError::Singular)?;
        if m[pivot_row][col].abs() < PIVOT_EPSILON {
            return Err(EstimateError::Singular);
        }
        m.swap(col, pivot_row);

        for row in (col + 1)..k {
            let factor = m[row][col] / m[col][col];
            if factor == 0.0 {
                continue;
            }
            for c in col..=k {
                m[row][c] -= factor * m[col][c];
            }
        }
    }

    let mut x = vec![0.0; k];
    for row in (0..k).rev() {
        let tail: f64 = ((row + 1)..k).map(|c| m[row][c] * x[c]).sum();
        x[row] = (m[row][k] - tail) / m[row][row];
    }
    Ok(x)
}

/// Trailing mean with the window shrinking at the start of the series.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}
