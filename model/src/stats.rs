use anyhow::Result;
use serde::Serialize;

/// Distribution constants for the session, computed once per load.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DistributionSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub q1: f64,
    pub q3: f64,
}

impl DistributionSummary {
    /// The input must be sorted ascending. Refuses an empty dataset; nothing
    /// downstream can cope with NaN statistics.
    pub fn new(sorted: &[f64]) -> Result<Self> {
        if sorted.is_empty() {
            bail!("can't summarize an empty dataset");
        }
        let sum: f64 = sorted.iter().sum();
        Ok(Self {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean: sum / sorted.len() as f64,
            q1: quantile(sorted, 0.25),
            q3: quantile(sorted, 0.75),
        })
    }
}

// Linear interpolation between the two closest order statistics
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let idx = p * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (idx - lo as f64)
    }
}

/// Where one value falls within the sorted dataset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Standing {
    /// 0-indexed leftmost insertion point
    pub rank_index: usize,
    pub total: usize,
}

impl Standing {
    /// 1-indexed, as displayed to people
    pub fn rank(&self) -> usize {
        self.rank_index + 1
    }

    pub fn percentile(&self) -> f64 {
        if self.total <= 1 {
            return 100.0;
        }
        100.0 * self.rank_index as f64 / (self.total - 1) as f64
    }
}

pub fn standing(sorted: &[f64], target: f64) -> Standing {
    Standing {
        rank_index: sorted.partition_point(|wait| *wait < target),
        total: sorted.len(),
    }
}
