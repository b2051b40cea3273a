use super::aggregate::group_values;
use super::error::AggregationError;
use super::model::{CellValue, Table};

/// Five numbers that draw one box of a box plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

impl BoxSummary {
    /// Summarise `values`; `None` when there are no finite values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let fence = 1.5 * (q3 - q1);

        // Whiskers stop at the last data point inside the fences.
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + fence)
            .unwrap_or(q3);

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
        })
    }
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Values and box summary for one (dimension, label) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionGroup {
    pub dimension_value: CellValue,
    pub label: CellValue,
    pub values: Vec<f64>,
    pub summary: Option<BoxSummary>,
}

/// Distribution of `variable` per (dimension, label) pair, in
/// first-encountered order.
pub fn distribution(
    table: &Table,
    dimension: &str,
    label_column: &str,
    variable: &str,
) -> Result<Vec<DistributionGroup>, AggregationError> {
    Ok(group_values(table, dimension, label_column, variable)?
        .into_iter()
        .map(|g| DistributionGroup {
            summary: BoxSummary::from_values(&g.values),
            dimension_value: g.dimension_value,
            label: g.label,
            values: g.values,
        })
        .collect())
}
