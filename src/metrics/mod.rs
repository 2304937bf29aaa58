//! Menu metrics summarization.
//!
//! Projects menu records onto the five continuous performance fields and
//! computes descriptive statistics for each. Purely functional over its input.

mod stats;

pub use stats::{percentile, Describe};

use serde::{Deserialize, Serialize};

use crate::db::{Record, Value};
use crate::error::{MenuError, Result};

/// The continuous fields analyzed, in output order.
pub const METRIC_FIELDS: [&str; 5] = [
    "Price",
    "Avg_Rating",
    "Total_Orders",
    "Last_Week_Sales",
    "Last_Month_Sales",
];

/// Summary statistics for one analyzed field.
///
/// Serializes with keys `metric, count, mean, std, min, 25%, 50%, 75%, max,
/// median, sum`. A statistic with no data serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub p25: Option<f64>,
    #[serde(rename = "50%")]
    pub p50: Option<f64>,
    #[serde(rename = "75%")]
    pub p75: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
    pub sum: Option<f64>,
}

impl MetricSummary {
    fn new(metric: &str, describe: Describe) -> Self {
        Self {
            metric: metric.to_string(),
            count: describe.count,
            mean: describe.mean,
            std: describe.std,
            min: describe.min,
            p25: describe.p25,
            p50: describe.p50,
            p75: describe.p75,
            max: describe.max,
            median: describe.p50,
            sum: describe.sum,
        }
    }
}

/// Summarizes the analyzed fields of a list of records.
///
/// Fields outside [`METRIC_FIELDS`] are ignored. A field absent from some
/// records, or `null`, is a missing value. A field absent from every record
/// of a non-empty input fails with [`MenuError::MissingField`] before any
/// statistic is computed. Empty input yields five summaries with `count = 0`.
/// A statistic that overflows `f64` fails with [`MenuError::NumericOverflow`]
/// rather than being reported as missing.
pub fn summarize(data: &[Record]) -> Result<Vec<MetricSummary>> {
    if !data.is_empty() {
        check_fields_present(data)?;
    }

    METRIC_FIELDS
        .iter()
        .map(|field| {
            let column = project_column(data, field)?;
            let describe = Describe::of(&column);
            if describe.overflowed() {
                return Err(MenuError::NumericOverflow {
                    field: field.to_string(),
                });
            }
            Ok(MetricSummary::new(field, describe))
        })
        .collect()
}

fn check_fields_present(data: &[Record]) -> Result<()> {
    let missing: Vec<String> = METRIC_FIELDS
        .iter()
        .filter(|field| !data.iter().any(|record| record.contains_key(**field)))
        .map(|field| field.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MenuError::MissingField { fields: missing })
    }
}

/// Collects the non-missing numeric values of one field.
fn project_column(data: &[Record], field: &str) -> Result<Vec<f64>> {
    let mut column = Vec::with_capacity(data.len());

    for (index, record) in data.iter().enumerate() {
        match record.get(field) {
            None | Some(Value::Null) => {}
            Some(value) => {
                let number = value.as_f64().ok_or_else(|| MenuError::TypeMismatch {
                    field: field.to_string(),
                    index,
                    found: value.kind(),
                })?;
                // NaN and infinities count as missing, like null.
                if number.is_finite() {
                    column.push(number);
                }
            }
        }
    }

    Ok(column)
}
