use crate::domain::model::{FiveNumberSummary, GroupedSummaries, Record};
use crate::utils::error::{ChartError, Result};
use std::collections::HashMap;

/// Linear-interpolation quantile of an ascending slice.
///
/// Returns `None` for an empty slice or a fraction outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }

    let h = p * (sorted.len() - 1) as f64;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

fn five_numbers(mut values: Vec<f64>) -> Option<FiveNumberSummary> {
    // total_cmp 讓 NaN 排到尾端而不是 panic
    values.sort_by(f64::total_cmp);

    Some(FiveNumberSummary {
        min: *values.first()?,
        q1: quantile_sorted(&values, 0.25)?,
        median: quantile_sorted(&values, 0.5)?,
        q3: quantile_sorted(&values, 0.75)?,
        max: *values.last()?,
    })
}

/// Groups records by key and computes a five-number summary per group.
///
/// Groups come out in the order their key first appears. `None` input is
/// rejected with [`ChartError::InvalidInput`]; an empty slice yields no groups.
pub fn summarize(records: Option<&[Record]>) -> Result<GroupedSummaries> {
    let records =
        records.ok_or_else(|| ChartError::invalid_input("record sequence is absent"))?;

    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
    for record in records {
        let key = record.group_key.as_str();
        groups
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(record.value);
    }

    let mut summaries = GroupedSummaries::new();
    for key in order {
        let values = groups.remove(key).unwrap_or_default();
        if let Some(summary) = five_numbers(values) {
            summaries.insert(key.to_string(), summary);
        }
    }

    tracing::debug!(
        "Summarized {} records into {} groups",
        records.len(),
        summaries.len()
    );
    Ok(summaries)
}

/// Largest value across all records; the upper end of the value axis.
pub fn global_max(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values.into_iter().reduce(f64::max)
}
