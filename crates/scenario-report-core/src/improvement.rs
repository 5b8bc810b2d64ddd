//! Improvement percentages and their display formatting.
//!
//! A positive improvement always means the comparison scenario beat the
//! baseline, whichever direction the metric is optimised in.

use crate::{Direction, Metric};

/// Percentage improvement of `comparison` over `baseline` for `metric`.
///
/// Returns `None` when either value is missing or NaN, or when the baseline
/// is zero. The baseline magnitude is the denominator for both directions, so
/// the sign stays meaningful for metrics that can go negative (AIC, BIC).
pub fn compute_improvement(
    baseline: Option<f64>,
    comparison: Option<f64>,
    metric: Metric,
) -> Option<f64> {
    let baseline = baseline.filter(|v| !v.is_nan())?;
    let comparison = comparison.filter(|v| !v.is_nan())?;
    if baseline == 0.0 {
        return None;
    }

    let delta = match metric.direction() {
        Direction::HigherIsBetter => comparison - baseline,
        Direction::LowerIsBetter => baseline - comparison,
    };
    Some(delta / baseline.abs() * 100.0)
}

/// Mean of the present values, `None` if there are none
pub fn mean_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Metric value with an optional improvement suffix: `8.000 (+20.0%)`.
///
/// Missing values render as `N/A`; a value without a computable improvement
/// renders as the bare number.
pub fn format_value(value: Option<f64>, improvement: Option<f64>) -> String {
    match (value, improvement) {
        (None, _) => NOT_AVAILABLE.to_string(),
        (Some(v), Some(imp)) => format!("{v:.3} ({imp:+.1}%)"),
        (Some(v), None) => format!("{v:.3}"),
    }
}

/// Signed two-decimal improvement, `+3.25`, or `N/A`
pub fn format_signed(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:+.2}"))
}

/// Placeholder for values that cannot be shown
pub const NOT_AVAILABLE: &str = "N/A";
