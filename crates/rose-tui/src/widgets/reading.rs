//! Gauge ratios recovered from rendered field text.
//!
//! The dashboard only sees what the render step wrote (`"3/14"`, `"76%"`),
//! so the gauges read their fill back out of that text.

/// Fill ratio for a `"<value>/<max>"` field, clamped to `0.0..=1.0`.
pub fn fraction_ratio(text: &str) -> Option<f64> {
    let (value, max) = text.split_once('/')?;
    let value: f64 = value.trim().parse().ok()?;
    let max: f64 = max.trim().parse().ok()?;
    if max <= 0.0 {
        return None;
    }
    Some((value / max).clamp(0.0, 1.0))
}

/// Fill ratio for a `"<n>%"` field, clamped to `0.0..=1.0`.
pub fn percent_ratio(text: &str) -> Option<f64> {
    let value: f64 = text.trim().strip_suffix('%')?.trim().parse().ok()?;
    Some((value / 100.0).clamp(0.0, 1.0))
}
