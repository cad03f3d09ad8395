/// Common view over the individual check results.
pub trait QcCheck {
    /// Stable key used in summaries and reports.
    fn name(&self) -> &'static str;

    /// The check's numeric signal, as reported.
    fn metric_value(&self) -> f64;

    fn passes(&self) -> bool;
}

/// Reported values carry three decimals; verdicts use the exact value.
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
