// =============================================================================
// Primitive rolling statistics
// =============================================================================
//
// The building blocks every calculator is assembled from. All functions are
// pure over the input slice: output position `i` covers the trailing window
// ending at input position `i + period - 1`, so the output length is always
// `len - period + 1`.
//
// Inputs are assumed finite; the orchestrator validates candles before any
// of these run.

use crate::error::EngineError;

/// Trailing window mode for [`rolling_extreme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Min,
    Max,
}

fn check_window(
    what: &'static str,
    len: usize,
    period: usize,
) -> Result<(), EngineError> {
    if period == 0 || len < period {
        return Err(EngineError::InsufficientData {
            indicator: what,
            required: period.max(1),
            actual: len,
        });
    }
    Ok(())
}

/// Simple moving average over each trailing window of `period`.
pub fn rolling_average(series: &[f64], period: usize) -> Result<Vec<f64>, EngineError> {
    check_window("rolling average", series.len(), period)?;
    Ok(series
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / period as f64)
        .collect())
}

/// Exponential moving average, seeded with the simple average of the first
/// `period` values, then `ema[i] = value[i] * k + ema[i-1] * (1 - k)` with
/// `k = 2 / (period + 1)`.
pub fn exponential_average(series: &[f64], period: usize) -> Result<Vec<f64>, EngineError> {
    check_window("exponential average", series.len(), period)?;

    let k = 2.0 / (period + 1) as f64;
    let seed = series[..period].iter().sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(series.len() - period + 1);
    out.push(seed);

    let mut prev = seed;
    for &value in &series[period..] {
        let ema = value * k + prev * (1.0 - k);
        out.push(ema);
        prev = ema;
    }
    Ok(out)
}

/// Population standard deviation over each trailing window of `period`,
/// aligned with [`rolling_average`].
pub fn rolling_std_dev(series: &[f64], period: usize) -> Result<Vec<f64>, EngineError> {
    check_window("rolling standard deviation", series.len(), period)?;
    Ok(series
        .windows(period)
        .map(|w| {
            let mean = w.iter().sum::<f64>() / period as f64;
            let variance = w.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
            variance.sqrt()
        })
        .collect())
}

/// Trailing min or max over each window of `period`.
pub fn rolling_extreme(
    series: &[f64],
    period: usize,
    mode: Extreme,
) -> Result<Vec<f64>, EngineError> {
    check_window("rolling extreme", series.len(), period)?;
    Ok(series
        .windows(period)
        .map(|w| {
            w.iter().copied().fold(
                match mode {
                    Extreme::Min => f64::INFINITY,
                    Extreme::Max => f64::NEG_INFINITY,
                },
                |acc, v| match mode {
                    Extreme::Min => acc.min(v),
                    Extreme::Max => acc.max(v),
                },
            )
        })
        .collect())
}
