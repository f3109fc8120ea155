// =============================================================================
// Stochastic Oscillator
// =============================================================================
//
// %K = 100 * (close - lowest_low) / (highest_high - lowest_low) over the
//      %K window
// %D = SMA(%K, %D period)
//
// A flat %K window (highest == lowest) pins %K to the 50 midpoint instead of
// dividing by zero.

use serde::Serialize;

use crate::candle::Candle;
use crate::error::EngineError;
use crate::series::Series;
use crate::settings::StochasticParams;
use crate::stats::{self, Extreme};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StochasticResult {
    pub k_period: usize,
    pub d_period: usize,
    pub k: Series,
    pub d: Series,
}

/// Compute %K and %D. Needs `k_period + d_period - 1` candles so that %D has
/// at least one value.
pub fn calculate_stochastic(
    candles: &[Candle],
    params: StochasticParams,
) -> Result<StochasticResult, EngineError> {
    let StochasticParams { k_period, d_period } = params;
    let required = k_period + d_period - 1;
    if k_period == 0 || d_period == 0 || candles.len() < required {
        return Err(EngineError::InsufficientData {
            indicator: "Stochastic Oscillator",
            required: required.max(1),
            actual: candles.len(),
        });
    }

    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();

    let highest = stats::rolling_extreme(&highs, k_period, Extreme::Max)?;
    let lowest = stats::rolling_extreme(&lows, k_period, Extreme::Min)?;

    let k_values: Vec<f64> = highest
        .iter()
        .zip(&lowest)
        .enumerate()
        .map(|(i, (&hh, &ll))| {
            let close = candles[i + k_period - 1].close;
            let range = hh - ll;
            if range == 0.0 {
                50.0
            } else {
                100.0 * (close - ll) / range
            }
        })
        .collect();

    let d_values = stats::rolling_average(&k_values, d_period)?;

    Ok(StochasticResult {
        k_period,
        d_period,
        k: Series::new(k_period - 1, k_values),
        d: Series::new(k_period + d_period - 2, d_values),
    })
}
