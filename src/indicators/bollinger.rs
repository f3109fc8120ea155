// =============================================================================
// Bollinger Bands
// =============================================================================
//
// middle = SMA(close, period)
// upper  = middle + multiplier * sigma
// lower  = middle - multiplier * sigma
//
// sigma is the population standard deviation over the same trailing window,
// so the three bands share one warmup and upper >= middle >= lower holds for
// any non-negative multiplier.

use serde::Serialize;

use crate::candle::Candle;
use crate::error::EngineError;
use crate::series::Series;
use crate::settings::BollingerParams;
use crate::stats;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerResult {
    pub period: usize,
    pub multiplier: f64,
    pub middle: Series,
    pub upper: Series,
    pub lower: Series,
}

pub fn calculate_bollinger(
    candles: &[Candle],
    params: BollingerParams,
) -> Result<BollingerResult, EngineError> {
    let BollingerParams { period, multiplier } = params;
    if period == 0 || candles.len() < period {
        return Err(EngineError::InsufficientData {
            indicator: "Bollinger Bands",
            required: period.max(1),
            actual: candles.len(),
        });
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let middle = stats::rolling_average(&closes, period)?;
    let sigma = stats::rolling_std_dev(&closes, period)?;

    let upper: Vec<f64> = middle
        .iter()
        .zip(&sigma)
        .map(|(&m, &s)| m + multiplier * s)
        .collect();
    let lower: Vec<f64> = middle
        .iter()
        .zip(&sigma)
        .map(|(&m, &s)| m - multiplier * s)
        .collect();

    let warmup = period - 1;
    Ok(BollingerResult {
        period,
        multiplier,
        middle: Series::new(warmup, middle),
        upper: Series::new(warmup, upper),
        lower: Series::new(warmup, lower),
    })
}
