// =============================================================================
// Average True Range (ATR) - Wilder's smoothing
// =============================================================================
//
// True Range per bar:
//   TR = max(high - low, |high - prev_close|, |low - prev_close|)
//
// ATR seeds with the simple mean of the first `period` TR values and then
// applies Wilder's update:
//   ATR_t = (ATR_{t-1} * (period - 1) + TR_t) / period

use serde::Serialize;

use crate::candle::Candle;
use crate::error::EngineError;
use crate::series::Series;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtrResult {
    pub period: usize,
    pub series: Series,
}

/// Compute the ATR series. True Range needs a previous close, so the series
/// has warmup `period` and length `len(candles) - period`; needs
/// `period + 1` candles.
pub fn calculate_atr(candles: &[Candle], period: usize) -> Result<AtrResult, EngineError> {
    let required = period + 1;
    if period == 0 || candles.len() < required {
        return Err(EngineError::InsufficientData {
            indicator: "ATR",
            required,
            actual: candles.len(),
        });
    }

    let true_ranges: Vec<f64> = candles
        .windows(2)
        .map(|w| {
            let prev_close = w[0].close;
            let hl = w[1].high - w[1].low;
            let hc = (w[1].high - prev_close).abs();
            let lc = (w[1].low - prev_close).abs();
            hl.max(hc).max(lc)
        })
        .collect();

    let period_f = period as f64;
    let mut atr = true_ranges[..period].iter().sum::<f64>() / period_f;

    let mut values = Vec::with_capacity(true_ranges.len() - period + 1);
    values.push(atr);

    for &tr in &true_ranges[period..] {
        atr = (atr * (period_f - 1.0) + tr) / period_f;
        values.push(atr);
    }

    Ok(AtrResult {
        period,
        series: Series::new(period, values),
    })
}
