// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
// macd      = EMA(close, fast) - EMA(close, slow)
// signal    = EMA(macd, signal_period)
// histogram = macd - signal
//
// The macd line starts once the slow EMA is seeded (warmup `slow - 1`); the
// signal and histogram start `signal_period - 1` values later. At every index
// both cover, histogram equals macd minus signal exactly.

use serde::Serialize;

use crate::candle::Candle;
use crate::error::EngineError;
use crate::series::Series;
use crate::settings::MacdParams;
use crate::stats;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdResult {
    pub fast: usize,
    pub slow: usize,
    pub signal_period: usize,
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// Compute the MACD triple. Needs `slow + signal - 1` candles so that the
/// signal line has at least one value.
pub fn calculate_macd(candles: &[Candle], params: MacdParams) -> Result<MacdResult, EngineError> {
    let MacdParams { fast, slow, signal } = params;
    debug_assert!(fast < slow, "MACD fast period must be below slow");

    let required = slow + signal - 1;
    if fast == 0 || signal == 0 || candles.len() < required {
        return Err(EngineError::InsufficientData {
            indicator: "MACD",
            required,
            actual: candles.len(),
        });
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let ema_fast = stats::exponential_average(&closes, fast)?;
    let ema_slow = stats::exponential_average(&closes, slow)?;

    // The fast EMA has `slow - fast` extra leading values; skip them so both
    // lines are aligned on the slow warmup.
    let offset = slow - fast;
    let macd_values: Vec<f64> = ema_slow
        .iter()
        .enumerate()
        .map(|(i, &s)| ema_fast[i + offset] - s)
        .collect();

    let signal_values = stats::exponential_average(&macd_values, signal)?;
    let histogram_values: Vec<f64> = signal_values
        .iter()
        .enumerate()
        .map(|(i, &s)| macd_values[i + signal - 1] - s)
        .collect();

    let macd_warmup = slow - 1;
    let signal_warmup = macd_warmup + signal - 1;

    Ok(MacdResult {
        fast,
        slow,
        signal_period: signal,
        macd: Series::new(macd_warmup, macd_values),
        signal: Series::new(signal_warmup, signal_values),
        histogram: Series::new(signal_warmup, histogram_values),
    })
}
