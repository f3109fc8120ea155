// =============================================================================
// Ichimoku Cloud
// =============================================================================
//
// tenkan-sen  = midpoint of the 9-period high/low range
// kijun-sen   = midpoint of the 26-period high/low range
// senkou A    = (tenkan + kijun) / 2, plotted 26 candles forward
// senkou B    = midpoint of the 52-period range, plotted 26 candles forward
// chikou      = close, plotted 26 candles backward
//
// Shifted lines keep their position on the original candle axis through the
// series warmup instead of being compressed: senkou A starts at candle 51,
// senkou B at candle 77, and chikou covers candles 0..len-26. Projection past
// the last candle is dropped; no output index ever leaves the input window.
// Periods are fixed at 9/26/52 for every timeframe.

use serde::Serialize;

use crate::candle::Candle;
use crate::error::EngineError;
use crate::series::Series;
use crate::stats::{self, Extreme};

pub const TENKAN_PERIOD: usize = 9;
pub const KIJUN_PERIOD: usize = 26;
pub const SENKOU_B_PERIOD: usize = 52;
/// Forward shift of the senkou spans and backward shift of chikou.
pub const SHIFT: usize = 26;

/// Candles needed for every line, including one on-axis senkou B value.
pub const MIN_CANDLES: usize = SENKOU_B_PERIOD + SHIFT;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IchimokuResult {
    pub tenkan_sen: Series,
    pub kijun_sen: Series,
    pub senkou_span_a: Series,
    pub senkou_span_b: Series,
    pub chikou_span: Series,
}

/// Midpoint of the highest high and lowest low over each trailing window.
fn range_midpoint(
    highs: &[f64],
    lows: &[f64],
    period: usize,
) -> Result<Vec<f64>, EngineError> {
    let highest = stats::rolling_extreme(highs, period, Extreme::Max)?;
    let lowest = stats::rolling_extreme(lows, period, Extreme::Min)?;
    Ok(highest
        .iter()
        .zip(&lowest)
        .map(|(&h, &l)| (h + l) / 2.0)
        .collect())
}

pub fn calculate_ichimoku(candles: &[Candle]) -> Result<IchimokuResult, EngineError> {
    let n = candles.len();
    if n < MIN_CANDLES {
        return Err(EngineError::InsufficientData {
            indicator: "Ichimoku Cloud",
            required: MIN_CANDLES,
            actual: n,
        });
    }

    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let tenkan = range_midpoint(&highs, &lows, TENKAN_PERIOD)?;
    let kijun = range_midpoint(&highs, &lows, KIJUN_PERIOD)?;
    let senkou_b_raw = range_midpoint(&highs, &lows, SENKOU_B_PERIOD)?;

    // Span A at its source position: average of tenkan and kijun, aligned on
    // the kijun warmup (tenkan has 17 extra leading values).
    let lead = KIJUN_PERIOD - TENKAN_PERIOD;
    let span_a_raw: Vec<f64> = kijun
        .iter()
        .enumerate()
        .map(|(i, &k)| (tenkan[i + lead] + k) / 2.0)
        .collect();

    // Forward-plotted spans: keep only what still lands on the candle axis.
    let span_a_warmup = KIJUN_PERIOD - 1 + SHIFT;
    let span_b_warmup = SENKOU_B_PERIOD - 1 + SHIFT;
    let span_a: Vec<f64> = span_a_raw[..n - span_a_warmup].to_vec();
    let span_b: Vec<f64> = senkou_b_raw[..n - span_b_warmup].to_vec();

    // Chikou: today's close plotted SHIFT candles back.
    let chikou: Vec<f64> = closes[SHIFT..].to_vec();

    Ok(IchimokuResult {
        tenkan_sen: Series::new(TENKAN_PERIOD - 1, tenkan),
        kijun_sen: Series::new(KIJUN_PERIOD - 1, kijun),
        senkou_span_a: Series::new(span_a_warmup, span_a),
        senkou_span_b: Series::new(span_b_warmup, span_b),
        chikou_span: Series::new(0, chikou),
    })
}
