// =============================================================================
// Relative Strength Index (RSI) - Wilder's smoothing
// =============================================================================
//
// Step 1: split consecutive close-to-close deltas into gains and losses.
// Step 2: seed average gain / average loss with the simple mean of the first
//          `period` deltas.
// Step 3: Wilder update for every later delta:
//            avg = (avg * (period - 1) + current) / period
// Step 4: RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// A smoothed window with zero loss pins RSI to exactly 100; zero gain with
// nonzero loss yields exactly 0.

use serde::Serialize;

use crate::candle::Candle;
use crate::error::EngineError;
use crate::series::Series;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsiResult {
    pub period: usize,
    pub series: Series,
}

/// Compute the RSI series over candle closes.
///
/// The first output consumes `period` deltas, so the series has warmup
/// `period` and length `len(candles) - period`. Needs `period + 1` candles.
pub fn calculate_rsi(candles: &[Candle], period: usize) -> Result<RsiResult, EngineError> {
    let required = period + 1;
    if period == 0 || candles.len() < required {
        return Err(EngineError::InsufficientData {
            indicator: "RSI",
            required,
            actual: candles.len(),
        });
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let (gain_sum, loss_sum) = deltas[..period]
        .iter()
        .fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l - d)
            }
        });

    let period_f = period as f64;
    let mut avg_gain = gain_sum / period_f;
    let mut avg_loss = loss_sum / period_f;

    let mut values = Vec::with_capacity(deltas.len() - period + 1);
    values.push(rsi_value(avg_gain, avg_loss));

    for &delta in &deltas[period..] {
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { -delta } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        values.push(rsi_value(avg_gain, avg_loss));
    }

    Ok(RsiResult {
        period,
        series: Series::new(period, values),
    })
}

/// RSI from smoothed averages. Zero smoothed loss means no selling pressure
/// in the window: RSI is exactly 100.
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
