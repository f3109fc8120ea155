// =============================================================================
// Moving Average (MA)
// =============================================================================
//
// One simple moving average of the close price per configured period.

use serde::Serialize;

use crate::candle::Candle;
use crate::error::EngineError;
use crate::series::Series;
use crate::stats;

/// One MA line: the period it was computed with and its values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaLine {
    pub period: usize,
    pub series: Series,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageResult {
    pub lines: Vec<MaLine>,
}

/// Compute one SMA line per entry in `periods`, each with warmup `period - 1`.
///
/// Fails with `InsufficientData` when the window is shorter than the largest
/// configured period, so either every line is present or none is.
pub fn calculate_moving_averages(
    candles: &[Candle],
    periods: &[usize],
) -> Result<MovingAverageResult, EngineError> {
    let required = periods.iter().copied().max().unwrap_or(1);
    if candles.len() < required {
        return Err(EngineError::InsufficientData {
            indicator: "Moving Average",
            required,
            actual: candles.len(),
        });
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let mut lines = Vec::with_capacity(periods.len());
    for &period in periods {
        let values = stats::rolling_average(&closes, period)?;
        lines.push(MaLine {
            period,
            series: Series::new(period - 1, values),
        });
    }

    Ok(MovingAverageResult { lines })
}
