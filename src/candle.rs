// =============================================================================
// Candle data model
// =============================================================================
//
// One OHLCV sample per bar interval. The candle source guarantees ordering
// and gap-freeness; the engine still validates the structural invariants it
// depends on before computing anything.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A single OHLCV candle, ordered by `open_time` (epoch milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Defensively validate a candle window before any calculator touches it.
///
/// Rejects with [`EngineError::MalformedCandle`] when:
/// - any price or volume value is non-finite (NaN / infinity), or
/// - `open_time` does not strictly increase (duplicate or backwards bar).
///
/// The engine does not attempt gap detection; that is the source's contract.
pub fn validate_series(candles: &[Candle]) -> Result<(), EngineError> {
    let mut prev_time: Option<i64> = None;

    for (index, candle) in candles.iter().enumerate() {
        let fields = [
            ("open", candle.open),
            ("high", candle.high),
            ("low", candle.low),
            ("close", candle.close),
            ("volume", candle.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(EngineError::MalformedCandle {
                    index,
                    reason: format!("non-finite {name}: {value}"),
                });
            }
        }

        if candle.low > candle.high {
            return Err(EngineError::MalformedCandle {
                index,
                reason: format!("low {} above high {}", candle.low, candle.high),
            });
        }

        if let Some(prev) = prev_time {
            if candle.open_time <= prev {
                return Err(EngineError::MalformedCandle {
                    index,
                    reason: format!(
                        "open_time {} does not advance past previous {}",
                        candle.open_time, prev
                    ),
                });
            }
        }
        prev_time = Some(candle.open_time);
    }

    Ok(())
}
