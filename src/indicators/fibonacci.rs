// =============================================================================
// Fibonacci Retracement
// =============================================================================
//
// From the window's highest high and lowest low, each ratio r maps to the
// level `high - r * (high - low)`: ratio 0 is the high, ratio 1 the low, so
// prices are non-increasing as the ratio grows.

use serde::Serialize;

use crate::candle::Candle;
use crate::error::EngineError;

/// Canonical retracement ratios.
pub const DEFAULT_RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FibLevel {
    pub ratio: f64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FibonacciResult {
    pub high: f64,
    pub low: f64,
    pub levels: Vec<FibLevel>,
}

pub fn calculate_fibonacci(
    candles: &[Candle],
    ratios: &[f64],
) -> Result<FibonacciResult, EngineError> {
    if candles.len() < 2 {
        return Err(EngineError::InsufficientData {
            indicator: "Fibonacci Retracement",
            required: 2,
            actual: candles.len(),
        });
    }

    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for c in candles {
        low = low.min(c.low);
        high = high.max(c.high);
    }

    let span = high - low;
    let levels = ratios
        .iter()
        .map(|&ratio| FibLevel {
            ratio,
            price: high - ratio * span,
        })
        .collect();

    Ok(FibonacciResult { high, low, levels })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(i: usize, low: f64, high: f64) -> Candle {
        let mid = (low + high) / 2.0;
        Candle {
            open_time: i as i64 * 60_000,
            open: mid,
            high,
            low,
            close: mid,
            volume: 10.0,
        }
    }

    #[test]
    fn endpoints_hit_high_and_low() {
        let candles: Vec<Candle> = (0..30)
            .map(|i| candle(i, 100.0 + i as f64, 105.0 + i as f64))
            .collect();
        let result = calculate_fibonacci(&candles, &DEFAULT_RATIOS).unwrap();
        assert_eq!(result.high, 134.0);
        assert_eq!(result.low, 100.0);
        assert_eq!(result.levels.first().unwrap().price, 134.0);
        assert_eq!(result.levels.last().unwrap().price, 100.0);
    }

    #[test]
    fn levels_non_increasing_in_ratio() {
        let candles: Vec<Candle> = (0..25)
            .map(|i| candle(i, 50.0 + (i as f64 * 0.9).sin() * 10.0, 70.0))
            .collect();
        let result = calculate_fibonacci(&candles, &DEFAULT_RATIOS).unwrap();
        for pair in result.levels.windows(2) {
            assert!(pair[0].ratio < pair[1].ratio);
            assert!(pair[0].price >= pair[1].price);
        }
    }

    #[test]
    fn flat_window_puts_every_level_at_price() {
        let candles: Vec<Candle> = (0..5).map(|i| candle(i, 80.0, 80.0)).collect();
        let result = calculate_fibonacci(&candles, &DEFAULT_RATIOS).unwrap();
        assert!(result.levels.iter().all(|l| l.price == 80.0));
    }

    #[test]
    fn single_candle_fails() {
        let candles = vec![candle(0, 99.0, 101.0)];
        assert!(matches!(
            calculate_fibonacci(&candles, &DEFAULT_RATIOS),
            Err(EngineError::InsufficientData {
                indicator: "Fibonacci Retracement",
                required: 2,
                actual: 1,
            })
        ));
    }

    #[test]
    fn custom_ratio_list() {
        let candles: Vec<Candle> = (0..10).map(|i| candle(i, 100.0, 200.0)).collect();
        let result = calculate_fibonacci(&candles, &[0.25, 0.75]).unwrap();
        assert_eq!(result.levels.len(), 2);
        assert_eq!(result.levels[0].price, 175.0);
        assert_eq!(result.levels[1].price, 125.0);
    }
}
