// =============================================================================
// Parabolic SAR (stop and reverse)
// =============================================================================
//
// The one calculator that is inherently sequential rather than windowed: a
// single forward pass threads (trend direction, extreme point, acceleration
// factor) through the whole window. Each step advances the stop toward price
// by the acceleration factor, clamps it to the prior two bars' extremes, and
// reverses the trend when price crosses it. On reversal the stop restarts at
// the old extreme point and the acceleration factor resets.
//
// Step 0.02, cap 0.2, fixed for every timeframe.

use serde::Serialize;

use crate::candle::Candle;
use crate::error::EngineError;
use crate::series::Series;

pub const AF_STEP: f64 = 0.02;
pub const AF_MAX: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParabolicSarResult {
    pub series: Series,
}

/// Running state threaded through the forward pass.
#[derive(Debug, Clone, Copy)]
struct SarState {
    long: bool,
    sar: f64,
    extreme: f64,
    af: f64,
}

/// Compute the SAR series. The first candle only seeds the state, so the
/// series has warmup 1 and length `len(candles) - 1`; needs 2 candles.
pub fn calculate_parabolic_sar(candles: &[Candle]) -> Result<ParabolicSarResult, EngineError> {
    if candles.len() < 2 {
        return Err(EngineError::InsufficientData {
            indicator: "Parabolic SAR",
            required: 2,
            actual: candles.len(),
        });
    }

    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();

    // Initial trend from the first two highs; the seed stop sits at the
    // opposite extreme of the first bar.
    let rising = highs[1] > highs[0];
    let mut state = SarState {
        long: rising,
        sar: if rising { lows[0] } else { highs[0] },
        extreme: if rising { highs[0] } else { lows[0] },
        af: AF_STEP,
    };

    let mut values = Vec::with_capacity(candles.len() - 1);

    for i in 1..candles.len() {
        // Advance the stop toward the extreme point.
        let mut sar = state.sar + state.af * (state.extreme - state.sar);

        if state.long {
            // The stop may never enter the prior two bars' ranges.
            sar = sar.min(lows[i - 1]);
            if i >= 2 {
                sar = sar.min(lows[i - 2]);
            }

            if lows[i] < sar {
                // Price crossed the stop: reverse to short.
                state.long = false;
                sar = state.extreme;
                state.extreme = lows[i];
                state.af = AF_STEP;
            } else if highs[i] > state.extreme {
                state.extreme = highs[i];
                state.af = (state.af + AF_STEP).min(AF_MAX);
            }
        } else {
            sar = sar.max(highs[i - 1]);
            if i >= 2 {
                sar = sar.max(highs[i - 2]);
            }

            if highs[i] > sar {
                state.long = true;
                sar = state.extreme;
                state.extreme = highs[i];
                state.af = AF_STEP;
            } else if lows[i] < state.extreme {
                state.extreme = lows[i];
                state.af = (state.af + AF_STEP).min(AF_MAX);
            }
        }

        state.sar = sar;
        values.push(sar);
    }

    Ok(ParabolicSarResult {
        series: Series::new(1, values),
    })
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
    fn needs_two_candles() {
        assert!(matches!(
            calculate_parabolic_sar(&[candle(0, 99.0, 101.0)]),
            Err(EngineError::InsufficientData {
                indicator: "Parabolic SAR",
                required: 2,
                actual: 1,
            })
        ));
    }

    #[test]
    fn steady_uptrend_keeps_sar_below_price() {
        let candles: Vec<Candle> = (0..40)
            .map(|i| {
                let base = 100.0 + i as f64 * 2.0;
                candle(i, base - 1.0, base + 1.0)
            })
            .collect();
        let result = calculate_parabolic_sar(&candles).unwrap();
        assert_eq!(result.series.warmup, 1);
        assert_eq!(result.series.len(), 39);
        for (i, &sar) in result.series.values.iter().enumerate() {
            let low = candles[i + 1].low;
            assert!(sar <= low, "SAR {sar} above low {low} at {i}");
        }
    }

    #[test]
    fn steady_downtrend_keeps_sar_above_price() {
        let candles: Vec<Candle> = (0..40)
            .map(|i| {
                let base = 200.0 - i as f64 * 2.0;
                candle(i, base - 1.0, base + 1.0)
            })
            .collect();
        let result = calculate_parabolic_sar(&candles).unwrap();
        for (i, &sar) in result.series.values.iter().enumerate() {
            let high = candles[i + 1].high;
            assert!(sar >= high, "SAR {sar} below high {high} at {i}");
        }
    }

    #[test]
    fn sharp_reversal_flips_the_stop() {
        // 20 bars up, then a collapse below the trailing stop.
        let mut candles: Vec<Candle> = (0..20)
            .map(|i| {
                let base = 100.0 + i as f64 * 2.0;
                candle(i, base - 1.0, base + 1.0)
            })
            .collect();
        for i in 0..10 {
            let base = 100.0 - i as f64 * 3.0;
            candles.push(candle(20 + i, base - 1.0, base + 1.0));
        }
        let result = calculate_parabolic_sar(&candles).unwrap();

        // After the collapse the stop must sit above price again.
        let last_sar = result.series.last().unwrap();
        let last_high = candles.last().unwrap().high;
        assert!(last_sar > last_high);
    }

    #[test]
    fn acceleration_is_capped() {
        // A long monotone run pushes AF to the cap; the stop still may not
        // cross the prior bar's low.
        let candles: Vec<Candle> = (0..200)
            .map(|i| {
                let base = 100.0 + i as f64;
                candle(i, base - 0.5, base + 0.5)
            })
            .collect();
        let result = calculate_parabolic_sar(&candles).unwrap();
        for (i, &sar) in result.series.values.iter().enumerate() {
            assert!(sar <= candles[i + 1].low + 1e-9);
        }
    }

    #[test]
    fn idempotent() {
        let candles: Vec<Candle> = (0..60)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.4).sin() * 15.0;
                candle(i, base - 2.0, base + 2.0)
            })
            .collect();
        let a = calculate_parabolic_sar(&candles).unwrap();
        let b = calculate_parabolic_sar(&candles).unwrap();
        assert_eq!(a, b);
    }
}
