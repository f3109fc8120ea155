// =============================================================================
// Indicator engine orchestrator
// =============================================================================
//
// One request in, one complete bundle out: resolve the timeframe, validate
// the candle window, run all ten calculators, assemble the results in
// enumeration order. A failed calculator fails the whole request; the
// decision layer never sees a silently-incomplete bundle.
//
// The calculators are independent and share nothing mutable, so the async
// path fans them out across blocking tasks and joins them in order. The
// synchronous path is the reference semantics; both produce identical
// bundles.

use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::task;
use tracing::{debug, warn};

use crate::candle::{self, Candle};
use crate::error::EngineError;
use crate::indicators::atr::{self, AtrResult};
use crate::indicators::bollinger::{self, BollingerResult};
use crate::indicators::fibonacci::{self, FibonacciResult};
use crate::indicators::ichimoku::{self, IchimokuResult};
use crate::indicators::macd::{self, MacdResult};
use crate::indicators::moving_average::{self, MovingAverageResult};
use crate::indicators::parabolic_sar::{self, ParabolicSarResult};
use crate::indicators::rsi::{self, RsiResult};
use crate::indicators::stochastic::{self, StochasticResult};
use crate::indicators::volume_profile::{self, VolumeProfileResult};
use crate::settings::{IndicatorSettings, Timeframe};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_tail_len() -> usize {
    5
}

fn default_volume_profile_levels() -> usize {
    12
}

fn default_fib_ratios() -> Vec<f64> {
    fibonacci::DEFAULT_RATIOS.to_vec()
}

/// Per-request engine configuration. The defaults match the display policy
/// of the surrounding bot: a five-value tail per series, twelve volume
/// buckets, the canonical retracement ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Trailing values per series in the rendered report. Presentation only;
    /// the bundle always carries full series.
    #[serde(default = "default_tail_len")]
    pub tail_len: usize,

    /// Number of fixed-width price buckets in the volume profile.
    #[serde(default = "default_volume_profile_levels")]
    pub volume_profile_levels: usize,

    /// Retracement ratios, ascending.
    #[serde(default = "default_fib_ratios")]
    pub fib_ratios: Vec<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tail_len: default_tail_len(),
            volume_profile_levels: default_volume_profile_levels(),
            fib_ratios: default_fib_ratios(),
        }
    }
}

// =============================================================================
// Result bundle
// =============================================================================

/// Every indicator result for one `(timeframe, candle window)` request, in
/// the fixed enumeration order of `IndicatorKind`. Constructed fresh per
/// request; nothing in here is cached or shared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBundle {
    pub timeframe: Timeframe,
    pub moving_average: MovingAverageResult,
    pub rsi: RsiResult,
    pub macd: MacdResult,
    pub bollinger: BollingerResult,
    pub stochastic: StochasticResult,
    pub atr: AtrResult,
    pub parabolic_sar: ParabolicSarResult,
    pub ichimoku: IchimokuResult,
    pub volume_profile: VolumeProfileResult,
    pub fibonacci: FibonacciResult,
}

/// The candle count below which some calculator in this parameter set must
/// reject the request. Callers sizing their fetch window should stay well
/// above this.
pub fn required_candles(settings: &IndicatorSettings) -> usize {
    let ma = settings.ma_periods.iter().copied().max().unwrap_or(1);
    [
        ma,
        settings.rsi_period + 1,
        settings.macd.slow + settings.macd.signal - 1,
        settings.bollinger.period,
        settings.stochastic.k_period + settings.stochastic.d_period - 1,
        settings.atr_period + 1,
        2, // Parabolic SAR
        ichimoku::MIN_CANDLES,
        1, // Volume Profile
        2, // Fibonacci Retracement
    ]
    .into_iter()
    .max()
    .unwrap_or(1)
}

// =============================================================================
// Synchronous path
// =============================================================================

/// Compute the full bundle with default configuration.
pub fn compute_all(timeframe: &str, candles: &[Candle]) -> Result<ResultBundle, EngineError> {
    compute_all_with(&EngineConfig::default(), timeframe, candles)
}

/// Compute the full bundle. The timeframe label is checked first, then the
/// candle window, so neither malformed input nor any calculator runs behind
/// an unsupported timeframe.
pub fn compute_all_with(
    config: &EngineConfig,
    timeframe: &str,
    candles: &[Candle],
) -> Result<ResultBundle, EngineError> {
    let tf: Timeframe = timeframe.parse()?;
    candle::validate_series(candles)?;
    let settings = IndicatorSettings::resolve(tf);

    debug!(
        timeframe = %tf,
        candles = candles.len(),
        required = required_candles(settings),
        "computing indicator bundle"
    );
    log_spacing_anomalies(tf, candles);

    Ok(ResultBundle {
        timeframe: tf,
        moving_average: moving_average::calculate_moving_averages(candles, settings.ma_periods)?,
        rsi: rsi::calculate_rsi(candles, settings.rsi_period)?,
        macd: macd::calculate_macd(candles, settings.macd)?,
        bollinger: bollinger::calculate_bollinger(candles, settings.bollinger)?,
        stochastic: stochastic::calculate_stochastic(candles, settings.stochastic)?,
        atr: atr::calculate_atr(candles, settings.atr_period)?,
        parabolic_sar: parabolic_sar::calculate_parabolic_sar(candles)?,
        ichimoku: ichimoku::calculate_ichimoku(candles)?,
        volume_profile: volume_profile::calculate_volume_profile(
            candles,
            config.volume_profile_levels,
        )?,
        fibonacci: fibonacci::calculate_fibonacci(candles, &config.fib_ratios)?,
    })
}

/// Gap detection is the source's job; a spacing mismatch is only worth a
/// warning, not a rejection.
fn log_spacing_anomalies(tf: Timeframe, candles: &[Candle]) {
    let step_ms = tf.duration().num_milliseconds();
    let irregular = candles
        .windows(2)
        .filter(|w| w[1].open_time - w[0].open_time != step_ms)
        .count();
    if irregular > 0 {
        warn!(
            timeframe = %tf,
            irregular,
            "candle spacing does not match the timeframe; trusting source ordering"
        );
    }
}

// =============================================================================
// Parallel path
// =============================================================================

/// [`compute_all`] with the calculators fanned out across blocking tasks.
pub async fn compute_all_parallel(
    timeframe: &str,
    candles: Vec<Candle>,
) -> anyhow::Result<ResultBundle> {
    compute_all_parallel_with(EngineConfig::default(), timeframe, candles).await
}

/// Run the ten calculators as independent `spawn_blocking` tasks over one
/// shared immutable window and join them in enumeration order. Semantics are
/// identical to [`compute_all_with`]; only the scheduling differs. Task-join
/// failures surface through the anyhow chain, with the typed [`EngineError`]
/// inside for calculator failures.
pub async fn compute_all_parallel_with(
    config: EngineConfig,
    timeframe: &str,
    candles: Vec<Candle>,
) -> anyhow::Result<ResultBundle> {
    let tf: Timeframe = timeframe.parse()?;
    candle::validate_series(&candles)?;
    let settings = IndicatorSettings::resolve(tf);
    let candles = Arc::new(candles);

    debug!(
        timeframe = %tf,
        candles = candles.len(),
        "computing indicator bundle across blocking tasks"
    );
    log_spacing_anomalies(tf, &candles);

    let ma = {
        let c = Arc::clone(&candles);
        let periods = settings.ma_periods;
        task::spawn_blocking(move || moving_average::calculate_moving_averages(&c, periods))
    };
    let rsi = {
        let c = Arc::clone(&candles);
        let period = settings.rsi_period;
        task::spawn_blocking(move || rsi::calculate_rsi(&c, period))
    };
    let macd = {
        let c = Arc::clone(&candles);
        let params = settings.macd;
        task::spawn_blocking(move || macd::calculate_macd(&c, params))
    };
    let bollinger = {
        let c = Arc::clone(&candles);
        let params = settings.bollinger;
        task::spawn_blocking(move || bollinger::calculate_bollinger(&c, params))
    };
    let stochastic = {
        let c = Arc::clone(&candles);
        let params = settings.stochastic;
        task::spawn_blocking(move || stochastic::calculate_stochastic(&c, params))
    };
    let atr = {
        let c = Arc::clone(&candles);
        let period = settings.atr_period;
        task::spawn_blocking(move || atr::calculate_atr(&c, period))
    };
    let parabolic_sar = {
        let c = Arc::clone(&candles);
        task::spawn_blocking(move || parabolic_sar::calculate_parabolic_sar(&c))
    };
    let ichimoku = {
        let c = Arc::clone(&candles);
        task::spawn_blocking(move || ichimoku::calculate_ichimoku(&c))
    };
    let volume_profile = {
        let c = Arc::clone(&candles);
        let levels = config.volume_profile_levels;
        task::spawn_blocking(move || volume_profile::calculate_volume_profile(&c, levels))
    };
    let fibonacci = {
        let c = Arc::clone(&candles);
        let ratios = config.fib_ratios.clone();
        task::spawn_blocking(move || fibonacci::calculate_fibonacci(&c, &ratios))
    };

    Ok(ResultBundle {
        timeframe: tf,
        moving_average: ma.await.context("moving average task")??,
        rsi: rsi.await.context("RSI task")??,
        macd: macd.await.context("MACD task")??,
        bollinger: bollinger.await.context("Bollinger task")??,
        stochastic: stochastic.await.context("stochastic task")??,
        atr: atr.await.context("ATR task")??,
        parabolic_sar: parabolic_sar.await.context("parabolic SAR task")??,
        ichimoku: ichimoku.await.context("Ichimoku task")??,
        volume_profile: volume_profile.await.context("volume profile task")??,
        fibonacci: fibonacci.await.context("fibonacci task")??,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::EnvFilter;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .try_init();
    }

    /// Hourly candles with linearly rising closes starting at `start`.
    fn rising_hourly(n: usize, start: f64) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let close = start + i as f64;
                Candle {
                    open_time: i as i64 * 3_600_000,
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 50.0 + (i % 7) as f64,
                }
            })
            .collect()
    }

    #[test]
    fn unsupported_timeframe_rejected_before_anything_else() {
        init_tracing();
        // Even a malformed window reports the timeframe first.
        let mut candles = rising_hourly(120, 100.0);
        candles[5].close = f64::NAN;
        let err = compute_all("2h", &candles).unwrap_err();
        assert_eq!(err, EngineError::UnsupportedTimeframe("2h".to_string()));
    }

    #[test]
    fn malformed_window_rejected_before_calculators() {
        let mut candles = rising_hourly(120, 100.0);
        candles[7].close = f64::NAN;
        assert!(matches!(
            compute_all("1h", &candles),
            Err(EngineError::MalformedCandle { index: 7, .. })
        ));
    }

    #[test]
    fn short_window_fails_whole_request() {
        // 50 hourly candles satisfy everything except the Ichimoku shift.
        let candles = rising_hourly(50, 100.0);
        assert!(matches!(
            compute_all("1h", &candles),
            Err(EngineError::InsufficientData {
                indicator: "Ichimoku Cloud",
                required: 78,
                ..
            })
        ));
    }

    #[test]
    fn tiny_window_fails_whole_request() {
        let candles = rising_hourly(8, 100.0);
        assert!(matches!(
            compute_all("1h", &candles),
            Err(EngineError::InsufficientData { .. })
        ));
    }

    #[test]
    fn full_bundle_for_rising_market() {
        init_tracing();
        let candles = rising_hourly(120, 100.0);
        let bundle = compute_all("1h", &candles).unwrap();

        assert_eq!(bundle.timeframe, Timeframe::H1);

        // MA(20) ends at the mean of the last 20 closes.
        let ma20 = bundle
            .moving_average
            .lines
            .iter()
            .find(|l| l.period == 20)
            .unwrap();
        let expected: f64 = candles[100..].iter().map(|c| c.close).sum::<f64>() / 20.0;
        assert!((ma20.series.last().unwrap() - expected).abs() < 1e-9);

        // A monotonic rise has no losses: RSI pins to 100.
        assert_eq!(bundle.rsi.series.last().unwrap(), 100.0);

        // Bands stay ordered, SAR trails below a rising market.
        for i in 0..bundle.bollinger.middle.len() {
            assert!(bundle.bollinger.upper.values[i] >= bundle.bollinger.middle.values[i]);
            assert!(bundle.bollinger.middle.values[i] >= bundle.bollinger.lower.values[i]);
        }
        let last_sar = bundle.parabolic_sar.series.last().unwrap();
        assert!(last_sar < candles.last().unwrap().low);

        // Volume is conserved across profile levels.
        let total_in: f64 = candles.iter().map(|c| c.volume).sum();
        let total_out: f64 = bundle.volume_profile.levels.iter().map(|l| l.volume).sum();
        assert!((total_in - total_out).abs() < 1e-9);
    }

    #[test]
    fn bundle_is_pure() {
        let candles = rising_hourly(120, 100.0);
        let a = compute_all("1h", &candles).unwrap();
        let b = compute_all("1h", &candles).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn every_timeframe_computes_with_enough_candles() {
        for tf in Timeframe::ALL {
            let settings = IndicatorSettings::resolve(tf);
            let n = required_candles(settings) + 30;
            let candles = rising_hourly(n, 100.0);
            let bundle = compute_all(tf.as_str(), &candles);
            assert!(bundle.is_ok(), "{tf} failed: {:?}", bundle.err());
        }
    }

    #[test]
    fn required_candles_per_timeframe() {
        // 1h: the Ichimoku shift dominates; 1d: the 200-period MA does.
        assert_eq!(
            required_candles(IndicatorSettings::resolve(Timeframe::H1)),
            78
        );
        assert_eq!(
            required_candles(IndicatorSettings::resolve(Timeframe::D1)),
            200
        );
    }

    #[test]
    fn custom_config_flows_through() {
        let candles = rising_hourly(120, 100.0);
        let config = EngineConfig {
            tail_len: 3,
            volume_profile_levels: 4,
            fib_ratios: vec![0.0, 0.5, 1.0],
        };
        let bundle = compute_all_with(&config, "1h", &candles).unwrap();
        assert_eq!(bundle.volume_profile.levels.len(), 4);
        assert_eq!(bundle.fibonacci.levels.len(), 3);
    }

    #[tokio::test]
    async fn parallel_matches_sequential() {
        let candles = rising_hourly(150, 100.0);
        let sequential = compute_all("1h", &candles).unwrap();
        let parallel = compute_all_parallel("1h", candles).await.unwrap();
        assert_eq!(sequential, parallel);
    }

    #[tokio::test]
    async fn parallel_surfaces_typed_errors() {
        let candles = rising_hourly(50, 100.0);
        let err = compute_all_parallel("1h", candles).await.unwrap_err();
        let engine_err = err.downcast_ref::<EngineError>().unwrap();
        assert!(matches!(
            engine_err,
            EngineError::InsufficientData {
                indicator: "Ichimoku Cloud",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn parallel_rejects_unknown_timeframe() {
        let candles = rising_hourly(120, 100.0);
        let err = compute_all_parallel("3h", candles).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<EngineError>().unwrap(),
            &EngineError::UnsupportedTimeframe("3h".to_string())
        );
    }
}
