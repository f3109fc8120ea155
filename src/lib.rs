// =============================================================================
// Meridian TA: technical-analysis indicator engine
// =============================================================================

//! Turns a bounded window of OHLCV candles for one trading pair and one
//! timeframe into a fixed bundle of ten technical-analysis indicator results,
//! ready for an automated decision layer.
//!
//! The engine computes; it does not fetch, decide, or persist. Candles come
//! from the caller already ordered and gap-free (a Binance-style kline fetch
//! of ~400 bars comfortably covers every configured warmup), and the result
//! bundle goes back to the caller in full precision. Rounding and tail-view
//! truncation happen only in [`report`].
//!
//! ```no_run
//! use meridian_ta::{compute_all, report, Candle};
//!
//! # fn candles_from_somewhere() -> Vec<Candle> { Vec::new() }
//! let candles = candles_from_somewhere();
//! let bundle = compute_all("1h", &candles)?;
//! let payload = report::render_report(&bundle);
//! # Ok::<(), meridian_ta::EngineError>(())
//! ```
//!
//! All calculators are pure: the same window and settings always produce the
//! same bundle. Parabolic SAR (sequential running state) and Ichimoku
//! (axis-shifted lines) are the two documented exceptions to plain windowed
//! computation; see their modules.

pub mod candle;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod report;
pub mod series;
pub mod settings;
pub mod stats;

pub use candle::Candle;
pub use engine::{
    compute_all, compute_all_parallel, compute_all_parallel_with, compute_all_with,
    required_candles, EngineConfig, ResultBundle,
};
pub use error::EngineError;
pub use indicators::IndicatorKind;
pub use series::Series;
pub use settings::{IndicatorSettings, Timeframe};
