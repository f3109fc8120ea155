// =============================================================================
// Engine error taxonomy
// =============================================================================
//
// Every failure the engine can report to its caller. Calculators never return
// partial output: a request either yields a complete bundle or one of these.

use thiserror::Error;

/// Typed failures surfaced by the indicator engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A timeframe label outside the supported set was given anywhere in the
    /// pipeline. Never silently defaulted.
    #[error("unsupported timeframe {0:?} (expected one of: 5m, 15m, 30m, 1h, 4h, 1d)")]
    UnsupportedTimeframe(String),

    /// The candle window is shorter than a calculator's minimum warmup.
    #[error("insufficient data for {indicator}: need at least {required} candles, got {actual}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        actual: usize,
    },

    /// Defensive rejection of an invalid input candle (non-monotonic
    /// timestamps or non-finite values). Candle validity is nominally the
    /// source's job; the engine still refuses to compute on bad input.
    #[error("malformed candle at index {index}: {reason}")]
    MalformedCandle { index: usize, reason: String },
}
