// =============================================================================
// Indicator calculators
// =============================================================================
//
// One module per indicator, each a pure function from a candle window (plus
// resolved settings) to a named result struct. Calculators validate their own
// minimum candle count and fail with `InsufficientData` instead of producing
// partial output.
//
// Parabolic SAR threads running state through a single forward pass and
// Ichimoku plots shifted lines on the candle axis; both are documented as
// sequential/shifted in their modules. Everything else is windowed.

pub mod atr;
pub mod bollinger;
pub mod fibonacci;
pub mod ichimoku;
pub mod macd;
pub mod moving_average;
pub mod parabolic_sar;
pub mod rsi;
pub mod stochastic;
pub mod volume_profile;

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of indicators the engine computes, in bundle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorKind {
    MovingAverage,
    Rsi,
    Macd,
    BollingerBands,
    Stochastic,
    Atr,
    ParabolicSar,
    IchimokuCloud,
    VolumeProfile,
    FibonacciRetracement,
}

impl IndicatorKind {
    /// Fixed enumeration order; the bundle and the report follow it.
    pub const ALL: [IndicatorKind; 10] = [
        IndicatorKind::MovingAverage,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::BollingerBands,
        IndicatorKind::Stochastic,
        IndicatorKind::Atr,
        IndicatorKind::ParabolicSar,
        IndicatorKind::IchimokuCloud,
        IndicatorKind::VolumeProfile,
        IndicatorKind::FibonacciRetracement,
    ];

    /// Display name used as the report key toward the decision layer.
    pub fn name(&self) -> &'static str {
        match self {
            IndicatorKind::MovingAverage => "Moving Average",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::BollingerBands => "Bollinger Bands",
            IndicatorKind::Stochastic => "Stochastic Oscillator",
            IndicatorKind::Atr => "ATR",
            IndicatorKind::ParabolicSar => "Parabolic SAR",
            IndicatorKind::IchimokuCloud => "Ichimoku Cloud",
            IndicatorKind::VolumeProfile => "Volume Profile",
            IndicatorKind::FibonacciRetracement => "Fibonacci Retracement",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
