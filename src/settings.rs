// =============================================================================
// Timeframes and per-timeframe indicator settings
// =============================================================================
//
// The settings table is process-wide configuration, authored once and
// read-only. Lookup is an exhaustive enum match: once a label parses to a
// `Timeframe`, resolution cannot fail.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Supported bar intervals. A closed set: anything else is rejected at the
/// parse boundary with [`EngineError::UnsupportedTimeframe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
}

impl Timeframe {
    /// Every supported timeframe, shortest first.
    pub const ALL: [Timeframe; 6] = [
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::D1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1d",
        }
    }

    /// Length of one bar at this timeframe.
    pub fn duration(&self) -> Duration {
        match self {
            Timeframe::M5 => Duration::minutes(5),
            Timeframe::M15 => Duration::minutes(15),
            Timeframe::M30 => Duration::minutes(30),
            Timeframe::H1 => Duration::hours(1),
            Timeframe::H4 => Duration::hours(4),
            Timeframe::D1 => Duration::days(1),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "5m" => Ok(Timeframe::M5),
            "15m" => Ok(Timeframe::M15),
            "30m" => Ok(Timeframe::M30),
            "1h" => Ok(Timeframe::H1),
            "4h" => Ok(Timeframe::H4),
            "1d" => Ok(Timeframe::D1),
            other => Err(EngineError::UnsupportedTimeframe(other.to_string())),
        }
    }
}

// =============================================================================
// Indicator parameter sets
// =============================================================================

/// MACD period triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

/// Bollinger Band window and deviation multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerParams {
    pub period: usize,
    pub multiplier: f64,
}

/// Stochastic %K / %D windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StochasticParams {
    pub k_period: usize,
    pub d_period: usize,
}

/// The full parameter set one timeframe resolves to.
///
/// Ichimoku (9/26/52) and Parabolic SAR (0.02/0.2) are fixed for every
/// timeframe and carry their constants in their own modules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSettings {
    pub ma_periods: &'static [usize],
    pub rsi_period: usize,
    pub macd: MacdParams,
    pub bollinger: BollingerParams,
    pub stochastic: StochasticParams,
    pub atr_period: usize,
}

const M5_SETTINGS: IndicatorSettings = IndicatorSettings {
    ma_periods: &[9, 21, 50],
    rsi_period: 9,
    macd: MacdParams { fast: 8, slow: 17, signal: 9 },
    bollinger: BollingerParams { period: 20, multiplier: 2.0 },
    stochastic: StochasticParams { k_period: 9, d_period: 3 },
    atr_period: 9,
};

const M15_SETTINGS: IndicatorSettings = IndicatorSettings {
    ma_periods: &[9, 21, 50],
    rsi_period: 11,
    macd: MacdParams { fast: 12, slow: 26, signal: 9 },
    bollinger: BollingerParams { period: 20, multiplier: 2.0 },
    stochastic: StochasticParams { k_period: 14, d_period: 3 },
    atr_period: 11,
};

const M30_SETTINGS: IndicatorSettings = IndicatorSettings {
    ma_periods: &[10, 20, 50],
    rsi_period: 14,
    macd: MacdParams { fast: 12, slow: 26, signal: 9 },
    bollinger: BollingerParams { period: 20, multiplier: 2.0 },
    stochastic: StochasticParams { k_period: 14, d_period: 3 },
    atr_period: 14,
};

const H1_SETTINGS: IndicatorSettings = IndicatorSettings {
    ma_periods: &[10, 20, 50],
    rsi_period: 14,
    macd: MacdParams { fast: 12, slow: 26, signal: 9 },
    bollinger: BollingerParams { period: 20, multiplier: 2.0 },
    stochastic: StochasticParams { k_period: 14, d_period: 3 },
    atr_period: 14,
};

const H4_SETTINGS: IndicatorSettings = IndicatorSettings {
    ma_periods: &[20, 50, 100],
    rsi_period: 14,
    macd: MacdParams { fast: 12, slow: 26, signal: 9 },
    bollinger: BollingerParams { period: 20, multiplier: 2.5 },
    stochastic: StochasticParams { k_period: 14, d_period: 3 },
    atr_period: 14,
};

const D1_SETTINGS: IndicatorSettings = IndicatorSettings {
    ma_periods: &[20, 50, 200],
    rsi_period: 14,
    macd: MacdParams { fast: 12, slow: 26, signal: 9 },
    bollinger: BollingerParams { period: 20, multiplier: 2.5 },
    stochastic: StochasticParams { k_period: 21, d_period: 5 },
    atr_period: 14,
};

impl IndicatorSettings {
    /// Resolve the parameter set for a timeframe. Total: every variant of
    /// the closed enum has an entry.
    pub fn resolve(timeframe: Timeframe) -> &'static IndicatorSettings {
        match timeframe {
            Timeframe::M5 => &M5_SETTINGS,
            Timeframe::M15 => &M15_SETTINGS,
            Timeframe::M30 => &M30_SETTINGS,
            Timeframe::H1 => &H1_SETTINGS,
            Timeframe::H4 => &H4_SETTINGS,
            Timeframe::D1 => &D1_SETTINGS,
        }
    }
}
