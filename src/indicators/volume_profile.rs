// =============================================================================
// Volume Profile
// =============================================================================
//
// Buckets the traded price range (lowest low to highest high) into
// fixed-width levels and accumulates each candle's volume into the level its
// typical price (h + l + c) / 3 falls in. Levels are reported at the bucket
// midpoint, price ascending. A flat window collapses to a single level
// holding all volume.

use serde::Serialize;

use crate::candle::Candle;
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeLevel {
    pub price: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeProfileResult {
    pub levels: Vec<VolumeLevel>,
}

/// Accumulate volume into `num_levels` fixed-width price buckets over the
/// whole window. A zero `num_levels` is treated as one bucket.
pub fn calculate_volume_profile(
    candles: &[Candle],
    num_levels: usize,
) -> Result<VolumeProfileResult, EngineError> {
    if candles.is_empty() {
        return Err(EngineError::InsufficientData {
            indicator: "Volume Profile",
            required: 1,
            actual: 0,
        });
    }
    let num_levels = num_levels.max(1);

    let mut lowest = f64::INFINITY;
    let mut highest = f64::NEG_INFINITY;
    for c in candles {
        lowest = lowest.min(c.low);
        highest = highest.max(c.high);
    }

    let width = (highest - lowest) / num_levels as f64;
    if width == 0.0 {
        let total: f64 = candles.iter().map(|c| c.volume).sum();
        return Ok(VolumeProfileResult {
            levels: vec![VolumeLevel {
                price: lowest,
                volume: total,
            }],
        });
    }

    let mut volumes = vec![0.0_f64; num_levels];
    for c in candles {
        let typical = (c.high + c.low + c.close) / 3.0;
        let bucket = (((typical - lowest) / width) as usize).min(num_levels - 1);
        volumes[bucket] += c.volume;
    }

    let levels = volumes
        .into_iter()
        .enumerate()
        .map(|(i, volume)| VolumeLevel {
            price: lowest + (i as f64 + 0.5) * width,
            volume,
        })
        .collect();

    Ok(VolumeProfileResult { levels })
}
