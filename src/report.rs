// =============================================================================
// Consumption-boundary report
// =============================================================================
//
// Renders a bundle for the decision/display layer: an ordered JSON object
// keyed by display name, each series cut to its tail view and rounded to the
// indicator's conventional precision. Rounding and truncation live here and
// only here; the bundle itself always carries full-precision, full-length
// series.

use serde_json::{json, Map, Value};

use crate::engine::{EngineConfig, ResultBundle};
use crate::indicators::IndicatorKind;
use crate::series::Series;

/// Price-denominated series (MA, bands, SAR, Ichimoku lines, levels).
const PRICE_DECIMALS: i32 = 6;
/// Bounded oscillators (RSI, stochastic).
const OSCILLATOR_DECIMALS: i32 = 4;
/// Accumulated volume.
const VOLUME_DECIMALS: i32 = 2;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn tail_values(series: &Series, k: usize, decimals: i32) -> Value {
    Value::from(
        series
            .tail(k)
            .iter()
            .map(|&v| round_to(v, decimals))
            .collect::<Vec<f64>>(),
    )
}

/// Render the report with the default display policy.
pub fn render_report(bundle: &ResultBundle) -> Value {
    render_report_with(bundle, &EngineConfig::default())
}

/// Render the report: one key per indicator, in enumeration order.
pub fn render_report_with(bundle: &ResultBundle, config: &EngineConfig) -> Value {
    let k = config.tail_len;
    let mut root = Map::new();

    for kind in IndicatorKind::ALL {
        let value = match kind {
            IndicatorKind::MovingAverage => Value::from(
                bundle
                    .moving_average
                    .lines
                    .iter()
                    .map(|line| {
                        json!({
                            "period": line.period,
                            "values": tail_values(&line.series, k, PRICE_DECIMALS),
                        })
                    })
                    .collect::<Vec<Value>>(),
            ),
            IndicatorKind::Rsi => json!({
                "period": bundle.rsi.period,
                "values": tail_values(&bundle.rsi.series, k, OSCILLATOR_DECIMALS),
            }),
            IndicatorKind::Macd => json!({
                "macd": tail_values(&bundle.macd.macd, k, PRICE_DECIMALS),
                "signal": tail_values(&bundle.macd.signal, k, PRICE_DECIMALS),
                "histogram": tail_values(&bundle.macd.histogram, k, PRICE_DECIMALS),
            }),
            IndicatorKind::BollingerBands => json!({
                "middle": tail_values(&bundle.bollinger.middle, k, PRICE_DECIMALS),
                "upper": tail_values(&bundle.bollinger.upper, k, PRICE_DECIMALS),
                "lower": tail_values(&bundle.bollinger.lower, k, PRICE_DECIMALS),
            }),
            IndicatorKind::Stochastic => json!({
                "k": tail_values(&bundle.stochastic.k, k, OSCILLATOR_DECIMALS),
                "d": tail_values(&bundle.stochastic.d, k, OSCILLATOR_DECIMALS),
            }),
            IndicatorKind::Atr => json!({
                "period": bundle.atr.period,
                "values": tail_values(&bundle.atr.series, k, PRICE_DECIMALS),
            }),
            IndicatorKind::ParabolicSar => json!({
                "values": tail_values(&bundle.parabolic_sar.series, k, PRICE_DECIMALS),
            }),
            IndicatorKind::IchimokuCloud => json!({
                "tenkan_sen": tail_values(&bundle.ichimoku.tenkan_sen, k, PRICE_DECIMALS),
                "kijun_sen": tail_values(&bundle.ichimoku.kijun_sen, k, PRICE_DECIMALS),
                "senkou_span_a": tail_values(&bundle.ichimoku.senkou_span_a, k, PRICE_DECIMALS),
                "senkou_span_b": tail_values(&bundle.ichimoku.senkou_span_b, k, PRICE_DECIMALS),
                "chikou_span": tail_values(&bundle.ichimoku.chikou_span, k, PRICE_DECIMALS),
            }),
            IndicatorKind::VolumeProfile => {
                let levels = &bundle.volume_profile.levels;
                let start = levels.len().saturating_sub(k);
                json!({
                    "levels": levels[start..]
                        .iter()
                        .map(|l| {
                            json!({
                                "price": round_to(l.price, PRICE_DECIMALS),
                                "volume": round_to(l.volume, VOLUME_DECIMALS),
                            })
                        })
                        .collect::<Vec<Value>>(),
                })
            }
            IndicatorKind::FibonacciRetracement => json!({
                "high": round_to(bundle.fibonacci.high, PRICE_DECIMALS),
                "low": round_to(bundle.fibonacci.low, PRICE_DECIMALS),
                // The ratio set is fixed, not a time series; it is never cut.
                "levels": bundle.fibonacci.levels
                    .iter()
                    .map(|l| {
                        json!({
                            "ratio": l.ratio,
                            "price": round_to(l.price, PRICE_DECIMALS),
                        })
                    })
                    .collect::<Vec<Value>>(),
            }),
        };
        root.insert(kind.name().to_string(), value);
    }

    Value::Object(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candle::Candle;
    use crate::engine::compute_all;

    fn rising_hourly(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                Candle {
                    open_time: i as i64 * 3_600_000,
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 50.0,
                }
            })
            .collect()
    }

    #[test]
    fn keys_follow_enumeration_order() {
        let bundle = compute_all("1h", &rising_hourly(120)).unwrap();
        let report = render_report(&bundle);
        let keys: Vec<&String> = report.as_object().unwrap().keys().collect();
        let expected: Vec<&str> = IndicatorKind::ALL.iter().map(|kind| kind.name()).collect();
        assert_eq!(keys.len(), 10);
        for (key, want) in keys.iter().zip(&expected) {
            assert_eq!(key.as_str(), *want);
        }
    }

    #[test]
    fn series_are_cut_to_the_tail() {
        let bundle = compute_all("1h", &rising_hourly(120)).unwrap();
        let report = render_report(&bundle);

        let rsi_values = &report["RSI"]["values"];
        assert_eq!(rsi_values.as_array().unwrap().len(), 5);

        for line in report["Moving Average"].as_array().unwrap() {
            assert!(line["values"].as_array().unwrap().len() <= 5);
        }

        // Senkou span B is long enough here to be cut as well.
        let span_b = report["Ichimoku Cloud"]["senkou_span_b"].as_array().unwrap();
        assert_eq!(span_b.len(), 5);
    }

    #[test]
    fn short_series_render_whole_without_padding() {
        // 78 candles leave exactly one on-axis senkou B value.
        let bundle = compute_all("1h", &rising_hourly(78)).unwrap();
        let report = render_report(&bundle);
        let span_b = report["Ichimoku Cloud"]["senkou_span_b"].as_array().unwrap();
        assert_eq!(span_b.len(), 1);
    }

    #[test]
    fn fibonacci_keeps_all_ratios_and_monotonic_prices() {
        let bundle = compute_all("1h", &rising_hourly(120)).unwrap();
        let report = render_report(&bundle);
        let levels = report["Fibonacci Retracement"]["levels"].as_array().unwrap();
        assert_eq!(levels.len(), 7);
        let prices: Vec<f64> = levels.iter().map(|l| l["price"].as_f64().unwrap()).collect();
        for pair in prices.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn oscillators_round_to_four_places() {
        let bundle = compute_all("1h", &rising_hourly(120)).unwrap();
        let report = render_report(&bundle);
        for v in report["Stochastic Oscillator"]["k"].as_array().unwrap() {
            let v = v.as_f64().unwrap();
            let scaled = v * 10_000.0;
            assert!((scaled - scaled.round()).abs() < 1e-6, "not rounded: {v}");
        }
    }

    #[test]
    fn custom_tail_len_applies() {
        let bundle = compute_all("1h", &rising_hourly(120)).unwrap();
        let config = EngineConfig {
            tail_len: 2,
            ..EngineConfig::default()
        };
        let report = render_report_with(&bundle, &config);
        assert_eq!(report["RSI"]["values"].as_array().unwrap().len(), 2);
        assert_eq!(report["Volume Profile"]["levels"].as_array().unwrap().len(), 2);
    }
}
