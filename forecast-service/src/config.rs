// Forecasting configuration: typed defaults with env-JSON override merge
use crate::error::{ForecastError, ForecastResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Assumed collectable fraction of each AR aging bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryCurve {
    pub current: Decimal,
    #[serde(rename = "30")]
    pub days30: Decimal,
    #[serde(rename = "60")]
    pub days60: Decimal,
    #[serde(rename = "90")]
    pub days90: Decimal,
}

impl Default for RecoveryCurve {
    fn default() -> Self {
        Self {
            current: Decimal::new(70, 2),
            days30: Decimal::new(25, 2),
            days60: Decimal::new(10, 2),
            days90: Decimal::new(5, 2),
        }
    }
}

/// Relative trust in the invoice/aging base versus the historical
/// velocity signal when both are present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendWeights {
    pub invoices_or_aging: Decimal,
    pub history: Decimal,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            invoices_or_aging: Decimal::new(70, 2),
            history: Decimal::new(30, 2),
        }
    }
}

/// Partial recovery-curve override, merged field-wise over the defaults.
#[derive(Debug, Default, Deserialize)]
struct RecoveryCurveOverride {
    current: Option<f64>,
    #[serde(rename = "30")]
    days30: Option<f64>,
    #[serde(rename = "60")]
    days60: Option<f64>,
    #[serde(rename = "90")]
    days90: Option<f64>,
}

/// Partial blend override, merged field-wise over the defaults.
#[derive(Debug, Default, Deserialize)]
struct BlendOverride {
    invoices_or_aging: Option<f64>,
    history: Option<f64>,
}

/// Service configuration, built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub recovery_curve: RecoveryCurve,
    pub blend: BlendWeights,
    pub query_timeout_ms: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            recovery_curve: RecoveryCurve::default(),
            blend: BlendWeights::default(),
            query_timeout_ms: 30_000,
        }
    }
}

impl ForecastConfig {
    /// Read overrides from the environment (`RECOVERY_CURVE` and
    /// `CASH_BLEND` as JSON blobs, `QUERY_TIMEOUT_MS` as an integer) and
    /// merge them over the defaults. Validates once here, never per call.
    pub fn from_env() -> ForecastResult<Self> {
        Self::from_sources(
            std::env::var("RECOVERY_CURVE").ok().as_deref(),
            std::env::var("CASH_BLEND").ok().as_deref(),
            std::env::var("QUERY_TIMEOUT_MS").ok().as_deref(),
        )
    }

    /// Merge the given override sources over the defaults.
    pub fn from_sources(
        curve_json: Option<&str>,
        blend_json: Option<&str>,
        timeout_ms: Option<&str>,
    ) -> ForecastResult<Self> {
        let mut config = Self::default();

        if let Some(raw) = curve_json {
            let patch: RecoveryCurveOverride = serde_json::from_str(raw)
                .map_err(|e| ForecastError::Config(format!("RECOVERY_CURVE: {e}")))?;
            if let Some(v) = patch.current {
                config.recovery_curve.current = weight("RECOVERY_CURVE.current", v)?;
            }
            if let Some(v) = patch.days30 {
                config.recovery_curve.days30 = weight("RECOVERY_CURVE.30", v)?;
            }
            if let Some(v) = patch.days60 {
                config.recovery_curve.days60 = weight("RECOVERY_CURVE.60", v)?;
            }
            if let Some(v) = patch.days90 {
                config.recovery_curve.days90 = weight("RECOVERY_CURVE.90", v)?;
            }
        }

        if let Some(raw) = blend_json {
            let patch: BlendOverride = serde_json::from_str(raw)
                .map_err(|e| ForecastError::Config(format!("CASH_BLEND: {e}")))?;
            if let Some(v) = patch.invoices_or_aging {
                config.blend.invoices_or_aging = weight("CASH_BLEND.invoices_or_aging", v)?;
            }
            if let Some(v) = patch.history {
                config.blend.history = weight("CASH_BLEND.history", v)?;
            }
        }

        if let Some(raw) = timeout_ms {
            config.query_timeout_ms = raw
                .trim()
                .parse()
                .map_err(|_| ForecastError::Config(format!("QUERY_TIMEOUT_MS: {raw:?} is not an integer")))?;
        }

        if config.query_timeout_ms == 0 {
            return Err(ForecastError::Config(
                "QUERY_TIMEOUT_MS must be non-zero".into(),
            ));
        }

        Ok(config)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

/// Convert one override weight, rejecting anything outside [0, 1].
fn weight(name: &str, value: f64) -> ForecastResult<Decimal> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ForecastError::Config(format!(
            "{name}: {value} is not a weight in [0, 1]"
        )));
    }
    Decimal::try_from(value).map_err(|e| ForecastError::Config(format!("{name}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_curve_and_blend() {
        let config = ForecastConfig::default();
        assert_eq!(config.recovery_curve.current, Decimal::new(70, 2));
        assert_eq!(config.recovery_curve.days30, Decimal::new(25, 2));
        assert_eq!(config.recovery_curve.days60, Decimal::new(10, 2));
        assert_eq!(config.recovery_curve.days90, Decimal::new(5, 2));
        assert_eq!(config.blend.invoices_or_aging, Decimal::new(70, 2));
        assert_eq!(config.blend.history, Decimal::new(30, 2));
        assert_eq!(config.query_timeout_ms, 30_000);
    }

    #[test]
    fn partial_curve_override_touches_only_named_buckets() {
        let config = ForecastConfig::from_sources(Some(r#"{"30": 0.5}"#), None, None).unwrap();
        assert_eq!(config.recovery_curve.days30, Decimal::new(5, 1));
        assert_eq!(config.recovery_curve.current, Decimal::new(70, 2));
        assert_eq!(config.recovery_curve.days90, Decimal::new(5, 2));
    }

    #[test]
    fn partial_blend_override_keeps_other_weight() {
        let config = ForecastConfig::from_sources(None, Some(r#"{"history": 0.4}"#), None).unwrap();
        assert_eq!(config.blend.history, Decimal::new(4, 1));
        assert_eq!(config.blend.invoices_or_aging, Decimal::new(70, 2));
    }

    #[test]
    fn timeout_override_parses_plain_integer() {
        let config = ForecastConfig::from_sources(None, None, Some("5000")).unwrap();
        assert_eq!(config.query_timeout_ms, 5_000);
    }

    #[test]
    fn out_of_range_weight_is_a_config_error() {
        assert!(ForecastConfig::from_sources(Some(r#"{"current": 1.5}"#), None, None).is_err());
        assert!(ForecastConfig::from_sources(None, Some(r#"{"history": -0.1}"#), None).is_err());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(ForecastConfig::from_sources(Some("{not json"), None, None).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(ForecastConfig::from_sources(None, None, Some("0")).is_err());
    }
}
