//! Band clamping of raw ensemble output.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::baseline::BaselineCoefficients;
use crate::error::{ModelError, ParamValidationError};
use crate::repr::Forest;

/// Guardrail band settings, in percent of the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailConfig {
    /// Apply the clamp. Default: true.
    pub enabled: bool,
    /// Lower bound as a percent of the baseline. Default: 30.
    pub low_percent: f64,
    /// Upper bound as a percent of the baseline. Default: 170.
    pub high_percent: f64,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self { enabled: true, low_percent: 30.0, high_percent: 170.0 }
    }
}

impl GuardrailConfig {
    /// Guardrail that passes predictions through untouched.
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    /// Validate the band.
    ///
    /// # Errors
    ///
    /// Returns error if either percent is negative or non-finite, or if the
    /// band is inverted.
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        for p in [self.low_percent, self.high_percent] {
            if !p.is_finite() || p < 0.0 {
                return Err(ParamValidationError::InvalidGuardrailPercent(p));
            }
        }
        if self.low_percent > self.high_percent {
            return Err(ParamValidationError::InvertedGuardrailBand {
                low: self.low_percent,
                high: self.high_percent,
            });
        }
        Ok(())
    }

    /// `[baseline·low/100, baseline·high/100]`.
    pub fn band(&self, baseline: f64) -> (f64, f64) {
        (baseline * self.low_percent / 100.0, baseline * self.high_percent / 100.0)
    }
}

/// A prediction after the guardrail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuardedPrediction {
    /// Final value.
    pub value: f64,
    /// Ensemble output before clamping.
    pub raw: f64,
    /// Whether `value` differs from `raw` because of the clamp.
    pub clipped: bool,
    /// Band used, when the guardrail was enabled.
    pub band: Option<(f64, f64)>,
}

impl GuardedPrediction {
    /// Pass-through result.
    pub fn unguarded(raw: f64) -> Self {
        Self { value: raw, raw, clipped: false, band: None }
    }
}

/// Clamp `raw` to the band around `baseline`.
///
/// Values outside the band snap to the nearer bound.
pub fn apply_guardrail(raw: f64, baseline: f64, config: &GuardrailConfig) -> GuardedPrediction {
    if !config.enabled {
        return GuardedPrediction::unguarded(raw);
    }
    let (low, high) = config.band(baseline);
    let value = if raw < low {
        low
    } else if raw > high {
        high
    } else {
        raw
    };
    GuardedPrediction { value, raw, clipped: value != raw, band: Some((low, high)) }
}

/// Predict with `forest` and clamp against the baseline of the raw driver
/// counts.
///
/// # Errors
///
/// `DimensionMismatch` if `x` is too short for a feature some split reads.
pub fn predict_with_guardrail(
    forest: &Forest,
    coefficients: &BaselineCoefficients,
    x: ArrayView1<f64>,
    count_a: f64,
    count_b: f64,
    config: &GuardrailConfig,
) -> Result<GuardedPrediction, ModelError> {
    if let Some(max_feature) = forest.max_feature_index() {
        if x.len() <= max_feature {
            return Err(ModelError::DimensionMismatch {
                op: "guardrail predict",
                left: (1, x.len()),
                right: (1, max_feature + 1),
            });
        }
    }
    let raw = forest.predict_raw(x);
    Ok(apply_guardrail(raw, coefficients.baseline(count_a, count_b), config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::{Node, Tree};
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rstest::rstest;

    #[rstest]
    #[case(5.0, 1.7, true)]
    #[case(1.0, 1.0, false)]
    #[case(0.1, 0.3, true)]
    #[case(1.7, 1.7, false)]
    fn clamps_to_band(#[case] raw: f64, #[case] expected: f64, #[case] clipped: bool) {
        let out = apply_guardrail(raw, 1.0, &GuardrailConfig::default());
        assert_abs_diff_eq!(out.value, expected, epsilon = 1e-12);
        assert_eq!(out.clipped, clipped);
        assert_eq!(out.raw, raw);
        let (low, high) = out.band.unwrap();
        assert_abs_diff_eq!(low, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(high, 1.7, epsilon = 1e-12);
    }

    #[test]
    fn disabled_passes_through() {
        let out = apply_guardrail(5.0, 1.0, &GuardrailConfig::disabled());
        assert_eq!(out, GuardedPrediction::unguarded(5.0));
    }

    #[test]
    fn forest_prediction_is_clamped() {
        let forest = Forest::new(5.0, 0.1);
        let k = BaselineCoefficients::new(0.01, 0.02);
        let out = predict_with_guardrail(
            &forest,
            &k,
            array![0.0].view(),
            100.0,
            50.0,
            &GuardrailConfig::default(),
        )
        .unwrap();
        assert_abs_diff_eq!(out.value, 1.7, epsilon = 1e-12);
        assert!(out.clipped);
    }

    #[test]
    fn short_feature_vector_is_rejected() {
        let tree = Tree::new(Node::split(2, 0.5, Node::leaf(-1.0), Node::leaf(1.0)));
        let forest = Forest::new(1.0, 0.1).with_trees(vec![tree]);
        let k = BaselineCoefficients::new(0.01, 0.02);
        let config = GuardrailConfig::default();

        let err = predict_with_guardrail(&forest, &k, array![0.0, 0.0].view(), 100.0, 50.0, &config);
        assert!(matches!(
            err,
            Err(ModelError::DimensionMismatch { op: "guardrail predict", left: (1, 2), right: (1, 3) })
        ));
        assert!(predict_with_guardrail(&forest, &k, array![0.0, 0.0, 1.0].view(), 100.0, 50.0, &config).is_ok());
    }

    #[rstest]
    #[case(GuardrailConfig { low_percent: -1.0, ..Default::default() }, ParamValidationError::InvalidGuardrailPercent(-1.0))]
    #[case(GuardrailConfig { high_percent: f64::INFINITY, ..Default::default() }, ParamValidationError::InvalidGuardrailPercent(f64::INFINITY))]
    #[case(GuardrailConfig { low_percent: 200.0, ..Default::default() }, ParamValidationError::InvertedGuardrailBand { low: 200.0, high: 170.0 })]
    fn invalid_configs(#[case] config: GuardrailConfig, #[case] expected: ParamValidationError) {
        assert_eq!(config.validate(), Err(expected));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: GuardrailConfig = serde_json::from_str(r#"{"high_percent": 150}"#).unwrap();
        assert!(config.enabled);
        assert_eq!(config.low_percent, 30.0);
        assert_eq!(config.high_percent, 150.0);
    }
}
