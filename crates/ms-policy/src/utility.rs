//! Attribute-driven mode choice: a two-alternative logit.
//!
//! ```text
//! u_m      = Σ weight[a] * value[a, m]        for m ∈ {private, public}
//! p_public = exp(u_pub - u_max) / (exp(u_priv - u_max) + exp(u_pub - u_max))
//! ```
//!
//! Subtracting `u_max` keeps both exponents ≤ 0, so large utility magnitudes
//! never overflow.  Adding the same constant to both utilities leaves the
//! probability unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{PolicyError, PolicyResult};

/// Attribute names a weight may refer to.
pub const ATTRIBUTES: [&str; 3] = ["time", "cost", "pollution"];

/// Comparable trip attributes of one mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TripAttributes {
    pub time:      f64,
    pub cost:      f64,
    pub pollution: f64,
}

impl TripAttributes {
    pub fn new(time: f64, cost: f64, pollution: f64) -> Self {
        Self { time, cost, pollution }
    }

    /// Value of a named attribute; unknown names contribute nothing.
    pub fn get(&self, attribute: &str) -> f64 {
        match attribute {
            "time"      => self.time,
            "cost"      => self.cost,
            "pollution" => self.pollution,
            _           => 0.0,
        }
    }

    fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        ATTRIBUTES
            .iter()
            .map(|&a| (a, self.get(a)))
            .find(|(_, v)| !v.is_finite())
    }
}

/// Per-attribute weights.  A missing attribute has weight 0.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UtilityWeights(BTreeMap<String, f64>);

impl UtilityWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, attribute: impl Into<String>, weight: f64) -> Self {
        self.0.insert(attribute.into(), weight);
        self
    }

    /// Weight for `attribute`, 0 if absent.
    pub fn get(&self, attribute: &str) -> f64 {
        self.0.get(attribute).copied().unwrap_or(0.0)
    }

    /// Reject weights for attributes that do not exist and non-finite values.
    pub fn validate(&self) -> PolicyResult<()> {
        for (name, &weight) in &self.0 {
            if !ATTRIBUTES.contains(&name.as_str()) {
                return Err(PolicyError::UnknownAttribute(name.clone()));
            }
            if !weight.is_finite() {
                return Err(PolicyError::NonFinite { param: format!("weights.{name}"), value: weight });
            }
        }
        Ok(())
    }
}

/// Linear utility of one mode.
pub fn utility(attrs: &TripAttributes, weights: &UtilityWeights) -> f64 {
    ATTRIBUTES.iter().map(|&a| weights.get(a) * attrs.get(a)).sum()
}

/// Probability of choosing public transport under a two-mode logit.
///
/// Strictly inside (0, 1) for finite utilities whose difference stays within
/// the `f64` exponent range; saturates to exactly 0 or 1 beyond it.
pub fn probability_public(
    private: &TripAttributes,
    public:  &TripAttributes,
    weights: &UtilityWeights,
) -> f64 {
    logit_public(utility(private, weights), utility(public, weights))
}

/// The logit step on precomputed utilities, shifted by the larger one.
pub(crate) fn logit_public(u_private: f64, u_public: f64) -> f64 {
    let max_u = u_private.max(u_public);
    let exp_private = (u_private - max_u).exp();
    let exp_public = (u_public - max_u).exp();
    exp_public / (exp_private + exp_public)
}

pub(crate) fn validate_attributes(side: &'static str, attrs: &TripAttributes) -> PolicyResult<()> {
    match attrs.first_non_finite() {
        Some((name, value)) => Err(PolicyError::NonFinite { param: format!("{side}.{name}"), value }),
        None => Ok(()),
    }
}
