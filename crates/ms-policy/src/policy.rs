//! Policy descriptors.
//!
//! A [`Policy`] is validated once at construction and immutable afterwards.
//! On disk it is an internally tagged table:
//!
//! ```toml
//! [policy]
//! id   = "policy_bus_subsidy"
//! type = "logistic"
//! L    = 0.8
//! k    = 0.8
//! x0   = 3
//! ```
//!
//! Deserialization goes through [`PolicySpec`] so that an unknown `type` and a
//! missing parameter both surface as a [`PolicyError`] instead of a generic
//! serde message.

use serde::{Deserialize, Serialize};

use crate::utility::{logit_public, utility, validate_attributes};
use crate::{
    AcceptanceModel, PolicyError, PolicyResult, TripAttributes, UtilityWeights,
    linear_acceptance, logistic_acceptance,
};

// ── PolicyKind ────────────────────────────────────────────────────────────────

/// Shape of the acceptance curve and its parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum PolicyKind {
    /// Same rate every day.
    Constant { base: f64 },

    /// `clamp(base + slope * day, 0, 1)`.
    Linear { base: f64, slope: f64 },

    /// `l / (1 + exp(-k * (day - x0)))`.
    Logistic { l: f64, k: f64, x0: f64 },

    /// Day-independent logit over comparative trip attributes.
    Utility {
        weights: UtilityWeights,
        private: TripAttributes,
        public:  TripAttributes,
    },
}

impl PolicyKind {
    pub fn name(&self) -> &'static str {
        match self {
            PolicyKind::Constant { .. } => "constant",
            PolicyKind::Linear { .. }   => "linear",
            PolicyKind::Logistic { .. } => "logistic",
            PolicyKind::Utility { .. }  => "utility",
        }
    }

    fn validate(&self) -> PolicyResult<()> {
        let finite = |param: &str, value: f64| {
            if value.is_finite() {
                Ok(())
            } else {
                Err(PolicyError::NonFinite { param: param.to_owned(), value })
            }
        };
        match self {
            PolicyKind::Constant { base } => {
                finite("base", *base)?;
                if !(0.0..=1.0).contains(base) {
                    log::warn!("constant policy base {base} is outside [0, 1]; planners will clamp it");
                }
            }
            PolicyKind::Linear { base, slope } => {
                finite("base", *base)?;
                finite("slope", *slope)?;
            }
            PolicyKind::Logistic { l, k, x0 } => {
                finite("L", *l)?;
                finite("k", *k)?;
                finite("x0", *x0)?;
                if !(0.0..=1.0).contains(l) {
                    log::warn!("logistic asymptote L={l} is outside [0, 1]; planners will clamp the rate");
                }
            }
            PolicyKind::Utility { weights, private, public } => {
                weights.validate()?;
                validate_attributes("private", private)?;
                validate_attributes("public", public)?;
                finite("utility(private)", utility(private, weights))?;
                finite("utility(public)", utility(public, weights))?;
            }
        }
        Ok(())
    }
}

// ── Policy ────────────────────────────────────────────────────────────────────

/// A named, validated adoption policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolicySpec", into = "PolicySpec")]
pub struct Policy {
    id:   String,
    kind: PolicyKind,
}

impl Policy {
    /// Validate and build a policy.
    pub fn new(id: impl Into<String>, kind: PolicyKind) -> PolicyResult<Self> {
        let id = id.into();
        if !is_valid_id(&id) {
            return Err(PolicyError::InvalidId(id));
        }
        kind.validate()?;
        Ok(Self { id, kind })
    }

    pub fn constant(id: impl Into<String>, base: f64) -> PolicyResult<Self> {
        Self::new(id, PolicyKind::Constant { base })
    }

    pub fn linear(id: impl Into<String>, base: f64, slope: f64) -> PolicyResult<Self> {
        Self::new(id, PolicyKind::Linear { base, slope })
    }

    pub fn logistic(id: impl Into<String>, l: f64, k: f64, x0: f64) -> PolicyResult<Self> {
        Self::new(id, PolicyKind::Logistic { l, k, x0 })
    }

    pub fn utility(
        id:      impl Into<String>,
        weights: UtilityWeights,
        private: TripAttributes,
        public:  TripAttributes,
    ) -> PolicyResult<Self> {
        Self::new(id, PolicyKind::Utility { weights, private, public })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &PolicyKind {
        &self.kind
    }

    /// Acceptance rate for the 0-based elapsed `day`.
    ///
    /// `linear` is clamped to `[0, 1]`; `constant` and `logistic` return the
    /// raw curve value (in range whenever `base`/`L` are); `utility` ignores
    /// the day.
    pub fn acceptance_rate(&self, day: f64) -> f64 {
        match &self.kind {
            PolicyKind::Constant { base } => *base,
            PolicyKind::Linear { base, slope } => linear_acceptance(*base, *slope, day),
            PolicyKind::Logistic { l, k, x0 } => logistic_acceptance(*l, *k, *x0, day),
            PolicyKind::Utility { weights, private, public } => {
                logit_public(utility(private, weights), utility(public, weights))
            }
        }
    }
}

impl Default for Policy {
    /// Linear growth from 5 % by 5 points a day.
    fn default() -> Self {
        Self {
            id:   "policy_default".to_owned(),
            kind: PolicyKind::Linear { base: 0.05, slope: 0.05 },
        }
    }
}

impl AcceptanceModel for Policy {
    fn policy_id(&self) -> &str {
        &self.id
    }

    fn acceptance_rate(&self, day: f64) -> f64 {
        Policy::acceptance_rate(self, day)
    }
}

/// Policy ids end up in file names, so keep them to a portable character set.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

// ── PolicySpec ────────────────────────────────────────────────────────────────

/// Flat, unvalidated policy descriptor as it appears in a scenario file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySpec {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope: Option<f64>,

    #[serde(rename = "L", default, skip_serializing_if = "Option::is_none")]
    pub l: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x0: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<UtilityWeights>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<TripAttributes>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<TripAttributes>,
}

impl TryFrom<PolicySpec> for Policy {
    type Error = PolicyError;

    fn try_from(spec: PolicySpec) -> PolicyResult<Policy> {
        fn require<T>(value: Option<T>, kind: &'static str, param: &'static str) -> PolicyResult<T> {
            value.ok_or(PolicyError::MissingParameter { kind, param })
        }

        let kind = match spec.kind.trim().to_ascii_lowercase().as_str() {
            "constant" => PolicyKind::Constant {
                base: require(spec.base, "constant", "base")?,
            },
            "linear" => PolicyKind::Linear {
                base:  require(spec.base, "linear", "base")?,
                slope: require(spec.slope, "linear", "slope")?,
            },
            "logistic" => PolicyKind::Logistic {
                l:  require(spec.l, "logistic", "L")?,
                k:  require(spec.k, "logistic", "k")?,
                x0: require(spec.x0, "logistic", "x0")?,
            },
            "utility" => PolicyKind::Utility {
                weights: require(spec.weights, "utility", "weights")?,
                private: require(spec.private, "utility", "private")?,
                public:  require(spec.public, "utility", "public")?,
            },
            _ => return Err(PolicyError::UnknownKind(spec.kind)),
        };
        Policy::new(spec.id, kind)
    }
}

impl From<Policy> for PolicySpec {
    fn from(policy: Policy) -> PolicySpec {
        let mut spec = PolicySpec {
            id:   policy.id,
            kind: policy.kind.name().to_owned(),
            ..PolicySpec::default()
        };
        match policy.kind {
            PolicyKind::Constant { base } => spec.base = Some(base),
            PolicyKind::Linear { base, slope } => {
                spec.base = Some(base);
                spec.slope = Some(slope);
            }
            PolicyKind::Logistic { l, k, x0 } => {
                spec.l = Some(l);
                spec.k = Some(k);
                spec.x0 = Some(x0);
            }
            PolicyKind::Utility { weights, private, public } => {
                spec.weights = Some(weights);
                spec.private = Some(private);
                spec.public = Some(public);
            }
        }
        spec
    }
}
