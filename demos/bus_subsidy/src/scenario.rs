//! Scenario file: sweep settings, policy descriptor and route templates.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use ms_core::SweepConfig;
use ms_flow::RouteFlowTemplate;
use ms_policy::{Policy, PolicySpec};

/// The scenario shipped with the demo.
pub const BUILTIN: &str = include_str!("../scenario.toml");

/// A parsed scenario file.  Every table is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub sweep:  SweepConfig,
    /// Kept raw so that a bad descriptor surfaces as a policy error rather
    /// than a TOML error.
    #[serde(default)]
    pub policy: Option<PolicySpec>,
    #[serde(default)]
    pub routes: Option<RouteFlowTemplate>,
}

impl Scenario {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read scenario {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN).context("invalid built-in scenario")
    }

    /// The configured policy, or [`Policy::default`] when the scenario has
    /// no `[policy]` table.
    pub fn policy(&self) -> Result<Policy> {
        match &self.policy {
            Some(spec) => Ok(Policy::try_from(spec.clone())?),
            None => {
                log::warn!("no [policy] in scenario; using {}", Policy::default().id());
                Ok(Policy::default())
            }
        }
    }
}
