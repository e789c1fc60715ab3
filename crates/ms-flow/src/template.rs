//! Route templates: reusable path + window + share definitions.
//!
//! A scenario declares two disjoint groups of templates, one per
//! [`TravelMode`].  Each template becomes at most one flow per day.
//!
//! ```toml
//! [[routes.private]]
//! id    = "flow_0"
//! edges = "A4B4 B4C4 C4D4"
//! begin = 0
//! end   = 86400
//! share = 1.0
//! ```

use std::collections::HashSet;

use serde::Deserialize;

use ms_core::{SECONDS_PER_DAY, TimeWindow, TravelMode};

use crate::{FlowError, FlowResult};

// ── RouteTemplate ─────────────────────────────────────────────────────────────

/// One route and the fraction of its mode's population that takes it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "RouteTemplateSpec")]
pub struct RouteTemplate {
    /// Flow id; the route is declared as `r_{id}`.
    pub id:     String,
    /// Ordered edge ids of the path.
    pub edges:  Vec<String>,
    /// Emission window in seconds.
    pub window: TimeWindow,
    /// Fraction of the mode population, in `(0, 1]`.
    pub share:  f64,
}

impl RouteTemplate {
    /// Build and validate a template.
    pub fn new(
        id:     impl Into<String>,
        edges:  Vec<String>,
        window: TimeWindow,
        share:  f64,
    ) -> FlowResult<Self> {
        let template = Self { id: id.into(), edges, window, share };
        template.validate()?;
        Ok(template)
    }

    /// Same as [`new`][Self::new] with the edges given as a whitespace
    /// separated list, the way network editors print paths.
    pub fn from_path(id: impl Into<String>, path: &str, window: TimeWindow, share: f64) -> FlowResult<Self> {
        Self::new(id, split_edges(path), window, share)
    }

    /// Id of the `<route>` this template declares.
    pub fn route_id(&self) -> String {
        format!("r_{}", self.id)
    }

    fn validate(&self) -> FlowResult<()> {
        if self.id.is_empty() || self.id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(FlowError::InvalidTemplate(format!(
                "route id {:?} must be non-empty and contain no whitespace",
                self.id
            )));
        }
        if self.edges.is_empty() {
            return Err(FlowError::InvalidTemplate(format!("route {:?} has no edges", self.id)));
        }
        if !self.window.is_valid() {
            return Err(FlowError::InvalidTemplate(format!(
                "route {:?} has invalid time window {}",
                self.id, self.window
            )));
        }
        if !(self.share.is_finite() && self.share > 0.0 && self.share <= 1.0) {
            return Err(FlowError::InvalidTemplate(format!(
                "route {:?} share {} must be in (0, 1]",
                self.id, self.share
            )));
        }
        Ok(())
    }
}

pub(crate) fn split_edges(path: &str) -> Vec<String> {
    path.split_whitespace().map(str::to_owned).collect()
}

fn default_end() -> f64 {
    SECONDS_PER_DAY
}

/// On-disk form of a template.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RouteTemplateSpec {
    id:    String,
    edges: EdgeList,
    #[serde(default)]
    begin: f64,
    #[serde(default = "default_end")]
    end:   f64,
    share: f64,
}

/// Edges may be written as one space-separated string or as an array.
#[derive(Deserialize)]
#[serde(untagged)]
enum EdgeList {
    Path(String),
    List(Vec<String>),
}

impl TryFrom<RouteTemplateSpec> for RouteTemplate {
    type Error = FlowError;

    fn try_from(spec: RouteTemplateSpec) -> FlowResult<Self> {
        let edges = match spec.edges {
            EdgeList::Path(p) => split_edges(&p),
            EdgeList::List(l) => l,
        };
        RouteTemplate::new(spec.id, edges, TimeWindow::new(spec.begin, spec.end), spec.share)
    }
}

// ── RouteFlowTemplate ─────────────────────────────────────────────────────────

/// All route templates of a scenario, partitioned by mode.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "RouteFlowTemplateSpec")]
pub struct RouteFlowTemplate {
    private: Vec<RouteTemplate>,
    public:  Vec<RouteTemplate>,
}

impl RouteFlowTemplate {
    /// Build the partition, rejecting ids that appear more than once across
    /// both groups (they would collide as flow ids in one routes file).
    pub fn new(private: Vec<RouteTemplate>, public: Vec<RouteTemplate>) -> FlowResult<Self> {
        let mut seen = HashSet::new();
        for t in private.iter().chain(&public) {
            if !seen.insert(t.id.as_str()) {
                return Err(FlowError::InvalidTemplate(format!("duplicate route id {:?}", t.id)));
            }
        }
        let template = Self { private, public };
        for mode in TravelMode::ALL {
            let total = template.share_total(mode);
            if total > 1.0 + 1e-9 {
                log::warn!(
                    "{mode} route shares sum to {total:.3}; vehicle counts will be scaled down to the {mode} population"
                );
            }
        }
        Ok(template)
    }

    /// Templates of one mode, in declaration order.
    pub fn group(&self, mode: TravelMode) -> &[RouteTemplate] {
        match mode {
            TravelMode::Private => &self.private,
            TravelMode::Public  => &self.public,
        }
    }

    /// Every template with its mode: private group first, then public.
    pub fn iter(&self) -> impl Iterator<Item = (TravelMode, &RouteTemplate)> {
        TravelMode::ALL
            .into_iter()
            .flat_map(move |mode| self.group(mode).iter().map(move |t| (mode, t)))
    }

    /// Sum of shares in one mode group.
    pub fn share_total(&self, mode: TravelMode) -> f64 {
        self.group(mode).iter().map(|t| t.share).sum()
    }

    pub fn len(&self) -> usize {
        self.private.len() + self.public.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RouteFlowTemplateSpec {
    #[serde(default)]
    private: Vec<RouteTemplate>,
    #[serde(default)]
    public:  Vec<RouteTemplate>,
}

impl TryFrom<RouteFlowTemplateSpec> for RouteFlowTemplate {
    type Error = FlowError;

    fn try_from(spec: RouteFlowTemplateSpec) -> FlowResult<Self> {
        RouteFlowTemplate::new(spec.private, spec.public)
    }
}
