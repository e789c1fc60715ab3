//! The two travel modes a route template can belong to.

/// Which population share a flow draws its vehicles from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// Private vehicles; drawn from the population that rejects the policy.
    Private,
    /// Public transport; drawn from the accepting population.
    Public,
}

impl TravelMode {
    pub const ALL: [TravelMode; 2] = [TravelMode::Private, TravelMode::Public];

    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Private => "private",
            TravelMode::Public  => "public",
        }
    }

    /// Id of the vehicle type flows of this mode are emitted with.
    pub fn default_vehicle_type(self) -> &'static str {
        match self {
            TravelMode::Private => "car",
            TravelMode::Public  => "bus",
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TravelMode {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "private" => Ok(TravelMode::Private),
            "public"  => Ok(TravelMode::Public),
            other => Err(crate::CoreError::Parse(format!(
                "invalid travel mode {other:?}: expected \"private\" or \"public\""
            ))),
        }
    }
}
