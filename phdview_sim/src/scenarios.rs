//! Demo scenarios for playback runs.

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// One resident walking a straight line across the home
    Drift,

    /// Two residents passing each other
    Crossing,

    /// One resident, missed detections and clutter firings
    Sparse,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![ScenarioId::Drift, ScenarioId::Crossing, ScenarioId::Sparse]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Drift => "drift",
            ScenarioId::Crossing => "crossing",
            ScenarioId::Sparse => "sparse",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Drift => "Single target drifting corner to corner, nearest sensor fires every step",
            ScenarioId::Crossing => "Two targets on opposing paths, both nearest sensors fire",
            ScenarioId::Sparse => "Single target with 40% detection rate and random clutter firings",
        }
    }

    /// Number of moving targets in the scenario.
    pub fn target_count(&self) -> usize {
        match self {
            ScenarioId::Crossing => 2,
            _ => 1,
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drift" => Ok(ScenarioId::Drift),
            "crossing" | "cross" => Ok(ScenarioId::Crossing),
            "sparse" => Ok(ScenarioId::Sparse),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
