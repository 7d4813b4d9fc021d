//! The closed set of variables a chart axis can show

use std::fmt;

use serde::{Deserialize, Serialize};

/// Axis variables for the bubble chart. The Y axis is fixed to
/// [`AxisVar::TotalMedals`]; the X axis picker offers the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisVar {
    AthleteCount,
    Population,
    LandArea,
    TotalMedals,
}

impl AxisVar {
    pub const ALL: [AxisVar; 4] = [
        AxisVar::AthleteCount,
        AxisVar::Population,
        AxisVar::LandArea,
        AxisVar::TotalMedals,
    ];

    /// Variables offered by the X-axis picker (everything except the
    /// fixed Y variable).
    pub const X_OPTIONS: [AxisVar; 3] = [
        AxisVar::AthleteCount,
        AxisVar::Population,
        AxisVar::LandArea,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AxisVar::AthleteCount => "Athlete Count",
            AxisVar::Population => "Population",
            AxisVar::LandArea => "Land Area",
            AxisVar::TotalMedals => "Total Medals",
        }
    }
}

impl fmt::Display for AxisVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
