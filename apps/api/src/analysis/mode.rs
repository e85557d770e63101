use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Depth/focus of an analysis. Closed set: each variant owns exactly one prompt
/// template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    #[default]
    QuickScan,
    Detailed,
    AtsOptimization,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 3] = [
        AnalysisMode::QuickScan,
        AnalysisMode::Detailed,
        AnalysisMode::AtsOptimization,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisMode::QuickScan => "quick_scan",
            AnalysisMode::Detailed => "detailed",
            AnalysisMode::AtsOptimization => "ats_optimization",
        }
    }

    /// Human-facing label shown by the front end's mode selector.
    pub fn label(self) -> &'static str {
        match self {
            AnalysisMode::QuickScan => "Quick Scan",
            AnalysisMode::Detailed => "Detailed Analysis",
            AnalysisMode::AtsOptimization => "ATS Optimization",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = AppError;

    /// Accepts the wire name (`quick_scan`) or the selector label (`Quick Scan`),
    /// ignoring case and surrounding whitespace.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        AnalysisMode::ALL
            .into_iter()
            .find(|mode| {
                mode.as_str().eq_ignore_ascii_case(wanted) || mode.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "Unknown analysis mode '{wanted}'. Expected one of: quick_scan, detailed, ats_optimization"
                ))
            })
    }
}
