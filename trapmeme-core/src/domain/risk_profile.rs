//! Risk profile selected by the trader.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Risk appetite chosen for an analysis.
///
/// Accepted and carried through to the result, but nothing in the decision
/// table or the sizing reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RiskProfile {
    #[default]
    Conservative,
    Moderate,
    Aggressive,
    Institutional,
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 4] = [
        Self::Conservative,
        Self::Moderate,
        Self::Aggressive,
        Self::Institutional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Moderate => "Moderate",
            Self::Aggressive => "Aggressive",
            Self::Institutional => "Institutional",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskProfile {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| AnalysisError::UnknownRiskProfile(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("aggressive".parse::<RiskProfile>(), Ok(RiskProfile::Aggressive));
        assert_eq!(" Institutional ".parse::<RiskProfile>(), Ok(RiskProfile::Institutional));
    }

    #[test]
    fn rejects_unknown_profile() {
        let err = "yolo".parse::<RiskProfile>().unwrap_err();
        assert_eq!(err, AnalysisError::UnknownRiskProfile("yolo".into()));
    }

    #[test]
    fn display_matches_parse() {
        for p in RiskProfile::ALL {
            assert_eq!(p.to_string().parse::<RiskProfile>(), Ok(p));
        }
    }
}
