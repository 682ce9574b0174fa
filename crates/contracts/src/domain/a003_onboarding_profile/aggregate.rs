use serde::{Deserialize, Serialize};

/// Answers collected during company onboarding
/// (`GET/PUT /companies/:id/onboarding-profile`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProfile {
    #[serde(default)]
    pub reporting_frameworks: Vec<String>,
    #[serde(default)]
    pub employee_band: Option<String>,
    #[serde(default)]
    pub revenue_band: Option<String>,
    #[serde(default)]
    pub primary_goal: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl OnboardingProfile {
    pub const FRAMEWORKS: [&'static str; 5] = ["GRI", "CSRD", "SASB", "TCFD", "CDP"];

    /// Deduplicates frameworks and drops names outside the known list
    pub fn normalized(mut self) -> Self {
        let mut seen = Vec::new();
        for framework in self.reporting_frameworks.drain(..) {
            let upper = framework.trim().to_uppercase();
            if Self::FRAMEWORKS.contains(&upper.as_str()) && !seen.contains(&upper) {
                seen.push(upper);
            }
        }
        self.reporting_frameworks = seen;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_frameworks() {
        let profile = OnboardingProfile {
            reporting_frameworks: vec![" gri".into(), "GRI".into(), "xyz".into(), "csrd".into()],
            ..Default::default()
        }
        .normalized();
        assert_eq!(profile.reporting_frameworks, vec!["GRI", "CSRD"]);
    }
}
