//! Enumerations shared by the Supabase bindings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an edge function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "REMOVED")]
    Removed,
    #[serde(rename = "THROTTLED")]
    Throttled,
}

impl FunctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionStatus::Active => "ACTIVE",
            FunctionStatus::Removed => "REMOVED",
            FunctionStatus::Throttled => "THROTTLED",
        }
    }

    pub fn values() -> &'static [&'static str] {
        &["ACTIVE", "REMOVED", "THROTTLED"]
    }
}

impl fmt::Display for FunctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing plan of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
        }
    }

    pub fn values() -> &'static [&'static str] {
        &["free", "pro"]
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Region a project is hosted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "us-east-1")]
    UsEast1,
    #[serde(rename = "us-west-1")]
    UsWest1,
    #[serde(rename = "ca-central-1")]
    CaCentral1,
    #[serde(rename = "sa-east-1")]
    SaEast1,
    #[serde(rename = "eu-west-1")]
    EuWest1,
    #[serde(rename = "eu-west-2")]
    EuWest2,
    #[serde(rename = "eu-central-1")]
    EuCentral1,
    #[serde(rename = "ap-south-1")]
    ApSouth1,
    #[serde(rename = "ap-southeast-1")]
    ApSoutheast1,
    #[serde(rename = "ap-southeast-2")]
    ApSoutheast2,
    #[serde(rename = "ap-northeast-1")]
    ApNortheast1,
    #[serde(rename = "ap-northeast-2")]
    ApNortheast2,
}

const REGIONS: [(Region, &str); 12] = [
    (Region::UsEast1, "us-east-1"),
    (Region::UsWest1, "us-west-1"),
    (Region::CaCentral1, "ca-central-1"),
    (Region::SaEast1, "sa-east-1"),
    (Region::EuWest1, "eu-west-1"),
    (Region::EuWest2, "eu-west-2"),
    (Region::EuCentral1, "eu-central-1"),
    (Region::ApSouth1, "ap-south-1"),
    (Region::ApSoutheast1, "ap-southeast-1"),
    (Region::ApSoutheast2, "ap-southeast-2"),
    (Region::ApNortheast1, "ap-northeast-1"),
    (Region::ApNortheast2, "ap-northeast-2"),
];

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::UsEast1 => "us-east-1",
            Region::UsWest1 => "us-west-1",
            Region::CaCentral1 => "ca-central-1",
            Region::SaEast1 => "sa-east-1",
            Region::EuWest1 => "eu-west-1",
            Region::EuWest2 => "eu-west-2",
            Region::EuCentral1 => "eu-central-1",
            Region::ApSouth1 => "ap-south-1",
            Region::ApSoutheast1 => "ap-southeast-1",
            Region::ApSoutheast2 => "ap-southeast-2",
            Region::ApNortheast1 => "ap-northeast-1",
            Region::ApNortheast2 => "ap-northeast-2",
        }
    }

    pub fn values() -> Vec<&'static str> {
        REGIONS.iter().map(|(_, name)| *name).collect()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn function_status_uses_upper_case_wire_values() {
        assert_eq!(
            serde_json::to_string(&FunctionStatus::Throttled).unwrap(),
            "\"THROTTLED\""
        );
        let status: FunctionStatus = serde_json::from_str("\"ACTIVE\"").unwrap();
        assert_eq!(status, FunctionStatus::Active);
        assert!(serde_json::from_str::<FunctionStatus>("\"active\"").is_err());
    }

    #[test]
    fn region_names_match_serde_names() {
        for (region, name) in REGIONS {
            assert_eq!(
                serde_json::to_string(&region).unwrap(),
                format!("\"{}\"", name)
            );
            assert_eq!(region.to_string(), name);
        }
    }

    #[test]
    fn plan_is_lower_case() {
        assert_eq!(Plan::Pro.to_string(), "pro");
        let plan: Plan = serde_json::from_str("\"free\"").unwrap();
        assert_eq!(plan, Plan::Free);
    }
}
