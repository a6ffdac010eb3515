//! Search and activity filtering for the lead table.

use std::fmt;
use std::str::FromStr;

use api::Lead;
use serde::{Deserialize, Serialize};

/// Which leads to show by activity status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityFilter {
    All,
    #[default]
    Active,
    Inactive,
}

impl ActivityFilter {
    pub const ALL: [ActivityFilter; 3] = [
        ActivityFilter::All,
        ActivityFilter::Active,
        ActivityFilter::Inactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityFilter::All => "all",
            ActivityFilter::Active => "active",
            ActivityFilter::Inactive => "inactive",
        }
    }

    /// Label for the filter dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityFilter::All => "All Leads",
            ActivityFilter::Active => "Active Leads",
            ActivityFilter::Inactive => "Inactive Leads",
        }
    }

    pub fn matches(&self, is_active: bool) -> bool {
        match self {
            ActivityFilter::All => true,
            ActivityFilter::Active => is_active,
            ActivityFilter::Inactive => !is_active,
        }
    }
}

impl fmt::Display for ActivityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ActivityFilter::All),
            "active" => Ok(ActivityFilter::Active),
            "inactive" => Ok(ActivityFilter::Inactive),
            other => Err(format!("Unknown activity filter: {other}")),
        }
    }
}

/// Leads whose name contains `search` (case-insensitive) and whose status
/// matches `filter`, in their original order.
pub fn filter_leads<'a>(leads: &'a [Lead], search: &str, filter: ActivityFilter) -> Vec<&'a Lead> {
    let needle = search.to_lowercase();
    leads
        .iter()
        .filter(|lead| filter.matches(lead.is_active))
        .filter(|lead| lead.name.to_lowercase().contains(&needle))
        .collect()
}
