//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Server-side identifier of a budget category.
pub type NodeId = i64;

/// Total every sibling group must add up to.
pub const FULL_ALLOCATION: f64 = 100.0;

/// A budget category as delivered by the tree API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: NodeId,
    /// `None` only for the root of the tree
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    pub name: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub description: Option<String>,
    /// Percentage share of the parent, in `[0, 100]`
    #[serde(rename = "budget_allocation", with = "allocation_wire")]
    pub allocation: f64,
}

impl CategoryNode {
    pub fn new(
        id: NodeId,
        parent_id: Option<NodeId>,
        name: impl Into<String>,
        allocation: f64,
    ) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            description: None,
            allocation,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }
}

/// One step of the root-to-current navigation chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub id: NodeId,
    pub name: String,
}

/// Authentication state reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub logged_in: bool,
    #[serde(default)]
    pub username: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(name: impl Into<String>) -> Self {
        Self {
            logged_in: true,
            username: Some(name.into()),
        }
    }
}

/// Participation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(rename = "total_participants")]
    pub participants: u64,
    #[serde(rename = "total_votes")]
    pub votes: u64,
}

impl Stats {
    /// Single status line for the stats bar.
    pub fn summary(&self) -> String {
        if self.participants > 0 {
            format!(
                "{} participant(s) · {} allocation(s)",
                self.participants, self.votes
            )
        } else {
            "No allocations yet — be the first!".to_string()
        }
    }
}

/// Whether the current view is read-only or accepts redistribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    View,
    Edit,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::View => "view",
            Mode::Edit => "edit",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Parse a percentage typed into a legend field.
pub fn parse_allocation(raw: &str) -> Result<f64, DomainError> {
    let trimmed = raw.trim().trim_end_matches('%').trim_end();
    match trimmed.parse::<f64>() {
        Ok(v) if !v.is_nan() => Ok(v),
        _ => Err(DomainError::InvalidAllocation(raw.to_string())),
    }
}

/// Okabe-Ito accessible palette, cycled over sibling slices.
pub const A11Y_COLORS: [&str; 12] = [
    "#E69F00", "#56B4E9", "#009E73", "#F0E442", "#0072B2", "#D55E00", "#CC79A7", "#999999",
    "#1B9E77", "#D95F02", "#7570B3", "#E7298A",
];

/// Colour assigned to the slice at `index`.
pub fn slice_color(index: usize) -> &'static str {
    A11Y_COLORS[index % A11Y_COLORS.len()]
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// The server stores allocations as fixed-point decimals and sends them as
/// strings (`"25.00"`); older endpoints send plain numbers.
mod allocation_wire {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:.2}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Wire::deserialize(deserializer)? {
            Wire::Number(n) => Ok(n),
            Wire::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| D::Error::custom(format!("invalid budget_allocation {s:?}: {e}"))),
        }
    }
}
