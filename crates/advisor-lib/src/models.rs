//! Core data models for the parameter advisor

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AdvisorError;

/// Hardware sizing of the target server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizingInput {
    pub cpu_count: u32,
    pub memory_gb: u32,
}

impl SizingInput {
    /// Build a sizing from raw (possibly user supplied) integers
    pub fn new(cpu_count: i64, memory_gb: i64) -> Result<Self, AdvisorError> {
        let cpu_count = positive("cpu_count", cpu_count)?;
        let memory_gb = positive("memory_gb", memory_gb)?;
        Ok(Self {
            cpu_count,
            memory_gb,
        })
    }

    /// Memory expressed in MB
    pub fn memory_mb(&self) -> u64 {
        u64::from(self.memory_gb) * 1024
    }
}

fn positive(field: &str, value: i64) -> Result<u32, AdvisorError> {
    if value <= 0 {
        return Err(AdvisorError::InvalidInput(format!(
            "{} must be positive, got {}",
            field, value
        )));
    }
    u32::try_from(value)
        .map_err(|_| AdvisorError::InvalidInput(format!("{} is out of range: {}", field, value)))
}

/// Declared workload character of the database
///
/// Deserialization goes through [`FromStr`], so any casing is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum WorkloadRole {
    #[serde(rename = "OLTP")]
    Oltp,
    #[serde(rename = "OLAP")]
    Olap,
    #[serde(rename = "RAG")]
    Rag,
    #[serde(rename = "Mixed")]
    Mixed,
}

impl WorkloadRole {
    pub const ALL: [WorkloadRole; 4] = [
        WorkloadRole::Oltp,
        WorkloadRole::Olap,
        WorkloadRole::Rag,
        WorkloadRole::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadRole::Oltp => "OLTP",
            WorkloadRole::Olap => "OLAP",
            WorkloadRole::Rag => "RAG",
            WorkloadRole::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for WorkloadRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkloadRole {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oltp" => Ok(WorkloadRole::Oltp),
            "olap" => Ok(WorkloadRole::Olap),
            "rag" => Ok(WorkloadRole::Rag),
            "mixed" => Ok(WorkloadRole::Mixed),
            other => Err(AdvisorError::InvalidInput(format!(
                "unknown workload role '{}', expected one of OLTP, OLAP, RAG, Mixed",
                other
            ))),
        }
    }
}

impl TryFrom<String> for WorkloadRole {
    type Error = AdvisorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Aggressiveness tier of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Profile {
    Conservative,
    Balanced,
    Aggressive,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Conservative, Profile::Balanced, Profile::Aggressive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Conservative => "conservative",
            Profile::Balanced => "balanced",
            Profile::Aggressive => "aggressive",
        }
    }

    /// Capitalized label used in table and CSV headers
    pub fn label(&self) -> &'static str {
        match self {
            Profile::Conservative => "Conservative",
            Profile::Balanced => "Balanced",
            Profile::Aggressive => "Aggressive",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(Profile::Conservative),
            "balanced" => Ok(Profile::Balanced),
            "aggressive" => Ok(Profile::Aggressive),
            other => Err(AdvisorError::InvalidInput(format!(
                "unknown profile '{}', expected conservative, balanced or aggressive",
                other
            ))),
        }
    }
}

impl TryFrom<String> for Profile {
    type Error = AdvisorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Whether changing a parameter needs a server restart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyType {
    /// Requires a restart
    Static,
    /// Applied on reload
    Dynamic,
}

impl fmt::Display for ApplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyType::Static => write!(f, "static"),
            ApplyType::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// A single recommended parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamValue {
    pub name: String,
    pub value: String,
    pub apply_type: ApplyType,
}

/// Ordered parameter name to value mapping for one profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamMap {
    entries: Vec<ParamValue>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ParamValue) {
        self.entries.push(entry);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Formatted value of a parameter, if present
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|e| e.value.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParamValue> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ParamMap {
    type Item = &'a ParamValue;
    type IntoIter = std::slice::Iter<'a, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The three profiles computed for one sizing and role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub conservative: ParamMap,
    pub balanced: ParamMap,
    pub aggressive: ParamMap,
}

impl Recommendation {
    pub fn profile(&self, profile: Profile) -> &ParamMap {
        match profile {
            Profile::Conservative => &self.conservative,
            Profile::Balanced => &self.balanced,
            Profile::Aggressive => &self.aggressive,
        }
    }

    /// Profiles in conservative, balanced, aggressive order
    pub fn iter(&self) -> impl Iterator<Item = (Profile, &ParamMap)> {
        Profile::ALL.into_iter().map(move |p| (p, self.profile(p)))
    }
}

/// Identity of whoever asked for a recommendation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Requester {
    pub fn new(ticket_id: Option<String>, email: Option<String>) -> Self {
        Self { ticket_id, email }
    }

    /// Short form for log lines
    pub fn display_name(&self) -> String {
        match (&self.ticket_id, &self.email) {
            (Some(t), Some(e)) => format!("{} ({})", e, t),
            (None, Some(e)) => e.clone(),
            (Some(t), None) => t.clone(),
            (None, None) => "anonymous".to_string(),
        }
    }
}
