//! Named severity profiles.
//!
//! `basic` is the fast offline pass run on every pull request; `strict`
//! additionally probes the live servers and insists on complete
//! metadata.

use index_common::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Basic,
    Strict,
}

impl Profile {
    /// Whether network-backed checks run at all.
    pub fn online(&self) -> bool {
        matches!(self, Profile::Strict)
    }

    /// Severity of a missing license/attribution/privacy-policy/category
    /// field. `None` means the gap is only logged, not collected.
    pub fn missing_field_severity(&self) -> Option<Severity> {
        match self {
            Profile::Basic => None,
            Profile::Strict => Some(Severity::Error),
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Profile::Basic),
            "strict" => Ok(Profile::Strict),
            other => Err(format!("unknown profile '{other}', expected basic or strict")),
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::Basic => write!(f, "basic"),
            Profile::Strict => write!(f, "strict"),
        }
    }
}
