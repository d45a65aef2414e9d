use serde::{Deserialize, Serialize};

/// A single takeover fingerprint as stored in `providers.json`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProviderRecord {
    pub name: String,
    #[serde(rename = "cname")]
    pub cname_signatures: Vec<String>,
    #[serde(rename = "response")]
    pub body_signatures: Vec<String>,
}

impl ProviderRecord {
    pub fn new(name: &str, cname: &[&str], response: &[&str]) -> Self {
        ProviderRecord {
            name: name.to_string(),
            cname_signatures: cname.iter().map(|s| s.to_string()).collect(),
            body_signatures: response.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// True when any of this provider's CNAME signatures occurs inside `cname`.
    pub fn matches_cname(&self, cname: &str) -> bool {
        self.cname_signatures.iter().any(|sig| cname.contains(sig.as_str()))
    }

    /// First body signature contained in `body`, in declaration order.
    pub fn matching_body_signature(&self, body: &str) -> Option<&str> {
        self.body_signatures
            .iter()
            .map(String::as_str)
            .find(|sig| body.contains(sig))
    }
}

/// Outcome of a CNAME lookup. Every failure collapses to `NoCname`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NoCname,
    Cname(String),
}

/// Which providers get their body signatures checked for a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchMode {
    Selective(String),
    Unconditional,
}

impl MatchMode {
    pub fn cname(&self) -> Option<&str> {
        match self {
            MatchMode::Selective(cname) => Some(cname),
            MatchMode::Unconditional => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Finding {
    pub provider: String,
    pub target: String,
    pub cname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    NotVulnerable,
    Vulnerable(Finding),
}

impl Verdict {
    pub fn is_vulnerable(&self) -> bool {
        matches!(self, Verdict::Vulnerable(_))
    }

    pub fn finding(&self) -> Option<&Finding> {
        match self {
            Verdict::Vulnerable(f) => Some(f),
            Verdict::NotVulnerable => None,
        }
    }
}

/// Where a target's pipeline stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// No interesting CNAME and not in unconditional mode; nothing was fetched.
    Skipped,
    FetchFailed,
    Evaluated,
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub target: String,
    pub stage: Stage,
    pub verdict: Verdict,
}
