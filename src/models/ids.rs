//! Numeric identifiers assigned by the points backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a nation (competing group).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NationId(u64);

impl NationId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NationId({})", self.0)
    }
}

impl From<u64> for NationId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of the organizational address (branch) whose records are loaded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(u64);

impl ScopeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

impl From<u64> for ScopeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nation_id_display() {
        assert_eq!(format!("{}", NationId::new(7)), "7");
    }

    #[test]
    fn test_nation_id_debug() {
        let debug_str = format!("{:?}", NationId::from(3));
        assert!(debug_str.contains("NationId(3)"));
    }

    #[test]
    fn test_nation_id_serializes_as_number() {
        let json = serde_json::to_string(&NationId::new(42)).unwrap();
        assert_eq!(json, "42");
        let parsed: NationId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, NationId::new(42));
    }

    #[test]
    fn test_scope_id_display() {
        assert_eq!(ScopeId::from(12).to_string(), "12");
        assert_eq!(ScopeId::new(12).get(), 12);
    }
}
