//! `SchemaVersion`: a `MAJOR.MINOR.PATCH` semantic version, used by the
//! schema comparator's version-bump suggestion (spec §4.12).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVersion(pub String);

impl fmt::Display for InvalidVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid semantic version '{}'", self.0)
    }
}

impl std::error::Error for InvalidVersion {}

impl SchemaVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    pub fn initial() -> Self {
        Self::new(1, 0, 0)
    }

    pub fn bump_major(self) -> Self {
        Self::new(self.major + 1, 0, 0)
    }

    pub fn bump_minor(self) -> Self {
        Self::new(self.major, self.minor + 1, 0)
    }

    pub fn bump_patch(self) -> Self {
        Self::new(self.major, self.minor, self.patch + 1)
    }
}

impl FromStr for SchemaVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(InvalidVersion(s.to_string()));
        }
        let parse = |p: &str| p.parse::<u32>().map_err(|_| InvalidVersion(s.to_string()));
        Ok(Self {
            major: parse(parts[0])?,
            minor: parse(parts[1])?,
            patch: parse(parts[2])?,
        })
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = InvalidVersion;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchemaVersion> for String {
    fn from(value: SchemaVersion) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_semver() {
        let v: SchemaVersion = "1.2.3".parse().unwrap();
        assert_eq!(v, SchemaVersion::new(1, 2, 3));
    }

    #[test]
    fn rejects_malformed_version() {
        assert!("1.2".parse::<SchemaVersion>().is_err());
        assert!("a.b.c".parse::<SchemaVersion>().is_err());
    }

    #[test]
    fn bump_major_resets_minor_and_patch() {
        let v = SchemaVersion::new(1, 2, 3).bump_major();
        assert_eq!(v, SchemaVersion::new(2, 0, 0));
    }

    #[test]
    fn bump_minor_resets_patch_only() {
        let v = SchemaVersion::new(1, 2, 3).bump_minor();
        assert_eq!(v, SchemaVersion::new(1, 3, 0));
    }

    #[test]
    fn display_roundtrip() {
        let v = SchemaVersion::new(2, 0, 0);
        assert_eq!(v.to_string(), "2.0.0");
    }
}
