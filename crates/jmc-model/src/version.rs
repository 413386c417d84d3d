//! Layout document format versions (`jus`)

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Layout document format version, written as `"major.minor"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JusVersion {
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
}

impl JusVersion {
    /// Format used by documents that carry no `jus` tag
    pub const LEGACY: Self = Self::new(1, 0);

    /// Format written by this tool
    pub const CURRENT: Self = Self::new(2, 0);

    /// Create a version
    #[inline]
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Resolve an optional `jus` tag; absence means [`JusVersion::LEGACY`]
    ///
    /// # Errors
    /// Returns error if the tag is not of the form `"major.minor"`
    pub fn from_tag(tag: Option<&str>) -> Result<Self, VersionParseError> {
        tag.map_or(Ok(Self::LEGACY), str::parse)
    }
}

impl Display for JusVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for JusVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || VersionParseError(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(malformed)?;
        let major = major.parse::<u32>().map_err(|_| malformed())?;
        let minor = minor.parse::<u32>().map_err(|_| malformed())?;
        Ok(Self::new(major, minor))
    }
}

/// A `jus` tag that is not `"major.minor"`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed version tag '{0}' (expected \"major.minor\")")]
pub struct VersionParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_versions() {
        assert_eq!("1.0".parse::<JusVersion>(), Ok(JusVersion::LEGACY));
        assert_eq!("2.0".parse::<JusVersion>(), Ok(JusVersion::CURRENT));
        assert_eq!("3.12".parse::<JusVersion>(), Ok(JusVersion::new(3, 12)));
    }

    #[test]
    fn reject_malformed() {
        for tag in ["", "2", "1.x", "a.b", "1.0.0", "-1.0"] {
            assert!(tag.parse::<JusVersion>().is_err(), "accepted {tag:?}");
        }
    }

    #[test]
    fn absent_tag_is_legacy() {
        assert_eq!(JusVersion::from_tag(None), Ok(JusVersion::LEGACY));
        assert_eq!(JusVersion::from_tag(Some("2.0")), Ok(JusVersion::CURRENT));
    }

    #[test]
    fn ordering() {
        assert!(JusVersion::LEGACY < JusVersion::CURRENT);
        assert!(JusVersion::new(1, 10) > JusVersion::new(1, 9));
        assert_eq!(JusVersion::CURRENT.to_string(), "2.0");
    }
}
