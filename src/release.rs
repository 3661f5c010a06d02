//! Release tag parsing.

use regex::Regex;
use semver::Version;
use std::fmt;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?(\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?)$").expect("Invalid regex pattern"));

/// A release tag resolved from the repository.
///
/// The tag name is kept verbatim for checkout. When the tag looks like a
/// semantic version (`v1.2.0`, `0.4.1-beta.2`) the parsed version is kept
/// alongside it for display.
///
/// # Example
///
/// ```rust
/// use cosmo_installer::ReleaseTag;
///
/// let tag = ReleaseTag::new("v1.2.0");
/// assert_eq!(tag.name(), "v1.2.0");
/// assert_eq!(tag.version().unwrap().minor, 2);
///
/// let tag = ReleaseTag::new("nightly");
/// assert!(tag.version().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    name: String,
    version: Option<Version>,
}

impl ReleaseTag {
    /// Build a tag from `git describe` output.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let version = parse_tag_version(&name);
        Self { name, version }
    }

    /// The tag name as known to git.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The semantic version encoded in the tag, if any.
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn parse_tag_version(tag: &str) -> Option<Version> {
    let caps = VERSION_RE.captures(tag.trim())?;
    Version::parse(caps.get(1)?.as_str()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_tag() {
        let tag = ReleaseTag::new("v1.2.0");
        assert_eq!(tag.version(), Some(&Version::new(1, 2, 0)));
        assert_eq!(tag.to_string(), "v1.2.0");
    }

    #[test]
    fn test_bare_tag() {
        let tag = ReleaseTag::new("0.9.14");
        assert_eq!(tag.version(), Some(&Version::new(0, 9, 14)));
    }

    #[test]
    fn test_prerelease_tag() {
        let tag = ReleaseTag::new("v2.0.0-rc.1");
        let version = tag.version().unwrap();
        assert_eq!(version.major, 2);
        assert_eq!(version.pre.as_str(), "rc.1");
    }

    #[test]
    fn test_non_version_tag() {
        assert!(ReleaseTag::new("latest").version().is_none());
        assert!(ReleaseTag::new("v1.2").version().is_none());
        assert!(ReleaseTag::new("release-1.2.3").version().is_none());
    }
}
