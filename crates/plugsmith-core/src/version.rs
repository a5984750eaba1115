//! Plugin version management.

use std::fmt;
use std::str::FromStr;

use semver::Version;

use crate::{ReleaseError, ReleaseResult};

/// Number of components in a plugin version.
pub const SEMANTIC_VERSIONING_COUNT: usize = 3;

/// Version bump type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BumpType {
    /// Major version bump.
    Major,
    /// Minor version bump.
    Minor,
    /// Patch version bump.
    Patch,
    /// No version bump.
    None,
}

impl BumpType {
    /// Menu entries in the order they are offered, keyed by their number.
    pub const MENU: [(u8, Self); 4] = [
        (1, Self::Major),
        (2, Self::Minor),
        (3, Self::Patch),
        (4, Self::None),
    ];

    /// Returns the bump type for a menu number.
    #[must_use]
    pub fn from_choice(choice: u8) -> Option<Self> {
        Self::MENU
            .iter()
            .find(|(number, _)| *number == choice)
            .map(|(_, bump)| *bump)
    }

    /// Returns the label used in menus and commit messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Major => "MAJOR",
            Self::Minor => "MINOR",
            Self::Patch => "PATCH",
            Self::None => "None",
        }
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
            Self::None => write!(f, "none"),
        }
    }
}

/// A plugin version: exactly `major.minor.patch`, no pre-release or build
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PluginVersion(Version);

impl PluginVersion {
    /// Creates a version from its components.
    #[must_use]
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Parses a dotted version string.
    ///
    /// Every component must be a non-empty run of ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::MalformedVersion`] if the string does not
    /// have exactly three integer components.
    pub fn parse(input: &str) -> ReleaseResult<Self> {
        let malformed = || ReleaseError::MalformedVersion(input.to_string());

        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() != SEMANTIC_VERSIONING_COUNT {
            return Err(malformed());
        }

        let mut numbers = [0_u64; SEMANTIC_VERSIONING_COUNT];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            *slot = part.parse().map_err(|_| malformed())?;
        }

        let [major, minor, patch] = numbers;
        Ok(Self::new(major, minor, patch))
    }

    /// Returns the version after applying `bump`.
    ///
    /// The bumped component goes up by one and every later component
    /// resets to zero.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::MalformedVersion`] if the bumped component
    /// would overflow.
    pub fn bump(&self, bump: BumpType) -> ReleaseResult<Self> {
        let overflow = || ReleaseError::MalformedVersion(self.to_string());
        let mut next = self.0.clone();

        match bump {
            BumpType::Major => {
                next.major = next.major.checked_add(1).ok_or_else(overflow)?;
                next.minor = 0;
                next.patch = 0;
            }
            BumpType::Minor => {
                next.minor = next.minor.checked_add(1).ok_or_else(overflow)?;
                next.patch = 0;
            }
            BumpType::Patch => {
                next.patch = next.patch.checked_add(1).ok_or_else(overflow)?;
            }
            BumpType::None => {}
        }

        Ok(Self(next))
    }

    /// Major component.
    #[must_use]
    pub fn major(&self) -> u64 {
        self.0.major
    }

    /// Minor component.
    #[must_use]
    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    /// Patch component.
    #[must_use]
    pub fn patch(&self) -> u64 {
        self.0.patch
    }
}

impl FromStr for PluginVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PluginVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let version = PluginVersion::parse("1.4.9").unwrap();
        assert_eq!(version, PluginVersion::new(1, 4, 9));
        assert_eq!(version.to_string(), "1.4.9");
    }

    #[test]
    fn test_parse_zeroes_and_large_numbers() {
        assert_eq!(
            PluginVersion::parse("0.0.0").unwrap(),
            PluginVersion::new(0, 0, 0)
        );
        assert_eq!(
            PluginVersion::parse("10.200.3000").unwrap(),
            PluginVersion::new(10, 200, 3000)
        );
    }

    #[test]
    fn test_parse_leading_zeroes_are_integers() {
        assert_eq!(
            PluginVersion::parse("01.02.03").unwrap(),
            PluginVersion::new(1, 2, 3)
        );
    }

    #[test]
    fn test_parse_wrong_component_count() {
        for input in ["1", "1.2", "1.2.3.4", ""] {
            assert!(
                matches!(PluginVersion::parse(input), Err(ReleaseError::MalformedVersion(ref v)) if v == input),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_non_integer_component() {
        for input in [
            "1.2.x",
            "a.b.c",
            "1.2.3-beta",
            "1.2.3+build",
            "1..3",
            "-1.2.3",
            "+1.2.3",
            " 1.2.3",
        ] {
            assert!(
                PluginVersion::parse(input).is_err(),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_overflow() {
        assert!(PluginVersion::parse("99999999999999999999.0.0").is_err());
    }

    #[test]
    fn test_from_str() {
        let version: PluginVersion = "2.0.1".parse().unwrap();
        assert_eq!(version.major(), 2);
        assert_eq!(version.minor(), 0);
        assert_eq!(version.patch(), 1);
    }

    #[test]
    fn test_bump_major() {
        let version = PluginVersion::new(1, 4, 9);
        assert_eq!(version.bump(BumpType::Major).unwrap(), PluginVersion::new(2, 0, 0));
    }

    #[test]
    fn test_bump_minor() {
        let version = PluginVersion::new(1, 4, 9);
        assert_eq!(version.bump(BumpType::Minor).unwrap(), PluginVersion::new(1, 5, 0));
    }

    #[test]
    fn test_bump_patch() {
        let version = PluginVersion::new(1, 4, 9);
        assert_eq!(version.bump(BumpType::Patch).unwrap(), PluginVersion::new(1, 4, 10));
    }

    #[test]
    fn test_bump_none() {
        let version = PluginVersion::new(1, 4, 9);
        assert_eq!(version.bump(BumpType::None).unwrap(), version);
    }

    #[test]
    fn test_bump_overflow_is_malformed() {
        let version = PluginVersion::parse("18446744073709551615.0.0").unwrap();
        let result = version.bump(BumpType::Major);
        assert!(
            matches!(result, Err(ReleaseError::MalformedVersion(v)) if v == "18446744073709551615.0.0")
        );

        let version = PluginVersion::new(1, u64::MAX, 3);
        assert!(version.bump(BumpType::Minor).is_err());
        assert_eq!(
            version.bump(BumpType::Major).unwrap(),
            PluginVersion::new(2, 0, 0)
        );

        let version = PluginVersion::new(1, 2, u64::MAX);
        assert!(version.bump(BumpType::Patch).is_err());
        assert_eq!(version.bump(BumpType::None).unwrap(), version);
    }

    #[test]
    fn test_from_choice() {
        assert_eq!(BumpType::from_choice(1), Some(BumpType::Major));
        assert_eq!(BumpType::from_choice(2), Some(BumpType::Minor));
        assert_eq!(BumpType::from_choice(3), Some(BumpType::Patch));
        assert_eq!(BumpType::from_choice(4), Some(BumpType::None));
        assert_eq!(BumpType::from_choice(0), None);
        assert_eq!(BumpType::from_choice(5), None);
    }

    #[test]
    fn test_label_and_display() {
        assert_eq!(BumpType::Major.label(), "MAJOR");
        assert_eq!(BumpType::Patch.to_string(), "patch");
    }
}
