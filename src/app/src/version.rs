//! Firmware version and build comparison
//!
//! Versions compare numerically segment by segment, padding the shorter one
//! with zeros. Build identifiers only break ties between equal versions and
//! are compared as digit strings.

use std::cmp::Ordering;

use crate::types::{BuildIdentifier, FirmwareDescriptor, VersionTuple};

/// Compares two version strings, e.g. `compare_versions("1.2.3", "1.10.0") == Less`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    compare_tuples(&VersionTuple::parse(a), &VersionTuple::parse(b))
}

/// Compares two build identifiers.
///
/// Returns `None` when either side has no digits.
pub fn compare_builds(a: &str, b: &str) -> Option<Ordering> {
    compare_identifiers(&BuildIdentifier::parse(a), &BuildIdentifier::parse(b))
}

/// Whether `remote` should be offered as an update for `current`.
///
/// Equal versions with an undefined build comparison are not newer.
pub fn is_newer(current: &FirmwareDescriptor, remote: &FirmwareDescriptor) -> bool {
    match compare_tuples(&current.version, &remote.version) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => {
            compare_identifiers(&current.build, &remote.build) == Some(Ordering::Less)
        }
    }
}

pub fn compare_tuples(a: &VersionTuple, b: &VersionTuple) -> Ordering {
    let (a, b) = (a.segments(), b.segments());
    let len = a.len().max(b.len());

    (0..len)
        .map(|i| {
            let left = a.get(i).copied().unwrap_or(0);
            let right = b.get(i).copied().unwrap_or(0);
            left.cmp(&right)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

pub fn compare_identifiers(a: &BuildIdentifier, b: &BuildIdentifier) -> Option<Ordering> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    if a.as_str().len() != b.as_str().len() {
        log::debug!(
            "comparing build identifiers of different width: {} vs {}",
            a.as_str(),
            b.as_str()
        );
    }
    Some(a.as_str().cmp(b.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(version: &str, build: &str) -> FirmwareDescriptor {
        FirmwareDescriptor::new(version, build, None)
    }

    #[test]
    fn equal_versions_compare_equal() {
        assert_eq!(compare_versions("1.0.6", "1.0.6"), Ordering::Equal);
    }

    #[test]
    fn versions_compare_numerically() {
        assert_eq!(compare_versions("1.2.3", "1.10.0"), Ordering::Less);
        assert_eq!(compare_versions("1.10.0", "1.2.3"), Ordering::Greater);
    }

    #[test]
    fn prefix_and_padding_are_ignored() {
        assert_eq!(compare_versions("v2.0", "2.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("2", "2.0.1"), Ordering::Less);
    }

    #[test]
    fn prerelease_suffix_is_discarded() {
        assert_eq!(compare_versions("1.2.3-rc1", "1.2.3"), Ordering::Equal);
    }

    #[test]
    fn garbage_degrades_to_zero() {
        assert_eq!(compare_versions("abc", "0.0"), Ordering::Equal);
        assert_eq!(compare_versions("", "0.0.1"), Ordering::Less);
    }

    #[test]
    fn oversized_segment_still_compares_greater() {
        assert_eq!(
            compare_versions("1.99999999999999999999", "1.1"),
            Ordering::Greater
        );
    }

    #[test]
    fn empty_build_is_undefined() {
        assert_eq!(compare_builds("", "20260101000000"), None);
        assert_eq!(compare_builds("20260101000000", "none"), None);
    }

    #[test]
    fn builds_compare_lexicographically() {
        assert_eq!(
            compare_builds("20260101000000", "20260101000001"),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_builds("20260101000000", "20260101000000"),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn mismatched_build_width_still_compares() {
        // not chronological: "9" sorts after "10"
        assert_eq!(compare_builds("9", "10"), Some(Ordering::Greater));
    }

    #[test]
    fn newer_version_wins_regardless_of_build() {
        assert!(is_newer(
            &descriptor("1.0.6", "20260101000000"),
            &descriptor("1.0.7", "20250101000000")
        ));
        assert!(!is_newer(
            &descriptor("1.0.7", "20250101000000"),
            &descriptor("1.0.6", "20260101000000")
        ));
    }

    #[test]
    fn equal_version_newer_build_is_newer() {
        assert!(is_newer(
            &descriptor("1.0.6", "20260101000000"),
            &descriptor("1.0.6", "20260101000001")
        ));
    }

    #[test]
    fn equal_version_with_empty_build_is_not_newer() {
        assert!(!is_newer(
            &descriptor("1.0.6", ""),
            &descriptor("1.0.6", "20260101000001")
        ));
        assert!(!is_newer(
            &descriptor("1.0.6", "20260101000000"),
            &descriptor("1.0.6", "")
        ));
    }

    #[test]
    fn identical_firmware_is_not_newer() {
        let firmware = descriptor("1.0.6", "20260101000000");
        assert!(!is_newer(&firmware, &firmware));
    }
}
