//! Release version gating

use crate::error::{ControllerError, Result};

/// First release that exposes the PDT build endpoints
pub(crate) const MIN_RELEASE: &str = "22.2.0";

/// Leading numeric `major.minor.patch` of a release string
///
/// Missing components count as zero; anything after the first non-numeric
/// character of a component (e.g. "-beta") is ignored.
fn parse_release(raw: &str) -> Option<(u64, u64, u64)> {
    let mut parts = raw.trim().split('.').map(|part| {
        let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse::<u64>().ok()
    });

    let major = parts.next().flatten()?;
    let minor = parts.next().flatten().unwrap_or(0);
    let patch = parts.next().flatten().unwrap_or(0);
    Some((major, minor, patch))
}

pub(crate) fn ensure_supported(found: &str) -> Result<()> {
    let unsupported = || ControllerError::UnsupportedVersion {
        found: found.to_string(),
        required: MIN_RELEASE,
    };

    let found_version = parse_release(found).ok_or_else(unsupported)?;
    let min_version = parse_release(MIN_RELEASE).ok_or_else(unsupported)?;

    if found_version < min_version {
        return Err(unsupported());
    }
    Ok(())
}
