//! Dependency range rewriting.
//!
//! A declared range is classified once into a [`RangeShape`]; the bump
//! strategies then work on the shape instead of probing the string again.
//! Ranges follow npm semantics (`1.2.3` is exact, `1.2` means `1.2.x`), plus
//! the `workspace:` protocol used by pnpm and yarn workspaces.

use semver::{Version, VersionReq};

use super::strategy::{BumpStrategy, RangePrefix};

/// Protocol prefix for ranges resolved from the local workspace
pub const WORKSPACE_PROTOCOL: &str = "workspace:";

/// Shape of a declared dependency range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeShape {
    /// `^1.2.3`, holding the text after the operator
    Caret(String),
    /// `~1.2.3`, holding the text after the operator
    Tilde(String),
    /// `1.2.x`, `1.x`, `1.2`: the leading numeric components and how many
    /// components were written in total
    XRange {
        fixed: Vec<u64>,
        width: usize,
        marker: Option<char>,
    },
    /// `*`, `x` or an empty range
    Wildcard,
    /// A full version, matched exactly
    Exact(Version),
}

impl RangeShape {
    /// Classify a range (without `workspace:` prefix).
    ///
    /// Returns `None` for anything outside the supported shapes, e.g.
    /// comparator sets like `>=1.0.0 <2.0.0` or unions with `||`.
    pub fn parse(range: &str) -> Option<Self> {
        let range = range.trim();
        if range.is_empty() || is_wildcard(range) {
            return Some(RangeShape::Wildcard);
        }

        if let Some(base) = range.strip_prefix('^') {
            return operator_base('^', base).map(RangeShape::Caret);
        }
        if let Some(base) = range.strip_prefix('~') {
            return operator_base('~', base).map(RangeShape::Tilde);
        }

        let exact = range.strip_prefix('=').unwrap_or(range).trim();
        if let Ok(version) = Version::parse(exact) {
            return Some(RangeShape::Exact(version));
        }

        parse_x_range(range)
    }

    /// Number of leading components pinned by an x-range
    pub fn position(&self) -> Option<usize> {
        match self {
            RangeShape::XRange { fixed, .. } => Some(fixed.len()),
            _ => None,
        }
    }

    /// Whether `version` falls inside the range
    pub fn is_satisfied_by(&self, version: &Version) -> bool {
        match self {
            RangeShape::Wildcard => true,
            RangeShape::Caret(base) => requirement_matches('^', base, version),
            RangeShape::Tilde(base) => requirement_matches('~', base, version),
            RangeShape::XRange { fixed, .. } => {
                let components = [version.major, version.minor, version.patch];
                version.pre.is_empty()
                    && fixed
                        .iter()
                        .zip(components.iter())
                        .all(|(expected, actual)| expected == actual)
            }
            RangeShape::Exact(exact) => exact == version,
        }
    }

    /// Rebuild a range of the same shape around `version`
    pub fn reshape(&self, version: &Version) -> String {
        match self {
            RangeShape::Wildcard => "*".to_string(),
            RangeShape::Caret(_) => format!("^{}", version),
            RangeShape::Tilde(_) => format!("~{}", version),
            RangeShape::Exact(_) => version.to_string(),
            RangeShape::XRange {
                fixed,
                width,
                marker,
            } => {
                let components = [version.major, version.minor, version.patch];
                let mut parts: Vec<String> = components
                    .iter()
                    .take(fixed.len())
                    .map(u64::to_string)
                    .collect();
                if let Some(marker) = marker {
                    let open = width.saturating_sub(fixed.len());
                    parts.extend(std::iter::repeat(marker.to_string()).take(open));
                }
                parts.join(".")
            }
        }
    }
}

fn is_wildcard(part: &str) -> bool {
    matches!(part, "*" | "x" | "X")
}

fn operator_base(operator: char, base: &str) -> Option<String> {
    let base = base.trim();
    if base.is_empty() || base.contains(char::is_whitespace) {
        return None;
    }
    VersionReq::parse(&format!("{}{}", operator, base))
        .ok()
        .map(|_| base.to_string())
}

fn requirement_matches(operator: char, base: &str, version: &Version) -> bool {
    VersionReq::parse(&format!("{}{}", operator, base))
        .map(|req| req.matches(version))
        .unwrap_or(false)
}

fn parse_x_range(range: &str) -> Option<RangeShape> {
    let parts: Vec<&str> = range.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut fixed = Vec::new();
    let mut marker = None;
    for part in &parts {
        if is_wildcard(part) {
            marker = marker.or_else(|| part.chars().next());
        } else if marker.is_none() && !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
        {
            fixed.push(part.parse::<u64>().ok()?);
        } else {
            return None;
        }
    }

    if fixed.is_empty() {
        return Some(RangeShape::Wildcard);
    }
    // Three numeric components would have been an exact version
    if fixed.len() == 3 {
        return None;
    }

    Some(RangeShape::XRange {
        fixed,
        width: parts.len(),
        marker,
    })
}

/// Split off a leading `workspace:` protocol
pub fn strip_workspace_protocol(range: &str) -> (&str, bool) {
    match range.strip_prefix(WORKSPACE_PROTOCOL) {
        Some(rest) => (rest, true),
        None => (range, false),
    }
}

/// `workspace:*`, `workspace:~` and `workspace:^` carry no version of their own
fn resolve_workspace_marker(range: &str, next_version: &str) -> Option<String> {
    match range.trim() {
        "*" => Some("*".to_string()),
        "~" => Some(format!("~{}", next_version)),
        "^" => Some(format!("^{}", next_version)),
        _ => None,
    }
}

/// Whether `next_version` satisfies `range` (without `workspace:` prefix)
pub fn satisfies(range: &str, next_version: &str) -> bool {
    match (RangeShape::parse(range), Version::parse(next_version)) {
        (Some(shape), Ok(version)) => shape.is_satisfied_by(&version),
        _ => false,
    }
}

/// Compute the range a dependent should declare once a dependency moves to
/// `next_version`.
///
/// `prefix` only applies to `override`, where the bare next version is
/// otherwise written. The function never fails: unclassifiable ranges fall
/// through to the exact next version.
pub fn resolve_next_version(
    current_range: &str,
    next_version: &str,
    strategy: BumpStrategy,
    prefix: RangePrefix,
) -> String {
    if current_range == next_version {
        return current_range.to_string();
    }

    let (range, workspace) = strip_workspace_protocol(current_range);

    match strategy {
        BumpStrategy::Override => format!("{}{}", prefix, next_version),
        BumpStrategy::Ignore => range.to_string(),
        BumpStrategy::Satisfy => {
            if workspace {
                if let Some(resolved) = resolve_workspace_marker(range, next_version) {
                    return resolved;
                }
            }
            if satisfies(range, next_version) {
                current_range.to_string()
            } else {
                next_version.to_string()
            }
        }
        BumpStrategy::Inherit => {
            if workspace {
                if let Some(resolved) = resolve_workspace_marker(range, next_version) {
                    return resolved;
                }
            }
            let (Some(shape), Ok(next)) = (RangeShape::parse(range), Version::parse(next_version))
            else {
                return next_version.to_string();
            };
            if shape.is_satisfied_by(&next) {
                range.trim().to_string()
            } else {
                shape.reshape(&next)
            }
        }
    }
}
