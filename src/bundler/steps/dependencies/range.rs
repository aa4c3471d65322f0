//! npm version range translation.
//!
//! npm ranges are close to Cargo's but not identical: bare versions are
//! exact, comparators are separated by spaces, `||` joins alternatives and
//! `x` marks wildcard components. Each alternative becomes one
//! [`VersionReq`].

use semver::{Version, VersionReq};

const OPERATORS: [&str; 7] = [">=", "<=", ">", "<", "=", "^", "~"];

/// Translates an npm range into alternatives.
///
/// Returns `None` for specs that do not name a registry version range
/// (git URLs, `file:` paths, dist-tags such as `latest`, ...).
pub fn parse_npm_range(spec: &str) -> Option<Vec<VersionReq>> {
    let spec = spec.trim();
    if spec.contains(':') || spec.contains('/') {
        return None;
    }

    spec.split("||")
        .map(|alternative| parse_alternative(alternative.trim()))
        .collect()
}

/// True when `version` satisfies any alternative.
pub fn satisfies(alternatives: &[VersionReq], version: &Version) -> bool {
    alternatives.iter().any(|req| req.matches(version))
}

fn parse_alternative(alternative: &str) -> Option<VersionReq> {
    if matches!(alternative, "" | "*" | "x" | "X") {
        return Some(VersionReq::STAR);
    }

    let comparators = if let Some((low, high)) = alternative.split_once(" - ") {
        vec![
            format!(">={}", normalize_version(low.trim())?),
            format!("<={}", normalize_version(high.trim())?),
        ]
    } else {
        split_comparators(alternative)
            .into_iter()
            .map(|comparator| normalize_comparator(&comparator))
            .collect::<Option<Vec<_>>>()?
    };

    VersionReq::parse(&comparators.join(", "))
        .map_err(|e| log::debug!("Cannot interpret range '{}': {}", alternative, e))
        .ok()
}

/// Splits on whitespace, re-attaching operators written apart from their
/// version (`>= 1.2.0`).
fn split_comparators(alternative: &str) -> Vec<String> {
    let mut comparators: Vec<String> = Vec::new();
    let mut pending_operator: Option<&str> = None;

    for token in alternative.split_whitespace() {
        if OPERATORS.contains(&token) {
            pending_operator = Some(token);
            continue;
        }
        match pending_operator.take() {
            Some(op) => comparators.push(format!("{op}{token}")),
            None => comparators.push(token.to_string()),
        }
    }

    comparators
}

fn normalize_comparator(comparator: &str) -> Option<String> {
    let operator = OPERATORS
        .iter()
        .find(|op| comparator.starts_with(*op))
        .copied();

    match operator {
        Some(op) => {
            let version = normalize_version(&comparator[op.len()..])?;
            if version == "*" {
                Some("*".to_string())
            } else {
                Some(format!("{op}{version}"))
            }
        }
        // npm treats a bare version as exact; partial versions match their
        // whole minor or major line, which is what `=` does for partials.
        None => {
            let version = normalize_version(comparator)?;
            if version == "*" {
                Some("*".to_string())
            } else {
                Some(format!("={version}"))
            }
        }
    }
}

/// Strips a leading `v` and truncates at the first wildcard component.
fn normalize_version(version: &str) -> Option<String> {
    let version = version.trim().trim_start_matches('v');
    if version.is_empty() {
        return None;
    }

    let mut parts = Vec::new();
    for part in version.splitn(3, '.') {
        if matches!(part, "x" | "X" | "*") {
            break;
        }
        // Dist-tags and other words are not ranges.
        if !part.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        parts.push(part);
    }

    if parts.is_empty() {
        Some("*".to_string())
    } else {
        Some(parts.join("."))
    }
}
