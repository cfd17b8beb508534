use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AutomationError;

/// A dotted numeric host-release version, compared segment-wise with missing
/// segments treated as zero (`17.10` == `17.10.0`).
///
/// Functionally-identical actions moved between controls across host
/// releases; comparing against a fixed threshold picks the navigation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostVersion {
    segments: Vec<u32>,
}

/// First host release with the unified project flow (tabbed surfaces instead
/// of the classic tree navigation).
const UNIFIED_PROJECT_FLOW: [u32; 3] = [17, 10, 0];

impl HostVersion {
    pub fn new(segments: &[u32]) -> Self {
        Self {
            segments: segments.to_vec(),
        }
    }

    /// Whether this host uses the unified project flow introduced with
    /// 17.10.0. Older hosts reach the same actions through different
    /// controls.
    pub fn has_unified_project_flow(&self) -> bool {
        *self >= HostVersion::new(&UNIFIED_PROJECT_FLOW)
    }
}

impl FromStr for HostVersion {
    type Err = AutomationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments = s
            .trim()
            .split('.')
            .map(|part| {
                part.parse::<u32>().map_err(|_| {
                    AutomationError::InvalidArgument(format!(
                        "invalid version segment {part:?} in {s:?}"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if segments.is_empty() {
            return Err(AutomationError::InvalidArgument(format!(
                "empty version string {s:?}"
            )));
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}

impl PartialEq for HostVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HostVersion {}

impl Ord for HostVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).copied().unwrap_or(0);
            let b = other.segments.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for HostVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> HostVersion {
        s.parse().unwrap()
    }

    #[test]
    fn compares_numerically_not_lexically() {
        assert!(v("17.9.5") < v("17.10.0"));
        assert!(v("17.10.1") > v("17.10.0"));
        assert!(v("16.11.34") < v("17.0"));
    }

    #[test]
    fn missing_segments_count_as_zero() {
        assert_eq!(v("17.10"), v("17.10.0"));
        assert!(v("17") < v("17.0.1"));
    }

    #[test]
    fn threshold_selects_the_navigation_path() {
        assert!(!v("17.9.5").has_unified_project_flow());
        assert!(v("17.10.0").has_unified_project_flow());
        assert!(v("18.0").has_unified_project_flow());
    }

    #[test]
    fn rejects_non_numeric_segments() {
        assert!("17.10.0-preview".parse::<HostVersion>().is_err());
        assert!("".parse::<HostVersion>().is_err());
        assert!("17..0".parse::<HostVersion>().is_err());
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(v("17.10.0").to_string(), "17.10.0");
    }
}
