//! Inclusive tunnel port ranges.

use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` port range, encoded as a two element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u16; 2]", into = "[u16; 2]")]
pub struct PortRange {
    /// First port in the range
    pub start: u16,
    /// Last port in the range (inclusive)
    pub end: u16,
}

impl PortRange {
    /// Create a new port range
    #[must_use]
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    /// A range containing a single port
    #[must_use]
    pub const fn single(port: u16) -> Self {
        Self::new(port, port)
    }

    /// Ranges with `start > end` are invalid and contribute no ports
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    /// Number of ports in the range
    #[must_use]
    pub const fn len(&self) -> u32 {
        if self.is_valid() {
            self.end as u32 - self.start as u32 + 1
        } else {
            0
        }
    }

    /// Whether the range contains no ports
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `port` lies inside the range
    #[must_use]
    pub const fn contains(&self, port: u16) -> bool {
        self.start <= port && port <= self.end
    }
}

impl From<[u16; 2]> for PortRange {
    fn from([start, end]: [u16; 2]) -> Self {
        Self::new(start, end)
    }
}

impl From<PortRange> for [u16; 2] {
    fn from(range: PortRange) -> Self {
        [range.start, range.end]
    }
}

/// Total number of ports over all valid ranges
#[must_use]
pub fn port_count(ranges: &[PortRange]) -> u64 {
    ranges.iter().map(|range| u64::from(range.len())).sum()
}
