//! Logical read points and their antenna mapping.
//!
//! A read point is a named group of physical antennas, built once from
//! configuration and immutable afterwards. The map also derives the reverse
//! antenna-to-read-point lookup; it carries no information of its own, but
//! hosts use it to attribute antenna-level diagnostics to a read point.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::ReadPointConfig;
use crate::error::{HalError, Result};

/// Maximum number of logical read points honored; extras in the
/// configuration are ignored.
pub const MAX_READ_POINTS: usize = 4;

/// One logical read point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPoint {
    name: String,
    antennas: Vec<u16>,
}

impl ReadPoint {
    /// The read point's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The physical antennas grouped under this read point, in
    /// configuration order.
    pub fn antennas(&self) -> &[u16] {
        &self.antennas
    }

    /// The inventory command polling exactly this read point's antennas.
    pub fn inventory_command(&self) -> String {
        bri_protocol::inventory_command(&self.antennas)
    }
}

/// Immutable name-to-read-point map with the derived antenna reverse lookup.
#[derive(Debug, Clone)]
pub struct ReadPointMap {
    points: HashMap<String, ReadPoint>,
    by_antenna: HashMap<u16, String>,
}

impl ReadPointMap {
    /// Build the map from configuration.
    ///
    /// Only the first [`MAX_READ_POINTS`] entries are honored; extras are
    /// dropped with a warning. Each antenna may belong to at most one read
    /// point and each name may appear at most once.
    ///
    /// # Errors
    ///
    /// [`HalError::Configuration`] on a duplicate read-point name or an
    /// antenna assigned to more than one read point.
    pub fn from_config(read_points: &[ReadPointConfig]) -> Result<Self> {
        if read_points.len() > MAX_READ_POINTS {
            warn!(
                "{} read points configured, only the first {} are honored",
                read_points.len(),
                MAX_READ_POINTS
            );
        }

        let mut points = HashMap::new();
        let mut by_antenna: HashMap<u16, String> = HashMap::new();

        for config in read_points.iter().take(MAX_READ_POINTS) {
            debug!(
                "Read point {:?} -> antennas {:?}",
                config.name, config.antennas
            );

            for &antenna in &config.antennas {
                if let Some(owner) = by_antenna.get(&antenna) {
                    return Err(HalError::configuration(format!(
                        "Antenna {} belongs to both {:?} and {:?}",
                        antenna, owner, config.name
                    )));
                }
                by_antenna.insert(antenna, config.name.clone());
            }

            let read_point = ReadPoint {
                name: config.name.clone(),
                antennas: config.antennas.clone(),
            };

            if points.insert(config.name.clone(), read_point).is_some() {
                return Err(HalError::configuration(format!(
                    "Duplicate read point name: {:?}",
                    config.name
                )));
            }
        }

        Ok(Self { points, by_antenna })
    }

    /// Look up a read point by exact name.
    pub fn get(&self, name: &str) -> Option<&ReadPoint> {
        self.points.get(name)
    }

    /// The configured read point names, order unspecified.
    pub fn names(&self) -> Vec<String> {
        self.points.keys().cloned().collect()
    }

    /// Case-insensitive membership test. No device liveness is implied.
    pub fn contains_ignore_case(&self, name: &str) -> bool {
        self.points.keys().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// The read point owning the given antenna, if any.
    pub fn read_point_for_antenna(&self, antenna: u16) -> Option<&str> {
        self.by_antenna.get(&antenna).map(String::as_str)
    }

    /// Number of configured read points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no read points are configured.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
