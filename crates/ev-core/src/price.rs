//! Selectors shared by the price-series charts and their query services.

use core::fmt;
use core::str::FromStr;

use crate::error::CoreError;

/// Which storage balance constraints feed a storage price series.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StorageType {
    /// Intra-period balance (batteries, pumped hydro).
    #[default]
    ShortTerm,
    /// Inter-period balance over the clustered year (seasonal storage).
    LongTerm,
    Both,
}

impl StorageType {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageType::ShortTerm => "short-term",
            StorageType::LongTerm => "long-term",
            StorageType::Both => "both",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "short-term" => Ok(StorageType::ShortTerm),
            "long-term" => Ok(StorageType::LongTerm),
            "both" => Ok(StorageType::Both),
            other => Err(CoreError::InvalidSelector {
                what: "storage type",
                value: other.to_string(),
            }),
        }
    }
}

/// Direction of the transport flow limit whose dual value is charted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FlowDirection {
    /// Upper flow limit (inbound).
    #[default]
    Max,
    /// Lower flow limit (outbound).
    Min,
}

impl FlowDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowDirection::Max => "max",
            FlowDirection::Min => "min",
        }
    }
}

impl fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "max" => Ok(FlowDirection::Max),
            "min" => Ok(FlowDirection::Min),
            other => Err(CoreError::InvalidSelector {
                what: "flow direction",
                value: other.to_string(),
            }),
        }
    }
}

/// Carrier selector value meaning "do not filter by carrier".
pub const ALL_CARRIERS: &str = "all";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_type_parse() {
        assert_eq!("long-term".parse::<StorageType>().unwrap(), StorageType::LongTerm);
        let err = "weekly".parse::<StorageType>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid storage type: weekly");
    }

    #[test]
    fn flow_direction_parse() {
        assert_eq!("min".parse::<FlowDirection>().unwrap(), FlowDirection::Min);
        assert!("sideways".parse::<FlowDirection>().is_err());
    }
}
