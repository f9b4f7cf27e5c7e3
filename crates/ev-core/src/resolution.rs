//! Temporal bucket sizes used to aggregate time-series rows.

use core::fmt;
use core::str::FromStr;

use crate::error::{CoreError, CoreResult};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Resolution {
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl Resolution {
    pub const ALL: [Resolution; 5] = [
        Resolution::Hours,
        Resolution::Days,
        Resolution::Weeks,
        Resolution::Months,
        Resolution::Years,
    ];

    /// Bucket length in hours, as the backend expects it.
    pub fn hours(self) -> u32 {
        match self {
            Resolution::Hours => 1,
            Resolution::Days => 24,
            Resolution::Weeks => 168,
            Resolution::Months => 720,
            Resolution::Years => 8760,
        }
    }

    pub fn from_hours(hours: u32) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.hours() == hours)
            .ok_or_else(|| CoreError::UnsupportedResolution {
                value: hours.to_string(),
            })
    }

    pub fn name(self) -> &'static str {
        match self {
            Resolution::Hours => "hours",
            Resolution::Days => "days",
            Resolution::Weeks => "weeks",
            Resolution::Months => "months",
            Resolution::Years => "years",
        }
    }

    /// Axis label for the x axis of a series bucketed at this resolution.
    pub fn axis_label(self) -> &'static str {
        match self {
            Resolution::Hours => "Hour",
            Resolution::Days => "Day",
            Resolution::Weeks => "Week",
            Resolution::Months => "Month",
            Resolution::Years => "Year",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resolution {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        if let Some(found) = Self::ALL.into_iter().find(|r| r.name() == lowered) {
            return Ok(found);
        }
        match lowered.parse::<u32>() {
            Ok(hours) => Self::from_hours(hours),
            Err(_) => Err(CoreError::UnsupportedResolution {
                value: s.to_string(),
            }),
        }
    }
}
