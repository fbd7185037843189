//! Platform presets.
//!
//! Some platforms carry aggregate indicator groups (e.g. system attention
//! indicators) that are driven by a dedicated service. A [`Platform`] names
//! the groups the monitor must never write on that platform.

use std::str::FromStr;

use crate::error::UnknownPlatform;

pub const PARTITION_SAI: &str =
    "/xyz/openbmc_project/led/groups/partition_system_attention_indicator";
pub const PLATFORM_SAI: &str =
    "/xyz/openbmc_project/led/groups/platform_system_attention_indicator";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Generic,
    /// Platforms with partition/platform system attention indicators.
    IbmSai,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Generic => "generic",
            Platform::IbmSai => "ibm-sai",
        }
    }

    /// Indicator groups reserved on this platform.
    pub fn reserved_groups(&self) -> &'static [&'static str] {
        match self {
            Platform::Generic => &[],
            Platform::IbmSai => &[PARTITION_SAI, PLATFORM_SAI],
        }
    }
}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "generic" => Ok(Platform::Generic),
            "ibm-sai" | "ibm_sai" => Ok(Platform::IbmSai),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}
