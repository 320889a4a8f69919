//! Distribution platform identifiers.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A distribution channel a clip can be recommended for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Youtube,
    Tiktok,
    Instagram,
    Twitter,
    Facebook,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "youtube" => Ok(Platform::Youtube),
            "tiktok" => Ok(Platform::Tiktok),
            "instagram" => Ok(Platform::Instagram),
            "twitter" | "x" => Ok(Platform::Twitter),
            "facebook" => Ok(Platform::Facebook),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized platform name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for platform in [
            Platform::Youtube,
            Platform::Tiktok,
            Platform::Instagram,
            Platform::Twitter,
            Platform::Facebook,
        ] {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn test_x_aliases_twitter() {
        assert_eq!("X".parse::<Platform>().unwrap(), Platform::Twitter);
    }

    #[test]
    fn test_unknown_platform_errors() {
        assert!("vimeo".parse::<Platform>().is_err());
    }
}
