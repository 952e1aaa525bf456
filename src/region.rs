// 🗺️ Region table - the four sales regions and their one-letter codes

use serde::{Deserialize, Serialize};

/// Region name used when a code does not resolve
pub const INVALID_REGION: &str = "INVALID";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    West,
    Mountain,
    Central,
    East,
}

impl Region {
    /// Table order, used for prompts and seeding the database
    pub const ALL: [Region; 4] = [Region::West, Region::Mountain, Region::Central, Region::East];

    /// Single-letter lower-case code
    pub fn code(&self) -> &'static str {
        match self {
            Region::West => "w",
            Region::Mountain => "m",
            Region::Central => "c",
            Region::East => "e",
        }
    }

    /// Full display name
    pub fn name(&self) -> &'static str {
        match self {
            Region::West => "West",
            Region::Mountain => "Mountain",
            Region::Central => "Central",
            Region::East => "East",
        }
    }

    /// Look a region up by code, ignoring case
    pub fn from_code(code: &str) -> Option<Region> {
        let code = code.to_lowercase();
        Region::ALL.into_iter().find(|r| r.code() == code)
    }

    /// Look a region up by its full name
    pub fn from_name(name: &str) -> Option<Region> {
        Region::ALL.into_iter().find(|r| r.name() == name)
    }

    /// `(w, m, c, e)` - used in prompts and messages
    pub fn codes_display() -> String {
        let codes: Vec<&str> = Region::ALL.iter().map(|r| r.code()).collect();
        format!("({})", codes.join(", "))
    }
}

/// Full region name for a code, or `INVALID`
pub fn region_name(code: &str) -> &'static str {
    Region::from_code(code).map(|r| r.name()).unwrap_or(INVALID_REGION)
}
