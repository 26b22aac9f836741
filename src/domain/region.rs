// SPDX-License-Identifier: MPL-2.0
//! Screen regions and inset sides.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A named area of the screen that hosts an ordered stack of overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    TopLeft,
    TopCenter,
    TopRight,
    TopFullWidth,
    BottomLeft,
    BottomCenter,
    BottomRight,
    BottomFullWidth,
}

impl Region {
    /// All regions in declaration order.
    pub const ALL: [Region; 8] = [
        Region::TopLeft,
        Region::TopCenter,
        Region::TopRight,
        Region::TopFullWidth,
        Region::BottomLeft,
        Region::BottomCenter,
        Region::BottomRight,
        Region::BottomFullWidth,
    ];

    /// Number of regions.
    pub const COUNT: usize = Self::ALL.len();

    /// Returns the canonical name, e.g. `TOP_FULL_WIDTH`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Region::TopLeft => "TOP_LEFT",
            Region::TopCenter => "TOP_CENTER",
            Region::TopRight => "TOP_RIGHT",
            Region::TopFullWidth => "TOP_FULL_WIDTH",
            Region::BottomLeft => "BOTTOM_LEFT",
            Region::BottomCenter => "BOTTOM_CENTER",
            Region::BottomRight => "BOTTOM_RIGHT",
            Region::BottomFullWidth => "BOTTOM_FULL_WIDTH",
        }
    }

    /// Position of this region in [`Region::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns true for regions that span the whole screen width.
    #[must_use]
    pub fn is_full_width(self) -> bool {
        matches!(self, Region::TopFullWidth | Region::BottomFullWidth)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|region| region.as_str() == s)
            .ok_or_else(|| Error::UnknownRegion(s.to_string()))
    }
}

/// The screen edge an inset pushes overlays away from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Top => "TOP",
            Side::Bottom => "BOTTOM",
            Side::Left => "LEFT",
            Side::Right => "RIGHT",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_declaration_order() {
        for (position, region) in Region::ALL.into_iter().enumerate() {
            assert_eq!(region.index(), position);
        }
    }

    #[test]
    fn from_str_round_trips_every_region() {
        for region in Region::ALL {
            assert_eq!(region.as_str().parse::<Region>(), Ok(region));
        }
    }

    #[test]
    fn from_str_rejects_unknown_names() {
        assert_eq!(
            "MIDDLE".parse::<Region>(),
            Err(Error::UnknownRegion("MIDDLE".to_string()))
        );
        // Names are case-sensitive
        assert!("top_left".parse::<Region>().is_err());
    }

    #[test]
    fn only_full_width_regions_report_full_width() {
        let full: Vec<_> = Region::ALL
            .into_iter()
            .filter(|r| r.is_full_width())
            .collect();
        assert_eq!(full, vec![Region::TopFullWidth, Region::BottomFullWidth]);
    }

    #[test]
    fn display_uses_canonical_name() {
        assert_eq!(Region::BottomCenter.to_string(), "BOTTOM_CENTER");
        assert_eq!(Side::Left.to_string(), "LEFT");
    }
}
