#![forbid(unsafe_code)]

//! Minimal RGBA color with CSS output.

use std::fmt;

use serde::{Serialize, Serializer};

/// 8-bit RGB with a float alpha, printed as a CSS `rgba()` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    #[must_use]
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fixed palette shared by the result card and the chart.
pub mod palette {
    use super::Rgba;

    pub const GREEN: Rgba = Rgba::rgb(34, 197, 94);
    pub const YELLOW: Rgba = Rgba::rgb(234, 179, 8);
    pub const RED: Rgba = Rgba::rgb(239, 68, 68);
    pub const BLUE: Rgba = Rgba::rgb(59, 130, 246);
}
