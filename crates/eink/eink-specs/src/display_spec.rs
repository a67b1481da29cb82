//! Display specification types
//!
//! Defines the characteristics of an e-paper board that the layout and
//! compositing layers care about.

/// Complete specification of an e-paper display
///
/// Contains everything the renderer needs:
/// - Pixel resolution
/// - Physical diagonal (used to derive pixel density)
/// - Controller chip
/// - Ink colour of the accent pigment, if any
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DisplaySpec {
    /// Display name (e.g., "Inky pHAT")
    pub name: &'static str,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Physical diagonal of the active area in inches
    pub diagonal_inches: f32,

    /// Display controller chip
    pub controller: Controller,

    /// Ink colours the panel can show
    pub color: InkColor,
}

impl DisplaySpec {
    /// Same panel with a different ink variant.
    ///
    /// Inky boards ship in black, red and yellow flavours that share every
    /// other characteristic.
    pub const fn with_color(self, color: InkColor) -> Self {
        Self { color, ..self }
    }

    /// Same panel with a different resolution (custom or rotated mounts).
    pub const fn with_resolution(self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    /// Get display aspect ratio (width / height)
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Diagonal length in pixels
    pub fn diagonal_px(&self) -> f32 {
        let w = self.width as f32;
        let h = self.height as f32;
        libm::sqrtf(w * w + h * h)
    }

    /// Pixel density derived from the pixel and physical diagonals
    ///
    /// Returns 0.0 for a spec with no physical size.
    pub fn pixels_per_inch(&self) -> f32 {
        if self.diagonal_inches <= 0.0 {
            return 0.0;
        }
        self.diagonal_px() / self.diagonal_inches
    }

    /// Number of pixels on the panel
    pub fn pixel_count(&self) -> u32 {
        self.width.saturating_mul(self.height)
    }
}

/// E-paper display controller chips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Controller {
    /// IL91874 (first generation Inky pHAT and wHAT)
    IL91874,
    /// Solomon Systech SSD1608 (Inky pHAT v2, 250×122)
    SSD1608,
    /// Solomon Systech SSD1683 (Inky wHAT v2)
    SSD1683,
    /// Generic/unknown controller
    Generic,
}

/// Pigments available on the panel
///
/// Every panel shows black on white; tri-colour panels add one accent ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InkColor {
    /// Black and white only
    #[default]
    Black,
    /// Black, white and red
    Red,
    /// Black, white and yellow
    Yellow,
}

impl InkColor {
    /// Whether the panel has a third (accent) pigment
    pub const fn has_accent(self) -> bool {
        !matches!(self, InkColor::Black)
    }

    /// Lower-case name as used in configuration files
    pub const fn as_str(self) -> &'static str {
        match self {
            InkColor::Black => "black",
            InkColor::Red => "red",
            InkColor::Yellow => "yellow",
        }
    }

    /// Parse a configuration name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        [InkColor::Black, InkColor::Red, InkColor::Yellow]
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}
