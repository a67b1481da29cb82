//! Pimoroni Inky display specifications

use crate::{Controller, DisplaySpec, InkColor};

/// Inky pHAT (212×104, 2.13")
///
/// The default dashboard target. Ships in black, red and yellow variants;
/// use [`DisplaySpec::with_color`] to pick one.
pub const INKY_PHAT: DisplaySpec = DisplaySpec {
    name: "Inky pHAT",
    width: 212,
    height: 104,
    diagonal_inches: 2.13,
    controller: Controller::IL91874,
    color: InkColor::Black,
};

/// Inky pHAT with the SSD1608 controller (250×122, 2.13")
pub const INKY_PHAT_SSD1608: DisplaySpec = DisplaySpec {
    name: "Inky pHAT (SSD1608)",
    width: 250,
    height: 122,
    diagonal_inches: 2.13,
    controller: Controller::SSD1608,
    color: InkColor::Black,
};

/// Inky wHAT (400×300, 4.2")
pub const INKY_WHAT: DisplaySpec = DisplaySpec {
    name: "Inky wHAT",
    width: 400,
    height: 300,
    diagonal_inches: 4.2,
    controller: Controller::IL91874,
    color: InkColor::Black,
};
