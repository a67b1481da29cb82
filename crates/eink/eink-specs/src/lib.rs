//! E-Paper Display Specifications
//!
//! Physical characteristics of the small e-paper boards the dashboard targets:
//! resolution, physical diagonal, controller chip and ink colour.
//!
//! # Features
//!
//! - **no_std compatible** - Pure data, usable from any target
//! - **Display templates** - Pre-configured specs for the Inky pHAT and wHAT boards
//! - **Serde support** - Optional serialization of specs and ink names
//!
//! # Example
//!
//! ```
//! use eink_specs::displays::INKY_PHAT;
//! use eink_specs::InkColor;
//!
//! let spec = INKY_PHAT.with_color(InkColor::Red);
//! assert_eq!((spec.width, spec.height), (212, 104));
//! assert!(spec.color.has_accent());
//! println!("{} at {:.0} ppi", spec.name, spec.pixels_per_inch());
//! ```
//!
//! # Custom Display Specs
//!
//! ```
//! use eink_specs::{Controller, DisplaySpec, InkColor};
//!
//! const MY_DISPLAY: DisplaySpec = DisplaySpec {
//!     name: "Custom Display",
//!     width: 296,
//!     height: 128,
//!     diagonal_inches: 2.9,
//!     controller: Controller::Generic,
//!     color: InkColor::Black,
//! };
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

mod display_spec;
pub mod displays;

pub use display_spec::{Controller, DisplaySpec, InkColor};
