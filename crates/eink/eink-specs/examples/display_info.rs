//! Display Information Example
//!
//! Prints the built-in Inky templates and their derived properties.
//!
//! Run with: cargo run --example display_info

use eink_specs::displays::ALL;
use eink_specs::{DisplaySpec, InkColor};

fn print_display_info(spec: &DisplaySpec) {
    println!("\n{}", "=".repeat(60));
    println!("Display: {}", spec.name);
    println!("{}", "=".repeat(60));

    println!("  Resolution: {}×{} pixels", spec.width, spec.height);
    println!("  Aspect Ratio: {:.2}:1", spec.aspect_ratio());
    println!("  Diagonal: {:.2}\" ({:.1} px)", spec.diagonal_inches, spec.diagonal_px());
    println!("  Density: {:.0} ppi", spec.pixels_per_inch());
    println!("  Controller: {:?}", spec.controller);

    for color in [InkColor::Black, InkColor::Red, InkColor::Yellow] {
        let variant = spec.with_color(color);
        println!(
            "  Variant {:<6} accent ink: {}",
            variant.color.as_str(),
            variant.color.has_accent()
        );
    }
}

fn main() {
    for spec in ALL {
        print_display_info(spec);
    }
}
