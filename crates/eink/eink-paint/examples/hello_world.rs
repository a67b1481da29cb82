//! Paints a bordered "Hello, world!" box and saves it as a PNG.
//!
//! Run with: `cargo run -p eink-paint --example hello_world [-- FONT [OUT]]`
//!
//! `FONT` is `builtin:<size>` or a TrueType file (default `builtin:6x10`).

use eink_paint::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), PaintError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let mut args = std::env::args().skip(1);
    let font = Font::load(&args.next().unwrap_or_else(|| "builtin:6x10".to_owned()))?;
    let out = args.next().unwrap_or_else(|| "hello_world.png".to_owned());

    let painter = PalettePainter::new(Palette::BlackWhite);

    let mut hello_world = Container::new()
        .with_name("hello_world")
        .with_display(Display::Block)
        .with_align(Align::Left)
        .with_padding(Padding::all(2))
        .with_border(Border::all(1));
    hello_world.add(painter.text("Hello, world!", &font, 12.0));
    let size = hello_world.size()?;

    let mut root = Container::new().with_name("root");
    root.add(hello_world);

    let layout = Layout::new(&root).layout()?;
    let image = painter.paint(size, &layout)?;
    image.save(&out)?;

    println!("Wrote {}x{} image to {out}", size.width, size.height);
    Ok(())
}
