//! Renders one frame with the software backend and writes it to a PNG.
//!
//! ```text
//! cargo run -p tessera --example headless_frame -- out.png [font.fnt]
//! ```
//!
//! With a BMFont descriptor as the second argument a styled label is drawn
//! in the header panel.

use tessera::prelude::*;
use tessera::render::software::{SoftwareDeviceConfig, SoftwareRenderDevice};
use tessera::ui::taffy::{self, FlexDirection};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 200;

fn panel(tree: &mut NodeTree, colors: QuadColors, height: u32) -> UiResult<NodeId> {
    let id = tree.create_node()?;
    tree.set_layout_style(
        id,
        taffy::Style {
            size: taffy::Size {
                width: taffy::Dimension::Percent(1.0),
                height: taffy::Dimension::Length(height as f32),
            },
            ..Default::default()
        },
    )?;
    tree.set_painter(id, move |_node: &Node, canvas: &mut Canvas<'_>| {
        let bounds = canvas.local_bounds();
        canvas.fill_rect_gradient(bounds, colors)
    })?;
    Ok(id)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tessera::init(&Config::default());

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "frame.png".to_string());
    let font_path = args.next();

    let mut device = SoftwareRenderDevice::new(
        SoftwareDeviceConfig::with_size(WIDTH, HEIGHT).with_background(Color::from_hex(0x202028)),
    );

    let mut tree = NodeTree::new();
    let root = tree.create_node()?;
    tree.set_layout_style(
        root,
        taffy::Style {
            flex_direction: FlexDirection::Column,
            ..tessera::ui::fixed_style(Size::new(WIDTH, HEIGHT))
        },
    )?;
    tree.set_root(root)?;

    let header = panel(
        &mut tree,
        QuadColors::vertical(Color::from_hex(0x3050a0), Color::from_hex(0x102040)),
        40,
    )?;
    let body = panel(
        &mut tree,
        QuadColors::horizontal(Color::from_hex(0x303030), Color::from_hex(0x505050)),
        120,
    )?;
    tree.add_child(root, header)?;
    tree.add_child(root, body)?;

    if let Some(path) = font_path {
        let label = tree.create_with(Label::new("Tessera"))?;
        tree.set_fixed_size(label, Size::new(WIDTH, 40))?;
        tree.add_child(header, label)?;

        let styles = StyleRegistry::with_builtin();
        styles.apply_all(
            &mut tree,
            label,
            [
                ("font", path.as_str()),
                ("text-color", "#ffcc00"),
                ("text-halign", "left"),
            ],
            &mut device,
        )?;
    }

    let mut renderer = Renderer::new(RendererConfig::default());
    let stats = renderer.render(&mut tree, &mut device)?;
    tracing::info!(
        painted = stats.nodes_painted,
        laid_out = stats.layout.nodes_laid_out,
        "frame rendered"
    );

    let framebuffer = device.framebuffer();
    image::save_buffer(
        &output,
        framebuffer.as_bytes(),
        framebuffer.width(),
        framebuffer.height(),
        image::ColorType::Rgba8,
    )?;
    println!("wrote {}", output);
    Ok(())
}
