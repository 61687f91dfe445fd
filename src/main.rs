use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use diagramkit::designer::export::export_area;
use diagramkit::{
    export_image, init_logging, CanvasSettings, Connection, ConnectorSide, DesignerCanvas, Entity,
    GraphicalObject, HeadlessHost, Modifiers, MouseButton, Point, RenderHost, ScrollCommand, Size,
    Vector,
};
use diagramkit_core::{shared, Shared};
use diagramkit_settings::load_or_default;

#[derive(Parser, Debug)]
#[command(name = "diagramkit")]
#[command(version)]
#[command(about = "Build a demo diagram on a headless canvas and optionally export it", long_about = None)]
struct Args {
    /// Number of entity columns
    #[arg(long, default_value_t = 40)]
    columns: usize,

    /// Number of entity rows
    #[arg(long, default_value_t = 40)]
    rows: usize,

    /// Host width in device units
    #[arg(long, default_value_t = 1024.0)]
    width: f64,

    /// Host height in device units
    #[arg(long, default_value_t = 768.0)]
    height: f64,

    /// Canvas settings file (TOML or JSON)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Export the diagram to this file (extension selects bmp, jpg, png, or tiff)
    #[arg(short, long, value_name = "OUTPUT")]
    export: Option<PathBuf>,

    /// Export resolution
    #[arg(long, default_value_t = 96.0)]
    dpi: f64,
}

fn build_diagram(columns: usize, rows: usize) -> Vec<GraphicalObject> {
    let entities: Vec<Entity> = (0..rows)
        .flat_map(|row| {
            (0..columns).map(move |column| {
                Entity::with_rect(column as f64 * 120.0, row as f64 * 90.0, 80.0, 50.0)
                    .with_label(format!("R{row}C{column}"))
            })
        })
        .collect();

    let mut objects: Vec<GraphicalObject> = Vec::with_capacity(entities.len() * 3);
    for (index, entity) in entities.iter().enumerate() {
        let column = index % columns;
        if column + 1 < columns {
            let right = &entities[index + 1];
            objects.push(Connection::new(entity, ConnectorSide::Right, right, ConnectorSide::Left).into());
        }
        if index + columns < entities.len() {
            let below = &entities[index + columns];
            objects.push(Connection::new(entity, ConnectorSide::Bottom, below, ConnectorSide::Top).into());
        }
    }
    objects.extend(entities.into_iter().map(GraphicalObject::from));
    objects
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => load_or_default(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => CanvasSettings::default(),
    };

    let headless = shared(HeadlessHost::new());
    let host: Shared<dyn RenderHost> = headless.clone();
    let mut canvas = DesignerCanvas::with_settings(host, settings);

    let ids = canvas.add_items(build_diagram(args.columns, args.rows))?;
    canvas.set_available_size(Size::new(args.width, args.height));
    canvas.run_pending()?;
    tracing::info!(
        "Loaded {} item(s); {} container(s) live, {} host child(ren)",
        ids.len(),
        canvas.generator().bound_count(),
        headless.borrow().child_count()
    );

    for command in [ScrollCommand::PageDown, ScrollCommand::PageRight, ScrollCommand::LineDown] {
        canvas.scroll(command);
    }
    canvas.run_pending()?;
    tracing::info!(
        "After scrolling: viewport {}, {} container(s) live",
        canvas.viewport().viewport(),
        canvas.generator().bound_count()
    );

    canvas.pointer_down_on_background(Point::new(10.0, 10.0), MouseButton::Left)?;
    canvas.update_marquee(Point::new(args.width / 2.0, args.height / 2.0), true)?;
    canvas.complete_gesture(Modifiers::NONE)?;
    tracing::info!("Rubber band selected {} item(s)", canvas.selection().len());

    let dragged = canvas
        .selection()
        .iter()
        .find(|id| canvas.items().get_entity(*id).is_some());
    if let Some(id) = dragged {
        canvas.begin_drag(id)?;
        let applied = canvas.update_drag(Vector::new(30.0, 15.0))?;
        canvas.complete_gesture(Modifiers::NONE)?;
        tracing::info!("Dragged selection by ({}, {})", applied.x, applied.y);
    }

    if canvas.zoom_out() {
        canvas.run_pending()?;
    }
    tracing::info!("{:?}", canvas);

    if let Some(path) = &args.export {
        export_image(&canvas, path, args.dpi, args.dpi)
            .with_context(|| format!("failed to export {}", path.display()))?;
        tracing::info!("Exported area {} to {}", export_area(&canvas), path.display());
    }

    Ok(())
}
