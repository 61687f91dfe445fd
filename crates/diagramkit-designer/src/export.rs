//! Image export.
//!
//! Rasterizes the canvas extent at a given DPI and encodes it as BMP, JPEG,
//! PNG, or TIFF. The encoder is chosen from the destination's extension.
//! Export reads the canvas only.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};
use thiserror::Error;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use diagramkit_core::Rect;

use crate::canvas::DesignerCanvas;
use crate::model::{Connection, Entity, GraphicalObject};

/// Resolution the canvas coordinates are expressed in.
pub const BASE_DPI: f64 = 96.0;

/// Largest width or height, in pixels, an export may produce.
pub const MAX_EXPORT_DIMENSION: u32 = 16_384;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Turns a canvas into pixels.
pub trait Rasterizer {
    fn rasterize(&self, canvas: &DesignerCanvas, dpi_x: f64, dpi_y: f64) -> ExportResult<RgbaImage>;
}

/// Draws entities as filled, outlined rectangles (rotated about their
/// centers) and connections as polylines along their routes.
#[derive(Debug, Clone)]
pub struct WireframeRasterizer {
    pub background: [u8; 4],
    pub entity_fill: [u8; 4],
    pub entity_outline: [u8; 4],
    pub selected_outline: [u8; 4],
    pub connection: [u8; 4],
    /// Stroke width in canvas units.
    pub stroke_width: f32,
}

impl Default for WireframeRasterizer {
    fn default() -> Self {
        Self {
            background: [255, 255, 255, 255],
            entity_fill: [236, 240, 241, 255],
            entity_outline: [52, 73, 94, 255],
            selected_outline: [52, 152, 219, 255],
            connection: [44, 62, 80, 255],
            stroke_width: 1.0,
        }
    }
}

fn color(rgba: [u8; 4]) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

fn paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(rgba));
    paint.anti_alias = true;
    paint
}

impl WireframeRasterizer {
    fn draw_entity(
        &self,
        pixmap: &mut Pixmap,
        entity: &Entity,
        selected: bool,
        scale: Transform,
    ) {
        let frame = entity.frame();
        let Some(rect) = tiny_skia::Rect::from_xywh(
            frame.x as f32,
            frame.y as f32,
            frame.width as f32,
            frame.height as f32,
        ) else {
            return;
        };
        let center = entity.center();
        let transform = scale.pre_concat(Transform::from_rotate_at(
            entity.angle() as f32,
            center.x as f32,
            center.y as f32,
        ));
        let path = PathBuilder::from_rect(rect);
        pixmap.fill_path(
            &path,
            &paint(self.entity_fill),
            FillRule::Winding,
            transform,
            None,
        );

        let outline = if selected {
            self.selected_outline
        } else {
            self.entity_outline
        };
        let stroke = Stroke {
            width: self.stroke_width,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint(outline), &stroke, transform, None);
    }

    fn draw_connection(&self, pixmap: &mut Pixmap, connection: &Connection, scale: Transform) {
        let route = connection.route();
        let mut points = route.iter();
        let Some(first) = points.next() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(first.x as f32, first.y as f32);
        for point in points {
            pb.line_to(point.x as f32, point.y as f32);
        }
        if let Some(path) = pb.finish() {
            let stroke = Stroke {
                width: self.stroke_width,
                ..Default::default()
            };
            pixmap.stroke_path(&path, &paint(self.connection), &stroke, scale, None);
        }
    }
}

impl Rasterizer for WireframeRasterizer {
    fn rasterize(&self, canvas: &DesignerCanvas, dpi_x: f64, dpi_y: f64) -> ExportResult<RgbaImage> {
        let (sx, sy) = scale_factors(dpi_x, dpi_y)?;
        let area = export_area(canvas);
        let width = pixel_extent(area.width, sx)?;
        let height = pixel_extent(area.height, sy)?;

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| ExportError::Rasterize(format!("cannot allocate {width}x{height}")))?;
        pixmap.fill(color(self.background));

        let scale = Transform::from_scale(sx as f32, sy as f32);
        // Connections first so entities draw over their endpoints.
        for object in canvas.items().iter() {
            if let GraphicalObject::Connection(connection) = object {
                self.draw_connection(&mut pixmap, connection, scale);
            }
        }
        for object in canvas.items().iter() {
            if let GraphicalObject::Entity(entity) = object {
                let selected = canvas.selection().contains(entity.id());
                self.draw_entity(&mut pixmap, entity, selected, scale);
            }
        }

        tracing::debug!(
            "Rasterized {} item(s) to {}x{} at {}x{} dpi",
            canvas.items().len(),
            width,
            height,
            dpi_x,
            dpi_y
        );
        RgbaImage::from_raw(width, height, pixmap.take())
            .ok_or_else(|| ExportError::Rasterize("pixel buffer size mismatch".to_string()))
    }
}

/// Canvas area covered by an export: from the origin to the far corner of
/// the items, plus the extent margin.
pub fn export_area(canvas: &DesignerCanvas) -> Rect {
    let bounds = canvas.items().bounds();
    let margin = canvas.settings().extent_margin;
    if bounds.is_empty() {
        return Rect::new(0.0, 0.0, margin, margin);
    }
    Rect::new(
        0.0,
        0.0,
        bounds.right().max(0.0) + margin,
        bounds.bottom().max(0.0) + margin,
    )
}

/// Encoder for a destination path, by extension (case-insensitive).
pub fn format_for_path(path: &Path) -> ExportResult<ImageFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "bmp" => Ok(ImageFormat::Bmp),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "png" => Ok(ImageFormat::Png),
        "tif" | "tiff" => Ok(ImageFormat::Tiff),
        _ => Err(ExportError::UnsupportedFormat(format!(
            "'{}' (expected bmp, jpg, jpeg, png, tif, or tiff)",
            path.display()
        ))),
    }
}

/// Rasterizes `canvas` with the default wireframe style and writes it to
/// `destination`.
pub fn export_image(
    canvas: &DesignerCanvas,
    destination: &Path,
    dpi_x: f64,
    dpi_y: f64,
) -> ExportResult<()> {
    export_image_with(&WireframeRasterizer::default(), canvas, destination, dpi_x, dpi_y)
}

/// Like [`export_image`] with a custom rasterizer.
pub fn export_image_with<R: Rasterizer + ?Sized>(
    rasterizer: &R,
    canvas: &DesignerCanvas,
    destination: &Path,
    dpi_x: f64,
    dpi_y: f64,
) -> ExportResult<()> {
    if destination.as_os_str().is_empty() {
        return Err(ExportError::InvalidArgument(
            "destination path is empty".to_string(),
        ));
    }
    let format = format_for_path(destination)?;
    let image = rasterizer.rasterize(canvas, dpi_x, dpi_y)?;

    let mut writer = BufWriter::new(File::create(destination)?);
    encode(image, &mut writer, format)?;
    writer.flush()?;
    tracing::info!("Exported canvas to {}", destination.display());
    Ok(())
}

/// Rasterizes `canvas` and encodes it into `writer`.
pub fn export_image_to_writer<W: Write + Seek>(
    canvas: &DesignerCanvas,
    writer: &mut W,
    format: ImageFormat,
    dpi_x: f64,
    dpi_y: f64,
) -> ExportResult<()> {
    let image = WireframeRasterizer::default().rasterize(canvas, dpi_x, dpi_y)?;
    encode(image, writer, format)
}

fn encode<W: Write + Seek>(image: RgbaImage, writer: &mut W, format: ImageFormat) -> ExportResult<()> {
    match format {
        ImageFormat::Bmp | ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Tiff => {}
        other => {
            return Err(ExportError::UnsupportedFormat(format!("{other:?}")));
        }
    }
    // The background is opaque; JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
    rgb.write_to(writer, format)?;
    Ok(())
}

fn scale_factors(dpi_x: f64, dpi_y: f64) -> ExportResult<(f64, f64)> {
    for dpi in [dpi_x, dpi_y] {
        if !dpi.is_finite() || dpi <= 0.0 {
            return Err(ExportError::InvalidArgument(format!(
                "DPI must be positive, got {dpi}"
            )));
        }
    }
    Ok((dpi_x / BASE_DPI, dpi_y / BASE_DPI))
}

fn pixel_extent(length: f64, scale: f64) -> ExportResult<u32> {
    let pixels = (length * scale).ceil().max(1.0);
    if pixels > MAX_EXPORT_DIMENSION as f64 {
        return Err(ExportError::InvalidArgument(format!(
            "export would be {pixels} pixels wide, limit is {MAX_EXPORT_DIMENSION}"
        )));
    }
    Ok(pixels as u32)
}
