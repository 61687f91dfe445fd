use std::io::Cursor;

use diagramkit_core::Rect;
use diagramkit_designer::export::{export_area, format_for_path};
use diagramkit_designer::{
    export_image, export_image_to_writer, export_image_with, DesignerCanvas, Entity, ExportError,
    ExportResult, Rasterizer,
};
use image::{ImageFormat, RgbaImage};
use tempfile::TempDir;

use super::support::canvas;

fn sample_canvas() -> DesignerCanvas {
    let (mut canvas, _host) = canvas();
    canvas.add_item(Entity::with_rect(10.0, 10.0, 80.0, 40.0)).unwrap();
    canvas
}

#[test]
fn test_export_area_covers_items_and_margin() {
    let populated = sample_canvas();
    assert_eq!(export_area(&populated), Rect::new(0.0, 0.0, 100.0, 60.0));

    let (empty, _host) = canvas();
    assert_eq!(export_area(&empty), Rect::new(0.0, 0.0, 10.0, 10.0));
}

#[test]
fn test_export_png_scales_with_dpi() {
    let canvas = sample_canvas();
    let dir = TempDir::new().unwrap();

    let base = dir.path().join("diagram.png");
    export_image(&canvas, &base, 96.0, 96.0).unwrap();
    assert_eq!(image::image_dimensions(&base).unwrap(), (100, 60));

    let doubled = dir.path().join("diagram@2x.PNG");
    export_image(&canvas, &doubled, 192.0, 192.0).unwrap();
    assert_eq!(image::image_dimensions(&doubled).unwrap(), (200, 120));
}

#[test]
fn test_export_paints_entities() {
    let canvas = sample_canvas();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("diagram.bmp");
    export_image(&canvas, &path, 96.0, 96.0).unwrap();

    let pixels = image::open(&path).unwrap().to_rgb8();
    // Background corner and entity interior differ.
    assert_ne!(pixels.get_pixel(2, 2), pixels.get_pixel(50, 30));
}

#[test]
fn test_export_rejects_bad_arguments() {
    let canvas = sample_canvas();
    let dir = TempDir::new().unwrap();

    let gif = dir.path().join("diagram.gif");
    assert!(matches!(
        export_image(&canvas, &gif, 96.0, 96.0),
        Err(ExportError::UnsupportedFormat(_))
    ));
    assert!(!gif.exists());

    assert!(matches!(
        export_image(&canvas, std::path::Path::new(""), 96.0, 96.0),
        Err(ExportError::InvalidArgument(_))
    ));

    let png = dir.path().join("diagram.png");
    assert!(matches!(
        export_image(&canvas, &png, 0.0, 96.0),
        Err(ExportError::InvalidArgument(_))
    ));
    assert!(matches!(
        export_image(&canvas, &png, 96.0, f64::NAN),
        Err(ExportError::InvalidArgument(_))
    ));
    assert!(!png.exists());

    assert!(matches!(
        format_for_path(std::path::Path::new("diagram")),
        Err(ExportError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_export_to_writer() {
    let canvas = sample_canvas();
    let mut buffer = Cursor::new(Vec::new());
    export_image_to_writer(&canvas, &mut buffer, ImageFormat::Png, 96.0, 96.0).unwrap();

    let bytes = buffer.into_inner();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (100, 60));
}

struct Solid;

impl Rasterizer for Solid {
    fn rasterize(&self, _canvas: &DesignerCanvas, _dpi_x: f64, _dpi_y: f64) -> ExportResult<RgbaImage> {
        Ok(RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255])))
    }
}

#[test]
fn test_export_with_custom_rasterizer() {
    let canvas = sample_canvas();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("solid.tiff");
    export_image_with(&Solid, &canvas, &path, 96.0, 96.0).unwrap();
    assert_eq!(image::image_dimensions(&path).unwrap(), (3, 2));
}
