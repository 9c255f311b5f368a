//! Integration tests for the export command: real files, both modes.

use std::path::Path;

use georefkit_core::{CrsDescription, CrsKind, ExportError, Point};
use georefkit_export::{read_world_file, ExportGeorefRasterCommand};
use georefkit_raster::{RasterImage, RasterLayer};
use image::{Rgba, RgbaImage};

fn crs() -> CrsDescription {
    CrsDescription {
        kind: CrsKind::Projected,
        wkt: "PROJCS[\"test\"]".to_string(),
    }
}

fn layer_10x10() -> RasterLayer {
    let mut layer = RasterLayer::with_image(
        RasterImage::from_rgba(RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 255]))),
        "scan",
    );
    layer.transform_mut().set_center(Point::new(100.0, 200.0));
    layer.transform_mut().set_scale(2.0, 3.0);
    layer.commit_transform_parameters();
    layer
}

#[test]
fn test_coefficients_mode_matches_interactive_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let raster_path = dir.path().join("out.png");

    ExportGeorefRasterCommand::new()
        .export_georef_raster(&layer_10x10(), &raster_path, true, &crs())
        .unwrap();

    let gt = read_world_file(&dir.path().join("out.pgw")).unwrap();
    assert_eq!(gt.a, 2.0);
    assert_eq!(gt.b, 0.0);
    assert_eq!(gt.d, 0.0);
    assert_eq!(gt.e, -3.0);
    // c = 100 - 2*4.5, f = 200 - (-3*4.5)
    assert_eq!(gt.c, 91.0);
    assert_eq!(gt.f, 213.5);

    // Pixels are exported unchanged
    let out = image::open(&raster_path).unwrap().to_rgba8();
    assert_eq!(out.dimensions(), (10, 10));
    assert_eq!(out.get_pixel(5, 5).0, [1, 2, 3, 255]);

    // CRS sidecar is present and carries the WKT
    let aux = std::fs::read_to_string(dir.path().join("out.png.aux.xml")).unwrap();
    assert!(aux.contains("PROJCS[\"test\"]"));
}

#[test]
fn test_coefficients_mode_with_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let raster_path = dir.path().join("out.png");
    let mut layer = layer_10x10();
    layer.transform_mut().set_rotation(30.0);
    layer.commit_transform_parameters();

    ExportGeorefRasterCommand::new()
        .export_georef_raster(&layer, &raster_path, true, &crs())
        .unwrap();

    let gt = read_world_file(&dir.path().join("out.pgw")).unwrap();
    let rad = 30.0_f64.to_radians();
    assert!((gt.a - 2.0 * rad.cos()).abs() < 1e-12);
    assert!((gt.b + 3.0 * rad.sin()).abs() < 1e-12);
    assert!((gt.d + 2.0 * rad.sin()).abs() < 1e-12);
    assert!((gt.e + 3.0 * rad.cos()).abs() < 1e-12);
    // The image center pixel must land on the layer center
    let center = gt.apply(4.5, 4.5);
    assert!((center.x - 100.0).abs() < 1e-9);
    assert!((center.y - 200.0).abs() < 1e-9);
}

#[test]
fn test_resampled_mode_axis_aligned_coefficients() {
    let dir = tempfile::tempdir().unwrap();
    let raster_path = dir.path().join("out.png");
    let mut layer = RasterLayer::with_image(
        RasterImage::from_rgba(RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]))),
        "scan",
    );
    layer.transform_mut().set_scale(2.0, 2.0);
    layer.commit_transform_parameters();

    ExportGeorefRasterCommand::new()
        .export_georef_raster(&layer, &raster_path, false, &crs())
        .unwrap();

    // Equal scales, no rotation: output keeps the source size and the
    // world file carries pixel size 2 with half-pixel offsets.
    let out = image::open(&raster_path).unwrap().to_rgba8();
    assert_eq!(out.dimensions(), (4, 4));

    let gt = read_world_file(&dir.path().join("out.pgw")).unwrap();
    assert_eq!(gt.a, 2.0);
    assert_eq!(gt.e, -2.0);
    assert_eq!(gt.b, 0.0);
    assert_eq!(gt.d, 0.0);
    // Extent (-4, -4, 4, 4): c = -4 + a/2, f = 4 + e/2
    assert_eq!(gt.c, -3.0);
    assert_eq!(gt.f, 3.0);
}

#[test]
fn test_resampled_mode_preserves_native_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let raster_path = dir.path().join("out.png");
    let mut layer = RasterLayer::with_image(
        RasterImage::from_rgba(RgbaImage::from_pixel(4, 2, Rgba([9, 9, 9, 255]))),
        "scan",
    );
    // xScale/yScale = 2: the X axis is stretched in pixel space so the
    // denser axis is never downsampled.
    layer.transform_mut().set_scale(2.0, 1.0);
    layer.commit_transform_parameters();

    ExportGeorefRasterCommand::new()
        .export_georef_raster(&layer, &raster_path, false, &crs())
        .unwrap();

    let out = image::open(&raster_path).unwrap().to_rgba8();
    assert_eq!(out.dimensions(), (8, 2));

    let gt = read_world_file(&dir.path().join("out.pgw")).unwrap();
    // World extent is 8x2, output 8x2 pixels: unit pixel size
    assert_eq!(gt.a, 1.0);
    assert_eq!(gt.e, -1.0);
}

#[test]
fn test_resampled_mode_rotated_bounding_box() {
    let dir = tempfile::tempdir().unwrap();
    let raster_path = dir.path().join("out.png");
    let mut layer = RasterLayer::with_image(
        RasterImage::from_rgba(RgbaImage::from_pixel(4, 2, Rgba([9, 9, 9, 255]))),
        "scan",
    );
    layer.transform_mut().set_rotation(90.0);
    layer.commit_transform_parameters();

    ExportGeorefRasterCommand::new()
        .export_georef_raster(&layer, &raster_path, false, &crs())
        .unwrap();

    // A quarter turn swaps the axes
    let out = image::open(&raster_path).unwrap().to_rgba8();
    assert_eq!(out.dimensions(), (2, 4));
}

#[test]
fn test_jpeg_export_writes_jgw_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let raster_path = dir.path().join("out.jpg");

    ExportGeorefRasterCommand::new()
        .export_georef_raster(&layer_10x10(), &raster_path, true, &crs())
        .unwrap();

    assert!(raster_path.exists());
    assert!(dir.path().join("out.jgw").exists());
}

#[test]
fn test_tiff_export_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let raster_path = dir.path().join("out.tif");

    ExportGeorefRasterCommand::new()
        .export_georef_raster(&layer_10x10(), &raster_path, true, &crs())
        .unwrap();

    assert!(dir.path().join("out.tfw").exists());
    // The LZW-compressed TIFF decodes back to the source pixels
    let out = image::open(&raster_path).unwrap().to_rgba8();
    assert_eq!(out.dimensions(), (10, 10));
    assert_eq!(out.get_pixel(0, 0).0, [1, 2, 3, 255]);
}

#[test]
fn test_unsupported_format_reports_generic_failure() {
    let dir = tempfile::tempdir().unwrap();
    let raster_path = dir.path().join("out.webp");

    let result = ExportGeorefRasterCommand::new().export_georef_raster(
        &layer_10x10(),
        &raster_path,
        true,
        &crs(),
    );
    assert!(matches!(result, Err(ExportError::CommandFailed)));
    assert!(!raster_path.exists());
}

#[test]
fn test_unwritable_destination_reports_generic_failure() {
    let result = ExportGeorefRasterCommand::new().export_georef_raster(
        &layer_10x10(),
        Path::new("/nonexistent-dir/out.png"),
        true,
        &crs(),
    );
    assert!(matches!(result, Err(ExportError::CommandFailed)));
}
