//! # GeorefKit Export
//!
//! Turns a committed raster placement into files GIS software understands:
//! the raster itself (unchanged or resampled to axis-aligned), a six-line
//! world file, and an auxiliary CRS sidecar.

pub mod aux_xml;
pub mod export;
pub mod world_file;

pub use aux_xml::{aux_content, aux_xml_path, write_aux_xml};
pub use export::{export_georef_raster, ExportGeorefRasterCommand};
pub use world_file::{
    read_world_file, read_world_file_for, world_file_extension, world_file_path, write_world_file,
};
