//! Auxiliary CRS sidecar.
//!
//! A fixed PAM/ESRI XML template written next to the exported raster so GIS
//! readers that honor sidecar spatial-reference metadata pick up the CRS.
//! The WKT is passed through verbatim from the host's CRS description.

use std::fs;
use std::path::{Path, PathBuf};

use georefkit_core::{CrsDescription, ExportError};

/// The sidecar path: the raster path with `.aux.xml` appended.
pub fn aux_xml_path(raster_path: &Path) -> PathBuf {
    let mut name = raster_path.as_os_str().to_os_string();
    name.push(".aux.xml");
    PathBuf::from(name)
}

/// The sidecar content for a CRS.
pub fn aux_content(crs: &CrsDescription) -> String {
    format!(
        r#"<PAMDataset>
  <Metadata domain="xml:ESRI" format="xml">
    <GeodataXform xsi:type="typens:IdentityXform"
      xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
      xmlns:xs="http://www.w3.org/2001/XMLSchema"
      xmlns:typens="http://www.esri.com/schemas/ArcGIS/9.2">
      <SpatialReference xsi:type="typens:{kind}CoordinateSystem">
        <WKT>{wkt}</WKT>
      </SpatialReference>
    </GeodataXform>
  </Metadata>
</PAMDataset>"#,
        kind = crs.kind.type_name(),
        wkt = crs.wkt,
    )
}

/// Writes the sidecar next to the exported raster.
pub fn write_aux_xml(raster_path: &Path, crs: &CrsDescription) -> Result<(), ExportError> {
    fs::write(aux_xml_path(raster_path), aux_content(crs))?;
    Ok(())
}
