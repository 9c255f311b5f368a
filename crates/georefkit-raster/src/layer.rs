//! The interactively georeferenced raster layer.
//!
//! A `RasterLayer` owns one raster image, its placement transform, its undo
//! history, and the display properties the host persists. Map tools mutate
//! the transform through the layer and call
//! [`commit_transform_parameters`](RasterLayer::commit_transform_parameters)
//! on release; committing refreshes the persisted property block and
//! notifies transform observers so the host can repaint and update controls.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use georefkit_core::{
    CoordinateTransform, GeoTransform, LayerError, Observers, SubscriptionId,
    TransformParameters, WorldRect,
};

use crate::blend::BlendMode;
use crate::history::{HistoryEntry, HistoryStack};
use crate::properties::{LayerProperties, DEFAULT_TRANSPARENCY};
use crate::raster_image::RasterImage;
use crate::transform::AffineTransformModel;

/// Identity of a layer within the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(Uuid);

impl LayerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One raster being georeferenced.
pub struct RasterLayer {
    id: LayerId,
    title: String,
    filepath: PathBuf,
    transform: AffineTransformModel,
    image: Option<RasterImage>,
    transparency: u8,
    blend_mode: BlendMode,
    visible: bool,
    history: HistoryStack,
    observers: Observers<TransformParameters>,
    properties: LayerProperties,
    error: bool,
    initialized: bool,
}

impl RasterLayer {
    /// Creates a layer for a raster file. The image is loaded by
    /// [`initialize`](Self::initialize).
    pub fn new(filepath: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        let filepath = filepath.into();
        let title = title.into();
        let mut layer = Self {
            id: LayerId::new(),
            title,
            filepath,
            transform: AffineTransformModel::new(0, 0),
            image: None,
            transparency: DEFAULT_TRANSPARENCY,
            blend_mode: BlendMode::default(),
            visible: true,
            history: HistoryStack::new(),
            observers: Observers::new(),
            properties: LayerProperties {
                title: String::new(),
                filepath: String::new(),
                x_scale: 1.0,
                y_scale: 1.0,
                rotation: 0.0,
                x_center: 0.0,
                y_center: 0.0,
                transparency: DEFAULT_TRANSPARENCY,
                blend_mode: BlendMode::default().name().to_string(),
            },
            error: false,
            initialized: false,
        };
        layer.refresh_properties();
        layer
    }

    /// Creates an initialized layer from an already-decoded image. Used by
    /// hosts with their own decode pipeline, and by tests.
    pub fn with_image(image: RasterImage, title: impl Into<String>) -> Self {
        let mut layer = Self::new(PathBuf::new(), title);
        layer
            .transform
            .set_image_size(image.width(), image.height());
        layer.image = Some(image);
        layer.initialized = true;
        layer.refresh_properties();
        layer
    }

    /// Reconstructs a layer from its persisted property block. The image is
    /// loaded later by `initialize(None, None)`, which keeps the restored
    /// placement untouched.
    pub fn from_properties(properties: &LayerProperties) -> Self {
        let mut layer = Self::new(properties.filepath.clone(), properties.title.clone());
        layer.transparency = properties.transparency.min(100);
        layer.blend_mode = properties.blend_mode();
        layer.transform.apply_parameters(properties.transform_parameters());
        layer.refresh_properties();
        layer
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    pub fn transform(&self) -> &AffineTransformModel {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut AffineTransformModel {
        &mut self.transform
    }

    pub fn image(&self) -> Option<&RasterImage> {
        self.image.as_ref()
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStack {
        &mut self.history
    }

    pub fn transparency(&self) -> u8 {
        self.transparency
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// True after a failed load; drawing and further initialization are
    /// suppressed until the host corrects the path.
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Loads the raster and establishes the initial placement.
    ///
    /// With `existing_georef` carrying a non-default geotransform (read from
    /// a world-file sidecar), the placement is decomposed from it. Otherwise
    /// a `screen_extent` centers the raster on the visible map with a
    /// fit-to-extent scale. With neither, the current parameters are kept —
    /// the project-load path, where the placement came from persisted
    /// properties.
    pub fn initialize(
        &mut self,
        screen_extent: Option<WorldRect>,
        existing_georef: Option<&GeoTransform>,
    ) -> Result<(), LayerError> {
        if self.error {
            return Err(LayerError::Errored {
                path: self.filepath.clone(),
            });
        }
        if self.initialized {
            return Ok(());
        }

        if self.image.is_none() {
            match RasterImage::open(&self.filepath) {
                Ok(image) => {
                    self.transform.set_image_size(image.width(), image.height());
                    self.image = Some(image);
                }
                Err(err) => {
                    warn!(path = %self.filepath.display(), %err, "raster load failed");
                    self.error = true;
                    return Err(err);
                }
            }
        } else if let Some(image) = &self.image {
            self.transform.set_image_size(image.width(), image.height());
        }
        self.initialized = true;

        match (existing_georef, screen_extent) {
            (Some(georef), _) if !georef.is_default() => {
                info!(layer = %self.id, "initializing placement from existing georeferencing");
                self.transform.initialize_from_geotransform(georef);
                self.commit_transform_parameters();
            }
            (_, Some(extent)) => {
                self.transform.set_center(extent.center());
                self.transform.set_rotation(0.0);
                self.transform.reset_scale(extent.width(), extent.height());
                self.commit_transform_parameters();
            }
            _ => {}
        }
        Ok(())
    }

    /// Clears the error state with a corrected path so the next
    /// [`initialize`](Self::initialize) can retry.
    pub fn correct_filepath(&mut self, filepath: impl Into<PathBuf>) {
        self.filepath = filepath.into();
        self.error = false;
        self.initialized = false;
        self.refresh_properties();
    }

    /// Replaces the raster image, keeping the current placement.
    pub fn replace_image(
        &mut self,
        filepath: impl Into<PathBuf>,
        title: impl Into<String>,
    ) -> Result<(), LayerError> {
        let filepath = filepath.into();
        let image = RasterImage::open(&filepath)?;
        self.transform.set_image_size(image.width(), image.height());
        self.image = Some(image);
        self.filepath = filepath;
        self.title = title.into();
        self.initialized = true;
        self.error = false;
        self.refresh_properties();
        Ok(())
    }

    /// A new layer with the same image, placement, and display properties
    /// but fresh identity, history, and observers.
    pub fn duplicate(&self) -> RasterLayer {
        let mut copy = Self::new(self.filepath.clone(), self.title.clone());
        copy.image = self.image.clone();
        copy.transform = self.transform.clone();
        copy.transparency = self.transparency;
        copy.blend_mode = self.blend_mode;
        copy.initialized = self.initialized;
        copy.error = self.error;
        copy.refresh_properties();
        copy
    }

    /// Commits the current transform parameters: invalidates the derived
    /// extent, refreshes the persisted property block, and notifies
    /// observers.
    pub fn commit_transform_parameters(&mut self) {
        self.transform.invalidate_extent();
        self.refresh_properties();
        let params = self.transform.parameters();
        self.observers.notify(&params);
    }

    /// Registers an observer for committed transform changes.
    pub fn subscribe_transform_changes(
        &mut self,
        handler: impl FnMut(&TransformParameters) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(handler)
    }

    pub fn unsubscribe_transform_changes(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Axis-aligned bounds of the placed raster. Uninitialized layers
    /// report a unit rectangle, as a harmless placeholder for hosts that
    /// query before initialization.
    pub fn extent(&self) -> WorldRect {
        if !self.initialized {
            debug!(layer = %self.id, "extent queried before initialization");
            return WorldRect::new(0.0, 0.0, 1.0, 1.0);
        }
        self.transform.extent()
    }

    /// The persisted property block, refreshed on every commit.
    pub fn properties(&self) -> &LayerProperties {
        &self.properties
    }

    pub fn set_transparency(&mut self, transparency: u8) {
        self.transparency = transparency.min(100);
        self.refresh_properties();
    }

    pub fn increase_transparency(&mut self) {
        self.set_transparency(self.transparency.saturating_add(10));
    }

    pub fn decrease_transparency(&mut self) {
        self.set_transparency(self.transparency.saturating_sub(10));
    }

    pub fn set_blend_mode(&mut self, blend_mode: BlendMode) {
        self.blend_mode = blend_mode;
        self.refresh_properties();
    }

    /// Sets the blend mode by persisted name, falling back to the default
    /// for unknown names.
    pub fn set_blend_mode_by_name(&mut self, name: &str) {
        self.set_blend_mode(BlendMode::from_name_or_default(name));
    }

    /// The numeric rotation control path: records an undo entry, applies
    /// the value, and commits.
    pub fn apply_rotation(&mut self, rotation: f64) {
        self.history.push(HistoryEntry::Rotation {
            rotation: self.transform.rotation(),
            center: self.transform.center(),
        });
        self.transform.set_rotation(rotation);
        self.commit_transform_parameters();
    }

    /// Keeps the layer over the same map region when the map CRS changes:
    /// the center is reprojected, the scale re-derived from the reprojected
    /// extent, and the rotation kept.
    pub fn reproject_transform_parameters(&mut self, crs_transform: &dyn CoordinateTransform) {
        let new_center = crs_transform.transform_point(self.transform.center());
        let new_extent = crs_transform.transform_rect(self.extent());
        self.transform.set_center(new_center);
        self.transform
            .reset_scale(new_extent.width(), new_extent.height());
        self.commit_transform_parameters();
    }

    /// Pops the most recent history entry and restores the fields it
    /// carries. Returns `false` when the history is empty.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(entry) => {
                entry.restore(&mut self.transform);
                self.commit_transform_parameters();
                true
            }
            None => false,
        }
    }

    fn refresh_properties(&mut self) {
        let params = self.transform.parameters();
        self.properties = LayerProperties {
            title: self.title.clone(),
            filepath: self.filepath.to_string_lossy().into_owned(),
            x_scale: params.x_scale,
            y_scale: params.y_scale,
            rotation: params.rotation,
            x_center: params.center.x,
            y_center: params.center.y,
            transparency: self.transparency,
            blend_mode: self.blend_mode.name().to_string(),
        };
    }
}

impl std::fmt::Debug for RasterLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterLayer")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("filepath", &self.filepath)
            .field("initialized", &self.initialized)
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use georefkit_core::Point;
    use image::RgbaImage;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn test_layer() -> RasterLayer {
        RasterLayer::with_image(RasterImage::from_rgba(RgbaImage::new(10, 10)), "scan")
    }

    #[test]
    fn test_initialize_from_screen_extent() {
        let mut layer = test_layer();
        layer.initialized = false;
        layer
            .initialize(Some(WorldRect::new(0.0, 0.0, 200.0, 100.0)), None)
            .unwrap();
        assert_eq!(layer.transform().center(), Point::new(100.0, 50.0));
        // Height ratio 10 is smaller than width ratio 20
        assert_eq!(layer.transform().x_scale(), 10.0);
        assert_eq!(layer.transform().y_scale(), 10.0);
    }

    #[test]
    fn test_initialize_prefers_existing_georef() {
        let mut layer = test_layer();
        layer.initialized = false;
        let georef = GeoTransform::axis_aligned(2.0, -3.0, 100.0, 200.0);
        layer
            .initialize(Some(WorldRect::new(0.0, 0.0, 200.0, 100.0)), Some(&georef))
            .unwrap();
        assert_eq!(layer.transform().x_scale(), 2.0);
        assert_eq!(layer.transform().y_scale(), 3.0);
    }

    #[test]
    fn test_default_georef_is_ignored() {
        let mut layer = test_layer();
        layer.initialized = false;
        let placeholder = GeoTransform::axis_aligned(1.0, 1.0, 0.0, 0.0);
        layer
            .initialize(
                Some(WorldRect::new(0.0, 0.0, 200.0, 100.0)),
                Some(&placeholder),
            )
            .unwrap();
        // Fell through to the screen-extent placement
        assert_eq!(layer.transform().center(), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_load_error_state_and_recovery() {
        let mut layer = RasterLayer::new("/nonexistent/scan.png", "scan");
        assert!(layer.initialize(None, None).is_err());
        assert!(layer.has_error());
        // Further attempts are suppressed
        assert!(matches!(
            layer.initialize(None, None),
            Err(LayerError::Errored { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        RgbaImage::new(4, 4).save(&path).unwrap();
        layer.correct_filepath(&path);
        assert!(layer.initialize(None, None).is_ok());
        assert!(layer.is_initialized());
        assert!(!layer.has_error());
    }

    #[test]
    fn test_commit_notifies_observers() {
        let mut layer = test_layer();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        layer.subscribe_transform_changes(move |params| {
            sink.borrow_mut().push(params.rotation);
        });

        layer.transform_mut().set_rotation(45.0);
        layer.commit_transform_parameters();
        assert_eq!(*seen.borrow(), vec![45.0]);
    }

    #[test]
    fn test_properties_roundtrip_reconstructs_layer() {
        let mut layer = test_layer();
        layer.transform_mut().set_center(Point::new(12.5, -7.25));
        layer.transform_mut().set_rotation(33.125);
        layer.transform_mut().set_scale(1.5, 2.5);
        layer.set_transparency(60);
        layer.set_blend_mode(BlendMode::Multiply);
        layer.commit_transform_parameters();

        let json = serde_json::to_string(layer.properties()).unwrap();
        let props: LayerProperties = serde_json::from_str(&json).unwrap();
        let restored = RasterLayer::from_properties(&props);

        assert_eq!(restored.transform().center(), Point::new(12.5, -7.25));
        assert_eq!(restored.transform().rotation(), 33.125);
        assert_eq!(restored.transform().x_scale(), 1.5);
        assert_eq!(restored.transform().y_scale(), 2.5);
        assert_eq!(restored.transparency(), 60);
        assert_eq!(restored.blend_mode(), BlendMode::Multiply);
    }

    #[test]
    fn test_transparency_clamps() {
        let mut layer = test_layer();
        layer.set_transparency(95);
        layer.increase_transparency();
        assert_eq!(layer.transparency(), 100);
        layer.set_transparency(5);
        layer.decrease_transparency();
        assert_eq!(layer.transparency(), 0);
    }

    #[test]
    fn test_apply_rotation_records_history() {
        let mut layer = test_layer();
        layer.apply_rotation(30.0);
        assert_eq!(layer.transform().rotation(), 30.0);
        assert!(layer.undo());
        assert_eq!(layer.transform().rotation(), 0.0);
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut layer = test_layer();
        assert!(!layer.undo());
    }

    #[test]
    fn test_duplicate_has_fresh_identity() {
        let layer = test_layer();
        let copy = layer.duplicate();
        assert_ne!(copy.id(), layer.id());
        assert_eq!(copy.transform().center(), layer.transform().center());
    }

    #[test]
    fn test_reproject_keeps_rotation() {
        struct Offset;
        impl CoordinateTransform for Offset {
            fn transform_point(&self, p: Point) -> Point {
                Point::new(p.x * 2.0, p.y * 2.0)
            }
        }

        let mut layer = test_layer();
        layer.transform_mut().set_rotation(15.0);
        layer.transform_mut().set_center(Point::new(10.0, 10.0));
        layer.commit_transform_parameters();
        layer.reproject_transform_parameters(&Offset);

        assert_eq!(layer.transform().center(), Point::new(20.0, 20.0));
        assert_eq!(layer.transform().rotation(), 15.0);
    }
}
