//! Registry of live raster layers.
//!
//! Owned by the application shell: one place mapping layer ids to layers,
//! with explicit add/remove/lookup and active-layer tracking. Removing the
//! active layer clears the active id.

use std::collections::HashMap;

use tracing::debug;

use crate::layer::{LayerId, RasterLayer};

/// Id-keyed store of layers plus the currently active one.
#[derive(Debug, Default)]
pub struct LayerRegistry {
    layers: HashMap<LayerId, RasterLayer>,
    active: Option<LayerId>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer and returns its id.
    pub fn add(&mut self, layer: RasterLayer) -> LayerId {
        let id = layer.id();
        debug!(layer = %id, title = layer.title(), "layer registered");
        self.layers.insert(id, layer);
        id
    }

    /// Removes a layer, clearing the active id if it pointed at it.
    pub fn remove(&mut self, id: LayerId) -> Option<RasterLayer> {
        if self.active == Some(id) {
            self.active = None;
        }
        let removed = self.layers.remove(&id);
        if removed.is_some() {
            debug!(layer = %id, "layer removed");
        }
        removed
    }

    pub fn get(&self, id: LayerId) -> Option<&RasterLayer> {
        self.layers.get(&id)
    }

    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut RasterLayer> {
        self.layers.get_mut(&id)
    }

    /// Marks a layer active. Returns `false` for unknown ids.
    pub fn set_active(&mut self, id: Option<LayerId>) -> bool {
        match id {
            Some(id) if !self.layers.contains_key(&id) => false,
            other => {
                self.active = other;
                true
            }
        }
    }

    pub fn active_id(&self) -> Option<LayerId> {
        self.active
    }

    pub fn active_layer(&self) -> Option<&RasterLayer> {
        self.active.and_then(|id| self.layers.get(&id))
    }

    pub fn active_layer_mut(&mut self) -> Option<&mut RasterLayer> {
        self.active.and_then(|id| self.layers.get_mut(&id))
    }

    pub fn ids(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
