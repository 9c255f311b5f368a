//! Single-step undo for transform gestures.
//!
//! Each gesture pushes a snapshot of its pre-state at gesture *start*; undo
//! pops and restores. The entry is a sum type with one variant per action
//! kind, carrying exactly the fields that kind can alter — undo can never
//! read a field the gesture did not capture.

use georefkit_core::Point;

use crate::transform::AffineTransformModel;

/// Maximum retained entries; the oldest entry is dropped beyond this.
const MAX_HISTORY: usize = 50;

/// Pre-gesture snapshot, tagged by the action that pushed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HistoryEntry {
    /// Move gesture: only the center changes.
    Move { center: Point },
    /// Scale gesture: only the scale factors change.
    Scale { x_scale: f64, y_scale: f64 },
    /// Rotation gesture: rotation, and center when rotating around a point.
    Rotation { rotation: f64, center: Point },
    /// Side adjustment: center and scale factors change together.
    Adjust {
        center: Point,
        x_scale: f64,
        y_scale: f64,
    },
    /// First phase of two-point georeferencing: a pure translation.
    TwoPointsA { center: Point },
    /// Second phase of two-point georeferencing: everything but the image.
    TwoPointsB {
        rotation: f64,
        center: Point,
        x_scale: f64,
        y_scale: f64,
    },
}

impl HistoryEntry {
    /// Restores the captured fields into the model. Values are copied back
    /// verbatim, never re-derived.
    pub fn restore(&self, transform: &mut AffineTransformModel) {
        match *self {
            HistoryEntry::Move { center } | HistoryEntry::TwoPointsA { center } => {
                transform.set_center(center);
            }
            HistoryEntry::Scale { x_scale, y_scale } => {
                transform.set_scale(x_scale, y_scale);
            }
            HistoryEntry::Rotation { rotation, center } => {
                transform.set_rotation(rotation);
                transform.set_center(center);
            }
            HistoryEntry::Adjust {
                center,
                x_scale,
                y_scale,
            } => {
                transform.set_center(center);
                transform.set_scale(x_scale, y_scale);
            }
            HistoryEntry::TwoPointsB {
                rotation,
                center,
                x_scale,
                y_scale,
            } => {
                transform.set_rotation(rotation);
                transform.set_center(center);
                transform.set_scale(x_scale, y_scale);
            }
        }
    }
}

/// Stack of pre-gesture snapshots.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a pre-gesture snapshot. Dropping the oldest entry beyond the
    /// cap bounds memory without changing single-step undo behavior.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        if self.entries.len() > MAX_HISTORY {
            self.entries.remove(0);
        }
    }

    /// Pops the most recent snapshot. Also used to discard a speculative
    /// entry when a gesture aborts.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_per_kind_touches_only_captured_fields() {
        let mut transform = AffineTransformModel::new(10, 10);
        transform.set_center(Point::new(5.0, 5.0));
        transform.set_rotation(45.0);
        transform.set_scale(2.0, 3.0);

        // Scale restore leaves center and rotation alone
        HistoryEntry::Scale {
            x_scale: 1.0,
            y_scale: 1.0,
        }
        .restore(&mut transform);
        assert_eq!(transform.x_scale(), 1.0);
        assert_eq!(transform.y_scale(), 1.0);
        assert_eq!(transform.center(), Point::new(5.0, 5.0));
        assert_eq!(transform.rotation(), 45.0);

        // Move restore leaves rotation and scale alone
        HistoryEntry::Move {
            center: Point::new(0.0, 0.0),
        }
        .restore(&mut transform);
        assert_eq!(transform.center(), Point::new(0.0, 0.0));
        assert_eq!(transform.rotation(), 45.0);
    }

    #[test]
    fn test_restore_is_bit_exact() {
        let mut transform = AffineTransformModel::new(10, 10);
        let captured = 0.1 + 0.2; // not representable exactly
        HistoryEntry::Scale {
            x_scale: captured,
            y_scale: captured,
        }
        .restore(&mut transform);
        assert_eq!(transform.x_scale().to_bits(), captured.to_bits());
    }

    #[test]
    fn test_stack_order_and_cap() {
        let mut stack = HistoryStack::new();
        for i in 0..60 {
            stack.push(HistoryEntry::Move {
                center: Point::new(f64::from(i), 0.0),
            });
        }
        assert_eq!(stack.len(), 50);
        // Most recent first
        assert_eq!(
            stack.pop(),
            Some(HistoryEntry::Move {
                center: Point::new(59.0, 0.0)
            })
        );
        // The oldest 10 were dropped
        let mut bottom = None;
        while let Some(entry) = stack.pop() {
            bottom = Some(entry);
        }
        assert_eq!(
            bottom,
            Some(HistoryEntry::Move {
                center: Point::new(10.0, 0.0)
            })
        );
    }
}
