//! Property tests for the placement transform.

use georefkit_core::Point;
use georefkit_raster::AffineTransformModel;
use proptest::prelude::*;

proptest! {
    /// Corner derivation round-trip: the midpoint of diagonal corners is
    /// always the center, for any placement.
    #[test]
    fn corners_midpoint_is_center(
        cx in -1.0e6_f64..1.0e6,
        cy in -1.0e6_f64..1.0e6,
        rotation in -180.0_f64..180.0,
        x_scale in 1.0e-3_f64..1.0e3,
        y_scale in 1.0e-3_f64..1.0e3,
        width in 1_u32..4000,
        height in 1_u32..4000,
    ) {
        let mut model = AffineTransformModel::new(width, height);
        model.set_center(Point::new(cx, cy));
        model.set_rotation(rotation);
        model.set_scale(x_scale, y_scale);

        let corners = model.corner_coordinates();
        let mid_a = corners[0].midpoint(&corners[2]);
        let mid_b = corners[1].midpoint(&corners[3]);

        let tolerance = 1e-9 * (1.0 + cx.abs().max(cy.abs()));
        prop_assert!((mid_a.x - cx).abs() < tolerance);
        prop_assert!((mid_a.y - cy).abs() < tolerance);
        prop_assert!((mid_b.x - cx).abs() < tolerance);
        prop_assert!((mid_b.y - cy).abs() < tolerance);
    }

    /// Normalizing a rotation twice equals normalizing it once. Inputs are
    /// a committed rotation plus a gesture delta, so they never exceed one
    /// wrap of ±360.
    #[test]
    fn rotation_normalization_is_idempotent(raw in -540.0_f64..540.0) {
        let mut model = AffineTransformModel::new(10, 10);
        model.set_rotation(raw);
        let once = model.rotation();
        prop_assert!((-180.0..=180.0).contains(&once));

        model.set_rotation(once);
        prop_assert_eq!(once.to_bits(), model.rotation().to_bits());
    }
}
