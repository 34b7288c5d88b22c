//! Filter factory

use super::*;
use render_core::filter::*;
use std::sync::Arc;

/// Names accepted by `create_filter`.
pub const FILTER_NAMES: [&str; 8] = [
    "box",
    "triangle",
    "gaussian",
    "mitchell",
    "catmull-rom",
    "lanczos",
    "sinc",
    "blackman-harris",
];

/// Creates a filter by name using its default width. Names are case
/// insensitive; unknown names fall back to a box filter of width 1.
///
/// * `name` - Name of the filter.
pub fn create_filter(name: &str) -> ArcFilter {
    match name.trim().to_lowercase().as_str() {
        "box" => Arc::new(BoxFilter::default()),
        "triangle" => Arc::new(TriangleFilter::default()),
        "gaussian" => Arc::new(GaussianFilter::default()),
        "mitchell" => Arc::new(MitchellFilter::default()),
        "catmull-rom" => Arc::new(MitchellFilter::catmull_rom(MitchellFilter::DEFAULT_SIZE)),
        "lanczos" => Arc::new(LanczosFilter::default()),
        "sinc" => Arc::new(SincFilter::default()),
        "blackman-harris" => Arc::new(BlackmanHarrisFilter::default()),
        _ => {
            warn!("Unrecognized filter type: '{}' - using box", name);
            Arc::new(BoxFilter::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use render_core::common::*;
    use render_core::geometry::*;

    #[test]
    fn known_names_resolve() {
        let expected: [Float; 8] = [1.0, 2.0, 3.0, 4.0, 4.0, 4.0, 4.0, 4.0];
        for (name, size) in FILTER_NAMES.iter().zip(expected) {
            assert_eq!(create_filter(name).size(), size, "{}", name);
        }
        assert_eq!(create_filter("Gaussian").size(), 3.0);
    }

    #[test]
    fn unknown_falls_back_to_box() {
        let f = create_filter("bilinear");
        assert_eq!(f.size(), 1.0);
        assert_eq!(f.evaluate(&Point2f::new(0.2, -0.3)), 1.0);
    }

    #[test]
    fn kernels_peak_at_center() {
        for name in FILTER_NAMES {
            let f = create_filter(name);
            let center = f.evaluate(&Point2f::new(0.0, 0.0));
            assert!(center > 0.0, "{}", name);
            assert!(f.evaluate(&Point2f::new(0.25, 0.25)) <= center, "{}", name);
        }
    }

    proptest! {
        #[test]
        fn kernels_are_symmetric_and_finite(
            i in 0..FILTER_NAMES.len(),
            x in -1.0f32..1.0,
            y in -1.0f32..1.0,
        ) {
            let f = create_filter(FILTER_NAMES[i]);
            let h = f.size() * 0.5;
            let (px, py) = (x * h, y * h);
            let v = f.evaluate(&Point2f::new(px, py));
            prop_assert!(v.is_finite());
            let mirrored = f.evaluate(&Point2f::new(-px, -py));
            prop_assert!((v - mirrored).abs() <= 1e-5);
            let swapped = f.evaluate(&Point2f::new(py, px));
            prop_assert!((v - swapped).abs() <= 1e-5);
        }
    }
}
