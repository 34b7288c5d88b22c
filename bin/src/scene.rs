//! Procedural test scene
//!
//! A ground plane with a checkerboard under an empty sky and a handful of
//! discs standing in front of it. Discs may move during the shutter interval
//! and sit at different depths around the focal plane, so the time and lens
//! parameters of each request produce motion blur and defocus.

use render_core::color::*;
use render_core::common::*;
use render_core::geometry::*;
use render_core::oracle::*;

/// Instance id of the ground plane.
const GROUND: InstanceId = 0;

/// A flat shaded disc.
#[derive(Copy, Clone, Debug)]
struct Disc {
    /// Center at the start of the shutter interval in pixels.
    center: Point2f,

    /// Offset of the center at the end of the shutter interval.
    motion: Point2f,

    /// Radius in pixels.
    radius: Float,

    /// Depth relative to the focal plane; 0 is in focus.
    depth: Float,

    /// Base color.
    color: Color,

    /// Instance id.
    instance: InstanceId,

    /// Shader id; discs without one are never refined at their silhouette
    /// against other shaderless geometry.
    shader: Option<ShaderId>,
}

impl Disc {
    /// Returns the hit for a raster position if it lies inside the disc.
    ///
    /// * `p`        - Raster position.
    /// * `time`     - Shutter time in [0, 1).
    /// * `lens`     - Lens position in [-1, 1)^2.
    /// * `aperture` - Blur radius in pixels per unit of depth.
    fn intersect(&self, p: Point2f, time: Float, lens: Point2f, aperture: Float) -> Option<SurfaceHit> {
        let center = Point2f::new(
            lerp(time, self.center.x, self.center.x + self.motion.x),
            lerp(time, self.center.y, self.center.y + self.motion.y),
        ) + lens * (aperture * self.depth);

        let d = (p - center) * (1.0 / self.radius);
        let d2 = d.x * d.x + d.y * d.y;
        if d2 >= 1.0 {
            return None;
        }

        // Shade as a hemisphere facing the viewer.
        let normal = Normal3f::new(d.x, d.y, (1.0 - d2).sqrt());
        let light = Normal3f::new(-0.4, -0.5, 0.77).normalize();
        let diffuse = max(0.0, normal.dot(&light));
        Some(SurfaceHit {
            color: self.color * (0.15 + 0.85 * diffuse),
            instance: self.instance,
            shader: self.shader,
            normal,
        })
    }
}

/// Analytic scene used by the command line renderer.
pub struct TestScene {
    /// Discs sorted from nearest to farthest.
    discs: Vec<Disc>,

    /// Raster y of the horizon; rows above it miss the scene.
    horizon: Float,

    /// Checker cell size in pixels.
    checker_size: Float,

    /// Blur radius in pixels per unit of depth.
    aperture: Float,
}

impl TestScene {
    /// Builds the scene for a given image resolution.
    ///
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    pub fn new(width: usize, height: usize) -> Self {
        let (w, h) = (width as Float, height as Float);
        let s = min(w, h);

        let mut discs = vec![
            Disc {
                center: Point2f::new(0.25 * w, 0.6 * h),
                motion: Point2f::new(0.0, 0.0),
                radius: 0.18 * s,
                depth: 0.0,
                color: Color::new(0.8, 0.2, 0.15),
                instance: 1,
                shader: Some(1),
            },
            Disc {
                center: Point2f::new(0.5 * w, 0.45 * h),
                motion: Point2f::new(0.12 * w, 0.0),
                radius: 0.12 * s,
                depth: 0.5,
                color: Color::new(0.2, 0.7, 0.25),
                instance: 2,
                shader: Some(2),
            },
            Disc {
                center: Point2f::new(0.78 * w, 0.7 * h),
                motion: Point2f::new(0.0, 0.0),
                radius: 0.15 * s,
                depth: -1.0,
                color: Color::new(0.2, 0.3, 0.9),
                instance: 3,
                shader: Some(1),
            },
            Disc {
                center: Point2f::new(0.62 * w, 0.25 * h),
                motion: Point2f::new(0.0, 0.05 * h),
                radius: 0.07 * s,
                depth: 0.2,
                color: Color::gray(0.9),
                instance: 4,
                shader: None,
            },
        ];
        discs.sort_by(|a, b| abs(a.depth).total_cmp(&abs(b.depth)));

        Self {
            discs,
            horizon: 0.35 * h,
            checker_size: max(4.0, 0.05 * s),
            aperture: 0.02 * s,
        }
    }

    /// Returns the hit on the ground plane, if any.
    ///
    /// * `p` - Raster position.
    fn ground(&self, p: Point2f) -> Option<SurfaceHit> {
        if p.y < self.horizon {
            return None;
        }
        let cx = (p.x / self.checker_size).floor() as i64;
        let cy = ((p.y - self.horizon) / self.checker_size).floor() as i64;
        let color = if (cx + cy) % 2 == 0 {
            Color::gray(0.7)
        } else {
            Color::gray(0.25)
        };
        Some(SurfaceHit {
            color,
            instance: GROUND,
            shader: Some(0),
            normal: Normal3f::new(0.0, -1.0, 0.0),
        })
    }
}

impl RadianceOracle for TestScene {
    /// Returns the shaded hit for a request, or `None` if it missed the scene.
    ///
    /// * `request` - The sample request.
    fn radiance(&self, request: &SampleRequest) -> Option<SurfaceHit> {
        let p = Point2f::new(request.x, request.y);
        let time = request.time as Float;
        let lens = Point2f::new(
            2.0 * request.lens_u as Float - 1.0,
            2.0 * request.lens_v as Float - 1.0,
        );
        self.discs
            .iter()
            .find_map(|disc| disc.intersect(p, time, lens, self.aperture))
            .or_else(|| self.ground(p))
    }
}
