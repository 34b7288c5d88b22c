//! Radiance Oracle

use crate::color::*;
use crate::common::*;
use crate::geometry::*;
use std::fmt;

/// Identifies the object instance a sample landed on.
pub type InstanceId = u32;

/// Identifies the shader that produced a sample's color.
pub type ShaderId = u32;

/// A request for the radiance arriving through one image-space position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SampleRequest {
    /// Raster x-coordinate in pixels.
    pub x: Float,

    /// Raster y-coordinate in pixels. Row 0 is the top of the image and y
    /// grows downwards, matching the display. Cameras that expect y to grow
    /// upwards must use `height - y`.
    pub y: Float,

    /// Lens u-coordinate in [0, 1).
    pub lens_u: f64,

    /// Lens v-coordinate in [0, 1).
    pub lens_v: f64,

    /// Shutter time in [0, 1).
    pub time: f64,

    /// QMC sequence index for decorrelating any further sampling done by
    /// the oracle.
    pub seed: u32,
}

impl fmt::Display for SampleRequest {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) lens ({}, {}) time {} seed {}",
            self.x, self.y, self.lens_u, self.lens_v, self.time, self.seed
        )
    }
}

/// The shaded result of a request that hit the scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceHit {
    /// Radiance.
    pub color: Color,

    /// Instance that was hit.
    pub instance: InstanceId,

    /// Shader that produced `color`, if the instance has one.
    pub shader: Option<ShaderId>,

    /// Shading normal at the hit point.
    pub normal: Normal3f,
}

/// Turns sample requests into radiance. Called concurrently by every render
/// worker; for deterministic images the result must depend only on the
/// request.
pub trait RadianceOracle: Send + Sync {
    /// Returns the shaded hit for a request, or `None` if it missed the scene.
    ///
    /// * `request` - The sample request.
    fn radiance(&self, request: &SampleRequest) -> Option<SurfaceHit>;
}

impl<F> RadianceOracle for F
where
    F: Fn(&SampleRequest) -> Option<SurfaceHit> + Send + Sync,
{
    fn radiance(&self, request: &SampleRequest) -> Option<SurfaceHit> {
        self(request)
    }
}
