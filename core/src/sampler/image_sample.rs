//! Image Samples

use crate::color::*;
use crate::common::*;
use crate::geometry::*;
use crate::oracle::*;

/// Cosine below which two shading normals are considered different.
const NORMAL_DOT_THRESHOLD: Float = 0.9;

/// What a sample hit; used to detect geometric and shading edges.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Owner {
    /// Instance that was hit.
    pub instance: InstanceId,

    /// Shader of the hit, if any.
    pub shader: Option<ShaderId>,

    /// Shading normal at the hit.
    pub normal: Normal3f,
}

impl From<&SurfaceHit> for Owner {
    /// Extract the owner of a surface hit.
    ///
    /// * `hit` - The surface hit.
    fn from(hit: &SurfaceHit) -> Self {
        Self {
            instance: hit.instance,
            shader: hit.shader,
            normal: hit.normal,
        }
    }
}

/// The result of tracing an image sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Radiance, averaged over all super samples.
    pub color: Color,

    /// What the first ray hit; `None` for a miss.
    pub owner: Option<Owner>,
}

impl Evaluation {
    /// Returns true if two evaluated samples straddle an edge and the cell
    /// between them needs refinement.
    ///
    /// * `other`  - The other sample.
    /// * `thresh` - Relative contrast threshold.
    pub fn is_different(&self, other: &Evaluation, thresh: Float) -> bool {
        match (&self.owner, &other.owner) {
            (None, None) => false,
            (Some(_), None) | (None, Some(_)) => true,
            (Some(a), Some(b)) => {
                if a.instance != b.instance || a.shader != b.shader {
                    true
                } else if a.shader.is_none() {
                    false
                } else {
                    self.color.has_contrast(&other.color, thresh) || a.normal.dot(&b.normal) < NORMAL_DOT_THRESHOLD
                }
            }
        }
    }
}

/// Progress of an image sample through adaptive refinement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SampleStatus {
    /// Not computed yet.
    Unevaluated,

    /// Traced through the radiance oracle.
    Evaluated(Evaluation),

    /// Bilinearly interpolated from the corners of a cell.
    Interpolated(Color),
}

/// A sample on the subpixel grid of a bucket.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImageSample {
    /// Raster space position.
    pub p: Point2f,

    /// Index into the QMC sequences.
    pub index: u32,

    /// Refinement status.
    pub status: SampleStatus,
}

impl ImageSample {
    /// Create a new unevaluated `ImageSample`.
    ///
    /// * `p`     - Raster space position.
    /// * `index` - Index into the QMC sequences.
    pub fn new(p: Point2f, index: u32) -> Self {
        Self {
            p,
            index,
            status: SampleStatus::Unevaluated,
        }
    }

    /// Returns true if the sample was traced.
    pub fn is_evaluated(&self) -> bool {
        matches!(self.status, SampleStatus::Evaluated(_))
    }

    /// Returns true if the sample has a color, traced or interpolated.
    pub fn is_processed(&self) -> bool {
        !matches!(self.status, SampleStatus::Unevaluated)
    }

    /// Returns the sample color if it has one.
    pub fn color(&self) -> Option<Color> {
        match self.status {
            SampleStatus::Unevaluated => None,
            SampleStatus::Evaluated(e) => Some(e.color),
            SampleStatus::Interpolated(c) => Some(c),
        }
    }
}

/// Bilinearly interpolate the corners of a cell.
///
/// * `c00` - Color at (0, 0).
/// * `c01` - Color at (0, 1).
/// * `c10` - Color at (1, 0).
/// * `c11` - Color at (1, 1).
/// * `dx`  - Horizontal offset in [0, 1].
/// * `dy`  - Vertical offset in [0, 1].
pub fn bilerp(c00: &Color, c01: &Color, c10: &Color, c11: &Color, dx: Float, dy: Float) -> Color {
    let k00 = (1.0 - dx) * (1.0 - dy);
    let k01 = (1.0 - dx) * dy;
    let k10 = dx * (1.0 - dy);
    let k11 = dx * dy;

    let mut c = Color::BLACK;
    c.madd(k00, c00);
    c.madd(k01, c01);
    c.madd(k10, c10);
    c.madd(k11, c11);
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(color: Color, instance: InstanceId, shader: Option<ShaderId>, normal: Normal3f) -> Evaluation {
        Evaluation {
            color,
            owner: Some(Owner {
                instance,
                shader,
                normal,
            }),
        }
    }

    const UP: Normal3f = Normal3f { x: 0.0, y: 0.0, z: 1.0 };

    #[test]
    fn misses_are_alike() {
        let miss = Evaluation {
            color: Color::BLACK,
            owner: None,
        };
        assert!(!miss.is_different(&miss, 0.1));
    }

    #[test]
    fn hit_and_miss_differ() {
        let miss = Evaluation {
            color: Color::BLACK,
            owner: None,
        };
        let h = hit(Color::BLACK, 1, Some(1), UP);
        assert!(h.is_different(&miss, 0.1));
        assert!(miss.is_different(&h, 0.1));
    }

    #[test]
    fn instance_and_shader_changes_differ() {
        let a = hit(Color::WHITE, 1, Some(1), UP);
        assert!(a.is_different(&hit(Color::WHITE, 2, Some(1), UP), 0.1));
        assert!(a.is_different(&hit(Color::WHITE, 1, Some(2), UP), 0.1));
        assert!(a.is_different(&hit(Color::WHITE, 1, None, UP), 0.1));
    }

    #[test]
    fn shaderless_hits_never_differ_by_color() {
        let a = hit(Color::WHITE, 1, None, UP);
        let b = hit(Color::BLACK, 1, None, Normal3f::new(1.0, 0.0, 0.0));
        assert!(!a.is_different(&b, 0.1));
    }

    #[test]
    fn contrast_and_normals() {
        let a = hit(Color::gray(0.5), 1, Some(1), UP);
        assert!(!a.is_different(&hit(Color::gray(0.52), 1, Some(1), UP), 0.1));
        assert!(a.is_different(&hit(Color::gray(1.0), 1, Some(1), UP), 0.1));
        assert!(!a.is_different(&hit(Color::gray(1.0), 1, Some(1), UP), 0.5));

        let tilted = Normal3f::new(0.6, 0.0, 0.8);
        assert!(a.is_different(&hit(Color::gray(0.5), 1, Some(1), tilted), 0.1));
    }

    #[test]
    fn bilerp_weights() {
        let c00 = Color::gray(0.0);
        let c01 = Color::gray(1.0);
        let c10 = Color::gray(2.0);
        let c11 = Color::gray(3.0);
        assert_eq!(bilerp(&c00, &c01, &c10, &c11, 0.0, 0.0), c00);
        assert_eq!(bilerp(&c00, &c01, &c10, &c11, 0.0, 1.0), c01);
        assert_eq!(bilerp(&c00, &c01, &c10, &c11, 1.0, 0.0), c10);
        assert_eq!(bilerp(&c00, &c01, &c10, &c11, 1.0, 1.0), c11);
        assert_eq!(bilerp(&c00, &c01, &c10, &c11, 0.5, 0.5), Color::gray(1.5));
    }

    #[test]
    fn status_queries() {
        let mut s = ImageSample::new(Point2f::new(0.5, 0.5), 3);
        assert!(!s.is_processed());
        assert_eq!(s.color(), None);

        s.status = SampleStatus::Interpolated(Color::WHITE);
        assert!(s.is_processed());
        assert!(!s.is_evaluated());
        assert_eq!(s.color(), Some(Color::WHITE));

        s.status = SampleStatus::Evaluated(hit(Color::BLACK, 0, None, UP));
        assert!(s.is_evaluated());
        assert_eq!(s.color(), Some(Color::BLACK));
    }
}
