use crate::{sample_bilinear_rgb, RgbImage, RgbImageView};
use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};

/// Planar projective transform `p' ~ H * p`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity())
    }

    #[inline]
    pub fn apply(&self, p: Point2<f32>) -> Point2<f32> {
        let v = self.h * Vector3::new(p.x as f64, p.y as f64, 1.0);
        let w = v[2];
        Point2::new((v[0] / w) as f32, (v[1] / w) as f32)
    }

    pub fn inverse(&self) -> Option<Self> {
        self.h.try_inverse().map(Self::new)
    }
}

fn hartley_normalization(cx: f64, cy: f64, mean_dist: f64) -> Matrix3<f64> {
    let s = if mean_dist > 1e-12 {
        (2.0_f64).sqrt() / mean_dist
    } else {
        1.0
    };

    Matrix3::<f64>::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

// Translate to the centroid and scale so the mean distance is sqrt(2).
fn normalize_points4(pts: &[Point2<f32>; 4]) -> ([Point2<f64>; 4], Matrix3<f64>) {
    let n = 4.0_f64;
    let (mut cx, mut cy) = (0.0_f64, 0.0_f64);
    for p in pts {
        cx += p.x as f64;
        cy += p.y as f64;
    }
    cx /= n;
    cy /= n;

    let mut mean_dist = 0.0_f64;
    for p in pts {
        mean_dist += (p.x as f64 - cx).hypot(p.y as f64 - cy);
    }
    mean_dist /= n;

    let t = hartley_normalization(cx, cy, mean_dist);

    let mut out = [Point2::new(0.0_f64, 0.0_f64); 4];
    for (i, p) in pts.iter().enumerate() {
        let v = t * Vector3::new(p.x as f64, p.y as f64, 1.0);
        out[i] = Point2::new(v[0], v[1]);
    }

    (out, t)
}

/// Compute H such that `dst ~ H * src` from four point correspondences.
///
/// Point order must be consistent between `src` and `dst`. Returns `None` for
/// degenerate configurations (three collinear points, repeated points) or
/// non-finite input.
pub fn homography_from_4pt(src: &[Point2<f32>; 4], dst: &[Point2<f32>; 4]) -> Option<Homography> {
    if src
        .iter()
        .chain(dst.iter())
        .any(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        return None;
    }

    // Unknowns: [h11 h12 h13 h21 h22 h23 h31 h32], with h33 = 1
    // h11 x + h12 y + h13 - u h31 x - u h32 y = u
    // h21 x + h22 y + h23 - v h31 x - v h32 y = v
    let (src_n, t_src) = normalize_points4(src);
    let (dst_n, t_dst) = normalize_points4(dst);

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for k in 0..4 {
        let (x, y) = (src_n[k].x, src_n[k].y);
        let (u, v) = (dst_n[k].x, dst_n[k].y);

        let r0 = 2 * k;
        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -u * x;
        a[(r0, 7)] = -u * y;
        b[r0] = u;

        let r1 = 2 * k + 1;
        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -v * x;
        a[(r1, 7)] = -v * y;
        b[r1] = v;
    }

    let lu = a.lu();
    if lu.determinant().abs() < 1e-10 {
        return None;
    }
    let x = lu.solve(&b)?;

    let hn = Matrix3::<f64>::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    );

    // H = T_dst^-1 * Hn * T_src
    let h = t_dst.try_inverse()? * hn * t_src;
    let s = h[(2, 2)];
    if s.abs() < 1e-12 || h.iter().any(|v| !v.is_finite()) {
        return None;
    }

    Some(Homography::new(h / s))
}

/// Warp an RGB frame: for each output pixel, map it into the source through
/// `h_src_from_dst` and sample bilinearly. Pixels that land outside the source
/// are set to `fill`.
pub fn warp_perspective_rgb(
    src: &RgbImageView<'_>,
    h_src_from_dst: &Homography,
    out_w: usize,
    out_h: usize,
    fill: [u8; 3],
) -> RgbImage {
    let mut out = Vec::with_capacity(out_w * out_h * 3);

    for y in 0..out_h {
        for x in 0..out_w {
            let q = h_src_from_dst.apply(Point2::new(x as f32, y as f32));
            let rgb = sample_bilinear_rgb(src, q.x, q.y).unwrap_or(fill);
            out.extend_from_slice(&rgb);
        }
    }

    RgbImage {
        width: out_w,
        height: out_h,
        data: out,
    }
}
