//! Gradient voting and circle extraction.
//!
//! Each edge pixel votes along +gradient and -gradient for centers at
//! distances in `[r_min, r_max]`, one vote per accumulator cell crossed. The
//! accumulator is summed over 3x3 cells before peak search so a circle whose
//! votes straddle a cell boundary still produces a single strong peak.

use petanque_core::Circle;

use crate::{EdgeMap, HoughParams};

/// Votes for one smoothed frame. Built once, extracted at any threshold.
#[derive(Clone, Debug)]
pub struct HoughVotes {
    edges: EdgeMap,
    cell: f32,
    acc_w: usize,
    acc_h: usize,
    votes: Vec<u32>,
    smoothed: Vec<u32>,
    r_min: f32,
    r_max: f32,
    min_dist: f32,
    min_rim_coverage: f32,
}

#[derive(Clone, Copy, Debug)]
struct Peak {
    index: usize,
    score: u32,
}

impl HoughVotes {
    /// Cast all votes for the given edge map.
    pub fn accumulate(edges: EdgeMap, params: &HoughParams) -> Self {
        let cell = params.cell_size();
        let (r_min, r_max) = params.radius_band(edges.width);
        let acc_w = ((edges.width as f32 / cell).ceil() as usize).max(1);
        let acc_h = ((edges.height as f32 / cell).ceil() as usize).max(1);
        let mut votes = vec![0u32; acc_w * acc_h];

        let steps = ((r_max - r_min) / cell).floor() as usize + 1;

        for p in &edges.points {
            let mag = p.gx.hypot(p.gy);
            if mag <= f32::EPSILON {
                continue;
            }
            let ux = p.gx / mag;
            let uy = p.gy / mag;
            let (px, py) = (p.x as f32, p.y as f32);

            for sign in [1.0f32, -1.0] {
                let mut last = usize::MAX;
                for k in 0..steps {
                    let t = sign * (r_min + k as f32 * cell);
                    let cx = (px + t * ux) / cell;
                    let cy = (py + t * uy) / cell;
                    if cx < 0.0 || cy < 0.0 {
                        break;
                    }
                    let (ix, iy) = (cx as usize, cy as usize);
                    if ix >= acc_w || iy >= acc_h {
                        break;
                    }
                    let idx = iy * acc_w + ix;
                    if idx != last {
                        votes[idx] += 1;
                        last = idx;
                    }
                }
            }
        }

        let smoothed = box_sum_3x3(&votes, acc_w, acc_h);

        Self {
            cell,
            acc_w,
            acc_h,
            votes,
            smoothed,
            r_min,
            r_max,
            min_dist: params.min_dist(edges.width),
            min_rim_coverage: params.min_rim_coverage.max(0.0),
            edges,
        }
    }

    /// Largest smoothed vote count in the accumulator.
    pub fn max_votes(&self) -> u32 {
        self.smoothed.iter().copied().max().unwrap_or(0)
    }

    /// Extract circles whose center votes and rim support both reach
    /// `threshold`. Circles come out strongest center first.
    pub fn extract(&self, threshold: u32) -> Vec<Circle> {
        let threshold = threshold.max(1);
        let mut peaks = self.peaks(threshold);
        peaks.sort_by(|a, b| b.score.cmp(&a.score));

        let mut circles: Vec<Circle> = Vec::new();
        for peak in peaks {
            let (cx, cy) = self.refine_center(peak.index);
            if circles
                .iter()
                .any(|c| (c.x - cx).hypot(c.y - cy) < self.min_dist)
            {
                continue;
            }
            if let Some(r) = self.estimate_radius(cx, cy, threshold) {
                circles.push(Circle::new(cx, cy, r));
            }
        }
        circles
    }

    // Local maxima of the smoothed accumulator. Ties resolve toward the
    // earlier cell in raster order.
    fn peaks(&self, threshold: u32) -> Vec<Peak> {
        let (w, h) = (self.acc_w, self.acc_h);
        let mut out = Vec::new();
        for y in 0..h {
            for x in 0..w {
                let i = y * w + x;
                let s = self.smoothed[i];
                if s < threshold {
                    continue;
                }
                let mut is_max = true;
                'nbr: for dy in -1i32..=1 {
                    for dx in -1i32..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                            continue;
                        }
                        let j = ny as usize * w + nx as usize;
                        let n = self.smoothed[j];
                        if n > s || (n == s && j < i) {
                            is_max = false;
                            break 'nbr;
                        }
                    }
                }
                if is_max {
                    out.push(Peak { index: i, score: s });
                }
            }
        }
        out
    }

    // Vote-weighted centroid of the 3x3 raw neighborhood, in pixels.
    fn refine_center(&self, index: usize) -> (f32, f32) {
        let (x, y) = ((index % self.acc_w) as i32, (index / self.acc_w) as i32);
        let mut sw = 0.0f32;
        let mut sx = 0.0f32;
        let mut sy = 0.0f32;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 || nx >= self.acc_w as i32 || ny >= self.acc_h as i32 {
                    continue;
                }
                let v = self.votes[ny as usize * self.acc_w + nx as usize] as f32;
                sw += v;
                sx += v * (nx as f32 + 0.5);
                sy += v * (ny as f32 + 0.5);
            }
        }
        if sw <= 0.0 {
            return ((x as f32 + 0.5) * self.cell, (y as f32 + 0.5) * self.cell);
        }
        (sx / sw * self.cell, sy / sw * self.cell)
    }

    // Histogram edge distances in 1 px bins and pick the 3-bin window with
    // the best support per unit radius.
    fn estimate_radius(&self, cx: f32, cy: f32, threshold: u32) -> Option<f32> {
        let n_bins = (self.r_max - self.r_min).floor() as usize + 1;
        let mut counts = vec![0u32; n_bins];
        let mut sums = vec![0.0f32; n_bins];

        for p in &self.edges.points {
            let dx = p.x as f32 - cx;
            if dx.abs() > self.r_max {
                continue;
            }
            let dy = p.y as f32 - cy;
            if dy.abs() > self.r_max {
                continue;
            }
            let d = dx.hypot(dy);
            if d < self.r_min || d > self.r_max {
                continue;
            }
            let bin = ((d - self.r_min) as usize).min(n_bins - 1);
            counts[bin] += 1;
            sums[bin] += d;
        }

        let mut best: Option<(usize, u32, f32)> = None; // (bin, support, score)
        for k in 0..n_bins {
            let lo = k.saturating_sub(1);
            let hi = (k + 1).min(n_bins - 1);
            let support: u32 = counts[lo..=hi].iter().sum();
            if support == 0 {
                continue;
            }
            let r = self.r_min + k as f32 + 0.5;
            let score = support as f32 / r;
            if best.map(|b| score > b.2).unwrap_or(true) {
                best = Some((k, support, score));
            }
        }

        let (k, support, _) = best?;
        let lo = k.saturating_sub(1);
        let hi = (k + 1).min(n_bins - 1);
        let radius = sums[lo..=hi].iter().sum::<f32>() / support as f32;

        let circumference = std::f32::consts::TAU * radius;
        if support < threshold || (support as f32) < self.min_rim_coverage * circumference {
            return None;
        }
        Some(radius)
    }
}

fn box_sum_3x3(src: &[u32], w: usize, h: usize) -> Vec<u32> {
    let mut rows = vec![0u32; w * h];
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let mut s = src[i];
            if x > 0 {
                s += src[i - 1];
            }
            if x + 1 < w {
                s += src[i + 1];
            }
            rows[i] = s;
        }
    }
    let mut out = vec![0u32; w * h];
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let mut s = rows[i];
            if y > 0 {
                s += rows[i - w];
            }
            if y + 1 < h {
                s += rows[i + w];
            }
            out[i] = s;
        }
    }
    out
}
