//! 2D phase unwrapping
//!
//! Quality guided unwrapping by sorting the reliability of the edges between neighboring pixels
//! (M. A. Herráez et al., "Fast two-dimensional phase-unwrapping algorithm based on sorting by
//! reliability following a noncontinuous path", Applied Optics 41(35), 2002).
//!
//! The reliability of a pixel is the inverse of the wrapped second differences with its 8
//! neighbors. Edges are processed from the most to the least reliable one, each edge merging the
//! groups of its two pixels after the 2π ambiguity between them has been resolved.

use nalgebra::DMatrix;
use std::f64::consts::{PI, TAU};

use crate::{check_shape, DotfError, Map, Result};

// second differences reliability of pixels on the border of the valid domain
const UNRELIABLE: f64 = 1e9;

#[inline]
fn wrap(x: f64) -> f64 {
    x - TAU * (x / TAU).round()
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    reliability: f64,
    pixels: (usize, usize),
}

/// Wrapped phase map with an optional domain of valid pixels
struct Wrapped<'a> {
    phase: &'a Map,
    mask: Option<&'a DMatrix<bool>>,
    n_rows: usize,
    n_cols: usize,
}
impl<'a> Wrapped<'a> {
    fn index(&self, i: usize, j: usize) -> usize {
        i * self.n_cols + j
    }
    fn is_valid(&self, i: usize, j: usize) -> bool {
        self.mask.map_or(true, |mask| mask[(i, j)])
    }
    /// Sum of the squared wrapped second differences in the 4 directions
    fn second_differences(&self, i: usize, j: usize) -> f64 {
        if i == 0 || j == 0 || i + 1 >= self.n_rows || j + 1 >= self.n_cols {
            return UNRELIABLE;
        }
        let neighbors_are_valid = (i - 1..=i + 1)
            .flat_map(|k| (j - 1..=j + 1).map(move |l| (k, l)))
            .all(|(k, l)| self.is_valid(k, l));
        if !neighbors_are_valid {
            return UNRELIABLE;
        }
        let p = |k: usize, l: usize| self.phase[(k, l)];
        let center = p(i, j);
        let second = |a: f64, b: f64| wrap(a - center) - wrap(center - b);
        let h = second(p(i, j - 1), p(i, j + 1));
        let v = second(p(i - 1, j), p(i + 1, j));
        let d1 = second(p(i - 1, j - 1), p(i + 1, j + 1));
        let d2 = second(p(i - 1, j + 1), p(i + 1, j - 1));
        h * h + v * v + d1 * d1 + d2 * d2
    }
    fn edges(&self, quality: &[f64]) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(2 * self.n_rows * self.n_cols);
        for i in 0..self.n_rows {
            for j in 0..self.n_cols {
                if !self.is_valid(i, j) {
                    continue;
                }
                let p = self.index(i, j);
                let mut push = |k: usize, l: usize| {
                    if self.is_valid(k, l) {
                        let q = self.index(k, l);
                        edges.push(Edge {
                            reliability: quality[p] + quality[q],
                            pixels: (p, q),
                        });
                    }
                };
                if j + 1 < self.n_cols {
                    push(i, j + 1);
                }
                if i + 1 < self.n_rows {
                    push(i + 1, j);
                }
            }
        }
        edges
    }
}

/// Unwraps a 2D phase map
///
/// Only the pixels selected by `mask` are unwrapped, the others are set to 0 in the returned map.
/// Disconnected regions of the mask are unwrapped independently of each other.
pub fn unwrap_phase(wrapped: &Map, mask: Option<&DMatrix<bool>>) -> Result<Map> {
    if let Some(mask) = mask {
        check_shape(wrapped, mask)?;
    }
    let (n_rows, n_cols) = wrapped.shape();
    let domain = Wrapped {
        phase: wrapped,
        mask,
        n_rows,
        n_cols,
    };

    let mut value = vec![0f64; n_rows * n_cols];
    let mut quality = vec![UNRELIABLE; n_rows * n_cols];
    for i in 0..n_rows {
        for j in 0..n_cols {
            if !domain.is_valid(i, j) {
                continue;
            }
            let phase = wrapped[(i, j)];
            if !phase.is_finite() {
                return Err(DotfError::NonFinitePhase);
            }
            let k = domain.index(i, j);
            value[k] = phase;
            quality[k] = domain.second_differences(i, j);
        }
    }

    let mut edges = domain.edges(&quality);
    edges.sort_by(|a, b| a.reliability.total_cmp(&b.reliability));
    log::debug!("unwrapping {} edges", edges.len());

    // every pixel starts in its own group
    let mut group: Vec<usize> = (0..value.len()).collect();
    let mut members: Vec<Vec<usize>> = (0..value.len()).map(|k| vec![k]).collect();
    let mut increment = vec![0i64; value.len()];
    for Edge { pixels: (p, q), .. } in edges {
        let (gp, gq) = (group[p], group[q]);
        if gp == gq {
            continue;
        }
        // number of 2π to add to q for it to be within π of p
        let k = ((value[p] - value[q]) / TAU).round() as i64;
        let delta = increment[p] + k - increment[q];
        let (from, into, delta) = if members[gq].len() <= members[gp].len() {
            (gq, gp, delta)
        } else {
            (gp, gq, -delta)
        };
        let moved = std::mem::take(&mut members[from]);
        for &m in &moved {
            increment[m] += delta;
            group[m] = into;
        }
        members[into].extend(moved);
    }

    Ok(Map::from_fn(n_rows, n_cols, |i, j| {
        if domain.is_valid(i, j) {
            let k = domain.index(i, j);
            value[k] + TAU * increment[k] as f64
        } else {
            0.
        }
    }))
}

/// Wraps a phase map into ]-π,π]
pub fn wrap_phase(phase: &Map) -> Map {
    phase.map(|p| {
        let w = wrap(p);
        if w <= -PI {
            w + TAU
        } else {
            w
        }
    })
}
