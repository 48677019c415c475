//! Matrix storage: triangular or rectangular over an active sub-rectangle,
//! with the per-collection metadata writers need to resolve absolute
//! indices back to labels and source tags.
//!
//! Contract:
//! - `triangular` holds exactly when the two ranges coincide; the stored
//!   half is the lower triangle including the diagonal.
//! - All index arithmetic canonicalizes through [`Geometry`], which both
//!   `get`/`set` and the compute driver share. Distinct in-range cells map
//!   to distinct linear indices.
//! - `labels` and `srcs` cover the full original collection, not just the
//!   active sub-rectangle.

use std::time::Duration;

use thiserror::Error;

use core_strings::StrValue;

use crate::range::{Range, SplitError, parse_split};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("matrix is not allocated")]
    Unallocated,
    #[error(transparent)]
    Split(#[from] SplitError),
}

/// Active shape of a matrix: the two ranges plus the triangular flag.
/// Shared by storage and the compute driver so the index maps cannot drift
/// apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub x: Range,
    pub y: Range,
    pub triangular: bool,
}

impl Geometry {
    fn new(x: Range, y: Range) -> Self {
        Self {
            x,
            y,
            triangular: x == y,
        }
    }

    /// Number of stored cells.
    pub fn size(&self) -> usize {
        if self.triangular {
            let k = self.x.len();
            k * (k + 1) / 2
        } else {
            self.x.len() * self.y.len()
        }
    }

    /// Linear index of cell `(x, y)` in absolute collection coordinates.
    ///
    /// Triangular shapes canonicalize to `(min, max)` first, with the single
    /// `k = x.len()` (the two ranges are equal by construction), so the
    /// mirror cell resolves to the same slot.
    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        debug_assert!(self.x.contains(x), "x {x} outside {:?}", self.x);
        debug_assert!(self.y.contains(y), "y {y} outside {:?}", self.y);
        if self.triangular {
            let k = self.x.len();
            let (xr, yr) = (x - self.x.start, y - self.y.start);
            let (i, j) = if xr <= yr { (xr, yr) } else { (yr, xr) };
            // Row i starts at i*k - i*(i-1)/2, written in a form that
            // cannot underflow at i = 0.
            (j - i) + i * (2 * k - i + 1) / 2
        } else {
            (x - self.x.start) + (y - self.y.start) * self.x.len()
        }
    }

    /// Inverse of [`Geometry::index_of`] over stored cells. For triangular
    /// shapes the returned pair is the lower-half orientation `(X, Y)` with
    /// `X >= Y`.
    pub fn cell_at(&self, t: usize) -> (usize, usize) {
        debug_assert!(t < self.size());
        if self.triangular {
            let k = self.x.len();
            // Row offsets grow as off(i) = i*k - i*(i-1)/2; solve for the
            // row then correct for floating error.
            let off = |i: usize| i * (2 * k - i + 1) / 2;
            let kk = (2 * k + 1) as f64;
            let mut i = ((kk - (kk * kk - (8 * t) as f64).sqrt()) / 2.0) as usize;
            i = i.min(k - 1);
            while off(i) > t {
                i -= 1;
            }
            while i + 1 < k && off(i + 1) <= t {
                i += 1;
            }
            let j = i + (t - off(i));
            (self.x.start + j, self.y.start + i)
        } else {
            let xl = self.x.len();
            (self.x.start + t % xl, self.y.start + t / xl)
        }
    }
}

/// Pairwise score matrix over a borrowed string collection.
#[derive(Debug, Clone)]
pub struct Matrix {
    num: usize,
    geom: Geometry,
    values: Vec<f32>,
    labels: Vec<f64>,
    srcs: Vec<Option<String>>,
    elapsed: Option<Duration>,
}

impl Matrix {
    /// Creates a matrix over the full collection (triangular), copying out
    /// the per-string metadata. No cell storage is allocated yet.
    pub fn new(strs: &[StrValue]) -> Self {
        let n = strs.len();
        Self {
            num: n,
            geom: Geometry::new(Range::full(n), Range::full(n)),
            values: Vec::new(),
            labels: strs.iter().map(|s| s.label).collect(),
            srcs: strs.iter().map(|s| s.src.clone()).collect(),
            elapsed: None,
        }
    }

    /// Original collection size.
    pub fn num(&self) -> usize {
        self.num
    }

    pub fn geometry(&self) -> Geometry {
        self.geom
    }

    /// Narrows the x-range. Drops any existing allocation since the shape
    /// changes.
    pub fn set_x_range(&mut self, x: Range) {
        self.geom = Geometry::new(x, self.geom.y);
        self.values = Vec::new();
    }

    /// Narrows the y-range.
    pub fn set_y_range(&mut self, y: Range) {
        self.geom = Geometry::new(self.geom.x, y);
        self.values = Vec::new();
    }

    /// Applies a `"B:k"` block split to the y-range. Must run after y-range
    /// narrowing; violations are fatal.
    pub fn split_y(&mut self, spec: &str) -> Result<(), MatrixError> {
        let y = parse_split(spec, self.geom.y)?;
        self.set_y_range(y);
        Ok(())
    }

    /// Allocates zeroed cell storage for the active sub-rectangle.
    pub fn allocate(&mut self) {
        self.values = vec![0.0; self.geom.size()];
    }

    pub fn is_allocated(&self) -> bool {
        !self.values.is_empty() || self.geom.size() == 0
    }

    /// Active `(x, y, triangular)` shape.
    pub fn active_ranges(&self) -> (Range, Range, bool) {
        (self.geom.x, self.geom.y, self.geom.triangular)
    }

    /// `(x length, y length, stored cells)`.
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.geom.x.len(), self.geom.y.len(), self.geom.size())
    }

    /// Label of the string at an absolute collection index.
    pub fn label(&self, idx: usize) -> f64 {
        self.labels[idx]
    }

    /// Source tag of the string at an absolute collection index.
    pub fn src(&self, idx: usize) -> Option<&str> {
        self.srcs[idx].as_deref()
    }

    /// Cell read; triangular shapes answer mirror queries from the stored
    /// half.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the active sub-rectangle or the
    /// matrix is unallocated.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[self.geom.index_of(x, y)]
    }

    /// Cell write; triangular writes canonicalize into the stored half.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let i = self.geom.index_of(x, y);
        self.values[i] = value;
    }

    /// Wall time of the last fill, once computed.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    pub(crate) fn set_elapsed(&mut self, d: Duration) {
        self.elapsed = Some(d);
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(n: usize) -> Vec<StrValue> {
        (0..n)
            .map(|i| StrValue::from_str(&format!("s{i}"), i as f64, i))
            .collect()
    }

    #[test]
    fn new_matrix_is_full_triangular_and_unallocated() {
        let m = Matrix::new(&strings(4));
        let (x, y, tri) = m.active_ranges();
        assert_eq!(x, Range::full(4));
        assert_eq!(y, Range::full(4));
        assert!(tri);
        assert_eq!(m.dims(), (4, 4, 10));
        assert!(!m.is_allocated());
    }

    #[test]
    fn narrowing_one_axis_clears_triangular() {
        let mut m = Matrix::new(&strings(4));
        m.set_y_range(Range::new(1, 3));
        let (_, y, tri) = m.active_ranges();
        assert_eq!(y, Range::new(1, 3));
        assert!(!tri);
        assert_eq!(m.dims(), (4, 2, 8));
        // Narrowing x to match restores the triangular shape.
        m.set_x_range(Range::new(1, 3));
        let (_, _, tri) = m.active_ranges();
        assert!(tri);
        assert_eq!(m.dims(), (2, 2, 3));
    }

    #[test]
    fn triangular_index_is_bijective() {
        let mut m = Matrix::new(&strings(5));
        m.allocate();
        let g = m.geometry();
        let mut seen = vec![false; g.size()];
        for y in 0..5 {
            for x in y..5 {
                let t = g.index_of(x, y);
                assert!(!seen[t], "duplicate index {t} for ({x},{y})");
                seen[t] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn rectangular_index_is_bijective() {
        let mut m = Matrix::new(&strings(5));
        m.set_y_range(Range::new(2, 5));
        m.allocate();
        let g = m.geometry();
        let mut seen = vec![false; g.size()];
        for y in 2..5 {
            for x in 0..5 {
                let t = g.index_of(x, y);
                assert!(!seen[t], "duplicate index {t} for ({x},{y})");
                seen[t] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn cell_at_inverts_index_of() {
        let mut m = Matrix::new(&strings(7));
        m.allocate();
        let g = m.geometry();
        for t in 0..g.size() {
            let (x, y) = g.cell_at(t);
            assert!(x >= y, "triangular cells come out lower-half");
            assert_eq!(g.index_of(x, y), t);
        }

        let mut m = Matrix::new(&strings(7));
        m.set_x_range(Range::new(1, 4));
        m.set_y_range(Range::new(2, 7));
        m.allocate();
        let g = m.geometry();
        for t in 0..g.size() {
            let (x, y) = g.cell_at(t);
            assert_eq!(g.index_of(x, y), t);
        }
    }

    #[test]
    fn triangular_get_answers_mirror_queries() {
        let mut m = Matrix::new(&strings(3));
        m.allocate();
        m.set(2, 0, 3.5);
        assert_eq!(m.get(2, 0), 3.5);
        assert_eq!(m.get(0, 2), 3.5);
        // Upper-half writes canonicalize to the same slot.
        m.set(0, 1, 1.25);
        assert_eq!(m.get(1, 0), 1.25);
    }

    #[test]
    fn allocation_zeroes_cells() {
        let mut m = Matrix::new(&strings(3));
        m.allocate();
        let (_, _, size) = m.dims();
        assert_eq!(size, 6);
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(m.get(x, y), 0.0);
            }
        }
    }

    #[test]
    fn metadata_covers_the_full_collection() {
        let strs: Vec<StrValue> = (0..4)
            .map(|i| {
                StrValue::from_str(&format!("s{i}"), i as f64 * 0.5, i)
                    .with_src(format!("file-{i}"))
            })
            .collect();
        let mut m = Matrix::new(&strs);
        m.set_x_range(Range::new(2, 4));
        m.set_y_range(Range::new(2, 4));
        // Metadata stays addressable by absolute index outside the active
        // sub-rectangle.
        assert_eq!(m.label(0), 0.0);
        assert_eq!(m.label(3), 1.5);
        assert_eq!(m.src(1), Some("file-1"));
    }

    #[test]
    fn split_y_is_fatal_on_violation() {
        let mut m = Matrix::new(&strings(4));
        assert!(m.split_y("0:0").is_err());
        assert!(m.split_y("2:5").is_err());
        m.split_y("2:1").unwrap();
        let (_, y, tri) = m.active_ranges();
        assert_eq!(y, Range::new(2, 4));
        assert!(!tri);
    }
}
