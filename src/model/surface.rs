//! Surface Detector (spec.md §4.4).
//!
//! For every air zone, find the solid cells that border it: scan each of
//! the six axis directions, shift the zone's boolean membership mask by
//! one cell, and intersect with `solid_mask` (`Alpha > 0`, i.e. `Solid`
//! only — `Fixed` cells have `Lambda == 0` and are excluded, matching the
//! original's `masque_solide = (Alpha >= 0) & (Lambda > 0)`, spec.md I6).
//! Deliberately does **not** wrap at the grid boundary — a cell on the
//! edge of the domain has no neighbour past that edge, full stop. The
//! original's `np.roll`-based version wraps around, which would silently
//! treat opposite faces of the building as touching; spec.md pins the
//! non-wrapping behaviour explicitly, so this is a corrected port, not a
//! faithful one.

use super::CellKind;
use rustc_hash::FxHashMap;

/// Coordinates of the cells bordering one air zone, as three parallel
/// vectors (i, j, k) rather than a `Vec<(usize, usize, usize)>`, so the
/// convection substep can slice them directly for SIMD-friendly access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceIndex {
    pub i: Vec<usize>,
    pub j: Vec<usize>,
    pub k: Vec<usize>,
}

impl SurfaceIndex {
    #[must_use]
    pub fn len(&self) -> usize {
        self.i.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.i.is_empty()
    }

    fn push(&mut self, i: usize, j: usize, k: usize) {
        self.i.push(i);
        self.j.push(j);
        self.k.push(k);
    }
}

#[inline]
const fn idx(i: usize, j: usize, k: usize, nx: usize, ny: usize) -> usize {
    i + nx * (j + ny * k)
}

/// Build a [`SurfaceIndex`] per air zone: solid/fixed cells with at least
/// one of that zone's cells among their six axis neighbours.
///
/// A cell can appear in more than one zone's index only if it borders two
/// distinct zones from different faces — both are real boundary faces,
/// so both get the conductive/convective exchange.
#[must_use]
pub fn detect_surfaces(kind: &[CellKind], nx: usize, ny: usize, nz: usize) -> FxHashMap<i32, SurfaceIndex> {
    let mut out: FxHashMap<i32, SurfaceIndex> = FxHashMap::default();
    let mut seen: FxHashMap<i32, std::collections::HashSet<usize>> = FxHashMap::default();

    let offsets: [(isize, isize, isize); 6] =
        [(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0), (0, 0, 1), (0, 0, -1)];

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let here = idx(i, j, k, nx, ny);
                let CellKind::Air(zone) = kind[here] else {
                    continue;
                };
                for (di, dj, dk) in offsets {
                    let ni = i as isize + di;
                    let nj = j as isize + dj;
                    let nk = k as isize + dk;
                    if ni < 0 || nj < 0 || nk < 0 {
                        continue;
                    }
                    let (ni, nj, nk) = (ni as usize, nj as usize, nk as usize);
                    if ni >= nx || nj >= ny || nk >= nz {
                        continue;
                    }
                    let there = idx(ni, nj, nk, nx, ny);
                    if kind[there].is_solid() {
                        let dedup = seen.entry(zone).or_default();
                        if dedup.insert(there) {
                            out.entry(zone).or_default().push(ni, nj, nk);
                        }
                    }
                }
            }
        }
    }

    out
}
