//! Voxel Model (spec.md §3, §4.3).
//!
//! Four coaligned dense 3D arrays — cell kind, temperature, conductivity,
//! and volumetric heat capacity — plus a registry of air zones. Cells are
//! tagged with an explicit [`CellKind`] rather than overloading a single
//! float's sign to mean "this is an air-zone id" (spec.md §9 REDESIGN
//! FLAGS); `Lambda`/`RhoCp` stay as separate dense buffers so flux
//! accounting can read them without re-deriving from the tag.
//!
//! Buffers are flattened row-major with x fastest-varying:
//! `idx(i, j, k) = i + nx * (j + ny * k)`.

pub mod surface;

use crate::error::SimError;
use crate::material::{MaterialKind, MaterialTable, AIR_CP, AIR_RHO};
use crate::params::Parameters;
use crate::units::{Celsius, Watts};
use rustc_hash::FxHashMap;
use tracing::info;

pub use surface::SurfaceIndex;

/// Identity of an air zone: a dense negative integer, assigned in
/// first-use order (-1, -2, ...).
pub type ZoneId = i32;

/// What a single cell is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Solid,
    Fixed,
    Air(ZoneId),
}

impl CellKind {
    #[must_use]
    pub const fn zone_id(self) -> Option<ZoneId> {
        match self {
            Self::Air(z) => Some(z),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Solid)
    }

    #[must_use]
    pub const fn is_fixed(self) -> bool {
        matches!(self, Self::Fixed)
    }
}

/// A lumped-capacitance air node (spec.md §3 AirZone).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirZone {
    pub id: ZoneId,
    pub t: Celsius,
    pub volume_m3: f64,
    /// Heat capacity C = volume * rho_air * cp_air, J/K. Zero until
    /// [`VoxelModel::prepare`] finalizes it.
    pub capacity_j_per_k: f64,
    pub p_input: Watts,
}

impl AirZone {
    fn new(id: ZoneId, t_init: Celsius) -> Self {
        Self {
            id,
            t: t_init,
            volume_m3: 0.0,
            capacity_j_per_k: 0.0,
            p_input: Watts::new(0.0),
        }
    }

    fn add_volume(&mut self, delta_m3: f64) {
        self.volume_m3 = (self.volume_m3 + delta_m3).max(0.0);
    }

    fn finalize(&mut self) {
        let mass_kg = self.volume_m3 * AIR_RHO;
        self.capacity_j_per_k = mass_kg * AIR_CP;
    }
}

#[inline]
const fn clamp_index(v: isize, n: usize) -> usize {
    if v < 0 {
        0
    } else if v as usize >= n {
        n - 1
    } else {
        v as usize
    }
}

#[inline]
fn round_to_index(x_m: f64, ds: f64, n: usize) -> usize {
    clamp_index((x_m / ds).round() as isize, n)
}

/// Dense voxel grid: cell kind, temperature, conductivity, and volumetric
/// heat capacity, plus the air-zone registry and (once prepared) the
/// convection surface index.
#[derive(Debug, Clone)]
pub struct VoxelModel {
    params: Parameters,
    kind: Vec<CellKind>,
    t: Vec<f64>,
    lambda: Vec<f64>,
    rho_cp: Vec<f64>,
    /// Index into `material_names`, valid only where `kind[i].is_solid()`.
    /// Used by the radiation substep to resolve a per-material emissivity
    /// override (spec.md §4.6).
    cell_material: Vec<u32>,
    material_names: Vec<String>,
    zones: FxHashMap<ZoneId, AirZone>,
    surfaces: FxHashMap<ZoneId, SurfaceIndex>,
    next_zone_id: ZoneId,
    prepared: bool,
}

impl VoxelModel {
    /// Create an empty model: every cell starts as `Solid` with zero
    /// diffusivity (i.e. inert) until filled.
    #[must_use]
    pub fn new(params: Parameters) -> Self {
        let len = params.grid_len();
        Self {
            params,
            kind: vec![CellKind::Solid; len],
            t: vec![params.t_int_init.value(); len],
            lambda: vec![0.0; len],
            rho_cp: vec![0.0; len],
            cell_material: vec![u32::MAX; len],
            material_names: Vec::new(),
            zones: FxHashMap::default(),
            surfaces: FxHashMap::default(),
            next_zone_id: -1,
            prepared: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    #[inline]
    pub(crate) const fn idx(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.params.nx() * (j + self.params.ny() * k)
    }

    #[inline]
    #[must_use]
    pub fn temperature_field(&self) -> &[f64] {
        &self.t
    }

    #[inline]
    #[must_use]
    pub fn kind_at(&self, i: usize, j: usize, k: usize) -> CellKind {
        self.kind[self.idx(i, j, k)]
    }

    #[inline]
    #[must_use]
    pub fn temperature_at(&self, i: usize, j: usize, k: usize) -> f64 {
        self.t[self.idx(i, j, k)]
    }

    #[must_use]
    pub fn zones(&self) -> &FxHashMap<ZoneId, AirZone> {
        &self.zones
    }

    #[must_use]
    pub fn surfaces(&self) -> &FxHashMap<ZoneId, SurfaceIndex> {
        &self.surfaces
    }

    #[must_use]
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub(crate) fn lambda(&self) -> &[f64] {
        &self.lambda
    }

    pub(crate) fn rho_cp(&self) -> &[f64] {
        &self.rho_cp
    }

    pub(crate) fn kinds(&self) -> &[CellKind] {
        &self.kind
    }

    pub(crate) fn cell_material_names(&self) -> (&[u32], &[String]) {
        (&self.cell_material, &self.material_names)
    }

    pub(crate) fn temperature_field_mut(&mut self) -> &mut [f64] {
        &mut self.t
    }

    pub(crate) fn zones_mut(&mut self) -> &mut FxHashMap<ZoneId, AirZone> {
        &mut self.zones
    }

    fn material_index(&mut self, name: &str) -> u32 {
        if let Some(pos) = self.material_names.iter().position(|n| n == name) {
            pos as u32
        } else {
            self.material_names.push(name.to_string());
            (self.material_names.len() - 1) as u32
        }
    }

    fn alloc_zone(&mut self) -> ZoneId {
        let id = self.next_zone_id;
        self.next_zone_id -= 1;
        self.zones.insert(id, AirZone::new(id, self.params.t_int_init));
        id
    }

    fn neighbour_zone_ids(&self, i: usize, j: usize, k: usize) -> Vec<ZoneId> {
        let nx = self.params.nx();
        let ny = self.params.ny();
        let nz = self.params.nz();
        let mut found = Vec::new();
        let offsets: [(isize, isize, isize); 6] =
            [(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0), (0, 0, 1), (0, 0, -1)];
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
            if let CellKind::Air(z) = self.kind[self.idx(ni, nj, nk)] {
                if !found.contains(&z) {
                    found.push(z);
                }
            }
        }
        found
    }

    /// Set a single cell to `material_name`, following the allocation
    /// policy of spec.md §4.3: an `Air` assignment reuses the single
    /// distinct air zone found among the cell's six neighbours, allocates
    /// a fresh zone if none neighbours air, and fails with
    /// [`SimError::AirZoneFusionUnsupported`] if more than one distinct
    /// zone neighbours the cell.
    ///
    /// # Errors
    /// [`SimError::UnknownMaterial`], [`SimError::OutOfBounds`], or
    /// [`SimError::AirZoneFusionUnsupported`].
    pub fn set_cell(
        &mut self,
        i: usize,
        j: usize,
        k: usize,
        material_name: &str,
        t_override: Option<Celsius>,
        table: &MaterialTable,
    ) -> Result<(), SimError> {
        if i >= self.params.nx() || j >= self.params.ny() || k >= self.params.nz() {
            return Err(SimError::OutOfBounds(format!(
                "({i}, {j}, {k}) outside grid ({}, {}, {})",
                self.params.nx(),
                self.params.ny(),
                self.params.nz()
            )));
        }
        let material = table.get(material_name)?.clone();
        let idx = self.idx(i, j, k);
        let ds3 = self.params.ds.value().powi(3);

        // Leaving an air zone: subtract this cell's volume before
        // overwriting its kind.
        if let CellKind::Air(old_zone) = self.kind[idx] {
            if material.kind != MaterialKind::Air {
                if let Some(zone) = self.zones.get_mut(&old_zone) {
                    zone.add_volume(-ds3);
                }
            }
        }

        match material.kind {
            MaterialKind::FixedBoundary => {
                self.kind[idx] = CellKind::Fixed;
                self.lambda[idx] = 0.0;
                self.rho_cp[idx] = 0.0;
                self.cell_material[idx] = u32::MAX;
                self.t[idx] = t_override.unwrap_or(self.params.t_ext_init).value();
            }
            MaterialKind::Solid => {
                self.kind[idx] = CellKind::Solid;
                self.lambda[idx] = material.lambda;
                self.rho_cp[idx] = material.rho * material.cp;
                let mat_idx = self.material_index(&material.name);
                self.cell_material[idx] = mat_idx;
                self.t[idx] = t_override.unwrap_or(self.params.t_int_init).value();
            }
            MaterialKind::Air => {
                let neighbours = self.neighbour_zone_ids(i, j, k);
                let zone_id = match neighbours.as_slice() {
                    [] => self.alloc_zone(),
                    [only] => *only,
                    [first, second, ..] => {
                        return Err(SimError::AirZoneFusionUnsupported {
                            at: (i, j, k),
                            zones: (*first, *second),
                        });
                    }
                };
                self.kind[idx] = CellKind::Air(zone_id);
                self.lambda[idx] = 0.0;
                self.rho_cp[idx] = 0.0;
                self.cell_material[idx] = u32::MAX;
                self.t[idx] = t_override.unwrap_or(self.params.t_int_init).value();
                if let Some(zone) = self.zones.get_mut(&zone_id) {
                    zone.add_volume(ds3);
                }
            }
        }
        Ok(())
    }

    /// Fill a box of cells given in world coordinates (meters).
    ///
    /// Corners are converted via `i = round(x / ds)` and clamped to
    /// `[0, N)`; the inclusive range `[min..=max]` is filled along each
    /// axis (spec.md §4.3, §9: round-to-nearest with clamping, pinned by
    /// P8).
    ///
    /// # Errors
    /// [`SimError::UnknownMaterial`] if `material_name` is unknown, or
    /// [`SimError::AirZoneFusionUnsupported`] if an `AIR` fill straddles
    /// two pre-existing distinct zones.
    pub fn fill_box(
        &mut self,
        p1_m: (f64, f64, f64),
        p2_m: (f64, f64, f64),
        material_name: &str,
        t_override: Option<Celsius>,
        table: &MaterialTable,
    ) -> Result<(), SimError> {
        table.get(material_name)?;
        let ds = self.params.ds.value();
        let (nx, ny, nz) = (self.params.nx(), self.params.ny(), self.params.nz());

        let i0 = round_to_index(p1_m.0, ds, nx);
        let i1 = round_to_index(p2_m.0, ds, nx);
        let j0 = round_to_index(p1_m.1, ds, ny);
        let j1 = round_to_index(p2_m.1, ds, ny);
        let k0 = round_to_index(p1_m.2, ds, nz);
        let k1 = round_to_index(p2_m.2, ds, nz);

        let (imin, imax) = (i0.min(i1), i0.max(i1));
        let (jmin, jmax) = (j0.min(j1), j0.max(j1));
        let (kmin, kmax) = (k0.min(k1), k0.max(k1));

        let mut filled = 0usize;
        for k in kmin..=kmax {
            for j in jmin..=jmax {
                for i in imin..=imax {
                    self.set_cell(i, j, k, material_name, t_override, table)?;
                    filled += 1;
                }
            }
        }
        info!(
            material_name,
            filled, "fill_box wrote {filled} cells with '{material_name}'"
        );
        Ok(())
    }

    /// Apply a 2D material plan, given as integer ids looked up in
    /// `id_map`, across every z-layer of the slab `[z_from, z_to)`
    /// (spec.md §4.3).
    ///
    /// `plan` is indexed `plan[j][i]` (row `j`, column `i`), `Ny` rows of
    /// `Nx` columns, matching the grid's y/x extent.
    ///
    /// # Errors
    /// [`SimError::OutOfBounds`] if `plan`'s dimensions don't match the
    /// grid, [`SimError::UnknownMaterial`] for an unmapped id, or
    /// [`SimError::AirZoneFusionUnsupported`].
    pub fn extrude_plan(
        &mut self,
        z_from_m: f64,
        z_to_m: f64,
        plan: &[Vec<i32>],
        id_map: &FxHashMap<i32, (String, Option<Celsius>)>,
        table: &MaterialTable,
    ) -> Result<(), SimError> {
        let (nx, ny, nz) = (self.params.nx(), self.params.ny(), self.params.nz());
        if plan.len() != ny || plan.iter().any(|row| row.len() != nx) {
            return Err(SimError::OutOfBounds(format!(
                "extrude_plan expects a {ny}x{nx} plan"
            )));
        }
        let ds = self.params.ds.value();
        let k0 = round_to_index(z_from_m, ds, nz);
        let k1 = round_to_index(z_to_m, ds, nz).max(k0);

        for k in k0..k1 {
            for j in 0..ny {
                for i in 0..nx {
                    let id = plan[j][i];
                    let (name, t_override) = id_map
                        .get(&id)
                        .ok_or_else(|| SimError::OutOfBounds(format!("no material mapped for plan id {id}")))?;
                    self.set_cell(i, j, k, name, *t_override, table)?;
                }
            }
        }
        Ok(())
    }

    /// Finalize the model before simulation: computes each air zone's heat
    /// capacity and builds the convection surface index (spec.md §4.3).
    /// Idempotent.
    pub fn prepare(&mut self) {
        for zone in self.zones.values_mut() {
            zone.finalize();
        }
        self.surfaces = surface::detect_surfaces(&self.kind, self.params.nx(), self.params.ny(), self.params.nz());
        self.prepared = true;
        info!(
            zones = self.zones.len(),
            "model prepared: {} air zone(s), {} surface set(s)",
            self.zones.len(),
            self.surfaces.len()
        );
    }
}
