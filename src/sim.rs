//! Simulator (spec.md §4.5).
//!
//! Owns a prepared [`VoxelModel`] and steps it forward with an explicit
//! FTCS conduction substep, a semi-implicit air-convection coupling, and
//! an optional external-radiation substep, in that order, once per call
//! to [`Simulator::advance_one`]. `run` takes `self` by value and returns
//! a [`BilanReport`]: once a run finishes there is no stale `Simulator`
//! left lying around to accidentally step again, which is the ownership
//! system doing the job an explicit lifecycle enum would do elsewhere.

use crate::bilan::EnergyBilan;
use crate::error::SimError;
use crate::model::{CellKind, VoxelModel, ZoneId};
use crate::radiation::RadiationModel;
use crate::sink::Sink;
use crate::units::{Celsius, Kelvin, Seconds, Watts};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

const NEIGHBOUR_OFFSETS: [(isize, isize, isize); 6] =
    [(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0), (0, 0, 1), (0, 0, -1)];

/// CFL limit for the 6-neighbour explicit FTCS stencil in 3D.
const CFL_LIMIT: f64 = 1.0 / 6.0;
/// Below this the run proceeds silently; above it (but still <= the
/// limit) a warning is logged once at construction.
const CFL_WARN_THRESHOLD: f64 = 1.0 / 10.0;

/// Tunables that don't belong to the physical model itself (spec.md §4.5,
/// `SPEC_FULL.md` §3.3 — grounded on the teacher's
/// `QualityPreset`/`HeatTransferParams` small config structs passed by
/// value into constructors).
#[derive(Debug, Clone, PartialEq)]
pub struct SimOptions {
    /// Whether the external-radiation substep runs at all.
    pub enable_radiation: bool,
    /// Effective sky temperature the exterior envelope radiates against.
    pub t_sky: Kelvin,
    /// Per-material emissivity overrides; materials absent here fall back
    /// to [`crate::radiation::DEFAULT_EMISSIVITY`].
    pub emissivity_overrides: FxHashMap<String, f64>,
    /// Internal heat-generation power wired into named air zones (spec.md
    /// §3 `AirZone::P_input`).
    pub internal_power: FxHashMap<ZoneId, Watts>,
    /// Cap on convection sub-iterations per step.
    pub max_convection_iters: u32,
    /// Convergence threshold on zone temperature change between
    /// convection sub-iterations.
    pub convection_tolerance_k: f64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            enable_radiation: false,
            t_sky: Kelvin::new(250.0),
            emissivity_overrides: FxHashMap::default(),
            internal_power: FxHashMap::default(),
            max_convection_iters: 2,
            convection_tolerance_k: 0.01,
        }
    }
}

impl SimOptions {
    #[must_use]
    pub fn with_radiation(mut self, enable: bool, t_sky: Kelvin) -> Self {
        self.enable_radiation = enable;
        self.t_sky = t_sky;
        self
    }

    #[must_use]
    pub fn with_emissivity(mut self, material_name: impl Into<String>, epsilon: f64) -> Self {
        self.emissivity_overrides.insert(material_name.into(), epsilon);
        self
    }

    #[must_use]
    pub fn with_internal_power(mut self, zone: ZoneId, power: Watts) -> Self {
        self.internal_power.insert(zone, power);
        self
    }

    #[must_use]
    pub fn with_max_convection_iters(mut self, n: u32) -> Self {
        self.max_convection_iters = n.max(1);
        self
    }

    #[must_use]
    pub fn with_convection_tolerance_k(mut self, tol: f64) -> Self {
        self.convection_tolerance_k = tol.max(0.0);
        self
    }
}

#[inline]
fn interface_lambda(a: f64, b: f64) -> f64 {
    if a > 0.0 && b > 0.0 {
        2.0 * a * b / (a + b)
    } else {
        a.max(b)
    }
}

/// Drives a prepared [`VoxelModel`] forward in time.
pub struct Simulator<S: Sink> {
    model: VoxelModel,
    radiation: RadiationModel,
    sink: S,
    options: SimOptions,
    t_next: Vec<f64>,
    bilan: EnergyBilan,
    step: u64,
    elapsed: Seconds,
    cfl: f64,
}

impl<S: Sink> Simulator<S> {
    /// Build a simulator from a prepared model.
    ///
    /// # Errors
    /// [`SimError::NotPrepared`] if `model.prepare()` was never called,
    /// or [`SimError::Unstable`] if the CFL number for the given `dt`/`ds`
    /// and the hottest-conducting material exceeds 1/6.
    pub fn new(mut model: VoxelModel, sink: S, options: SimOptions) -> Result<Self, SimError> {
        if !model.is_prepared() {
            return Err(SimError::NotPrepared);
        }

        for (&zone_id, &power) in &options.internal_power {
            if let Some(zone) = model.zones_mut().get_mut(&zone_id) {
                zone.p_input = power;
            }
        }

        let alpha_max = model
            .kinds()
            .iter()
            .zip(model.lambda().iter().zip(model.rho_cp().iter()))
            .filter(|(kind, _)| kind.is_solid())
            .map(|(_, (&lambda, &rho_cp))| if rho_cp > 0.0 { lambda / rho_cp } else { 0.0 })
            .fold(0.0_f64, f64::max);

        let ds = model.params().ds.value();
        let dt = model.params().dt.value();
        let cfl = alpha_max * dt / (ds * ds);

        if cfl > CFL_LIMIT {
            return Err(SimError::Unstable { cfl });
        }
        if cfl > CFL_WARN_THRESHOLD {
            warn!(cfl, "CFL factor {cfl:.4} is close to the stability limit 1/6");
        }

        let len = model.temperature_field().len();
        let bilan = EnergyBilan::start(&model);

        let mut radiation = RadiationModel::new(options.enable_radiation, options.t_sky);
        for (name, epsilon) in &options.emissivity_overrides {
            radiation.set_emissivity(name.clone(), *epsilon);
        }

        Ok(Self {
            model,
            radiation,
            sink,
            options,
            t_next: vec![0.0; len],
            bilan,
            step: 0,
            elapsed: Seconds::new(0.0),
            cfl,
        })
    }

    #[must_use]
    pub fn cfl(&self) -> f64 {
        self.cfl
    }

    #[must_use]
    pub fn model(&self) -> &VoxelModel {
        &self.model
    }

    #[must_use]
    pub fn elapsed(&self) -> Seconds {
        self.elapsed
    }

    /// Explicit FTCS Laplacian over every solid cell, parallelized by
    /// `(j, k)` row the same way the teacher's
    /// `solver/heat_transfer.rs::step_heat_transfer_cpu` slices its grid
    /// with `par_chunks_mut(width)`: each row of `nx` cells along the
    /// fastest-varying axis is an independent chunk of the shadow buffer,
    /// so rows run across threads while each row's own 6-neighbour stencil
    /// stays a plain serial loop. Boundary power is accumulated per row
    /// and reduced with `.sum()` across the parallel iterator.
    fn conduction_and_boundary_flux(&mut self) -> f64 {
        let (nx, ny, nz) = (self.model.params().nx(), self.model.params().ny(), self.model.params().nz());
        let ds = self.model.params().ds.value();
        let dt = self.model.params().dt.value();
        let kinds = self.model.kinds();
        let lambda = self.model.lambda();
        let rho_cp = self.model.rho_cp();
        let t = self.model.temperature_field();

        self.t_next.copy_from_slice(t);

        self.t_next
            .par_chunks_mut(nx)
            .enumerate()
            .map(|(row_flat, row)| {
                let k = row_flat / ny;
                let j = row_flat % ny;
                let mut row_boundary_w = 0.0_f64;

                for (i, slot) in row.iter_mut().enumerate() {
                    let here = row_flat * nx + i;
                    if !kinds[here].is_solid() {
                        continue;
                    }
                    let mut flux_sum = 0.0_f64;
                    for (di, dj, dk) in NEIGHBOUR_OFFSETS {
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
                        let there = ni + nx * (nj + ny * nk);
                        match kinds[there] {
                            CellKind::Air(_) => continue,
                            CellKind::Solid | CellKind::Fixed => {
                                let lam = interface_lambda(lambda[here], lambda[there]);
                                let dtemp = t[there] - t[here];
                                flux_sum += lam * dtemp;
                                if matches!(kinds[there], CellKind::Fixed) {
                                    // Positive = energy entering the solid domain from outside.
                                    row_boundary_w += lam * dtemp * ds;
                                }
                            }
                        }
                    }
                    let rc = rho_cp[here];
                    if rc > 0.0 {
                        *slot += dt / (rc * ds * ds) * flux_sum;
                    }
                }

                row_boundary_w
            })
            .sum()
    }

    /// Semi-implicit zone-by-zone coupling (spec.md §4.5 step 2): each
    /// iteration gathers the current surface temperatures, solves the
    /// lumped node with one closed-form Backward-Euler step driven by
    /// their mean, then applies the reverse flux back onto each surface
    /// cell individually using that same closed-form `T_air'`. Internal
    /// power is added once, after the iteration loop, per spec.md.
    fn convection_substep(&mut self) {
        let ds2 = self.model.params().ds.value().powi(2);
        let ds3 = self.model.params().ds.value().powi(3);
        let dt = self.model.params().dt.value();
        let h_conv = self.model.params().h_conv;
        let rho_cp = self.model.rho_cp().to_vec();
        let surfaces = self.model.surfaces().clone();

        let zone_ids: Vec<ZoneId> = self.model.zones().keys().copied().collect();
        for zone_id in zone_ids {
            let Some(index) = surfaces.get(&zone_id) else {
                continue;
            };
            if index.is_empty() {
                continue;
            }
            let capacity = self.model.zones().get(&zone_id).map_or(1.0, |z| z.capacity_j_per_k.max(1.0));
            let p_input = self.model.zones().get(&zone_id).map_or(0.0, |z| z.p_input.value());
            let mut t_zone = self.model.zones().get(&zone_id).map_or(0.0, |z| z.t.value());
            let a_tot = index.len() as f64 * ds2;
            let k_air = h_conv * a_tot * dt / capacity;

            for _ in 0..self.options.max_convection_iters {
                let t_surf: Vec<f64> =
                    (0..index.len()).map(|n| self.t_next[self.model.idx(index.i[n], index.j[n], index.k[n])]).collect();
                let t_surf_mean = t_surf.iter().sum::<f64>() / index.len() as f64;
                let t_air_new = (t_zone + k_air * t_surf_mean) / (1.0 + k_air);

                for n in 0..index.len() {
                    let idx = self.model.idx(index.i[n], index.j[n], index.k[n]);
                    let rc = rho_cp[idx];
                    if rc <= 0.0 {
                        continue;
                    }
                    let q_cell = h_conv * ds2 * (t_surf[n] - t_air_new) * dt;
                    self.t_next[idx] -= q_cell / (rc * ds3);
                }

                let delta = (t_air_new - t_zone).abs();
                t_zone = t_air_new;
                if delta < self.options.convection_tolerance_k {
                    break;
                }
            }

            t_zone += p_input * dt / capacity;

            if let Some(zone) = self.model.zones_mut().get_mut(&zone_id) {
                zone.t = Celsius::new(t_zone);
            }
        }
    }

    fn radiation_substep(&mut self) -> f64 {
        if !self.radiation.enable_external {
            return 0.0;
        }
        let ds2 = self.model.params().ds.value().powi(2);
        let ds3 = self.model.params().ds.value().powi(3);
        let dt = self.model.params().dt.value();
        let rho_cp = self.model.rho_cp().to_vec();
        let (cell_material, names) = self.model.cell_material_names();
        let cell_material = cell_material.to_vec();
        let names = names.to_vec();
        let surfaces = self.model.surfaces().clone();

        let mut loss_w = 0.0_f64;
        for index in surfaces.values() {
            for n in 0..index.len() {
                let idx = self.model.idx(index.i[n], index.j[n], index.k[n]);
                let rc = rho_cp[idx];
                if rc <= 0.0 {
                    continue;
                }
                let material_name = cell_material
                    .get(idx)
                    .copied()
                    .filter(|&m| m != u32::MAX)
                    .and_then(|m| names.get(m as usize))
                    .map(String::as_str);
                let epsilon = self.radiation.emissivity_for(material_name);
                let q_density = self.radiation.flux_density(self.t_next[idx], epsilon);
                let power_w = q_density * ds2;
                self.t_next[idx] -= dt * power_w / (rc * ds3);
                loss_w += power_w;
            }
        }
        -loss_w
    }

    fn reassert_fixed_boundaries(&mut self) {
        let kinds = self.model.kinds().to_vec();
        let original = self.model.temperature_field().to_vec();
        for (idx, kind) in kinds.iter().enumerate() {
            if matches!(kind, CellKind::Fixed) {
                self.t_next[idx] = original[idx];
            }
        }
    }

    fn check_divergence(&self) -> Result<(), SimError> {
        let (nx, ny) = (self.model.params().nx(), self.model.params().ny());
        for (idx, &v) in self.t_next.iter().enumerate() {
            if !v.is_finite() {
                let k = idx / (nx * ny);
                let rem = idx % (nx * ny);
                let j = rem / nx;
                let i = rem % nx;
                return Err(SimError::NumericDivergence { at: (i, j, k), step: self.step });
            }
        }
        Ok(())
    }

    /// Advance the simulation by one `dt`. Returns the net boundary power
    /// (W, signed, positive = energy entering the domain) used for the
    /// energy bilan.
    ///
    /// # Errors
    /// [`SimError::NumericDivergence`] if a NaN/Inf value appears.
    pub fn advance_one(&mut self) -> Result<f64, SimError> {
        let boundary_conduction_w = self.conduction_and_boundary_flux();
        self.convection_substep();
        let radiation_w = self.radiation_substep();
        self.reassert_fixed_boundaries();
        self.check_divergence()?;

        self.model.temperature_field_mut().copy_from_slice(&self.t_next);
        self.step += 1;
        self.elapsed = Seconds::new(self.elapsed.value() + self.model.params().dt.value());

        let net_boundary_w = boundary_conduction_w + radiation_w;
        self.bilan.record(&self.model, self.elapsed, net_boundary_w, self.model.params().dt.value());

        debug!(step = self.step, t_s = self.elapsed.value(), net_boundary_w, "step complete");
        Ok(net_boundary_w)
    }

    /// Push the current state to the sink as one recorded frame.
    fn record_frame(&mut self) {
        let zone_temps = self.model.zones().iter().map(|(&id, z)| (id, z.t)).collect();
        self.sink.record(self.elapsed, self.model.temperature_field(), &zone_temps);
    }

    /// Run until `duration_s` simulated seconds have elapsed, consuming
    /// `self`. Returns the final [`crate::bilan::BilanReport`] and the
    /// sink, so recorded frames can still be read after the run ends.
    ///
    /// Matches spec.md §4.7/§6 exactly: the sink is called once with the
    /// state at `t=0`, then again whenever elapsed time reaches
    /// `next_record_time`, which then advances by `record_every_s`
    /// regardless of how far `t` overshot it — there is no catch-up, so a
    /// `record_every_s` smaller than `dt` simply records every step.
    ///
    /// # Errors
    /// Propagates [`SimError::NumericDivergence`] from any step.
    pub fn run(mut self, duration_s: Seconds, record_every_s: Seconds) -> Result<(crate::bilan::BilanReport, S), SimError> {
        let duration = duration_s.value();
        let record_every = record_every_s.value();
        let mut next_record_time = 0.0_f64;

        loop {
            let t = self.elapsed.value();
            if t > duration {
                break;
            }
            if t >= next_record_time {
                self.record_frame();
                next_record_time += record_every;
            }
            self.advance_one()?;
        }

        let report = self.bilan.finish(&self.model);
        Ok((report, self.sink))
    }
}
