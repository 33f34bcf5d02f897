//! Energy bilan / enthalpy bookkeeping (spec.md §4.8).
//!
//! Total enthalpy `H = sum(RhoCp * ds^3 * T)` over solid cells plus
//! `sum(C_air * T_air)` over zones, sampled at `t=0` as a baseline and
//! again at the end of a run. The relative drift between what the
//! baseline plus accumulated boundary flux predicts and what the model
//! actually holds is the headline stability number (P4).

use crate::model::VoxelModel;
use crate::units::Seconds;

/// One drift sample: elapsed time, instantaneous enthalpy, cumulative net
/// power crossing the boundary (signed, positive = energy entering).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BilanSample {
    pub t_s: Seconds,
    pub enthalpy_j: f64,
    pub cumulative_boundary_j: f64,
}

/// How far the model's actual enthalpy has drifted from what boundary
/// flux accounting predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftRating {
    Excellent,
    Good,
    Alert,
}

/// Final summary handed back by [`crate::sim::Simulator::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BilanReport {
    pub baseline_j: f64,
    pub final_enthalpy_j: f64,
    pub cumulative_boundary_j: f64,
    pub drift_fraction: f64,
    pub rating: DriftRating,
}

/// Computes total enthalpy of a [`VoxelModel`]'s current state.
///
/// Solid cells contribute `RhoCp * ds^3 * T`; `Fixed` cells are excluded
/// (their temperature is imposed, not stored energy); air zones
/// contribute `capacity_j_per_k * T` each.
#[must_use]
pub fn compute_enthalpy(model: &VoxelModel) -> f64 {
    let ds3 = model.params().ds.value().powi(3);
    let rho_cp = model.rho_cp();
    let t = model.temperature_field();
    let kinds = model.kinds();

    let solid_sum: f64 = kinds
        .iter()
        .zip(rho_cp.iter().zip(t.iter()))
        .filter(|(kind, _)| kind.is_solid())
        .map(|(_, (&rc, &tv))| rc * ds3 * tv)
        .sum();

    let air_sum: f64 = model
        .zones()
        .values()
        .map(|z| z.capacity_j_per_k * z.t.value())
        .sum();

    solid_sum + air_sum
}

/// Accumulating enthalpy/drift tracker for one simulation run.
#[derive(Debug, Clone)]
pub struct EnergyBilan {
    baseline_j: f64,
    cumulative_boundary_j: f64,
    history: Vec<BilanSample>,
}

impl EnergyBilan {
    #[must_use]
    pub fn start(model: &VoxelModel) -> Self {
        let baseline = compute_enthalpy(model);
        Self {
            baseline_j: baseline,
            cumulative_boundary_j: 0.0,
            history: vec![BilanSample {
                t_s: Seconds::new(0.0),
                enthalpy_j: baseline,
                cumulative_boundary_j: 0.0,
            }],
        }
    }

    /// Feed in this step's net boundary power (W, positive = entering)
    /// and the elapsed time, before recording the sample.
    pub fn record(&mut self, model: &VoxelModel, t_s: Seconds, net_boundary_power_w: f64, dt_s: f64) {
        self.cumulative_boundary_j += net_boundary_power_w * dt_s;
        self.history.push(BilanSample {
            t_s,
            enthalpy_j: compute_enthalpy(model),
            cumulative_boundary_j: self.cumulative_boundary_j,
        });
    }

    #[must_use]
    pub fn history(&self) -> &[BilanSample] {
        &self.history
    }

    #[must_use]
    pub fn baseline_j(&self) -> f64 {
        self.baseline_j
    }

    /// Produce the final report: compares the model's actual enthalpy
    /// against `baseline + cumulative boundary flux`, the amount the
    /// ledger says should have changed.
    #[must_use]
    pub fn finish(self, model: &VoxelModel) -> BilanReport {
        let final_enthalpy = compute_enthalpy(model);
        let predicted = self.baseline_j + self.cumulative_boundary_j;
        let denom = predicted.abs().max(1.0);
        let drift_fraction = (final_enthalpy - predicted).abs() / denom;

        let rating = if drift_fraction < 0.001 {
            DriftRating::Excellent
        } else if drift_fraction < 0.01 {
            DriftRating::Good
        } else {
            DriftRating::Alert
        };

        BilanReport {
            baseline_j: self.baseline_j,
            final_enthalpy_j: final_enthalpy,
            cumulative_boundary_j: self.cumulative_boundary_j,
            drift_fraction,
            rating,
        }
    }
}
