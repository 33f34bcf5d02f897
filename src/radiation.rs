//! External radiation substep (spec.md §4.6).
//!
//! Applied to the same cells the convection substep couples to each air
//! zone — every solid cell in a zone's convection-surface index radiates
//! to the night sky as a gray body: `q = epsilon * sigma * (T^4 -
//! T_sky^4)`, `sigma = 5.67e-8 W/(m^2*K^4)`. This mirrors
//! `rayonnement.py::appliquer_rayonnement_surfaces_externes`, which is
//! handed `surfaces_convection_idx` directly rather than re-deriving an
//! "exterior" cell set from `Fixed` adjacency — a block of solid
//! surrounded only by `Air` (no `Fixed` boundary anywhere) still radiates
//! to the sky through its zone-facing surface (spec.md §8 scenario 3).
//! Temperature must be converted to Kelvin only for this computation —
//! the grid keeps Celsius everywhere else (the original adds 273.15 at
//! the point of use rather than storing Kelvin globally).

use crate::units::Kelvin;
use rustc_hash::FxHashMap;

/// Stefan-Boltzmann constant, W/(m^2*K^4).
pub const SIGMA: f64 = 5.67e-8;

/// Gray-body emissivity assumed for any material without an explicit
/// override (typical painted masonry/plaster).
pub const DEFAULT_EMISSIVITY: f64 = 0.85;

/// Configuration for the external radiative exchange.
#[derive(Debug, Clone)]
pub struct RadiationModel {
    pub enable_external: bool,
    pub t_sky: Kelvin,
    overrides: FxHashMap<String, f64>,
}

impl RadiationModel {
    #[must_use]
    pub fn new(enable_external: bool, t_sky: Kelvin) -> Self {
        Self {
            enable_external,
            t_sky,
            overrides: FxHashMap::default(),
        }
    }

    pub fn set_emissivity(&mut self, material_name: impl Into<String>, epsilon: f64) {
        self.overrides.insert(material_name.into(), epsilon);
    }

    #[must_use]
    pub fn emissivity_for(&self, material_name: Option<&str>) -> f64 {
        material_name
            .and_then(|name| self.overrides.get(name).copied())
            .unwrap_or(DEFAULT_EMISSIVITY)
    }

    /// Net radiative power leaving one square meter of surface at `t_cell`
    /// (Celsius) toward the sky, in W/m^2. Positive means the cell is
    /// losing energy.
    #[must_use]
    pub fn flux_density(&self, t_cell_celsius: f64, epsilon: f64) -> f64 {
        let t_k = t_cell_celsius + crate::units::KELVIN_OFFSET;
        epsilon * SIGMA * (t_k.powi(4) - self.t_sky.value().powi(4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotter_than_sky_loses_energy() {
        let model = RadiationModel::new(true, Kelvin::new(260.0));
        let q = model.flux_density(20.0, DEFAULT_EMISSIVITY);
        assert!(q > 0.0);
    }

    #[test]
    fn colder_than_sky_gains_energy() {
        let model = RadiationModel::new(true, Kelvin::new(320.0));
        let q = model.flux_density(10.0, DEFAULT_EMISSIVITY);
        assert!(q < 0.0);
    }

    #[test]
    fn emissivity_override_is_used() {
        let mut model = RadiationModel::new(true, Kelvin::new(250.0));
        model.set_emissivity("VERRE", 0.9);
        assert!((model.emissivity_for(Some("VERRE")) - 0.9).abs() < 1e-12);
        assert!((model.emissivity_for(Some("PARPAING")) - DEFAULT_EMISSIVITY).abs() < 1e-12);
        assert!((model.emissivity_for(None) - DEFAULT_EMISSIVITY).abs() < 1e-12);
    }
}
