//! Coupled conduction/convection/radiation solver for a dense voxel
//! representation of a building.
//!
//! A [`material::MaterialTable`] assigns thermal properties to named
//! materials; a [`model::VoxelModel`] is built up cell-by-cell or
//! box-by-box against that table and then [`model::VoxelModel::prepare`]d,
//! which sizes its air zones and indexes their bounding surfaces; a
//! [`sim::Simulator`] steps the prepared model forward with an explicit
//! conduction substep, a semi-implicit air-coupling substep, and an
//! optional external-radiation substep, recording frames to a
//! [`sink::Sink`] and finishing with a [`bilan::BilanReport`].
//!
//! ```no_run
//! use thermal_voxel_core::{material, params, model, radiation, sim, sink, units};
//!
//! # fn run() -> Result<(), thermal_voxel_core::error::SimError> {
//! let table = material::build_material_table();
//! let params = params::Parameters::new(
//!     units::Meters::new(3.0),
//!     units::Meters::new(3.0),
//!     units::Meters::new(2.5),
//!     units::Meters::new(0.1),
//!     units::Seconds::new(20.0),
//!     units::Celsius::new(20.0),
//!     units::Celsius::new(5.0),
//!     units::Celsius::new(10.0),
//!     8.0,
//! )?;
//! let mut voxels = model::VoxelModel::new(params);
//! voxels.fill_box((0.0, 0.0, 0.0), (3.0, 3.0, 2.5), "PARPAING", None, &table)?;
//! voxels.fill_box((0.2, 0.2, 0.2), (2.8, 2.8, 2.2), "AIR", None, &table)?;
//! voxels.prepare();
//!
//! let options = sim::SimOptions::default().with_radiation(true, units::Kelvin::new(250.0));
//! let sim = sim::Simulator::new(voxels, sink::NullSink, options)?;
//! let (report, _sink) = sim.run(units::Seconds::new(3600.0), units::Seconds::new(300.0))?;
//! println!("enthalpy drift: {:.4}%", report.drift_fraction * 100.0);
//! # Ok(())
//! # }
//! ```

pub mod bilan;
pub mod error;
pub mod material;
pub mod model;
pub mod params;
pub mod radiation;
pub mod sim;
pub mod sink;
pub mod units;

pub use error::SimError;
pub use model::VoxelModel;
pub use params::Parameters;
pub use sim::{SimOptions, Simulator};
