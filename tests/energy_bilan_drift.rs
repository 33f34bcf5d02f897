//! Scenario 6 / P4: with every boundary Solid (no FixedBoundary, no
//! radiation, no internal power) the enthalpy bilan drifts less than
//! 0.1% over a 1h run (spec.md §8 scenario 6, §8 P4).

use thermal_voxel_core::bilan::DriftRating;
use thermal_voxel_core::material::build_material_table;
use thermal_voxel_core::params::Parameters;
use thermal_voxel_core::sim::{SimOptions, Simulator};
use thermal_voxel_core::sink::NullSink;
use thermal_voxel_core::units::{Celsius, Meters, Seconds};
use thermal_voxel_core::VoxelModel;

#[test]
fn adiabatic_cube_in_cube_has_excellent_drift_rating() {
    let table = build_material_table();
    let params = Parameters::new(
        Meters::new(1.0),
        Meters::new(1.0),
        Meters::new(1.0),
        Meters::new(0.1),
        Seconds::new(20.0),
        Celsius::new(20.0),
        Celsius::new(0.0),
        Celsius::new(10.0),
        8.0,
    )
    .unwrap();
    let mut model = VoxelModel::new(params);
    // Scenario (1) geometry with the outer FixedBoundary shell replaced by
    // PARPAING: no boundary through which the domain can exchange energy.
    model.fill_box((0.0, 0.0, 0.0), (1.0, 1.0, 1.0), "PARPAING", None, &table).unwrap();
    model.fill_box((0.1, 0.1, 0.1), (0.8, 0.2, 0.9), "PARPAING", None, &table).unwrap();
    model.fill_box((0.8, 0.1, 0.1), (0.9, 0.9, 0.9), "PARPAING", None, &table).unwrap();
    model.fill_box((0.1, 0.2, 0.1), (0.8, 0.9, 0.9), "AIR", None, &table).unwrap();
    model.prepare();

    let sim = Simulator::new(model, NullSink, SimOptions::default()).unwrap();
    let (report, _sink) = sim.run(Seconds::new(3600.0), Seconds::new(600.0)).unwrap();

    assert!(report.drift_fraction < 0.001, "drift {} exceeds 0.1%", report.drift_fraction);
    assert_eq!(report.rating, DriftRating::Excellent);
}
