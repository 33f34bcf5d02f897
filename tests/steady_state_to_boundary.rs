//! P5: a single solid cell surrounded on all six faces by `FixedBoundary`
//! at `T_ext` must relax to `T_ext` as `t -> infinity` (spec.md §8 P5).

use thermal_voxel_core::material::build_material_table;
use thermal_voxel_core::params::Parameters;
use thermal_voxel_core::sim::{SimOptions, Simulator};
use thermal_voxel_core::sink::NullSink;
use thermal_voxel_core::units::{Celsius, Meters, Seconds};
use thermal_voxel_core::VoxelModel;

#[test]
fn single_cell_relaxes_to_fixed_exterior_temperature() {
    let table = build_material_table();
    let t_ext = Celsius::new(5.0);

    let params = Parameters::new(
        Meters::new(0.2),
        Meters::new(0.2),
        Meters::new(0.2),
        Meters::new(0.1),
        Seconds::new(2000.0),
        Celsius::new(30.0),
        t_ext,
        Celsius::new(10.0),
        3.0,
    )
    .unwrap();

    let mut model = VoxelModel::new(params);
    // The whole 3x3x3 domain starts FixedBoundary at T_ext...
    model
        .fill_box((0.0, 0.0, 0.0), (0.2, 0.2, 0.2), "FIXEDBOUNDARY", Some(t_ext), &table)
        .unwrap();
    // ...except the single center cell, held far from T_ext initially.
    model
        .set_cell(1, 1, 1, "PARPAING", Some(Celsius::new(30.0)), &table)
        .unwrap();
    model.prepare();

    let mut sim = Simulator::new(model, NullSink, SimOptions::default()).unwrap();
    for _ in 0..30 {
        sim.advance_one().unwrap();
    }

    let final_t = sim.model().temperature_at(1, 1, 1);
    assert!(
        (final_t - t_ext.value()).abs() < 1e-6,
        "expected convergence to T_ext={}, got {final_t}",
        t_ext.value()
    );
}
