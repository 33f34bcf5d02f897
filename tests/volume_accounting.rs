//! Scenario 5 / P3: fill_box volume accounting, and the derived air-zone
//! heat capacity that `prepare()` finalizes from that volume (spec.md §8
//! scenario 5, §3 AirZone).

use thermal_voxel_core::material::{build_material_table, AIR_CP, AIR_RHO};
use thermal_voxel_core::params::Parameters;
use thermal_voxel_core::units::{Celsius, Meters, Seconds};
use thermal_voxel_core::VoxelModel;

fn params() -> Parameters {
    Parameters::new(
        Meters::new(1.0),
        Meters::new(1.0),
        Meters::new(1.0),
        Meters::new(0.1),
        Seconds::new(20.0),
        Celsius::new(20.0),
        Celsius::new(0.0),
        Celsius::new(10.0),
        3.0,
    )
    .unwrap()
}

#[test]
fn fill_box_adds_512_air_cells_then_64_are_reclaimed_as_solid() {
    let table = build_material_table();
    let mut model = VoxelModel::new(params());

    // 8x8x8 = 512 cells of AIR at ds=0.1 -> 0.512 m^3 (spec.md §8 scenario 5).
    model
        .fill_box((0.1, 0.1, 0.1), (0.8, 0.8, 0.8), "AIR", None, &table)
        .unwrap();
    let zone_id = *model.zones().keys().next().unwrap();
    assert!((model.zones().get(&zone_id).unwrap().volume_m3 - 0.512).abs() < 1e-9);

    for i in 1..=4 {
        for j in 1..=4 {
            for k in 1..=4 {
                model.set_cell(i, j, k, "PARPAING", None, &table).unwrap();
            }
        }
    }
    assert!((model.zones().get(&zone_id).unwrap().volume_m3 - 0.448).abs() < 1e-9);
}

#[test]
fn prepared_zone_capacity_matches_volume_times_air_rho_cp() {
    let table = build_material_table();
    let mut model = VoxelModel::new(params());
    model
        .fill_box((0.1, 0.1, 0.1), (0.8, 0.8, 0.8), "AIR", None, &table)
        .unwrap();
    model.prepare();

    let zone_id = *model.zones().keys().next().unwrap();
    let zone = model.zones().get(&zone_id).unwrap();
    let expected = zone.volume_m3 * AIR_RHO * AIR_CP;
    assert!((zone.capacity_j_per_k - expected).abs() < 1e-6);
}
