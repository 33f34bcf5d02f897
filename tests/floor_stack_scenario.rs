//! Scenario 4: extruded material plans across three z-slabs, verifying
//! per-slab kind and temperature assignment (spec.md §8 scenario 4).

use rustc_hash::FxHashMap;
use thermal_voxel_core::material::build_material_table;
use thermal_voxel_core::model::CellKind;
use thermal_voxel_core::params::Parameters;
use thermal_voxel_core::units::{Celsius, Meters, Seconds};
use thermal_voxel_core::VoxelModel;

#[test]
fn floor_stack_slabs_get_distinct_kind_and_temperature() {
    let table = build_material_table();
    let params = Parameters::new(
        Meters::new(0.1),
        Meters::new(0.1),
        Meters::new(0.4),
        Meters::new(0.1),
        Seconds::new(20.0),
        Celsius::new(20.0),
        Celsius::new(0.0),
        Celsius::new(10.0),
        3.0,
    )
    .unwrap();
    let mut model = VoxelModel::new(params);
    assert_eq!(model.params().nz(), 5);

    let plan = vec![vec![1, 1], vec![1, 1]];

    let mut terre_map = FxHashMap::default();
    terre_map.insert(1, ("TERRE".to_string(), Some(Celsius::new(12.0))));
    model.extrude_plan(0.0, 0.1, &plan, &terre_map, &table).unwrap();

    let mut beton_map = FxHashMap::default();
    beton_map.insert(1, ("BETON".to_string(), Some(Celsius::new(15.0))));
    model.extrude_plan(0.1, 0.3, &plan, &beton_map, &table).unwrap();

    let mut parquet_map = FxHashMap::default();
    parquet_map.insert(1, ("PARQUET".to_string(), Some(Celsius::new(18.0))));
    model.extrude_plan(0.3, 0.4, &plan, &parquet_map, &table).unwrap();

    model.prepare();

    for j in 0..2 {
        for i in 0..2 {
            assert_eq!(model.kind_at(i, j, 0), CellKind::Solid);
            assert!((model.temperature_at(i, j, 0) - 12.0).abs() < 1e-9);

            assert_eq!(model.kind_at(i, j, 1), CellKind::Solid);
            assert!((model.temperature_at(i, j, 1) - 15.0).abs() < 1e-9);
            assert_eq!(model.kind_at(i, j, 2), CellKind::Solid);
            assert!((model.temperature_at(i, j, 2) - 15.0).abs() < 1e-9);

            assert_eq!(model.kind_at(i, j, 3), CellKind::Solid);
            assert!((model.temperature_at(i, j, 3) - 18.0).abs() < 1e-9);
        }
    }
}
