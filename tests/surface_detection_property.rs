//! P8: an AIR-filled box of size `a x b x c` cells surrounded by a
//! one-cell solid shell has a detected surface set of exactly
//! `2(ab+bc+ca)` cells (spec.md §8 P8), pinning `round-to-nearest`
//! fill_box indexing (spec.md §9 Open Questions).

use thermal_voxel_core::material::build_material_table;
use thermal_voxel_core::params::Parameters;
use thermal_voxel_core::units::{Celsius, Meters, Seconds};
use thermal_voxel_core::VoxelModel;

#[test]
fn air_box_surrounded_by_one_cell_shell_has_2ab_plus_bc_plus_ca_surface_cells() {
    let (a, b, c) = (2usize, 3usize, 4usize);
    let ds = 0.1;
    let table = build_material_table();

    let params = Parameters::new(
        Meters::new((a + 1) as f64 * ds),
        Meters::new((b + 1) as f64 * ds),
        Meters::new((c + 1) as f64 * ds),
        Meters::new(ds),
        Seconds::new(20.0),
        Celsius::new(20.0),
        Celsius::new(0.0),
        Celsius::new(10.0),
        3.0,
    )
    .unwrap();

    let mut model = VoxelModel::new(params);
    assert_eq!(model.params().nx(), a + 2);
    assert_eq!(model.params().ny(), b + 2);
    assert_eq!(model.params().nz(), c + 2);

    // Whole grid starts Solid (PARPAING) as the one-cell shell; carve the
    // interior a x b x c box out to AIR.
    model
        .fill_box(
            (0.0, 0.0, 0.0),
            ((a + 1) as f64 * ds, (b + 1) as f64 * ds, (c + 1) as f64 * ds),
            "PARPAING",
            None,
            &table,
        )
        .unwrap();
    for k in 1..=c {
        for j in 1..=b {
            for i in 1..=a {
                model.set_cell(i, j, k, "AIR", None, &table).unwrap();
            }
        }
    }
    model.prepare();

    let expected = 2 * (a * b + b * c + c * a);
    let zone_id = *model.zones().keys().next().unwrap();
    let surface = model.surfaces().get(&zone_id).unwrap();
    assert_eq!(surface.len(), expected);
}
