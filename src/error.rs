//! Error taxonomy for the voxel thermal engine (spec.md §7).
//!
//! A single hand-rolled enum, mirroring the teacher crate's
//! `PersistenceError` pattern: `Display` and `std::error::Error` implemented
//! by hand, no `thiserror`. Build-time errors (`BadParameter`,
//! `UnknownMaterial`, `OutOfBounds`, `AirZoneFusionUnsupported`) leave the
//! model/parameters unchanged; `NotPrepared` and `Unstable` leave no
//! `Simulator` state; `NumericDivergence` is raised mid-run.

use std::fmt;

/// Grid coordinates, used in several error variants for diagnostics.
pub type CellCoord = (usize, usize, usize);

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A parameter failed validation (`ds`/`dt`/`L` <= 0, or the derived
    /// cell count overflows).
    BadParameter(String),
    /// A material name was not found in the `MaterialTable`.
    UnknownMaterial(String),
    /// A requested coordinate or box falls entirely outside the grid.
    OutOfBounds(String),
    /// `set_cell`/`extrude_plan` would merge two distinct, already-existing
    /// air zones.
    AirZoneFusionUnsupported {
        at: CellCoord,
        zones: (i32, i32),
    },
    /// A `Simulator` was constructed from a model that was never `prepare`d.
    NotPrepared,
    /// CFL number exceeded 1/6 at construction time.
    Unstable { cfl: f64 },
    /// NaN/Inf appeared in the shadow temperature buffer during a step.
    NumericDivergence { at: CellCoord, step: u64 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadParameter(msg) => write!(f, "bad parameter: {msg}"),
            Self::UnknownMaterial(name) => write!(f, "unknown material '{name}'"),
            Self::OutOfBounds(msg) => write!(f, "out of bounds: {msg}"),
            Self::AirZoneFusionUnsupported { at, zones } => write!(
                f,
                "cell {at:?} touches two distinct air zones ({} and {}); fusion is unsupported",
                zones.0, zones.1
            ),
            Self::NotPrepared => write!(f, "model must be prepare()d before simulation"),
            Self::Unstable { cfl } => {
                write!(f, "CFL factor {cfl:.4} exceeds the stability limit 1/6")
            }
            Self::NumericDivergence { at, step } => {
                write!(f, "NaN/Inf encountered at cell {at:?} on step {step}")
            }
        }
    }
}

impl std::error::Error for SimError {}
