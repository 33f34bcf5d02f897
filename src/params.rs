//! Parameter Block (spec.md §4.2).
//!
//! Pure data plus the derived grid sizes. Validated once at construction;
//! immutable afterwards.

use crate::error::SimError;
use crate::units::{Celsius, Meters, Seconds};
use tracing::info;

/// Physical dimensions, discretization, and initial temperatures for a
/// voxel model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub lx: Meters,
    pub ly: Meters,
    pub lz: Meters,
    pub ds: Meters,
    pub dt: Seconds,
    pub t_int_init: Celsius,
    pub t_ext_init: Celsius,
    pub t_ground_init: Celsius,
    pub h_conv: f64,
    nx: usize,
    ny: usize,
    nz: usize,
}

fn derive_n(length: Meters, ds: Meters) -> Result<usize, SimError> {
    if length.value() <= 0.0 {
        return Err(SimError::BadParameter(format!(
            "length must be > 0, got {length}"
        )));
    }
    let n = (length.value() / ds.value()).round() + 1.0;
    if !n.is_finite() || n < 1.0 || n > f64::from(u32::MAX) {
        return Err(SimError::BadParameter(format!(
            "derived grid size out of range: {n}"
        )));
    }
    Ok(n as usize)
}

impl Parameters {
    /// Construct and validate a parameter block.
    ///
    /// # Errors
    /// Returns [`SimError::BadParameter`] if `ds`/`dt`/any length is not
    /// strictly positive, or if the derived cell count would overflow.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lx: Meters,
        ly: Meters,
        lz: Meters,
        ds: Meters,
        dt: Seconds,
        t_int_init: Celsius,
        t_ext_init: Celsius,
        t_ground_init: Celsius,
        h_conv: f64,
    ) -> Result<Self, SimError> {
        if ds.value() <= 0.0 {
            return Err(SimError::BadParameter(format!("ds must be > 0, got {ds}")));
        }
        if dt.value() <= 0.0 {
            return Err(SimError::BadParameter(format!("dt must be > 0, got {dt}")));
        }

        let nx = derive_n(lx, ds)?;
        let ny = derive_n(ly, ds)?;
        let nz = derive_n(lz, ds)?;

        let total = nx
            .checked_mul(ny)
            .and_then(|v| v.checked_mul(nz))
            .ok_or_else(|| {
                SimError::BadParameter("Nx*Ny*Nz overflows usize".to_string())
            })?;

        info!(
            nx,
            ny, nz, total, "Parameters created ({nx}x{ny}x{nz} = {total} cells)"
        );

        Ok(Self {
            lx,
            ly,
            lz,
            ds,
            dt,
            t_int_init,
            t_ext_init,
            t_ground_init,
            h_conv,
            nx,
            ny,
            nz,
        })
    }

    #[inline]
    #[must_use]
    pub const fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    #[must_use]
    pub const fn ny(&self) -> usize {
        self.ny
    }

    #[inline]
    #[must_use]
    pub const fn nz(&self) -> usize {
        self.nz
    }

    #[inline]
    #[must_use]
    pub const fn grid_len(&self) -> usize {
        self.nx * self.ny * self.nz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Parameters {
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
    fn derives_expected_grid_size() {
        let p = valid();
        assert_eq!(p.nx(), 11);
        assert_eq!(p.ny(), 11);
        assert_eq!(p.nz(), 11);
        assert_eq!(p.grid_len(), 11 * 11 * 11);
    }

    #[test]
    fn rejects_non_positive_ds() {
        let err = Parameters::new(
            Meters::new(1.0),
            Meters::new(1.0),
            Meters::new(1.0),
            Meters::new(0.0),
            Seconds::new(20.0),
            Celsius::new(20.0),
            Celsius::new(0.0),
            Celsius::new(10.0),
            3.0,
        );
        assert!(matches!(err, Err(SimError::BadParameter(_))));
    }

    #[test]
    fn rejects_non_positive_length() {
        let err = Parameters::new(
            Meters::new(-1.0),
            Meters::new(1.0),
            Meters::new(1.0),
            Meters::new(0.1),
            Seconds::new(20.0),
            Celsius::new(20.0),
            Celsius::new(0.0),
            Celsius::new(10.0),
            3.0,
        );
        assert!(matches!(err, Err(SimError::BadParameter(_))));
    }
}
