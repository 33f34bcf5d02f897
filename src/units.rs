//! Semantic unit newtypes for the voxel thermal engine.
//!
//! Thin wrappers around `f64` so that a Celsius value and a raw `f64` offset,
//! or a length in meters and a cell count, can't be silently swapped at a
//! call site. Each type implements the handful of traits actually used
//! elsewhere in the crate (`Display`, total ordering via `total_cmp`,
//! arithmetic where it's meaningful).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

#[inline]
fn total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

macro_rules! scalar_unit {
    ($name:ident, $unit:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(pub f64);

        impl $name {
            #[inline]
            #[must_use]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            #[inline]
            #[must_use]
            pub const fn value(self) -> f64 {
                self.0
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                total_cmp(self.0, other.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.3}{}", self.0, $unit)
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }
    };
}

scalar_unit!(Celsius, "\u{b0}C");
scalar_unit!(Kelvin, "K");
scalar_unit!(Meters, "m");
scalar_unit!(Seconds, "s");
scalar_unit!(Watts, "W");

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

impl Celsius {
    #[inline]
    #[must_use]
    pub const fn to_kelvin(self) -> Kelvin {
        Kelvin(self.0 + KELVIN_OFFSET)
    }
}

impl Kelvin {
    #[inline]
    #[must_use]
    pub const fn to_celsius(self) -> Celsius {
        Celsius(self.0 - KELVIN_OFFSET)
    }
}

impl From<Celsius> for Kelvin {
    fn from(c: Celsius) -> Self {
        c.to_kelvin()
    }
}

impl From<Kelvin> for Celsius {
    fn from(k: Kelvin) -> Self {
        k.to_celsius()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_kelvin_roundtrip() {
        let c = Celsius::new(21.5);
        let k: Kelvin = c.into();
        assert!((k.value() - 294.65).abs() < 1e-9);
        let back: Celsius = k.into();
        assert!((back.value() - c.value()).abs() < 1e-9);
    }

    #[test]
    fn ordering_handles_values() {
        let a = Celsius::new(-10.0);
        let b = Celsius::new(20.0);
        assert!(a < b);
        assert_eq!(a.min(b), a);
    }
}
