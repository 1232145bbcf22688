//! Length and angle scalars.
//!
//! `Length` and `Angle` are kept as distinct types so that a length can
//! never be added to an angle by accident. Only like-quantity arithmetic
//! is implemented; conversions between the two require going through an
//! explicit formula (e.g. `atan2` of two lengths yields a plain `f64`
//! ratio before it is wrapped back into an `Angle`).

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A length in metres.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Length(f64);

impl Length {
    pub const fn metres(value: f64) -> Self {
        Length(value)
    }

    pub const fn meters(&self) -> f64 {
        self.0
    }

    pub fn abs(self) -> Self {
        Length(self.0.abs())
    }

    pub fn hypot(self, other: Length) -> Length {
        Length(self.0.hypot(other.0))
    }
}

impl Add for Length {
    type Output = Length;
    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Length;
    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

impl Neg for Length {
    type Output = Length;
    fn neg(self) -> Length {
        Length(-self.0)
    }
}

impl Mul<f64> for Length {
    type Output = Length;
    fn mul(self, rhs: f64) -> Length {
        Length(self.0 * rhs)
    }
}

impl Div<f64> for Length {
    type Output = Length;
    fn div(self, rhs: f64) -> Length {
        Length(self.0 / rhs)
    }
}

/// Dividing two lengths yields a dimensionless ratio.
impl Div<Length> for Length {
    type Output = f64;
    fn div(self, rhs: Length) -> f64 {
        self.0 / rhs.0
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m", self.0)
    }
}

/// An angle, stored in degrees.
///
/// Geodetic coordinates (`LatLon`) are naturally expressed in degrees;
/// `to_radians`/`from_radians` exist for the handful of call sites
/// (projector setup, corner-turn computation) that need radians.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Angle(f64);

impl Angle {
    pub const fn degrees(value: f64) -> Self {
        Angle(value)
    }

    pub fn from_radians(value: f64) -> Self {
        Angle(value.to_degrees())
    }

    pub const fn as_degrees(&self) -> f64 {
        self.0
    }

    pub fn to_radians(&self) -> f64 {
        self.0.to_radians()
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\u{00B0}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_arithmetic_is_closed() {
        let a = Length::metres(5.0);
        let b = Length::metres(3.0);
        assert_eq!((a + b).meters(), 8.0);
        assert_eq!((a - b).meters(), 2.0);
        assert_eq!((a * 2.0).meters(), 10.0);
        assert_eq!((a / b), 5.0 / 3.0);
    }

    #[test]
    fn angle_round_trips_through_radians() {
        let a = Angle::degrees(45.0);
        let back = Angle::from_radians(a.to_radians());
        assert!((back.as_degrees() - 45.0).abs() < 1e-9);
    }
}
