//! Zernike-like wavefront aberrations

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Grid, Map};

/// Aberration polynomials
///
/// Each polynomial has a unit RMS over the unit disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AberrationKind {
    None,
    Tilt,
    Defocus,
    Coma,
    Astigmatism,
}
impl AberrationKind {
    /// All the non-zero aberrations
    pub const ALL: [AberrationKind; 4] = [
        AberrationKind::Tilt,
        AberrationKind::Defocus,
        AberrationKind::Coma,
        AberrationKind::Astigmatism,
    ];
    /// Evaluates the polynomial at the normalized radius `r` and azimuth `phi`
    pub fn eval(&self, r: f64, phi: f64) -> f64 {
        match self {
            Self::None => 0.,
            Self::Tilt => 2. * r * phi.sin(),
            Self::Defocus => 3f64.sqrt() * (2. * r * r - 1.),
            Self::Coma => 8f64.sqrt() * (3. * r.powi(3) - 2. * r) * phi.sin(),
            Self::Astigmatism => 6f64.sqrt() * r * r * (2. * phi).sin(),
        }
    }
}
impl fmt::Display for AberrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Tilt => write!(f, "tilt"),
            Self::Defocus => write!(f, "defocus"),
            Self::Coma => write!(f, "coma"),
            Self::Astigmatism => write!(f, "astigmatism"),
        }
    }
}

/// Wavefront aberration of a given RMS
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aberration {
    pub kind: AberrationKind,
    /// RMS in wavelength units
    pub rms: f64,
}
/// Default properties:
///  * kind : astigmatism
///  * rms  : 0.1 wavelength
impl Default for Aberration {
    fn default() -> Self {
        Self {
            kind: AberrationKind::Astigmatism,
            rms: 0.1,
        }
    }
}
impl Aberration {
    pub fn new(kind: AberrationKind, rms: f64) -> Self {
        Self { kind, rms }
    }
    /// Returns the wavefront error map in meters
    ///
    /// The polynomial is evaluated over the disk of radius `radius`, the map is zero outside
    pub fn wavefront(&self, grid: &Grid, radius: f64, wavelength: f64) -> Map {
        let rms = self.rms * wavelength;
        grid.normalized_radius(radius)
            .zip_map(&grid.phi, |r, phi| {
                if r > 1. {
                    0.
                } else {
                    rms * self.kind.eval(r, phi)
                }
            })
    }
}
