//! Localized pupil phase poke

use nalgebra::DMatrix;
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::{DotfError, Field, Map, Result};

/// Unit peak 2D Gaussian
///
/// `center` is the `(row, column)` location of the peak, in pixels
pub fn gaussian2d(size: usize, sigma: f64, center: (f64, f64)) -> Map {
    let (ci, cj) = center;
    let s2 = 2. * sigma * sigma;
    DMatrix::from_fn(size, size, |i, j| {
        let di = i as f64 - ci;
        let dj = j as f64 - cj;
        (-(di * di + dj * dj) / s2).exp()
    })
}

/// Poke parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PokeParameters {
    /// Gaussian standard deviation in pixels
    pub sigma: f64,
    /// Peak phase in wavelength units
    pub amplitude: f64,
}
/// Default properties:
///  * sigma     : 5px
///  * amplitude : 0.24 wavelength
impl Default for PokeParameters {
    fn default() -> Self {
        Self {
            sigma: 5.,
            amplitude: 0.24,
        }
    }
}

/// Phase-only Gaussian poke
#[derive(Debug, Clone)]
pub struct Poke {
    pub parameters: PokeParameters,
    /// Poke `(row, column)` location
    pub center: (usize, usize),
    bump: Map,
}
impl Poke {
    /// Creates a poke centered on the pixel `center` of a `size`x`size` grid
    pub fn new(size: usize, parameters: PokeParameters, center: (isize, isize)) -> Result<Self> {
        let (i, j) = center;
        let inside = |k: isize| k >= 0 && (k as usize) < size;
        if !(inside(i) && inside(j)) {
            return Err(DotfError::PokeOutOfBounds(i, j, size));
        }
        let center = (i as usize, j as usize);
        log::debug!(
            "poke at {:?}: {:.1}px wide, {:.3} wave",
            center,
            parameters.sigma,
            parameters.amplitude
        );
        Ok(Self {
            parameters,
            center,
            bump: gaussian2d(size, parameters.sigma, (i as f64, j as f64)),
        })
    }
    /// Creates a poke `offset` pixels to the right of the grid center along the x axis
    pub fn off_center(size: usize, parameters: PokeParameters, offset: isize) -> Result<Self> {
        let c = (size / 2) as isize;
        Self::new(size, parameters, (c, c + offset))
    }
    /// Returns the poke phase in radians
    pub fn phase(&self) -> Map {
        let a = 2. * PI * self.parameters.amplitude;
        self.bump.map(|g| a * g)
    }
    /// Returns the unit amplitude phasor `exp(i phase)`
    pub fn phasor(&self) -> Field {
        self.phase().map(|p| Complex::from_polar(1., p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_peak() {
        let g = gaussian2d(32, 2., (10., 20.));
        assert_eq!(g[(10, 20)], 1.);
        assert!((g[(10, 22)] - (-0.5f64).exp()).abs() < 1e-15);
        assert!((g[(8, 20)] - g[(12, 20)]).abs() < 1e-15);
    }

    #[test]
    fn off_center_poke() {
        let poke = Poke::off_center(64, PokeParameters::default(), 6).unwrap();
        assert_eq!(poke.center, (32, 38));
        let phase = poke.phase();
        assert!((phase[(32, 38)] - 2. * PI * 0.24).abs() < 1e-12);
        assert!(poke.phasor().iter().all(|c| (c.norm() - 1.).abs() < 1e-12));
    }

    #[test]
    fn out_of_bounds() {
        assert!(matches!(
            Poke::off_center(64, PokeParameters::default(), 40),
            Err(DotfError::PokeOutOfBounds(32, 72, 64))
        ));
        assert!(Poke::new(64, PokeParameters::default(), (-1, 3)).is_err());
    }

    #[test]
    fn zero_amplitude() {
        let parameters = PokeParameters {
            amplitude: 0.,
            ..Default::default()
        };
        let poke = Poke::off_center(32, parameters, 4).unwrap();
        assert!(poke
            .phasor()
            .iter()
            .all(|c| *c == Complex::new(1., 0.)));
    }
}
