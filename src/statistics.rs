//! Wavefront error statistics

use nalgebra::DMatrix;
use serde::Serialize;
use std::fmt;

use crate::{check_shape, DotfError, Map, Result};

/// Population standard deviation of the samples selected by `mask`
pub fn masked_std(map: &Map, mask: &DMatrix<bool>) -> Result<f64> {
    check_shape(map, mask)?;
    let values: Vec<f64> = map
        .iter()
        .zip(mask.iter())
        .filter_map(|(v, m)| if *m { Some(*v) } else { None })
        .collect();
    if values.is_empty() {
        return Err(DotfError::EmptyMask("statistics"));
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Ok(var.sqrt())
}

/// Wavefront error RMS in nanometers of a phase map in radians
pub fn rms_nm(phase: &Map, mask: &DMatrix<bool>, wavenumber: f64) -> Result<f64> {
    Ok(masked_std(phase, mask)? / wavenumber * 1e9)
}

/// Residual phase `(input - output) x aperture`
pub fn residual(input: &Map, output: &Map, aperture: &Map) -> Result<Map> {
    check_shape(input, output)?;
    check_shape(input, aperture)?;
    Ok((input - output).component_mul(aperture))
}

/// Input, recovered and residual wavefront error RMS in nanometers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WavefrontStats {
    pub input: f64,
    pub output: f64,
    pub residual: f64,
}
impl WavefrontStats {
    /// Computes the statistics over the pixels inside the aperture
    ///
    /// Returns the statistics and the residual phase map
    pub fn new(
        input_phase: &Map,
        output_phase: &Map,
        aperture: &Map,
        wavenumber: f64,
    ) -> Result<(Self, Map)> {
        let mask = aperture.map(|a| a > 0.);
        let residual = residual(input_phase, output_phase, aperture)?;
        let stats = Self {
            input: rms_nm(input_phase, &mask, wavenumber)?,
            output: rms_nm(output_phase, &mask, wavenumber)?,
            residual: rms_nm(&residual, &mask, wavenumber)?,
        };
        Ok((stats, residual))
    }
}
impl fmt::Display for WavefrontStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RMS_input (nm): {:.3}", self.input)?;
        writeln!(f, "RMS_out (nm): {:.3}", self.output)?;
        write!(f, "RMS_residual (nm): {:.3}", self.residual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn std_over_selection_only() {
        let map = Map::from_row_slice(2, 3, &[1., 3., 100., 5., 7., -100.]);
        let mask = DMatrix::from_row_slice(2, 3, &[true, true, false, true, true, false]);
        // samples 1,3,5,7: mean 4, variance (9+1+1+9)/4
        assert!((masked_std(&map, &mask).unwrap() - 5f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn empty_mask() {
        let mask = DMatrix::from_element(3, 3, false);
        assert!(matches!(
            masked_std(&Map::zeros(3, 3), &mask),
            Err(DotfError::EmptyMask(_))
        ));
    }

    #[test]
    fn synthetic_residual() {
        let k = 2. * PI / 1e-6;
        let aperture = Map::from_row_slice(2, 2, &[1., 1., 1., 0.]);
        let input = Map::from_row_slice(2, 2, &[0.5, -0.5, 1.5, 9.]);
        let output = Map::from_row_slice(2, 2, &[0.25, -0.25, 0.75, -9.]);
        let (stats, residual) = WavefrontStats::new(&input, &output, &aperture, k).unwrap();
        assert_eq!(residual, Map::from_row_slice(2, 2, &[0.25, -0.25, 0.75, 0.]));
        let std = |v: [f64; 3]| {
            let m = v.iter().sum::<f64>() / 3.;
            (v.iter().map(|x| (x - m).powi(2)).sum::<f64>() / 3.).sqrt()
        };
        assert!((stats.input - std([0.5, -0.5, 1.5]) / k * 1e9).abs() < 1e-9);
        assert!((stats.output - std([0.25, -0.25, 0.75]) / k * 1e9).abs() < 1e-9);
        assert!((stats.residual - std([0.25, -0.25, 0.75]) / k * 1e9).abs() < 1e-9);
    }

    #[test]
    fn constant_offset_is_ignored() {
        // k = 1e9 gives the RMS in radians
        let k = 1e9;
        let aperture = Map::from_element(4, 4, 1.);
        let input = Map::from_fn(4, 4, |i, j| (i * 4 + j) as f64);
        let output = input.map(|x| x + 2. * PI);
        let (stats, _) = WavefrontStats::new(&input, &output, &aperture, k).unwrap();
        assert!(stats.residual < 1e-9);
        assert!((stats.input - stats.output).abs() < 1e-9);
    }

    #[test]
    fn display() {
        let stats = WavefrontStats {
            input: 100.,
            output: 98.5,
            residual: 4.25,
        };
        let text = stats.to_string();
        assert!(text.starts_with("RMS_input (nm): 100.000"));
        assert!(text.contains("RMS_out (nm): 98.500"));
        assert!(text.ends_with("RMS_residual (nm): 4.250"));
    }
}
