//! Pupil to image plane propagation

use num_complex::Complex;

use crate::{
    check_shape,
    fourier::{centered_fft2, centered_ifft2, complexify},
    Aperture, DotfError, Field, Map, Poke, Result,
};

/// Complex field in the pupil plane
#[derive(Debug, Clone)]
pub struct Pupil {
    field: Field,
    /// Sample spacing in meters
    pub delta: f64,
}
impl Pupil {
    /// Creates the pupil `aperture x exp(i k w)` from the wavefront error `w` in meters
    pub fn new(aperture: &Aperture, wavefront: &Map, wavenumber: f64, delta: f64) -> Result<Self> {
        check_shape(aperture.as_map(), wavefront)?;
        let field = aperture
            .as_map()
            .zip_map(wavefront, |a, w| Complex::from_polar(a, wavenumber * w));
        Ok(Self { field, delta })
    }
    /// Returns the pupil multiplied by the poke phasor and by the aperture
    pub fn perturb(&self, poke: &Poke, aperture: &Aperture) -> Result<Self> {
        let phasor = poke.phasor();
        check_shape(&self.field, &phasor)?;
        let perturbation = phasor.zip_map(aperture.as_map(), |p, a| p * a);
        Ok(Self {
            field: self.field.component_mul(&perturbation),
            delta: self.delta,
        })
    }
    pub fn field(&self) -> &Field {
        &self.field
    }
    /// Returns the wrapped pupil phase in radians
    pub fn phase(&self) -> Map {
        self.field.map(|c| c.arg())
    }
    /// Returns the image plane field `F{pupil} x delta^2`
    pub fn image(&self) -> Field {
        let d2 = self.delta * self.delta;
        centered_fft2(&self.field).map(|c| c * d2)
    }
    /// Returns the point spread function normalized to unit peak
    pub fn psf(&self) -> Result<Map> {
        let intensity = self.image().map(|c| c.norm_sqr());
        let peak = intensity.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if !peak.is_finite() || peak <= 0. {
            return Err(DotfError::Normalization("PSF", peak));
        }
        Ok(intensity / peak)
    }
    /// Computes the PSF and the OTF
    pub fn transfer_functions(&self) -> Result<TransferFunctions> {
        TransferFunctions::new(self.psf()?)
    }
}

/// Returns the optical transfer function of a PSF normalized to unit peak
///
/// The OTF is divided by its largest modulus sample
pub fn otf(psf: &Map) -> Result<Field> {
    let otf = centered_ifft2(&complexify(psf));
    let peak = otf
        .iter()
        .cloned()
        .max_by(|a, b| a.norm().total_cmp(&b.norm()))
        .unwrap_or_default();
    let norm = peak.norm();
    if !norm.is_finite() || norm == 0. {
        return Err(DotfError::Normalization("OTF", norm));
    }
    Ok(otf.map(|c| c / peak))
}

/// Point spread function and optical transfer function pair
#[derive(Debug, Clone)]
pub struct TransferFunctions {
    pub psf: Map,
    pub otf: Field,
}
impl TransferFunctions {
    pub fn new(psf: Map) -> Result<Self> {
        let otf = otf(&psf)?;
        Ok(Self { psf, otf })
    }
    /// Modulation transfer function `|OTF|`
    pub fn mtf(&self) -> Map {
        self.otf.map(|c| c.norm())
    }
}
