//! Differential optical transfer function
//!
//! A poke at `p` in the pupil adds to the OTF two copies of the pupil field: the pupil itself
//! centered at `-p` and its complex conjugate flipped around the origin and centered at `+p`.
//! Both copies are isolated with the aperture rolled by `-p` and `+p`, the `-p` copy is
//! unwrapped and rolled back onto the pupil.

use nalgebra::DMatrix;

use crate::{check_shape, fourier::roll, unwrap::unwrap_phase, Aperture, Field, Map, Result};

/// Aperture copies centered on the two dOTF lobes
#[derive(Debug, Clone)]
pub struct LobeMasks {
    /// Lateral shift in pixels
    pub offset: usize,
    /// Aperture rolled by `-offset`, holds the pupil copy
    pub pupil: Map,
    /// Aperture rolled by `+offset`, holds the conjugated pupil copy
    pub conjugate: Map,
}
impl LobeMasks {
    pub fn new(aperture: &Aperture, offset: usize) -> Self {
        let shift = offset as isize;
        Self {
            offset,
            pupil: aperture.rolled(-shift),
            conjugate: aperture.rolled(shift),
        }
    }
    /// Returns the union of both masks
    pub fn both(&self) -> Map {
        (&self.pupil + &self.conjugate).map(|m| m.min(1.))
    }
}

/// Difference between the reference and the poked OTFs
#[derive(Debug, Clone)]
pub struct DifferentialOtf {
    dotf: Field,
}
impl DifferentialOtf {
    /// Computes `otf - poked_otf`
    pub fn new(otf: &Field, poked_otf: &Field) -> Result<Self> {
        check_shape(otf, poked_otf)?;
        Ok(Self {
            dotf: otf - poked_otf,
        })
    }
    pub fn as_field(&self) -> &Field {
        &self.dotf
    }
    /// dOTF modulus
    pub fn amplitude(&self) -> Map {
        self.dotf.map(|c| c.norm())
    }
    /// dOTF argument in radians
    pub fn phase(&self) -> Map {
        self.dotf.map(|c| c.arg())
    }
    /// Returns the dOTF phase within both lobes, 0 elsewhere
    pub fn lobes_phase(&self, masks: &LobeMasks) -> Map {
        self.phase().component_mul(&masks.both())
    }
    /// Recovers the pupil phase in radians
    ///
    /// The phase of the pupil lobe is unwrapped within the lobe mask and rolled back by the mask
    /// offset, so that it lines up with the aperture. The phase is zero outside the lobe before
    /// the roll back.
    pub fn pupil_phase(&self, masks: &LobeMasks) -> Result<Map> {
        check_shape(&self.dotf, &masks.pupil)?;
        let masked_phase = self.phase().component_mul(&masks.pupil);
        let selection: DMatrix<bool> = masks.pupil.map(|m| m > 0.);
        let unwrapped = unwrap_phase(&masked_phase, Some(&selection))?;
        Ok(roll(&unwrapped, 0, masks.offset as isize))
    }
}
