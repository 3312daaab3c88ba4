use std::{
    f64::consts::PI,
    fs::File,
    io::{Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    perturbation::PokeParameters, Aberration, AberrationKind, Aperture, Builder, DotfBuilderError,
    Grid, Poke, Pupil,
};

use super::Dotf;

/// [Dotf] builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotfBuilder {
    /// Number of samples per side of the grid
    pub sampling: usize,
    /// Side length of the grid in meters
    pub grid_length: f64,
    /// Aperture diameter in meters
    pub diameter: f64,
    /// Central obscuration diameter as a fraction of the aperture diameter
    pub obscuration: f64,
    /// Focal length in meters
    pub focal_length: f64,
    /// Wavelength in meters
    pub wavelength: f64,
    pub aberration: Aberration,
    pub poke: PokeParameters,
}
/// Default properties:
///  * sampling     : 1024px
///  * grid length  : 1m
///  * diameter     : 0.2m
///  * obscuration  : 0.2
///  * focal length : 0.5m
///  * wavelength   : 1µm
///  * aberration   : astigmatism, 0.1 wave RMS
///  * poke         : 5px wide, 0.24 wave
impl Default for DotfBuilder {
    fn default() -> Self {
        Self {
            sampling: 1024,
            grid_length: 1.,
            diameter: 0.2,
            obscuration: 0.2,
            focal_length: 0.5,
            wavelength: 1e-6,
            aberration: Default::default(),
            poke: Default::default(),
        }
    }
}

/// ## `Dotf` builder
impl DotfBuilder {
    /// Load the builder from a toml file
    pub fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Self, DotfBuilderError> {
        let mut file = File::open(&path)
            .map_err(|e| DotfBuilderError::Open(e, path.as_ref().to_path_buf()))?;
        let mut toml = String::new();
        file.read_to_string(&mut toml)
            .map_err(|e| DotfBuilderError::Read(e, path.as_ref().to_path_buf()))?;
        let builder: DotfBuilder = toml::from_str(&toml)?;
        Ok(builder)
    }
    /// Save the builder into a toml file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), DotfBuilderError> {
        let toml = toml::to_string_pretty(self)?;
        let mut file = File::create(&path)
            .map_err(|e| DotfBuilderError::Create(e, path.as_ref().to_path_buf()))?;
        write!(file, "# ::dotf::DotfBuilder\n\n{}", toml)
            .map_err(|e| DotfBuilderError::Write(e, path.as_ref().to_path_buf()))?;
        Ok(())
    }
    /// Set the number of samples per side of the grid
    pub fn sampling(self, sampling: usize) -> Self {
        Self { sampling, ..self }
    }
    /// Set the side length of the grid in meters
    pub fn grid_length(self, grid_length: f64) -> Self {
        Self {
            grid_length,
            ..self
        }
    }
    /// Set the aperture diameter in meters
    pub fn diameter(self, diameter: f64) -> Self {
        Self { diameter, ..self }
    }
    /// Set the central obscuration ratio
    pub fn obscuration(self, obscuration: f64) -> Self {
        Self {
            obscuration,
            ..self
        }
    }
    /// Set the focal length in meters
    pub fn focal_length(self, focal_length: f64) -> Self {
        Self {
            focal_length,
            ..self
        }
    }
    /// Set the wavelength in meters
    pub fn wavelength(self, wavelength: f64) -> Self {
        Self { wavelength, ..self }
    }
    /// Set the aberration and its RMS in wavelength units
    pub fn aberration(self, kind: AberrationKind, rms: f64) -> Self {
        Self {
            aberration: Aberration::new(kind, rms),
            ..self
        }
    }
    /// Set the poke width in pixels and its amplitude in wavelength units
    pub fn poke(self, sigma: f64, amplitude: f64) -> Self {
        Self {
            poke: PokeParameters { sigma, amplitude },
            ..self
        }
    }
    /// Returns the wavenumber `2π/λ`
    pub fn wavenumber(&self) -> f64 {
        2. * PI / self.wavelength
    }
}

impl Builder for DotfBuilder {
    type Component = Dotf;
    /// Build the `Dotf`
    fn build(self) -> crate::Result<Dotf> {
        let grid = Grid::new(self.sampling, self.grid_length);
        let aperture = Aperture::new(&grid, self.diameter, self.obscuration);
        let offset = grid.offset(aperture.radius());
        log::info!(
            "telescope: {:.3}m diameter, f/{:.2}, {:.3}µm image plane sampling",
            self.diameter,
            aperture.f_number(self.focal_length),
            grid.image_plane_sampling(self.wavelength, self.focal_length) * 1e6
        );
        log::info!(
            "dOTF: {0}x{0} grid, {1:.1}px aperture radius, {2} aberration ({3:.3} wave RMS), poke offset: {4}px",
            self.sampling,
            aperture.radius() / grid.delta,
            self.aberration.kind,
            self.aberration.rms,
            offset
        );
        let wavenumber = self.wavenumber();
        let wavefront = self
            .aberration
            .wavefront(&grid, aperture.radius(), self.wavelength);
        let pupil = Pupil::new(&aperture, &wavefront, wavenumber, grid.delta)?;
        let poke = Poke::off_center(self.sampling, self.poke, offset as isize)?;
        Ok(Dotf {
            grid,
            aperture,
            offset,
            wavenumber,
            wavefront,
            pupil,
            poke,
            builder: self,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chained_setters() {
        let builder = DotfBuilder::default()
            .sampling(128)
            .obscuration(0.)
            .aberration(AberrationKind::Tilt, 0.05)
            .poke(2., 0.1);
        assert_eq!(builder.sampling, 128);
        assert_eq!(builder.obscuration, 0.);
        assert_eq!(builder.aberration, Aberration::new(AberrationKind::Tilt, 0.05));
        assert_eq!(
            builder.poke,
            PokeParameters {
                sigma: 2.,
                amplitude: 0.1
            }
        );
        assert_eq!(builder.diameter, 0.2);
    }

    #[test]
    fn toml_round_trip() {
        let builder = DotfBuilder::default()
            .sampling(256)
            .aberration(AberrationKind::Defocus, 0.02);
        let path = std::env::temp_dir().join("dotf-builder.toml");
        builder.save(&path).unwrap();
        let loaded = DotfBuilder::load(&path).unwrap();
        std::fs::remove_file(path).unwrap();
        assert_eq!(builder, loaded);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            DotfBuilder::load("/this/file/does/not/exist.toml"),
            Err(DotfBuilderError::Open(..))
        ));
    }

    #[test]
    fn poke_outside_the_grid() {
        // an aperture larger than the grid pushes the poke out
        let result = DotfBuilder::default()
            .sampling(32)
            .diameter(1.5)
            .build();
        assert!(matches!(
            result,
            Err(crate::DotfError::PokeOutOfBounds(..))
        ));
    }
}
