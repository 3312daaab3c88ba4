//! dOTF wavefront sensing simulation
//!
//! The simulation images the aberrated pupil twice, with and without the poke, and recovers the
//! pupil phase from the difference of both OTFs.

use crate::{
    differential::{DifferentialOtf, LobeMasks},
    maps::{FieldMap, Maps},
    statistics::WavefrontStats,
    unwrap::unwrap_phase,
    Aperture, FromBuilder, Grid, Map, Poke, Pupil, Result, TransferFunctions,
};

mod builder;
pub use builder::DotfBuilder;

/// Half width in meters of the pupil plane maps
const PUPIL_ZOOM: f64 = 0.2;
/// Half width in meters of the image plane maps
const IMAGE_ZOOM: f64 = 50e-6;

/// dOTF simulation
#[derive(Debug, Clone)]
pub struct Dotf {
    grid: Grid,
    aperture: Aperture,
    offset: usize,
    wavenumber: f64,
    wavefront: Map,
    pupil: Pupil,
    poke: Poke,
    builder: DotfBuilder,
}
impl FromBuilder for Dotf {
    type ComponentBuilder = DotfBuilder;
}

/// Results of a [Dotf] run
#[derive(Debug, Clone)]
pub struct Measurement {
    pub stats: WavefrontStats,
    /// Reference PSF and OTF
    pub reference: TransferFunctions,
    /// PSF and OTF of the poked pupil
    pub poked: TransferFunctions,
    pub dotf: DifferentialOtf,
    pub masks: LobeMasks,
    /// Unwrapped phase of the reference pupil in radians
    pub input_phase: Map,
    /// Unwrapped phase of the poked pupil in radians
    pub poked_input_phase: Map,
    /// Phase recovered from the dOTF in radians
    pub output_phase: Map,
    /// `(input_phase - output_phase) x aperture`
    pub residual: Map,
}

impl Dotf {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
    pub fn aperture(&self) -> &Aperture {
        &self.aperture
    }
    /// Poke and lobes offset in pixels
    pub fn offset(&self) -> usize {
        self.offset
    }
    pub fn wavenumber(&self) -> f64 {
        self.wavenumber
    }
    /// Wavefront error in meters
    pub fn wavefront(&self) -> &Map {
        &self.wavefront
    }
    pub fn pupil(&self) -> &Pupil {
        &self.pupil
    }
    pub fn poke(&self) -> &Poke {
        &self.poke
    }
    /// Returns the builder the simulation was built from
    pub fn parameters(&self) -> &DotfBuilder {
        &self.builder
    }
    /// Returns the pupil with the poke applied
    pub fn poked_pupil(&self) -> Result<Pupil> {
        self.pupil.perturb(&self.poke, &self.aperture)
    }
    /// Runs the simulation
    pub fn run(&self) -> Result<Measurement> {
        let mask = self.aperture.mask();

        let reference = self.pupil.transfer_functions()?;
        let poked_pupil = self.poked_pupil()?;
        let poked = poked_pupil.transfer_functions()?;
        log::debug!("reference and poked OTFs computed");

        let dotf = DifferentialOtf::new(&reference.otf, &poked.otf)?;
        let masks = LobeMasks::new(&self.aperture, self.offset);
        let output_phase = dotf.pupil_phase(&masks)?;

        let input_phase = unwrap_phase(&self.pupil.phase(), Some(&mask))?;
        let poked_input_phase = unwrap_phase(&poked_pupil.phase(), Some(&mask))?;

        let (stats, residual) = WavefrontStats::new(
            &input_phase,
            &output_phase,
            self.aperture.as_map(),
            self.wavenumber,
        )?;
        log::info!(
            "RMS input: {:.3}nm, output: {:.3}nm, residual: {:.3}nm",
            stats.input,
            stats.output,
            stats.residual
        );

        Ok(Measurement {
            stats,
            reference,
            poked,
            dotf,
            masks,
            input_phase,
            poked_input_phase,
            output_phase,
            residual,
        })
    }
    /// Collects the maps of a measurement
    ///
    /// Pupil plane maps are cropped to ±20cm and image plane maps to ±50µm
    pub fn maps(&self, measurement: &Measurement) -> Maps {
        let pupil_extent = self.grid.extent();
        let image_extent = self
            .grid
            .image_plane_extent(self.builder.wavelength, self.builder.focal_length);
        let pupil_map = |name: &str, title: &str, map: &Map| {
            FieldMap::new(name, title, map)
                .extent(pupil_extent)
                .zoom(PUPIL_ZOOM)
        };
        let image_map = |name: &str, title: &str, map: &Map| {
            FieldMap::new(name, title, map)
                .extent(image_extent)
                .zoom(IMAGE_ZOOM)
        };
        let mut maps = Maps::default();
        maps.push(pupil_map(
            "input-phase",
            "Input pupil phase",
            &measurement.input_phase,
        ))
        .push(pupil_map(
            "poked-phase",
            "Perturbed pupil phase",
            &measurement.poked_input_phase,
        ))
        .push(FieldMap::new(
            "dotf-amplitude",
            "dOTF amplitude",
            &measurement.dotf.amplitude(),
        ))
        .push(FieldMap::new(
            "dotf-phase",
            "dOTF phase",
            &measurement.dotf.lobes_phase(&measurement.masks),
        ))
        .push(pupil_map(
            "unwrapped-phase",
            "Unwrapped phase",
            &measurement.output_phase,
        ))
        .push(pupil_map(
            "residual",
            "Residual wavefront error",
            &measurement.residual,
        ))
        .push(image_map("psf", "PSF", &measurement.reference.psf))
        .push(image_map("poked-psf", "Poked PSF", &measurement.poked.psf))
        .push(FieldMap::new("mtf", "MTF", &measurement.reference.mtf()));
        maps
    }
}
