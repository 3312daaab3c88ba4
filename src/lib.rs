//!
//! # Differential Optical Transfer Function (dOTF) wavefront sensing
//!
//! The crate simulates a dOTF wavefront sensor: a telescope pupil with a known aberration is
//! imaged before and after a small localized phase poke and the difference of the two
//! optical transfer functions gives back the pupil phase.
//!
//! The simulation is assembled from its builder:
//! ```no_run
//! use dotf::{AberrationKind, Builder, Dotf, FromBuilder};
//!
//! let dotf = Dotf::builder()
//!     .sampling(256)
//!     .aberration(AberrationKind::Coma, 0.1)
//!     .build()?;
//! let measurement = dotf.run()?;
//! println!("{}", measurement.stats);
//! # Ok::<(), dotf::DotfError>(())
//! ```

pub mod aberration;
pub mod differential;
pub mod error;
pub mod fourier;
pub mod grid;
pub mod maps;
pub mod perturbation;
pub mod propagation;
pub mod simulation;
pub mod statistics;
pub mod unwrap;

#[doc(inline)]
pub use self::aberration::{Aberration, AberrationKind};
#[doc(inline)]
pub use self::differential::{DifferentialOtf, LobeMasks};
#[doc(inline)]
pub use self::error::{DotfBuilderError, DotfError};
#[doc(inline)]
pub use self::grid::{Aperture, Grid};
#[doc(inline)]
pub use self::maps::{FieldMap, Maps};
#[doc(inline)]
pub use self::perturbation::{gaussian2d, Poke, PokeParameters};
#[doc(inline)]
pub use self::propagation::{Pupil, TransferFunctions};
#[doc(inline)]
pub use self::simulation::{Dotf, DotfBuilder, Measurement};
#[doc(inline)]
pub use self::statistics::WavefrontStats;
#[doc(inline)]
pub use self::unwrap::unwrap_phase;

/// Real valued N×N map
pub type Map = nalgebra::DMatrix<f64>;
/// Complex valued N×N field
pub type Field = nalgebra::DMatrix<num_complex::Complex<f64>>;

pub type Result<T> = std::result::Result<T, DotfError>;

/// Builder type trait
pub trait Builder: Default {
    type Component;
    fn new() -> Self {
        Default::default()
    }
    fn build(self) -> Result<Self::Component>;
}

/// Gives access to the builder of a component
pub trait FromBuilder {
    type ComponentBuilder: Builder;
    fn builder() -> Self::ComponentBuilder {
        Default::default()
    }
}

/// Checks that two maps have the same shape
pub(crate) fn check_shape<T: nalgebra::Scalar, U: nalgebra::Scalar>(
    expected: &nalgebra::DMatrix<T>,
    found: &nalgebra::DMatrix<U>,
) -> Result<()> {
    if expected.shape() == found.shape() {
        Ok(())
    } else {
        Err(DotfError::ShapeMismatch(expected.shape(), found.shape()))
    }
}
