//! Pupil sampling grid and telescope aperture

use nalgebra::DMatrix;

use crate::{fourier, Map};

/// Square sampling grid centered on zero
///
/// Rows follow the y axis and columns the x axis, the sample `i` is at `(i - N/2) x delta`
#[derive(Debug, Clone)]
pub struct Grid {
    /// Number of samples per side
    pub size: usize,
    /// Side length in meters
    pub length: f64,
    /// Sample spacing in meters
    pub delta: f64,
    /// Radial coordinate `sqrt(x^2+y^2)` in meters
    pub rho: Map,
    /// Azimuthal coordinate `atan2(y,x)` in radians
    pub phi: Map,
}
impl Grid {
    /// Creates a `size`x`size` grid over a `length` wide square
    pub fn new(size: usize, length: f64) -> Self {
        let delta = length / size as f64;
        let half = (size / 2) as f64;
        let xy = |i: usize| (i as f64 - half) * delta;
        let rho = DMatrix::from_fn(size, size, |i, j| xy(j).hypot(xy(i)));
        let phi = DMatrix::from_fn(size, size, |i, j| xy(i).atan2(xy(j)));
        log::debug!(
            "grid: {size}x{size} samples, {:.3}mm sampling",
            delta * 1e3
        );
        Self {
            size,
            length,
            delta,
            rho,
            phi,
        }
    }
    /// Returns the 1D sample coordinates in meters
    pub fn coordinates(&self) -> Vec<f64> {
        let half = (self.size / 2) as f64;
        (0..self.size)
            .map(|i| (i as f64 - half) * self.delta)
            .collect()
    }
    /// Returns `[x_first, x_last, y_first, y_last]`
    pub fn extent(&self) -> [f64; 4] {
        let x = self.coordinates();
        let (first, last) = (x[0], x[self.size - 1]);
        [first, last, first, last]
    }
    /// Index of the sample at the origin
    pub fn center(&self) -> usize {
        self.size / 2
    }
    /// Returns the radial coordinate normalized to `radius`
    pub fn normalized_radius(&self, radius: f64) -> Map {
        self.rho.map(|rho| rho / radius)
    }
    /// Number of whole samples within `radius`
    ///
    /// This is the lateral offset shared by the poke, the lobe masks and the recentering of the
    /// unwrapped phase
    pub fn offset(&self, radius: f64) -> usize {
        (radius / self.delta).floor() as usize
    }
    /// Image plane sampling `wavelength x focal_length / (N delta)` in meters
    pub fn image_plane_sampling(&self, wavelength: f64, focal_length: f64) -> f64 {
        wavelength * focal_length / (self.size as f64 * self.delta)
    }
    /// Returns the image plane `[first, last, first, last]` coordinates
    pub fn image_plane_extent(&self, wavelength: f64, focal_length: f64) -> [f64; 4] {
        let df = self.image_plane_sampling(wavelength, focal_length);
        let half = (self.size / 2) as f64;
        let first = -half * df;
        let last = (self.size as f64 - 1. - half) * df;
        [first, last, first, last]
    }
}

/// Annular telescope aperture
///
/// The aperture is 1 inside a disk of diameter `diameter` minus a concentric disk of
/// diameter `obscuration x diameter` and 0 elsewhere; the outer rim is included.
#[derive(Debug, Clone)]
pub struct Aperture {
    pub diameter: f64,
    pub obscuration: f64,
    map: Map,
}
impl Aperture {
    pub fn new(grid: &Grid, diameter: f64, obscuration: f64) -> Self {
        let r_norm = grid.normalized_radius(0.5 * diameter);
        let map = r_norm.map(|r| {
            let outer = r <= 1.;
            let inner = obscuration > 0. && r <= obscuration;
            if outer && !inner {
                1.
            } else {
                0.
            }
        });
        Self {
            diameter,
            obscuration,
            map,
        }
    }
    /// Aperture radius in meters
    pub fn radius(&self) -> f64 {
        0.5 * self.diameter
    }
    /// Focal ratio `focal_length / diameter`
    pub fn f_number(&self, focal_length: f64) -> f64 {
        focal_length / self.diameter
    }
    /// Returns the aperture as a 0/1 map
    pub fn as_map(&self) -> &Map {
        &self.map
    }
    /// Returns the aperture as a pixel selector
    pub fn mask(&self) -> DMatrix<bool> {
        self.map.map(|a| a > 0.)
    }
    /// Number of pixels inside the aperture
    pub fn nnz(&self) -> usize {
        self.map.iter().filter(|a| **a > 0.).count()
    }
    /// Returns the aperture circularly shifted by `shift` pixels along the x axis
    pub fn rolled(&self, shift: isize) -> Map {
        fourier::roll(&self.map, 0, shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_coordinates() {
        let grid = Grid::new(8, 1.);
        let x = grid.coordinates();
        assert_eq!(x[grid.center()], 0.);
        assert!((x[1] - x[0] - 0.125).abs() < 1e-15);
        assert_eq!(grid.rho[(4, 4)], 0.);
        assert!((grid.phi[(6, 4)] - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
    }

    #[test]
    fn rim_is_inside() {
        let grid = Grid::new(16, 1.);
        // the rim passes through the sample 4 pixels right of the center
        let aperture = Aperture::new(&grid, 0.5, 0.);
        assert_eq!(aperture.as_map()[(8, 12)], 1.);
        assert_eq!(aperture.as_map()[(8, 13)], 0.);
        assert_eq!(aperture.as_map()[(8, 8)], 1.);
    }

    #[test]
    fn obscuration() {
        let grid = Grid::new(64, 1.);
        let aperture = Aperture::new(&grid, 0.5, 0.25);
        assert_eq!(aperture.as_map()[(32, 32)], 0.);
        assert_eq!(aperture.as_map()[(32, 36)], 0.);
        assert_eq!(aperture.as_map()[(32, 37)], 1.);
        let full = Aperture::new(&grid, 0.5, 0.);
        assert!(full.nnz() > aperture.nnz());
    }

    #[test]
    fn symmetric() {
        let grid = Grid::new(64, 1.);
        let aperture = Aperture::new(&grid, 0.3, 0.2);
        let a = aperture.as_map();
        for i in 1..64 {
            for j in 1..64 {
                assert_eq!(a[(i, j)], a[(64 - i, 64 - j)]);
                assert_eq!(a[(i, j)], a[(j, i)]);
            }
        }
    }

    #[test]
    fn focal_plane() {
        let grid = Grid::new(1024, 1.);
        let aperture = Aperture::new(&grid, 0.2, 0.2);
        assert!((aperture.f_number(0.5) - 2.5).abs() < 1e-15);
        // 1µm x 0.5m / 1m
        assert!((grid.image_plane_sampling(1e-6, 0.5) - 0.5e-6).abs() < 1e-20);
        let [first, last, ..] = grid.image_plane_extent(1e-6, 0.5);
        assert!((first + 256e-6).abs() < 1e-18);
        assert!((last - 255.5e-6).abs() < 1e-18);
    }

    #[test]
    fn offset() {
        let grid = Grid::new(1024, 1.);
        assert_eq!(grid.offset(0.1), 102);
    }
}
