//! Centered 2D Fourier transforms
//!
//! All the transforms of the crate go through [centered_fft2] and [centered_ifft2]:
//! the zero frequency (or zero lag) sample sits at index `N/2` of both the input and
//! the output. The pair implements
//!  * forward: `fftshift(fft2(ifftshift(x)))`
//!  * inverse: `fftshift(ifft2(ifftshift(x)))`
//!
//! so that `centered_ifft2(centered_fft2(x)) == x` whatever the parity of the map sizes.

use nalgebra::{DMatrix, Scalar};
use num_complex::Complex;
use rustfft::{FftDirection, FftPlanner};

use crate::Field;

/// Circularly shifts a map by `rows` and `cols` samples
///
/// A sample at `(i,j)` moves to `(i+rows,j+cols)` modulo the map size
pub fn roll<T: Scalar>(map: &DMatrix<T>, rows: isize, cols: isize) -> DMatrix<T> {
    let (n_rows, n_cols) = map.shape();
    if n_rows == 0 || n_cols == 0 {
        return map.clone();
    }
    let wrap = |k: usize, shift: isize, n: usize| {
        (k as isize - shift).rem_euclid(n as isize) as usize
    };
    DMatrix::from_fn(n_rows, n_cols, |i, j| {
        map[(wrap(i, rows, n_rows), wrap(j, cols, n_cols))].clone()
    })
}

/// Moves the zero frequency sample from index 0 to the center
pub fn fftshift<T: Scalar>(map: &DMatrix<T>) -> DMatrix<T> {
    let (n_rows, n_cols) = map.shape();
    roll(map, (n_rows / 2) as isize, (n_cols / 2) as isize)
}

/// Moves the center sample to index 0, inverse of [fftshift]
pub fn ifftshift<T: Scalar>(map: &DMatrix<T>) -> DMatrix<T> {
    let (n_rows, n_cols) = map.shape();
    roll(map, -((n_rows / 2) as isize), -((n_cols / 2) as isize))
}

/// In-place un-normalized 2D FFT
///
/// The inverse transform is scaled by `1/(n_rows x n_cols)`
pub fn fft2(field: &mut Field, direction: FftDirection) {
    let (n_rows, n_cols) = field.shape();
    if n_rows == 0 || n_cols == 0 {
        return;
    }
    let mut planner = FftPlanner::<f64>::new();
    // columns are contiguous
    planner
        .plan_fft(n_rows, direction)
        .process(field.as_mut_slice());
    let mut transposed = field.transpose();
    planner
        .plan_fft(n_cols, direction)
        .process(transposed.as_mut_slice());
    transposed.transpose_to(field);
    if direction == FftDirection::Inverse {
        let scale = 1. / (n_rows * n_cols) as f64;
        field.iter_mut().for_each(|c| *c *= scale);
    }
}

/// Centered forward 2D FFT
pub fn centered_fft2(field: &Field) -> Field {
    let mut shifted = ifftshift(field);
    fft2(&mut shifted, FftDirection::Forward);
    fftshift(&shifted)
}

/// Centered inverse 2D FFT
pub fn centered_ifft2(field: &Field) -> Field {
    let mut shifted = ifftshift(field);
    fft2(&mut shifted, FftDirection::Inverse);
    fftshift(&shifted)
}

/// Converts a real map into a complex field
pub fn complexify(map: &DMatrix<f64>) -> Field {
    map.map(|x| Complex::new(x, 0.))
}
