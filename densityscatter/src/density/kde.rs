// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::f64::consts::PI;

use crate::error::Error;

/// Dimensionality of the point clouds handled by [`GaussianKde`].
const DIM: f64 = 2.0;

/// Eigenvalues of a rank-deficient covariance are floored at this fraction of
/// the largest eigenvalue.
pub const COVARIANCE_FLOOR_RATIO: f64 = 1e-9;

/// Floating point types accepted as point coordinates.
pub trait DensityValue: Copy + PartialOrd + 'static {
    /// Converts to f64 for accumulation.
    fn as_f64(self) -> f64;
}

macro_rules! impl_density_value {
    ($name:ty, $to:expr) => {
        impl DensityValue for $name {
            #[inline(always)]
            fn as_f64(self) -> f64 {
                ($to)(self)
            }
        }
    };
}

impl_density_value!(f64, |value: f64| value);
impl_density_value!(f32, |value: f32| value as f64);

/// Rule selecting the kernel scale factor.
///
/// The kernel covariance is the data covariance multiplied by the square of
/// the factor.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Bandwidth {
    /// Scott's rule, `n^(-1/(d+4))`.
    #[default]
    Scott,
    /// Silverman's rule, `(n(d+2)/4)^(-1/(d+4))`. Equal to Scott's rule in two
    /// dimensions.
    Silverman,
    /// A fixed, strictly positive scale factor.
    Factor(f64),
}

impl Bandwidth {
    /// Returns the scale factor for a sample of `n` points.
    pub fn factor(&self, n: usize) -> f64 {
        let n = n as f64;
        match *self {
            Bandwidth::Scott => n.powf(-1.0 / (DIM + 4.0)),
            Bandwidth::Silverman => (n * (DIM + 2.0) / 4.0).powf(-1.0 / (DIM + 4.0)),
            Bandwidth::Factor(factor) => factor,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        match *self {
            Bandwidth::Factor(factor) if !(factor > 0.0 && factor.is_finite()) => Err(
                Error::invalid_input("bandwidth must be positive")
                    .with_context("bandwidth", factor),
            ),
            _ => Ok(()),
        }
    }
}

impl From<Option<f64>> for Bandwidth {
    fn from(bandwidth: Option<f64>) -> Self {
        match bandwidth {
            Some(factor) => Bandwidth::Factor(factor),
            None => Bandwidth::Scott,
        }
    }
}

impl From<f64> for Bandwidth {
    fn from(factor: f64) -> Self {
        Bandwidth::Factor(factor)
    }
}

/// Symmetric 2x2 covariance matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Covariance {
    /// Variance of x.
    pub xx: f64,
    /// Covariance of x and y.
    pub xy: f64,
    /// Variance of y.
    pub yy: f64,
}

impl Covariance {
    /// Unbiased sample covariance of the paired coordinates.
    ///
    /// Deviations are accumulated relative to the first point, so identical
    /// points yield an exactly zero covariance regardless of their count.
    fn sample(xs: &[f64], ys: &[f64]) -> Self {
        let n = xs.len() as f64;
        let (x0, y0) = (xs[0], ys[0]);
        let mean_dx = xs.iter().map(|x| x - x0).sum::<f64>() / n;
        let mean_dy = ys.iter().map(|y| y - y0).sum::<f64>() / n;
        let (mut xx, mut xy, mut yy) = (0.0f64, 0.0f64, 0.0f64);
        for (x, y) in xs.iter().zip(ys.iter()) {
            let dx = (x - x0) - mean_dx;
            let dy = (y - y0) - mean_dy;
            xx += dx * dx;
            xy += dx * dy;
            yy += dy * dy;
        }
        let ddof = n - 1.0;
        Self {
            xx: xx / ddof,
            xy: xy / ddof,
            yy: yy / ddof,
        }
    }

    fn scaled(self, scale: f64) -> Self {
        Self {
            xx: self.xx * scale,
            xy: self.xy * scale,
            yy: self.yy * scale,
        }
    }

    /// Returns the eigenvalues in descending order and the rotation angle of
    /// the eigenvector belonging to the larger one.
    fn eigen(&self) -> (f64, f64, f64) {
        let mid = (self.xx + self.yy) / 2.0;
        let radius = ((self.xx - self.yy) / 2.0).hypot(self.xy);
        let theta = 0.5 * (2.0 * self.xy).atan2(self.xx - self.yy);
        (mid + radius, mid - radius, theta)
    }
}

/// Gaussian kernel in the eigenbasis of its covariance.
#[derive(Debug, Clone, Copy)]
struct KernelShape {
    cos: f64,
    sin: f64,
    inv_major: f64,
    inv_minor: f64,
    norm: f64,
}

impl KernelShape {
    fn new(covariance: &Covariance, magnitude: f64) -> Result<Self, Error> {
        let (major, minor, theta) = covariance.eigen();
        let resolution = f64::EPSILON * magnitude.max(f64::MIN_POSITIVE);
        if !major.is_finite() || major <= resolution * resolution {
            return Err(
                Error::invalid_input("data covariance is singular: points have no spread")
                    .with_context("variance_x", covariance.xx)
                    .with_context("variance_y", covariance.yy),
            );
        }
        let floor = major * COVARIANCE_FLOOR_RATIO;
        let minor = if minor < floor {
            tracing::warn!(
                major,
                minor,
                "data covariance is rank-deficient, flooring its minor eigenvalue"
            );
            floor
        } else {
            minor
        };
        Ok(Self {
            cos: theta.cos(),
            sin: theta.sin(),
            inv_major: 1.0 / major,
            inv_minor: 1.0 / minor,
            norm: 1.0 / (2.0 * PI * (major * minor).sqrt()),
        })
    }

    fn evaluate(&self, dx: f64, dy: f64) -> f64 {
        let along = self.cos * dx + self.sin * dy;
        let across = self.cos * dy - self.sin * dx;
        let mahalanobis = along * along * self.inv_major + across * across * self.inv_minor;
        self.norm * (-0.5 * mahalanobis).exp()
    }
}

/// Gaussian kernel density estimate fitted over a 2-D point cloud.
///
/// # Usage
///
/// ```rust
/// # use densityscatter::density::{Bandwidth, GaussianKde};
/// let xs = [0.0, 1.0, 2.0, 0.5];
/// let ys = [0.0, 2.0, 1.0, 0.5];
/// let kde = GaussianKde::fit(&xs, &ys, Bandwidth::Scott).unwrap();
/// assert!(kde.evaluate(0.5, 0.5) > kde.evaluate(10.0, 10.0));
/// ```
#[derive(Debug, Clone)]
pub struct GaussianKde {
    xs: Vec<f64>,
    ys: Vec<f64>,
    factor: f64,
    data_covariance: Covariance,
    kernel: KernelShape,
}

impl GaussianKde {
    /// Fits an estimate over the given finite coordinates.
    ///
    /// Fails with [`InvalidInput`](crate::error::ErrorKind::InvalidInput) if
    /// the lengths differ, fewer than 2 points are given, a coordinate is not
    /// finite, the bandwidth factor is not strictly positive, or the points
    /// have no spread at all.
    pub fn fit(xs: &[f64], ys: &[f64], bandwidth: Bandwidth) -> Result<Self, Error> {
        ensure_same_len(xs.len(), ys.len())?;
        ensure_enough_points(xs.len())?;
        bandwidth.validate()?;
        if let Some(index) = xs
            .iter()
            .zip(ys.iter())
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(Error::invalid_input("coordinates must be finite").with_context("index", index));
        }

        let factor = bandwidth.factor(xs.len());
        let data_covariance = Covariance::sample(xs, ys);
        let magnitude = xs
            .iter()
            .chain(ys.iter())
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        let kernel = KernelShape::new(&data_covariance.scaled(factor * factor), magnitude)?;
        tracing::debug!(points = xs.len(), factor, "fitted gaussian kde");

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            factor,
            data_covariance,
            kernel,
        })
    }

    /// Returns the number of fitted points.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Returns true if no points were fitted. Always false for a fitted estimate.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Returns the kernel scale factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Returns the unbiased sample covariance of the fitted points.
    pub fn data_covariance(&self) -> Covariance {
        self.data_covariance
    }

    /// Returns the kernel covariance, `data_covariance * factor^2`.
    pub fn covariance(&self) -> Covariance {
        self.data_covariance.scaled(self.factor * self.factor)
    }

    /// Returns the density estimate at a given point.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let mut density = 0.0f64;
        for (px, py) in self.xs.iter().zip(self.ys.iter()) {
            density += self.kernel.evaluate(x - px, y - py);
        }
        density / self.xs.len() as f64
    }

    /// Returns the density estimate at every fitted point, in fit order.
    pub fn evaluate_all(&self) -> Vec<f64> {
        self.xs
            .iter()
            .zip(self.ys.iter())
            .map(|(&x, &y)| self.evaluate(x, y))
            .collect()
    }
}

pub(crate) fn ensure_same_len(x_len: usize, y_len: usize) -> Result<(), Error> {
    if x_len != y_len {
        return Err(Error::invalid_input("x and y must have same length")
            .with_context("x_len", x_len)
            .with_context("y_len", y_len));
    }
    Ok(())
}

pub(crate) fn ensure_enough_points(len: usize) -> Result<(), Error> {
    if len < 2 {
        return Err(
            Error::invalid_input("need at least 2 points for density calculation")
                .with_context("points", len),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eigen_axis_aligned() {
        let cov = Covariance {
            xx: 1.0,
            xy: 0.0,
            yy: 4.0,
        };
        let (major, minor, theta) = cov.eigen();
        assert_eq!(major, 4.0);
        assert_eq!(minor, 1.0);
        assert!((theta - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_eigen_collinear() {
        let cov = Covariance {
            xx: 25.0,
            xy: 25.0,
            yy: 25.0,
        };
        let (major, minor, theta) = cov.eigen();
        assert!((major - 50.0).abs() < 1e-12);
        assert!(minor.abs() < 1e-12);
        assert!((theta - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_sample_covariance_is_unbiased() {
        let cov = Covariance::sample(&[0.0, 0.0, 0.0, 10.0], &[0.0, 0.0, 0.0, 10.0]);
        assert_eq!(cov.xx, 25.0);
        assert_eq!(cov.xy, 25.0);
        assert_eq!(cov.yy, 25.0);
    }

    #[test]
    fn test_sample_covariance_of_identical_points_is_zero() {
        let xs = vec![0.1; 10_000];
        let ys = vec![123.456; 10_000];
        let cov = Covariance::sample(&xs, &ys);
        assert_eq!(cov.xx, 0.0);
        assert_eq!(cov.xy, 0.0);
        assert_eq!(cov.yy, 0.0);
    }

    #[test]
    fn test_kernel_peak_value() {
        let shape = KernelShape::new(
            &Covariance {
                xx: 1.0,
                xy: 0.0,
                yy: 1.0,
            },
            1.0,
        )
        .unwrap();
        assert!((shape.evaluate(0.0, 0.0) - 1.0 / (2.0 * PI)).abs() < 1e-12);
    }
}
