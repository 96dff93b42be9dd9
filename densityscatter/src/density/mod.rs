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

//! Gaussian kernel density estimation for 2-D scattered points.
//!
//! [`calculate_density`] fits a [`GaussianKde`] over the finite input points,
//! evaluates it at every one of them and returns the points sorted by
//! ascending density, so that drawing them in order paints the densest
//! regions last.
//!
//! The estimate follows the usual statistics-library semantics: the kernel
//! covariance is the unbiased data covariance scaled by the square of a
//! factor chosen by a [`Bandwidth`] rule (Scott's rule unless a factor is
//! given).
//!
//! Degenerate inputs are pinned as follows. Points without any spread (all
//! identical) fail with [`InvalidInput`](crate::error::ErrorKind::InvalidInput).
//! Collinear points have their covariance regularized by flooring the minor
//! eigenvalue at [`COVARIANCE_FLOOR_RATIO`] times the major one.
//!
//! # Usage
//!
//! ```rust
//! # use densityscatter::density::calculate_density;
//! let x = [0.0, 0.0, 0.0, 10.0];
//! let y = [0.0, 0.1, 0.2, 10.0];
//! let result = calculate_density(&x, &y, None).unwrap();
//! assert_eq!(result.len(), 4);
//! assert_eq!(result.x[0], 10.0);
//! ```

mod kde;

pub use self::kde::Bandwidth;
pub use self::kde::COVARIANCE_FLOOR_RATIO;
pub use self::kde::Covariance;
pub use self::kde::DensityValue;
pub use self::kde::GaussianKde;

use crate::error::Error;

/// Points reordered by ascending density.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityResult<T> {
    /// X coordinates, sorted by density.
    pub x: Vec<T>,
    /// Y coordinates, sorted by density.
    pub y: Vec<T>,
    /// Density at each point, non-decreasing.
    pub density: Vec<f64>,
    /// Number of input pairs removed because a coordinate was not finite.
    pub dropped: usize,
    /// Kernel scale factor used for the estimate.
    pub bandwidth_factor: f64,
}

impl<T: DensityValue> DensityResult<T> {
    /// Returns the number of points.
    pub fn len(&self) -> usize {
        self.density.len()
    }

    /// Returns true if there are no points.
    pub fn is_empty(&self) -> bool {
        self.density.is_empty()
    }

    /// Iterates `(x, y, density)` triples in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (T, T, f64)> + '_ {
        self.x
            .iter()
            .zip(self.y.iter())
            .zip(self.density.iter())
            .map(|((&x, &y), &density)| (x, y, density))
    }
}

/// Calculates point density with a Gaussian KDE and sorts points by it.
///
/// `bandwidth` is the kernel scale factor; `None` selects it with Scott's
/// rule. Pairs where either coordinate is NaN or infinite are removed and
/// reported with a warning.
///
/// # Errors
///
/// Returns [`InvalidInput`](crate::error::ErrorKind::InvalidInput) if `x`
/// and `y` differ in length, if `bandwidth` is not strictly positive, if
/// fewer than 2 finite points remain, or if the points have no spread.
pub fn calculate_density<T: DensityValue>(
    x: &[T],
    y: &[T],
    bandwidth: Option<f64>,
) -> Result<DensityResult<T>, Error> {
    calculate_density_with(x, y, Bandwidth::from(bandwidth))
}

/// Same as [`calculate_density`] with an explicit [`Bandwidth`] rule.
pub fn calculate_density_with<T: DensityValue>(
    x: &[T],
    y: &[T],
    bandwidth: Bandwidth,
) -> Result<DensityResult<T>, Error> {
    kde::ensure_same_len(x.len(), y.len())?;
    bandwidth.validate()?;

    let (kept, dropped) = finite_indices(x, y);
    if dropped > 0 {
        tracing::warn!(dropped, "removing points with NaN or infinite values");
    }
    kde::ensure_enough_points(kept.len()).map_err(|err| err.with_context("dropped", dropped))?;

    let xs: Vec<f64> = kept.iter().map(|&i| x[i].as_f64()).collect();
    let ys: Vec<f64> = kept.iter().map(|&i| y[i].as_f64()).collect();
    let kde = GaussianKde::fit(&xs, &ys, bandwidth)?;
    let density = kde.evaluate_all();

    let mut order: Vec<usize> = (0..density.len()).collect();
    order.sort_by(|&a, &b| density[a].total_cmp(&density[b]));

    Ok(DensityResult {
        x: order.iter().map(|&i| x[kept[i]]).collect(),
        y: order.iter().map(|&i| y[kept[i]]).collect(),
        density: order.iter().map(|&i| density[i]).collect(),
        dropped,
        bandwidth_factor: kde.factor(),
    })
}

fn finite_indices<T: DensityValue>(x: &[T], y: &[T]) -> (Vec<usize>, usize) {
    let kept: Vec<usize> = x
        .iter()
        .zip(y.iter())
        .enumerate()
        .filter(|(_, (a, b))| a.as_f64().is_finite() && b.as_f64().is_finite())
        .map(|(index, _)| index)
        .collect();
    let dropped = x.len() - kept.len();
    (kept, dropped)
}
