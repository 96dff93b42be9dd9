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

//! TOPCAT-style density scatter plots.
//!
//! [`plot_density_scatter`] estimates the density of every point with
//! [`calculate_density`], truncates the requested colormap with
//! [`truncate_colormap`] and draws the points onto an [`Axes`] in ascending
//! density order, colored by density.
//!
//! When no axes is passed, the thread's current axes is used; see
//! [`with_current_axes`] and [`take_current_axes`].
//!
//! # Usage
//!
//! ```rust
//! # use densityscatter::scatter::{Axes, DensityScatterOptions, plot_density_scatter};
//! let x = [0.0, 0.5, 1.0, 0.2, 0.4, 3.0];
//! let y = [0.0, 0.4, 1.1, 0.1, 0.5, 2.0];
//! let mut axes = Axes::new();
//! let options = DensityScatterOptions::default().with_cmap("YlGnBu");
//! let handle = plot_density_scatter(&x, &y, &options, Some(&mut axes)).unwrap();
//! axes.colorbar(handle).unwrap();
//! let png = axes.render_png(400, 300).unwrap();
//! assert_eq!(&png[1..4], b"PNG");
//! ```

mod axes;
mod render;

use std::cell::RefCell;
use std::sync::Arc;

pub use self::axes::Axes;
pub use self::axes::DEFAULT_MARKER_SIZE;
pub use self::axes::Marker;
pub use self::axes::Normalize;
pub use self::axes::ScatterCollection;
pub use self::axes::ScatterHandle;
pub use self::axes::ScatterStyle;
pub use self::render::MAX_RENDER_SIZE;
pub use self::render::MIN_RENDER_SIZE;
use crate::colormap::ColormapRef;
use crate::colormap::DEFAULT_MAXVAL;
use crate::colormap::DEFAULT_MINVAL;
use crate::colormap::DEFAULT_N;
use crate::colormap::truncate_colormap;
use crate::density::DensityValue;
use crate::density::calculate_density;
use crate::error::Error;

thread_local! {
    static CURRENT_AXES: RefCell<Axes> = RefCell::new(Axes::new());
}

/// Runs `f` on this thread's current axes.
///
/// # Panics
///
/// Panics if called again from within `f`.
pub fn with_current_axes<R>(f: impl FnOnce(&mut Axes) -> R) -> R {
    CURRENT_AXES.with(|axes| f(&mut axes.borrow_mut()))
}

/// Takes this thread's current axes, leaving an empty one in its place.
pub fn take_current_axes() -> Axes {
    CURRENT_AXES.with(|axes| std::mem::take(&mut *axes.borrow_mut()))
}

/// Options of [`plot_density_scatter`].
#[derive(Debug, Clone)]
pub struct DensityScatterOptions {
    /// Kernel scale factor; `None` selects Scott's rule.
    pub bandwidth: Option<f64>,
    pub cmap: ColormapRef,
    /// Lower end of the colormap range that is kept.
    pub minval: f64,
    /// Upper end of the colormap range that is kept.
    pub maxval: f64,
    /// Number of colors of the truncated colormap.
    pub n: usize,
    /// Passed unchanged to [`Axes::scatter`].
    pub style: ScatterStyle,
}

impl Default for DensityScatterOptions {
    fn default() -> Self {
        Self {
            bandwidth: None,
            cmap: ColormapRef::default(),
            minval: DEFAULT_MINVAL,
            maxval: DEFAULT_MAXVAL,
            n: DEFAULT_N,
            style: ScatterStyle::default(),
        }
    }
}

impl DensityScatterOptions {
    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = Some(bandwidth);
        self
    }

    pub fn with_cmap(mut self, cmap: impl Into<ColormapRef>) -> Self {
        self.cmap = cmap.into();
        self
    }

    pub fn with_range(mut self, minval: f64, maxval: f64) -> Self {
        self.minval = minval;
        self.maxval = maxval;
        self
    }

    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn with_style(mut self, style: ScatterStyle) -> Self {
        self.style = style;
        self
    }
}

/// Draws a density-colored scatter plot and returns the drawn collection.
///
/// Points are drawn in ascending density order so dense regions end up on
/// top. Colors come from the colormap truncated to `[minval, maxval]` and
/// normalized over the density range. Uses `axes` if given, otherwise this
/// thread's current axes.
///
/// # Errors
///
/// Propagates the errors of [`calculate_density`], [`truncate_colormap`]
/// and [`Axes::scatter`]. Nothing is drawn on error.
pub fn plot_density_scatter<T: DensityValue>(
    x: &[T],
    y: &[T],
    options: &DensityScatterOptions,
    axes: Option<&mut Axes>,
) -> Result<ScatterHandle, Error> {
    let result = calculate_density(x, y, options.bandwidth)?;
    let cmap = truncate_colormap(options.cmap.clone(), options.minval, options.maxval, options.n)?;

    let xs: Vec<f64> = result.x.iter().map(|v| v.as_f64()).collect();
    let ys: Vec<f64> = result.y.iter().map(|v| v.as_f64()).collect();
    let draw = |axes: &mut Axes| {
        axes.scatter(&xs, &ys, &result.density, Arc::new(cmap), options.style.clone())
    };
    match axes {
        Some(axes) => draw(axes),
        None => with_current_axes(draw),
    }
}
