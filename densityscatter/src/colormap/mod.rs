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

//! Colormaps and colormap truncation.
//!
//! A [`Colormap`] maps a scalar in `[0, 1]` to an [`Rgba`] color.
//! [`truncate_colormap`] restricts a colormap to a sub-interval of its domain
//! and stretches that interval back over `[0, 1]`, which keeps density plots
//! away from the washed-out light end and the near-black dark end of
//! sequential maps.
//!
//! # Usage
//!
//! ```rust
//! # use densityscatter::colormap::{Colormap, truncate_colormap};
//! let cmap = truncate_colormap("YlGnBu", 0.2, 0.8, 256).unwrap();
//! assert_eq!(cmap.name(), "truncated(YlGnBu,0.20,0.80)");
//! assert_eq!(cmap.len(), 256);
//! ```

mod listed;
mod registry;

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

pub use self::listed::ListedColormap;
pub use self::registry::get_colormap;
pub use self::registry::names;
use crate::error::Error;

/// Default colormap used for density scatter plots.
pub const DEFAULT_CMAP: &str = "Reds";
/// Default lower bound of the truncated range.
pub const DEFAULT_MINVAL: f64 = 0.4;
/// Default upper bound of the truncated range.
pub const DEFAULT_MAXVAL: f64 = 0.9;
/// Default number of anchors in a truncated colormap.
pub const DEFAULT_N: usize = 256;

/// An RGBA color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Color returned for NaN inputs.
    pub const BAD: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque color.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// An opaque color from a `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f64 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Returns the same color with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation towards `other`; `t = 0` returns `self` exactly.
    pub fn lerp(&self, other: &Rgba, t: f64) -> Rgba {
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Returns the 8-bit RGB channels and the alpha.
    pub fn to_rgb8(&self) -> ([u8; 3], f64) {
        let quantize = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (
            [quantize(self.r), quantize(self.g), quantize(self.b)],
            self.a.clamp(0.0, 1.0),
        )
    }
}

/// A continuous mapping from `[0, 1]` to colors.
pub trait Colormap: Send + Sync {
    /// Returns the name of this colormap.
    fn name(&self) -> &str;

    /// Maps a value to a color. Values outside `[0, 1]` are clamped.
    fn color_at(&self, value: f64) -> Rgba;

    /// Maps every value to a color.
    fn colors(&self, values: &[f64]) -> Vec<Rgba> {
        values.iter().map(|&value| self.color_at(value)).collect()
    }
}

/// A colormap given either by registered name or as an instance.
#[derive(Clone)]
pub enum ColormapRef {
    /// Resolved through [`get_colormap`].
    Name(String),
    /// Used as is.
    Instance(Arc<dyn Colormap>),
}

impl ColormapRef {
    /// Resolves a name through the registry, or hands out the instance.
    pub fn resolve(&self) -> Result<Arc<dyn Colormap>, Error> {
        match self {
            ColormapRef::Name(name) => Ok(Arc::new(get_colormap(name)?)),
            ColormapRef::Instance(cmap) => Ok(Arc::clone(cmap)),
        }
    }
}

impl Default for ColormapRef {
    fn default() -> Self {
        ColormapRef::Name(DEFAULT_CMAP.to_string())
    }
}

impl fmt::Debug for ColormapRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColormapRef::Name(name) => f.debug_tuple("Name").field(name).finish(),
            ColormapRef::Instance(cmap) => f.debug_tuple("Instance").field(&cmap.name()).finish(),
        }
    }
}

impl From<&str> for ColormapRef {
    fn from(name: &str) -> Self {
        ColormapRef::Name(name.to_string())
    }
}

impl From<String> for ColormapRef {
    fn from(name: String) -> Self {
        ColormapRef::Name(name)
    }
}

impl From<ListedColormap> for ColormapRef {
    fn from(cmap: ListedColormap) -> Self {
        ColormapRef::Instance(Arc::new(cmap))
    }
}

impl From<Arc<dyn Colormap>> for ColormapRef {
    fn from(cmap: Arc<dyn Colormap>) -> Self {
        ColormapRef::Instance(cmap)
    }
}

/// Truncates a colormap to `[minval, maxval]`.
///
/// The source is sampled at `n` evenly spaced points of the interval, both
/// ends included, and the samples become the anchors of a new colormap over
/// `[0, 1]`.
///
/// # Errors
///
/// Returns [`InvalidInput`](crate::error::ErrorKind::InvalidInput) if the name
/// is not registered, if `minval >= maxval`, if either bound lies outside
/// `[0, 1]`, or if `n < 2`.
pub fn truncate_colormap(
    cmap: impl Into<ColormapRef>,
    minval: f64,
    maxval: f64,
    n: usize,
) -> Result<ListedColormap, Error> {
    let source = cmap.into().resolve()?;

    if minval.partial_cmp(&maxval) != Some(Ordering::Less) {
        return Err(Error::invalid_input("minval must be less than maxval")
            .with_context("minval", minval)
            .with_context("maxval", maxval));
    }
    if !((0.0..=1.0).contains(&minval) && (0.0..=1.0).contains(&maxval)) {
        return Err(Error::invalid_input("minval and maxval must be between 0 and 1")
            .with_context("minval", minval)
            .with_context("maxval", maxval));
    }
    if n < 2 {
        return Err(
            Error::invalid_input("a truncated colormap needs at least 2 colors")
                .with_context("n", n),
        );
    }

    let step = (maxval - minval) / (n - 1) as f64;
    let anchors = (0..n)
        .map(|i| {
            let value = if i == n - 1 {
                maxval
            } else {
                minval + step * i as f64
            };
            source.color_at(value)
        })
        .collect();
    ListedColormap::new(
        format!("truncated({},{minval:.2},{maxval:.2})", source.name()),
        anchors,
    )
}
