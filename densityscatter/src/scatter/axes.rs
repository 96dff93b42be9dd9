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

use std::fmt;
use std::sync::Arc;

use crate::colormap::Colormap;
use crate::colormap::Rgba;
use crate::error::Error;

/// Default marker area in square pixels.
pub const DEFAULT_MARKER_SIZE: f64 = 36.0;

/// Fraction of the data span added on each side of autoscaled limits.
const AXIS_PADDING: f64 = 0.05;

/// Marker shape of a scatter collection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    #[default]
    Circle,
    Square,
    Triangle,
    Cross,
}

/// Draw options of a scatter collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterStyle {
    /// Marker area in square pixels.
    pub marker_size: f64,
    pub marker: Marker,
    /// Marker outline color; `None` draws no outline.
    pub edge_color: Option<Rgba>,
    /// Outline width in pixels.
    pub line_width: u32,
    /// Overrides the alpha of every face color.
    pub alpha: Option<f64>,
    /// Lower end of the color normalization; defaults to the smallest value.
    pub vmin: Option<f64>,
    /// Upper end of the color normalization; defaults to the largest value.
    pub vmax: Option<f64>,
}

impl Default for ScatterStyle {
    fn default() -> Self {
        Self {
            marker_size: DEFAULT_MARKER_SIZE,
            marker: Marker::Circle,
            edge_color: None,
            line_width: 1,
            alpha: None,
            vmin: None,
            vmax: None,
        }
    }
}

impl ScatterStyle {
    pub fn with_marker_size(mut self, marker_size: f64) -> Self {
        self.marker_size = marker_size;
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_edge_color(mut self, edge_color: Rgba) -> Self {
        self.edge_color = Some(edge_color);
        self
    }

    pub fn with_line_width(mut self, line_width: u32) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_color_limits(mut self, vmin: f64, vmax: f64) -> Self {
        self.vmin = Some(vmin);
        self.vmax = Some(vmax);
        self
    }

    /// Marker radius in pixels, at least 1.
    pub fn marker_radius(&self) -> i32 {
        ((self.marker_size.sqrt() / 2.0).round() as i32).max(1)
    }

    fn validate(&self) -> Result<(), Error> {
        if !(self.marker_size > 0.0 && self.marker_size.is_finite()) {
            return Err(Error::invalid_input("marker size must be positive")
                .with_context("marker_size", self.marker_size));
        }
        if let Some(alpha) = self.alpha {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(
                    Error::invalid_input("alpha must be between 0 and 1").with_context("alpha", alpha)
                );
            }
        }
        Ok(())
    }
}

/// Linear mapping of data values onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalize {
    /// Spans the finite range of `values`, or `[0, 0]` if there is none.
    pub fn autoscale(values: &[f64]) -> Self {
        let (vmin, vmax) = finite_range(values.iter().copied()).unwrap_or((0.0, 0.0));
        Self { vmin, vmax }
    }

    /// Maps a value; a zero-width range maps everything to 0.
    pub fn apply(&self, value: f64) -> f64 {
        if self.vmax == self.vmin {
            return 0.0;
        }
        (value - self.vmin) / (self.vmax - self.vmin)
    }
}

/// Identifies a scatter collection within its [`Axes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScatterHandle(usize);

impl ScatterHandle {
    /// Returns the draw-order index of the collection.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Points drawn in order, each colored by a value through a colormap.
#[derive(Clone)]
pub struct ScatterCollection {
    offsets: Vec<(f64, f64)>,
    values: Vec<f64>,
    cmap: Arc<dyn Colormap>,
    norm: Normalize,
    style: ScatterStyle,
}

impl ScatterCollection {
    /// Returns the point positions in draw order.
    pub fn offsets(&self) -> &[(f64, f64)] {
        &self.offsets
    }

    /// Returns the color values in draw order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn cmap(&self) -> &dyn Colormap {
        self.cmap.as_ref()
    }

    pub fn norm(&self) -> Normalize {
        self.norm
    }

    pub fn set_norm(&mut self, norm: Normalize) {
        self.norm = norm;
    }

    pub fn style(&self) -> &ScatterStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ScatterStyle {
        &mut self.style
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Returns the fill color of every point.
    pub fn face_colors(&self) -> Vec<Rgba> {
        self.values
            .iter()
            .map(|&value| {
                let color = self.cmap.color_at(self.norm.apply(value));
                match self.style.alpha {
                    Some(alpha) => color.with_alpha(alpha),
                    None => color,
                }
            })
            .collect()
    }
}

impl fmt::Debug for ScatterCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScatterCollection")
            .field("len", &self.offsets.len())
            .field("cmap", &self.cmap.name())
            .field("norm", &self.norm)
            .field("style", &self.style)
            .finish()
    }
}

/// A drawing surface holding scatter collections in draw order.
#[derive(Debug, Clone, Default)]
pub struct Axes {
    collections: Vec<ScatterCollection>,
    xlim: Option<(f64, f64)>,
    ylim: Option<(f64, f64)>,
    colorbar: Option<ScatterHandle>,
}

impl Axes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a scatter collection and returns its handle.
    ///
    /// Points are drawn in the given order, so later points paint over
    /// earlier ones.
    pub fn scatter(
        &mut self,
        x: &[f64],
        y: &[f64],
        values: &[f64],
        cmap: Arc<dyn Colormap>,
        style: ScatterStyle,
    ) -> Result<ScatterHandle, Error> {
        if x.len() != y.len() || x.len() != values.len() {
            return Err(
                Error::invalid_input("positions and color values must have same length")
                    .with_context("x_len", x.len())
                    .with_context("y_len", y.len())
                    .with_context("values_len", values.len()),
            );
        }
        style.validate()?;

        let auto = Normalize::autoscale(values);
        let norm = Normalize {
            vmin: style.vmin.unwrap_or(auto.vmin),
            vmax: style.vmax.unwrap_or(auto.vmax),
        };
        let handle = ScatterHandle(self.collections.len());
        self.collections.push(ScatterCollection {
            offsets: x.iter().copied().zip(y.iter().copied()).collect(),
            values: values.to_vec(),
            cmap,
            norm,
            style,
        });
        Ok(handle)
    }

    /// Returns all collections in draw order.
    pub fn collections(&self) -> &[ScatterCollection] {
        &self.collections
    }

    pub fn collection(&self, handle: ScatterHandle) -> Option<&ScatterCollection> {
        self.collections.get(handle.0)
    }

    pub fn collection_mut(&mut self, handle: ScatterHandle) -> Option<&mut ScatterCollection> {
        self.collections.get_mut(handle.0)
    }

    /// Attaches a color bar showing the colormap of a collection.
    pub fn colorbar(&mut self, handle: ScatterHandle) -> Result<(), Error> {
        if self.collection(handle).is_none() {
            return Err(Error::invalid_input("no such scatter collection")
                .with_context("handle", handle.0));
        }
        self.colorbar = Some(handle);
        Ok(())
    }

    /// Returns the collection shown in the color bar, if one is attached.
    pub fn colorbar_collection(&self) -> Option<&ScatterCollection> {
        self.colorbar.and_then(|handle| self.collection(handle))
    }

    pub fn set_xlim(&mut self, min: f64, max: f64) -> Result<(), Error> {
        self.xlim = Some(validate_limits("xlim", min, max)?);
        Ok(())
    }

    pub fn set_ylim(&mut self, min: f64, max: f64) -> Result<(), Error> {
        self.ylim = Some(validate_limits("ylim", min, max)?);
        Ok(())
    }

    /// Returns the x limits, autoscaled to the data unless set.
    pub fn xlim(&self) -> (f64, f64) {
        self.xlim.unwrap_or_else(|| self.autoscale(|&(x, _)| x))
    }

    /// Returns the y limits, autoscaled to the data unless set.
    pub fn ylim(&self) -> (f64, f64) {
        self.ylim.unwrap_or_else(|| self.autoscale(|&(_, y)| y))
    }

    /// Removes all collections, limits and the color bar.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn autoscale(&self, coord: impl Fn(&(f64, f64)) -> f64) -> (f64, f64) {
        let values = self
            .collections
            .iter()
            .flat_map(|collection| collection.offsets.iter().map(&coord));
        let Some((min, max)) = finite_range(values) else {
            return (0.0, 1.0);
        };
        if (max - min).abs() < 1e-10 {
            return (min - 1.0, max + 1.0);
        }
        let pad = (max - min) * AXIS_PADDING;
        (min - pad, max + pad)
    }
}

fn validate_limits(name: &'static str, min: f64, max: f64) -> Result<(f64, f64), Error> {
    if !(min.is_finite() && max.is_finite() && min < max) {
        return Err(Error::invalid_input("axis limits must be finite and increasing")
            .with_context("axis", name)
            .with_context("min", min)
            .with_context("max", max));
    }
    Ok((min, max))
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_width() {
        let norm = Normalize::autoscale(&[2.0, 2.0]);
        assert_eq!(norm.apply(2.0), 0.0);
    }

    #[test]
    fn test_marker_radius() {
        assert_eq!(ScatterStyle::default().marker_radius(), 3);
        assert_eq!(ScatterStyle::default().with_marker_size(0.01).marker_radius(), 1);
    }

    #[test]
    fn test_autoscale_pads_span() {
        let mut axes = Axes::new();
        let cmap: Arc<dyn Colormap> = Arc::new(crate::colormap::get_colormap("Reds").unwrap());
        axes.scatter(&[0.0, 10.0], &[5.0, 5.0], &[0.0, 1.0], cmap, ScatterStyle::default())
            .unwrap();
        let (xmin, xmax) = axes.xlim();
        assert!((xmin + 0.5).abs() < 1e-12);
        assert!((xmax - 10.5).abs() < 1e-12);
        assert_eq!(axes.ylim(), (4.0, 6.0));
    }
}
