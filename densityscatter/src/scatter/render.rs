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

//! Rasterization of [`Axes`] to PNG through plotters' bitmap backend.

use std::fmt::Display;
use std::path::Path;

use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::Axes;
use super::Marker;
use super::ScatterCollection;
use crate::colormap::Rgba;
use crate::error::Error;
use crate::error::ErrorKind;

const AXIS_COLOR: RGBColor = RGBColor(64, 64, 64);
/// Space between the figure edge and the plotting frame, in pixels.
const MARGIN: u32 = 20;
/// Width of the strip reserved for a color bar, margins included.
const COLORBAR_WIDTH: u32 = 70;
const COLORBAR_STEPS: usize = 256;
/// Smallest accepted image width or height.
pub const MIN_RENDER_SIZE: u32 = 100;
/// Largest accepted image width or height.
pub const MAX_RENDER_SIZE: u32 = 16_384;
/// Stroke used when a collection has no edge color. Fully transparent strokes
/// leave the pixels untouched.
const NO_EDGE: RGBAColor = RGBAColor(0, 0, 0, 0.0);

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

impl Axes {
    /// Renders the axes to a PNG image.
    ///
    /// Collections are drawn in order, each one point after the other. No
    /// text is drawn.
    ///
    /// Both dimensions must lie in `MIN_RENDER_SIZE..=MAX_RENDER_SIZE`.
    pub fn render_png(&self, width: u32, height: u32) -> Result<Vec<u8>, Error> {
        if width < MIN_RENDER_SIZE || height < MIN_RENDER_SIZE {
            return Err(Error::invalid_input("image is too small to render")
                .with_context("width", width)
                .with_context("height", height)
                .with_context("min_size", MIN_RENDER_SIZE));
        }
        if width > MAX_RENDER_SIZE || height > MAX_RENDER_SIZE {
            return Err(Error::invalid_input("image is too large to render")
                .with_context("width", width)
                .with_context("height", height)
                .with_context("max_size", MAX_RENDER_SIZE));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or_else(|| {
                Error::invalid_input("image buffer size overflows")
                    .with_context("width", width)
                    .with_context("height", height)
            })?;

        let mut buf = vec![0u8; len];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(|e| render_error("fill background", e))?;

            match self.colorbar_collection() {
                Some(collection) => {
                    let (plot_area, bar_area) =
                        root.split_horizontally((width - COLORBAR_WIDTH) as i32);
                    draw_collections(&plot_area, self)?;
                    draw_colorbar(&bar_area, collection)?;
                }
                None => draw_collections(&root, self)?,
            }

            root.present().map_err(|e| render_error("present plot", e))?;
        }
        tracing::debug!(
            width,
            height,
            collections = self.collections().len(),
            "rendered axes"
        );

        encode_rgb_to_png(&buf, width, height)
    }

    /// Renders the axes and writes the PNG image to `path`.
    pub fn save_png(&self, path: impl AsRef<Path>, width: u32, height: u32) -> Result<(), Error> {
        let path = path.as_ref();
        let png = self.render_png(width, height)?;
        std::fs::write(path, png).map_err(|e| {
            Error::new(ErrorKind::RenderFailed, "failed to write png")
                .with_context("path", path.display())
                .set_source(e)
        })
    }
}

fn draw_collections(area: &Area<'_>, axes: &Axes) -> Result<(), Error> {
    let (x0, x1) = axes.xlim();
    let (y0, y1) = axes.ylim();
    let mut chart = ChartBuilder::on(area)
        .margin(MARGIN)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(|e| render_error("build chart", e))?;

    for collection in axes.collections() {
        let style = collection.style();
        let radius = style.marker_radius();
        let line_width = style.line_width;
        let edge = style.edge_color;
        let points = collection
            .offsets()
            .iter()
            .copied()
            .zip(collection.face_colors());

        let stroke = match edge {
            Some(edge) => to_plotters(edge),
            None => NO_EDGE,
        }
        .stroke_width(line_width);
        let styles = move |face: Rgba| (to_plotters(face).filled(), stroke);
        let drawn = match style.marker {
            Marker::Circle => chart.draw_series(points.map(|(point, face)| {
                let (fill, stroke) = styles(face);
                EmptyElement::at(point)
                    + Circle::new((0, 0), radius, fill)
                    + Circle::new((0, 0), radius, stroke)
            })),
            Marker::Square => chart.draw_series(points.map(|(point, face)| {
                let (fill, stroke) = styles(face);
                let corners = [(-radius, -radius), (radius, radius)];
                EmptyElement::at(point)
                    + Rectangle::new(corners, fill)
                    + Rectangle::new(corners, stroke)
            })),
            Marker::Triangle => chart.draw_series(points.map(|(point, face)| {
                let (fill, stroke) = styles(face);
                EmptyElement::at(point)
                    + TriangleMarker::new((0, 0), radius, fill)
                    + TriangleMarker::new((0, 0), radius, stroke)
            })),
            Marker::Cross => chart.draw_series(points.map(|(point, face)| {
                let stroke = to_plotters(face).stroke_width(line_width);
                EmptyElement::at(point) + Cross::new((0, 0), radius, stroke)
            })),
        };
        drawn.map_err(|e| render_error("draw scatter", e))?;
    }

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(x0, y0), (x1, y1)],
            AXIS_COLOR.stroke_width(1),
        )))
        .map_err(|e| render_error("draw frame", e))?;
    Ok(())
}

fn draw_colorbar(area: &Area<'_>, collection: &ScatterCollection) -> Result<(), Error> {
    let mut chart = ChartBuilder::on(area)
        .margin(MARGIN)
        .build_cartesian_2d(0f64..1f64, 0f64..1f64)
        .map_err(|e| render_error("build color bar", e))?;

    let cmap = collection.cmap();
    let step = 1.0 / COLORBAR_STEPS as f64;
    chart
        .draw_series((0..COLORBAR_STEPS).map(|i| {
            let low = i as f64 * step;
            let color = cmap.color_at(low + step / 2.0);
            Rectangle::new([(0.0, low), (1.0, low + step)], to_plotters(color).filled())
        }))
        .map_err(|e| render_error("draw color bar", e))?;
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(0.0, 0.0), (1.0, 1.0)],
            AXIS_COLOR.stroke_width(1),
        )))
        .map_err(|e| render_error("draw color bar frame", e))?;
    Ok(())
}

fn to_plotters(color: Rgba) -> RGBAColor {
    let ([r, g, b], a) = color.to_rgb8();
    RGBAColor(r, g, b, a)
}

fn render_error(stage: &str, err: impl Display) -> Error {
    Error::new(ErrorKind::RenderFailed, format!("failed to {stage}"))
        .set_source(anyhow::anyhow!("{err}"))
}

/// Encode a raw RGB pixel buffer to PNG.
fn encode_rgb_to_png(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, Error> {
    let mut png = Vec::new();
    let encoder = PngEncoder::new(&mut png);
    encoder
        .write_image(rgb, width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| {
            Error::new(ErrorKind::RenderFailed, "failed to encode png").set_source(e)
        })?;
    Ok(png)
}
