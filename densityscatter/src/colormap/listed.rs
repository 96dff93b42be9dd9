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

use super::Colormap;
use super::Rgba;
use crate::error::Error;

/// A colormap that linearly interpolates between equally spaced anchor colors.
///
/// The first anchor sits at 0 and the last at 1. Values outside `[0, 1]` are
/// clamped; NaN maps to [`Rgba::BAD`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListedColormap {
    name: String,
    anchors: Vec<Rgba>,
}

impl ListedColormap {
    /// Creates a colormap from at least two anchor colors.
    pub fn new(name: impl Into<String>, anchors: Vec<Rgba>) -> Result<Self, Error> {
        if anchors.len() < 2 {
            return Err(Error::invalid_input("a colormap needs at least 2 anchors")
                .with_context("anchors", anchors.len()));
        }
        Ok(Self {
            name: name.into(),
            anchors,
        })
    }

    pub(crate) fn from_hex(name: &str, anchors: &[u32]) -> Self {
        debug_assert!(anchors.len() >= 2);
        Self {
            name: name.to_string(),
            anchors: anchors.iter().map(|&hex| Rgba::from_hex(hex)).collect(),
        }
    }

    /// Returns the anchor colors.
    pub fn anchors(&self) -> &[Rgba] {
        &self.anchors
    }

    /// Returns the number of anchors.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Always false; a listed colormap has at least two anchors.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Returns the same colormap running from 1 to 0, named with an `_r` suffix.
    pub fn reversed(&self) -> Self {
        let name = match self.name.strip_suffix("_r") {
            Some(base) => base.to_string(),
            None => format!("{}_r", self.name),
        };
        Self {
            name,
            anchors: self.anchors.iter().rev().copied().collect(),
        }
    }
}

impl Colormap for ListedColormap {
    fn name(&self) -> &str {
        &self.name
    }

    fn color_at(&self, value: f64) -> Rgba {
        if value.is_nan() {
            return Rgba::BAD;
        }
        let last = self.anchors.len() - 1;
        let position = value.clamp(0.0, 1.0) * last as f64;
        let index = position.floor() as usize;
        if index >= last {
            return self.anchors[last];
        }
        let frac = position - index as f64;
        self.anchors[index].lerp(&self.anchors[index + 1], frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_to_white() -> ListedColormap {
        ListedColormap::new("bw", vec![Rgba::rgb(0.0, 0.0, 0.0), Rgba::rgb(1.0, 1.0, 1.0)]).unwrap()
    }

    #[test]
    fn test_interpolates_between_anchors() {
        let cmap = black_to_white();
        assert_eq!(cmap.color_at(0.25), Rgba::rgb(0.25, 0.25, 0.25));
        assert_eq!(cmap.color_at(1.0), Rgba::rgb(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_clamps_and_flags_nan() {
        let cmap = black_to_white();
        assert_eq!(cmap.color_at(-3.0), cmap.anchors()[0]);
        assert_eq!(cmap.color_at(7.0), cmap.anchors()[1]);
        assert_eq!(cmap.color_at(f64::NAN), Rgba::BAD);
    }

    #[test]
    fn test_reversed_round_trips_name() {
        let cmap = black_to_white().reversed();
        assert_eq!(cmap.name(), "bw_r");
        assert_eq!(cmap.color_at(0.0), Rgba::rgb(1.0, 1.0, 1.0));
        assert_eq!(cmap.reversed().name(), "bw");
    }
}
