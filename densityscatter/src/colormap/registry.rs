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

//! Registered colormaps.
//!
//! All maps are ColorBrewer sequential schemes built from their 9-class
//! anchors.

use super::ListedColormap;
use crate::error::Error;

const REVERSED_SUFFIX: &str = "_r";

const REGISTRY: &[(&str, [u32; 9])] = &[
    (
        "Reds",
        [
            0xfff5f0, 0xfee0d2, 0xfcbba1, 0xfc9272, 0xfb6a4a, 0xef3b2c, 0xcb181d, 0xa50f15, 0x67000d,
        ],
    ),
    (
        "Blues",
        [
            0xf7fbff, 0xdeebf7, 0xc6dbef, 0x9ecae1, 0x6baed6, 0x4292c6, 0x2171b5, 0x08519c, 0x08306b,
        ],
    ),
    (
        "Greens",
        [
            0xf7fcf5, 0xe5f5e0, 0xc7e9c0, 0xa1d99b, 0x74c476, 0x41ab5d, 0x238b45, 0x006d2c, 0x00441b,
        ],
    ),
    (
        "Greys",
        [
            0xffffff, 0xf0f0f0, 0xd9d9d9, 0xbdbdbd, 0x969696, 0x737373, 0x525252, 0x252525, 0x000000,
        ],
    ),
    (
        "Oranges",
        [
            0xfff5eb, 0xfee6ce, 0xfdd0a2, 0xfdae6b, 0xfd8d3c, 0xf16913, 0xd94801, 0xa63603, 0x7f2704,
        ],
    ),
    (
        "Purples",
        [
            0xfcfbfd, 0xefedf5, 0xdadaeb, 0xbcbddc, 0x9e9ac8, 0x807dba, 0x6a51a3, 0x54278f, 0x3f007d,
        ],
    ),
    (
        "OrRd",
        [
            0xfff7ec, 0xfee8c8, 0xfdd49e, 0xfdbb84, 0xfc8d59, 0xef6548, 0xd7301f, 0xb30000, 0x7f0000,
        ],
    ),
    (
        "YlOrRd",
        [
            0xffffcc, 0xffeda0, 0xfed976, 0xfeb24c, 0xfd8d3c, 0xfc4e2a, 0xe31a1c, 0xbd0026, 0x800026,
        ],
    ),
    (
        "YlGnBu",
        [
            0xffffd9, 0xedf8b1, 0xc7e9b4, 0x7fcdbb, 0x41b6c4, 0x1d91c0, 0x225ea8, 0x253494, 0x081d58,
        ],
    ),
];

/// Looks up a registered colormap by name. A `_r` suffix selects the reversed map.
pub fn get_colormap(name: &str) -> Result<ListedColormap, Error> {
    if let Some(cmap) = lookup(name) {
        return Ok(cmap);
    }
    if let Some(cmap) = name.strip_suffix(REVERSED_SUFFIX).and_then(lookup) {
        return Ok(cmap.reversed());
    }
    Err(Error::invalid_input("unknown colormap").with_context("name", name))
}

/// Returns the names of all registered colormaps, without reversed variants.
pub fn names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}

fn lookup(name: &str) -> Option<ListedColormap> {
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(registered, anchors)| ListedColormap::from_hex(registered, anchors))
}
