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

//! Density-colored scatter plots in the style of TOPCAT.
//!
//! This crate provides three building blocks:
//!
//! - [`density`]: Gaussian kernel density estimation evaluated at each input
//!   point, with points sorted by ascending density.
//! - [`colormap`]: registered colormaps and truncation of a colormap to a
//!   sub-range of its domain.
//! - [`scatter`]: density scatter plots drawn onto an [`Axes`](scatter::Axes)
//!   and rendered to PNG.
//!
//! # Usage
//!
//! ```rust
//! use densityscatter::{calculate_density, truncate_colormap};
//!
//! let x = [0.0, 0.3, 0.1, 2.0, 0.2];
//! let y = [0.0, 0.2, 0.4, 1.5, 0.1];
//! let result = calculate_density(&x, &y, None).unwrap();
//! assert!(result.density.windows(2).all(|w| w[0] <= w[1]));
//!
//! let cmap = truncate_colormap("Reds", 0.4, 0.9, 256).unwrap();
//! assert_eq!(cmap.len(), 256);
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod colormap;
pub mod density;
pub mod error;
pub mod scatter;

pub use self::colormap::truncate_colormap;
pub use self::density::calculate_density;
pub use self::scatter::plot_density_scatter;
