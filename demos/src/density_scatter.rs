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

//! Example rendering a TOPCAT-style density scatter plot to PNG

use std::f64::consts::TAU;

use densityscatter::calculate_density;
use densityscatter::plot_density_scatter;
use densityscatter::scatter::DensityScatterOptions;
use densityscatter::scatter::ScatterStyle;
use densityscatter::scatter::take_current_axes;
use tracing_subscriber::EnvFilter;

/// Xorshift generator, enough for reproducible demo data.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn seeded(seed: u64) -> Self {
        let state = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state }
    }

    fn next_f64(&mut self) -> f64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        (x >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Standard normal pair via Box-Muller.
    fn next_gaussian_pair(&mut self) -> (f64, f64) {
        let u1 = self.next_f64().max(f64::MIN_POSITIVE);
        let u2 = self.next_f64();
        let r = (-2.0 * u1.ln()).sqrt();
        (r * (TAU * u2).cos(), r * (TAU * u2).sin())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "density_scatter.png".to_string());

    println!("=== Density Scatter Example ===\n");

    let mut rng = XorShift64::seeded(42);
    let mut x = Vec::new();
    let mut y = Vec::new();
    for _ in 0..2000 {
        let (a, b) = rng.next_gaussian_pair();
        x.push(a);
        y.push(0.6 * a + 0.8 * b);
    }
    for _ in 0..500 {
        let (a, b) = rng.next_gaussian_pair();
        x.push(3.0 + 0.4 * a);
        y.push(-2.0 + 0.4 * b);
    }
    // A few bad rows, removed with a warning.
    x.push(f64::NAN);
    y.push(1.0);
    x.push(2.0);
    y.push(f64::INFINITY);

    println!("1. Density estimate:");
    let result = calculate_density(&x, &y, None).expect("valid demo data");
    println!("   Points kept: {}", result.len());
    println!("   Points dropped: {}", result.dropped);
    println!("   Bandwidth factor: {:.4}", result.bandwidth_factor);
    println!(
        "   Density range: {:.5} .. {:.5}",
        result.density[0],
        result.density[result.len() - 1]
    );
    println!();

    println!("2. Density scatter on the current axes:");
    let options = DensityScatterOptions::default()
        .with_cmap("Reds")
        .with_style(ScatterStyle::default().with_marker_size(9.0));
    let handle = plot_density_scatter(&x, &y, &options, None).expect("valid demo data");
    let mut axes = take_current_axes();
    axes.colorbar(handle).expect("handle from this axes");

    match axes.save_png(&output, 800, 600) {
        Ok(()) => println!("   Wrote {output}"),
        Err(err) => println!("   Failed to write {output}: {err}"),
    }
}
