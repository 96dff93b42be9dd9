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

use densityscatter::density::Bandwidth;
use densityscatter::density::GaussianKde;
use densityscatter::density::calculate_density;
use densityscatter::density::calculate_density_with;
use densityscatter::error::ErrorKind;
use googletest::assert_that;
use googletest::prelude::ge;
use googletest::prelude::lt;
use googletest::prelude::near;

fn spiral(n: usize) -> (Vec<f64>, Vec<f64>) {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let r = (t / n as f64).sqrt() * 3.0;
            ((t * 1.7).sin() * r, (t * 2.3).cos() * r)
        })
        .unzip()
}

#[test]
fn test_sorted_by_ascending_density() {
    let (x, y) = spiral(200);
    let result = calculate_density(&x, &y, None).unwrap();
    assert_eq!(result.len(), 200);
    assert_eq!(result.x.len(), 200);
    assert_eq!(result.y.len(), 200);
    assert_eq!(result.dropped, 0);
    for pair in result.density.windows(2) {
        assert!(pair[0] <= pair[1], "{} > {}", pair[0], pair[1]);
    }
    for (px, py, density) in result.iter() {
        assert!(density > 0.0);
        assert!(x.iter().zip(y.iter()).any(|(a, b)| *a == px && *b == py));
    }
}

#[test]
fn test_dense_points_last() {
    let x = [0.0, 0.0, 0.0, 10.0];
    let y = [0.0, 0.0, 0.0, 10.0];
    let result = calculate_density(&x, &y, None).unwrap();
    assert_eq!(result.x, vec![10.0, 0.0, 0.0, 0.0]);
    assert_eq!(result.y, vec![10.0, 0.0, 0.0, 0.0]);
    assert_that!(result.density[0], lt(result.density[1]));
    assert_eq!(result.density[1], result.density[3]);
}

#[test]
fn test_drops_non_finite_pairs() {
    let x = [0.0, 1.0, f64::NAN, 2.0];
    let y = [0.0, 1.0, 1.0, f64::INFINITY];
    let result = calculate_density(&x, &y, None).unwrap();
    assert_eq!(result.dropped, 2);
    assert_eq!(result.len(), 2);
    assert_eq!(result.x, vec![0.0, 1.0]);
    assert_eq!(result.y, vec![0.0, 1.0]);
}

#[test]
fn test_too_few_points_after_cleaning() {
    let x = [0.0, f64::NAN, 2.0];
    let y = [0.0, 1.0, f64::NEG_INFINITY];
    let err = calculate_density(&x, &y, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.context_value("points"), Some("1"));
    assert_eq!(err.context_value("dropped"), Some("2"));
}

#[test]
fn test_length_mismatch() {
    let err = calculate_density(&[1.0, 2.0], &[1.0], None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.context_value("x_len"), Some("2"));
    assert_eq!(err.context_value("y_len"), Some("1"));
}

#[test]
fn test_non_positive_bandwidth() {
    let x = [1.0, 2.0, 3.0];
    let y = [1.0, 2.0, 3.0];
    for bandwidth in [-0.5, 0.0, f64::NAN, f64::INFINITY] {
        let err = calculate_density(&x, &y, Some(bandwidth)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}

#[test]
fn test_identical_points_are_rejected() {
    let err = calculate_density(&[5.0, 5.0, 5.0], &[5.0, 5.0, 5.0], None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_many_identical_points_are_rejected() {
    for (value, n) in [(0.1, 1_000), (0.7, 10_000), (123.456, 5_000)] {
        let xs = vec![value; n];
        let ys = vec![value; n];
        let err = calculate_density(&xs, &ys, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "value={value} n={n}");
    }
}

#[test]
fn test_collinear_points_are_regularized() {
    let line = [0.0, 1.0, 2.0, 3.0];
    let result = calculate_density(&line, &line, None).unwrap();
    assert_eq!(result.dropped, 0);
    assert!(result.density.iter().all(|d| d.is_finite() && *d > 0.0));
    assert!(result.density.windows(2).all(|w| w[0] <= w[1]));

    // inner points sit closer to the rest of the line than the endpoints
    let mut outer = [result.x[0], result.x[1]];
    let mut inner = [result.x[2], result.x[3]];
    outer.sort_by(f64::total_cmp);
    inner.sort_by(f64::total_cmp);
    assert_eq!(outer, [0.0, 3.0]);
    assert_eq!(inner, [1.0, 2.0]);
    assert_that!(result.density[2] / result.density[1], ge(1.0 + 1e-6));
    assert_eq!(result.x, result.y);
}

#[test]
fn test_wider_bandwidth_flattens_density() {
    let (x, y) = spiral(100);
    let narrow = calculate_density(&x, &y, Some(0.2)).unwrap();
    let wide = calculate_density(&x, &y, Some(2.0)).unwrap();
    assert_eq!(narrow.bandwidth_factor, 0.2);
    assert_eq!(wide.bandwidth_factor, 2.0);

    let contrast = |density: &[f64]| density[density.len() - 1] / density[0];
    assert_that!(contrast(&narrow.density), ge(contrast(&wide.density)));
}

#[test]
fn test_f32_coordinates() {
    let x: Vec<f32> = vec![0.0, 0.1, 0.2, 3.0, 0.15];
    let y: Vec<f32> = vec![0.0, 0.2, 0.1, 3.0, 0.05];
    let result = calculate_density(&x, &y, None).unwrap();
    assert_eq!(result.x[0], 3.0f32);
    assert_eq!(result.y[0], 3.0f32);
}

#[test]
fn test_bandwidth_rules() {
    assert_that!(Bandwidth::Scott.factor(64), near(0.5, 1e-12));
    assert_that!(
        Bandwidth::Silverman.factor(64),
        near(Bandwidth::Scott.factor(64), 1e-12)
    );
    assert_eq!(Bandwidth::Factor(0.3).factor(64), 0.3);
    assert_eq!(Bandwidth::from(None), Bandwidth::Scott);
    assert_eq!(Bandwidth::from(Some(0.3)), Bandwidth::Factor(0.3));

    let (x, y) = spiral(64);
    let scott = calculate_density_with(&x, &y, Bandwidth::Scott).unwrap();
    let silverman = calculate_density_with(&x, &y, Bandwidth::Silverman).unwrap();
    assert_that!(scott.bandwidth_factor, near(silverman.bandwidth_factor, 1e-12));
}

#[test]
fn test_kernel_covariance() {
    let xs = [0.0, 1.0, 0.0];
    let ys = [0.0, 0.0, 1.0];
    let kde = GaussianKde::fit(&xs, &ys, Bandwidth::Factor(0.5)).unwrap();
    let data = kde.data_covariance();
    assert_that!(data.xx, near(1.0 / 3.0, 1e-12));
    assert_that!(data.yy, near(1.0 / 3.0, 1e-12));
    assert_that!(data.xy, near(-1.0 / 6.0, 1e-12));
    let kernel = kde.covariance();
    assert_that!(kernel.xx, near(1.0 / 12.0, 1e-12));
    assert_that!(kernel.xy, near(-1.0 / 24.0, 1e-12));
    assert_eq!(kde.len(), 3);
}

#[test]
fn test_density_integrates_to_one() {
    let xs = [0.0, 1.0, 0.0];
    let ys = [0.0, 0.0, 1.0];
    let kde = GaussianKde::fit(&xs, &ys, Bandwidth::Scott).unwrap();

    let step = 0.05;
    let mut total = 0.0;
    for i in 0..240 {
        for j in 0..240 {
            let x = -5.5 + step * i as f64;
            let y = -5.5 + step * j as f64;
            total += kde.evaluate(x, y) * step * step;
        }
    }
    assert_that!(total, near(1.0, 1e-3));
}

#[test]
fn test_fit_rejects_non_finite() {
    let err = GaussianKde::fit(&[0.0, f64::NAN], &[0.0, 1.0], Bandwidth::Scott).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.context_value("index"), Some("1"));
}
