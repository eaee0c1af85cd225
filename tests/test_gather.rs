// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*
   Whole-group renders over the in-process channel transport,
   checked against the single-threaded reference rendering.
*/

extern crate mandelgather;

use mandelgather::{render, render_direct, Partitioner, RenderConfig};

fn config(width: usize, height: usize, iterations: u32) -> RenderConfig {
    RenderConfig::from_raw(
        (-2.0, 2.0, -2.0, 2.0),
        (width, height),
        iterations,
        "unused.ppm".into(),
    )
    .unwrap()
}

#[test]
fn two_workers_fill_a_four_row_image() {
    let config = config(4, 4, 50);
    let rendering = render(&config, 2, None).unwrap();
    let image = rendering.image;

    assert_eq!(Partitioner::new(2, 4).round_plan(), 2);
    assert_eq!(image.populated_rows(), 4);
    assert_eq!(image, render_direct(&config));
    // Row 2 runs through the origin, which never escapes.
    assert_eq!(image.row(2).unwrap()[2], 255);
    assert!(rendering.reports.iter().all(|r| r.rows_computed == 2));
}

#[test]
fn fifth_row_is_left_empty_with_two_workers() {
    let config = config(4, 5, 50);
    let image = render(&config, 2, None).unwrap().image;
    let direct = render_direct(&config);

    assert_eq!(image.populated_rows(), 4);
    for row in 0..4 {
        assert!(image.is_populated(row));
        assert_eq!(image.row(row), direct.row(row));
    }
    assert!(!image.is_populated(4));
    assert_eq!(image.row(4), Some(&[0u8; 4][..]));
}

#[test]
fn single_worker_matches_the_direct_render() {
    let config = config(37, 23, 80);
    let rendering = render(&config, 1, None).unwrap();
    assert_eq!(rendering.reports.len(), 1);
    assert_eq!(rendering.image, render_direct(&config));
}

#[test]
fn uncovered_rows_stay_zero_for_any_group_size() {
    let config = config(9, 17, 30);
    let direct = render_direct(&config);
    for workers in 1..8 {
        let image = render(&config, workers, None).unwrap().image;
        let covered = Partitioner::new(workers, 17).covered_rows();
        for row in 0..17 {
            if row < covered {
                assert_eq!(image.row(row), direct.row(row), "workers {} row {}", workers, row);
            } else {
                assert!(
                    image.row(row).unwrap().iter().all(|p| *p == 0),
                    "workers {} row {} should be empty",
                    workers,
                    row
                );
            }
        }
    }
}

#[test]
fn default_window_renders_identically_across_group_sizes() {
    let config = RenderConfig::from_raw(
        (-1.78, 0.78, -0.961, 0.961),
        (128, 96),
        100,
        "unused.ppm".into(),
    )
    .unwrap();
    let direct = render_direct(&config);
    for workers in &[1, 2, 3, 4, 6, 8] {
        let image = render(&config, *workers, None).unwrap().image;
        assert_eq!(image, direct, "{} workers", workers);
    }
}
