#![allow(clippy::float_cmp)]

use super::*;

fn cell() -> Region {
    Region::new(100, 200, 100, 100)
}

#[test]
fn fill_stretches_to_cell() {
    let p = place_image(10, 30, cell(), FitMode::Fill);
    assert_eq!((p.x, p.y, p.w, p.h), (100.0, 200.0, 100.0, 100.0));
}

#[test]
fn contain_letterboxes_wide_image() {
    let p = place_image(200, 100, cell(), FitMode::Contain);
    assert_eq!((p.x, p.y, p.w, p.h), (100.0, 225.0, 100.0, 50.0));
}

#[test]
fn contain_pillarboxes_tall_image() {
    let p = place_image(100, 400, cell(), FitMode::Contain);
    assert_eq!((p.x, p.y, p.w, p.h), (137.5, 200.0, 25.0, 100.0));
}

#[test]
fn cover_crops_wide_image_centered() {
    let p = place_image(200, 100, cell(), FitMode::Cover);
    assert_eq!((p.x, p.y, p.w, p.h), (50.0, 200.0, 200.0, 100.0));
    assert_eq!(p.clip, cell());
}

#[test]
fn cover_crops_tall_image_centered() {
    let p = place_image(100, 200, cell(), FitMode::Cover);
    assert_eq!((p.x, p.y, p.w, p.h), (100.0, 150.0, 100.0, 200.0));
}

#[test]
fn matching_aspect_is_identical_for_every_mode() {
    for fit in [FitMode::Fill, FitMode::Contain, FitMode::Cover] {
        let p = place_image(32, 64, Region::new(0, 0, 16, 32), fit);
        assert_eq!((p.x, p.y, p.w, p.h), (0.0, 0.0, 16.0, 32.0), "{fit}");
    }
}

#[test]
fn empty_image_falls_back_to_cell() {
    let p = place_image(0, 0, cell(), FitMode::Cover);
    assert_eq!((p.x, p.y, p.w, p.h), (100.0, 200.0, 100.0, 100.0));
}
