#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::consts::{FIELD_OF_VIEW_DEG, INITIAL_CAMERA_Z, ZOOM_STEP_PX};

const ANCHOR_EPSILON: f64 = 1e-6;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn viewport() -> Viewport {
    Viewport::new(1200.0, 800.0)
}

fn controller_at(x: f64, y: f64, z: f64) -> ZoomPan {
    ZoomPan::new(Camera::new(x, y, z), ZOOM_MIN, ZOOM_MAX)
}

fn assert_z_in_bounds(z: f64) {
    assert!((ZOOM_MIN..=ZOOM_MAX).contains(&z), "z out of bounds: {z}");
}

// =============================================================
// Construction
// =============================================================

#[test]
fn default_starts_at_initial_camera() {
    let zp = ZoomPan::default();
    assert_eq!(zp.camera(), Camera::new(0.0, 0.0, INITIAL_CAMERA_Z));
}

#[test]
fn new_clamps_seed_depth() {
    assert_eq!(controller_at(0.0, 0.0, 100.0).camera().z, ZOOM_MAX);
    assert_eq!(controller_at(0.0, 0.0, 0.01).camera().z, ZOOM_MIN);
}

// =============================================================
// Zoom at point
// =============================================================

#[test]
fn zoom_formula_scales_by_height_percent() {
    let mut zp = controller_at(0.0, 0.0, 3.0);
    let cam = zp.zoom_at_point(&viewport(), viewport().center(), 80.0);
    assert!((cam.z - 3.0 / 0.9).abs() < 1e-12);
}

#[test]
fn zoom_keeps_world_point_under_cursor() {
    let vp = viewport();
    for delta in [-300.0, -57.0, -1.0, 0.5, 57.0, 240.0, 799.0] {
        for screen in [pt(100.0, 650.0), pt(1199.0, 0.0), vp.center(), pt(3.0, 400.0)] {
            let mut zp = controller_at(0.3, -0.2, 3.0);
            let before = zp.camera().screen_to_world(&vp, screen);
            let cam = zp.zoom_at_point(&vp, screen, delta);
            let after = cam.screen_to_world(&vp, screen);
            assert!((before.x - after.x).abs() < ANCHOR_EPSILON, "x drift {delta} {screen:?}");
            assert!((before.y - after.y).abs() < ANCHOR_EPSILON, "y drift {delta} {screen:?}");
        }
    }
}

#[test]
fn zoom_anchor_holds_when_clamped() {
    let vp = viewport();
    let screen = pt(200.0, 100.0);
    let mut zp = controller_at(1.0, 1.0, 0.6);
    let before = zp.camera().screen_to_world(&vp, screen);
    let cam = zp.zoom_at_point(&vp, screen, -5000.0);
    assert_eq!(cam.z, ZOOM_MIN);
    let after = cam.screen_to_world(&vp, screen);
    assert!((before.x - after.x).abs() < ANCHOR_EPSILON);
    assert!((before.y - after.y).abs() < ANCHOR_EPSILON);
}

#[test]
fn zoom_stays_in_bounds_for_any_sequence() {
    let vp = viewport();
    let mut zp = ZoomPan::default();
    let deltas = [5000.0, 799.9, 800.0, 1e9, -1e9, -799.0, 400.0, -0.001, 12.0, -12.0, 900.0, -900.0];
    for (i, delta) in deltas.iter().cycle().take(200).enumerate() {
        let screen = pt(f64::from((i as u32 * 37) % 1200), f64::from((i as u32 * 53) % 800));
        let cam = zp.zoom_at_point(&vp, screen, *delta);
        assert_z_in_bounds(cam.z);
        assert!(cam.x.is_finite() && cam.y.is_finite());
    }
}

#[test]
fn delta_at_full_height_saturates_far() {
    let mut zp = ZoomPan::default();
    assert_eq!(zp.zoom_at_point(&viewport(), viewport().center(), 800.0).z, ZOOM_MAX);
}

#[test]
fn non_finite_delta_is_ignored() {
    let mut zp = controller_at(1.0, 2.0, 3.0);
    assert_eq!(zp.zoom_at_point(&viewport(), pt(10.0, 10.0), f64::NAN), Camera::new(1.0, 2.0, 3.0));
    assert_eq!(zp.zoom_at_point(&viewport(), pt(10.0, 10.0), f64::INFINITY), Camera::new(1.0, 2.0, 3.0));
}

#[test]
fn zero_height_viewport_is_ignored() {
    let vp = Viewport { width: 100.0, height: 0.0, fov_deg: FIELD_OF_VIEW_DEG };
    let mut zp = controller_at(1.0, 2.0, 3.0);
    assert_eq!(zp.zoom_at_point(&vp, pt(10.0, 10.0), 40.0), Camera::new(1.0, 2.0, 3.0));
}

// =============================================================
// Centered zoom
// =============================================================

#[test]
fn zoom_centered_in_twice_strictly_decreases() {
    let vp = viewport();
    let mut zp = controller_at(0.0, 0.0, 3.0);
    let first = zp.zoom_centered(&vp, ZOOM_STEP_PX).z;
    let second = zp.zoom_centered(&vp, ZOOM_STEP_PX).z;
    assert!(first < 3.0);
    assert!(second < first);
    assert!(second >= ZOOM_MIN);
}

#[test]
fn zoom_centered_does_not_move_camera() {
    let vp = viewport();
    let mut zp = controller_at(0.7, -0.4, 3.0);
    let cam = zp.zoom_centered(&vp, -ZOOM_STEP_PX);
    assert!(cam.z > 3.0);
    assert!((cam.x - 0.7).abs() < 1e-12);
    assert!((cam.y + 0.4).abs() < 1e-12);
}

#[test]
fn zoom_centered_in_floors_at_min() {
    let vp = viewport();
    let mut zp = controller_at(0.0, 0.0, 0.6);
    for _ in 0..20 {
        assert_z_in_bounds(zp.zoom_centered(&vp, ZOOM_STEP_PX).z);
    }
    assert_eq!(zp.camera().z, ZOOM_MIN);
}

// =============================================================
// Pan
// =============================================================

#[test]
fn pan_by_screen_delta_inverts_y() {
    let vp = viewport();
    let mut zp = controller_at(0.0, 0.0, 3.0);
    let per_px = zp.camera().world_per_screen_px(&vp);
    let cam = zp.pan_by_screen_delta(&vp, 10.0, 10.0);
    assert!((cam.x + 10.0 * per_px).abs() < 1e-12);
    assert!((cam.y - 10.0 * per_px).abs() < 1e-12);
}

#[test]
fn drag_pan_keeps_content_under_pointer() {
    let vp = viewport();
    let mut zp = controller_at(0.5, 0.5, 4.0);
    let start = pt(300.0, 300.0);
    let grabbed = zp.camera().screen_to_world(&vp, start);
    zp.begin_pan(start);
    let end = pt(420.0, 250.0);
    let cam = zp.pan_to(&vp, end);
    let under = cam.screen_to_world(&vp, end);
    assert!((under.x - grabbed.x).abs() < 1e-9);
    assert!((under.y - grabbed.y).abs() < 1e-9);
}

#[test]
fn drag_pan_is_computed_from_origin() {
    let vp = viewport();
    let mut zp = controller_at(0.5, 0.5, 4.0);
    zp.begin_pan(pt(300.0, 300.0));
    for i in 0..50 {
        zp.pan_to(&vp, pt(300.0 + f64::from(i) * 7.3, 300.0 - f64::from(i) * 3.1));
    }
    let cam = zp.pan_to(&vp, pt(300.0, 300.0));
    assert_eq!(cam, Camera::new(0.5, 0.5, 4.0));
}

#[test]
fn pan_without_origin_is_noop() {
    let mut zp = controller_at(1.0, 1.0, 3.0);
    assert_eq!(zp.pan_to(&viewport(), pt(500.0, 500.0)), Camera::new(1.0, 1.0, 3.0));
    zp.begin_pan(pt(0.0, 0.0));
    zp.end_pan();
    assert_eq!(zp.pan_to(&viewport(), pt(500.0, 500.0)), Camera::new(1.0, 1.0, 3.0));
}

// =============================================================
// Pinch
// =============================================================

#[test]
fn pinch_without_motion_is_identity() {
    let vp = viewport();
    let mut zp = controller_at(0.2, 0.1, 3.0);
    zp.begin_pinch(pt(500.0, 400.0), pt(700.0, 400.0));
    assert!(zp.is_pinching());
    let cam = zp.pinch_to(&vp, pt(500.0, 400.0), pt(700.0, 400.0));
    assert!((cam.x - 0.2).abs() < 1e-12);
    assert!((cam.y - 0.1).abs() < 1e-12);
    assert!((cam.z - 3.0).abs() < 1e-12);
}

#[test]
fn pinch_spread_zooms_in_about_midpoint() {
    let vp = viewport();
    let mut zp = controller_at(0.0, 0.0, 3.0);
    let a = pt(500.0, 300.0);
    let b = pt(700.0, 300.0);
    let mid = a.midpoint(b);
    let before = zp.camera().screen_to_world(&vp, mid);
    zp.begin_pinch(a, b);
    let cam = zp.pinch_to(&vp, pt(400.0, 300.0), pt(800.0, 300.0));
    assert!((cam.z - 1.5).abs() < 1e-12);
    let after = cam.screen_to_world(&vp, mid);
    assert!((before.x - after.x).abs() < ANCHOR_EPSILON);
    assert!((before.y - after.y).abs() < ANCHOR_EPSILON);
}

#[test]
fn pinch_is_recomputed_from_gesture_start() {
    let vp = viewport();
    let mut zp = controller_at(0.0, 0.0, 3.0);
    zp.begin_pinch(pt(500.0, 300.0), pt(700.0, 300.0));
    for i in 1..40 {
        let spread = f64::from(i) * 5.0;
        zp.pinch_to(&vp, pt(500.0 - spread, 310.0), pt(700.0 + spread, 290.0));
    }
    let cam = zp.pinch_to(&vp, pt(500.0, 300.0), pt(700.0, 300.0));
    assert!(cam.x.abs() < 1e-12);
    assert!(cam.y.abs() < 1e-12);
    assert!((cam.z - 3.0).abs() < 1e-12);
}

#[test]
fn pinch_zoom_is_clamped() {
    let vp = viewport();
    let mut zp = controller_at(0.0, 0.0, 3.0);
    zp.begin_pinch(pt(599.0, 400.0), pt(601.0, 400.0));
    assert_eq!(zp.pinch_to(&vp, pt(0.0, 400.0), pt(1200.0, 400.0)).z, ZOOM_MIN);
    assert_eq!(zp.pinch_to(&vp, pt(599.99, 400.0), pt(600.01, 400.0)).z, ZOOM_MAX);
}

#[test]
fn pinch_end_stops_gesture() {
    let mut zp = controller_at(0.0, 0.0, 3.0);
    zp.begin_pinch(pt(0.0, 0.0), pt(10.0, 0.0));
    zp.end_pinch();
    assert!(!zp.is_pinching());
    assert_eq!(zp.pinch_to(&viewport(), pt(0.0, 0.0), pt(100.0, 0.0)), Camera::new(0.0, 0.0, 3.0));
}
