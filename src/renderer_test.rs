use super::*;

fn renderer() -> LogRenderer {
    LogRenderer::new(Projection::new(800.0))
}

#[test]
fn no_frame_without_request() {
    let mut r = renderer();
    assert!(!r.frame());
    assert_eq!(r.frames(), 0);
}

#[test]
fn requests_coalesce_into_one_frame() {
    let mut r = renderer();
    r.request_redraw();
    r.request_redraw();
    r.request_redraw();
    assert!(r.frame());
    assert!(!r.frame());
    assert_eq!(r.frames(), 1);
}

#[test]
fn overlays_track_region_and_visibility() {
    let mut r = renderer();
    r.update_overlay(OverlayKind::Selection, Region::new(16, 32, 16, 32));
    assert_eq!(
        r.scene().overlays.get(&OverlayKind::Selection),
        Some(&Overlay { region: Region::new(16, 32, 16, 32), visible: false })
    );
    r.set_overlay_visible(OverlayKind::Selection, true);
    assert!(r.scene().overlays[&OverlayKind::Selection].visible);
    assert!(!r.scene().overlays.contains_key(&OverlayKind::Page));
}

#[test]
fn scene_mirrors_pushed_state() {
    let mut r = renderer();
    let grid = SnapGrid::for_selection(&Region::new(0, 0, 16, 32), 2048, 2048);
    r.set_camera_position(Camera::new(1.0, 2.0, 4.0));
    r.regenerate_snap_grid(&grid);
    r.set_snap_grid_visible(true);
    r.set_page_highlight(true);
    r.set_return_marker(Point::new(0.0, 16.0), Direction::Right);

    let scene = r.scene();
    assert_eq!(scene.camera, Camera::new(1.0, 2.0, 4.0));
    assert_eq!(scene.snap_grid, Some(grid));
    assert!(scene.snap_grid_visible);
    assert!(scene.page_highlight);
    assert!(!scene.base_grid_visible);
    assert_eq!(scene.return_marker, Some((Point::new(0.0, 16.0), Direction::Right)));
}

#[test]
fn shared_handle_writes_through() {
    let shared = SharedRenderer::new(renderer());
    let mut editor_side = shared.clone();
    editor_side.set_base_grid_visible(true);
    editor_side.request_redraw();
    assert!(shared.0.borrow().scene().base_grid_visible);
    assert!(shared.frame());
}
