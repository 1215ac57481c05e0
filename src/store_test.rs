use canvas::camera::Camera;
use canvas::input::Mode;
use canvas::region::Region;
use image::Rgba;

use super::*;

fn store_in(dir: &Path) -> Store {
    Store {
        state_path: dir.join("state.json"),
        canvas_path: dir.join("canvas.png"),
        export_dir: dir.join("exports"),
    }
}

// =============================================================================
// STATE
// =============================================================================

#[test]
fn missing_state_is_fresh_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    assert_eq!(store.load_state().unwrap(), PersistedState::default());
}

#[test]
fn state_roundtrips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    let state = PersistedState {
        selection: Some(Region::new(32, 64, 16, 32)),
        camera: Some(Camera::new(0.5, -1.0, 4.0)),
        mode: Some(Mode::Resize),
        ..PersistedState::default()
    };
    store.save_state(&state).unwrap();
    assert_eq!(store.load_state().unwrap(), state);
    assert!(!dir.path().join("state.tmp").exists());
}

#[test]
fn legacy_keys_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    std::fs::write(
        dir.path().join("state.json"),
        r#"{"mode":"normal","cameraPosition":{"x":1.0,"y":2.0,"z":3.0},"returnSource":{"x":0,"y":0,"w":16,"h":32}}"#,
    )
    .unwrap();
    let state = store.load_state().unwrap();
    assert_eq!(state.mode, Some(Mode::Select));
    assert_eq!(state.camera, Some(Camera::new(1.0, 2.0, 3.0)));
    assert_eq!(state.return_anchor, Some(Region::new(0, 0, 16, 32)));
}

#[test]
fn corrupt_state_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    std::fs::write(dir.path().join("state.json"), "{not json").unwrap();
    assert!(matches!(store.load_state(), Err(StoreError::Json { .. })));
}

// =============================================================================
// CANVAS
// =============================================================================

#[test]
fn canvas_roundtrips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    assert!(store.load_canvas(4, 4).unwrap().is_none());

    let pixels = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
    store.save_canvas(&pixels).unwrap();
    assert_eq!(store.load_canvas(4, 4).unwrap(), Some(pixels));
}

#[test]
fn wrong_size_canvas_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    store.save_canvas(&RgbaImage::new(4, 4)).unwrap();
    assert!(store.load_canvas(8, 8).unwrap().is_none());
}

// =============================================================================
// EXPORT
// =============================================================================

#[test]
fn export_writes_timestamped_png() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    let pixels = RgbaImage::from_pixel(3, 2, Rgba([9, 9, 9, 255]));
    let path = store.export(&pixels, 1_700_000_000).unwrap();
    assert_eq!(path, dir.path().join("exports").join("grid-1700000000.png"));
    assert_eq!(image::open(&path).unwrap().to_rgba8(), pixels);
}
