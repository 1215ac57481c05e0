use std::path::Path;
use std::time::Duration;

use canvas::config::EditorConfig;
use canvas::input::Mode;

use super::*;

fn config_in(dir: &Path) -> Config {
    Config {
        state_path: dir.join("state.json"),
        canvas_path: dir.join("canvas.png"),
        export_dir: dir.join("exports"),
        glyph_sheet_dir: None,
        viewport_width: 1200.0,
        viewport_height: 800.0,
        autosave: Duration::from_secs(3),
        editor: EditorConfig { canvas_width: 256, canvas_height: 256, ..EditorConfig::default() },
    }
}

/// Session over a 256×256 canvas with the selection at (32, 32) and a 64×64
/// page frame.
fn seeded(dir: &Path) -> (Session, mpsc::UnboundedReceiver<Decoded>) {
    let config = config_in(dir);
    let seed = PersistedState {
        selection: Some(Region::new(32, 32, 16, 32)),
        page: Some(Region::new(0, 0, 64, 64)),
        ..PersistedState::default()
    };
    Store::new(&config).save_state(&seed).unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    (Session::open(&config, tx), rx)
}

fn key(key: &str, ctrl: bool) -> ScriptEvent {
    ScriptEvent::Key { key: key.into(), modifiers: Modifiers { ctrl, ..Modifiers::default() } }
}

fn text(s: &str) -> ScriptEvent {
    ScriptEvent::Text { text: s.into() }
}

// =============================================================================
// STARTUP
// =============================================================================

#[test]
fn open_seeds_from_saved_state() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _rx) = seeded(dir.path());
    assert_eq!(session.editor().selection(), Region::new(32, 32, 16, 32));
    assert_eq!(session.editor().state().page, Region::new(0, 0, 64, 64));
    assert!(!session.is_dirty());
}

#[test]
fn corrupt_state_opens_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::write(&config.state_path, "{oops").unwrap();
    let (tx, _rx) = mpsc::unbounded_channel();
    let session = Session::open(&config, tx);
    assert_eq!(session.editor().mode(), Mode::Select);
    assert_eq!(session.editor().state().page, Region::new(0, 0, 256, 256));
}

// =============================================================================
// EDITING AND SAVING
// =============================================================================

#[test]
fn typing_draws_and_marks_dirty() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _rx) = seeded(dir.path());
    assert_eq!(session.apply(text("ab")), Flow::Continue);
    assert_eq!(session.editor().selection().x, 64);
    // No glyph masks configured: cells are painted with the background color.
    assert_eq!(session.editor().surface().pixels().get_pixel(40, 40).0, [255, 255, 255, 255]);
    assert!(session.is_dirty());
}

#[test]
fn autosave_flushes_once_and_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _rx) = seeded(dir.path());
    session.apply(text("a"));
    session.apply(ScriptEvent::Mode { mode: Mode::Page });
    session.autosave();
    assert!(!session.is_dirty());
    assert!(dir.path().join("canvas.png").exists());

    let (tx, _rx2) = mpsc::unbounded_channel();
    let reopened = Session::open(&config_in(dir.path()), tx);
    assert_eq!(reopened.editor().selection(), Region::new(48, 32, 16, 32));
    assert_eq!(reopened.editor().mode(), Mode::Page);
    assert_eq!(reopened.editor().surface().pixels().get_pixel(40, 40).0, [255, 255, 255, 255]);
}

#[test]
fn autosave_skips_clean_session() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _rx) = seeded(dir.path());
    session.autosave();
    assert!(!dir.path().join("canvas.png").exists());
}

#[test]
fn quit_stops_the_loop() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _rx) = seeded(dir.path());
    assert_eq!(session.apply(ScriptEvent::Quit), Flow::Quit);
}

// =============================================================================
// EFFECTS
// =============================================================================

#[test]
fn export_writes_page_crop() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _rx) = seeded(dir.path());
    session.apply(key("p", true));
    let notices = session.take_notices();
    let [Notice::Exported { path }] = notices.as_slice() else {
        panic!("expected one export notice, got {notices:?}");
    };
    let exported = image::open(path).unwrap();
    assert_eq!((exported.width(), exported.height()), (64, 64));
}

#[test]
fn open_shortcut_asks_for_a_path() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _rx) = seeded(dir.path());
    session.apply(key("o", true));
    assert_eq!(session.take_notices(), vec![Notice::OpenImageRequested]);
}

#[test]
fn copy_fills_clipboard() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _rx) = seeded(dir.path());
    session.apply(key("c", true));
    assert_eq!(session.take_notices(), vec![Notice::Copied { region: Region::new(32, 32, 16, 32) }]);
    assert!(session.clipboard.is_some());
}

#[tokio::test]
async fn copy_then_paste_round_trips_through_decoder() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, mut rx) = seeded(dir.path());
    session.apply(text("a"));
    session.apply(key("ArrowLeft", false));
    session.apply(key("c", true));
    session.take_notices();

    session.apply(key("ArrowRight", false));
    session.apply(ScriptEvent::Paste { path: None });
    let decoded = rx.recv().await.unwrap();
    assert_eq!(decoded.ticket, 1);
    let before = session.editor().history().len();
    session.image_ready(decoded);

    assert_eq!(session.editor().selection(), Region::new(64, 32, 16, 32));
    assert_eq!(session.editor().history().len(), before + 1);
    assert_eq!(session.editor().surface().pixels().get_pixel(50, 40).0, [255, 255, 255, 255]);
}

#[tokio::test]
async fn unreadable_file_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, mut rx) = seeded(dir.path());
    session.apply(ScriptEvent::Open { path: dir.path().join("missing.png") });
    std::fs::write(dir.path().join("bad.png"), b"not a png").unwrap();
    session.apply(ScriptEvent::Open { path: dir.path().join("bad.png") });

    let decoded = rx.recv().await.unwrap();
    assert!(matches!(decoded.result, Err(ImageError::Decode(_))));
    let history = session.editor().history().len();
    session.image_ready(decoded);
    assert_eq!(session.editor().history().len(), history);
    assert_eq!(session.editor().selection(), Region::new(32, 32, 16, 32));
}

#[test]
fn color_change_regenerates_after_poll() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _rx) = seeded(dir.path());
    session.apply(ScriptEvent::Colors { foreground: canvas::prefs::Color::WHITE, background: canvas::prefs::Color::BLACK });
    let deadline = session.next_deadline().unwrap();
    session.poll(deadline);
    assert!(session.next_deadline().is_none());

    session.apply(text("a"));
    assert_eq!(session.editor().surface().pixels().get_pixel(40, 40).0, [0, 0, 0, 255]);
}
