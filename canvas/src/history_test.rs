use super::*;

fn entry(n: u32) -> UndoEntry<u32> {
    let i = i32::try_from(n).unwrap();
    UndoEntry { canvas: n, selection: Region::new(i * 16, 0, 16, 32), return_anchor: Region::new(0, i * 32, 16, 32) }
}

fn ring_with(capacity: usize, count: u32) -> UndoRing<u32> {
    let mut ring = UndoRing::new(capacity);
    for n in 0..count {
        ring.snapshot(entry(n));
    }
    ring
}

fn current_canvas(ring: &UndoRing<u32>) -> Option<u32> {
    ring.current().map(|e| e.canvas)
}

// =============================================================
// Empty ring
// =============================================================

#[test]
fn capacity_floor_is_two() {
    assert_eq!(UndoRing::<u32>::new(0).capacity(), 2);
    assert_eq!(UndoRing::<u32>::new(17).capacity(), 17);
}

#[test]
fn empty_ring_has_nothing_to_walk() {
    let mut ring = UndoRing::<u32>::new(17);
    assert!(ring.is_empty());
    assert_eq!(ring.active(), None);
    assert!(!ring.can_undo());
    assert!(!ring.can_redo());
    assert!(ring.undo().is_none());
    assert!(ring.redo().is_none());
    assert!(ring.current().is_none());
}

#[test]
fn first_snapshot_is_current_and_not_undoable() {
    let mut ring = ring_with(17, 1);
    assert_eq!(ring.len(), 1);
    assert_eq!(ring.active(), Some(0));
    assert_eq!(current_canvas(&ring), Some(0));
    assert!(ring.undo().is_none());
    assert_eq!(ring.active(), Some(0));
}

// =============================================================
// Linear undo / redo
// =============================================================

#[test]
fn undo_walks_back_to_first_snapshot() {
    let mut ring = ring_with(17, 5);
    for expected in (0..4).rev() {
        let restored = ring.undo().map(|e| e.canvas);
        assert_eq!(restored, Some(expected));
    }
    assert_eq!(current_canvas(&ring), Some(0));
    assert!(!ring.can_undo());
    assert!(ring.undo().is_none());
}

#[test]
fn redo_restores_exact_pre_undo_entry() {
    let mut ring = ring_with(17, 3);
    let before = ring.current().cloned();
    assert!(ring.undo().is_some());
    let redone = ring.redo().cloned();
    assert_eq!(redone, before);
    assert_eq!(redone, Some(entry(2)));
}

#[test]
fn redo_at_newest_is_noop() {
    let mut ring = ring_with(17, 3);
    assert!(!ring.can_redo());
    assert!(ring.redo().is_none());
    assert_eq!(ring.active(), Some(2));
}

#[test]
fn active_stays_within_history() {
    let mut ring = ring_with(5, 3);
    for _ in 0..10 {
        ring.undo();
        let active = ring.active().unwrap();
        assert!(active < ring.len());
    }
    for _ in 0..10 {
        ring.redo();
        let active = ring.active().unwrap();
        assert!(active < ring.len());
    }
}

// =============================================================
// Truncation
// =============================================================

#[test]
fn snapshot_after_undo_discards_redo_branch() {
    let mut ring = ring_with(17, 3);
    ring.undo();
    ring.snapshot(entry(9));
    assert_eq!(ring.len(), 3);
    assert_eq!(current_canvas(&ring), Some(9));
    assert!(!ring.can_redo());
    assert!(ring.redo().is_none());
    assert_eq!(ring.undo().map(|e| e.canvas), Some(1));
    assert_eq!(ring.undo().map(|e| e.canvas), Some(0));
}

#[test]
fn snapshot_after_undo_to_start_keeps_only_start() {
    let mut ring = ring_with(17, 4);
    while ring.undo().is_some() {}
    ring.snapshot(entry(7));
    assert_eq!(ring.len(), 2);
    assert_eq!(ring.undo().map(|e| e.canvas), Some(0));
}

// =============================================================
// Ring wraparound
// =============================================================

#[test]
fn wraparound_keeps_capacity_minus_one_undo_steps() {
    let mut ring = ring_with(17, 40);
    assert_eq!(ring.len(), 17);
    let mut steps = 0;
    while ring.undo().is_some() {
        steps += 1;
    }
    assert_eq!(steps, 16);
    assert_eq!(current_canvas(&ring), Some(23));
}

#[test]
fn wraparound_evicts_oldest_first() {
    let mut ring = ring_with(4, 4);
    assert_eq!(ring.slot_order(), &[0, 1, 2, 3]);
    ring.snapshot(entry(4));
    assert_eq!(ring.slot_order(), &[1, 2, 3, 0]);
    ring.snapshot(entry(5));
    assert_eq!(ring.slot_order(), &[2, 3, 0, 1]);
    let mut seen = Vec::new();
    while let Some(e) = ring.undo() {
        seen.push(e.canvas);
    }
    assert_eq!(seen, vec![4, 3, 2]);
}

#[test]
fn wraparound_with_truncation_reuses_next_slot() {
    let mut ring = ring_with(4, 6);
    ring.undo();
    ring.undo();
    ring.snapshot(entry(10));
    assert_eq!(ring.slot_order(), &[2, 3, 0]);
    assert_eq!(current_canvas(&ring), Some(10));
    assert_eq!(ring.undo().map(|e| e.canvas), Some(3));
}

#[test]
fn restored_entry_carries_regions() {
    let mut ring = ring_with(17, 2);
    let restored = ring.undo().cloned().unwrap();
    assert_eq!(restored.selection, Region::new(0, 0, 16, 32));
    assert_eq!(restored.return_anchor, Region::new(0, 0, 16, 32));
}
