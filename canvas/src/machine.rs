//! The modal interaction state machine as a pure transition table.
//!
//! [`dispatch`] maps `(state, event)` to the next state plus the named
//! [`Action`]s the editor must run, in order. It touches no editor data, so
//! every transition is testable on its own.
//!
//! Each mode has an idle state and, except select mode, a drag sub-state
//! entered on primary-button down. Middle and right drags (pointer pan and
//! pointer resize) are layered over every mode and return to the mode they
//! started from. Editing commands and mode switches are shared by all idle
//! states; drag sub-states accept only pointer motion and their own
//! button-up. Pinch gestures are accepted everywhere. Anything else is
//! ignored.

#[cfg(test)]
#[path = "machine_test.rs"]
mod machine_test;

use crate::camera::Point;
use crate::input::{Button, Event, ImageBlob, Mode};
use crate::prefs::TextColors;
use crate::region::Direction;

/// Where the machine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    /// Waiting for input in `Mode`.
    Idle(Mode),
    /// Primary drag in progress (pan, resize, or page mode only).
    Dragging(Mode),
    /// Middle-button pan started from `Mode`.
    PointerPanning(Mode),
    /// Right-button resize started from `Mode`.
    PointerResizing(Mode),
}

impl Default for MachineState {
    fn default() -> Self {
        Self::Idle(Mode::Select)
    }
}

impl MachineState {
    /// The mode this state belongs to and returns to.
    #[must_use]
    pub fn mode(self) -> Mode {
        match self {
            Self::Idle(m) | Self::Dragging(m) | Self::PointerPanning(m) | Self::PointerResizing(m) => m,
        }
    }

    #[must_use]
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle(_))
    }
}

/// Named mutation the editor performs for a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    TrackPointer(Point),
    ZoomAtPointer { delta_y: f64 },
    ZoomIn,
    ZoomOut,
    BeginPan,
    PanToPointer,
    EndPan,
    BeginPinch { a: Point, b: Point },
    PinchTo { a: Point, b: Point },
    EndPinch,
    SelectAtPointer,
    SetReturnAnchor,
    BeginResize,
    UpdateResize,
    FinishResize,
    BeginPage,
    UpdatePage,
    FinishPage,
    SetMode(Mode),
    PrintGlyph(char),
    Backspace,
    Step(Direction),
    ShiftByUnit(Direction),
    GrowFromTopLeft(Direction),
    GrowFromBottomRight(Direction),
    MoveToReturn,
    SetDirection(Direction),
    RotateDirection,
    ToggleGrid,
    ToggleAutoAdvance,
    CycleFit,
    OpenImageDialog,
    Export,
    Copy,
    Cut,
    DecodeImage(ImageBlob),
    RegenerateGlyphs(TextColors),
    Undo,
    Redo,
}

/// Result of feeding one event to the machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: MachineState,
    pub actions: Vec<Action>,
}

impl Transition {
    fn stay(state: MachineState, actions: Vec<Action>) -> Self {
        Self { next: state, actions }
    }

    fn to(next: MachineState, actions: Vec<Action>) -> Self {
        Self { next, actions }
    }

    /// Whether the event was ignored.
    #[must_use]
    pub fn is_noop(&self, from: MachineState) -> bool {
        self.next == from && self.actions.is_empty()
    }
}

/// Compute the transition for `event` in `state`.
#[must_use]
pub fn dispatch(state: MachineState, event: &Event) -> Transition {
    if let Some(actions) = gesture_actions(event) {
        return Transition::stay(state, actions);
    }
    match state {
        MachineState::Idle(mode) => dispatch_idle(mode, event),
        MachineState::Dragging(mode) => dispatch_dragging(mode, event),
        MachineState::PointerPanning(mode) => match event {
            Event::PointerMove(p) => Transition::stay(state, vec![Action::TrackPointer(*p), Action::PanToPointer]),
            Event::ButtonUp(Button::Middle) => Transition::to(MachineState::Idle(mode), vec![Action::EndPan]),
            _ => Transition::stay(state, Vec::new()),
        },
        MachineState::PointerResizing(mode) => match event {
            Event::PointerMove(p) => Transition::stay(state, vec![Action::TrackPointer(*p), Action::UpdateResize]),
            Event::ButtonUp(Button::Secondary) => {
                Transition::to(MachineState::Idle(mode), vec![Action::FinishResize, Action::SetReturnAnchor])
            }
            _ => Transition::stay(state, Vec::new()),
        },
    }
}

/// Two-pointer gestures, accepted in every state.
fn gesture_actions(event: &Event) -> Option<Vec<Action>> {
    match event {
        Event::PinchStart { a, b } => Some(vec![Action::BeginPinch { a: *a, b: *b }]),
        Event::PinchMove { a, b } => Some(vec![Action::PinchTo { a: *a, b: *b }]),
        Event::PinchEnd => Some(vec![Action::EndPinch]),
        _ => None,
    }
}

fn dispatch_idle(mode: Mode, event: &Event) -> Transition {
    let here = MachineState::Idle(mode);
    match event {
        Event::PointerMove(p) => Transition::stay(here, vec![Action::TrackPointer(*p)]),
        Event::ButtonDown(Button::Primary) => primary_down(mode),
        Event::ButtonDown(Button::Middle) => Transition::to(MachineState::PointerPanning(mode), vec![Action::BeginPan]),
        Event::ButtonDown(Button::Secondary) => Transition::to(
            MachineState::PointerResizing(mode),
            vec![Action::BeginResize, Action::UpdateResize],
        ),
        Event::SetMode(next) => Transition::to(MachineState::Idle(*next), vec![Action::SetMode(*next)]),
        _ => Transition::stay(here, command_actions(event)),
    }
}

fn primary_down(mode: Mode) -> Transition {
    match mode {
        Mode::Select => Transition::stay(
            MachineState::Idle(mode),
            vec![Action::SelectAtPointer, Action::SetReturnAnchor],
        ),
        Mode::Pan => Transition::to(MachineState::Dragging(mode), vec![Action::BeginPan]),
        Mode::Resize => Transition::to(MachineState::Dragging(mode), vec![Action::BeginResize, Action::UpdateResize]),
        Mode::Page => Transition::to(MachineState::Dragging(mode), vec![Action::BeginPage, Action::UpdatePage]),
    }
}

fn dispatch_dragging(mode: Mode, event: &Event) -> Transition {
    let here = MachineState::Dragging(mode);
    let back = MachineState::Idle(mode);
    match (mode, event) {
        (Mode::Pan, Event::PointerMove(p)) => Transition::stay(here, vec![Action::TrackPointer(*p), Action::PanToPointer]),
        (Mode::Resize, Event::PointerMove(p)) => {
            Transition::stay(here, vec![Action::TrackPointer(*p), Action::UpdateResize])
        }
        (Mode::Page, Event::PointerMove(p)) => Transition::stay(here, vec![Action::TrackPointer(*p), Action::UpdatePage]),
        (Mode::Pan, Event::ButtonUp(Button::Primary)) => Transition::to(back, vec![Action::EndPan]),
        (Mode::Resize, Event::ButtonUp(Button::Primary)) => {
            Transition::to(back, vec![Action::FinishResize, Action::SetReturnAnchor])
        }
        (Mode::Page, Event::ButtonUp(Button::Primary)) => Transition::to(back, vec![Action::FinishPage]),
        _ => Transition::stay(here, Vec::new()),
    }
}

/// Editing commands shared by every idle state.
fn command_actions(event: &Event) -> Vec<Action> {
    match event {
        Event::Wheel { delta_y } => vec![Action::ZoomAtPointer { delta_y: *delta_y }],
        Event::Char(c) => vec![Action::PrintGlyph(*c)],
        Event::Backspace => vec![Action::Backspace],
        Event::Enter => vec![Action::MoveToReturn],
        Event::Arrow(d) => vec![Action::Step(*d), Action::SetReturnAnchor],
        Event::ShiftArrow(d) => vec![Action::ShiftByUnit(*d), Action::SetReturnAnchor],
        Event::CommandArrow(d) => vec![Action::GrowFromTopLeft(*d), Action::SetReturnAnchor],
        Event::CommandShiftArrow(d) => vec![Action::GrowFromBottomRight(*d), Action::SetReturnAnchor],
        Event::Dragged(d) | Event::SetDirection(d) => vec![Action::SetDirection(*d)],
        Event::DirectionShortcut(d) => vec![Action::SetReturnAnchor, Action::SetDirection(*d)],
        Event::RotateDirection => vec![Action::RotateDirection],
        Event::ZoomIn => vec![Action::ZoomIn],
        Event::ZoomOut => vec![Action::ZoomOut],
        Event::Undo => vec![Action::Undo],
        Event::Redo => vec![Action::Redo],
        Event::ToggleGrid => vec![Action::ToggleGrid],
        Event::ToggleAutoAdvance => vec![Action::ToggleAutoAdvance],
        Event::CycleFit => vec![Action::CycleFit],
        Event::OpenImage => vec![Action::OpenImageDialog],
        Event::Export => vec![Action::Export],
        Event::Copy => vec![Action::Copy],
        Event::Cut => vec![Action::Cut],
        Event::Paste(items) => items
            .iter()
            .filter(|item| item.is_image())
            .map(|item| Action::DecodeImage(item.clone()))
            .collect(),
        Event::ImageSelected(blob) => vec![Action::DecodeImage(blob.clone())],
        Event::TextColorsChanged(colors) => vec![Action::RegenerateGlyphs(*colors)],
        _ => Vec::new(),
    }
}
