//! Raw input shapes and their normalization to a single pointer sample.

use slint::platform::{Key, PointerEventButton, WindowEvent};
use slint::SharedString;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub client_x: f32,
    pub client_y: f32,
}

/// Input as delivered by the host, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Pointer {
        phase: PointerPhase,
        client_x: f32,
        client_y: f32,
    },
    /// `touches` holds the changed touch points; only the first is used.
    Touch {
        phase: TouchPhase,
        touches: Vec<TouchPoint>,
    },
    Key { text: SharedString },
}

impl RawInput {
    pub fn pointer(phase: PointerPhase, client_x: f32, client_y: f32) -> Self {
        Self::Pointer {
            phase,
            client_x,
            client_y,
        }
    }

    pub fn touch(phase: TouchPhase, client_x: f32, client_y: f32) -> Self {
        Self::Touch {
            phase,
            touches: vec![TouchPoint { client_x, client_y }],
        }
    }

    pub fn key(key: Key) -> Self {
        Self::Key { text: key.into() }
    }

    /// Adapt a Slint window event. Only left-button pointer events and key
    /// presses are relevant; everything else yields `None`.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::PointerPressed {
                position,
                button: PointerEventButton::Left,
                ..
            } => Some(Self::pointer(PointerPhase::Down, position.x, position.y)),
            WindowEvent::PointerReleased {
                position,
                button: PointerEventButton::Left,
                ..
            } => Some(Self::pointer(PointerPhase::Up, position.x, position.y)),
            WindowEvent::PointerMoved { position, .. } => {
                Some(Self::pointer(PointerPhase::Move, position.x, position.y))
            }
            WindowEvent::KeyPressed { text, .. } => Some(Self::Key { text: text.clone() }),
            _ => None,
        }
    }

    /// Delete or Backspace.
    pub fn is_delete_key(&self) -> bool {
        match self {
            Self::Key { text } => {
                *text == SharedString::from(Key::Delete)
                    || *text == SharedString::from(Key::Backspace)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Begin,
    Move,
    End,
}

/// Canonical pointer event seen by the gesture controllers. Coordinates are
/// screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub phase: Phase,
}

/// Collapse pointer and touch input into a [`PointerSample`].
///
/// `last` is the last known pointer position; a touch end or cancel carrying
/// no touch point ends at that position so the gesture still terminates.
/// Other touch events without a point, and key input, yield `None`.
pub fn normalize(input: &RawInput, last: Option<(f32, f32)>) -> Option<PointerSample> {
    match input {
        RawInput::Pointer {
            phase,
            client_x,
            client_y,
        } => {
            let phase = match phase {
                PointerPhase::Down => Phase::Begin,
                PointerPhase::Move => Phase::Move,
                PointerPhase::Up => Phase::End,
            };
            Some(PointerSample {
                x: *client_x,
                y: *client_y,
                phase,
            })
        }
        RawInput::Touch { phase, touches } => {
            let phase = match phase {
                TouchPhase::Start => Phase::Begin,
                TouchPhase::Move => Phase::Move,
                TouchPhase::End | TouchPhase::Cancel => Phase::End,
            };
            let (x, y) = match (touches.first(), phase) {
                (Some(t), _) => (t.client_x, t.client_y),
                (None, Phase::End) => last?,
                (None, _) => return None,
            };
            Some(PointerSample { x, y, phase })
        }
        RawInput::Key { .. } => None,
    }
}
