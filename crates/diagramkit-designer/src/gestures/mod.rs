//! Pointer gesture controllers.
//!
//! Each controller lives for one press-drag-release sequence. Drag, resize,
//! and rotate mutate entities through the item collection so attached
//! connections follow; the marquee resolves to a selection change.

mod drag;
mod marquee;
mod resize;
mod rotate;

pub use drag::DragGesture;
pub use marquee::{MarqueeGesture, MarqueeOutcome};
pub use resize::{HorizontalEdge, ResizeGesture, ResizeHandle, VerticalEdge};
pub use rotate::RotateGesture;

use diagramkit_core::GestureKind;

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        control: false,
        alt: false,
    };

    pub const CONTROL: Modifiers = Modifiers {
        shift: false,
        control: true,
        alt: false,
    };

    /// True if shift or control is held.
    pub fn extends_selection(&self) -> bool {
        self.shift || self.control
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// How a rubber-band result combines with the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Selection becomes exactly the hits.
    Replace,
    /// Each hit flips its selected state (Shift).
    Toggle,
    /// Hits are added to the selection (Control).
    Union,
}

impl SelectionMode {
    pub fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.shift {
            SelectionMode::Toggle
        } else if modifiers.control {
            SelectionMode::Union
        } else {
            SelectionMode::Replace
        }
    }
}

/// The gesture currently in progress on a canvas.
#[derive(Debug)]
pub enum ActiveGesture {
    Drag(DragGesture),
    Resize(ResizeGesture),
    Rotate(RotateGesture),
    Marquee(MarqueeGesture),
}

impl ActiveGesture {
    pub fn kind(&self) -> GestureKind {
        match self {
            ActiveGesture::Drag(_) => GestureKind::Drag,
            ActiveGesture::Resize(_) => GestureKind::Resize,
            ActiveGesture::Rotate(_) => GestureKind::Rotate,
            ActiveGesture::Marquee(_) => GestureKind::Marquee,
        }
    }
}
