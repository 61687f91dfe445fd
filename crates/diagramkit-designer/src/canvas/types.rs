//! Canvas helper types.

/// Work the canvas defers until [`super::DesignerCanvas::run_pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanvasTask {
    /// Recompute extent and viewport size.
    Measure,
    /// Bring rendered containers in line with the viewport.
    RefreshViewport,
}

/// Discrete scroll commands, as issued by scroll bars, keys, and the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollCommand {
    LineUp,
    LineDown,
    LineLeft,
    LineRight,
    PageUp,
    PageDown,
    PageLeft,
    PageRight,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
}

/// Counts from one processed viewport refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshStats {
    pub shown: usize,
    pub hidden: usize,
}
