//! Rendering boundary for the window manager.
//!
//! The manager owns all window state and reports every visible change as a
//! [`SurfaceEvent`]. A front end implements [`WindowSurface`] to draw them.

use std::sync::{Arc, Mutex, PoisonError};

use super::geometry::Rect;

/// One visible change to the desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Created { id: String, title: String, bounds: Rect, z_index: u64 },
    Raised { id: String, z_index: u64 },
    Hidden { id: String },
    Shown { id: String },
    Bounds { id: String, bounds: Rect, fullscreen: bool },
    TaskbarAdded { id: String, title: String, icon: Option<String> },
    TaskbarRemoved { id: String },
    Closed { id: String },
}

/// Something that draws windows.
pub trait WindowSurface: Send {
    fn apply(&mut self, event: &SurfaceEvent);
}

/// Draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl WindowSurface for NullSurface {
    fn apply(&mut self, _event: &SurfaceEvent) {}
}

/// Logs every event at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSurface;

impl WindowSurface for TracingSurface {
    fn apply(&mut self, event: &SurfaceEvent) {
        tracing::debug!(?event, "window surface");
    }
}

/// Keeps every event, for tests and headless front ends.
///
/// Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl WindowSurface for RecordingSurface {
    fn apply(&mut self, event: &SurfaceEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
