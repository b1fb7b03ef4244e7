//! Window registry: z-order, taskbar entries and fullscreen state.
//!
//! The manager is pure state. Every change is mirrored to a
//! [`WindowSurface`] so a front end can draw it, and tests can drive the
//! state machine without any UI.
//!
//! Operations on an unknown window id are no-ops; they return `false` or
//! `None` and log at debug level.

mod geometry;
mod surface;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use geometry::{
    resize_rect, Dimension, DimensionError, Rect, ResizeEdge, Viewport, MIN_WINDOW_SIZE,
};
pub use surface::{NullSurface, RecordingSurface, SurfaceEvent, TracingSurface, WindowSurface};

/// First z-index handed out.
pub const BASE_Z_INDEX: u64 = 1000;

/// One open window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub id: String,
    pub title: String,
    pub bounds: Rect,
    pub z_index: u64,
    pub taskbar_entry_id: String,
    pub is_fullscreen: bool,
    /// Bounds to restore when leaving fullscreen.
    pub prior_bounds: Option<Rect>,
    pub minimized: bool,
}

/// A window's handle on the taskbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub id: String,
    pub window_id: String,
    pub title: String,
    pub icon: Option<String>,
    /// False while the window is minimized.
    pub active: bool,
}

/// Returned by [`WindowManager::create_window`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowHandle {
    id: String,
}

impl WindowHandle {
    pub fn id(&self) -> &str {
        &self.id
    }
}

fn taskbar_id(window_id: &str) -> String {
    format!("taskbar-{window_id}")
}

/// In-memory registry of windows and taskbar entries.
pub struct WindowManager {
    windows: Vec<Window>,
    taskbar: Vec<TaskbarEntry>,
    next_z: u64,
    viewport: Viewport,
    surface: Box<dyn WindowSurface>,
}

impl std::fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager")
            .field("windows", &self.windows.len())
            .field("taskbar", &self.taskbar.len())
            .field("next_z", &self.next_z)
            .field("viewport", &self.viewport)
            .finish()
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl WindowManager {
    /// A manager that draws nothing.
    pub fn new(viewport: Viewport) -> Self {
        Self::with_surface(viewport, NullSurface)
    }

    pub fn with_surface(viewport: Viewport, surface: impl WindowSurface + 'static) -> Self {
        Self {
            windows: Vec::new(),
            taskbar: Vec::new(),
            next_z: BASE_Z_INDEX,
            viewport,
            surface: Box::new(surface),
        }
    }

    fn take_z(&mut self) -> u64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Window> {
        let found = self.windows.iter_mut().find(|w| w.id == id);
        if found.is_none() {
            tracing::debug!(window = id, "no such window");
        }
        found
    }

    /// Open a window centered in the viewport at the next z-index.
    ///
    /// If `id` is already open, that window is brought to front instead.
    pub fn create_window(
        &mut self,
        id: &str,
        title: &str,
        width: Dimension,
        height: Dimension,
    ) -> WindowHandle {
        if self.contains(id) {
            self.bring_to_front(id);
            return WindowHandle { id: id.to_string() };
        }

        let w = width.to_px(self.viewport);
        let h = height.to_px(self.viewport);
        let window = Window {
            id: id.to_string(),
            title: title.to_string(),
            bounds: Rect::centered(w, h, self.viewport),
            z_index: self.take_z(),
            taskbar_entry_id: taskbar_id(id),
            is_fullscreen: false,
            prior_bounds: None,
            minimized: false,
        };
        tracing::debug!(window = id, z = window.z_index, "window created");
        self.surface.apply(&SurfaceEvent::Created {
            id: window.id.clone(),
            title: window.title.clone(),
            bounds: window.bounds,
            z_index: window.z_index,
        });
        self.windows.push(window);
        WindowHandle { id: id.to_string() }
    }

    /// Add a taskbar entry. No-op if one exists for `window_id`.
    pub fn add_to_taskbar(&mut self, window_id: &str, title: &str, icon: Option<&str>) {
        if self.taskbar.iter().any(|e| e.window_id == window_id) {
            return;
        }
        let entry = TaskbarEntry {
            id: taskbar_id(window_id),
            window_id: window_id.to_string(),
            title: title.to_string(),
            icon: icon.map(str::to_string),
            active: true,
        };
        self.surface.apply(&SurfaceEvent::TaskbarAdded {
            id: entry.id.clone(),
            title: entry.title.clone(),
            icon: entry.icon.clone(),
        });
        self.taskbar.push(entry);
    }

    /// Remove the taskbar entry and the window record. Idempotent.
    pub fn remove_from_taskbar(&mut self, window_id: &str) {
        let entry_id = taskbar_id(window_id);
        if let Some(pos) = self.taskbar.iter().position(|e| e.window_id == window_id) {
            self.taskbar.remove(pos);
            self.surface
                .apply(&SurfaceEvent::TaskbarRemoved { id: entry_id });
        }
        if let Some(pos) = self.windows.iter().position(|w| w.id == window_id) {
            self.windows.remove(pos);
            tracing::debug!(window = window_id, "window closed");
            self.surface.apply(&SurfaceEvent::Closed {
                id: window_id.to_string(),
            });
        }
    }

    /// Close a window: its surface, taskbar entry and record all go away.
    pub fn close_window(&mut self, window_id: &str) {
        self.remove_from_taskbar(window_id);
    }

    /// Give the window a z-index above every one handed out so far.
    pub fn bring_to_front(&mut self, id: &str) -> Option<u64> {
        let z = self.next_z;
        let window = self.find_mut(id)?;
        window.z_index = z;
        self.next_z += 1;
        self.surface.apply(&SurfaceEvent::Raised {
            id: id.to_string(),
            z_index: z,
        });
        Some(z)
    }

    /// Hide the window and mark its taskbar entry inactive. z-order is kept.
    pub fn minimize_window(&mut self, id: &str) -> bool {
        let Some(window) = self.find_mut(id) else {
            return false;
        };
        window.minimized = true;
        self.set_entry_active(id, false);
        self.surface.apply(&SurfaceEvent::Hidden { id: id.to_string() });
        true
    }

    /// Taskbar click: show a minimized window, otherwise bring it to front.
    pub fn activate_from_taskbar(&mut self, id: &str) -> bool {
        let Some(window) = self.find_mut(id) else {
            return false;
        };
        if window.minimized {
            window.minimized = false;
            self.set_entry_active(id, true);
            self.surface.apply(&SurfaceEvent::Shown { id: id.to_string() });
        } else {
            self.bring_to_front(id);
        }
        true
    }

    fn set_entry_active(&mut self, window_id: &str, active: bool) {
        if let Some(entry) = self.taskbar.iter_mut().find(|e| e.window_id == window_id) {
            entry.active = active;
        }
    }

    /// Flip between normal and fullscreen.
    ///
    /// Entering snapshots the current bounds and covers the viewport; leaving
    /// restores the snapshot exactly. Returns the new fullscreen state.
    pub fn toggle_fullscreen(&mut self, id: &str) -> Option<bool> {
        let full = self.viewport.full();
        let window = self.find_mut(id)?;
        if window.is_fullscreen {
            if let Some(prior) = window.prior_bounds.take() {
                window.bounds = prior;
            }
            window.is_fullscreen = false;
        } else {
            window.prior_bounds = Some(window.bounds);
            window.bounds = full;
            window.is_fullscreen = true;
        }
        let event = SurfaceEvent::Bounds {
            id: id.to_string(),
            bounds: window.bounds,
            fullscreen: window.is_fullscreen,
        };
        let state = window.is_fullscreen;
        tracing::debug!(window = id, fullscreen = state, "fullscreen toggled");
        self.surface.apply(&event);
        Some(state)
    }

    /// Move the top-left corner to `(x, y)`.
    pub fn move_window(&mut self, id: &str, x: i32, y: i32) -> bool {
        let Some(window) = self.find_mut(id) else {
            return false;
        };
        window.bounds.x = x;
        window.bounds.y = y;
        let event = SurfaceEvent::Bounds {
            id: id.to_string(),
            bounds: window.bounds,
            fullscreen: window.is_fullscreen,
        };
        self.surface.apply(&event);
        true
    }

    /// Drag `edge` by `(dx, dy)`. See [`resize_rect`].
    pub fn resize_window(&mut self, id: &str, edge: ResizeEdge, dx: i32, dy: i32) -> Option<Rect> {
        let window = self.find_mut(id)?;
        window.bounds = resize_rect(window.bounds, edge, dx, dy);
        let event = SurfaceEvent::Bounds {
            id: id.to_string(),
            bounds: window.bounds,
            fullscreen: window.is_fullscreen,
        };
        let bounds = window.bounds;
        self.surface.apply(&event);
        Some(bounds)
    }

    /// Property sheet lines for a window.
    pub fn properties(&self, id: &str) -> Option<Vec<String>> {
        let window = self.window(id)?;
        Some(vec![
            format!("Window ID: {}", window.id),
            format!("Title: {}", window.title),
            format!("Width: {}px", window.bounds.w),
            format!("Height: {}px", window.bounds.h),
            format!("Left: {}px", window.bounds.x),
            format!("Top: {}px", window.bounds.y),
            format!("Z-Index: {}", window.z_index),
            format!(
                "Fullscreen: {}",
                if window.is_fullscreen { "Yes" } else { "No" }
            ),
        ])
    }

    /// Open the `<id>-props` window showing [`properties`](Self::properties).
    ///
    /// Returns the new handle and the lines to display in it.
    pub fn open_properties(&mut self, id: &str) -> Option<(WindowHandle, Vec<String>)> {
        let lines = self.properties(id)?;
        let title = format!("Properties: {}", self.window(id)?.title);
        let handle = self.create_window(
            &format!("{id}-props"),
            &title,
            Dimension::Vw(40.0),
            Dimension::Vh(40.0),
        );
        Some((handle, lines))
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn window(&self, id: &str) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.window(id).is_some()
    }

    /// Open windows in creation order.
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn taskbar(&self) -> &[TaskbarEntry] {
        &self.taskbar
    }

    /// The visible window with the highest z-index.
    pub fn top_window(&self) -> Option<&Window> {
        self.windows
            .iter()
            .filter(|w| !w.minimized)
            .max_by_key(|w| w.z_index)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// A [`WindowManager`] shared by every app shell.
#[derive(Debug, Clone)]
pub struct SharedWindows(Arc<Mutex<WindowManager>>);

impl SharedWindows {
    pub fn new(manager: WindowManager) -> Self {
        Self(Arc::new(Mutex::new(manager)))
    }

    pub fn lock(&self) -> MutexGuard<'_, WindowManager> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> WindowManager {
        WindowManager::new(Viewport::new(1000, 800))
    }

    #[test]
    fn create_centers_with_default_size() {
        let mut wm = manager();
        let handle =
            wm.create_window("explorer", "Files", Dimension::DEFAULT_WIDTH, Dimension::DEFAULT_HEIGHT);
        let window = wm.window(handle.id()).unwrap();
        assert_eq!(window.bounds, Rect::new(100, 80, 800, 640));
        assert_eq!(window.z_index, BASE_Z_INDEX);
        assert_eq!(window.taskbar_entry_id, "taskbar-explorer");
    }

    #[test]
    fn create_existing_id_focuses_it() {
        let mut wm = manager();
        wm.create_window("a", "A", Dimension::Px(400.0), Dimension::Px(400.0));
        wm.create_window("b", "B", Dimension::Px(400.0), Dimension::Px(400.0));
        wm.create_window("a", "A again", Dimension::Px(900.0), Dimension::Px(900.0));

        assert_eq!(wm.len(), 2);
        let a = wm.window("a").unwrap();
        assert_eq!(a.title, "A");
        assert_eq!(wm.top_window().map(|w| w.id.as_str()), Some("a"));
    }

    #[test]
    fn taskbar_add_is_idempotent() {
        let mut wm = manager();
        wm.create_window("t", "Terminal", Dimension::Px(700.0), Dimension::Px(500.0));
        wm.add_to_taskbar("t", "Terminal", Some("/icon.png"));
        wm.add_to_taskbar("t", "Other", None);
        assert_eq!(wm.taskbar().len(), 1);
        assert_eq!(wm.taskbar()[0].title, "Terminal");
    }

    #[test]
    fn remove_from_taskbar_drops_record_and_is_idempotent() {
        let mut wm = manager();
        wm.create_window("t", "Terminal", Dimension::Px(700.0), Dimension::Px(500.0));
        wm.add_to_taskbar("t", "Terminal", None);
        wm.remove_from_taskbar("t");
        wm.remove_from_taskbar("t");
        assert!(wm.is_empty());
        assert!(wm.taskbar().is_empty());
    }

    #[test]
    fn minimize_keeps_entry_and_z() {
        let mut wm = manager();
        wm.create_window("t", "T", Dimension::Px(700.0), Dimension::Px(500.0));
        wm.add_to_taskbar("t", "T", None);
        let z = wm.window("t").unwrap().z_index;

        assert!(wm.minimize_window("t"));
        let window = wm.window("t").unwrap();
        assert!(window.minimized);
        assert_eq!(window.z_index, z);
        assert!(!wm.taskbar()[0].active);

        assert!(wm.activate_from_taskbar("t"));
        assert!(!wm.window("t").unwrap().minimized);
        assert!(wm.taskbar()[0].active);
        assert_eq!(wm.window("t").unwrap().z_index, z);

        wm.activate_from_taskbar("t");
        assert!(wm.window("t").unwrap().z_index > z);
    }

    #[test]
    fn fullscreen_restores_exact_bounds() {
        let mut wm = manager();
        wm.create_window("t", "T", Dimension::Px(700.0), Dimension::Px(500.0));
        wm.move_window("t", 13, 27);
        let before = wm.window("t").unwrap().bounds;

        assert_eq!(wm.toggle_fullscreen("t"), Some(true));
        assert_eq!(wm.window("t").unwrap().bounds, Rect::new(0, 0, 1000, 800));
        assert_eq!(wm.toggle_fullscreen("t"), Some(false));

        let window = wm.window("t").unwrap();
        assert_eq!(window.bounds, before);
        assert_eq!(window.prior_bounds, None);
    }

    #[test]
    fn missing_window_is_a_noop() {
        let mut wm = manager();
        assert_eq!(wm.bring_to_front("ghost"), None);
        assert!(!wm.minimize_window("ghost"));
        assert_eq!(wm.toggle_fullscreen("ghost"), None);
        assert_eq!(wm.resize_window("ghost", ResizeEdge::East, 10, 0), None);
        assert!(wm.properties("ghost").is_none());
        wm.close_window("ghost");
    }

    #[test]
    fn properties_sheet() {
        let mut wm = manager();
        wm.create_window("t", "Terminal", Dimension::Px(700.0), Dimension::Px(500.0));
        let (handle, lines) = wm.open_properties("t").unwrap();
        assert_eq!(handle.id(), "t-props");
        assert_eq!(
            lines,
            vec![
                "Window ID: t",
                "Title: Terminal",
                "Width: 700px",
                "Height: 500px",
                "Left: 150px",
                "Top: 150px",
                "Z-Index: 1000",
                "Fullscreen: No",
            ]
        );
        assert_eq!(wm.window("t-props").unwrap().title, "Properties: Terminal");
    }

    #[test]
    fn surface_sees_lifecycle() {
        let surface = RecordingSurface::new();
        let mut wm = WindowManager::with_surface(Viewport::new(1000, 800), surface.clone());
        wm.create_window("t", "T", Dimension::Px(400.0), Dimension::Px(400.0));
        wm.minimize_window("t");
        wm.close_window("t");

        let events = surface.events();
        assert!(matches!(events[0], SurfaceEvent::Created { .. }));
        assert_eq!(events[1], SurfaceEvent::Hidden { id: "t".into() });
        assert_eq!(events[2], SurfaceEvent::Closed { id: "t".into() });
    }
}
