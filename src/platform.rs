// Narrow window-system capability interface used by the overlay tracker.
//
// The tracker never touches native handles directly: everything it needs from
// the windowing layer goes through `WindowPlatform`. The Win32 implementation
// lives in `crate::win32`; tests drive the tracker through a recording fake.

use thiserror::Error;

/// Ownership-free identifier of a native window (the raw handle value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub isize);

/// Integer rectangle, origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same size, origin moved to (0,0).
    pub fn at_origin(self) -> Self {
        Self {
            x: 0,
            y: 0,
            ..self
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Notifications the tracker subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEvent {
    LocationChanged,
    SizeChanged,
    ResizeBegin,
    ResizeEnd,
    /// Inner client area of a multi-document container changed size.
    ClientSizeChanged,
}

/// The four geometry notifications watched on owners and container frames.
pub const FRAME_EVENTS: [WindowEvent; 4] = [
    WindowEvent::LocationChanged,
    WindowEvent::SizeChanged,
    WindowEvent::ResizeBegin,
    WindowEvent::ResizeEnd,
];

/// Screen rectangle of a whole window plus the size of its client area, as
/// last observed by a platform event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub window: Rect,
    pub client: Rect,
}

impl Geometry {
    /// Events implied by moving from `self` to `next`, in delivery order:
    /// location first, then frame size, then client size.
    pub fn changes_to(&self, next: &Geometry) -> Vec<WindowEvent> {
        let mut events = Vec::new();
        if (next.window.x, next.window.y) != (self.window.x, self.window.y) {
            events.push(WindowEvent::LocationChanged);
        }
        if (next.window.width, next.window.height) != (self.window.width, self.window.height) {
            events.push(WindowEvent::SizeChanged);
        }
        if (next.client.width, next.client.height) != (self.client.width, self.client.height) {
            events.push(WindowEvent::ClientSizeChanged);
        }
        events
    }
}

/// Multi-document parent of an owner window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container {
    pub frame: WindowId,
    /// Client area hosting the document windows, if one could be found.
    pub client: Option<WindowId>,
}

#[derive(Error, Debug)]
pub enum PlatformError {
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    #[error("window {0:?} is not a live window")]
    InvalidWindow(WindowId),

    #[error("failed to register window class {0}")]
    ClassRegistration(&'static str),

    #[error("failed to install event hook for window {0:?}")]
    HookFailed(WindowId),
}

pub type PlatformResult<T> = Result<T, PlatformError>;

/// Primitive window operations the overlay tracker relies on.
///
/// Implementations must create overlays that are borderless, never take
/// activation, and report themselves transparent to hit-testing, so that all
/// input reaches the window underneath.
pub trait WindowPlatform {
    /// Create the overlay window, already OS-visible (shown without
    /// activation) at `initial` screen bounds.
    fn create_overlay(&mut self, initial: Rect) -> PlatformResult<WindowId>;

    fn destroy_overlay(&mut self, overlay: WindowId);

    /// Make `owner` the z-order owner of the overlay so it stays above it.
    fn set_owner(&mut self, overlay: WindowId, owner: WindowId) -> PlatformResult<()>;

    /// Move and resize a window to the given screen rectangle.
    fn set_bounds(&mut self, window: WindowId, bounds: Rect) -> PlatformResult<()>;

    /// Client rectangle in client coordinates.
    fn client_rect(&self, window: WindowId) -> PlatformResult<Rect>;

    /// Map a rectangle from a window's client coordinates to screen coordinates.
    fn client_to_screen(&self, window: WindowId, rect: Rect) -> PlatformResult<Rect>;

    fn is_topmost(&self, window: WindowId) -> bool;

    /// Put a window in the topmost z-band without activating it.
    fn make_topmost(&mut self, window: WindowId) -> PlatformResult<()>;

    /// Take a window back out of the topmost z-band without activating it.
    fn clear_topmost(&mut self, window: WindowId) -> PlatformResult<()>;

    fn container_of(&self, window: WindowId) -> Option<Container>;

    fn subscribe(&mut self, window: WindowId, event: WindowEvent) -> PlatformResult<()>;

    fn unsubscribe(&mut self, window: WindowId, event: WindowEvent);

    /// Whole-window alpha, 0.0 (invisible) to 1.0 (opaque).
    fn set_opacity(&mut self, window: WindowId, opacity: f32) -> PlatformResult<()>;

    fn invalidate(&mut self, window: WindowId);
}

impl<P: WindowPlatform + ?Sized> WindowPlatform for &mut P {
    fn create_overlay(&mut self, initial: Rect) -> PlatformResult<WindowId> {
        (**self).create_overlay(initial)
    }

    fn destroy_overlay(&mut self, overlay: WindowId) {
        (**self).destroy_overlay(overlay)
    }

    fn set_owner(&mut self, overlay: WindowId, owner: WindowId) -> PlatformResult<()> {
        (**self).set_owner(overlay, owner)
    }

    fn set_bounds(&mut self, window: WindowId, bounds: Rect) -> PlatformResult<()> {
        (**self).set_bounds(window, bounds)
    }

    fn client_rect(&self, window: WindowId) -> PlatformResult<Rect> {
        (**self).client_rect(window)
    }

    fn client_to_screen(&self, window: WindowId, rect: Rect) -> PlatformResult<Rect> {
        (**self).client_to_screen(window, rect)
    }

    fn is_topmost(&self, window: WindowId) -> bool {
        (**self).is_topmost(window)
    }

    fn make_topmost(&mut self, window: WindowId) -> PlatformResult<()> {
        (**self).make_topmost(window)
    }

    fn clear_topmost(&mut self, window: WindowId) -> PlatformResult<()> {
        (**self).clear_topmost(window)
    }

    fn container_of(&self, window: WindowId) -> Option<Container> {
        (**self).container_of(window)
    }

    fn subscribe(&mut self, window: WindowId, event: WindowEvent) -> PlatformResult<()> {
        (**self).subscribe(window, event)
    }

    fn unsubscribe(&mut self, window: WindowId, event: WindowEvent) {
        (**self).unsubscribe(window, event)
    }

    fn set_opacity(&mut self, window: WindowId, opacity: f32) -> PlatformResult<()> {
        (**self).set_opacity(window, opacity)
    }

    fn invalidate(&mut self, window: WindowId) {
        (**self).invalidate(window)
    }
}

#[cfg(test)]
pub mod fake {
    //! Recording in-memory platform used by the tracker tests.

    use super::*;
    use std::collections::{HashMap, HashSet};

    #[derive(Debug, Default, Clone)]
    pub struct FakeWindow {
        /// Client size; the client origin is always (0,0).
        pub client: Rect,
        /// Screen position of the client origin.
        pub client_origin: (i32, i32),
        pub topmost: bool,
        pub container: Option<Container>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        SetOwner(WindowId, WindowId),
        SetBounds(WindowId, Rect),
        MakeTopmost(WindowId),
        ClearTopmost(WindowId),
        SetOpacity(WindowId, f32),
        Invalidate(WindowId),
    }

    #[derive(Debug, Default)]
    pub struct FakePlatform {
        pub windows: HashMap<WindowId, FakeWindow>,
        pub subscriptions: HashSet<(WindowId, WindowEvent)>,
        pub bounds: HashMap<WindowId, Rect>,
        pub opacity: HashMap<WindowId, f32>,
        pub calls: Vec<Call>,
        pub destroyed: Vec<WindowId>,
        pub fail_client_rect: bool,
        next_id: isize,
    }

    impl FakePlatform {
        pub fn new() -> Self {
            Self {
                next_id: 1000,
                ..Default::default()
            }
        }

        pub fn add_window(&mut self, id: isize, window: FakeWindow) -> WindowId {
            let id = WindowId(id);
            self.windows.insert(id, window);
            id
        }

        pub fn window_mut(&mut self, id: WindowId) -> &mut FakeWindow {
            self.windows.get_mut(&id).expect("unknown fake window")
        }

        pub fn subscriptions_of(&self, window: WindowId) -> usize {
            self.subscriptions
                .iter()
                .filter(|(w, _)| *w == window)
                .count()
        }

        pub fn is_subscribed(&self, window: WindowId, event: WindowEvent) -> bool {
            self.subscriptions.contains(&(window, event))
        }
    }

    impl WindowPlatform for FakePlatform {
        fn create_overlay(&mut self, initial: Rect) -> PlatformResult<WindowId> {
            let id = WindowId(self.next_id);
            self.next_id += 1;
            self.windows.insert(id, FakeWindow::default());
            self.bounds.insert(id, initial);
            Ok(id)
        }

        fn destroy_overlay(&mut self, overlay: WindowId) {
            self.windows.remove(&overlay);
            self.destroyed.push(overlay);
        }

        fn set_owner(&mut self, overlay: WindowId, owner: WindowId) -> PlatformResult<()> {
            self.calls.push(Call::SetOwner(overlay, owner));
            Ok(())
        }

        fn set_bounds(&mut self, window: WindowId, bounds: Rect) -> PlatformResult<()> {
            self.calls.push(Call::SetBounds(window, bounds));
            self.bounds.insert(window, bounds);
            Ok(())
        }

        fn client_rect(&self, window: WindowId) -> PlatformResult<Rect> {
            if self.fail_client_rect {
                return Err(PlatformError::InvalidWindow(window));
            }
            self.windows
                .get(&window)
                .map(|w| w.client)
                .ok_or(PlatformError::InvalidWindow(window))
        }

        fn client_to_screen(&self, window: WindowId, rect: Rect) -> PlatformResult<Rect> {
            let w = self
                .windows
                .get(&window)
                .ok_or(PlatformError::InvalidWindow(window))?;
            Ok(Rect::new(
                rect.x + w.client_origin.0,
                rect.y + w.client_origin.1,
                rect.width,
                rect.height,
            ))
        }

        fn is_topmost(&self, window: WindowId) -> bool {
            self.windows.get(&window).is_some_and(|w| w.topmost)
        }

        fn make_topmost(&mut self, window: WindowId) -> PlatformResult<()> {
            self.calls.push(Call::MakeTopmost(window));
            if let Some(w) = self.windows.get_mut(&window) {
                w.topmost = true;
            }
            Ok(())
        }

        fn clear_topmost(&mut self, window: WindowId) -> PlatformResult<()> {
            self.calls.push(Call::ClearTopmost(window));
            if let Some(w) = self.windows.get_mut(&window) {
                w.topmost = false;
            }
            Ok(())
        }

        fn container_of(&self, window: WindowId) -> Option<Container> {
            self.windows.get(&window).and_then(|w| w.container)
        }

        fn subscribe(&mut self, window: WindowId, event: WindowEvent) -> PlatformResult<()> {
            self.subscriptions.insert((window, event));
            Ok(())
        }

        fn unsubscribe(&mut self, window: WindowId, event: WindowEvent) {
            self.subscriptions.remove(&(window, event));
        }

        fn set_opacity(&mut self, window: WindowId, opacity: f32) -> PlatformResult<()> {
            self.calls.push(Call::SetOpacity(window, opacity));
            self.opacity.insert(window, opacity);
            Ok(())
        }

        fn invalidate(&mut self, window: WindowId) {
            self.calls.push(Call::Invalidate(window));
        }
    }
}
