// Win32 implementation of the window platform, built on windows-rs.

pub mod events;
pub mod overlay;

use windows::Win32::Foundation::{HWND, POINT, RECT};
use windows::Win32::Graphics::Gdi::{ClientToScreen, InvalidateRect};
use windows::Win32::UI::WindowsAndMessaging::{
    GetAncestor, GetClientRect, GetForegroundWindow, GetParent, GetWindowLongW, GetWindowTextW,
    IsWindow, SetWindowLongPtrW, SetWindowPos, GA_ROOT, GWLP_HWNDPARENT, GWL_EXSTYLE,
    HWND_NOTOPMOST, HWND_TOPMOST, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER,
    WS_EX_MDICHILD, WS_EX_TOPMOST,
};

use crate::platform::{
    Container, PlatformError, PlatformResult, Rect, WindowEvent, WindowId, WindowPlatform,
};

pub use events::{take_pending, WM_PLATFORM_EVENTS};

pub(crate) fn hwnd(id: WindowId) -> HWND {
    HWND(id.0 as *mut std::ffi::c_void)
}

pub(crate) fn window_id(hwnd: HWND) -> WindowId {
    WindowId(hwnd.0 as isize)
}

/// The window that currently has the user's focus, if any.
pub fn foreground_window() -> Option<WindowId> {
    let hwnd = unsafe { GetForegroundWindow() };
    if hwnd.is_invalid() {
        None
    } else {
        Some(window_id(hwnd))
    }
}

pub fn is_live(window: WindowId) -> bool {
    live(window).is_ok()
}

/// Caption text of a window, empty when it has none.
pub fn window_title(window: WindowId) -> String {
    let mut buf = [0u16; 256];
    let len = unsafe { GetWindowTextW(hwnd(window), &mut buf) };
    String::from_utf16_lossy(&buf[..len.max(0) as usize])
}

fn ex_style(hwnd: HWND) -> u32 {
    unsafe { GetWindowLongW(hwnd, GWL_EXSTYLE) as u32 }
}

fn live(window: WindowId) -> PlatformResult<HWND> {
    let hwnd = hwnd(window);
    if unsafe { IsWindow(Some(hwnd)).as_bool() } {
        Ok(hwnd)
    } else {
        Err(PlatformError::InvalidWindow(window))
    }
}

/// Window platform backed by user32. All calls must come from the UI thread
/// that pumps messages for the overlay.
pub struct Win32Platform;

impl Win32Platform {
    pub fn new(dim_color: [u8; 3]) -> Self {
        overlay::set_dim_color(dim_color);
        Self
    }
}

impl WindowPlatform for Win32Platform {
    fn create_overlay(&mut self, initial: Rect) -> PlatformResult<WindowId> {
        overlay::create(initial)
    }

    fn destroy_overlay(&mut self, overlay: WindowId) {
        overlay::destroy(overlay);
    }

    fn set_owner(&mut self, overlay: WindowId, owner: WindowId) -> PlatformResult<()> {
        let overlay = live(overlay)?;
        live(owner)?;
        unsafe {
            SetWindowLongPtrW(overlay, GWLP_HWNDPARENT, owner.0);
        }
        Ok(())
    }

    fn set_bounds(&mut self, window: WindowId, bounds: Rect) -> PlatformResult<()> {
        let hwnd = live(window)?;
        unsafe {
            SetWindowPos(
                hwnd,
                None,
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height,
                SWP_NOZORDER | SWP_NOACTIVATE,
            )?;
        }
        Ok(())
    }

    fn client_rect(&self, window: WindowId) -> PlatformResult<Rect> {
        let hwnd = live(window)?;
        let mut rc = RECT::default();
        unsafe {
            GetClientRect(hwnd, &mut rc)?;
        }
        Ok(Rect::new(
            rc.left,
            rc.top,
            rc.right - rc.left,
            rc.bottom - rc.top,
        ))
    }

    fn client_to_screen(&self, window: WindowId, rect: Rect) -> PlatformResult<Rect> {
        let hwnd = live(window)?;
        let mut origin = POINT {
            x: rect.x,
            y: rect.y,
        };
        if unsafe { !ClientToScreen(hwnd, &mut origin).as_bool() } {
            return Err(PlatformError::InvalidWindow(window));
        }
        Ok(Rect::new(origin.x, origin.y, rect.width, rect.height))
    }

    fn is_topmost(&self, window: WindowId) -> bool {
        live(window).is_ok_and(|hwnd| ex_style(hwnd) & WS_EX_TOPMOST.0 != 0)
    }

    fn make_topmost(&mut self, window: WindowId) -> PlatformResult<()> {
        let hwnd = live(window)?;
        unsafe {
            SetWindowPos(
                hwnd,
                Some(HWND_TOPMOST),
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
            )?;
        }
        Ok(())
    }

    fn clear_topmost(&mut self, window: WindowId) -> PlatformResult<()> {
        let hwnd = live(window)?;
        unsafe {
            SetWindowPos(
                hwnd,
                Some(HWND_NOTOPMOST),
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
            )?;
        }
        Ok(())
    }

    /// MDI children live inside an MDIClient, which in turn lives in the frame.
    fn container_of(&self, window: WindowId) -> Option<Container> {
        let hwnd = live(window).ok()?;
        if ex_style(hwnd) & WS_EX_MDICHILD.0 == 0 {
            return None;
        }
        unsafe {
            let client = GetParent(hwnd).ok().filter(|h| !h.is_invalid());
            let frame = GetAncestor(hwnd, GA_ROOT);
            if frame.is_invalid() || frame == hwnd {
                return None;
            }
            Some(Container {
                frame: window_id(frame),
                client: client.map(window_id),
            })
        }
    }

    fn subscribe(&mut self, window: WindowId, event: WindowEvent) -> PlatformResult<()> {
        events::subscribe(window, event)
    }

    fn unsubscribe(&mut self, window: WindowId, event: WindowEvent) {
        events::unsubscribe(window, event);
    }

    fn set_opacity(&mut self, window: WindowId, opacity: f32) -> PlatformResult<()> {
        overlay::set_alpha(window, opacity)
    }

    fn invalidate(&mut self, window: WindowId) {
        unsafe {
            let _ = InvalidateRect(Some(hwnd(window)), None, true);
        }
    }
}
