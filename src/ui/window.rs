// The settings window. It is also the overlay's default owner, so it is a
// regular resizable top-level window.

use super::controls::*;
use super::painting;
use super::theme::*;

use crate::app;
use crate::hotkeys;
use crate::platform::{PlatformError, PlatformResult, WindowId};
use crate::win32::{hwnd, window_id};

use windows::core::PCWSTR;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{ReleaseCapture, SetCapture};
use windows::Win32::UI::WindowsAndMessaging::*;

const CLASS_NAME: &str = "DimScreenSettingsWnd\0";
const OWNER_CHECK_TIMER_ID: usize = 100;
const OWNER_CHECK_INTERVAL_MS: u32 = 1000;

/// Opacity step for the adjust hotkeys
const HOTKEY_STEP: f32 = 0.1;

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Create the settings window (initially hidden).
pub fn create_window() -> PlatformResult<WindowId> {
    let class_name = wide(CLASS_NAME);

    unsafe {
        let hinstance = GetModuleHandleW(PCWSTR::null())?;

        let wc = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            hInstance: hinstance.into(),
            lpszClassName: PCWSTR(class_name.as_ptr()),
            hbrBackground: CreateSolidBrush(CLR_BACKGROUND),
            hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
            hIcon: LoadIconW(None, IDI_APPLICATION).unwrap_or_default(),
            ..Default::default()
        };

        if RegisterClassW(&wc) == 0 {
            return Err(PlatformError::ClassRegistration(
                CLASS_NAME.trim_end_matches('\0'),
            ));
        }

        // Calculate window size to get desired client area
        let mut wr = RECT {
            left: 0,
            top: 0,
            right: WINDOW_WIDTH,
            bottom: WINDOW_HEIGHT,
        };
        let style = WS_OVERLAPPEDWINDOW;
        let _ = AdjustWindowRectEx(&mut wr, style, false, WINDOW_EX_STYLE::default());

        let title = wide("DimScreen");

        let hwnd = CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            PCWSTR(class_name.as_ptr()),
            PCWSTR(title.as_ptr()),
            style,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            wr.right - wr.left,
            wr.bottom - wr.top,
            None,
            None,
            Some(hinstance.into()),
            None,
        )?;

        SetTimer(Some(hwnd), OWNER_CHECK_TIMER_ID, OWNER_CHECK_INTERVAL_MS, None);
        Ok(window_id(hwnd))
    }
}

/// Show and focus the settings window
pub fn show_window(window: WindowId) {
    unsafe {
        let _ = ShowWindow(hwnd(window), SW_SHOW);
        let _ = SetForegroundWindow(hwnd(window));
    }
}

/// Trigger a repaint
fn invalidate(hwnd: HWND) {
    unsafe {
        let _ = InvalidateRect(Some(hwnd), None, true);
    }
}

fn pointer_pos(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam.0 & 0xFFFF) as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as i16 as i32;
    (x, y)
}

unsafe fn paint_buffered(hwnd: HWND) {
    let mut ps = PAINTSTRUCT::default();
    let hdc = BeginPaint(hwnd, &mut ps);

    // Double-buffer to avoid flicker
    let mut client = RECT::default();
    let _ = GetClientRect(hwnd, &mut client);

    let mem_dc = CreateCompatibleDC(Some(hdc));
    let mem_bmp = CreateCompatibleBitmap(hdc, client.right, client.bottom);
    let old_bmp = SelectObject(mem_dc, HGDIOBJ::from(mem_bmp));

    let painted = app::with(|app| painting::paint(mem_dc, &client, &mut app.ui)).is_some();
    if painted {
        let _ = BitBlt(
            hdc,
            0,
            0,
            client.right,
            client.bottom,
            Some(mem_dc),
            0,
            0,
            SRCCOPY,
        );
    }

    SelectObject(mem_dc, old_bmp);
    let _ = DeleteObject(HGDIOBJ::from(mem_bmp));
    let _ = DeleteDC(mem_dc);
    let _ = EndPaint(hwnd, &ps);

    if !painted {
        // App busy or not yet installed; try again on the next pass.
        invalidate(hwnd);
    }
}

fn on_button_down(hwnd: HWND, x: i32, y: i32) -> bool {
    app::with(|app| {
        if point_in_rect(x, y, &app.ui.slider.thumb_rect) {
            app.ui.slider.dragging = true;
            unsafe {
                SetCapture(hwnd);
            }
            app.ui.slider.value = app.ui.slider.value_from_x(x);
            app.preview_opacity(app.ui.slider.opacity());
            return true;
        }

        if point_in_rect(x, y, &app.ui.enabled_toggle.rect) {
            app.toggle_dimmer();
            return true;
        }

        false
    })
    .unwrap_or(false)
}

fn on_mouse_move(x: i32) -> bool {
    app::with(|app| {
        if !app.ui.slider.dragging {
            return false;
        }
        let value = app.ui.slider.value_from_x(x);
        if value != app.ui.slider.value {
            app.ui.slider.value = value;
            app.preview_opacity(app.ui.slider.opacity());
        }
        true
    })
    .unwrap_or(false)
}

fn on_button_up() -> bool {
    app::with(|app| {
        if !app.ui.slider.dragging {
            return false;
        }
        app.ui.slider.dragging = false;
        unsafe {
            let _ = ReleaseCapture();
        }
        app.commit_opacity(app.ui.slider.opacity());
        true
    })
    .unwrap_or(false)
}

fn on_hotkey(id: i32) {
    app::with(|app| match id {
        hotkeys::HOTKEY_TOGGLE => app.toggle_dimmer(),
        hotkeys::HOTKEY_INCREASE => app.adjust_opacity(HOTKEY_STEP),
        hotkeys::HOTKEY_DECREASE => app.adjust_opacity(-HOTKEY_STEP),
        hotkeys::HOTKEY_FOLLOW => {
            app.follow_foreground();
        }
        _ => {}
    });
}

/// Window procedure
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_PAINT => {
            paint_buffered(hwnd);
            LRESULT(0)
        }

        WM_LBUTTONDOWN => {
            let (x, y) = pointer_pos(lparam);
            if on_button_down(hwnd, x, y) {
                invalidate(hwnd);
                return LRESULT(0);
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        WM_MOUSEMOVE => {
            let (x, _) = pointer_pos(lparam);
            if on_mouse_move(x) {
                invalidate(hwnd);
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        WM_LBUTTONUP => {
            if on_button_up() {
                invalidate(hwnd);
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        WM_HOTKEY => {
            on_hotkey(wparam.0 as i32);
            invalidate(hwnd);
            LRESULT(0)
        }

        WM_TIMER => {
            if wparam.0 == OWNER_CHECK_TIMER_ID && app::with(|app| app.check_owner()) == Some(true)
            {
                invalidate(hwnd);
            }
            LRESULT(0)
        }

        WM_CLOSE => {
            let _ = KillTimer(Some(hwnd), OWNER_CHECK_TIMER_ID);
            hotkeys::unregister_all(hwnd);
            // Tear the overlay down while its owner still exists.
            if let Some(app) = app::take() {
                app.shutdown();
            }
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }

        WM_DESTROY => {
            PostQuitMessage(0);
            LRESULT(0)
        }

        WM_ERASEBKGND => {
            // Handled in WM_PAINT with double buffering
            LRESULT(1)
        }

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}
