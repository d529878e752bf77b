// The dimming overlay window: layered, click-through, never activated.
//
// Created OS-visible with SW_SHOWNA and never hidden through ShowWindow; the
// tracker parks it off-screen instead.

use std::sync::Mutex;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreateSolidBrush, DeleteObject, EndPaint, FillRect, HGDIOBJ, PAINTSTRUCT,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GetClientRect, IsWindow, RegisterClassW,
    SetLayeredWindowAttributes, ShowWindow, CS_HREDRAW, CS_VREDRAW, LWA_ALPHA, SW_SHOWNA,
    WM_ERASEBKGND, WM_NCHITTEST, WM_PAINT, WNDCLASSW, WS_DISABLED, WS_EX_LAYERED,
    WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TRANSPARENT, WS_POPUP,
};

use super::hwnd;
use crate::platform::{PlatformError, PlatformResult, Rect, WindowId};

const CLASS_NAME: &str = "DimScreenOverlay\0";

/// Hit-test answer that passes the pointer to the window underneath.
const HTTRANSPARENT: isize = -1;

static CLASS_REGISTERED: Mutex<bool> = Mutex::new(false);

/// Fill colour as a COLORREF value (0x00BBGGRR).
static DIM_COLOR: Mutex<u32> = Mutex::new(0);

pub fn set_dim_color(rgb: [u8; 3]) {
    let [r, g, b] = rgb;
    if let Ok(mut color) = DIM_COLOR.lock() {
        *color = u32::from(r) | (u32::from(g) << 8) | (u32::from(b) << 16);
    }
}

fn dim_color() -> COLORREF {
    COLORREF(DIM_COLOR.lock().map(|c| *c).unwrap_or(0))
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        // Every pointer interaction falls through to the owner.
        WM_NCHITTEST => LRESULT(HTTRANSPARENT),

        WM_PAINT => {
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut ps);
            if !hdc.is_invalid() {
                let mut client = RECT::default();
                let _ = GetClientRect(hwnd, &mut client);
                let brush = CreateSolidBrush(dim_color());
                FillRect(hdc, &client, brush);
                let _ = DeleteObject(HGDIOBJ::from(brush));
                let _ = EndPaint(hwnd, &ps);
            }
            LRESULT(0)
        }

        // Painted in full by WM_PAINT
        WM_ERASEBKGND => LRESULT(1),

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

fn register_class() -> PlatformResult<()> {
    let mut registered = CLASS_REGISTERED
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if *registered {
        return Ok(());
    }

    unsafe {
        let hinstance = GetModuleHandleW(PCWSTR::null())?;
        let class_name: Vec<u16> = CLASS_NAME.encode_utf16().collect();

        let wc = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(window_proc),
            hInstance: hinstance.into(),
            lpszClassName: PCWSTR(class_name.as_ptr()),
            ..Default::default()
        };

        if RegisterClassW(&wc) == 0 {
            return Err(PlatformError::ClassRegistration(CLASS_NAME.trim_end_matches('\0')));
        }
    }

    *registered = true;
    Ok(())
}

/// Create the overlay at `bounds` and show it without activation.
pub fn create(bounds: Rect) -> PlatformResult<WindowId> {
    register_class()?;

    unsafe {
        let hinstance = GetModuleHandleW(PCWSTR::null())?;
        let class_name: Vec<u16> = CLASS_NAME.encode_utf16().collect();

        // WS_EX_TRANSPARENT + WS_DISABLED: click-through, never focused
        // WS_EX_NOACTIVATE: showing or moving it never steals activation
        // WS_EX_TOOLWINDOW: no taskbar button, not in Alt+Tab
        let hwnd = CreateWindowExW(
            WS_EX_LAYERED | WS_EX_TRANSPARENT | WS_EX_TOOLWINDOW | WS_EX_NOACTIVATE,
            PCWSTR(class_name.as_ptr()),
            PCWSTR::null(),
            WS_POPUP | WS_DISABLED,
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height,
            None,
            None,
            Some(hinstance.into()),
            None,
        )?;

        let _ = ShowWindow(hwnd, SW_SHOWNA);
        tracing::debug!(hwnd = hwnd.0 as isize, "overlay window shown without activation");
        Ok(super::window_id(hwnd))
    }
}

pub fn destroy(overlay: WindowId) {
    unsafe {
        let hwnd = hwnd(overlay);
        if IsWindow(Some(hwnd)).as_bool() {
            let _ = DestroyWindow(hwnd);
        }
    }
}

pub fn set_alpha(overlay: WindowId, opacity: f32) -> PlatformResult<()> {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    unsafe {
        let hwnd = hwnd(overlay);
        if !IsWindow(Some(hwnd)).as_bool() {
            return Err(PlatformError::InvalidWindow(overlay));
        }
        SetLayeredWindowAttributes(hwnd, COLORREF(0), alpha, LWA_ALPHA)?;
    }
    Ok(())
}
