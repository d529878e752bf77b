// Owner geometry notifications through out-of-context WinEvent hooks.
//
// One pair of hooks is installed per watched UI thread (move/size start-end and
// location change), shared by every watched window on that thread. The hook
// callback runs on our UI thread while it pumps messages; it classifies the
// raw event into `WindowEvent`s, queues them in arrival order and posts
// `WM_PLATFORM_EVENTS` so the message loop wakes up and drains the queue.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use windows::Win32::Foundation::{HWND, LPARAM, RECT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Accessibility::{SetWinEventHook, UnhookWinEvent, HWINEVENTHOOK};
use windows::Win32::UI::WindowsAndMessaging::{
    GetClientRect, GetWindowRect, GetWindowThreadProcessId, IsWindow, PostThreadMessageW, WM_APP,
};

use super::hwnd;
use crate::platform::{Geometry, PlatformError, PlatformResult, Rect, WindowEvent, WindowId};

/// Posted to the UI thread whenever new events are queued.
pub const WM_PLATFORM_EVENTS: u32 = WM_APP + 20;

// WinEvent constants
const EVENT_SYSTEM_MOVESIZESTART: u32 = 0x000A;
const EVENT_SYSTEM_MOVESIZEEND: u32 = 0x000B;
const EVENT_OBJECT_LOCATIONCHANGE: u32 = 0x800B;
const WINEVENT_OUTOFCONTEXT: u32 = 0x0000;
const OBJID_WINDOW: i32 = 0;
const CHILDID_SELF: i32 = 0;

struct HookPair {
    move_size: isize,
    location: isize,
    refs: usize,
}

/// Per-window subscription plus the geometry last seen for it.
struct Watch {
    events: HashSet<WindowEvent>,
    thread: u32,
    geometry: Geometry,
}

impl Watch {
    fn wants(&self, event: WindowEvent) -> bool {
        self.events.contains(&event)
    }

    /// Compare current geometry with the cached one and report what changed.
    fn classify_geometry(&mut self, hwnd: HWND, out: &mut Vec<WindowEvent>) {
        let next = unsafe { read_geometry(hwnd) };
        let changes = self.geometry.changes_to(&next);
        self.geometry = next;
        out.extend(changes.into_iter().filter(|&e| self.wants(e)));
    }
}

static WATCHED: Mutex<Option<HashMap<isize, Watch>>> = Mutex::new(None);
static HOOKS: Mutex<Option<HashMap<u32, HookPair>>> = Mutex::new(None);
static PENDING: Mutex<VecDeque<(WindowId, WindowEvent)>> = Mutex::new(VecDeque::new());

fn to_rect(r: &RECT) -> Rect {
    Rect::new(r.left, r.top, r.right - r.left, r.bottom - r.top)
}

unsafe fn read_geometry(hwnd: HWND) -> Geometry {
    let mut window = RECT::default();
    let mut client = RECT::default();
    let _ = GetWindowRect(hwnd, &mut window);
    let _ = GetClientRect(hwnd, &mut client);
    Geometry {
        window: to_rect(&window),
        client: to_rect(&client),
    }
}

unsafe extern "system" fn win_event_proc(
    _hook: HWINEVENTHOOK,
    event: u32,
    hwnd: HWND,
    id_object: i32,
    id_child: i32,
    _id_event_thread: u32,
    _event_time: u32,
) {
    if id_object != OBJID_WINDOW || id_child != CHILDID_SELF {
        return;
    }

    let key = hwnd.0 as isize;
    let mut out = Vec::new();
    {
        let Ok(mut watched) = WATCHED.lock() else {
            return;
        };
        let Some(watch) = watched.as_mut().and_then(|w| w.get_mut(&key)) else {
            return;
        };

        match event {
            EVENT_SYSTEM_MOVESIZESTART if watch.wants(WindowEvent::ResizeBegin) => {
                out.push(WindowEvent::ResizeBegin)
            }
            EVENT_SYSTEM_MOVESIZEEND if watch.wants(WindowEvent::ResizeEnd) => {
                out.push(WindowEvent::ResizeEnd)
            }
            EVENT_OBJECT_LOCATIONCHANGE => watch.classify_geometry(hwnd, &mut out),
            _ => {}
        }
    }

    if out.is_empty() {
        return;
    }
    if let Ok(mut pending) = PENDING.lock() {
        pending.extend(out.into_iter().map(|e| (WindowId(key), e)));
    }
    let _ = PostThreadMessageW(GetCurrentThreadId(), WM_PLATFORM_EVENTS, WPARAM(0), LPARAM(0));
}

fn acquire_hooks(thread: u32, process: u32, window: WindowId) -> PlatformResult<()> {
    let mut guard = HOOKS.lock().unwrap_or_else(|p| p.into_inner());
    let hooks = guard.get_or_insert_with(HashMap::new);

    if let Some(pair) = hooks.get_mut(&thread) {
        pair.refs += 1;
        return Ok(());
    }

    unsafe {
        let move_size = SetWinEventHook(
            EVENT_SYSTEM_MOVESIZESTART,
            EVENT_SYSTEM_MOVESIZEEND,
            None,
            Some(win_event_proc),
            process,
            thread,
            WINEVENT_OUTOFCONTEXT,
        );
        if move_size.is_invalid() {
            return Err(PlatformError::HookFailed(window));
        }

        let location = SetWinEventHook(
            EVENT_OBJECT_LOCATIONCHANGE,
            EVENT_OBJECT_LOCATIONCHANGE,
            None,
            Some(win_event_proc),
            process,
            thread,
            WINEVENT_OUTOFCONTEXT,
        );
        if location.is_invalid() {
            let _ = UnhookWinEvent(move_size);
            return Err(PlatformError::HookFailed(window));
        }

        tracing::debug!(thread, process, "installed geometry hooks");
        hooks.insert(
            thread,
            HookPair {
                move_size: move_size.0 as isize,
                location: location.0 as isize,
                refs: 1,
            },
        );
    }
    Ok(())
}

fn release_hooks(thread: u32) {
    let mut guard = HOOKS.lock().unwrap_or_else(|p| p.into_inner());
    let Some(hooks) = guard.as_mut() else {
        return;
    };
    let Some(pair) = hooks.get_mut(&thread) else {
        return;
    };

    pair.refs -= 1;
    if pair.refs > 0 {
        return;
    }
    if let Some(pair) = hooks.remove(&thread) {
        unsafe {
            let _ = UnhookWinEvent(HWINEVENTHOOK(pair.move_size as *mut std::ffi::c_void));
            let _ = UnhookWinEvent(HWINEVENTHOOK(pair.location as *mut std::ffi::c_void));
        }
        tracing::debug!(thread, "removed geometry hooks");
    }
}

pub fn subscribe(window: WindowId, event: WindowEvent) -> PlatformResult<()> {
    let hwnd = hwnd(window);
    if unsafe { !IsWindow(Some(hwnd)).as_bool() } {
        return Err(PlatformError::InvalidWindow(window));
    }

    let mut guard = WATCHED.lock().unwrap_or_else(|p| p.into_inner());
    let watched = guard.get_or_insert_with(HashMap::new);

    if let Some(watch) = watched.get_mut(&window.0) {
        watch.events.insert(event);
        return Ok(());
    }

    let mut process = 0u32;
    let thread = unsafe { GetWindowThreadProcessId(hwnd, Some(&mut process as *mut u32)) };
    if thread == 0 {
        return Err(PlatformError::InvalidWindow(window));
    }
    acquire_hooks(thread, process, window)?;

    watched.insert(
        window.0,
        Watch {
            events: HashSet::from([event]),
            thread,
            geometry: unsafe { read_geometry(hwnd) },
        },
    );
    Ok(())
}

pub fn unsubscribe(window: WindowId, event: WindowEvent) {
    let mut guard = WATCHED.lock().unwrap_or_else(|p| p.into_inner());
    let Some(watched) = guard.as_mut() else {
        return;
    };
    let Some(watch) = watched.get_mut(&window.0) else {
        return;
    };

    watch.events.remove(&event);
    if watch.events.is_empty() {
        let thread = watch.thread;
        watched.remove(&window.0);
        release_hooks(thread);

        // Drop anything still queued for a window nobody listens to anymore.
        if let Ok(mut pending) = PENDING.lock() {
            pending.retain(|(source, _)| *source != window);
        }
    }
}

/// Take every queued notification, oldest first.
pub fn take_pending() -> Vec<(WindowId, WindowEvent)> {
    PENDING
        .lock()
        .map(|mut pending| pending.drain(..).collect())
        .unwrap_or_default()
}
