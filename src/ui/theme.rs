use windows::Win32::Foundation::COLORREF;

// ── Colors (COLORREF is 0x00BBGGRR) ──────────────────────────────────────────

/// Window background #0F172A
pub const CLR_BACKGROUND: COLORREF = COLORREF(0x002A170F);

/// Primary text #F8FAFC
pub const CLR_FOREGROUND: COLORREF = COLORREF(0x00FCFAF8);

/// Card borders, slider track, toggle off #1E293B
pub const CLR_SECONDARY: COLORREF = COLORREF(0x003B291E);

/// Labels and hints #94A3B8
pub const CLR_MUTED_FG: COLORREF = COLORREF(0x00B8A394);

/// Accent amber #F59E0B
pub const CLR_ACCENT: COLORREF = COLORREF(0x000B9EF5);

// ── Dimensions ───────────────────────────────────────────────────────────────

/// Initial client area; the window is resizable so the overlay has
/// something to follow.
pub const WINDOW_WIDTH: i32 = 380;
pub const WINDOW_HEIGHT: i32 = 360;

pub const PADDING: i32 = 20;
pub const CARD_RADIUS: i32 = 8;
pub const GAP: i32 = 12;

// Font heights in logical units (negative = character height)
pub const FONT_SIZE_TITLE: i32 = -18;
pub const FONT_SIZE_SMALL: i32 = -12;
pub const FONT_SIZE_XS: i32 = -11;

pub const FONT_NAME: &str = "Segoe UI";
pub const FONT_MONO_NAME: &str = "Consolas";
