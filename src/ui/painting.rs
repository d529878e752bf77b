// GDI owner-draw rendering of the settings window

use super::controls::*;
use super::theme::*;
use crate::platform::Rect;
use windows::Win32::Foundation::{COLORREF, RECT, SIZE};
use windows::Win32::Graphics::Gdi::*;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn create_font(size: i32, weight: i32, family: &str) -> HFONT {
    let face: Vec<u16> = family.encode_utf16().chain(std::iter::once(0)).collect();
    unsafe {
        let mut lf = LOGFONTW {
            lfHeight: size,
            lfWeight: weight,
            lfQuality: CLEARTYPE_QUALITY,
            lfCharSet: DEFAULT_CHARSET,
            ..Default::default()
        };
        let len = face.len().min(32);
        lf.lfFaceName[..len].copy_from_slice(&face[..len]);
        CreateFontIndirectW(&lf)
    }
}

fn fill_rect_color(hdc: HDC, r: &RECT, color: COLORREF) {
    unsafe {
        let brush = CreateSolidBrush(color);
        FillRect(hdc, r, brush);
        let _ = DeleteObject(HGDIOBJ::from(brush));
    }
}

fn draw_rounded_rect(hdc: HDC, r: &Rect, radius: i32, fill: COLORREF, border: COLORREF) {
    unsafe {
        let fill_brush = CreateSolidBrush(fill);
        let border_pen = CreatePen(PS_SOLID, 1, border);
        let old_brush = SelectObject(hdc, HGDIOBJ::from(fill_brush));
        let old_pen = SelectObject(hdc, HGDIOBJ::from(border_pen));
        let _ = RoundRect(hdc, r.x, r.y, r.right(), r.bottom(), radius, radius);
        SelectObject(hdc, old_pen);
        SelectObject(hdc, old_brush);
        let _ = DeleteObject(HGDIOBJ::from(fill_brush));
        let _ = DeleteObject(HGDIOBJ::from(border_pen));
    }
}

fn draw_text(hdc: HDC, text: &str, x: i32, y: i32, color: COLORREF, font: HFONT) {
    unsafe {
        let old_font = SelectObject(hdc, HGDIOBJ::from(font));
        SetTextColor(hdc, color);
        SetBkMode(hdc, TRANSPARENT);
        let wide: Vec<u16> = text.encode_utf16().collect();
        let _ = TextOutW(hdc, x, y, &wide);
        SelectObject(hdc, old_font);
    }
}

fn measure_text(hdc: HDC, text: &str, font: HFONT) -> (i32, i32) {
    unsafe {
        let old_font = SelectObject(hdc, HGDIOBJ::from(font));
        let wide: Vec<u16> = text.encode_utf16().collect();
        let mut size = SIZE::default();
        let _ = GetTextExtentPoint32W(hdc, &wide, &mut size);
        SelectObject(hdc, old_font);
        (size.cx, size.cy)
    }
}

fn draw_text_right(hdc: HDC, text: &str, right_x: i32, y: i32, color: COLORREF, font: HFONT) {
    let (w, _) = measure_text(hdc, text, font);
    draw_text(hdc, text, right_x - w, y, color, font);
}

fn draw_circle(hdc: HDC, cx: i32, cy: i32, r: i32, color: COLORREF) {
    unsafe {
        let brush = CreateSolidBrush(color);
        let pen = CreatePen(PS_SOLID, 0, color);
        let old_brush = SelectObject(hdc, HGDIOBJ::from(brush));
        let old_pen = SelectObject(hdc, HGDIOBJ::from(pen));
        let _ = Ellipse(hdc, cx - r, cy - r, cx + r, cy + r);
        SelectObject(hdc, old_pen);
        SelectObject(hdc, old_brush);
        let _ = DeleteObject(HGDIOBJ::from(brush));
        let _ = DeleteObject(HGDIOBJ::from(pen));
    }
}

struct Fonts {
    title: HFONT,
    small: HFONT,
    small_bold: HFONT,
    xs: HFONT,
    mono: HFONT,
}

impl Fonts {
    fn create() -> Self {
        Self {
            title: create_font(FONT_SIZE_TITLE, 600, FONT_NAME),
            small: create_font(FONT_SIZE_SMALL, 400, FONT_NAME),
            small_bold: create_font(FONT_SIZE_SMALL, 600, FONT_NAME),
            xs: create_font(FONT_SIZE_XS, 400, FONT_NAME),
            mono: create_font(FONT_SIZE_XS, 500, FONT_MONO_NAME),
        }
    }

    fn destroy(&self) {
        for font in [self.title, self.small, self.small_bold, self.xs, self.mono] {
            unsafe {
                let _ = DeleteObject(HGDIOBJ::from(font));
            }
        }
    }
}

// ── Main paint function ─────────────────────────────────────────────────────

/// Paint the whole client area. Records control rects into `state` for
/// hit-testing.
pub fn paint(hdc: HDC, client: &RECT, state: &mut UiState) {
    fill_rect_color(hdc, client, CLR_BACKGROUND);

    let fonts = Fonts::create();
    let width = (client.right - client.left - 2 * PADDING).max(160);

    let mut y = PADDING;
    y = draw_header(hdc, y, width, state, &fonts) + GAP;
    y = draw_level_card(hdc, y, width, state, &fonts) + GAP;
    y = draw_enabled_card(hdc, y, width, state, &fonts) + GAP;
    draw_shortcuts_card(hdc, y, width, state, &fonts);

    fonts.destroy();
}

fn draw_header(hdc: HDC, y: i32, _width: i32, state: &UiState, fonts: &Fonts) -> i32 {
    draw_text(hdc, "DimScreen", PADDING, y, CLR_FOREGROUND, fonts.title);
    let (_, title_h) = measure_text(hdc, "DimScreen", fonts.title);

    let covering = if state.owner_label.is_empty() {
        "Covering: (untitled window)".to_string()
    } else {
        format!("Covering: {}", state.owner_label)
    };
    let sub_y = y + title_h + 4;
    draw_text(hdc, &covering, PADDING, sub_y, CLR_MUTED_FG, fonts.xs);
    let (_, sub_h) = measure_text(hdc, &covering, fonts.xs);
    sub_y + sub_h
}

fn draw_level_card(hdc: HDC, y: i32, width: i32, state: &mut UiState, fonts: &Fonts) -> i32 {
    let card = Rect::new(PADDING, y, width, 96);
    draw_rounded_rect(hdc, &card, CARD_RADIUS, CLR_BACKGROUND, CLR_SECONDARY);

    let inner_x = card.x + 16;
    let inner_right = card.right() - 16;
    draw_text(hdc, "Dimming Level", inner_x, y + 14, CLR_FOREGROUND, fonts.small_bold);

    // Percentage badge
    let badge_text = format!("{}%", state.slider.value);
    let (bw, bh) = measure_text(hdc, &badge_text, fonts.xs);
    let badge = Rect::new(inner_right - bw - 20, y + 12, bw + 20, bh + 4);
    draw_rounded_rect(hdc, &badge, badge.height, CLR_ACCENT, CLR_ACCENT);
    draw_text(hdc, &badge_text, badge.x + 10, badge.y + 2, CLR_BACKGROUND, fonts.xs);

    // Track, fill and thumb
    let track_h = 8;
    let thumb_r = 9;
    let slider_y = y + 46;
    state.slider.rect = Rect::new(inner_x, slider_y, inner_right - inner_x, track_h);
    draw_rounded_rect(hdc, &state.slider.rect, 4, CLR_SECONDARY, CLR_SECONDARY);

    let fill_w = state.slider.thumb_x() - inner_x;
    if fill_w > 0 {
        let fill = Rect::new(inner_x, slider_y, fill_w, track_h);
        draw_rounded_rect(hdc, &fill, 4, CLR_ACCENT, CLR_ACCENT);
    }
    draw_circle(hdc, state.slider.thumb_x(), slider_y + track_h / 2, thumb_r, CLR_FOREGROUND);

    state.slider.thumb_rect = Rect::new(
        inner_x - thumb_r,
        slider_y - thumb_r - 4,
        inner_right - inner_x + 2 * thumb_r,
        track_h + 2 * thumb_r + 8,
    );

    let label_y = slider_y + track_h + 8;
    draw_text(hdc, "0%", inner_x, label_y, CLR_MUTED_FG, fonts.xs);
    draw_text_right(
        hdc,
        &format!("{SLIDER_MAX}%"),
        inner_right,
        label_y,
        CLR_MUTED_FG,
        fonts.xs,
    );

    card.bottom()
}

fn draw_enabled_card(hdc: HDC, y: i32, width: i32, state: &mut UiState, fonts: &Fonts) -> i32 {
    let card = Rect::new(PADDING, y, width, 56);
    draw_rounded_rect(hdc, &card, CARD_RADIUS, CLR_BACKGROUND, CLR_SECONDARY);
    draw_text(hdc, "Dimmer Enabled", card.x + 16, y + 19, CLR_FOREGROUND, fonts.small);

    let (tw, th) = (40, 22);
    let toggle = Rect::new(card.right() - 16 - tw, y + (card.height - th) / 2, tw, th);
    let checked = state.enabled_toggle.checked;
    let track = if checked { CLR_ACCENT } else { CLR_SECONDARY };
    draw_rounded_rect(hdc, &toggle, th, track, track);

    let knob_r = th / 2 - 3;
    let knob_cx = if checked {
        toggle.right() - th / 2
    } else {
        toggle.x + th / 2
    };
    draw_circle(hdc, knob_cx, toggle.y + th / 2, knob_r, CLR_FOREGROUND);

    state.enabled_toggle.rect = toggle;
    card.bottom()
}

fn draw_shortcuts_card(hdc: HDC, y: i32, width: i32, state: &UiState, fonts: &Fonts) -> i32 {
    const ACTIONS: [&str; 4] = [
        "Toggle dimmer",
        "More dimming",
        "Less dimming",
        "Follow focused window",
    ];
    let row_h = 20;
    let card = Rect::new(PADDING, y, width, 16 + row_h * ACTIONS.len() as i32);
    draw_rounded_rect(hdc, &card, CARD_RADIUS, CLR_BACKGROUND, CLR_SECONDARY);

    for (i, (action, keys)) in ACTIONS.iter().zip(&state.shortcut_texts).enumerate() {
        let row_y = y + 10 + row_h * i as i32;
        draw_text(hdc, action, card.x + 16, row_y, CLR_MUTED_FG, fonts.xs);
        draw_text_right(hdc, keys, card.right() - 16, row_y, CLR_FOREGROUND, fonts.mono);
    }

    card.bottom()
}
