// Settings window control state and hit-testing

use crate::config::DimConfig;
use crate::platform::Rect;

/// Slider range in percent, matching `config::MAX_HOST_OPACITY`.
pub const SLIDER_MAX: i32 = 90;

/// State for a toggle switch control
#[derive(Debug, Clone)]
pub struct ToggleState {
    pub checked: bool,
    pub rect: Rect,
}

impl ToggleState {
    pub fn new(checked: bool) -> Self {
        Self {
            checked,
            rect: Rect::default(),
        }
    }
}

/// State for the dimming slider
#[derive(Debug, Clone)]
pub struct SliderState {
    pub value: i32, // 0-SLIDER_MAX percent
    pub dragging: bool,
    pub rect: Rect,       // track
    pub thumb_rect: Rect, // grab area around the track
}

impl SliderState {
    pub fn new(value: i32) -> Self {
        Self {
            value: value.clamp(0, SLIDER_MAX),
            dragging: false,
            rect: Rect::default(),
            thumb_rect: Rect::default(),
        }
    }

    pub fn from_opacity(opacity: f32) -> Self {
        Self::new((opacity * 100.0).round() as i32)
    }

    pub fn opacity(&self) -> f32 {
        self.value as f32 / 100.0
    }

    /// X position of the thumb for the current value
    pub fn thumb_x(&self) -> i32 {
        self.rect.x + (self.value as f32 / SLIDER_MAX as f32 * self.rect.width as f32) as i32
    }

    /// Value for an x position within the track
    pub fn value_from_x(&self, x: i32) -> i32 {
        if self.rect.width <= 0 {
            return self.value;
        }
        let rel_x = (x - self.rect.x).clamp(0, self.rect.width);
        ((rel_x as f32 / self.rect.width as f32) * SLIDER_MAX as f32).round() as i32
    }
}

pub struct UiState {
    pub slider: SliderState,
    pub enabled_toggle: ToggleState,
    /// Title of the window the overlay currently covers
    pub owner_label: String,
    pub shortcut_texts: [String; 4],
}

impl UiState {
    pub fn from_config(cfg: &DimConfig) -> Self {
        Self {
            slider: SliderState::from_opacity(if cfg.is_enabled {
                cfg.opacity
            } else {
                cfg.last_opacity
            }),
            enabled_toggle: ToggleState::new(cfg.is_enabled),
            owner_label: String::new(),
            shortcut_texts: [
                cfg.hotkey_toggle.clone(),
                cfg.hotkey_increase.clone(),
                cfg.hotkey_decrease.clone(),
                cfg.hotkey_follow.clone(),
            ],
        }
    }

    /// Refresh control values after the config changed elsewhere (hotkeys).
    pub fn sync_from_config(&mut self, cfg: &DimConfig) {
        self.enabled_toggle.checked = cfg.is_enabled;
        if cfg.is_enabled {
            self.slider.value = SliderState::from_opacity(cfg.opacity).value;
        }
    }
}

pub fn point_in_rect(x: i32, y: i32, r: &Rect) -> bool {
    x >= r.x && x < r.right() && y >= r.y && y < r.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider() -> SliderState {
        let mut s = SliderState::new(30);
        s.rect = Rect::new(40, 100, 180, 8);
        s
    }

    #[test]
    fn slider_value_tracks_pointer() {
        let s = slider();
        assert_eq!(s.value_from_x(40), 0);
        assert_eq!(s.value_from_x(130), 45);
        assert_eq!(s.value_from_x(220), SLIDER_MAX);
        // Clamped outside the track
        assert_eq!(s.value_from_x(-50), 0);
        assert_eq!(s.value_from_x(999), SLIDER_MAX);
    }

    #[test]
    fn thumb_sits_proportionally_on_track() {
        let mut s = slider();
        s.value = 45;
        assert_eq!(s.thumb_x(), 130);
    }

    #[test]
    fn slider_is_clamped_to_host_maximum() {
        assert_eq!(SliderState::from_opacity(1.0).value, SLIDER_MAX);
        assert_eq!(SliderState::from_opacity(0.25).opacity(), 0.25);
    }

    #[test]
    fn disabled_dimmer_shows_last_opacity() {
        let cfg = DimConfig {
            opacity: 0.0,
            is_enabled: false,
            last_opacity: 0.4,
            ..Default::default()
        };
        let ui = UiState::from_config(&cfg);
        assert_eq!(ui.slider.value, 40);
        assert!(!ui.enabled_toggle.checked);
    }

    #[test]
    fn hit_test_excludes_far_edges() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(point_in_rect(10, 10, &r));
        assert!(point_in_rect(29, 29, &r));
        assert!(!point_in_rect(30, 15, &r));
        assert!(!point_in_rect(15, 9, &r));
    }
}
