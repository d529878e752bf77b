// Host application state: persisted settings, the overlay tracker and the
// settings window's control state, owned by the UI thread.

use std::cell::RefCell;

use crate::config::{self, DimConfig};
use crate::platform::{PlatformResult, WindowEvent, WindowId};
use crate::tracker::OverlayTracker;
use crate::ui::controls::UiState;
use crate::win32::{self, Win32Platform};

pub struct App {
    config: DimConfig,
    tracker: OverlayTracker<Win32Platform>,
    pub ui: UiState,
    settings: WindowId,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

pub fn install(app: App) {
    APP.with(|cell| *cell.borrow_mut() = Some(app));
}

/// Remove the app from the UI thread, if it is installed and not in use.
pub fn take() -> Option<App> {
    APP.with(|cell| cell.try_borrow_mut().ok()?.take())
}

/// Run `f` against the installed app. Returns `None` when nothing is
/// installed or when a window procedure re-enters while the app is borrowed.
pub fn with<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

impl App {
    /// Create the overlay window. `settings` is the default owner.
    pub fn new(config: DimConfig, settings: WindowId) -> PlatformResult<Self> {
        let tracker = OverlayTracker::new(Win32Platform::new(config.dim_color))?;
        let ui = UiState::from_config(&config);
        Ok(Self {
            config,
            tracker,
            ui,
            settings,
        })
    }

    /// Cover the settings window and apply the persisted dimmer state.
    pub fn start(&mut self) {
        self.bind_to(self.settings);
        self.apply();
    }

    fn bind_to(&mut self, owner: WindowId) {
        self.tracker.bind(Some(owner));
        self.ui.owner_label = win32::window_title(owner);
        tracing::info!(?owner, title = %self.ui.owner_label, "overlay bound");
    }

    fn apply(&mut self) {
        let opacity = self.config.effective_opacity();
        if opacity > 0.0 {
            self.tracker.set_opacity(opacity);
            self.tracker.show();
        } else {
            self.tracker.hide();
        }
    }

    fn commit(&mut self) {
        config::save_config(&self.config);
        self.apply();
        self.ui.sync_from_config(&self.config);
    }

    pub fn toggle_dimmer(&mut self) {
        self.config.toggle();
        tracing::info!(enabled = self.config.is_enabled, "dimmer toggled");
        self.commit();
    }

    pub fn adjust_opacity(&mut self, delta: f32) {
        self.config.adjust_opacity(delta);
        tracing::debug!(opacity = self.config.opacity, "opacity adjusted");
        self.commit();
    }

    /// Live feedback while the slider is dragged. Nothing is persisted.
    pub fn preview_opacity(&mut self, opacity: f32) {
        if self.config.is_enabled {
            self.tracker.set_opacity(opacity);
        }
    }

    /// Slider released: persist the value, switching the dimmer on if needed.
    pub fn commit_opacity(&mut self, opacity: f32) {
        self.config.set_opacity(opacity);
        self.commit();
    }

    /// Move the overlay onto the foreground window. Asking again while it
    /// already covers that window sends it back to the settings window.
    /// Returns whether the owner changed.
    pub fn follow_foreground(&mut self) -> bool {
        let Some(foreground) = win32::foreground_window() else {
            return false;
        };
        let target = if foreground == self.tracker.overlay()
            || Some(foreground) == self.tracker.owner()
        {
            self.settings
        } else {
            foreground
        };
        if Some(target) == self.tracker.owner() {
            return false;
        }

        self.bind_to(target);
        self.apply();
        true
    }

    /// Feed queued owner notifications to the tracker.
    pub fn pump_platform_events(&mut self) {
        for (source, event) in win32::take_pending() {
            self.tracker.handle_event(source, event);
            // The end of a drag restores whatever was shown when it began,
            // even if the dimmer was switched off in between.
            if event == WindowEvent::ResizeEnd && self.config.effective_opacity() == 0.0 {
                self.apply();
            }
        }
    }

    /// Fall back to the settings window when a followed window has closed.
    /// Returns whether the owner changed.
    pub fn check_owner(&mut self) -> bool {
        match self.tracker.owner() {
            Some(owner) if owner != self.settings && !win32::is_live(owner) => {
                tracing::info!(?owner, "covered window closed, returning to settings window");
                self.bind_to(self.settings);
                self.apply();
                true
            }
            _ => false,
        }
    }

    /// Detach and hide the overlay, persisting the final settings. The
    /// overlay window is destroyed when the tracker drops.
    pub fn shutdown(mut self) {
        self.tracker.unbind();
        self.tracker.hide();
        config::save_config(&self.config);
        tracing::info!("dimscreen shut down");
    }
}
