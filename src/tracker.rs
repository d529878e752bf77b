// Overlay tracker: keeps one click-through overlay glued to an owner window's
// client area and hides it while the owner is being resized.
//
// The overlay window is always OS-visible. "Hidden" means parked off-screen
// at `PARKED_BOUNDS`; click-through, non-activating windows misbehave when
// toggled with a real show/hide.

use std::thread::{self, ThreadId};

use crate::platform::{
    Container, PlatformResult, Rect, WindowEvent, WindowId, WindowPlatform, FRAME_EVENTS,
};

/// Off-screen placement used while the overlay is logically hidden.
pub const PARKED_BOUNDS: Rect = Rect::new(-10000, -10000, 1, 1);

pub const DEFAULT_OPACITY: f32 = 0.5;

/// What happened to the overlay since the owner's current move/resize drag began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeSequence {
    /// The overlay was hidden when the drag started.
    WasHidden,
    /// The overlay was shown and is still placed (a pure move so far).
    Tracking,
    /// The overlay was shown but got parked by a size change or a hide.
    Parked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Shown,
    Suspended(ResizeSequence),
}

impl Visibility {
    /// Whether the overlay currently sits over the owner.
    pub fn is_placed(self) -> bool {
        matches!(
            self,
            Visibility::Shown | Visibility::Suspended(ResizeSequence::Tracking)
        )
    }
}

/// External provider of overlay transparency (0 = invisible, 255 = opaque).
pub trait TransparentOverlay {
    fn transparency(&self) -> u8;
}

pub struct OverlayTracker<P: WindowPlatform> {
    platform: P,
    overlay: WindowId,
    // Cached separately from any live reference so unsubscription stays
    // symmetric even after the owner has gone away.
    owner: Option<WindowId>,
    container: Option<Container>,
    visibility: Visibility,
    // Set while the overlay sits in the topmost band on behalf of the owner.
    raised_topmost: bool,
    opacity: f32,
    transparency_source: Option<Box<dyn TransparentOverlay + Send>>,
    ui_thread: ThreadId,
}

impl<P: WindowPlatform> OverlayTracker<P> {
    /// Create the overlay window (parked) and a tracker bound to nothing.
    pub fn new(mut platform: P) -> PlatformResult<Self> {
        let overlay = platform.create_overlay(PARKED_BOUNDS)?;
        tracing::debug!(?overlay, "overlay window created");

        let mut tracker = Self {
            platform,
            overlay,
            owner: None,
            container: None,
            visibility: Visibility::Hidden,
            raised_topmost: false,
            opacity: DEFAULT_OPACITY,
            transparency_source: None,
            ui_thread: thread::current().id(),
        };
        tracker.apply_opacity();
        Ok(tracker)
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn overlay(&self) -> WindowId {
        self.overlay
    }

    pub fn owner(&self) -> Option<WindowId> {
        self.owner
    }

    pub fn container(&self) -> Option<Container> {
        self.container
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_shown(&self) -> bool {
        self.visibility.is_placed()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Attach the overlay to `owner`, detaching from any previous owner first.
    pub fn bind(&mut self, owner: Option<WindowId>) {
        self.assert_ui_thread();
        let Some(owner) = owner else {
            return;
        };

        self.unbind();
        self.owner = Some(owner);

        if let Err(e) = self.platform.set_owner(self.overlay, owner) {
            tracing::warn!(?owner, "failed to attach overlay to owner: {e}");
        }
        for event in FRAME_EVENTS {
            self.subscribe(owner, event);
        }

        if self.platform.is_topmost(owner) {
            // Never via activation: that would pull focus away from the owner.
            match self.platform.make_topmost(self.overlay) {
                Ok(()) => self.raised_topmost = true,
                Err(e) => tracing::warn!("failed to raise overlay into topmost band: {e}"),
            }
        }

        if let Some(container) = self.platform.container_of(owner) {
            for event in FRAME_EVENTS {
                self.subscribe(container.frame, event);
            }
            if let Some(client) = container.client {
                self.subscribe(client, WindowEvent::ClientSizeChanged);
            }
            self.container = Some(container);
        }

        tracing::info!(?owner, container = ?self.container, "overlay bound");

        self.update_transparency();
        self.recalc_bounds();
    }

    /// Drop every subscription held on the cached owner and container.
    pub fn unbind(&mut self) {
        self.assert_ui_thread();

        if let Some(owner) = self.owner.take() {
            for event in FRAME_EVENTS {
                self.platform.unsubscribe(owner, event);
            }
            tracing::debug!(?owner, "overlay unbound");
        }

        if let Some(container) = self.container.take() {
            for event in FRAME_EVENTS {
                self.platform.unsubscribe(container.frame, event);
            }
            if let Some(client) = container.client {
                self.platform
                    .unsubscribe(client, WindowEvent::ClientSizeChanged);
            }
        }

        if self.raised_topmost {
            if let Err(e) = self.platform.clear_topmost(self.overlay) {
                tracing::warn!("failed to drop overlay from topmost band: {e}");
            }
            self.raised_topmost = false;
        }

        // A drag on a window we no longer watch will never report its end.
        self.visibility = match self.visibility {
            Visibility::Suspended(ResizeSequence::Tracking) => Visibility::Shown,
            Visibility::Suspended(_) => Visibility::Hidden,
            settled => settled,
        };
    }

    /// Mark the overlay shown and place it over the owner. Without an owner
    /// the overlay stays parked until the next `bind` places it.
    pub fn show(&mut self) {
        self.assert_ui_thread();
        if self.visibility != Visibility::Hidden {
            return;
        }
        self.visibility = Visibility::Shown;
        self.recalc_bounds();
    }

    /// Park the overlay. During an owner resize sequence the overlay comes
    /// back when the sequence ends if it was shown when the sequence began.
    pub fn hide(&mut self) {
        self.assert_ui_thread();
        self.visibility = match self.visibility {
            Visibility::Shown => Visibility::Hidden,
            Visibility::Suspended(ResizeSequence::Tracking) => {
                Visibility::Suspended(ResizeSequence::Parked)
            }
            _ => return,
        };
        self.park();
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.assert_ui_thread();
        self.opacity = opacity.clamp(0.0, 1.0);
        self.apply_opacity();
    }

    pub fn set_transparency_source(&mut self, source: Option<Box<dyn TransparentOverlay + Send>>) {
        self.assert_ui_thread();
        self.transparency_source = source;
        self.update_transparency();
    }

    /// Refresh the overlay alpha, preferring the installed transparency source.
    pub fn update_transparency(&mut self) {
        if let Some(source) = &self.transparency_source {
            self.opacity = f32::from(source.transparency()) / 255.0;
        }
        self.apply_opacity();
    }

    /// Feed one notification from the window system into the state machine.
    ///
    /// Notifications from windows the tracker is not bound to are ignored.
    pub fn handle_event(&mut self, source: WindowId, event: WindowEvent) {
        self.assert_ui_thread();
        if !self.is_watching(source, event) {
            tracing::trace!(?source, ?event, "ignoring unwatched event");
            return;
        }
        tracing::trace!(?source, ?event, state = ?self.visibility, "owner event");

        match event {
            WindowEvent::ResizeBegin => self.on_resize_begin(),
            WindowEvent::ResizeEnd => self.on_resize_end(),
            WindowEvent::SizeChanged => self.hide(),
            WindowEvent::LocationChanged => {
                // Moves of a multi-document child are not tracked live.
                if self.container.is_some() {
                    self.hide();
                } else {
                    self.recalc_bounds();
                }
            }
            WindowEvent::ClientSizeChanged => {
                self.recalc_bounds();
                self.platform.invalidate(self.overlay);
            }
        }
    }

    fn on_resize_begin(&mut self) {
        self.visibility = match self.visibility {
            Visibility::Hidden => Visibility::Suspended(ResizeSequence::WasHidden),
            Visibility::Shown => Visibility::Suspended(ResizeSequence::Tracking),
            suspended => suspended,
        };
    }

    fn on_resize_end(&mut self) {
        match self.visibility {
            Visibility::Suspended(ResizeSequence::WasHidden) => {
                self.visibility = Visibility::Hidden;
            }
            Visibility::Suspended(ResizeSequence::Tracking) => {
                self.visibility = Visibility::Shown;
            }
            Visibility::Suspended(ResizeSequence::Parked) => {
                self.visibility = Visibility::Hidden;
                self.show();
            }
            Visibility::Hidden | Visibility::Shown => {}
        }
    }

    /// Cover the owner's client area exactly, if the overlay is placed.
    fn recalc_bounds(&mut self) {
        if !self.visibility.is_placed() {
            return;
        }
        let Some(owner) = self.owner else {
            return;
        };

        let bounds = self
            .platform
            .client_rect(owner)
            .and_then(|client| self.platform.client_to_screen(owner, client.at_origin()));

        match bounds {
            Ok(bounds) => {
                if let Err(e) = self.platform.set_bounds(self.overlay, bounds) {
                    tracing::warn!("failed to move overlay: {e}");
                }
            }
            Err(e) => tracing::warn!(?owner, "failed to read owner client area: {e}"),
        }
    }

    fn park(&mut self) {
        if let Err(e) = self.platform.set_bounds(self.overlay, PARKED_BOUNDS) {
            tracing::warn!("failed to park overlay: {e}");
        }
    }

    fn apply_opacity(&mut self) {
        if let Err(e) = self.platform.set_opacity(self.overlay, self.opacity) {
            tracing::warn!("failed to set overlay opacity: {e}");
        }
    }

    fn subscribe(&mut self, window: WindowId, event: WindowEvent) {
        if let Err(e) = self.platform.subscribe(window, event) {
            tracing::warn!(?window, ?event, "subscription failed: {e}");
        }
    }

    fn is_watching(&self, source: WindowId, event: WindowEvent) -> bool {
        let frame_event = event != WindowEvent::ClientSizeChanged;
        if self.owner == Some(source) {
            return frame_event;
        }
        match self.container {
            Some(c) if c.frame == source => frame_event,
            Some(c) if c.client == Some(source) => !frame_event,
            _ => false,
        }
    }

    fn assert_ui_thread(&self) {
        assert_eq!(
            thread::current().id(),
            self.ui_thread,
            "overlay tracker must only be used from the thread that created it"
        );
    }
}

impl<P: WindowPlatform> Drop for OverlayTracker<P> {
    fn drop(&mut self) {
        // Skip teardown when dropped on a foreign thread rather than
        // panicking inside drop.
        if thread::current().id() != self.ui_thread {
            return;
        }
        self.unbind();
        self.platform.destroy_overlay(self.overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake::{Call, FakePlatform, FakeWindow};

    const OWNER: WindowId = WindowId(1);

    fn owner_window() -> FakeWindow {
        FakeWindow {
            client: Rect::new(0, 0, 400, 280),
            client_origin: (120, 130),
            ..Default::default()
        }
    }

    fn tracker_with_owner(owner: FakeWindow) -> OverlayTracker<FakePlatform> {
        let mut platform = FakePlatform::new();
        platform.add_window(OWNER.0, owner);
        OverlayTracker::new(platform).unwrap()
    }

    fn overlay_bounds(t: &OverlayTracker<FakePlatform>) -> Rect {
        t.platform().bounds[&t.overlay()]
    }

    /// Deliver an event the way the window system would: only if subscribed.
    fn emit(t: &mut OverlayTracker<FakePlatform>, source: WindowId, event: WindowEvent) {
        if t.platform().is_subscribed(source, event) {
            t.handle_event(source, event);
        }
    }

    #[test]
    fn overlay_starts_parked_and_hidden() {
        let t = tracker_with_owner(owner_window());
        assert_eq!(t.visibility(), Visibility::Hidden);
        assert_eq!(overlay_bounds(&t), PARKED_BOUNDS);
        assert_eq!(t.platform().opacity[&t.overlay()], DEFAULT_OPACITY);
    }

    #[test]
    fn bind_and_show_covers_client_area() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));
        t.show();
        assert!(t.is_shown());
        assert_eq!(overlay_bounds(&t), Rect::new(120, 130, 400, 280));
    }

    #[test]
    fn client_origin_is_reset_before_mapping() {
        let mut owner = owner_window();
        owner.client = Rect::new(8, 31, 400, 280);
        let mut t = tracker_with_owner(owner);
        t.bind(Some(OWNER));
        t.show();
        assert_eq!(overlay_bounds(&t), Rect::new(120, 130, 400, 280));
    }

    #[test]
    fn bind_attaches_overlay_to_owner() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));
        let overlay = t.overlay();
        assert!(t.platform().calls.contains(&Call::SetOwner(overlay, OWNER)));
    }

    #[test]
    fn bind_none_is_noop() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(None);
        assert_eq!(t.owner(), None);
        assert!(t.platform().subscriptions.is_empty());
    }

    #[test]
    fn hide_then_show_restores_bounds() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));
        t.show();
        let before = overlay_bounds(&t);
        t.hide();
        assert_eq!(overlay_bounds(&t), PARKED_BOUNDS);
        assert_eq!(t.visibility(), Visibility::Hidden);
        t.show();
        assert_eq!(overlay_bounds(&t), before);
    }

    #[test]
    fn show_and_hide_are_idempotent() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));

        t.show();
        let calls = t.platform().calls.len();
        t.show();
        assert_eq!(t.platform().calls.len(), calls);

        t.hide();
        let calls = t.platform().calls.len();
        t.hide();
        assert_eq!(t.platform().calls.len(), calls);
        assert_eq!(t.visibility(), Visibility::Hidden);
    }

    #[test]
    fn resize_while_shown_parks_then_repositions() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));
        t.show();

        emit(&mut t, OWNER, WindowEvent::ResizeBegin);
        t.platform_mut().window_mut(OWNER).client = Rect::new(0, 0, 640, 480);
        emit(&mut t, OWNER, WindowEvent::SizeChanged);
        assert!(!t.is_shown());
        assert_eq!(overlay_bounds(&t), PARKED_BOUNDS);

        emit(&mut t, OWNER, WindowEvent::ResizeEnd);
        assert_eq!(t.visibility(), Visibility::Shown);
        assert_eq!(overlay_bounds(&t), Rect::new(120, 130, 640, 480));
    }

    #[test]
    fn resize_while_hidden_stays_hidden() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));

        emit(&mut t, OWNER, WindowEvent::ResizeBegin);
        emit(&mut t, OWNER, WindowEvent::SizeChanged);
        emit(&mut t, OWNER, WindowEvent::ResizeEnd);

        assert_eq!(t.visibility(), Visibility::Hidden);
        assert_eq!(overlay_bounds(&t), PARKED_BOUNDS);
    }

    #[test]
    fn show_during_resize_is_ignored() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));

        emit(&mut t, OWNER, WindowEvent::ResizeBegin);
        t.show();
        assert_eq!(
            t.visibility(),
            Visibility::Suspended(ResizeSequence::WasHidden)
        );
        assert_eq!(overlay_bounds(&t), PARKED_BOUNDS);
    }

    #[test]
    fn move_drag_keeps_tracking_owner() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));
        t.show();

        emit(&mut t, OWNER, WindowEvent::ResizeBegin);
        t.platform_mut().window_mut(OWNER).client_origin = (300, 200);
        emit(&mut t, OWNER, WindowEvent::LocationChanged);
        assert_eq!(overlay_bounds(&t), Rect::new(300, 200, 400, 280));

        emit(&mut t, OWNER, WindowEvent::ResizeEnd);
        assert_eq!(t.visibility(), Visibility::Shown);
    }

    #[test]
    fn hide_during_resize_restores_state_from_resize_begin() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));
        t.show();

        emit(&mut t, OWNER, WindowEvent::ResizeBegin);
        emit(&mut t, OWNER, WindowEvent::SizeChanged);
        t.hide();
        assert_eq!(t.visibility(), Visibility::Suspended(ResizeSequence::Parked));
        assert_eq!(overlay_bounds(&t), PARKED_BOUNDS);

        emit(&mut t, OWNER, WindowEvent::ResizeEnd);
        assert_eq!(t.visibility(), Visibility::Shown);
        assert_eq!(overlay_bounds(&t), Rect::new(120, 130, 400, 280));
    }

    #[test]
    fn hide_during_move_drag_returns_after_end() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));
        t.show();

        emit(&mut t, OWNER, WindowEvent::ResizeBegin);
        t.hide();
        assert_eq!(overlay_bounds(&t), PARKED_BOUNDS);
        emit(&mut t, OWNER, WindowEvent::ResizeEnd);
        assert!(t.is_shown());
    }

    #[test]
    fn show_before_bind_places_overlay_on_bind() {
        let mut t = tracker_with_owner(owner_window());
        t.show();
        assert_eq!(t.visibility(), Visibility::Shown);
        assert_eq!(overlay_bounds(&t), PARKED_BOUNDS);

        t.bind(Some(OWNER));
        assert_eq!(overlay_bounds(&t), Rect::new(120, 130, 400, 280));
    }

    #[test]
    fn location_change_while_hidden_does_not_place() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));
        emit(&mut t, OWNER, WindowEvent::LocationChanged);
        assert_eq!(overlay_bounds(&t), PARKED_BOUNDS);
    }

    #[test]
    fn unbind_removes_subscriptions_and_silences_events() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));
        assert_eq!(t.platform().subscriptions_of(OWNER), 4);
        t.show();

        t.unbind();
        assert!(t.platform().subscriptions.is_empty());

        let calls = t.platform().calls.len();
        // Even a stray notification that slips past the platform is ignored.
        t.handle_event(OWNER, WindowEvent::SizeChanged);
        t.handle_event(OWNER, WindowEvent::LocationChanged);
        assert_eq!(t.platform().calls.len(), calls);
        assert!(t.is_shown());

        t.unbind();
    }

    #[test]
    fn unbind_mid_resize_settles_state() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));
        t.show();
        emit(&mut t, OWNER, WindowEvent::ResizeBegin);
        emit(&mut t, OWNER, WindowEvent::SizeChanged);
        t.unbind();
        assert_eq!(t.visibility(), Visibility::Hidden);

        t.bind(Some(OWNER));
        t.show();
        assert_eq!(overlay_bounds(&t), Rect::new(120, 130, 400, 280));
    }

    #[test]
    fn rebinding_releases_previous_owner() {
        let mut t = tracker_with_owner(owner_window());
        let second = t.platform_mut().add_window(
            2,
            FakeWindow {
                client: Rect::new(0, 0, 200, 100),
                client_origin: (10, 20),
                ..Default::default()
            },
        );
        t.bind(Some(OWNER));
        t.show();
        t.bind(Some(second));

        assert_eq!(t.platform().subscriptions_of(OWNER), 0);
        assert_eq!(t.platform().subscriptions_of(second), 4);
        assert_eq!(overlay_bounds(&t), Rect::new(10, 20, 200, 100));
    }

    #[test]
    fn scenario_owner_client_in_screen_coordinates() {
        // Owner frame (100,100)-(500,400); client area at (120,130)-(520,410).
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));
        t.show();
        assert_eq!(overlay_bounds(&t), Rect::new(120, 130, 400, 280));
    }

    #[test]
    fn topmost_owner_raises_overlay_without_activation() {
        let mut owner = owner_window();
        owner.topmost = true;
        let mut t = tracker_with_owner(owner);
        t.bind(Some(OWNER));

        let overlay = t.overlay();
        assert!(t.platform().calls.contains(&Call::MakeTopmost(overlay)));
        assert!(t.platform().is_topmost(overlay));
    }

    #[test]
    fn rebinding_to_regular_owner_drops_topmost() {
        let mut owner = owner_window();
        owner.topmost = true;
        let mut t = tracker_with_owner(owner);
        let regular = t.platform_mut().add_window(2, owner_window());

        t.bind(Some(OWNER));
        let overlay = t.overlay();
        assert!(t.platform().is_topmost(overlay));

        t.bind(Some(regular));
        assert!(!t.platform().is_topmost(overlay));
        assert!(t.platform().calls.contains(&Call::ClearTopmost(overlay)));
    }

    #[test]
    fn unbind_leaves_unraised_overlay_z_order_alone() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));
        t.unbind();
        assert!(!t
            .platform()
            .calls
            .iter()
            .any(|c| matches!(c, Call::ClearTopmost(_))));
    }

    #[test]
    fn regular_owner_leaves_z_order_alone() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));
        assert!(!t
            .platform()
            .calls
            .iter()
            .any(|c| matches!(c, Call::MakeTopmost(_))));
    }

    fn mdi_tracker() -> (OverlayTracker<FakePlatform>, WindowId, WindowId) {
        let frame = WindowId(10);
        let client = WindowId(11);
        let mut owner = owner_window();
        owner.container = Some(Container {
            frame,
            client: Some(client),
        });
        let mut t = tracker_with_owner(owner);
        t.platform_mut().add_window(frame.0, FakeWindow::default());
        t.platform_mut().add_window(client.0, FakeWindow::default());
        t.bind(Some(OWNER));
        (t, frame, client)
    }

    #[test]
    fn container_is_tracked_and_released() {
        let (mut t, frame, client) = mdi_tracker();
        assert_eq!(t.platform().subscriptions_of(OWNER), 4);
        assert_eq!(t.platform().subscriptions_of(frame), 4);
        assert!(t
            .platform()
            .is_subscribed(client, WindowEvent::ClientSizeChanged));

        t.unbind();
        assert!(t.platform().subscriptions.is_empty());
        assert_eq!(t.container(), None);
    }

    #[test]
    fn container_move_hides_overlay() {
        let (mut t, frame, _) = mdi_tracker();
        t.show();
        emit(&mut t, frame, WindowEvent::LocationChanged);
        assert_eq!(t.visibility(), Visibility::Hidden);
        assert_eq!(overlay_bounds(&t), PARKED_BOUNDS);
    }

    #[test]
    fn container_resize_sequence_restores_overlay() {
        let (mut t, frame, _) = mdi_tracker();
        t.show();
        emit(&mut t, frame, WindowEvent::ResizeBegin);
        emit(&mut t, frame, WindowEvent::SizeChanged);
        assert!(!t.is_shown());
        emit(&mut t, frame, WindowEvent::ResizeEnd);
        assert!(t.is_shown());
        assert_eq!(overlay_bounds(&t), Rect::new(120, 130, 400, 280));
    }

    #[test]
    fn container_client_resize_recomputes_and_repaints() {
        let (mut t, _, client) = mdi_tracker();
        t.show();
        t.platform_mut().window_mut(OWNER).client = Rect::new(0, 0, 300, 150);
        emit(&mut t, client, WindowEvent::ClientSizeChanged);

        assert_eq!(overlay_bounds(&t), Rect::new(120, 130, 300, 150));
        let overlay = t.overlay();
        assert_eq!(t.platform().calls.last(), Some(&Call::Invalidate(overlay)));
    }

    #[test]
    fn opacity_is_clamped() {
        let mut t = tracker_with_owner(owner_window());
        t.set_opacity(1.7);
        assert_eq!(t.opacity(), 1.0);
        t.set_opacity(-0.2);
        assert_eq!(t.opacity(), 0.0);
        t.set_opacity(0.35);
        assert_eq!(t.platform().opacity[&t.overlay()], 0.35);
    }

    struct FixedTransparency(u8);

    impl TransparentOverlay for FixedTransparency {
        fn transparency(&self) -> u8 {
            self.0
        }
    }

    #[test]
    fn transparency_source_drives_opacity() {
        let mut t = tracker_with_owner(owner_window());
        t.set_transparency_source(Some(Box::new(FixedTransparency(51))));
        assert!((t.opacity() - 0.2).abs() < f32::EPSILON);
        assert!((t.platform().opacity[&t.overlay()] - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn failing_owner_query_leaves_overlay_in_place() {
        let mut t = tracker_with_owner(owner_window());
        t.bind(Some(OWNER));
        t.show();
        t.platform_mut().fail_client_rect = true;
        emit(&mut t, OWNER, WindowEvent::LocationChanged);
        assert_eq!(overlay_bounds(&t), Rect::new(120, 130, 400, 280));
        assert!(t.is_shown());
    }

    #[test]
    fn drop_unbinds_and_destroys_overlay() {
        let mut platform = FakePlatform::new();
        platform.add_window(OWNER.0, owner_window());

        let overlay = {
            let mut t = OverlayTracker::new(&mut platform).unwrap();
            t.bind(Some(OWNER));
            t.overlay()
        };

        assert!(platform.subscriptions.is_empty());
        assert_eq!(platform.destroyed, vec![overlay]);
    }

    #[test]
    fn use_from_another_thread_panics() {
        let t = tracker_with_owner(owner_window());
        let result = std::thread::spawn(move || {
            let mut t = t;
            t.show();
        })
        .join();
        assert!(result.is_err());
    }
}
