// Prevents console window in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
// Only the platform-neutral core is built elsewhere
#![cfg_attr(not(windows), allow(dead_code))]

mod config;
mod logging;
mod platform;
mod tracker;
mod ui;

#[cfg(windows)]
mod app;
#[cfg(windows)]
mod hotkeys;
#[cfg(windows)]
mod win32;

fn main() {
    let cfg = config::load_config();
    logging::init(cfg.debug_logging);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        enabled = cfg.is_enabled,
        opacity = cfg.opacity,
        "starting dimscreen"
    );

    if let Err(e) = run(cfg) {
        tracing::error!("dimscreen failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(windows)]
fn run(cfg: config::DimConfig) -> Result<(), platform::PlatformError> {
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GetMessageW, TranslateMessage, MSG,
    };

    if is_already_running() {
        tracing::info!("another instance is already running");
        return Ok(());
    }

    let settings = ui::create_window()?;
    app::install(app::App::new(cfg, settings)?);

    ui::show_window(settings);
    app::with(app::App::start);

    if !hotkeys::register_all(win32::hwnd(settings)) {
        tracing::warn!("some global hotkeys are unavailable");
    }

    // Win32 message loop. Owner notifications queued by the hook callback
    // are drained after every message, which includes the wake-up posted
    // with them.
    unsafe {
        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
            app::with(app::App::pump_platform_events);
        }
    }

    // Normally already done when the settings window closed
    if let Some(app) = app::take() {
        app.shutdown();
    }
    Ok(())
}

#[cfg(not(windows))]
fn run(_cfg: config::DimConfig) -> Result<(), platform::PlatformError> {
    tracing::error!("dimscreen only runs on Windows");
    std::process::exit(1);
}

/// Check if another instance is already running
#[cfg(windows)]
fn is_already_running() -> bool {
    use windows::core::PCWSTR;
    use windows::Win32::System::Threading::{
        CreateMutexW, OpenMutexW, SYNCHRONIZATION_ACCESS_RIGHTS,
    };

    let name: Vec<u16> = "DimScreenMutex\0".encode_utf16().collect();

    unsafe {
        let existing = OpenMutexW(
            SYNCHRONIZATION_ACCESS_RIGHTS(0x001F0001), // MUTEX_ALL_ACCESS
            false,
            PCWSTR(name.as_ptr()),
        );
        if existing.is_ok() {
            return true;
        }

        // This instance owns the mutex for the rest of the process lifetime
        let _ = CreateMutexW(None, true, PCWSTR(name.as_ptr()));
        false
    }
}
