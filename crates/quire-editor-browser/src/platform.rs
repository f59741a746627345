//! Browser/OS detection for platform-specific key bindings.

use std::sync::OnceLock;

/// Detected platform traits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Platform {
    pub ios: bool,
    pub mac: bool,
    pub android: bool,
    pub mobile: bool,
}

impl Platform {
    /// Whether Cmd is the primary modifier.
    pub fn apple(&self) -> bool {
        self.mac || self.ios
    }
}

static PLATFORM: OnceLock<Platform> = OnceLock::new();

/// Get cached platform info. Detection runs once on first call.
pub fn platform() -> &'static Platform {
    PLATFORM.get_or_init(detect_platform)
}

fn detect_platform() -> Platform {
    let Some(window) = web_sys::window() else {
        return Platform::default();
    };

    let navigator = window.navigator();
    let user_agent = navigator.user_agent().unwrap_or_default().to_lowercase();
    let platform_str = navigator.platform().unwrap_or_default().to_lowercase();

    // iPadOS reports a Mac platform but has touch points.
    let ios = user_agent.contains("iphone")
        || user_agent.contains("ipad")
        || user_agent.contains("ipod")
        || (platform_str.contains("mac") && navigator.max_touch_points() > 0);

    let mac = platform_str.contains("mac") && !ios;
    let android = user_agent.contains("android");
    let mobile = ios || android || user_agent.contains("mobile");

    let detected = Platform {
        ios,
        mac,
        android,
        mobile,
    };
    tracing::debug!(?detected, "platform detected");
    detected
}
