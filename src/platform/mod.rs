//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Capability detection (orientation sensor, touch, audio), done once at startup
//! - Frame timing with a clamped step

use crate::consts::{MAX_FRAME_MS, NOMINAL_FRAME_MS};

/// What the host platform offers. Detected once; the simulation only ever
/// asks this struct, never the platform itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Device orientation events (tilt steering)
    pub tilt: bool,
    /// Touch input (on-screen controls)
    pub touch: bool,
    /// Web Audio
    pub audio: bool,
}

impl Capabilities {
    /// Nothing available (headless / native)
    pub fn none() -> Self {
        Self::default()
    }

    /// Probe the browser for sensors and audio (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn detect() -> Self {
        use wasm_bindgen::JsValue;

        let Some(window) = web_sys::window() else {
            return Self::none();
        };
        let has = |name: &str| {
            js_sys::Reflect::has(&window, &JsValue::from_str(name)).unwrap_or(false)
        };

        let touch = has("ontouchstart") || window.navigator().max_touch_points() > 0;
        let capabilities = Self {
            // Desktop browsers expose the event type too but never fire it;
            // only trust it where touch is available.
            tilt: touch && has("DeviceOrientationEvent"),
            touch,
            audio: has("AudioContext") || has("webkitAudioContext"),
        };
        log::info!("Platform capabilities: {:?}", capabilities);
        capabilities
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn detect() -> Self {
        Self::none()
    }
}

/// Converts frame timestamps into clamped tick lengths
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_step_ms: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_MS)
    }
}

impl FrameClock {
    pub fn new(max_step_ms: f32) -> Self {
        Self {
            last_ms: None,
            max_step_ms,
        }
    }

    /// Elapsed milliseconds since the previous frame, within `0..=max_step`.
    /// The first frame reports one nominal frame.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let elapsed = match self.last_ms {
            Some(last) => (now_ms - last) as f32,
            None => NOMINAL_FRAME_MS,
        };
        self.last_ms = Some(now_ms);
        elapsed.clamp(0.0, self.max_step_ms)
    }

    /// Forget the previous timestamp (after a pause or tab switch)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
