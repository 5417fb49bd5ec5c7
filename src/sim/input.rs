//! Input normalization
//!
//! Folds every raw source (keyboard, touch zones, device tilt, virtual wheel)
//! into one [`Intent`] per tick. Pure: reads the raw snapshot, writes nothing.

use serde::{Deserialize, Serialize};

use crate::platform::Capabilities;
use crate::tuning::InputTuning;

/// Which on-screen controls a touch device shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    /// Left/right/brake touch zones
    #[default]
    Touch,
    /// Virtual steering wheel
    Wheel,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Touch => "touch",
            ControlMode::Wheel => "wheel",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "touch" => Some(ControlMode::Touch),
            "wheel" => Some(ControlMode::Wheel),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ControlMode::Touch => ControlMode::Wheel,
            ControlMode::Wheel => ControlMode::Touch,
        }
    }
}

/// Held keys (arrows/WASD, space)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Space / handbrake
    pub brake: bool,
}

/// Touch zones currently pressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchState {
    pub left: bool,
    pub right: bool,
    pub brake: bool,
}

/// Device orientation in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TiltReading {
    /// Front/back tilt
    pub beta: f32,
    /// Left/right tilt
    pub gamma: f32,
}

/// Virtual wheel state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelState {
    pub active: bool,
    /// Horizontal deflection of the stick from center (px)
    pub offset: f32,
}

/// Everything the platform polled this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawInput {
    pub keys: KeyState,
    pub touch: TouchState,
    /// Latest orientation reading, if the sensor has reported one
    pub tilt: Option<TiltReading>,
    pub wheel: WheelState,
}

/// What the driver wants this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    /// Continuous steering in [-1, 1]; overrides discrete steering when present
    pub wheel_turn: Option<f32>,
}

impl Intent {
    pub fn accelerate() -> Self {
        Self {
            accelerate: true,
            ..Default::default()
        }
    }
}

/// Turns raw input into an [`Intent`]
#[derive(Debug, Clone)]
pub struct InputNormalizer {
    capabilities: Capabilities,
    mode: ControlMode,
    tuning: InputTuning,
}

impl InputNormalizer {
    pub fn new(capabilities: Capabilities, mode: ControlMode, tuning: InputTuning) -> Self {
        Self {
            capabilities,
            mode,
            tuning,
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ControlMode) {
        self.mode = mode;
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn normalize(&self, raw: &RawInput) -> Intent {
        let mut intent = Intent {
            accelerate: raw.keys.up,
            brake: raw.keys.down || raw.keys.brake || raw.touch.brake,
            steer_left: raw.keys.left || raw.touch.left,
            steer_right: raw.keys.right || raw.touch.right,
            wheel_turn: None,
        };

        if self.capabilities.tilt {
            if let Some(tilt) = raw.tilt {
                let t = &self.tuning;
                intent.steer_left |= tilt.gamma < -t.tilt_steer_deg;
                intent.steer_right |= tilt.gamma > t.tilt_steer_deg;
                intent.accelerate |= tilt.beta < t.tilt_gas_below_deg;
                intent.brake |= tilt.beta > t.tilt_brake_above_deg;
            }
        }

        if self.mode == ControlMode::Wheel && raw.wheel.active {
            let t = &self.tuning;
            intent.steer_left |= raw.wheel.offset < -t.wheel_dead_zone;
            intent.steer_right |= raw.wheel.offset > t.wheel_dead_zone;
            intent.wheel_turn = Some((raw.wheel.offset / t.wheel_max_offset).clamp(-1.0, 1.0));
        }

        intent
    }
}
