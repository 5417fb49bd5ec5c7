//! Sound design as data
//!
//! Every cue is a short list of [`ToneStep`]s scheduled against the audio
//! clock in one pass; nothing waits on timers. The Web Audio player lives in
//! `web` and is only built for the browser.

use crate::sim::GameEvent;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One tone within a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneStep {
    /// Offset from the cue start (seconds)
    pub delay: f64,
    /// Hz
    pub freq: f32,
    pub wave: Waveform,
    /// Seconds until the tone has faded out
    pub duration: f64,
    /// Peak gain before master volume
    pub volume: f32,
}

const fn tone(delay: f64, freq: f32, wave: Waveform, duration: f64, volume: f32) -> ToneStep {
    ToneStep {
        delay,
        freq,
        wave,
        duration,
        volume,
    }
}

use Waveform::{Sawtooth, Sine, Square, Triangle};

const START: &[ToneStep] = &[
    tone(0.0, 200.0, Sawtooth, 0.5, 0.2),
    tone(0.2, 400.0, Sawtooth, 0.5, 0.2),
    tone(0.4, 600.0, Sawtooth, 1.0, 0.2),
];
const CRASH: &[ToneStep] = &[
    tone(0.0, 100.0, Sawtooth, 0.5, 0.4),
    tone(0.0, 55.0, Square, 0.5, 0.3),
    tone(0.05, 70.0, Sawtooth, 0.4, 0.2),
];
const BUMP: &[ToneStep] = &[tone(0.0, 100.0, Sawtooth, 0.25, 0.25)];
const SHIELD_HIT: &[ToneStep] = &[
    tone(0.0, 100.0, Sawtooth, 0.3, 0.25),
    tone(0.0, 1500.0, Triangle, 0.2, 0.08),
];
const LIFE_LOST: &[ToneStep] = &[
    tone(0.0, 100.0, Sawtooth, 0.5, 0.4),
    tone(0.15, 300.0, Square, 0.2, 0.08),
    tone(0.3, 200.0, Square, 0.3, 0.08),
];
const FUEL_PICKUP: &[ToneStep] = &[
    tone(0.0, 880.0, Sine, 0.2, 0.1),
    tone(0.1, 1100.0, Sine, 0.2, 0.1),
];
const POWER_UP: &[ToneStep] = &[
    tone(0.0, 1200.0, Square, 0.3, 0.05),
    tone(0.1, 1800.0, Square, 0.4, 0.05),
];
// C major arpeggio
const NEW_RECORD: &[ToneStep] = &[
    tone(0.0, 523.0, Triangle, 0.2, 0.15),
    tone(0.15, 659.0, Triangle, 0.2, 0.15),
    tone(0.3, 784.0, Triangle, 0.2, 0.15),
    tone(0.45, 1047.0, Triangle, 0.5, 0.15),
];
const CLICK: &[ToneStep] = &[tone(0.0, 800.0, Sine, 0.1, 0.1)];

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Rising three-note engine start
    Start,
    /// Fatal impact
    Crash,
    /// Non-fatal impact (rock, cone)
    Bump,
    /// Shield destroyed an obstacle
    ShieldHit,
    /// Spare life spent
    LifeLost,
    /// Fuel can
    FuelPickup,
    /// Any timed power-up or extra life
    PowerUp,
    /// Run beat the best distance
    NewRecord,
    /// UI button
    Click,
}

impl SoundCue {
    pub fn steps(self) -> &'static [ToneStep] {
        match self {
            SoundCue::Start => START,
            SoundCue::Crash => CRASH,
            SoundCue::Bump => BUMP,
            SoundCue::ShieldHit => SHIELD_HIT,
            SoundCue::LifeLost => LIFE_LOST,
            SoundCue::FuelPickup => FUEL_PICKUP,
            SoundCue::PowerUp => POWER_UP,
            SoundCue::NewRecord => NEW_RECORD,
            SoundCue::Click => CLICK,
        }
    }

    /// Seconds until the last tone has finished
    pub fn length(self) -> f64 {
        self.steps()
            .iter()
            .map(|s| s.delay + s.duration)
            .fold(0.0, f64::max)
    }
}

/// Sound to play for a simulation event, if any
pub fn cue_for_event(event: &GameEvent) -> Option<SoundCue> {
    match event {
        GameEvent::RunStarted => Some(SoundCue::Start),
        GameEvent::Crash { .. } => Some(SoundCue::Crash),
        GameEvent::ObstacleHit { kind } if kind.traits().slippery => None,
        GameEvent::ObstacleHit { .. } => Some(SoundCue::Bump),
        GameEvent::ShieldBlocked { .. } => Some(SoundCue::ShieldHit),
        GameEvent::LifeLost { .. } => Some(SoundCue::LifeLost),
        GameEvent::BonusCollected { kind } if kind.is_fuel() => Some(SoundCue::FuelPickup),
        GameEvent::BonusCollected { .. } => Some(SoundCue::PowerUp),
        GameEvent::NewRecord { .. } => Some(SoundCue::NewRecord),
        GameEvent::EffectExpired { .. } | GameEvent::GameOver { .. } => None,
    }
}

/// Engine drone target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineTone {
    pub freq: f32,
    pub volume: f32,
}

pub const ENGINE_MIN_FREQ: f32 = 60.0;
pub const ENGINE_MAX_FREQ: f32 = 200.0;

/// Engine pitch follows speed over top speed; idling below 10 is quieter
pub fn engine_tone(speed: f32, speed_ratio: f32) -> EngineTone {
    let ratio = speed_ratio.clamp(0.0, 1.0);
    EngineTone {
        freq: ENGINE_MIN_FREQ + (ENGINE_MAX_FREQ - ENGINE_MIN_FREQ) * ratio,
        volume: if speed > 10.0 { 0.08 } else { 0.03 },
    }
}
