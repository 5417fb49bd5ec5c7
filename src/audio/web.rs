//! Web Audio playback of [`SoundCue`]s and the engine drone

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::{EngineTone, SoundCue, ToneStep, Waveform};

fn oscillator_type(wave: Waveform) -> OscillatorType {
    match wave {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    engine: Option<(OscillatorNode, GainNode)>,
    volume: f32,
    enabled: bool,
}

impl AudioManager {
    /// Create the context. With `available == false` (no Web Audio) every
    /// call is a no-op.
    pub fn new(available: bool, volume: f32, enabled: bool) -> Self {
        let ctx = if available {
            AudioContext::new().ok()
        } else {
            None
        };
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            engine: None,
            volume: volume.clamp(0.0, 1.0),
            enabled,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Global toggle; silences the engine immediately when turned off
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.stop_engine();
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.enabled { self.volume } else { 0.0 }
    }

    /// Schedule every tone of a cue in one pass
    pub fn play(&self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        self.resume();

        let t = ctx.current_time();
        for step in cue.steps() {
            self.schedule(ctx, step, t, vol);
        }
    }

    fn schedule(&self, ctx: &AudioContext, step: &ToneStep, t0: f64, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, step.freq, oscillator_type(step.wave)) else {
            return;
        };
        let start = t0 + step.delay;
        let end = start + step.duration;

        gain.gain().set_value_at_time(0.0, t0).ok();
        gain.gain().set_value_at_time(step.volume * vol, start).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, end)
            .ok();

        osc.start_with_when(start).ok();
        osc.stop_with_when(end).ok();
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Glide the engine drone toward `tone`, starting it on first use
    pub fn update_engine(&mut self, tone: EngineTone) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = self.ctx.clone() else { return };

        if self.engine.is_none() {
            if let Some((osc, gain)) = self.create_osc(&ctx, tone.freq, OscillatorType::Sawtooth) {
                gain.gain().set_value(0.0);
                osc.start().ok();
                self.engine = Some((osc, gain));
            }
        }

        if let Some((osc, gain)) = &self.engine {
            let t = ctx.current_time();
            osc.frequency().set_target_at_time(tone.freq, t, 0.1).ok();
            gain.gain()
                .set_target_at_time(tone.volume * vol, t, 0.1)
                .ok();
        }
    }

    /// Fade the engine out (game over, pause, sound off)
    pub fn stop_engine(&self) {
        if let (Some(ctx), Some((_, gain))) = (&self.ctx, &self.engine) {
            gain.gain()
                .set_target_at_time(0.0, ctx.current_time(), 0.2)
                .ok();
        }
    }
}
