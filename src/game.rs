//! Frame controller
//!
//! Owns the simulation and everything around it that is not pure: the frame
//! clock, the input normalizer and the best-distance record. The browser loop
//! (or a headless driver) calls [`Game::frame`] once per animation frame and
//! then pulls views and events.

use crate::persistence::{BestRecord, RecordStore};
use crate::platform::{Capabilities, FrameClock};
use crate::sim::{
    ControlMode, EndReason, GameEvent, GamePhase, HudView, InputNormalizer, Intent, RawInput,
    RenderView, SimulationState, Viewport, tick,
};
use crate::tuning::Tuning;

/// Result of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub reason: EndReason,
    /// km
    pub distance: f32,
    pub max_speed: u32,
    pub fuel_collected: u32,
    /// The run set a new best distance
    pub new_record: bool,
    /// Best distance after this run
    pub best_distance: f32,
}

pub struct Game<S: RecordStore> {
    state: SimulationState,
    normalizer: InputNormalizer,
    clock: FrameClock,
    record: BestRecord,
    store: S,
    events: Vec<GameEvent>,
    summary: Option<RunSummary>,
}

impl<S: RecordStore> Game<S> {
    pub fn new(
        tuning: Tuning,
        viewport: Viewport,
        capabilities: Capabilities,
        control_mode: ControlMode,
        store: S,
    ) -> Self {
        let record = BestRecord::load(&store);
        let normalizer = InputNormalizer::new(capabilities, control_mode, tuning.input.clone());
        let clock = FrameClock::new(tuning.max_frame_ms);
        Self {
            state: SimulationState::new(0, tuning, viewport),
            normalizer,
            clock,
            record,
            store,
            events: Vec::new(),
            summary: None,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Direct access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn best_distance(&self) -> f32 {
        self.record.best()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Summary of the most recent finished run
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    pub fn control_mode(&self) -> ControlMode {
        self.normalizer.mode()
    }

    pub fn set_control_mode(&mut self, mode: ControlMode) {
        self.normalizer.set_mode(mode);
    }

    /// Start (or restart) a run
    pub fn start(&mut self, seed: u64) {
        self.state.start_run(seed);
        self.clock.reset();
        self.summary = None;
        self.collect_events();
    }

    pub fn pause(&mut self) -> bool {
        self.state.pause()
    }

    pub fn resume(&mut self) -> bool {
        let resumed = self.state.resume();
        if resumed {
            self.clock.reset();
        }
        resumed
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.state.phase == GamePhase::Paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    pub fn exit_to_menu(&mut self) -> bool {
        self.state.exit_to_menu()
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.state.resize(viewport);
    }

    /// One animation frame: clamp elapsed time, normalize input, tick.
    /// Returns the simulated milliseconds.
    pub fn frame(&mut self, now_ms: f64, raw: &RawInput) -> f32 {
        let dt = self.clock.advance(now_ms);
        let intent = self.normalizer.normalize(raw);
        self.step(&intent, dt);
        dt
    }

    /// Tick with an already-normalized intent
    pub fn step(&mut self, intent: &Intent, dt_ms: f32) {
        tick(&mut self.state, intent, dt_ms);
        self.collect_events();
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn hud(&self) -> HudView {
        HudView::new(&self.state, self.record.best())
    }

    pub fn render_view(&self) -> RenderView {
        RenderView::new(&self.state)
    }

    fn collect_events(&mut self) {
        for event in self.state.drain_events() {
            self.events.push(event);
            if let GameEvent::GameOver { reason, distance } = event {
                self.finish_run(reason, distance);
            }
        }
    }

    fn finish_run(&mut self, reason: EndReason, distance: f32) {
        let new_record = self.record.submit(distance, &mut self.store);
        if new_record {
            self.events.push(GameEvent::NewRecord { distance });
        }

        let stats = &self.state.stats;
        self.summary = Some(RunSummary {
            reason,
            distance,
            max_speed: stats.max_speed,
            fuel_collected: stats.fuel_collected,
            new_record,
            best_distance: self.record.best(),
        });
    }
}
