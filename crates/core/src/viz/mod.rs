//! Render loop controller. Owns the per-instance animation state (bars,
//! glow color, snapshot buffer) and the lifecycle of the sampling loop:
//! started when playback begins and an analyser exists, stopped with a
//! fade-out when playback ends, cancelled unconditionally on teardown.

use crate::{
    analyser::SpectrumSource,
    bands::{self, BandAverages},
    color::{GlowColor, BASE_COLOR},
    config::VizConfig,
    frame::{FrameHandle, FrameScheduler},
    smoothing::BarField,
};

/// Lifecycle state of the sampling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No analyser or playback stopped; the idle pattern is shown.
    Idle,
    /// Actively sampling and scheduling one frame at a time.
    Running,
    /// Fade-out in progress; still animating, no longer sampling.
    Stopping,
}

/// One visualization instance. All mutable animation state lives here and
/// is never shared between instances; the analyser is referenced per call,
/// not owned.
#[derive(Debug)]
pub struct Visualizer {
    config: VizConfig,
    bars: BarField,
    glow: GlowColor,
    state: LoopState,
    pending: Option<FrameHandle>,
    snapshot: Vec<u8>,
}

impl Visualizer {
    pub fn new(config: VizConfig) -> Self {
        let bars = BarField::new(config.bar_count, config.decay);
        Self {
            config,
            bars,
            glow: BASE_COLOR,
            state: LoopState::Idle,
            pending: None,
            snapshot: Vec::new(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Smoothed bar heights for the presentation layer, each in [0, 1].
    /// Always exactly `bar_count` values, idle pattern included.
    pub fn bars(&self) -> &[f32] {
        self.bars.values()
    }

    /// Glow color for the current frame.
    pub fn glow(&self) -> GlowColor {
        self.glow
    }

    /// Reacts to a playback-state change. Starting requires an analyser;
    /// without one the visualizer stays idle (same presentation as "not
    /// playing", never an error). Stopping cancels the pending sampling
    /// frame and begins the fade-out animation.
    pub fn set_playing(
        &mut self,
        playing: bool,
        source: Option<&dyn SpectrumSource>,
        scheduler: &mut dyn FrameScheduler,
    ) {
        if playing {
            let Some(source) = source else {
                return;
            };
            if self.state == LoopState::Running {
                return;
            }
            self.snapshot.resize(source.bin_count(), 0);
            self.cancel_pending(scheduler);
            self.state = LoopState::Running;
            self.pending = Some(scheduler.request_frame());
            tracing::debug!(bins = self.snapshot.len(), "visualization running");
        } else if self.state == LoopState::Running {
            self.cancel_pending(scheduler);
            self.state = LoopState::Stopping;
            self.pending = Some(scheduler.request_frame());
            tracing::debug!("visualization stopping");
        }
    }

    /// Runs one animation tick. `fired` must be the handle the scheduler
    /// delivered; anything else is a stale callback from before a cancel
    /// and is ignored, which guards against double-scheduling. The next
    /// frame is only ever requested from within this completion.
    pub fn on_frame(
        &mut self,
        fired: FrameHandle,
        source: Option<&mut dyn SpectrumSource>,
        scheduler: &mut dyn FrameScheduler,
    ) {
        if self.pending != Some(fired) {
            return;
        }
        self.pending = None;

        match self.state {
            LoopState::Idle => {}
            LoopState::Running => match source {
                Some(source) => {
                    source.write_frequency_data(&mut self.snapshot);

                    let raw = bands::bar_energies(
                        &self.snapshot,
                        self.bars.len(),
                        self.config.shape_exponent,
                    );
                    self.bars.apply(&raw);

                    let next = GlowColor::from_bands(&BandAverages::from_snapshot(&self.snapshot));
                    self.glow = if self.config.blend_color {
                        self.glow.blend(next, 0.5)
                    } else {
                        next
                    };

                    self.pending = Some(scheduler.request_frame());
                }
                None => {
                    // Analyser vanished underneath the loop. Treat it like a
                    // stop and fade toward idle.
                    self.state = LoopState::Stopping;
                    self.pending = Some(scheduler.request_frame());
                }
            },
            LoopState::Stopping => {
                if self.bars.fade_step(self.config.fade_step) {
                    self.bars.reset_idle();
                    self.glow = BASE_COLOR;
                    self.state = LoopState::Idle;
                    tracing::debug!("visualization idle");
                } else {
                    self.pending = Some(scheduler.request_frame());
                }
            }
        }
    }

    /// Unconditionally cancels any pending frame and returns to idle.
    /// Called on component teardown from any state.
    pub fn teardown(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.cancel_pending(scheduler);
        self.state = LoopState::Idle;
    }

    fn cancel_pending(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
    }
}
