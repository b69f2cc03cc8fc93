//! Per-bar temporal smoothing. Bars rise instantly to new peaks and fall
//! gradually, which keeps the visualization free of flicker on transients.

/// Peak amplitude under which a fade-out is considered complete.
const FADE_FLOOR: f32 = 0.01;

/// Baseline amplitude of the idle pattern.
const IDLE_BASE: f32 = 0.06;
const IDLE_SWING: f32 = 0.05;

/// Smoothed state of the visual bars. The state persists across frames;
/// the previous frame's values are what make the gradual release work.
#[derive(Debug, Clone)]
pub struct BarField {
    current: Vec<f32>,
    previous: Vec<f32>,
    decay: f32,
}

impl BarField {
    /// Creates a field of `bar_count` bars, pre-seeded with the idle
    /// pattern so a never-started visualization still shows something.
    pub fn new(bar_count: usize, decay: f32) -> Self {
        let idle = idle_pattern(bar_count);
        Self {
            previous: idle.clone(),
            current: idle,
            decay,
        }
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Current smoothed bar heights, each in [0, 1].
    pub fn values(&self) -> &[f32] {
        &self.current
    }

    /// Folds one frame of raw bar energies into the field. Each bar moves
    /// to `max(raw, previous * decay)` independently of its neighbours;
    /// missing raw values are treated as silence.
    pub fn apply(&mut self, raw: &[f32]) {
        self.previous.copy_from_slice(&self.current);
        for (i, bar) in self.current.iter_mut().enumerate() {
            let value = raw.get(i).copied().unwrap_or(0.0).clamp(0.0, 1.0);
            *bar = value.max(self.previous[i] * self.decay);
        }
    }

    /// Advances the stop animation by one frame, scaling every bar down by
    /// `step`. Returns `true` once the field has faded out.
    pub fn fade_step(&mut self, step: f32) -> bool {
        let factor = (1.0 - step).clamp(0.0, 1.0);
        self.previous.copy_from_slice(&self.current);

        let mut peak = 0.0f32;
        for bar in &mut self.current {
            *bar *= factor;
            peak = peak.max(*bar);
        }
        peak < FADE_FLOOR
    }

    /// Restores the idle pattern after a completed fade-out.
    pub fn reset_idle(&mut self) {
        let idle = idle_pattern(self.current.len());
        self.previous.copy_from_slice(&idle);
        self.current = idle;
    }
}

/// Deterministic low-amplitude pattern shown while nothing is playing.
/// Never all-zero, and identical on every call for a given bar count, so
/// repeated idle renders are stable.
pub fn idle_pattern(bar_count: usize) -> Vec<f32> {
    (0..bar_count)
        .map(|i| IDLE_BASE + IDLE_SWING * ((i as f32 * 0.35).sin() * 0.5 + 0.5))
        .collect()
}
