use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub station: StationConfig,
    pub viz: VizConfig,
    pub likes: LikeConfig,
}

/// Tunable constants of the visualization pipeline. The exact values vary
/// between visual variants; none of them affect correctness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VizConfig {
    /// FFT resolution. Power of two; fixed for the lifetime of an analyser.
    pub fft_size: usize,
    /// Number of visual bars produced per frame.
    pub bar_count: usize,
    /// Release factor of the asymmetric smoother, in (0, 1).
    pub decay: f32,
    /// Power curve applied after band averaging. 1.0 disables shaping.
    pub shape_exponent: f32,
    /// Per-frame fade fraction used for the stop animation.
    pub fade_step: f32,
    /// Blend the glow color halfway toward the new value each frame
    /// instead of recomputing it from scratch.
    pub blend_color: bool,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            fft_size: 512,
            bar_count: 96,
            decay: 0.8,
            shape_exponent: 1.5,
            fade_step: 0.08,
            blend_color: false,
        }
    }
}

/// Configuration of the station status poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub api_url: String,
    pub stream_url: String,
    pub poll_interval_secs: u64,
    /// How many recently played tracks the dashboard keeps.
    pub history_count: usize,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            api_url: "https://ethnafrika.org/api/nowplaying/ethnafrika".to_string(),
            stream_url: "https://ethnafrika.org/listen/ethnafrika/radio.mp3".to_string(),
            poll_interval_secs: 5,
            history_count: 5,
        }
    }
}

/// Configuration of the persistent like store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeConfig {
    pub path: PathBuf,
    pub ttl_millis: u64,
}

impl Default for LikeConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("airglow_likes.json"),
            ttl_millis: crate::likes::LIKE_TTL_MILLIS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.viz.fft_size, config.viz.fft_size);
        assert_eq!(restored.viz.bar_count, config.viz.bar_count);
        assert_eq!(restored.station.poll_interval_secs, 5);
        assert_eq!(restored.likes.ttl_millis, 24 * 60 * 60 * 1000);
    }

    #[test]
    fn default_decay_is_in_open_interval() {
        let viz = VizConfig::default();
        assert!(viz.decay > 0.0 && viz.decay < 1.0);
        assert!(viz.fft_size.is_power_of_two());
    }
}
