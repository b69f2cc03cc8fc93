//! Core library for the Airglow radio companion.
//!
//! The heart of the crate is the frame-driven visualization pipeline:
//! [`analyser`] exposes the frequency snapshot of the live stream,
//! [`bands`] reduces it to per-bar energies, [`smoothing`] applies the
//! rise-fast/fall-slow filter, [`color`] derives the glow tint and
//! [`viz`] owns the render loop's lifecycle on top of the [`frame`]
//! scheduling abstraction. The remaining modules are the companion app's
//! collaborators: station status polling, the persistent like store and
//! the playback transport.

pub mod analyser;
pub mod bands;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod likes;
pub mod playback;
pub mod smoothing;
pub mod station;
pub mod viz;

pub use analyser::{AnalyserNode, AnalyserSlot, SpectrumSource};
pub use bands::{bar_energies, BandAverages};
pub use color::{GlowColor, BASE_COLOR};
pub use config::{AppConfig, LikeConfig, StationConfig, VizConfig};
pub use error::{AirglowError, Result};
pub use frame::{FrameHandle, FrameScheduler, ManualScheduler};
pub use likes::{LikeStore, LIKE_TTL_MILLIS};
pub use playback::Transport;
pub use smoothing::{idle_pattern, BarField};
pub use station::{format_clock, DashboardView, NowPlayingResponse, StationClient, Track};
pub use viz::{LoopState, Visualizer};
