//! Now-playing data fetcher. Polls the station status endpoint on a fixed
//! interval and maps the payload into the display structs the presentation
//! layer consumes. Unrelated to the visualization core apart from sharing
//! the crate's error type.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{config::StationConfig, Result};

/// Song metadata as delivered by the station API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongDetails {
    pub id: String,
    pub artist: String,
    pub title: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub art: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListenerCounts {
    pub total: u32,
    pub unique: u32,
    pub current: u32,
}

/// The currently playing entry, including live progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NowPlayingInfo {
    #[serde(default)]
    pub played_at: u64,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub elapsed: u32,
    #[serde(default)]
    pub remaining: u32,
    pub song: SongDetails,
}

/// A history or queue entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryItem {
    #[serde(default)]
    pub played_at: u64,
    #[serde(default)]
    pub duration: u32,
    pub song: SongDetails,
}

/// Subset of the station's now-playing payload consumed by the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NowPlayingResponse {
    #[serde(default)]
    pub listeners: ListenerCounts,
    pub now_playing: NowPlayingInfo,
    #[serde(default)]
    pub playing_next: Option<HistoryItem>,
    #[serde(default)]
    pub song_history: Vec<HistoryItem>,
    #[serde(default)]
    pub is_online: bool,
}

/// Display representation of one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub art_url: String,
}

impl From<&SongDetails> for Track {
    fn from(song: &SongDetails) -> Self {
        Self {
            id: song.id.clone(),
            title: song.title.clone(),
            artist: song.artist.clone(),
            art_url: song.art.clone(),
        }
    }
}

/// Everything the single-page UI renders outside the visualization:
/// current track with progress, listener count, recent history and the
/// upcoming track.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub current: Track,
    pub listeners: u32,
    pub elapsed: u32,
    pub duration: u32,
    pub history: Vec<Track>,
    pub next: Option<Track>,
}

impl DashboardView {
    pub fn from_response(response: &NowPlayingResponse, history_count: usize) -> Self {
        Self {
            current: Track::from(&response.now_playing.song),
            listeners: response.listeners.current,
            elapsed: response.now_playing.elapsed,
            duration: response.now_playing.duration,
            history: response
                .song_history
                .iter()
                .take(history_count)
                .map(|item| Track::from(&item.song))
                .collect(),
            next: response
                .playing_next
                .as_ref()
                .map(|item| Track::from(&item.song)),
        }
    }

    /// Progress fraction in [0, 1]. Live streams report a zero duration,
    /// which maps to zero progress rather than a division fault.
    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            0.0
        } else {
            (self.elapsed as f32 / self.duration as f32).clamp(0.0, 1.0)
        }
    }
}

/// Formats a second count as `m:ss` for the progress readout.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Blocking client for the station status endpoint.
#[derive(Debug)]
pub struct StationClient {
    config: StationConfig,
    http: reqwest::blocking::Client,
}

impl StationClient {
    pub fn new(config: StationConfig) -> Self {
        Self {
            config,
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Fetches and decodes the current now-playing payload.
    pub fn fetch_now_playing(&self) -> Result<NowPlayingResponse> {
        tracing::debug!(url = %self.config.api_url, "fetching now playing");
        let response = self
            .http
            .get(&self.config.api_url)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    /// Interval at which callers should re-poll the endpoint.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config.poll_interval_secs)
    }

    pub fn stream_url(&self) -> &str {
        &self.config.stream_url
    }

    pub fn history_count(&self) -> usize {
        self.config.history_count
    }
}
