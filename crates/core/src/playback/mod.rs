//! Playback transport collaborator. Owns the live audio source (the
//! station stream) and the analyser tap derived from it. Decoding the
//! stream itself is out of scope; whoever produces sample blocks pushes
//! them through [`Transport::push_samples`].

use crate::{
    analyser::{AnalyserNode, AnalyserSlot},
    Result,
};

/// Transport state for one audio source. The analyser is created lazily,
/// exactly once per source, and dropped when the source is released.
#[derive(Debug, Default)]
pub struct Transport {
    stream_url: String,
    playing: bool,
    analyser: AnalyserSlot,
}

impl Transport {
    pub fn new(stream_url: impl Into<String>) -> Self {
        Self {
            stream_url: stream_url.into(),
            playing: false,
            analyser: AnalyserSlot::new(),
        }
    }

    pub fn stream_url(&self) -> &str {
        &self.stream_url
    }

    /// Externally visible playback state consumed by the visualization.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            tracing::info!(url = %self.stream_url, "playback started");
        }
    }

    pub fn pause(&mut self) {
        if self.playing {
            self.playing = false;
            tracing::info!("playback paused");
        }
    }

    /// Wires the analyser into the audio path, creating it on first use.
    /// Safe to call on every play toggle; the existing node is reused.
    pub fn ensure_analyser(&mut self, fft_size: usize) -> Result<&mut AnalyserNode> {
        self.analyser.get_or_create(fft_size)
    }

    pub fn analyser(&self) -> Option<&AnalyserNode> {
        self.analyser.get()
    }

    pub fn analyser_mut(&mut self) -> Option<&mut AnalyserNode> {
        self.analyser.get_mut()
    }

    /// Feeds a block of decoded samples into the analyser, if one exists.
    /// Without an analyser the samples are dropped silently; analysis is a
    /// tap, never a gate on playback.
    pub fn push_samples(&mut self, samples: &[f32]) -> Result<()> {
        match self.analyser.get_mut() {
            Some(node) => node.push_block(samples),
            None => Ok(()),
        }
    }

    /// Tears down the audio source: stops playback and drops the analyser.
    pub fn release_source(&mut self) {
        self.playing = false;
        self.analyser.clear();
        tracing::debug!("audio source released");
    }
}
