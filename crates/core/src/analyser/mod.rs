use std::{f32::consts::PI, fmt, sync::Arc};

use realfft::{num_complex::Complex32, RealFftPlanner, RealToComplex};

use crate::{AirglowError, Result};

/// Gain applied before the perceptual square root when converting FFT
/// magnitudes to byte energies. Chosen so a full-scale windowed sine
/// saturates its bin.
const MAGNITUDE_GAIN: f32 = 8.0;

/// Read side of a frequency analyser. One call per animation frame:
/// `write_frequency_data` copies the most recent per-bin energies (0-255)
/// into the caller's buffer and has no other side effect.
pub trait SpectrumSource {
    /// Number of frequency bins exposed by the source.
    fn bin_count(&self) -> usize;

    /// Overwrites `out` with the current snapshot. If `out` is longer than
    /// the bin count the tail is zeroed; if shorter, the snapshot is
    /// truncated.
    fn write_frequency_data(&mut self, out: &mut [u8]);
}

/// Frequency analysis tap attached to the live audio source.
///
/// The FFT resolution is fixed at construction and never changes for the
/// lifetime of the node, so a running sampling loop can never observe a
/// resolution switch. The playback side feeds decoded sample blocks via
/// [`AnalyserNode::push_block`]; reading the spectrum is a synchronous
/// copy of the already-buffered result.
pub struct AnalyserNode {
    fft_size: usize,
    plan: Arc<dyn RealToComplex<f32>>,
    input: Vec<f32>,
    spectrum: Vec<Complex32>,
    scratch: Vec<Complex32>,
    bins: Vec<u8>,
    pending: Vec<f32>,
    processed_windows: u64,
}

impl AnalyserNode {
    /// Creates an analyser with the given FFT resolution. The resolution
    /// must be a power of two of at least 32 (observed variants use 256,
    /// 512 or 1024).
    pub fn new(fft_size: usize) -> Result<Self> {
        if !fft_size.is_power_of_two() || fft_size < 32 {
            return Err(AirglowError::msg(format!(
                "fft size must be a power of two >= 32, got {fft_size}"
            )));
        }

        let mut planner = RealFftPlanner::new();
        let plan = planner.plan_fft_forward(fft_size);
        let input = plan.make_input_vec();
        let spectrum = plan.make_output_vec();
        let scratch = plan.make_scratch_vec();

        Ok(Self {
            fft_size,
            plan,
            input,
            spectrum,
            scratch,
            bins: vec![0; fft_size / 2],
            pending: Vec::with_capacity(fft_size),
            processed_windows: 0,
        })
    }

    /// Returns the configured FFT resolution.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of complete analysis windows transformed so far.
    pub fn processed_windows(&self) -> u64 {
        self.processed_windows
    }

    /// Feeds a block of playback samples into the analyser. Samples are
    /// accumulated until a full window is available; each full window is
    /// Hann-windowed, transformed and folded into the byte spectrum.
    pub fn push_block(&mut self, samples: &[f32]) -> Result<()> {
        self.pending.extend_from_slice(samples);

        while self.pending.len() >= self.fft_size {
            let rest = self.pending.split_off(self.fft_size);
            for (index, value) in self.pending.iter().enumerate() {
                self.input[index] = *value * hann_value(index, self.fft_size);
            }
            self.pending = rest;

            self.plan
                .process_with_scratch(&mut self.input, &mut self.spectrum, &mut self.scratch)?;

            let norm = 1.0 / self.fft_size as f32;
            for (bin, out) in self.spectrum.iter().zip(self.bins.iter_mut()) {
                let magnitude = bin.norm() * norm;
                let energy = (magnitude * MAGNITUDE_GAIN).sqrt().min(1.0);
                *out = (energy * 255.0).round() as u8;
            }
            self.processed_windows += 1;
        }

        Ok(())
    }
}

impl SpectrumSource for AnalyserNode {
    fn bin_count(&self) -> usize {
        self.bins.len()
    }

    fn write_frequency_data(&mut self, out: &mut [u8]) {
        let n = out.len().min(self.bins.len());
        out[..n].copy_from_slice(&self.bins[..n]);
        for value in &mut out[n..] {
            *value = 0;
        }
    }
}

impl fmt::Debug for AnalyserNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyserNode")
            .field("fft_size", &self.fft_size)
            .field("processed_windows", &self.processed_windows)
            .finish()
    }
}

/// Create-if-absent holder for the analyser tap. The playback component
/// owns one slot per audio source; `get_or_create` builds the node exactly
/// once and hands back the cached node on every later call.
#[derive(Debug, Default)]
pub struct AnalyserSlot {
    node: Option<AnalyserNode>,
}

impl AnalyserSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the analyser, creating it on first use. A second call with a
    /// different `fft_size` keeps the existing node; the resolution of a
    /// live analyser is immutable.
    pub fn get_or_create(&mut self, fft_size: usize) -> Result<&mut AnalyserNode> {
        if self.node.is_none() {
            self.node = Some(AnalyserNode::new(fft_size)?);
            tracing::debug!(fft_size, "analyser node created");
        }

        let node = self.node.as_mut().expect("slot was just filled");
        if node.fft_size() != fft_size {
            tracing::debug!(
                requested = fft_size,
                active = node.fft_size(),
                "ignoring fft size change on live analyser"
            );
        }
        Ok(node)
    }

    pub fn get(&self) -> Option<&AnalyserNode> {
        self.node.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut AnalyserNode> {
        self.node.as_mut()
    }

    pub fn is_created(&self) -> bool {
        self.node.is_some()
    }

    /// Drops the node. Called when the owning audio source is torn down.
    pub fn clear(&mut self) {
        self.node = None;
    }
}

fn hann_value(index: usize, len: usize) -> f32 {
    if len <= 1 {
        return 1.0;
    }

    0.5 - 0.5 * ((2.0 * PI * index as f32) / (len as f32 - 1.0)).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(len: usize, cycles_per_window: f32) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * cycles_per_window * i as f32 / len as f32).sin() * 0.8)
            .collect()
    }

    #[test]
    fn rejects_non_power_of_two_sizes() {
        assert!(AnalyserNode::new(500).is_err());
        assert!(AnalyserNode::new(0).is_err());
        assert!(AnalyserNode::new(512).is_ok());
    }

    #[test]
    fn bin_count_is_half_the_fft_size() {
        let node = AnalyserNode::new(256).unwrap();
        assert_eq!(node.bin_count(), 128);
    }

    #[test]
    fn silence_produces_all_zero_bins() {
        let mut node = AnalyserNode::new(256).unwrap();
        node.push_block(&vec![0.0; 512]).unwrap();

        let mut out = vec![255u8; node.bin_count()];
        node.write_frequency_data(&mut out);
        assert!(out.iter().all(|&v| v == 0));
    }

    #[test]
    fn tone_lights_up_its_bin() {
        let mut node = AnalyserNode::new(256).unwrap();
        node.push_block(&tone(256, 16.0)).unwrap();

        let mut out = vec![0u8; node.bin_count()];
        node.write_frequency_data(&mut out);

        let peak_bin = out
            .iter()
            .enumerate()
            .max_by_key(|(_, &v)| v)
            .map(|(i, _)| i)
            .unwrap();
        assert!(out[peak_bin] > 0);
        assert!((peak_bin as i64 - 16).unsigned_abs() <= 1);
    }

    #[test]
    fn partial_blocks_accumulate_until_a_window_fills() {
        let mut node = AnalyserNode::new(256).unwrap();
        node.push_block(&tone(200, 8.0)).unwrap();
        assert_eq!(node.processed_windows(), 0);

        node.push_block(&tone(56, 8.0)).unwrap();
        assert_eq!(node.processed_windows(), 1);
    }

    #[test]
    fn snapshot_read_is_truncated_or_padded_to_the_buffer() {
        let mut node = AnalyserNode::new(256).unwrap();
        node.push_block(&tone(256, 16.0)).unwrap();

        let mut short = vec![0u8; 10];
        node.write_frequency_data(&mut short);

        let mut long = vec![9u8; 200];
        node.write_frequency_data(&mut long);
        assert!(long[128..].iter().all(|&v| v == 0));
    }

    #[test]
    fn slot_creates_the_node_exactly_once() {
        let mut slot = AnalyserSlot::new();
        assert!(!slot.is_created());

        slot.get_or_create(512).unwrap();
        assert!(slot.is_created());

        // A different resolution must not replace the live node.
        let node = slot.get_or_create(1024).unwrap();
        assert_eq!(node.fft_size(), 512);

        slot.clear();
        assert!(!slot.is_created());
    }
}
