//! Reduction of a raw frequency snapshot into per-bar energies and the
//! three semantic band averages that drive the glow color.

/// Reduces an N-bin snapshot to exactly `bar_count` values in [0, 1].
///
/// The snapshot is partitioned into `bar_count` equal slices of
/// `floor(N / bar_count)` bins; the last bar absorbs any remainder. Each
/// bar is the arithmetic mean of its slice divided by 255, raised to
/// `shape_exponent` to bias emphasis toward louder transients. An empty
/// slice (possible when N < bar_count) yields 0.0.
pub fn bar_energies(snapshot: &[u8], bar_count: usize, shape_exponent: f32) -> Vec<f32> {
    let mut bars = Vec::with_capacity(bar_count);
    if bar_count == 0 {
        return bars;
    }

    let step = snapshot.len() / bar_count;
    for i in 0..bar_count {
        let start = (i * step).min(snapshot.len());
        let end = if i + 1 == bar_count {
            snapshot.len()
        } else {
            (start + step).min(snapshot.len())
        };
        bars.push(shape(slice_average(&snapshot[start..end]), shape_exponent));
    }

    bars
}

/// Averages of the low, mid and high regions of a snapshot, each in [0, 1].
/// Bass covers the first quartile of bins, mid the second, high the rest.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandAverages {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
}

impl BandAverages {
    pub fn from_snapshot(snapshot: &[u8]) -> Self {
        let quartile = snapshot.len() / 4;
        Self {
            bass: slice_average(&snapshot[..quartile]),
            mid: slice_average(&snapshot[quartile..(2 * quartile).min(snapshot.len())]),
            high: slice_average(&snapshot[(2 * quartile).min(snapshot.len())..]),
        }
    }

    pub fn silence() -> Self {
        Self::default()
    }
}

fn slice_average(slice: &[u8]) -> f32 {
    if slice.is_empty() {
        return 0.0;
    }

    let sum: u32 = slice.iter().map(|&v| u32::from(v)).sum();
    sum as f32 / slice.len() as f32 / 255.0
}

fn shape(value: f32, exponent: f32) -> f32 {
    if (exponent - 1.0).abs() < f32::EPSILON {
        value
    } else {
        value.powf(exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_returns_exactly_the_requested_bar_count() {
        for n in [0usize, 1, 3, 4, 100, 256] {
            let snapshot = vec![128u8; n];
            for b in [1usize, 2, 7, 96, 300] {
                assert_eq!(bar_energies(&snapshot, b, 1.0).len(), b, "n={n} b={b}");
            }
        }
    }

    #[test]
    fn full_scale_snapshot_averages_to_one() {
        let bars = bar_energies(&[255, 255, 255, 255], 2, 1.0);
        assert_eq!(bars, vec![1.0, 1.0]);
    }

    #[test]
    fn silent_snapshot_averages_to_zero() {
        let bars = bar_energies(&[0, 0, 0, 0], 2, 1.5);
        assert_eq!(bars, vec![0.0, 0.0]);
        assert_eq!(BandAverages::from_snapshot(&[0; 16]), BandAverages::silence());
    }

    #[test]
    fn last_bar_absorbs_the_remainder() {
        // 10 bins over 3 bars: slices of 3, 3 and 4.
        let snapshot = [0, 0, 0, 0, 0, 0, 255, 255, 255, 255];
        let bars = bar_energies(&snapshot, 3, 1.0);
        assert_eq!(bars[0], 0.0);
        assert_eq!(bars[1], 0.0);
        assert_eq!(bars[2], 1.0);
    }

    #[test]
    fn more_bars_than_bins_yields_zero_not_a_fault() {
        let bars = bar_energies(&[255, 255], 5, 1.0);
        assert_eq!(bars.len(), 5);
        // step is 0, so all non-final slices are empty.
        assert!(bars[..4].iter().all(|&v| v == 0.0));
        assert_eq!(bars[4], 1.0);
    }

    #[test]
    fn shaping_is_applied_after_averaging() {
        let flat = bar_energies(&[128; 8], 2, 1.0);
        let shaped = bar_energies(&[128; 8], 2, 1.5);
        assert!(shaped[0] < flat[0]);
        assert!((shaped[0] - flat[0].powf(1.5)).abs() < 1e-6);
    }

    #[test]
    fn band_averages_split_by_quartile() {
        let mut snapshot = vec![0u8; 16];
        for bin in snapshot.iter_mut().take(4) {
            *bin = 255;
        }
        let bands = BandAverages::from_snapshot(&snapshot);
        assert_eq!(bands.bass, 1.0);
        assert_eq!(bands.mid, 0.0);
        assert_eq!(bands.high, 0.0);
    }

    #[test]
    fn band_averages_on_short_snapshots() {
        let bands = BandAverages::from_snapshot(&[255, 255]);
        // Fewer than four bins: everything lands in the high region.
        assert_eq!(bands.bass, 0.0);
        assert_eq!(bands.mid, 0.0);
        assert_eq!(bands.high, 1.0);
    }
}
