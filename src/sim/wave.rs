//! Procedural swell
//!
//! The ocean surface is a closed-form sum of sinusoids over a square grid.
//! Every term shares the same time variable so the whole field advances
//! coherently; the per-session offset only shifts phase.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Amplitude of each swell term as a fraction of wave intensity
pub const TERM_WEIGHTS: [f32; 7] = [
    1.0,  // long x swell
    0.6,  // secondary x swell
    0.8,  // y swell
    0.4,  // slow y swell
    0.3,  // diagonal
    0.05, // micro-ripple
    0.5,  // directional
];

/// A single evaluated point of the height field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveSample {
    pub x: f32,
    pub z: f32,
    pub height: f32,
}

impl WaveSample {
    /// Squared horizontal distance to a point
    #[inline]
    pub fn distance_sq(&self, x: f32, z: f32) -> f32 {
        let dx = self.x - x;
        let dz = self.z - z;
        dx * dx + dz * dz
    }
}

/// Peaks and troughs inside the gameplay region for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveSnapshot {
    pub peaks: Vec<WaveSample>,
    pub troughs: Vec<WaveSample>,
}

impl WaveSnapshot {
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty() && self.troughs.is_empty()
    }

    /// Nearest peak within `radius` of (x, z)
    pub fn nearest_peak(&self, x: f32, z: f32, radius: f32) -> Option<&WaveSample> {
        nearest_within(&self.peaks, x, z, radius)
    }

    /// Nearest trough within `radius` of (x, z)
    pub fn nearest_trough(&self, x: f32, z: f32, radius: f32) -> Option<&WaveSample> {
        nearest_within(&self.troughs, x, z, radius)
    }
}

fn nearest_within(samples: &[WaveSample], x: f32, z: f32, radius: f32) -> Option<&WaveSample> {
    let radius_sq = radius * radius;
    samples
        .iter()
        .map(|s| (s, s.distance_sq(x, z)))
        .filter(|(_, d)| *d <= radius_sq)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(s, _)| s)
}

/// Grid vertex handed to the renderer for mesh deformation
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct HeightVertex {
    /// (x, height, z) in field units, before the ocean offset is applied
    pub position: [f32; 3],
}

/// Height of the swell at field coordinates (x, y) and phase time `t`
pub fn swell_height(x: f32, y: f32, t: f32, intensity: f32) -> f32 {
    let w = TERM_WEIGHTS;
    let sum = w[0] * (0.5 * x + 0.7 * t).sin()
        + w[1] * (0.3 * x + 0.5 * t).sin()
        + w[2] * (0.4 * y + 0.6 * t).cos()
        + w[3] * (0.2 * y + 0.3 * t).sin()
        + w[4] * (0.1 * x + 0.1 * y + 0.4 * t).sin()
        + w[5] * (3.0 * x + 3.0 * y + 2.0 * t).sin()
        + w[6] * (0.8 * y + 1.2 * t).sin() * (0.2 * x).cos();
    sum * intensity
}

/// Procedural wave-height field sampled once per frame
#[derive(Debug, Clone)]
pub struct WaveField {
    time_offset: f32,
    resolution: usize,
    extent: f32,
    heights: Vec<HeightVertex>,
}

impl WaveField {
    pub fn new(time_offset: f32) -> Self {
        Self::with_grid(time_offset, WAVE_GRID_EXTENT, WAVE_GRID_RESOLUTION)
    }

    /// Build a field over a custom `extent` x `extent` grid with `resolution` samples per side
    pub fn with_grid(time_offset: f32, extent: f32, resolution: usize) -> Self {
        let resolution = resolution.max(2);
        let step = extent / (resolution - 1) as f32;
        let half = extent / 2.0;

        let mut heights = Vec::with_capacity(resolution * resolution);
        for row in 0..resolution {
            for col in 0..resolution {
                let x = col as f32 * step - half;
                let z = row as f32 * step - half;
                heights.push(HeightVertex {
                    position: [x, 0.0, z],
                });
            }
        }

        Self {
            time_offset: if time_offset.is_finite() { time_offset } else { 0.0 },
            resolution,
            extent,
            heights,
        }
    }

    pub fn time_offset(&self) -> f32 {
        self.time_offset
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Grid heights from the most recent `sample` call (row-major, z then x)
    pub fn heights(&self) -> &[HeightVertex] {
        &self.heights
    }

    /// Raw bytes of the height grid for vertex-buffer upload
    pub fn height_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.heights)
    }

    /// Exact swell height at (x, z) for elapsed session time `time`
    pub fn height_at(&self, x: f32, z: f32, time: f32, intensity: f32) -> f32 {
        swell_height(x, z, time + self.time_offset, intensity)
    }

    /// Evaluate the whole grid at `time` and classify the gameplay region.
    ///
    /// Intensity is clamped to [0, 1]; zero intensity yields a flat grid and
    /// an empty snapshot.
    pub fn sample(&mut self, time: f32, intensity: f32) -> WaveSnapshot {
        let intensity = sanitize_intensity(intensity);
        let t = if time.is_finite() { time } else { 0.0 } + self.time_offset;
        let threshold = CLASSIFY_THRESHOLD * intensity;

        let mut snapshot = WaveSnapshot::default();
        for vertex in &mut self.heights {
            let [x, _, z] = vertex.position;
            let height = swell_height(x, z, t, intensity);
            vertex.position[1] = height;

            if intensity <= 0.0
                || x.abs() >= GAMEPLAY_REGION_HALF
                || z.abs() >= GAMEPLAY_REGION_HALF
            {
                continue;
            }
            if height > threshold {
                snapshot.peaks.push(WaveSample { x, z, height });
            } else if height < -threshold {
                snapshot.troughs.push(WaveSample { x, z, height });
            }
        }
        snapshot
    }
}

/// Clamp intensity into [0, 1], treating non-finite input as calm water
#[inline]
pub fn sanitize_intensity(intensity: f32) -> f32 {
    if intensity.is_finite() {
        intensity.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
