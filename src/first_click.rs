//! Simulated first-click test.
//!
//! Click positions are uniform random draws, so the heatmap, zone split and
//! clarity score are a statistical toy. They say nothing about where real
//! users would click.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::config::ClickTestConfig;
use crate::error::{DashboardError, Result};
use crate::models::ZoneBreakdown;
use crate::research::round_to;

/// Pixel size of one histogram cell along each axis.
pub const CELL_PX: u32 = 10;
pub const CSI_RANGE: (f64, f64) = (3.5, 5.0);
pub const NPS_RANGE: (i32, i32) = (40, 80);

/// Click counts over a grid laid across the image, row-major.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClickHistogram {
    pub bins_x: usize,
    pub bins_y: usize,
    pub counts: Vec<u32>,
}

impl ClickHistogram {
    pub fn build(image_size: (u32, u32), coordinates: &[(u32, u32)]) -> Self {
        let (width, height) = image_size;
        let bins_x = (width / CELL_PX).max(1) as usize;
        let bins_y = (height / CELL_PX).max(1) as usize;
        let mut counts = vec![0u32; bins_x * bins_y];

        for &(x, y) in coordinates {
            let bx = (x as u64 * bins_x as u64 / width as u64) as usize;
            let by = (y as u64 * bins_y as u64 / height as u64) as usize;
            counts[by.min(bins_y - 1) * bins_x + bx.min(bins_x - 1)] += 1;
        }

        Self {
            bins_x,
            bins_y,
            counts,
        }
    }

    pub fn get(&self, bx: usize, by: usize) -> u32 {
        self.counts[by * self.bins_x + bx]
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Population standard deviation of the cell counts.
    pub fn std_dev(&self) -> f64 {
        if self.counts.is_empty() {
            return 0.0;
        }
        let n = self.counts.len() as f64;
        let mean = self.counts.iter().map(|&c| c as f64).sum::<f64>() / n;
        let variance = self
            .counts
            .iter()
            .map(|&c| (c as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        variance.sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClickTestResult {
    pub image_size: (u32, u32),
    pub coordinates: Vec<(u32, u32)>,
    pub clarity_score: f64,
    pub zones: ZoneBreakdown,
    /// Illustrative satisfaction index shown next to the heatmap.
    pub csi: f64,
    /// Illustrative loyalty score shown next to the heatmap.
    pub nps: i32,
    #[serde(skip)]
    pub histogram: ClickHistogram,
}

/// Clamp a requested click count into the configured range.
pub fn effective_click_count(requested: usize, limits: &ClickTestConfig) -> Result<usize> {
    if requested == 0 {
        return Err(DashboardError::InvalidLimit { limit: 0 });
    }
    Ok(requested.clamp(limits.min_clicks, limits.max_clicks))
}

pub fn simulate_clicks(
    image_size: (u32, u32),
    count: usize,
    limits: &ClickTestConfig,
    rng: &mut impl Rng,
) -> Result<ClickTestResult> {
    let (width, height) = image_size;
    if width == 0 || height == 0 {
        return Err(DashboardError::InvalidLimit { limit: 0 });
    }
    let count = effective_click_count(count, limits)?;

    let coordinates: Vec<(u32, u32)> = (0..count)
        .map(|_| (rng.gen_range(0..width), rng.gen_range(0..height)))
        .collect();

    let histogram = ClickHistogram::build(image_size, &coordinates);
    let clarity_score = clarity_score(&histogram);
    let zones = zone_breakdown(height, &coordinates);
    debug!(count, clarity_score, "simulated first clicks");

    Ok(ClickTestResult {
        image_size,
        coordinates,
        clarity_score,
        zones,
        csi: round_to(rng.gen_range(CSI_RANGE.0..=CSI_RANGE.1), 2),
        nps: rng.gen_range(NPS_RANGE.0..=NPS_RANGE.1),
        histogram,
    })
}

/// Tighter clusters give a lower histogram spread and a higher score.
pub fn clarity_score(histogram: &ClickHistogram) -> f64 {
    round_to((100.0 - histogram.std_dev() * 2.0).clamp(0.0, 100.0), 1)
}

pub fn zone_breakdown(height: u32, coordinates: &[(u32, u32)]) -> ZoneBreakdown {
    if coordinates.is_empty() {
        return ZoneBreakdown {
            top: 0.0,
            middle: 0.0,
            bottom: 0.0,
        };
    }

    let third = height as f64 / 3.0;
    let (mut top, mut middle, mut bottom) = (0usize, 0usize, 0usize);
    for &(_, y) in coordinates {
        let y = y as f64;
        if y < third {
            top += 1;
        } else if y < 2.0 * third {
            middle += 1;
        } else {
            bottom += 1;
        }
    }

    let total = coordinates.len() as f64;
    let pct = |n: usize| round_to(n as f64 / total * 100.0, 1);
    ZoneBreakdown {
        top: pct(top),
        middle: pct(middle),
        bottom: pct(bottom),
    }
}
