use std::error::Error;
use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::error::{DashboardError, Result};
use crate::first_click::ClickHistogram;
use crate::models::{CustomerRecord, JourneyMap};

pub const TIMELINE_FILE: &str = "journey_timeline.png";
pub const AGE_CHART_FILE: &str = "age_distribution.png";
pub const HEATMAP_FILE: &str = "first_click_heatmap.png";

const AGE_BINS: u64 = 10;
const STAGE_COLORS: [RGBColor; 5] = [
    RGBColor(66, 133, 244),
    RGBColor(52, 168, 83),
    RGBColor(251, 188, 5),
    RGBColor(234, 67, 53),
    RGBColor(142, 68, 173),
];

type DrawResult = std::result::Result<(), Box<dyn Error>>;

/// Width and height of an uploaded mockup.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32)> {
    let (width, height) =
        image::image_dimensions(path).map_err(|err| DashboardError::unsupported(path, err))?;
    if width == 0 || height == 0 {
        return Err(DashboardError::unsupported(path, "image has no pixels"));
    }
    Ok((width, height))
}

pub fn render_timeline(journey: &JourneyMap, out_path: &Path) -> Result<()> {
    draw_timeline(journey, out_path).map_err(|err| DashboardError::export(out_path, err))?;
    info!(path = %out_path.display(), persona = %journey.persona_name, "timeline written");
    Ok(())
}

fn draw_timeline(journey: &JourneyMap, out_path: &Path) -> DrawResult {
    let root = BitMapBackend::new(out_path, (1200, 220)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(
        &format!("Customer Journey: {}", journey.persona_name),
        ("sans-serif", 24),
    )?;

    let cells = root.margin(10, 10, 10, 10).split_evenly((1, journey.stages.len().max(1)));
    for (index, (area, stage)) in cells.iter().zip(&journey.stages).enumerate() {
        let color = STAGE_COLORS[index % STAGE_COLORS.len()];
        area.fill(&color.mix(0.25))?;
        let (w, h) = area.dim_in_pixel();
        area.draw(&Rectangle::new(
            [(0, 0), (w as i32 - 4, h as i32 - 1)],
            color.stroke_width(2),
        ))?;
        area.draw(&Text::new(
            stage.stage.as_str(),
            (12, 14),
            ("sans-serif", 22).into_font().style(FontStyle::Bold),
        ))?;
        area.draw(&Text::new(
            format!("{} pain point(s)", stage.pain_points.len()),
            (12, h as i32 - 34),
            ("sans-serif", 16).into_font(),
        ))?;
    }

    root.present()?;
    Ok(())
}

pub fn render_age_distribution(records: &[CustomerRecord], out_path: &Path) -> Result<()> {
    if records.is_empty() {
        return Err(DashboardError::EmptyDataset);
    }
    draw_age_distribution(records, out_path)
        .map_err(|err| DashboardError::export(out_path, err))?;
    info!(path = %out_path.display(), "age distribution written");
    Ok(())
}

/// Lower bound and width of the equal-width age bins. Computed in `u64` so
/// the full `u32` age range fits.
pub fn age_bins(records: &[CustomerRecord]) -> (u64, u64) {
    let min = records.iter().map(|r| r.age).min().unwrap_or(0) as u64;
    let max = records.iter().map(|r| r.age).max().unwrap_or(0) as u64;
    let width = (max - min + 1).div_ceil(AGE_BINS).max(1);
    (min, width)
}

/// Start of the bin holding `age`.
fn age_bucket(age: u32, low: u64, width: u64) -> u64 {
    low + (age as u64 - low) / width * width
}

fn draw_age_distribution(records: &[CustomerRecord], out_path: &Path) -> DrawResult {
    let (low, width) = age_bins(records);
    let high = low + width * AGE_BINS;
    let bucket = |age: u32| age_bucket(age, low, width);

    let mut tallest = 0u32;
    for start in (low..high).step_by(width as usize) {
        let n = records.iter().filter(|r| bucket(r.age) == start).count() as u32;
        tallest = tallest.max(n);
    }

    let root = BitMapBackend::new(out_path, (800, 480)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Age Distribution", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((low..high).into_segmented(), 0u32..tallest + 1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Age")
        .y_desc("Number of Customers")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.7).filled())
            .margin(2)
            .data(records.iter().map(|r| (bucket(r.age), 1u32))),
    )?;

    root.present()?;
    Ok(())
}

/// "Hot" colour ramp: black, red, yellow, white.
fn heat_color(t: f64) -> RGBColor {
    let channel = |offset: f64| ((3.0 * t - offset).clamp(0.0, 1.0) * 255.0) as u8;
    RGBColor(channel(0.0), channel(1.0), channel(2.0))
}

/// Paint the click histogram over the uploaded image.
pub fn render_click_heatmap(
    image_path: &Path,
    histogram: &ClickHistogram,
    out_path: &Path,
) -> Result<()> {
    let base = image::open(image_path)
        .map_err(|err| DashboardError::unsupported(image_path, err))?
        .to_rgb8();
    let (width, height) = base.dimensions();
    let mut buffer = base.into_raw();

    draw_heat_cells(&mut buffer, (width, height), histogram)
        .map_err(|err| DashboardError::export(out_path, err))?;

    let overlay = image::RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| DashboardError::export(out_path, "heatmap buffer has the wrong size"))?;
    overlay
        .save(out_path)
        .map_err(|err| DashboardError::export(out_path, err))?;
    info!(path = %out_path.display(), "heatmap written");
    Ok(())
}

fn draw_heat_cells(buffer: &mut [u8], size: (u32, u32), histogram: &ClickHistogram) -> DrawResult {
    let (width, height) = size;
    let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
    let peak = histogram.max_count().max(1) as f64;
    let edge = |i: usize, bins: usize, extent: u32| (i as u64 * extent as u64 / bins as u64) as i32;

    for by in 0..histogram.bins_y {
        for bx in 0..histogram.bins_x {
            let count = histogram.get(bx, by);
            if count == 0 {
                continue;
            }
            let corners = [
                (edge(bx, histogram.bins_x, width), edge(by, histogram.bins_y, height)),
                (
                    edge(bx + 1, histogram.bins_x, width),
                    edge(by + 1, histogram.bins_y, height),
                ),
            ];
            let color = heat_color(count as f64 / peak).mix(0.55);
            root.draw(&Rectangle::new(corners, color.filled()))?;
        }
    }

    root.present()?;
    Ok(())
}
