use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::models::{CustomerRecord, ResearchMode, ResearchSnapshot};
use crate::personas::most_frequent;

pub const THEME_COUNT: usize = 3;
pub const SATISFACTION_RANGE: (f64, f64) = (3.0, 5.0);
pub const NPS_RANGE: (i32, i32) = (-100, 100);

pub fn simulate(
    mode: ResearchMode,
    pool: &[CustomerRecord],
    interview_limit: i64,
    rng: &mut impl Rng,
) -> Result<ResearchSnapshot> {
    match mode {
        ResearchMode::Qualitative => qualitative(pool, interview_limit, rng),
        ResearchMode::Quantitative => Ok(quantitative(pool, rng)),
    }
}

fn qualitative(
    pool: &[CustomerRecord],
    interview_limit: i64,
    rng: &mut impl Rng,
) -> Result<ResearchSnapshot> {
    if interview_limit <= 0 {
        return Err(DashboardError::InvalidLimit {
            limit: interview_limit,
        });
    }
    if pool.is_empty() {
        return Err(DashboardError::EmptyDataset);
    }

    // Sampling with replacement.
    let interviews: Vec<String> = (0..interview_limit)
        .filter_map(|_| pool.choose(&mut *rng))
        .map(|record| record.pain_point.clone())
        .collect();
    let themes = most_frequent(interviews.iter().map(String::as_str), THEME_COUNT);

    debug!(interviews = interviews.len(), themes = themes.len(), "qualitative research simulated");
    Ok(ResearchSnapshot::Qualitative { interviews, themes })
}

fn quantitative(pool: &[CustomerRecord], rng: &mut impl Rng) -> ResearchSnapshot {
    let satisfaction = round_to(
        rng.gen_range(SATISFACTION_RANGE.0..=SATISFACTION_RANGE.1),
        2,
    );
    let nps = rng.gen_range(NPS_RANGE.0..=NPS_RANGE.1);

    ResearchSnapshot::Quantitative {
        satisfaction,
        nps,
        sample_size: pool.len(),
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
