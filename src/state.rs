use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::charts;
use crate::config::{DashboardConfig, HypothesisExport};
use crate::error::{DashboardError, Result};
use crate::first_click::{self, ClickTestResult};
use crate::hypotheses;
use crate::journey::build_journey;
use crate::models::{
    CustomerRecord, DatasetSource, HypothesisResult, JourneyMap, Persona, ResearchMode,
    ResearchSnapshot,
};
use crate::personas::build_personas;
use crate::report::{self, ReportContent};
use crate::research;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Overview,
    Personas,
    Journey,
    Research,
    Hypotheses,
    FirstClick,
    Report,
}

/// Paths written by one report export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub report_id: Uuid,
    pub pdf: PathBuf,
    pub markdown: PathBuf,
    pub age_chart: PathBuf,
}

pub struct AppState {
    pub config: DashboardConfig,
    pub active_view: ActiveView,
    source: DatasetSource,
    records: Vec<CustomerRecord>,
    personas: Vec<Persona>,
    journeys: HashMap<String, JourneyMap>,
    hypotheses: BTreeMap<String, HypothesisResult>,
    rng: StdRng,
}

impl AppState {
    pub fn new(config: DashboardConfig, records: Vec<CustomerRecord>, source: DatasetSource) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(rows = records.len(), source = %source, "dataset loaded");
        Self {
            config,
            active_view: ActiveView::Overview,
            source,
            records,
            personas: Vec::new(),
            journeys: HashMap::new(),
            hypotheses: BTreeMap::new(),
            rng,
        }
    }

    /// Replace the dataset and drop everything derived from the old one.
    /// The one-shot CLI never re-uploads within a session.
    #[allow(dead_code)]
    pub fn load_dataset(&mut self, records: Vec<CustomerRecord>, source: DatasetSource) {
        info!(rows = records.len(), source = %source, "dataset loaded");
        self.records = records;
        self.source = source;
        self.personas.clear();
        self.journeys.clear();
        self.hypotheses.clear();
        self.active_view = ActiveView::Overview;
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    fn ensure_personas(&mut self) -> Result<()> {
        if self.personas.is_empty() {
            self.personas = build_personas(&self.records)?;
        }
        Ok(())
    }

    pub fn show_personas(&mut self) -> Result<&[Persona]> {
        self.active_view = ActiveView::Personas;
        self.ensure_personas()?;
        Ok(&self.personas)
    }

    /// Journey map for the 1-based persona `number`, cached by persona name.
    pub fn show_journey(&mut self, number: usize) -> Result<&JourneyMap> {
        self.active_view = ActiveView::Journey;
        self.ensure_personas()?;
        let persona = number
            .checked_sub(1)
            .and_then(|index| self.personas.get(index))
            .ok_or(DashboardError::InvalidLimit {
                limit: number as i64,
            })?;

        let journey: &JourneyMap = self
            .journeys
            .entry(persona.name.clone())
            .or_insert_with(|| {
                debug!(persona = %persona.name, "journey cache miss");
                build_journey(persona)
            });
        Ok(journey)
    }

    pub fn render_journey_timeline(&mut self, number: usize) -> Result<PathBuf> {
        let out_path = self.output_path(charts::TIMELINE_FILE)?;
        let journey = self.show_journey(number)?;
        charts::render_timeline(journey, &out_path)?;
        Ok(out_path)
    }

    pub fn run_research(&mut self, mode: ResearchMode, interview_limit: i64) -> Result<ResearchSnapshot> {
        self.active_view = ActiveView::Research;
        research::simulate(mode, &self.records, interview_limit, &mut self.rng)
    }

    pub fn score_hypotheses(&mut self, input: &[String]) -> Result<&BTreeMap<String, HypothesisResult>> {
        self.active_view = ActiveView::Hypotheses;
        self.hypotheses = hypotheses::score(input, &mut self.rng)?;
        Ok(&self.hypotheses)
    }

    pub fn run_first_click(&mut self, image_path: &Path, clicks: usize) -> Result<(ClickTestResult, PathBuf)> {
        self.active_view = ActiveView::FirstClick;
        let size = charts::image_dimensions(image_path)?;
        let result = first_click::simulate_clicks(size, clicks, &self.config.click_test, &mut self.rng)?;
        let out_path = self.output_path(charts::HEATMAP_FILE)?;
        charts::render_click_heatmap(image_path, &result.histogram, &out_path)?;
        Ok((result, out_path))
    }

    /// Write the PDF report, its Markdown twin and the age chart. Journey
    /// maps come from the cache; missing ones are built first.
    pub fn export_report(&mut self, selected: &[String], export: HypothesisExport) -> Result<ExportedReport> {
        self.active_view = ActiveView::Report;
        self.ensure_personas()?;
        for persona in &self.personas {
            self.journeys
                .entry(persona.name.clone())
                .or_insert_with(|| {
                    debug!(persona = %persona.name, "journey cache miss during export");
                    build_journey(persona)
                });
        }

        let age_chart = self.output_path(charts::AGE_CHART_FILE)?;
        let pdf = self.output_path(report::PDF_FILE)?;
        let markdown = self.output_path(report::MARKDOWN_FILE)?;

        let journeys: Vec<&JourneyMap> = self
            .personas
            .iter()
            .filter_map(|persona| self.journeys.get(&persona.name))
            .collect();
        let content = ReportContent {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            source: &self.source,
            personas: &self.personas,
            journeys,
            hypotheses: hypotheses::select_for_export(&self.hypotheses, export, selected),
            age_chart: Some(age_chart.clone()),
        };

        // Markdown first: it does not depend on fonts.
        report::write_markdown(&content, &markdown)?;
        charts::render_age_distribution(&self.records, &age_chart)?;
        report::render_pdf(&content, &self.config.report, &pdf)?;

        Ok(ExportedReport {
            report_id: content.report_id,
            pdf,
            markdown,
            age_chart,
        })
    }

    fn output_path(&self, file_name: &str) -> Result<PathBuf> {
        let dir = &self.config.output.dir;
        std::fs::create_dir_all(dir).map_err(|err| DashboardError::export(dir, err))?;
        Ok(dir.join(file_name))
    }
}
