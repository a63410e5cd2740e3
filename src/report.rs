use std::fmt::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use genpdf::elements::{Break, FrameCellDecorator, Image, Paragraph, TableLayout};
use genpdf::style::{Style, StyledString};
use genpdf::{Alignment, Document, Element, SimplePageDecorator};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ReportConfig;
use crate::error::{DashboardError, Result};
use crate::models::{DatasetSource, HypothesisResult, JourneyMap, Persona};

pub const PDF_FILE: &str = "ux_report.pdf";
pub const MARKDOWN_FILE: &str = "ux_report.md";

pub const RECOMMENDATIONS: [&str; 3] = [
    "Improve usability based on feedback.",
    "Focus on high-impact hypotheses.",
    "Streamline the onboarding process.",
];

// "" is the working directory.
const FONT_DIRS: [&str; 5] = [
    "",
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/TTF",
    "/Library/Fonts",
];

/// Everything that goes into one exported report.
pub struct ReportContent<'a> {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub source: &'a DatasetSource,
    pub personas: &'a [Persona],
    pub journeys: Vec<&'a JourneyMap>,
    pub hypotheses: Vec<&'a HypothesisResult>,
    pub age_chart: Option<PathBuf>,
}

pub fn build_markdown(content: &ReportContent<'_>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# UX Research Report");
    let _ = writeln!(
        output,
        "Generated {} from {} (report {})",
        content.generated_at.format("%Y-%m-%d %H:%M UTC"),
        content.source,
        content.report_id
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Personas");

    if content.personas.is_empty() {
        let _ = writeln!(output, "No personas were built for this dataset.");
    } else {
        for persona in content.personas {
            let _ = writeln!(
                output,
                "- {} (Segment: {}, Age: {}) needs: {}; pain points: {}",
                persona.name,
                persona.segment,
                persona.age_range,
                persona.common_needs.join(", "),
                persona.common_pain_points.join(", ")
            );
        }
    }

    for journey in &content.journeys {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Journey Map: {}", journey.persona_name);
        let _ = writeln!(output, "| Stage | Goals | Touchpoints | Pain points |");
        let _ = writeln!(output, "|---|---|---|---|");
        for stage in &journey.stages {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} |",
                stage.stage,
                stage.goals.join("; "),
                stage.touchpoints.join("; "),
                stage.pain_points.join("; ")
            );
        }
    }

    if !content.hypotheses.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Hypotheses");
        for result in &content.hypotheses {
            let _ = writeln!(
                output,
                "- {}: confidence {:.0}%, impact {}, recommendation {}",
                result.hypothesis,
                result.confidence * 100.0,
                result.impact,
                result.recommendation
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendations");
    for recommendation in RECOMMENDATIONS {
        let _ = writeln!(output, "- {recommendation}");
    }

    output
}

fn load_fonts(config: &ReportConfig) -> Result<genpdf::fonts::FontFamily<genpdf::fonts::FontData>> {
    let family = config.font_family.as_str();
    if let Some(dir) = &config.font_dir {
        return genpdf::fonts::from_files(dir, family, None).map_err(|err| {
            DashboardError::export(dir, format!("cannot load font {family}: {err}"))
        });
    }

    for dir in FONT_DIRS {
        match genpdf::fonts::from_files(dir, family, None) {
            Ok(fonts) => return Ok(fonts),
            Err(err) => warn!(dir, family, error = %err, "font not found"),
        }
    }
    Err(DashboardError::export(
        Path::new(PDF_FILE),
        format!("no {family} font found; set report.font_dir"),
    ))
}

fn bold(text: impl Into<String>, size: u8) -> StyledString {
    StyledString::new(text.into(), Style::new().bold().with_font_size(size))
}

pub fn render_pdf(content: &ReportContent<'_>, config: &ReportConfig, out_path: &Path) -> Result<()> {
    let fonts = load_fonts(config)?;
    let to_export = |err: genpdf::error::Error| DashboardError::export(out_path, err);

    let mut doc = Document::new(fonts);
    doc.set_title("UX Research Report");
    doc.set_font_size(11);
    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(15);
    doc.set_page_decorator(decorator);

    doc.push(Paragraph::new(bold("UX Research Report", 18)).aligned(Alignment::Center));
    doc.push(
        Paragraph::new(format!(
            "Generated {} from {} (report {})",
            content.generated_at.format("%Y-%m-%d %H:%M UTC"),
            content.source,
            content.report_id
        ))
        .aligned(Alignment::Center),
    );
    doc.push(Break::new(1));

    doc.push(Paragraph::new(bold("Personas:", 12)));
    for persona in content.personas {
        doc.push(Paragraph::new(format!(
            "- {} (Segment: {}, Age: {})",
            persona.name, persona.segment, persona.age_range
        )));
    }
    doc.push(Break::new(0.5));

    for journey in &content.journeys {
        doc.push(Paragraph::new(bold(
            format!("Journey Map: {}", journey.persona_name),
            12,
        )));
        let mut table = TableLayout::new(vec![2, 3, 3, 3]);
        table.set_cell_decorator(FrameCellDecorator::new(true, true, false));
        table
            .row()
            .element(Paragraph::new(bold("Stage", 10)).padded(1))
            .element(Paragraph::new(bold("Goals", 10)).padded(1))
            .element(Paragraph::new(bold("Touchpoints", 10)).padded(1))
            .element(Paragraph::new(bold("Pain points", 10)).padded(1))
            .push()
            .map_err(to_export)?;
        for stage in &journey.stages {
            table
                .row()
                .element(Paragraph::new(stage.stage.as_str()).padded(1))
                .element(Paragraph::new(stage.goals.join("; ")).padded(1))
                .element(Paragraph::new(stage.touchpoints.join("; ")).padded(1))
                .element(Paragraph::new(stage.pain_points.join("; ")).padded(1))
                .push()
                .map_err(to_export)?;
        }
        doc.push(table);
        doc.push(Break::new(0.5));
    }

    if !content.hypotheses.is_empty() {
        doc.push(Paragraph::new(bold("Hypotheses:", 12)));
        for result in &content.hypotheses {
            doc.push(Paragraph::new(format!(
                "- {}: confidence {:.0}%, impact {}, recommendation {}",
                result.hypothesis,
                result.confidence * 100.0,
                result.impact,
                result.recommendation
            )));
        }
        doc.push(Break::new(0.5));
    }

    if let Some(chart) = &content.age_chart {
        let image = Image::from_path(chart)
            .map_err(|err| DashboardError::export(chart, err))?
            .with_alignment(Alignment::Center);
        doc.push(image);
        doc.push(Break::new(0.5));
    }

    doc.push(Paragraph::new(bold("Recommendations:", 12)));
    for recommendation in RECOMMENDATIONS {
        doc.push(Paragraph::new(format!("- {recommendation}")));
    }

    doc.render_to_file(out_path).map_err(to_export)?;
    info!(path = %out_path.display(), "pdf report written");
    Ok(())
}

pub fn write_markdown(content: &ReportContent<'_>, out_path: &Path) -> Result<()> {
    std::fs::write(out_path, build_markdown(content))
        .map_err(|err| DashboardError::export(out_path, err))?;
    info!(path = %out_path.display(), "markdown report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::build_journey;
    use crate::models::{Impact, Recommendation};
    use crate::personas::build_personas;
    use crate::ingest::sample_dataset;
    use chrono::TimeZone;

    fn hypothesis(text: &str) -> HypothesisResult {
        HypothesisResult {
            hypothesis: text.to_string(),
            confidence: 0.83,
            impact: Impact::High,
            recommendation: Recommendation::Implement,
        }
    }

    #[test]
    fn markdown_lists_personas_journeys_and_hypotheses() {
        let personas = build_personas(&sample_dataset()).unwrap();
        let journey = build_journey(&personas[0]);
        let result = hypothesis("Bigger CTA lifts signups");
        let source = DatasetSource::Sample;
        let content = ReportContent {
            report_id: Uuid::nil(),
            generated_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
            source: &source,
            personas: &personas,
            journeys: vec![&journey],
            hypotheses: vec![&result],
            age_chart: None,
        };

        let report = build_markdown(&content);
        assert!(report.starts_with("# UX Research Report"));
        assert!(report.contains("2026-03-01 09:30 UTC from built-in sample data"));
        assert!(report.contains("- Persona 1 (Segment: A, Age: 23-35)"));
        assert!(report.contains("- Persona 3 (Segment: C, Age: 38-52)"));
        assert!(report.contains("## Journey Map: Persona 1"));
        assert!(report.contains("| Advocacy |"));
        assert!(report.contains(
            "- Bigger CTA lifts signups: confidence 83%, impact High, recommendation Implement"
        ));
        assert!(report.contains("- Streamline the onboarding process."));
    }

    #[test]
    fn hypotheses_section_is_omitted_when_empty() {
        let source = DatasetSource::Uploaded(PathBuf::from("customers.csv"));
        let content = ReportContent {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            source: &source,
            personas: &[],
            journeys: Vec::new(),
            hypotheses: Vec::new(),
            age_chart: None,
        };

        let report = build_markdown(&content);
        assert!(!report.contains("## Hypotheses"));
        assert!(report.contains("from customers.csv"));
        assert!(report.contains("No personas were built"));
    }

    #[test]
    fn missing_font_surfaces_as_export_error() {
        let fonts = tempfile::TempDir::new().unwrap();
        let config = ReportConfig {
            font_dir: Some(fonts.path().to_path_buf()),
            ..ReportConfig::default()
        };
        let source = DatasetSource::Sample;
        let content = ReportContent {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            source: &source,
            personas: &[],
            journeys: Vec::new(),
            hypotheses: Vec::new(),
            age_chart: None,
        };

        let out = fonts.path().join(PDF_FILE);
        assert!(matches!(
            render_pdf(&content, &config, &out),
            Err(DashboardError::ExportIo { .. })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn markdown_to_missing_directory_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = DatasetSource::Sample;
        let content = ReportContent {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            source: &source,
            personas: &[],
            journeys: Vec::new(),
            hypotheses: Vec::new(),
            age_chart: None,
        };
        let out = dir.path().join("nope").join(MARKDOWN_FILE);
        assert!(matches!(
            write_markdown(&content, &out),
            Err(DashboardError::ExportIo { .. })
        ));
    }
}
