use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod charts;
mod config;
mod error;
mod first_click;
mod hypotheses;
mod ingest;
mod journey;
mod models;
mod personas;
mod report;
mod research;
mod state;

use config::{DashboardConfig, HypothesisExport};
use models::{DatasetSource, ResearchMode, ResearchSnapshot, StageName};
use state::AppState;

#[derive(Parser)]
#[command(name = "ux-copilot")]
#[command(about = "Prototyping dashboard for UX research: personas, journey maps and simulated studies", long_about = None)]
struct Cli {
    /// Customer table (CSV with id, age, segment, needs, pain_points)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory for generated PNG/PDF/Markdown artifacts
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,
    /// Seed for the simulated measurements
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one persona per customer segment
    Personas {
        /// Show at most this many personas
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Build the customer journey map for a persona and render its timeline
    Journey {
        /// Persona number as listed by `personas` (1-based)
        #[arg(long, default_value_t = 1)]
        persona: usize,
    },
    /// Simulate qualitative interviews or a quantitative survey
    Research {
        #[arg(long, value_enum, default_value_t = ResearchMode::Qualitative)]
        mode: ResearchMode,
        #[arg(long, allow_negative_numbers = true)]
        interviews: Option<i64>,
    },
    /// Score interface hypotheses (one per line)
    #[command(group(
        ArgGroup::new("input")
            .args(["text", "file"])
            .required(true)
    ))]
    Hypotheses {
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Simulate a first-click test on an interface mockup
    FirstClick {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        clicks: Option<usize>,
    },
    /// Export the PDF report with personas, journey maps and hypotheses
    Report {
        /// Hypothesis to score for the report (repeatable)
        #[arg(long)]
        hypothesis: Vec<String>,
        /// File with one hypothesis per line
        #[arg(long)]
        hypotheses_file: Option<PathBuf>,
        /// Hypothesis to keep when exporting only selected ones (repeatable)
        #[arg(long)]
        select: Vec<String>,
        /// Export only the hypotheses named with --select
        #[arg(long, conflicts_with = "no_hypotheses")]
        only_selected: bool,
        /// Leave hypotheses out of the report
        #[arg(long)]
        no_hypotheses: bool,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_hypotheses(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| error::DashboardError::unsupported(path, err))?;
    Ok(hypotheses::parse_hypotheses(&text))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut config =
        DashboardConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(dir) = cli.out_dir.clone() {
        config.output.dir = dir;
    }

    let (records, source) = match &cli.data {
        Some(path) => (
            ingest::load_csv(path).context("failed to load customer data")?,
            DatasetSource::Uploaded(path.clone()),
        ),
        None => {
            info!("no --data given, using built-in sample data");
            (ingest::sample_dataset(), DatasetSource::Sample)
        }
    };
    let mut app = AppState::new(config, records, source);

    match cli.command {
        Commands::Personas { limit } => {
            let personas = app.show_personas()?.to_vec();
            let shown = &personas[..limit.unwrap_or(personas.len()).min(personas.len())];
            if cli.json {
                return print_json(&shown);
            }
            println!(
                "Personas from {} ({} of {}):",
                app.source(),
                shown.len(),
                personas.len()
            );
            for persona in shown {
                println!(
                    "- {} (Segment: {}, Age: {}) needs: {}; pain points: {}",
                    persona.name,
                    persona.segment,
                    persona.age_range,
                    persona.common_needs.join(", "),
                    persona.common_pain_points.join(", ")
                );
            }
        }
        Commands::Journey { persona } => {
            let timeline = app.render_journey_timeline(persona)?;
            let journey = app.show_journey(persona)?;
            if cli.json {
                return print_json(journey);
            }
            println!("Customer journey for {}:", journey.persona_name);
            for stage in StageName::ALL.iter().filter_map(|&name| journey.stage(name)) {
                println!("{}", stage.stage);
                println!("  goals: {}", stage.goals.join("; "));
                println!("  touchpoints: {}", stage.touchpoints.join("; "));
                println!("  pain points: {}", stage.pain_points.join("; "));
            }
            println!("Timeline written to {}.", timeline.display());
        }
        Commands::Research { mode, interviews } => {
            let limit = interviews.unwrap_or(app.config.research.interview_limit as i64);
            let sample_size = app.records().len();
            let snapshot = app.run_research(mode, limit)?;
            if cli.json {
                return print_json(&snapshot);
            }
            match snapshot {
                ResearchSnapshot::Qualitative { interviews, themes } => {
                    println!("Interview excerpts ({} of {} customers):", interviews.len(), sample_size);
                    for quote in &interviews {
                        println!("- \"{quote}\"");
                    }
                    println!("Themes: {}", themes.join(", "));
                }
                ResearchSnapshot::Quantitative {
                    satisfaction,
                    nps,
                    sample_size,
                } => {
                    println!("Survey results (n = {sample_size}):");
                    println!("- satisfaction (CSI): {satisfaction:.2} / 5");
                    println!("- NPS: {nps}");
                }
            }
        }
        Commands::Hypotheses { text, file } => {
            let input = match (text, file) {
                (Some(text), _) => hypotheses::parse_hypotheses(&text),
                (None, Some(path)) => read_hypotheses(&path)?,
                (None, None) => Vec::new(),
            };
            let results = app.score_hypotheses(&input)?;
            if cli.json {
                return print_json(results);
            }
            println!("Hypothesis results:");
            for result in results.values() {
                println!(
                    "- {}: confidence {:.0}%, impact {}, recommendation {}",
                    result.hypothesis,
                    result.confidence * 100.0,
                    result.impact,
                    result.recommendation
                );
            }
        }
        Commands::FirstClick { image, clicks } => {
            let requested = clicks.unwrap_or(app.config.click_test.default_clicks);
            let (result, heatmap) = app.run_first_click(&image, requested)?;
            if cli.json {
                return print_json(&result);
            }
            println!(
                "Simulated {} first clicks on {}x{} mockup (random, not real attention data).",
                result.coordinates.len(),
                result.image_size.0,
                result.image_size.1
            );
            println!("Clarity score: {} / 100", result.clarity_score);
            println!("Attention by zone:");
            println!("- top: {}%", result.zones.top);
            println!("- middle: {}%", result.zones.middle);
            println!("- bottom: {}%", result.zones.bottom);
            println!("CSI: {:.2}  NPS: {}", result.csi, result.nps);
            println!("Heatmap written to {}.", heatmap.display());
        }
        Commands::Report {
            hypothesis,
            hypotheses_file,
            select,
            only_selected,
            no_hypotheses,
        } => {
            let mut input = hypothesis;
            if let Some(path) = hypotheses_file {
                input.extend(read_hypotheses(&path)?);
            }
            if !input.is_empty() {
                app.score_hypotheses(&input)?;
            }

            let export = if no_hypotheses {
                HypothesisExport::Off
            } else if only_selected {
                HypothesisExport::Selected
            } else {
                app.config.report.hypotheses
            };
            let exported = app
                .export_report(&select, export)
                .context("report export failed")?;
            println!("Report {} exported:", exported.report_id);
            println!("- {}", exported.pdf.display());
            println!("- {}", exported.markdown.display());
            println!("- {}", exported.age_chart.display());
        }
    }

    debug!(view = ?app.active_view, "action finished");
    Ok(())
}
