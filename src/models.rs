use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One row of the customer-attribute table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: i64,
    pub age: u32,
    pub segment: String,
    #[serde(rename = "needs")]
    pub stated_need: String,
    #[serde(rename = "pain_points")]
    pub pain_point: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DatasetSource {
    Sample,
    Uploaded(PathBuf),
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Sample => write!(f, "built-in sample data"),
            DatasetSource::Uploaded(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Persona {
    pub name: String,
    pub segment: String,
    pub age_range: AgeRange,
    pub common_needs: Vec<String>,
    pub common_pain_points: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StageName {
    Awareness,
    Consideration,
    Purchase,
    Retention,
    Advocacy,
}

impl StageName {
    pub const ALL: [StageName; 5] = [
        StageName::Awareness,
        StageName::Consideration,
        StageName::Purchase,
        StageName::Retention,
        StageName::Advocacy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StageName::Awareness => "Awareness",
            StageName::Consideration => "Consideration",
            StageName::Purchase => "Purchase",
            StageName::Retention => "Retention",
            StageName::Advocacy => "Advocacy",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JourneyStage {
    pub stage: StageName,
    pub goals: Vec<String>,
    pub touchpoints: Vec<String>,
    pub pain_points: Vec<String>,
}

/// Customer journey map for one persona. Stages are always the five
/// `StageName::ALL` entries, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JourneyMap {
    pub persona_name: String,
    pub stages: Vec<JourneyStage>,
}

impl JourneyMap {
    pub fn stage(&self, name: StageName) -> Option<&JourneyStage> {
        self.stages.iter().find(|stage| stage.stage == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl Impact {
    pub const ALL: [Impact; 3] = [Impact::Low, Impact::Medium, Impact::High];
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Impact::Low => "Low",
            Impact::Medium => "Medium",
            Impact::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    Implement,
    Refine,
    Discard,
}

impl Recommendation {
    pub const ALL: [Recommendation; 3] = [
        Recommendation::Implement,
        Recommendation::Refine,
        Recommendation::Discard,
    ];
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recommendation::Implement => "Implement",
            Recommendation::Refine => "Refine",
            Recommendation::Discard => "Discard",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HypothesisResult {
    pub hypothesis: String,
    pub confidence: f64,
    pub impact: Impact,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum ResearchMode {
    Qualitative,
    Quantitative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResearchSnapshot {
    Qualitative {
        interviews: Vec<String>,
        themes: Vec<String>,
    },
    Quantitative {
        satisfaction: f64,
        nps: i32,
        sample_size: usize,
    },
}

/// Share of clicks per horizontal third of the image, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneBreakdown {
    pub top: f64,
    pub middle: f64,
    pub bottom: f64,
}
