use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::HypothesisExport;
use crate::error::{DashboardError, Result};
use crate::models::{HypothesisResult, Impact, Recommendation};
use crate::research::round_to;

pub const CONFIDENCE_RANGE: (f64, f64) = (0.70, 0.99);

/// Split freeform input into hypotheses, one per non-blank line.
pub fn parse_hypotheses(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Score each hypothesis independently. Results are random on every call.
pub fn score(
    hypotheses: &[String],
    rng: &mut impl Rng,
) -> Result<BTreeMap<String, HypothesisResult>> {
    if hypotheses.is_empty() {
        return Err(DashboardError::EmptyHypotheses);
    }

    let mut results = BTreeMap::new();
    for hypothesis in hypotheses {
        let result = HypothesisResult {
            hypothesis: hypothesis.clone(),
            confidence: round_to(
                rng.gen_range(CONFIDENCE_RANGE.0..=CONFIDENCE_RANGE.1),
                2,
            ),
            impact: *Impact::ALL.choose(rng).unwrap_or(&Impact::Medium),
            recommendation: *Recommendation::ALL
                .choose(rng)
                .unwrap_or(&Recommendation::Refine),
        };
        results.insert(hypothesis.clone(), result);
    }
    Ok(results)
}

/// Pick the results that belong in an exported report.
pub fn select_for_export<'a>(
    results: &'a BTreeMap<String, HypothesisResult>,
    mode: HypothesisExport,
    selected: &[String],
) -> Vec<&'a HypothesisResult> {
    match mode {
        HypothesisExport::All => results.values().collect(),
        HypothesisExport::Selected => results
            .values()
            .filter(|result| selected.contains(&result.hypothesis))
            .collect(),
        HypothesisExport::Off => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn scores_every_hypothesis_within_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        let results = score(&strings(&["A", "B"]), &mut rng).unwrap();

        assert_eq!(results.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        for (key, result) in &results {
            assert_eq!(key, &result.hypothesis);
            assert!((0.70..=0.99).contains(&result.confidence));
            assert!(Impact::ALL.contains(&result.impact));
            assert!(Recommendation::ALL.contains(&result.recommendation));
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            score(&[], &mut rng),
            Err(DashboardError::EmptyHypotheses)
        ));
    }

    #[test]
    fn duplicates_collapse_to_one_key() {
        let mut rng = StdRng::seed_from_u64(2);
        let results = score(&strings(&["same", "same"]), &mut rng).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn confidence_bounds_hold_over_many_draws() {
        let mut rng = StdRng::seed_from_u64(77);
        let inputs: Vec<String> = (0..300).map(|i| format!("hypothesis {i}")).collect();
        let results = score(&inputs, &mut rng).unwrap();
        assert_eq!(results.len(), 300);
        assert!(results
            .values()
            .all(|r| r.confidence >= 0.70 && r.confidence <= 0.99));
    }

    #[test]
    fn parses_newline_delimited_text() {
        let parsed = parse_hypotheses("  Bigger CTA lifts signups \n\n\r\nShorter form reduces drop-off\n");
        assert_eq!(
            parsed,
            strings(&["Bigger CTA lifts signups", "Shorter form reduces drop-off"])
        );
        assert!(parse_hypotheses("\n  \n").is_empty());
    }

    #[test]
    fn export_filter_follows_mode() {
        let mut rng = StdRng::seed_from_u64(4);
        let results = score(&strings(&["A", "B", "C"]), &mut rng).unwrap();
        let selected = strings(&["B"]);

        assert_eq!(select_for_export(&results, HypothesisExport::All, &selected).len(), 3);
        let picked = select_for_export(&results, HypothesisExport::Selected, &selected);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].hypothesis, "B");
        assert!(select_for_export(&results, HypothesisExport::Off, &selected).is_empty());
    }
}
