use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::models::{AgeRange, CustomerRecord, Persona};

/// How many needs and pain points each persona keeps.
pub const TOP_N: usize = 2;

/// Build one persona per distinct segment, ordered by segment label.
pub fn build_personas(records: &[CustomerRecord]) -> Result<Vec<Persona>> {
    if records.is_empty() {
        return Err(DashboardError::EmptyDataset);
    }

    let mut groups: BTreeMap<&str, Vec<&CustomerRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.segment.as_str()).or_default().push(record);
    }

    let personas: Vec<Persona> = groups
        .into_iter()
        .enumerate()
        .map(|(index, (segment, rows))| summarize_segment(index, segment, &rows))
        .collect();

    debug!(count = personas.len(), "built personas");
    Ok(personas)
}

fn summarize_segment(index: usize, segment: &str, rows: &[&CustomerRecord]) -> Persona {
    // Groups are never empty; the fold seeds from the first row.
    let first_age = rows.first().map(|r| r.age).unwrap_or_default();
    let age_range = rows.iter().fold(
        AgeRange {
            min: first_age,
            max: first_age,
        },
        |range, row| AgeRange {
            min: range.min.min(row.age),
            max: range.max.max(row.age),
        },
    );

    Persona {
        name: format!("Persona {}", index + 1),
        segment: segment.to_string(),
        age_range,
        common_needs: most_frequent(rows.iter().map(|r| r.stated_need.as_str()), TOP_N),
        common_pain_points: most_frequent(rows.iter().map(|r| r.pain_point.as_str()), TOP_N),
    }
}

/// Top `n` values by count. Ties keep first-appearance order.
pub fn most_frequent<'a>(values: impl Iterator<Item = &'a str>, n: usize) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some(entry) => entry.1 += 1,
            None => counts.push((value, 1)),
        }
    }

    // Stable sort preserves first appearance among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(n)
        .map(|(value, _)| value.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::sample_dataset;
    use proptest::prelude::*;

    fn record(id: i64, age: u32, segment: &str, need: &str, pain: &str) -> CustomerRecord {
        CustomerRecord {
            id,
            age,
            segment: segment.to_string(),
            stated_need: need.to_string(),
            pain_point: pain.to_string(),
        }
    }

    #[test]
    fn sample_data_yields_one_persona_per_segment() {
        let personas = build_personas(&sample_dataset()).unwrap();
        assert_eq!(personas.len(), 3);

        let a = &personas[0];
        assert_eq!(a.name, "Persona 1");
        assert_eq!(a.segment, "A");
        assert_eq!(a.age_range, AgeRange { min: 23, max: 35 });
        assert_eq!(a.common_needs, vec!["easy", "fast"]);
        assert_eq!(a.common_pain_points, vec!["confusing UI", "slow speed"]);

        let c = &personas[2];
        assert_eq!(c.segment, "C");
        assert_eq!(c.age_range, AgeRange { min: 38, max: 52 });
        assert_eq!(c.common_pain_points, vec!["poor support", "complex setup"]);
    }

    #[test]
    fn segments_are_sorted_by_label() {
        let records = vec![
            record(1, 30, "zeta", "fast", "lag"),
            record(2, 40, "alpha", "cheap", "fees"),
        ];
        let personas = build_personas(&records).unwrap();
        assert_eq!(personas[0].segment, "alpha");
        assert_eq!(personas[0].name, "Persona 1");
        assert_eq!(personas[1].segment, "zeta");
    }

    #[test]
    fn single_row_group_is_degenerate_not_an_error() {
        let personas = build_personas(&[record(1, 27, "solo", "fast", "lag")]).unwrap();
        assert_eq!(personas.len(), 1);
        assert_eq!(personas[0].age_range, AgeRange { min: 27, max: 27 });
        assert_eq!(personas[0].common_needs, vec!["fast"]);
        assert_eq!(personas[0].common_pain_points, vec!["lag"]);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert!(matches!(
            build_personas(&[]),
            Err(DashboardError::EmptyDataset)
        ));
    }

    #[test]
    fn ties_keep_first_appearance() {
        let values = ["b", "a", "c", "a", "b"];
        assert_eq!(most_frequent(values.into_iter(), 2), vec!["b", "a"]);
        assert_eq!(most_frequent(values.into_iter(), 5), vec!["b", "a", "c"]);
    }

    #[test]
    fn input_is_not_mutated() {
        let records = sample_dataset();
        let before = records.clone();
        let _ = build_personas(&records).unwrap();
        assert_eq!(records, before);
    }

    proptest! {
        #[test]
        fn personas_partition_segments(
            rows in prop::collection::vec((0u32..90, 0usize..4, 0usize..5, 0usize..5), 1..60)
        ) {
            let segments = ["north", "south", "east", "west"];
            let records: Vec<CustomerRecord> = rows
                .iter()
                .enumerate()
                .map(|(i, (age, seg, need, pain))| {
                    record(
                        i as i64,
                        *age,
                        segments[*seg],
                        &format!("need-{seg}-{need}"),
                        &format!("pain-{seg}-{pain}"),
                    )
                })
                .collect();

            let personas = build_personas(&records).unwrap();

            let mut distinct: Vec<&str> = records.iter().map(|r| r.segment.as_str()).collect();
            distinct.sort();
            distinct.dedup();
            prop_assert_eq!(personas.len(), distinct.len());

            for persona in &personas {
                let own: Vec<&CustomerRecord> =
                    records.iter().filter(|r| r.segment == persona.segment).collect();
                prop_assert!(!own.is_empty());
                for need in &persona.common_needs {
                    prop_assert!(own.iter().any(|r| &r.stated_need == need));
                }
                for pain in &persona.common_pain_points {
                    prop_assert!(own.iter().any(|r| &r.pain_point == pain));
                }
                let inside = own
                    .iter()
                    .all(|r| persona.age_range.min <= r.age && r.age <= persona.age_range.max);
                prop_assert!(inside, "ages outside {}", persona.age_range);
            }
        }
    }
}
