use crate::models::{JourneyMap, JourneyStage, Persona, StageName};

fn stage_goals(stage: StageName) -> &'static [&'static str] {
    match stage {
        StageName::Awareness => &["Discover that the product exists", "Understand what problem it solves"],
        StageName::Consideration => &["Compare options and pricing", "Check reviews and case studies"],
        StageName::Purchase => &["Complete checkout without friction", "Trust the payment flow"],
        StageName::Retention => &["Get value on a regular basis", "Find help when something breaks"],
        StageName::Advocacy => &["Share a good experience", "Recommend the product to peers"],
    }
}

fn stage_touchpoints(stage: StageName) -> &'static [&'static str] {
    match stage {
        StageName::Awareness => &["Social media", "Search ads"],
        StageName::Consideration => &["Landing page", "Comparison table"],
        StageName::Purchase => &["Checkout", "Confirmation email"],
        StageName::Retention => &["Mobile app", "Support chat"],
        StageName::Advocacy => &["Referral program", "Review sites"],
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Build the five-stage journey map for a persona. Only the pain points
/// depend on the persona, so the same persona always yields the same map.
pub fn build_journey(persona: &Persona) -> JourneyMap {
    let stages = StageName::ALL
        .iter()
        .map(|&stage| JourneyStage {
            stage,
            goals: owned(stage_goals(stage)),
            touchpoints: owned(stage_touchpoints(stage)),
            pain_points: persona.common_pain_points.clone(),
        })
        .collect();

    JourneyMap {
        persona_name: persona.name.clone(),
        stages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AgeRange;

    fn persona(pains: &[&str]) -> Persona {
        Persona {
            name: "Persona 2".to_string(),
            segment: "B".to_string(),
            age_range: AgeRange { min: 29, max: 40 },
            common_needs: vec!["secure".to_string()],
            common_pain_points: owned(pains),
        }
    }

    #[test]
    fn always_five_stages_in_order() {
        let map = build_journey(&persona(&["slow speed"]));
        let names: Vec<StageName> = map.stages.iter().map(|s| s.stage).collect();
        assert_eq!(names, StageName::ALL.to_vec());
        assert_eq!(map.persona_name, "Persona 2");
    }

    #[test]
    fn identical_persona_gives_identical_map() {
        let p = persona(&["complex setup", "slow speed"]);
        assert_eq!(build_journey(&p), build_journey(&p));
    }

    #[test]
    fn pain_points_follow_persona() {
        let map = build_journey(&persona(&["complex setup", "slow speed"]));
        for stage in &map.stages {
            assert_eq!(stage.pain_points, vec!["complex setup", "slow speed"]);
            assert_eq!(stage.goals.len(), 2);
            assert_eq!(stage.touchpoints.len(), 2);
        }

        let other = build_journey(&persona(&["poor support"]));
        let purchase = other.stage(StageName::Purchase).unwrap();
        assert_eq!(purchase.pain_points, vec!["poor support"]);
        assert_eq!(
            purchase.goals,
            map.stage(StageName::Purchase).unwrap().goals
        );
    }
}
