//! Per-school averages.
//!
//! Every dimension is computed independently from the same observation
//! slice. Scores are sorted with [`f64::total_cmp`] before summation so the
//! result does not depend on input order.

use std::collections::{BTreeMap, HashMap};

use crate::models::{Aggregates, GradeLevel, Observation, Subject};

/// Arithmetic mean, `None` for an empty set.
pub fn mean<I>(scores: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut scores: Vec<f64> = scores.into_iter().collect();
    if scores.is_empty() {
        return None;
    }
    scores.sort_by(f64::total_cmp);
    let sum: f64 = scores.iter().sum();
    Some(sum / scores.len() as f64)
}

fn mean_where<F>(observations: &[Observation], keep: F) -> Option<f64>
where
    F: Fn(&Observation) -> bool,
{
    mean(observations.iter().filter(|o| keep(o)).map(|o| o.score))
}

/// Aggregate the observations of one school.
///
/// Observations of other schools are ignored.
pub fn aggregate(school_code: &str, observations: &[Observation]) -> Aggregates {
    let own: Vec<Observation> = observations
        .iter()
        .filter(|o| o.school_code == school_code)
        .cloned()
        .collect();

    let subject_avg_map: BTreeMap<Subject, Option<f64>> = Subject::ALL
        .into_iter()
        .map(|s| (s, mean_where(&own, |o| o.subject == s)))
        .collect();

    let grade_avg_map: BTreeMap<GradeLevel, Option<f64>> = GradeLevel::ALL
        .into_iter()
        .map(|g| (g, mean_where(&own, |o| o.grade_level == g)))
        .collect();

    let grade_subject_avg_map = GradeLevel::ALL
        .into_iter()
        .map(|g| {
            let per_subject = Subject::ALL
                .into_iter()
                .map(|s| (s, mean_where(&own, |o| o.grade_level == g && o.subject == s)))
                .collect();
            (g, per_subject)
        })
        .collect();

    Aggregates {
        school_code: school_code.to_string(),
        overall_avg: mean(own.iter().map(|o| o.score)),
        subject_avg_map,
        grade_avg_map,
        grade_subject_avg_map,
    }
}

/// Aggregate every school, in first-seen school order.
pub fn aggregate_all(observations: &[Observation]) -> Vec<Aggregates> {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<Observation>> = HashMap::new();
    for obs in observations {
        let code = obs.school_code.as_str();
        grouped
            .entry(code)
            .or_insert_with(|| {
                order.push(code);
                Vec::new()
            })
            .push(obs.clone());
    }

    order
        .into_iter()
        .map(|code| {
            let own = grouped.get(code).map(Vec::as_slice).unwrap_or(&[]);
            aggregate(code, own)
        })
        .collect()
}
