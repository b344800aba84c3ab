use chrono::{DateTime, Utc};

use super::super::domain::{ApplicationStatus, BehavioralProfile};
use super::super::parsing::{overlaps, parse_currency, parse_experience_years};
use super::super::ranking::{ScoreTier, ScoredApplication};
use super::config::{FilterActions, FilterCriteria, TriageFilter};
use super::TriageResult;

/// First hard criterion a candidate failed.
#[derive(Debug, Clone, PartialEq)]
enum Rejection {
    ScoreBelowMinimum {
        score: u32,
        minimum: u32,
    },
    ProfileNotDesired {
        found: Option<BehavioralProfile>,
        desired: Vec<BehavioralProfile>,
    },
    MissingSkills(Vec<String>),
    InsufficientExperience {
        years: u32,
        required: u32,
    },
    SalaryAboveMaximum {
        expected: f64,
        maximum: f64,
    },
}

impl Rejection {
    fn summary(&self) -> String {
        match self {
            Rejection::ScoreBelowMinimum { score, minimum } => {
                format!("score below minimum ({score} < {minimum})")
            }
            Rejection::ProfileNotDesired { found, desired } => {
                let desired = desired
                    .iter()
                    .map(|profile| profile.label())
                    .collect::<Vec<_>>()
                    .join(", ");
                match found {
                    Some(profile) => format!(
                        "behavioral profile {} not among desired profiles ({desired})",
                        profile.label()
                    ),
                    None => format!("behavioral profile not assessed (desired {desired})"),
                }
            }
            Rejection::MissingSkills(skills) => {
                format!("missing required skills: {}", skills.join(", "))
            }
            Rejection::InsufficientExperience { years, required } => {
                format!("experience of {years} years below required {required} years")
            }
            Rejection::SalaryAboveMaximum { expected, maximum } => format!(
                "salary expectation {expected:.2} exceeds maximum {maximum:.2}"
            ),
        }
    }
}

fn check_criteria(scored: &ScoredApplication, criteria: &FilterCriteria) -> Option<Rejection> {
    let score = scored.result.total_score;
    if score < criteria.minimum_score {
        return Some(Rejection::ScoreBelowMinimum {
            score,
            minimum: criteria.minimum_score,
        });
    }

    let candidate = &scored.candidate;

    if let Some(desired) = criteria
        .behavioral_profiles
        .as_ref()
        .filter(|profiles| !profiles.is_empty())
    {
        let fits = candidate
            .behavioral_profile
            .map(|profile| desired.contains(&profile))
            .unwrap_or(false);
        if !fits {
            return Some(Rejection::ProfileNotDesired {
                found: candidate.behavioral_profile,
                desired: desired.clone(),
            });
        }
    }

    if let Some(required) = criteria
        .required_skills
        .as_ref()
        .filter(|skills| !skills.is_empty())
    {
        let missing: Vec<String> = required
            .iter()
            .filter(|skill| {
                !candidate
                    .skills
                    .iter()
                    .any(|owned| overlaps(owned, skill))
            })
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Some(Rejection::MissingSkills(missing));
        }
    }

    if let Some(required) = criteria.minimum_experience_years {
        let years = parse_experience_years(&candidate.experience).unwrap_or(0);
        if years < required {
            return Some(Rejection::InsufficientExperience { years, required });
        }
    }

    if let Some(maximum) = criteria.maximum_salary {
        if let Some(expected) = parse_currency(&candidate.salary_expectation) {
            if expected > maximum {
                return Some(Rejection::SalaryAboveMaximum { expected, maximum });
            }
        }
    }

    None
}

fn tier_action(actions: &FilterActions, tier: ScoreTier) -> ApplicationStatus {
    match tier {
        ScoreTier::High => actions.score_high,
        ScoreTier::Medium => actions.score_medium,
        ScoreTier::Low => actions.score_low,
    }
}

/// Apply one filter to one scored application.
///
/// Returns `None` only for inactive filters. Hard criteria short-circuit in order (score,
/// behavioral profile, skills, experience, salary) and reject on the first failure; otherwise
/// the score tier picks the filter's configured action.
pub fn evaluate(
    scored: &ScoredApplication,
    filter: &TriageFilter,
    evaluated_at: DateTime<Utc>,
) -> Option<TriageResult> {
    if !filter.active {
        return None;
    }

    let score = scored.result.total_score;
    let (new_status, reason) = match check_criteria(scored, &filter.criteria) {
        Some(rejection) => (ApplicationStatus::Rejected, rejection.summary()),
        None => {
            let tier = ScoreTier::for_score(score);
            let status = tier_action(&filter.actions, tier);
            (
                status,
                format!(
                    "all criteria met; {} score tier ({score}) maps to {}",
                    tier.label(),
                    status.label()
                ),
            )
        }
    };

    Some(TriageResult {
        application_id: scored.application.id.clone(),
        candidate_id: scored.candidate.id.clone(),
        job_id: scored.application.job_id.clone(),
        score,
        classification: scored.result.classification,
        previous_status: scored.application.status,
        new_status,
        reason,
        applied_filters: vec![filter.name.clone()],
        auto_approved: new_status.is_advancing(),
        persisted: true,
        evaluated_at,
    })
}
