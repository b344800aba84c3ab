use super::super::domain::{
    BehavioralProfile, Candidate, ExperienceTier, JobPosting, WorkModality,
};
use super::super::parsing::{
    overlaps, parse_currency, parse_experience_years, tokenize_requirements,
};
use super::SubScore;

const ADJACENT_PROFILE_SHARE: f64 = 0.7;
const DISTANT_PROFILE_SHARE: f64 = 0.3;
const SAME_REGION_SHARE: f64 = 0.7;
const REMOTE_SHARE: f64 = 0.8;
const DISTANT_LOCATION_SHARE: f64 = 0.3;
const EXPERIENCE_CAP_RATIO: f64 = 1.5;
const EXPERIENCE_SHORTFALL_SHARE: f64 = 0.5;

const HR_KEYWORDS: &[&str] = &["rh", "hr", "recursos humanos", "human resources", "people"];
const TECH_KEYWORDS: &[&str] = &[
    "tecnologia",
    "technology",
    "tech",
    "software",
    "desenvolvimento",
    "development",
    "engenharia",
    "engineering",
    "dados",
    "data",
];
/// Only trusted in the job's area field; as prose they are ordinary words.
const TECH_ABBREVIATIONS: &[&str] = &["ti", "it"];
const SALES_KEYWORDS: &[&str] = &["vendas", "sales", "comercial", "commercial"];

fn portion(weight: f64, share: f64) -> u32 {
    (weight * share).round().max(0.0) as u32
}

fn capped(weight: f64, share: f64) -> u32 {
    portion(weight, share).min(portion(weight, 1.0))
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

fn mentions(text: &str, keywords: &[&str]) -> bool {
    let tokens = words(text);
    let joined = tokens.join(" ");
    keywords.iter().any(|keyword| {
        if keyword.contains(' ') {
            joined.contains(keyword)
        } else {
            tokens.iter().any(|token| token == keyword)
        }
    })
}

fn profile_for_text(text: &str, abbreviations: bool) -> Option<BehavioralProfile> {
    if mentions(text, HR_KEYWORDS) {
        Some(BehavioralProfile::Influence)
    } else if mentions(text, TECH_KEYWORDS)
        || (abbreviations && mentions(text, TECH_ABBREVIATIONS))
    {
        Some(BehavioralProfile::Conscientious)
    } else if mentions(text, SALES_KEYWORDS) {
        Some(BehavioralProfile::Dominant)
    } else {
        None
    }
}

/// Behavioral profile a job's category calls for, falling back to its requirements text.
pub fn desired_profile(job: &JobPosting) -> BehavioralProfile {
    profile_for_text(&job.area, true)
        .or_else(|| profile_for_text(&job.requirements, false))
        .unwrap_or(BehavioralProfile::Dominant)
}

/// Minimum years expected for a job tier; untiered postings expect two.
pub fn minimum_years(tier: Option<ExperienceTier>) -> u32 {
    match tier {
        Some(ExperienceTier::Junior) => 1,
        Some(ExperienceTier::Mid) => 3,
        Some(ExperienceTier::Senior) => 5,
        None => 2,
    }
}

pub(crate) fn behavioral(candidate: &Candidate, job: &JobPosting, weight: f64) -> SubScore {
    let max = portion(weight, 1.0);
    let Some(profile) = candidate.behavioral_profile else {
        return SubScore::new(0, max, "behavioral assessment not completed");
    };

    let desired = desired_profile(job);
    if profile == desired {
        SubScore::new(
            max,
            max,
            format!("profile {} matches desired {}", profile.label(), desired.label()),
        )
    } else if profile.is_adjacent_to(desired) {
        SubScore::new(
            capped(weight, ADJACENT_PROFILE_SHARE),
            max,
            format!(
                "profile {} is compatible with desired {}",
                profile.label(),
                desired.label()
            ),
        )
    } else {
        SubScore::new(
            capped(weight, DISTANT_PROFILE_SHARE),
            max,
            format!(
                "profile {} differs from desired {}",
                profile.label(),
                desired.label()
            ),
        )
    }
}

pub(crate) fn skills(candidate: &Candidate, job: &JobPosting, weight: f64) -> SubScore {
    let max = portion(weight, 1.0);
    let tokens = tokenize_requirements(&job.requirements);
    let candidate_skills: Vec<&str> = candidate
        .skills
        .iter()
        .map(|skill| skill.trim())
        .filter(|skill| !skill.is_empty())
        .collect();

    if tokens.is_empty() || candidate_skills.is_empty() {
        return SubScore::new(0, max, "no skills to compare");
    }

    let matched = tokens
        .iter()
        .filter(|token| candidate_skills.iter().any(|skill| overlaps(token, skill)))
        .count();
    let ratio = matched as f64 / tokens.len() as f64;

    SubScore::new(
        capped(weight, ratio),
        max,
        format!("{matched} of {} required skills matched", tokens.len()),
    )
}

pub(crate) fn experience(candidate: &Candidate, job: &JobPosting, weight: f64) -> SubScore {
    let max = portion(weight, 1.0);
    let years = parse_experience_years(&candidate.experience).unwrap_or(0);
    let minimum = minimum_years(job.experience_tier);
    let ratio = years as f64 / minimum as f64;

    if years >= minimum {
        let share = ratio.min(EXPERIENCE_CAP_RATIO);
        SubScore::new(
            capped(weight, share),
            max,
            format!("{years} years meets minimum of {minimum}"),
        )
    } else {
        SubScore::new(
            capped(weight, EXPERIENCE_SHORTFALL_SHARE * ratio),
            max,
            format!("{years} years below minimum of {minimum}"),
        )
    }
}

fn same_place(left: &str, right: &str) -> bool {
    let left = left.trim();
    !left.is_empty() && left.eq_ignore_ascii_case(right.trim())
}

pub(crate) fn location(candidate: &Candidate, job: &JobPosting, weight: f64) -> SubScore {
    let max = portion(weight, 1.0);

    if same_place(&candidate.city, &job.city) {
        SubScore::new(max, max, format!("same city ({})", job.city.trim()))
    } else if job.modality == WorkModality::Remote {
        SubScore::new(capped(weight, REMOTE_SHARE), max, "remote position")
    } else if same_place(&candidate.region, &job.region) {
        SubScore::new(
            capped(weight, SAME_REGION_SHARE),
            max,
            format!("same region ({})", job.region.trim()),
        )
    } else {
        SubScore::new(
            capped(weight, DISTANT_LOCATION_SHARE),
            max,
            "different city and region",
        )
    }
}

pub(crate) fn salary(candidate: &Candidate, job: &JobPosting, weight: f64) -> SubScore {
    let max = portion(weight, 1.0);
    let (Some(expected), Some(offered)) = (
        parse_currency(&candidate.salary_expectation),
        parse_currency(&job.salary_range),
    ) else {
        return SubScore::new(0, max, "salary information unavailable");
    };

    if expected <= offered {
        return SubScore::new(
            max,
            max,
            format!("expectation {expected:.2} within offer {offered:.2}"),
        );
    }

    let excess = if offered > 0.0 {
        (expected - offered) / offered * 100.0
    } else {
        f64::INFINITY
    };
    let share = if excess <= 10.0 {
        0.7
    } else if excess <= 20.0 {
        0.4
    } else {
        0.1
    };

    SubScore::new(
        capped(weight, share),
        max,
        format!("expectation {expected:.2} exceeds offer {offered:.2} by {excess:.0}%"),
    )
}
