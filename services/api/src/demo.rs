use crate::infra::in_memory_triage_service;
use chrono::{Duration, Utc};
use clap::Args;
use talent_ai::config::AppConfig;
use talent_ai::error::AppError;
use talent_ai::workflows::recruiting::{
    Application, ApplicationId, BehavioralProfile, Candidate, CandidateId, ExperienceTier,
    FilterActions, FilterCriteria, FilterScope, InMemoryRecruitingRepository, JobId, JobPosting,
    NewTriageFilter, ScoreResult, TriageError, TriageRun, TriageStatistics, WorkModality,
};

const DEMO_JOB: &str = "job-fullstack";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Minimum total score the demo filter requires (0-100).
    #[arg(long, default_value_t = 60)]
    pub(crate) minimum_score: u32,
    /// Minimum years of experience the demo filter requires.
    #[arg(long)]
    pub(crate) minimum_years: Option<u32>,
    /// Print the ranking and triage run as JSON instead of a text summary.
    #[arg(long)]
    pub(crate) json: bool,
}

struct DemoApplicant {
    id: &'static str,
    name: &'static str,
    profile: Option<BehavioralProfile>,
    skills: &'static [&'static str],
    experience: &'static str,
    salary: &'static str,
    city: &'static str,
    region: &'static str,
}

const APPLICANTS: &[DemoApplicant] = &[
    DemoApplicant {
        id: "cand-ana",
        name: "Ana Souza",
        profile: Some(BehavioralProfile::Conscientious),
        skills: &["React", "Node.js", "PostgreSQL"],
        experience: "7 years building web platforms",
        salary: "R$ 11.000,00",
        city: "São Paulo",
        region: "SP",
    },
    DemoApplicant {
        id: "cand-bruno",
        name: "Bruno Lima",
        profile: Some(BehavioralProfile::Steady),
        skills: &["React", "Node"],
        experience: "4 anos de experiência",
        salary: "R$ 12.500,00",
        city: "Campinas",
        region: "SP",
    },
    DemoApplicant {
        id: "cand-carla",
        name: "Carla Dias",
        profile: None,
        skills: &["Node.js", "Docker"],
        experience: "3 years",
        salary: "a combinar",
        city: "Curitiba",
        region: "PR",
    },
    DemoApplicant {
        id: "cand-diego",
        name: "Diego Alves",
        profile: Some(BehavioralProfile::Influence),
        skills: &["Excel"],
        experience: "1 year",
        salary: "R$ 20.000,00",
        city: "Recife",
        region: "PE",
    },
];

fn demo_job() -> JobPosting {
    JobPosting {
        id: JobId(DEMO_JOB.to_string()),
        title: "Senior Full Stack Developer".to_string(),
        area: "Tecnologia".to_string(),
        requirements: "React, Node.js".to_string(),
        experience_tier: Some(ExperienceTier::Senior),
        city: "São Paulo".to_string(),
        region: "SP".to_string(),
        modality: WorkModality::Hybrid,
        salary_range: "R$ 12.000,00 - R$ 15.000,00".to_string(),
    }
}

/// Load the demo posting and its applicants into `repository`.
pub(crate) fn seed_demo_data(
    repository: &InMemoryRecruitingRepository,
) -> Result<JobId, TriageError> {
    let job = demo_job();
    let job_id = job.id.clone();
    repository.upsert_job(job);

    let opened = Utc::now() - Duration::days(7);
    for (index, applicant) in APPLICANTS.iter().enumerate() {
        let candidate = Candidate {
            id: CandidateId(applicant.id.to_string()),
            name: applicant.name.to_string(),
            email: format!("{}@example.com", applicant.id),
            behavioral_profile: applicant.profile,
            skills: applicant.skills.iter().map(|skill| skill.to_string()).collect(),
            experience: applicant.experience.to_string(),
            salary_expectation: applicant.salary.to_string(),
            city: applicant.city.to_string(),
            region: applicant.region.to_string(),
        };
        repository.insert_application(Application::new(
            ApplicationId(format!("app-{:06}", index + 1)),
            candidate.id.clone(),
            job_id.clone(),
            opened + Duration::hours(index as i64 * 6),
        ))?;
        repository.upsert_candidate(candidate);
    }

    Ok(job_id)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        minimum_score,
        minimum_years,
        json,
    } = args;

    let config = AppConfig::load()?;
    let (service, repository) = in_memory_triage_service(config.triage)?;
    let job_id = seed_demo_data(&repository)?;

    service.create_filter(NewTriageFilter {
        scope: FilterScope::Job(job_id.clone()),
        name: "Demo screen".to_string(),
        criteria: FilterCriteria {
            minimum_score,
            minimum_experience_years: minimum_years,
            ..FilterCriteria::default()
        },
        actions: FilterActions::default(),
        active: true,
    })?;

    let ranking = service.rank_candidates(&job_id)?;
    let run = service.run_automatic_triage(&job_id)?;
    let statistics = service.triage_statistics(&job_id)?;

    if json {
        let payload = serde_json::json!({
            "ranking": ranking,
            "triage": run,
            "statistics": statistics,
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => eprintln!("failed to render demo output: {err}"),
        }
        return Ok(());
    }

    render_ranking(&job_id, &ranking);
    render_run(&run);
    render_statistics(&statistics);
    Ok(())
}

fn render_ranking(job_id: &JobId, ranking: &[ScoreResult]) {
    println!("Candidate ranking for {job_id}");
    for (position, result) in ranking.iter().enumerate() {
        println!(
            "{:>2}. {:<12} {:>3}/{} {}",
            position + 1,
            result.candidate_name,
            result.total_score,
            result.max_score,
            result.classification.label()
        );
        let breakdown = &result.breakdown;
        for (factor, sub) in [
            ("behavioral", &breakdown.behavioral),
            ("skills", &breakdown.skills),
            ("experience", &breakdown.experience),
            ("location", &breakdown.location),
            ("salary", &breakdown.salary),
        ] {
            println!("      {factor:<10} {:>2}/{:<2} {}", sub.value, sub.max, sub.rationale);
        }
    }
}

fn render_run(run: &TriageRun) {
    println!("\nAutomatic triage ({} decisions)", run.results.len());
    if run.timed_out {
        println!("  run deadline expired; showing partial results");
    }
    for result in &run.results {
        let marker = if result.persisted { "" } else { " (withheld)" };
        println!(
            "- {} {} -> {}{}: {}",
            result.candidate_id,
            result.previous_status.label(),
            result.new_status.label(),
            marker,
            result.reason
        );
    }
}

fn render_statistics(statistics: &TriageStatistics) {
    println!("\nStatistics");
    println!(
        "- {} candidates | high {} | medium {} | low {} | mean score {:.2}",
        statistics.total_candidates,
        statistics.high,
        statistics.medium,
        statistics.low,
        statistics.mean_score
    );
    println!("- {} advanced automatically", statistics.auto_approved);
    for (status, count) in &statistics.by_status {
        println!("  - {}: {count}", status.label());
    }
}
