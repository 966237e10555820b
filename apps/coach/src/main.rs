use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use coach::config::Config;
use coach::render::{render_evaluation, render_request_states};
use coach::{
    CoachError, InputPatch, ResumeFile, ScoringClient, Session, SessionStore, StudyPlanOutcome,
};

/// Evaluate a candidate against a job description with the scoring service.
#[derive(Debug, Parser)]
#[command(name = "coach", version, about)]
struct Cli {
    /// Resume to upload (PDF).
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Job description text.
    #[arg(long, conflicts_with = "job_description_file")]
    job_description: Option<String>,

    /// Read the job description from a file.
    #[arg(long)]
    job_description_file: Option<PathBuf>,

    /// GitHub username to include in the evaluation.
    #[arg(long, default_value = "")]
    github: String,

    /// Scoring service base URL (overrides COACH_API_URL).
    #[arg(long)]
    api_url: Option<String>,

    /// Where to save the PDF report (overrides COACH_REPORT_DIR).
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Also generate a cover letter.
    #[arg(long)]
    cover_letter: bool,

    /// Also generate a study plan for the missing skills.
    #[arg(long)]
    study_plan: bool,

    /// Download the PDF scorecard after evaluating.
    #[arg(long)]
    pdf: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url);
    }
    if let Some(dir) = &cli.report_dir {
        config = config.with_report_dir(dir);
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "Starting coach v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api_url
    );

    let client = ScoringClient::new(&config)?;
    let session = Session::with_store(
        SessionStore::default(),
        Arc::new(client),
        config.report_dir.clone(),
    );
    load_input(&cli, session.store()).await?;

    match session.evaluate().await {
        Ok(result) => println!("{}", render_evaluation(&result)),
        Err(err) => bail!("evaluation failed: {err}"),
    }

    let (letter, plan) = tokio::join!(
        async {
            if cli.cover_letter {
                Some(session.generate_cover_letter().await)
            } else {
                None
            }
        },
        async {
            if cli.study_plan {
                Some(session.generate_study_plan().await)
            } else {
                None
            }
        }
    );

    if let Some(letter) = letter {
        print_section("Cover Letter", letter);
    }
    if let Some(plan) = plan {
        print_section(
            "Study Plan",
            plan.map(|outcome| match outcome {
                StudyPlanOutcome::Planned(text) => text,
                StudyPlanOutcome::FullyQualified => {
                    "You are fully qualified for this role. No study plan needed.".to_string()
                }
            }),
        );
    }

    if cli.pdf {
        match session.download_report().await {
            Ok(Some(path)) => println!("PDF report saved to {}", path.display()),
            Ok(None) => println!("No evaluation to report on."),
            Err(err) => eprintln!("Could not download the PDF report: {err}"),
        }
    }

    info!("Final request states:\n{}", render_request_states(&session.snapshot()));
    Ok(())
}

/// Fills the session store from command-line arguments.
async fn load_input(cli: &Cli, store: &SessionStore) -> Result<()> {
    store.set(InputPatch::GithubUsername(cli.github.clone()));

    let job_description = match (&cli.job_description, &cli.job_description_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("could not read job description {}", path.display()))?,
        (None, None) => String::new(),
    };
    store.set(InputPatch::JobDescription(job_description));

    if let Some(path) = &cli.resume {
        let resume = ResumeFile::read(path)
            .await
            .with_context(|| format!("could not read resume {}", path.display()))?;
        store.set(InputPatch::ResumeFile(Some(resume)));
    }
    Ok(())
}

fn print_section(title: &str, outcome: Result<String, CoachError>) {
    println!("{title}");
    println!("{}", "-".repeat(title.len()));
    match outcome {
        Ok(text) => println!("{text}\n"),
        Err(err) if err.is_precondition() => println!("Skipped: {err}\n"),
        Err(err) => println!("Failed: {err}\n"),
    }
}
