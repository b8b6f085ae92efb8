//! CLI command implementations

use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;

use crate::cli::args::{ConfigCommand, RunArgs};
use crate::config::Settings;
use crate::llm::build_coach;
use crate::media::CaptureDevices;
use crate::report;
use crate::resume::ResumeExtractor;
use crate::session::{
    format_clock, Feedback, InterviewSessionController, Phase, SessionPlan, Tick,
};
use crate::storage::{ReportRecord, Repository};
use crate::transcription::TypedInputRecognizer;
use crate::PrepifyError;

/// Run one practice interview session end to end.
pub async fn run_session(settings: &Settings, args: RunArgs) -> Result<()> {
    settings.ensure_dirs()?;
    let repo = Repository::new(settings)?;
    let coach = build_coach(settings)?;

    let description = match (args.description, args.description_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read job description: {}", path.display()))?,
        (None, None) => prompt_line("Job description: ")?,
    };

    let resume_text = match args.resume {
        Some(path) => match extract_resume(settings, &path).await {
            Ok(text) => {
                println!("Resume text extracted ({} characters).", text.chars().count());
                Some(text)
            }
            Err(e) => {
                tracing::warn!("Resume extraction failed: {}", e);
                println!("Could not extract resume text ({e:#}). Continuing without it.");
                None
            }
        },
        None => None,
    };

    let question_count = args
        .questions
        .unwrap_or(settings.session.question_count)
        .clamp(1, 10);

    let plan = SessionPlan {
        job_position: args.position,
        job_description: description,
        experience_years: args.experience,
        resume_text,
        created_by: current_user(),
        question_count,
    };

    let mut controller = InterviewSessionController::new(
        plan,
        &settings.session,
        Box::new(CaptureDevices::new(settings)),
        coach,
        Box::new(TypedInputRecognizer),
    );

    // Prep
    println!();
    println!(
        "Practice interview: {} ({} years experience), {} questions, {} per answer.",
        controller.plan().job_position,
        controller.plan().experience_years,
        question_count,
        format_clock(settings.session.seconds_per_question),
    );
    if !args.yes && !confirm("Start the device check?")? {
        println!("Session cancelled.");
        return Ok(());
    }
    controller.confirm_prep()?;

    // Setup: device check, retryable
    loop {
        match controller.acquire_media().await {
            Ok(_) => {
                println!("Camera and microphone ready.");
                break;
            }
            Err(e) => {
                println!("{}", e);
                if !confirm("Retry the device check?")? {
                    println!("Session cancelled.");
                    return Ok(());
                }
            }
        }
    }

    // Setup -> Active: question generation, retryable
    loop {
        println!("Generating questions...");
        match controller.begin_interview(&repo).await {
            Ok(()) => break,
            Err(e @ PrepifyError::QuestionGeneration(_)) => {
                println!("{}", e);
                if !confirm("Retry question generation?")? {
                    println!("Session cancelled.");
                    return Ok(());
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    // Active: the question loop
    'questions: while controller.phase() == Phase::Active {
        let index = controller.current_index();
        let total = controller.questions().len();
        let question = match controller.current_question() {
            Some(q) => q.clone(),
            None => break,
        };

        println!();
        println!("Question {}/{}: {}", index + 1, total, question.text);
        if let Some(skill) = &question.skill_tested {
            println!("  Skill tested: {}", skill);
        }
        if !question.ideal_answer_elements.is_empty() {
            println!("  Points to consider:");
            for element in &question.ideal_answer_elements {
                println!("    - {}", element);
            }
        }

        'answer: loop {
            wait_enter("Press Enter to start answering; finish with a blank line.")?;

            match controller.start_recording() {
                Ok(()) => {}
                Err(PrepifyError::UnsupportedEnvironment(reason)) => {
                    println!("Speech capture unavailable: {}", reason);
                    println!("Skipping this question.");
                    controller.advance_question().await?;
                    continue 'questions;
                }
                Err(e) => return Err(e.into()),
            }

            match drive_recording(&mut controller).await? {
                RecordingOutcome::TimedOut => {
                    println!("Time is up — moving on.");
                    for notice in controller.take_notices() {
                        println!("Note: {}", notice);
                    }
                    continue 'questions;
                }
                RecordingOutcome::Stopped => match controller.stop_recording().await {
                    Ok(Some(feedback)) => {
                        print_feedback(&feedback);
                    }
                    Ok(None) => {
                        println!("Your answer was saved, but feedback is unavailable for it.");
                    }
                    Err(PrepifyError::AnswerTooShort { got, min }) => {
                        println!(
                            "That answer was too short ({} characters; minimum {}).",
                            got, min
                        );
                        if confirm("Retry this question?")? {
                            continue 'answer;
                        }
                        controller.advance_question().await?;
                        continue 'questions;
                    }
                    Err(e) => return Err(e.into()),
                },
            }

            for notice in controller.take_notices() {
                println!("Note: {}", notice);
            }
            wait_enter(if index + 1 < total {
                "Press Enter for the next question."
            } else {
                "Press Enter to finish the interview."
            })?;
            controller.advance_question().await?;
            continue 'questions;
        }
    }

    // Completed -> Report
    println!();
    println!("Generating your report...");
    loop {
        match controller.finish_report(&repo).await {
            Ok(report) => {
                print_report(&report);
                break;
            }
            Err(e @ PrepifyError::Persistence(_)) => {
                println!("Could not store the results: {}", e);
                if !confirm("Retry?")? {
                    if let Some(id) = controller.interview_id() {
                        println!("Run `prepify report {}` later to retry.", &id[..8]);
                    }
                    break;
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

enum RecordingOutcome {
    /// The user ended the answer; commit it via stop_recording
    Stopped,
    /// The countdown expired and the question was force-advanced
    TimedOut,
}

/// Pump speech segments while counting the answer budget down once per
/// second. Returns when the user ends the answer or the budget expires.
async fn drive_recording(
    controller: &mut InterviewSessionController,
) -> crate::Result<RecordingOutcome> {
    let tick_period = Duration::from_secs(1);
    let mut last_tick = tokio::time::Instant::now();

    loop {
        let until_tick = tick_period.saturating_sub(last_tick.elapsed());
        match tokio::time::timeout(until_tick, controller.pump_speech()).await {
            Ok(Ok(true)) => {}
            Ok(Ok(false)) => return Ok(RecordingOutcome::Stopped),
            Ok(Err(e)) => return Err(e),
            Err(_) => {}
        }

        if last_tick.elapsed() >= tick_period {
            last_tick = tokio::time::Instant::now();
            match controller.tick() {
                Tick::Expired => {
                    controller.advance_question().await?;
                    return Ok(RecordingOutcome::TimedOut);
                }
                Tick::Counting(secs) if secs == 30 || secs == 10 => {
                    println!("  {} remaining", format_clock(secs));
                }
                _ => {}
            }
        }
    }
}

async fn extract_resume(settings: &Settings, path: &std::path::Path) -> Result<String> {
    let extractor = ResumeExtractor::from_settings(settings)?;
    extractor.extract_file(path).await
}

/// List past interview sessions
pub async fn list_interviews(
    settings: &Settings,
    limit: usize,
    creator: Option<String>,
) -> Result<()> {
    let repo = Repository::new(settings)?;
    let interviews = repo.list_recent(creator.as_deref(), limit)?;

    if interviews.is_empty() {
        println!("No interviews found");
        return Ok(());
    }

    println!(
        "{:<10} {:<28} {:<12} {:<10} {:<8}",
        "ID", "Position", "Date", "Questions", "Report"
    );
    println!("{}", "-".repeat(72));

    for interview in interviews {
        let has_report = repo.get_report(&interview.id)?.is_some();
        println!(
            "{:<10} {:<28} {:<12} {:<10} {:<8}",
            &interview.id[..8],
            truncate(&interview.job_position, 26),
            interview.created_at.format("%Y-%m-%d"),
            interview.questions.len(),
            if has_report { "yes" } else { "-" },
        );
    }

    Ok(())
}

/// Show the report for a session, creating it lazily on first view
pub async fn show_report(settings: &Settings, id: &str) -> Result<()> {
    let repo = Repository::new(settings)?;

    let interview = repo.find_interview(id)?.context("Interview not found")?;

    // Skill categorization needs the coach; without one the report falls
    // back to uniform skill scores.
    let coach = match build_coach(settings) {
        Ok(coach) => Some(coach),
        Err(e) => {
            tracing::warn!("LLM coach unavailable, skill scores will use the fallback: {}", e);
            None
        }
    };

    let report = report::generate_or_load(&repo, coach.as_deref(), &interview.id).await?;
    print_report(&report);

    Ok(())
}

/// Handle configuration commands
pub fn config_command(settings: &Settings, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let content = toml::to_string_pretty(settings)?;
            println!("{}", content);
        }
        ConfigCommand::Path => {
            println!("{}", Settings::config_path()?.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}

// Output helpers

fn print_feedback(feedback: &Feedback) {
    println!();
    println!("Rating: {}/100", feedback.rating);
    if !feedback.strengths.is_empty() {
        println!("Strengths:");
        for strength in &feedback.strengths {
            println!("  + {}", strength);
        }
    }
    if !feedback.improvements.is_empty() {
        println!("Areas to improve:");
        for improvement in &feedback.improvements {
            println!("  - {}", improvement);
        }
    }
    if let Some(advice) = &feedback.advice {
        println!("Advice: {}", advice);
    }
}

fn print_report(report: &ReportRecord) {
    println!();
    println!("Interview report: {}", report.job_position);
    println!("  Overall score:       {:>3}/100", report.overall_score.value());
    println!(
        "  Communication:       {:>3}/100  {}",
        report.communication_score.value(), report.detail.communication_feedback
    );
    println!(
        "  Technical knowledge: {:>3}/100  {}",
        report.technical_knowledge_score.value(), report.detail.technical_knowledge_feedback
    );
    println!(
        "  Problem solving:     {:>3}/100  {}",
        report.problem_solving_score.value(), report.detail.problem_solving_feedback
    );
    println!(
        "  Answered {} of {} questions",
        report.answered_count, report.question_count
    );
    if !report.strengths.is_empty() {
        println!("  Key strengths: {}", report.strengths);
    }
    if !report.improvements.is_empty() {
        println!("  Improvements:  {}", report.improvements);
    }

    if !report.detail.answers.is_empty() {
        println!();
        println!("Per-question ratings:");
        for (i, digest) in report.detail.answers.iter().enumerate() {
            let rating = digest
                .rating
                .map(|r| format!("{:>3}/100", r.value()))
                .unwrap_or_else(|| "   -   ".to_string());
            println!("  {}. [{}] {}", i + 1, rating, truncate(&digest.question, 60));
        }
    }

    println!();
    println!("Report ID: {}", &report.interview_id[..8]);
}

// Input helpers

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn confirm(prompt: &str) -> Result<bool> {
    let answer = prompt_line(&format!("{} [Y/n] ", prompt))?;
    Ok(!answer.eq_ignore_ascii_case("n"))
}

fn wait_enter(prompt: &str) -> Result<()> {
    prompt_line(prompt).map(|_| ())
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "local".to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", prefix)
    }
}
