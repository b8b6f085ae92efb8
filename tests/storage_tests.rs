mod common;

use anyhow::Result;

use common::{feedback_of_5, sample_plan, sample_questions, temp_repo};
use prepify::report::build_report;
use prepify::storage::AnswerRecord;

#[test]
fn repository_supports_core_session_workflow() -> Result<()> {
    let (_tmp, repo) = temp_repo();

    let plan = sample_plan(3);
    let interview = repo.create_interview(&plan, sample_questions(3))?;

    // Answers arrive out of order; reads come back in question order
    for index in [1usize, 0, 2] {
        let feedback = feedback_of_5(4);
        let answer = AnswerRecord::new(
            interview.id.clone(),
            index,
            format!("Interview question {}", index + 1),
            format!("A sufficiently long answer number {}", index + 1),
            Some(&feedback),
        );
        repo.record_answer(&answer)?;
    }

    let answers = repo.answers_for(&interview.id)?;
    assert_eq!(answers.len(), 3);
    let indexes: Vec<_> = answers.iter().map(|a| a.question_index).collect();
    assert_eq!(indexes, vec![0, 1, 2]);
    assert_eq!(answers[0].rating.unwrap().value(), 80);
    assert_eq!(answers[0].strengths, vec!["Strength at level 4"]);

    // Report creation is guarded by an existence check
    let report = build_report(&interview, &answers, None);
    assert!(repo.save_report(&report)?);
    assert!(!repo.save_report(&report)?);

    let stored = repo.get_report(&interview.id)?.expect("report stored");
    assert_eq!(stored.overall_score.value(), 80);
    assert_eq!(stored.question_count, 3);
    assert_eq!(stored.answered_count, 3);
    assert_eq!(stored.detail.answers.len(), 3);

    Ok(())
}

#[test]
fn interview_round_trips_its_question_set() -> Result<()> {
    let (_tmp, repo) = temp_repo();

    let interview = repo.create_interview(&sample_plan(2), sample_questions(2))?;

    let loaded = repo.get_interview(&interview.id)?.expect("interview stored");
    assert_eq!(loaded.job_position, "Backend Engineer");
    assert_eq!(loaded.questions.len(), 2);
    assert_eq!(loaded.questions[0].text, "Interview question 1");
    assert_eq!(
        loaded.questions[0].skill_tested.as_deref(),
        Some("Problem Solving")
    );

    // Prefix lookup, the way the CLI resolves short ids
    let by_prefix = repo.find_interview(&interview.id[..8])?.expect("found");
    assert_eq!(by_prefix.id, interview.id);

    Ok(())
}

#[test]
fn listing_filters_by_creator_and_respects_limit() -> Result<()> {
    let (_tmp, repo) = temp_repo();

    let mut other_plan = sample_plan(1);
    other_plan.created_by = "someone-else@example.com".to_string();

    repo.create_interview(&sample_plan(1), sample_questions(1))?;
    repo.create_interview(&sample_plan(1), sample_questions(1))?;
    repo.create_interview(&other_plan, sample_questions(1))?;

    assert_eq!(repo.list_recent(None, 10)?.len(), 3);
    assert_eq!(repo.list_recent(None, 2)?.len(), 2);

    let mine = repo.list_recent(Some("candidate@example.com"), 10)?;
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|i| i.created_by == "candidate@example.com"));

    Ok(())
}

#[test]
fn answer_slot_is_write_once() -> Result<()> {
    let (_tmp, repo) = temp_repo();

    let interview = repo.create_interview(&sample_plan(1), sample_questions(1))?;

    let first = AnswerRecord::new(
        interview.id.clone(),
        0,
        "Interview question 1".to_string(),
        "The original answer".to_string(),
        None,
    );
    repo.record_answer(&first)?;

    let mut second = first.clone();
    second.answer = "A replacement that must not stick".to_string();
    repo.record_answer(&second)?;

    let answers = repo.answers_for(&interview.id)?;
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].answer, "The original answer");

    Ok(())
}

#[test]
fn answers_without_feedback_store_no_rating() -> Result<()> {
    let (_tmp, repo) = temp_repo();

    let interview = repo.create_interview(&sample_plan(1), sample_questions(1))?;

    let answer = AnswerRecord::new(
        interview.id.clone(),
        0,
        "Interview question 1".to_string(),
        "An answer whose evaluation failed".to_string(),
        None,
    );
    repo.record_answer(&answer)?;

    let answers = repo.answers_for(&interview.id)?;
    assert!(answers[0].rating.is_none());
    assert!(answers[0].strengths.is_empty());
    assert!(answers[0].advice.is_none());

    Ok(())
}
