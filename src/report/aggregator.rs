//! Report aggregation

use anyhow::{Context, Result};
use chrono::Utc;

use crate::llm::{InterviewCoach, SkillAnalysisRequest};
use crate::report::Score;
use crate::session::SkillAnalysis;
use crate::storage::{AnswerDigest, AnswerRecord, InterviewRecord, ReportDetail, ReportRecord, Repository};

/// Explanation used when per-skill scores fall back to the overall score.
const FALLBACK_SKILL_NOTE: &str = "Based on overall performance assessment";

/// Rounded mean of the rated answers. Answers without a rating (failed
/// evaluations) are excluded; `None` when nothing was rated.
pub fn overall_score(answers: &[AnswerRecord]) -> Option<Score> {
    Score::mean(answers.iter().filter_map(|a| a.rating))
}

/// Deduplicated highlights across answers, first occurrence wins, capped at
/// five and comma-joined.
pub fn collect_highlights<'a, F>(answers: &'a [AnswerRecord], pick: F) -> String
where
    F: Fn(&'a AnswerRecord) -> &'a [String],
{
    let mut seen = Vec::new();
    for answer in answers {
        for item in pick(answer) {
            let item = item.trim();
            if item.is_empty() || seen.iter().any(|s: &&str| s.eq_ignore_ascii_case(item)) {
                continue;
            }
            seen.push(item);
            if seen.len() == 5 {
                return seen.join(", ");
            }
        }
    }
    seen.join(", ")
}

/// Build the report for an interview from its stored answers.
///
/// Deterministic given the same inputs. When no skill analysis is
/// available, every skill dimension falls back to the overall score.
pub fn build_report(
    interview: &InterviewRecord,
    answers: &[AnswerRecord],
    skills: Option<&SkillAnalysis>,
) -> ReportRecord {
    let overall = overall_score(answers).unwrap_or(Score::ZERO);

    let (communication, technical_knowledge, problem_solving, detail_feedback) = match skills {
        Some(analysis) => (
            analysis.communication,
            analysis.technical_knowledge,
            analysis.problem_solving,
            (
                analysis.communication_feedback.clone(),
                analysis.technical_knowledge_feedback.clone(),
                analysis.problem_solving_feedback.clone(),
            ),
        ),
        None => (
            overall,
            overall,
            overall,
            (
                FALLBACK_SKILL_NOTE.to_string(),
                FALLBACK_SKILL_NOTE.to_string(),
                FALLBACK_SKILL_NOTE.to_string(),
            ),
        ),
    };

    let detail = ReportDetail {
        communication_feedback: detail_feedback.0,
        technical_knowledge_feedback: detail_feedback.1,
        problem_solving_feedback: detail_feedback.2,
        answers: answers
            .iter()
            .map(|a| AnswerDigest {
                question: a.question.clone(),
                rating: a.rating,
                advice: a.advice.clone(),
            })
            .collect(),
    };

    ReportRecord {
        id: 0,
        interview_id: interview.id.clone(),
        job_position: interview.job_position.clone(),
        overall_score: overall,
        communication_score: communication,
        technical_knowledge_score: technical_knowledge,
        problem_solving_score: problem_solving,
        strengths: collect_highlights(answers, |a| a.strengths.as_slice()),
        improvements: collect_highlights(answers, |a| a.improvements.as_slice()),
        question_count: interview.questions.len(),
        answered_count: answers.len(),
        detail,
        created_at: Utc::now(),
    }
}

/// Load the stored report for an interview, creating it on first view.
///
/// Creation is first-write-wins: an existing row is returned untouched, so
/// re-entering the report never recomputes or overwrites it. The skill
/// categorization pass is optional; when the coach is unavailable or the
/// pass fails, skill scores fall back to the overall score.
pub async fn generate_or_load(
    repo: &Repository,
    coach: Option<&dyn InterviewCoach>,
    interview_id: &str,
) -> Result<ReportRecord> {
    if let Some(existing) = repo.get_report(interview_id)? {
        return Ok(existing);
    }

    let interview = repo
        .get_interview(interview_id)?
        .with_context(|| format!("Interview {} not found", interview_id))?;
    let answers = repo.answers_for(interview_id)?;

    let skills = match coach {
        Some(coach) if !answers.is_empty() => {
            match coach
                .analyze_skills(SkillAnalysisRequest {
                    job_position: &interview.job_position,
                    answers: &answers,
                })
                .await
            {
                Ok(analysis) => Some(analysis),
                Err(e) => {
                    tracing::warn!("Skill analysis failed, using overall score fallback: {}", e);
                    None
                }
            }
        }
        _ => None,
    };

    let report = build_report(&interview, &answers, skills.as_ref());

    if !repo.save_report(&report)? {
        // Lost the race to another writer; the stored row wins.
        return repo
            .get_report(interview_id)?
            .context("Report disappeared after existence check");
    }

    repo.get_report(interview_id)?
        .context("Report missing right after insert")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Feedback, Question, SessionPlan};

    fn interview_with_questions(count: usize) -> InterviewRecord {
        let plan = SessionPlan {
            job_position: "Backend Engineer".to_string(),
            job_description: "Rust services".to_string(),
            experience_years: "3".to_string(),
            resume_text: None,
            created_by: "test@example.com".to_string(),
            question_count: count,
        };
        let questions = (0..count)
            .map(|i| Question {
                text: format!("Question {}", i + 1),
                skill_tested: None,
                ideal_answer_elements: Vec::new(),
            })
            .collect();
        InterviewRecord::new(&plan, questions)
    }

    fn rated_answer(interview_id: &str, index: usize, rating_of_5: u8) -> AnswerRecord {
        let feedback = Feedback {
            rating: Score::from_scale_of_5(rating_of_5).unwrap(),
            strengths: vec![format!("Strength {}", index)],
            improvements: vec![format!("Improvement {}", index)],
            advice: None,
        };
        AnswerRecord::new(
            interview_id.to_string(),
            index,
            format!("Question {}", index + 1),
            "A sufficiently long answer".to_string(),
            Some(&feedback),
        )
    }

    #[test]
    fn overall_score_is_normalized_rounded_mean() {
        let interview = interview_with_questions(3);
        let answers: Vec<_> = [3u8, 4, 5]
            .into_iter()
            .enumerate()
            .map(|(i, r)| rated_answer(&interview.id, i, r))
            .collect();

        // [3,4,5] on a 1-5 scale -> round(mean * 20) = 80
        assert_eq!(overall_score(&answers).unwrap().value(), 80);
    }

    #[test]
    fn unrated_answers_are_excluded_from_the_mean() {
        let interview = interview_with_questions(3);
        let mut answers = vec![
            rated_answer(&interview.id, 0, 5),
            rated_answer(&interview.id, 1, 3),
        ];
        answers.insert(
            1,
            AnswerRecord::new(
                interview.id.clone(),
                2,
                "Question 3".to_string(),
                "Answer without feedback".to_string(),
                None,
            ),
        );

        // Mean over [100, 60] only
        assert_eq!(overall_score(&answers).unwrap().value(), 80);
    }

    #[test]
    fn fallback_assigns_overall_score_to_every_skill() {
        let interview = interview_with_questions(3);
        let answers: Vec<_> = [3u8, 4, 5]
            .into_iter()
            .enumerate()
            .map(|(i, r)| rated_answer(&interview.id, i, r))
            .collect();

        let report = build_report(&interview, &answers, None);
        assert_eq!(report.overall_score.value(), 80);
        assert_eq!(report.communication_score.value(), 80);
        assert_eq!(report.technical_knowledge_score.value(), 80);
        assert_eq!(report.problem_solving_score.value(), 80);
        assert_eq!(report.detail.communication_feedback, FALLBACK_SKILL_NOTE);
        assert_eq!(report.question_count, 3);
        assert_eq!(report.answered_count, 3);
    }

    #[test]
    fn skill_analysis_overrides_fallback() {
        let interview = interview_with_questions(1);
        let answers = vec![rated_answer(&interview.id, 0, 4)];

        let skills = SkillAnalysis {
            communication: Score::from_scale_of_5(4).unwrap(),
            technical_knowledge: Score::from_scale_of_5(2).unwrap(),
            problem_solving: Score::from_scale_of_5(5).unwrap(),
            communication_feedback: "Clear".to_string(),
            technical_knowledge_feedback: "Shallow".to_string(),
            problem_solving_feedback: "Creative".to_string(),
        };

        let report = build_report(&interview, &answers, Some(&skills));
        assert_eq!(report.communication_score.value(), 80);
        assert_eq!(report.technical_knowledge_score.value(), 40);
        assert_eq!(report.problem_solving_score.value(), 100);
        assert_eq!(report.detail.technical_knowledge_feedback, "Shallow");
    }

    #[test]
    fn highlights_are_deduplicated_and_capped() {
        let interview = interview_with_questions(1);
        let mut answers = Vec::new();
        for i in 0..4 {
            let feedback = Feedback {
                rating: Score::from_scale_of_5(3).unwrap(),
                strengths: vec![
                    "Clear structure".to_string(),
                    format!("Unique strength {}", i),
                ],
                improvements: Vec::new(),
                advice: None,
            };
            answers.push(AnswerRecord::new(
                interview.id.clone(),
                i,
                format!("Question {}", i + 1),
                "Answer".to_string(),
                Some(&feedback),
            ));
        }

        let highlights = collect_highlights(&answers, |a| a.strengths.as_slice());
        let items: Vec<_> = highlights.split(", ").collect();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0], "Clear structure");
        assert_eq!(items.iter().filter(|s| **s == "Clear structure").count(), 1);
    }
}
