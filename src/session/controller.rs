//! Interview session controller
//!
//! The state machine that runs one practice interview: `Prep -> Setup ->
//! Active -> Completed -> Report`. Owns the current question index, the
//! per-question countdown, the live transcription session, and dispatches
//! to the media manager, the LLM coach, and storage at the right
//! transitions.
//!
//! The controller holds no timers of its own. The driver calls
//! [`InterviewSessionController::tick`] once per second while recording;
//! ticks are suspended whenever a collaborator call is in flight so a slow
//! evaluation can never double-advance a question.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::config::SessionSettings;
use crate::llm::{EvaluationRequest, InterviewCoach, QuestionRequest};
use crate::media::{MediaAccess, MediaPermissions};
use crate::report;
use crate::session::state::{Phase, SessionNotice, Tick};
use crate::session::timer::QuestionCountdown;
use crate::session::types::{Feedback, Question, SessionPlan};
use crate::storage::{AnswerRecord, ReportRecord, Repository};
use crate::transcription::{SpeechRecognizer, SpeechSource, TranscriptionSession};
use crate::{PrepifyError, Result};

/// A live recording window: the accumulating transcript plus the engine
/// stream feeding it.
struct LiveRecording {
    session: TranscriptionSession,
    source: Box<dyn SpeechSource>,
}

pub struct InterviewSessionController {
    plan: SessionPlan,
    settings: SessionSettings,

    phase: Phase,
    media: Box<dyn MediaAccess>,
    coach: Arc<dyn InterviewCoach>,
    recognizer: Box<dyn SpeechRecognizer>,

    interview_id: Option<String>,
    questions: Vec<Question>,
    current_index: usize,

    answers: BTreeMap<usize, String>,
    feedback: BTreeMap<usize, Feedback>,

    countdown: QuestionCountdown,
    recording: Option<LiveRecording>,

    /// A collaborator call is in flight; ticks and new operations are held
    busy: bool,

    /// The countdown already expired for the current question
    expiry_fired: bool,

    /// Question indexes whose answer rows are already durably stored
    persisted: HashSet<usize>,

    notices: Vec<SessionNotice>,
}

impl InterviewSessionController {
    pub fn new(
        plan: SessionPlan,
        settings: &SessionSettings,
        media: Box<dyn MediaAccess>,
        coach: Arc<dyn InterviewCoach>,
        recognizer: Box<dyn SpeechRecognizer>,
    ) -> Self {
        let countdown = QuestionCountdown::new(settings.seconds_per_question);
        Self {
            plan,
            settings: settings.clone(),
            phase: Phase::Prep,
            media,
            coach,
            recognizer,
            interview_id: None,
            questions: Vec::new(),
            current_index: 0,
            answers: BTreeMap::new(),
            feedback: BTreeMap::new(),
            countdown,
            recording: None,
            busy: false,
            expiry_fired: false,
            persisted: HashSet::new(),
            notices: Vec::new(),
        }
    }

    // Transitions

    /// `Prep -> Setup`, on explicit user confirmation.
    pub fn confirm_prep(&mut self) -> Result<()> {
        if self.phase != Phase::Prep {
            return Err(self.bad_transition("confirm_prep"));
        }
        self.phase = Phase::Setup;
        Ok(())
    }

    /// Acquire camera and microphone during `Setup`. A failed acquisition
    /// regresses all permissions and may be retried.
    pub async fn acquire_media(&mut self) -> Result<MediaPermissions> {
        if self.phase != Phase::Setup {
            return Err(self.bad_transition("acquire_media"));
        }
        self.media.acquire().await
    }

    /// `Setup -> Active`: guarded on granted permissions, then generates
    /// the question set and creates the durable interview record.
    ///
    /// On any failure the session stays in `Setup` and the call may be
    /// retried.
    pub async fn begin_interview(&mut self, repo: &Repository) -> Result<()> {
        if self.phase != Phase::Setup {
            return Err(self.bad_transition("begin_interview"));
        }

        if !self.media.permissions().granted() {
            return Err(PrepifyError::DeviceUnavailable(
                "camera and microphone permissions are required".to_string(),
            ));
        }

        let mut questions = self
            .coach
            .generate_questions(QuestionRequest {
                job_position: &self.plan.job_position,
                job_description: &self.plan.job_description,
                experience_years: &self.plan.experience_years,
                resume_text: self.plan.resume_text.as_deref(),
                question_count: self.plan.question_count,
            })
            .await
            .map_err(|e| PrepifyError::QuestionGeneration(e.to_string()))?;
        questions.truncate(self.plan.question_count.max(1));

        let interview = repo
            .create_interview(&self.plan, questions.clone())
            .map_err(|e| PrepifyError::Persistence(e.to_string()))?;

        tracing::info!(
            "Interview {} started with {} questions",
            interview.id,
            questions.len()
        );

        self.interview_id = Some(interview.id);
        self.questions = questions;
        self.current_index = 0;
        self.countdown.reset();
        self.expiry_fired = false;
        self.phase = Phase::Active;
        Ok(())
    }

    /// Open a recording window for the current question.
    ///
    /// Refused while already recording or while an operation is in flight.
    /// Re-recording a question clears its previous feedback.
    pub fn start_recording(&mut self) -> Result<()> {
        if self.phase != Phase::Active {
            return Err(self.bad_transition("start_recording"));
        }
        if self.busy {
            return Err(PrepifyError::InvalidTransition(
                "an operation is still in flight".to_string(),
            ));
        }
        if self.recording.is_some() {
            return Err(PrepifyError::InvalidTransition(
                "already recording".to_string(),
            ));
        }

        let source = self.recognizer.open_session()?;

        self.feedback.remove(&self.current_index);
        self.countdown.reset();
        self.expiry_fired = false;
        self.recording = Some(LiveRecording {
            session: TranscriptionSession::open(),
            source,
        });
        Ok(())
    }

    /// Forward one segment from the speech engine into the live transcript.
    /// Returns `false` once the utterance has ended (or when not recording).
    pub async fn pump_speech(&mut self) -> Result<bool> {
        let Some(recording) = self.recording.as_mut() else {
            return Ok(false);
        };

        match recording.source.next_segment().await? {
            Some(segment) => {
                recording.session.push(segment);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Count down one second of the current recording window.
    ///
    /// Suspended while not recording or while a collaborator call is
    /// outstanding. `Tick::Expired` is returned at most once per question;
    /// the caller must respond to it with [`Self::advance_question`].
    pub fn tick(&mut self) -> Tick {
        if self.phase != Phase::Active || self.recording.is_none() || self.busy {
            return Tick::Idle;
        }

        if self.countdown.tick() {
            if self.expiry_fired {
                return Tick::Idle;
            }
            self.expiry_fired = true;
            return Tick::Expired;
        }

        Tick::Counting(self.countdown.remaining_secs())
    }

    /// Close the recording window and commit the transcript as the current
    /// question's answer.
    ///
    /// A transcript below the capture threshold commits nothing: the error
    /// is recoverable, recording state returns to "not recording", and the
    /// question does not advance. On a successful commit the answer is
    /// evaluated; evaluation failure keeps the answer and surfaces a
    /// notice instead of blocking.
    pub async fn stop_recording(&mut self) -> Result<Option<Feedback>> {
        let Some(mut recording) = self.recording.take() else {
            return Err(PrepifyError::InvalidTransition(
                "not recording".to_string(),
            ));
        };

        let transcript = recording.session.close().trim().to_string();
        let length = transcript.chars().count();
        if length < self.settings.min_answer_chars {
            return Err(PrepifyError::AnswerTooShort {
                got: length,
                min: self.settings.min_answer_chars,
            });
        }

        let index = self.current_index;
        self.answers.insert(index, transcript.clone());
        Ok(self.evaluate_and_store(index, &transcript).await)
    }

    /// Move on to the next question, or leave `Active` after the last one.
    ///
    /// Any live recording is committed the same way a manual stop commits
    /// it (below-threshold transcripts are discarded), transient buffers
    /// are cleared, and the countdown is re-armed for the next question.
    pub async fn advance_question(&mut self) -> Result<Phase> {
        if self.phase != Phase::Active {
            return Err(self.bad_transition("advance_question"));
        }
        if self.busy {
            return Err(PrepifyError::InvalidTransition(
                "an operation is still in flight".to_string(),
            ));
        }

        if let Some(mut recording) = self.recording.take() {
            let transcript = recording.session.close().trim().to_string();
            if transcript.chars().count() >= self.settings.min_answer_chars {
                let index = self.current_index;
                self.answers.insert(index, transcript.clone());
                if !self.feedback.contains_key(&index) {
                    self.evaluate_and_store(index, &transcript).await;
                }
            }
            // Below-threshold transcripts stay uncommitted
        }

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.countdown.reset();
            self.expiry_fired = false;
            Ok(Phase::Active)
        } else {
            self.phase = Phase::Completed;
            self.media.release();
            tracing::info!("Interview completed: all questions visited");
            Ok(Phase::Completed)
        }
    }

    /// `Completed -> Report`: durably store every answered question that is
    /// not stored yet, then load or lazily create the aggregated report.
    ///
    /// Idempotent end to end — answers already persisted this session are
    /// skipped and an existing report row is returned untouched. On
    /// persistence failure the session stays retryable in `Completed`.
    pub async fn finish_report(&mut self, repo: &Repository) -> Result<ReportRecord> {
        if self.phase != Phase::Completed && self.phase != Phase::Report {
            return Err(self.bad_transition("finish_report"));
        }

        let interview_id = self
            .interview_id
            .clone()
            .ok_or_else(|| PrepifyError::Other("session has no interview record".to_string()))?;

        for (&index, answer) in &self.answers {
            if self.persisted.contains(&index) {
                continue;
            }
            let record = AnswerRecord::new(
                interview_id.clone(),
                index,
                self.questions[index].text.clone(),
                answer.clone(),
                self.feedback.get(&index),
            );
            repo.record_answer(&record)
                .map_err(|e| PrepifyError::Persistence(e.to_string()))?;
            self.persisted.insert(index);
        }

        let report = report::generate_or_load(repo, Some(self.coach.as_ref()), &interview_id)
            .await
            .map_err(|e| PrepifyError::Persistence(e.to_string()))?;

        self.phase = Phase::Report;
        Ok(report)
    }

    /// Abandon the session: stop any live recording without committing its
    /// transcript and release the capture devices.
    pub fn abandon(&mut self) {
        if self.recording.take().is_some() {
            tracing::info!("Abandoning session mid-recording; transcript discarded");
        }
        self.busy = false;
        self.media.release();
    }

    // Accessors

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    pub fn interview_id(&self) -> Option<&str> {
        self.interview_id.as_deref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    pub fn permissions(&self) -> MediaPermissions {
        self.media.permissions()
    }

    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn feedback_for(&self, index: usize) -> Option<&Feedback> {
        self.feedback.get(&index)
    }

    /// Live transcript preview for the current recording window.
    pub fn preview_transcript(&self) -> Option<String> {
        self.recording.as_ref().map(|r| r.session.preview())
    }

    /// Drain pending recoverable notices for display.
    pub fn take_notices(&mut self) -> Vec<SessionNotice> {
        std::mem::take(&mut self.notices)
    }

    // Internals

    async fn evaluate_and_store(&mut self, index: usize, transcript: &str) -> Option<Feedback> {
        let question = self.questions[index].text.clone();
        let job_position = self.plan.job_position.clone();
        let coach = Arc::clone(&self.coach);

        self.busy = true;
        let result = coach
            .evaluate_answer(EvaluationRequest {
                question: &question,
                transcript,
                job_position: &job_position,
            })
            .await;
        self.busy = false;

        match result {
            Ok(feedback) => {
                self.feedback.insert(index, feedback.clone());
                Some(feedback)
            }
            Err(e) => {
                tracing::warn!("Evaluation failed for question {}: {}", index + 1, e);
                self.notices.push(SessionNotice::EvaluationFailed {
                    question_index: index,
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    fn bad_transition(&self, operation: &str) -> PrepifyError {
        PrepifyError::InvalidTransition(format!(
            "{} is not allowed in the {} phase",
            operation,
            self.phase.as_str()
        ))
    }
}

impl Drop for InterviewSessionController {
    fn drop(&mut self) {
        // Device release on unmount; safe when already released.
        self.media.release();
    }
}
