#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use prepify::llm::{EvaluationRequest, InterviewCoach, QuestionRequest, SkillAnalysisRequest};
use prepify::media::{MediaAccess, MediaPermissions};
use prepify::report::Score;
use prepify::session::{Feedback, Question, SessionPlan, SkillAnalysis};
use prepify::storage::Repository;
use prepify::transcription::{SpeechRecognizer, SpeechSegment, SpeechSource};
use prepify::PrepifyError;

// Fixtures

pub fn sample_plan(question_count: usize) -> SessionPlan {
    SessionPlan {
        job_position: "Backend Engineer".to_string(),
        job_description: "Build and operate Rust services".to_string(),
        experience_years: "3".to_string(),
        resume_text: None,
        created_by: "candidate@example.com".to_string(),
        question_count,
    }
}

pub fn sample_questions(count: usize) -> Vec<Question> {
    (0..count)
        .map(|i| Question {
            text: format!("Interview question {}", i + 1),
            skill_tested: Some("Problem Solving".to_string()),
            ideal_answer_elements: vec!["Use a concrete example".to_string()],
        })
        .collect()
}

/// Feedback with a rating given on the 1-5 scale.
pub fn feedback_of_5(rating: u8) -> Feedback {
    Feedback {
        rating: Score::from_scale_of_5(rating).expect("rating in range"),
        strengths: vec![format!("Strength at level {}", rating)],
        improvements: vec![format!("Improvement at level {}", rating)],
        advice: Some("Structure the answer with STAR.".to_string()),
    }
}

pub fn long_answer() -> Vec<SpeechSegment> {
    vec![
        SpeechSegment::interim("I led"),
        SpeechSegment::final_text("I led the migration of our payment pipeline"),
        SpeechSegment::final_text("and cut deploy times in half"),
    ]
}

pub fn short_answer() -> Vec<SpeechSegment> {
    vec![SpeechSegment::final_text("yes")]
}

pub fn temp_repo() -> (TempDir, Repository) {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let repo = Repository::open_path(&tmp.path().join("prepify.db")).expect("open repository");
    (tmp, repo)
}

// Fake media manager

pub struct FakeMedia {
    grants: VecDeque<bool>,
    permissions: MediaPermissions,
    released: Arc<AtomicBool>,
}

impl FakeMedia {
    /// Grants on every acquisition.
    pub fn granting() -> Self {
        Self::with_script(Vec::new())
    }

    /// Follows the scripted outcomes, then grants.
    pub fn with_script(script: Vec<bool>) -> Self {
        Self {
            grants: script.into(),
            permissions: MediaPermissions::default(),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn release_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }
}

#[async_trait]
impl MediaAccess for FakeMedia {
    async fn acquire(&mut self) -> prepify::Result<MediaPermissions> {
        let grant = self.grants.pop_front().unwrap_or(true);
        if grant {
            self.permissions = MediaPermissions::all_granted();
            Ok(self.permissions)
        } else {
            self.permissions = MediaPermissions::default();
            Err(PrepifyError::DeviceUnavailable(
                "camera permission denied".to_string(),
            ))
        }
    }

    fn permissions(&self) -> MediaPermissions {
        self.permissions
    }

    fn release(&mut self) {
        self.permissions = MediaPermissions::default();
        self.released.store(true, Ordering::SeqCst);
    }
}

// Scripted speech recognizer

pub struct ScriptedRecognizer {
    sessions: Mutex<VecDeque<Vec<SpeechSegment>>>,
    supported: bool,
}

impl ScriptedRecognizer {
    /// One inner vec per recording window, in order.
    pub fn with_sessions(sessions: Vec<Vec<SpeechSegment>>) -> Self {
        Self {
            sessions: Mutex::new(sessions.into()),
            supported: true,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            sessions: Mutex::new(VecDeque::new()),
            supported: false,
        }
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn open_session(&self) -> prepify::Result<Box<dyn SpeechSource>> {
        if !self.supported {
            return Err(PrepifyError::UnsupportedEnvironment(
                "no speech engine in this environment".to_string(),
            ));
        }
        let script = self
            .sessions
            .lock()
            .expect("recognizer lock")
            .pop_front()
            .unwrap_or_default();
        Ok(Box::new(ScriptedSource {
            segments: script.into(),
        }))
    }
}

pub struct ScriptedSource {
    segments: VecDeque<SpeechSegment>,
}

#[async_trait]
impl SpeechSource for ScriptedSource {
    async fn next_segment(&mut self) -> prepify::Result<Option<SpeechSegment>> {
        Ok(self.segments.pop_front())
    }
}

// Fake interview coach

pub struct FakeCoach {
    questions: Vec<Question>,
    generation_failures: AtomicUsize,
    evaluations: Mutex<VecDeque<anyhow::Result<Feedback>>>,
    skills: Mutex<Option<SkillAnalysis>>,
    pub generate_calls: AtomicUsize,
}

impl FakeCoach {
    pub fn with_questions(count: usize) -> Self {
        Self {
            questions: sample_questions(count),
            generation_failures: AtomicUsize::new(0),
            evaluations: Mutex::new(VecDeque::new()),
            skills: Mutex::new(None),
            generate_calls: AtomicUsize::new(0),
        }
    }

    /// Fail the first `count` generation calls.
    pub fn failing_generation(self, count: usize) -> Self {
        self.generation_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Script the evaluation outcomes, in order. When the script runs dry,
    /// evaluations succeed with a mid rating.
    pub fn with_evaluations(self, evaluations: Vec<anyhow::Result<Feedback>>) -> Self {
        *self.evaluations.lock().expect("evaluations lock") = evaluations.into();
        self
    }

    pub fn with_skills(self, skills: SkillAnalysis) -> Self {
        *self.skills.lock().expect("skills lock") = Some(skills);
        self
    }
}

#[async_trait]
impl InterviewCoach for FakeCoach {
    async fn generate_questions(
        &self,
        request: QuestionRequest<'_>,
    ) -> anyhow::Result<Vec<Question>> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);

        let remaining = self.generation_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.generation_failures.store(remaining - 1, Ordering::SeqCst);
            anyhow::bail!("upstream question generation failed");
        }

        Ok(self
            .questions
            .iter()
            .take(request.question_count)
            .cloned()
            .collect())
    }

    async fn evaluate_answer(&self, _request: EvaluationRequest<'_>) -> anyhow::Result<Feedback> {
        self.evaluations
            .lock()
            .expect("evaluations lock")
            .pop_front()
            .unwrap_or_else(|| Ok(feedback_of_5(4)))
    }

    async fn analyze_skills(
        &self,
        _request: SkillAnalysisRequest<'_>,
    ) -> anyhow::Result<SkillAnalysis> {
        self.skills
            .lock()
            .expect("skills lock")
            .clone()
            .ok_or_else(|| anyhow::anyhow!("skill analysis unavailable"))
    }
}

// Process-level test environment for CLI tests

pub fn run_prepify(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    data: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            data: tempfile::tempdir().expect("create temporary XDG data dir"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_prepify"))
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env("XDG_DATA_HOME", self.data.path())
            .env_remove("PREPIFY_GEMINI_API_KEY")
            .output()
            .expect("failed to execute prepify binary")
    }

    pub fn config_path(&self) -> PathBuf {
        let output = self.run(&["config", "path"]);
        assert!(
            output.status.success(),
            "config path should succeed\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );

        let path = String::from_utf8_lossy(&output.stdout);
        PathBuf::from(path.trim())
    }
}
