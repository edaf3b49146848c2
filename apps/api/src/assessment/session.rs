//! The per-user assessment session.
//!
//! ```text
//! intro ──start──▶ assessment(i of N) ──next on last──▶ submitting ──▶ results
//!   ▲                  │  ▲                                  │
//!   │                  └──┘ next / previous                  │ persistence failed
//!   │                                                        ▼
//!   └──────────── retake (from any state) ◀──── assessment(N-1 of N)
//! ```
//!
//! `completed` is entered on load when a stored result already exists.
//! Sessions are held in memory only.

use serde::Serialize;
use thiserror::Error;

use crate::assessment::models::{
    AnalysisResult, AnswerValue, AssessmentQuestionSet, AssessmentResult, Question,
    QuestionKind, ResponseSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Intro,
    Assessment,
    Submitting,
    Results,
    Completed,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Intro => "intro",
            Step::Assessment => "assessment",
            Step::Submitting => "submitting",
            Step::Results => "results",
            Step::Completed => "completed",
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No assessment has been loaded; load the assessment first")]
    NotLoaded,

    #[error("Cannot {action} while the assessment is in the '{}' step", .step.as_str())]
    InvalidTransition { action: &'static str, step: Step },

    #[error("The assessment has no questions")]
    NoQuestions,

    #[error("Question '{0}' requires an answer")]
    AnswerRequired(String),

    #[error("Question '{0}' is not part of this assessment")]
    UnknownQuestion(String),

    #[error("Answer does not fit question '{0}'")]
    InvalidAnswer(String),
}

/// Result of `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved,
    /// The last question was answered; the caller must run the analysis and
    /// then call `finish` or `abort_submit`.
    Submit,
}

#[derive(Debug, Clone)]
pub struct AssessmentSession {
    step: Step,
    questions: Option<AssessmentQuestionSet>,
    current_index: usize,
    responses: ResponseSet,
    analysis: Option<AnalysisResult>,
    result: Option<AssessmentResult>,
}

/// Whether `answer` satisfies `question.required`.
pub fn is_answered(question: &Question, answer: Option<&AnswerValue>) -> bool {
    if !question.required {
        return true;
    }
    match (question.kind, answer) {
        (QuestionKind::MultiChoice, Some(AnswerValue::Choices(items))) => !items.is_empty(),
        (QuestionKind::MultiChoice, _) => false,
        (_, Some(AnswerValue::Text(s))) => !s.is_empty(),
        (_, Some(_)) => true,
        (_, None) => false,
    }
}

fn fits(question: &Question, answer: &AnswerValue) -> bool {
    match (question.kind, answer) {
        (QuestionKind::SingleChoice | QuestionKind::FreeText, AnswerValue::Text(_)) => true,
        (QuestionKind::MultiChoice, AnswerValue::Choices(_)) => true,
        (QuestionKind::Scale, AnswerValue::Number(n)) => match &question.scale_range {
            Some(range) => *n >= range.min as f64 && *n <= range.max as f64,
            None => true,
        },
        (QuestionKind::Other, _) => true,
        _ => false,
    }
}

impl AssessmentSession {
    /// A fresh session waiting on the intro screen.
    pub fn intro(questions: AssessmentQuestionSet) -> Self {
        Self {
            step: Step::Intro,
            questions: Some(questions),
            current_index: 0,
            responses: ResponseSet::new(),
            analysis: None,
            result: None,
        }
    }

    /// A session opened for a user who already has a stored result.
    pub fn completed(result: AssessmentResult) -> Self {
        Self {
            step: Step::Completed,
            questions: None,
            current_index: 0,
            responses: ResponseSet::new(),
            analysis: result.full_analysis.clone(),
            result: Some(result),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn questions(&self) -> Option<&AssessmentQuestionSet> {
        self.questions.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn result(&self) -> Option<&AssessmentResult> {
        self.result.as_ref()
    }

    pub fn question_count(&self) -> usize {
        self.questions.as_ref().map_or(0, |q| q.questions.len())
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.step != Step::Assessment {
            return None;
        }
        self.questions.as_ref()?.questions.get(self.current_index)
    }

    pub fn is_current_answered(&self) -> bool {
        self.current_question()
            .is_some_and(|q| is_answered(q, self.responses.get(&q.id)))
    }

    fn expect_step(&self, expected: Step, action: &'static str) -> Result<(), SessionError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                action,
                step: self.step,
            })
        }
    }

    /// intro → first question.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.expect_step(Step::Intro, "start")?;
        if self.question_count() == 0 {
            return Err(SessionError::NoQuestions);
        }
        self.step = Step::Assessment;
        self.current_index = 0;
        Ok(())
    }

    /// Records (or replaces) the answer to any question of the set.
    pub fn record_answer(
        &mut self,
        question_id: &str,
        answer: AnswerValue,
    ) -> Result<(), SessionError> {
        self.expect_step(Step::Assessment, "answer")?;
        let question = self
            .questions
            .as_ref()
            .and_then(|set| set.question(question_id))
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))?;
        if !fits(question, &answer) {
            return Err(SessionError::InvalidAnswer(question_id.to_string()));
        }
        self.responses.insert(question_id.to_string(), answer);
        Ok(())
    }

    /// Moves to the next question, or into `submitting` from the last one.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        self.expect_step(Step::Assessment, "advance")?;
        if let Some(question) = self.current_question() {
            if !is_answered(question, self.responses.get(&question.id)) {
                return Err(SessionError::AnswerRequired(question.id.clone()));
            }
        }

        if self.current_index + 1 < self.question_count() {
            self.current_index += 1;
            Ok(Advance::Moved)
        } else {
            self.step = Step::Submitting;
            Ok(Advance::Submit)
        }
    }

    /// Back one question. A no-op on the first question.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        self.expect_step(Step::Assessment, "go back")?;
        self.current_index = self.current_index.saturating_sub(1);
        Ok(())
    }

    /// submitting → results.
    pub fn finish(
        &mut self,
        analysis: AnalysisResult,
        result: AssessmentResult,
    ) -> Result<(), SessionError> {
        self.expect_step(Step::Submitting, "finish")?;
        self.step = Step::Results;
        self.analysis = Some(analysis);
        self.result = Some(result);
        Ok(())
    }

    /// submitting → back on the last question, answers kept.
    pub fn abort_submit(&mut self) {
        if self.step == Step::Submitting {
            self.step = Step::Assessment;
            self.current_index = self.question_count().saturating_sub(1);
        }
    }

    /// Back to intro with an empty response set. `questions` replaces the set
    /// when given; otherwise the current one is kept.
    pub fn retake(&mut self, questions: Option<AssessmentQuestionSet>) -> Result<(), SessionError> {
        if self.step == Step::Submitting {
            return Err(SessionError::InvalidTransition {
                action: "retake",
                step: self.step,
            });
        }
        if let Some(questions) = questions {
            self.questions = Some(questions);
        }
        self.step = Step::Intro;
        self.current_index = 0;
        self.responses.clear();
        self.analysis = None;
        self.result = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::fallback::default_question_set;

    fn answer_all(session: &mut AssessmentSession) {
        let answers = [
            ("q1", AnswerValue::Text("Mathematics and Logic".to_string())),
            ("q2", AnswerValue::Text("A quiet lab".to_string())),
            ("q3", AnswerValue::Number(7.0)),
            ("q4", AnswerValue::Text("Alone".to_string())),
            ("q5", AnswerValue::Choices(vec!["Leadership".to_string()])),
        ];
        for (id, value) in answers {
            session.record_answer(id, value).unwrap();
            session.advance().unwrap();
        }
    }

    #[test]
    fn test_walk_through_to_submitting() {
        let mut session = AssessmentSession::intro(default_question_set());
        assert_eq!(session.step(), Step::Intro);
        session.start().unwrap();
        assert_eq!(session.current_question().unwrap().id, "q1");

        answer_all(&mut session);
        assert_eq!(session.step(), Step::Submitting);
        assert_eq!(session.responses().len(), 5);

        session
            .finish(AnalysisResult::default(), AssessmentResult::default())
            .unwrap();
        assert_eq!(session.step(), Step::Results);
    }

    #[test]
    fn test_required_answer_blocks_advance() {
        let mut session = AssessmentSession::intro(default_question_set());
        session.start().unwrap();
        assert!(matches!(
            session.advance(),
            Err(SessionError::AnswerRequired(id)) if id == "q1"
        ));

        session
            .record_answer("q1", AnswerValue::Text(String::new()))
            .unwrap();
        assert!(!session.is_current_answered());
        assert!(session.advance().is_err());
    }

    #[test]
    fn test_multi_select_needs_a_choice() {
        let mut set = default_question_set();
        set.questions.retain(|q| q.id == "q5");
        let mut session = AssessmentSession::intro(set);
        session.start().unwrap();
        session
            .record_answer("q5", AnswerValue::Choices(vec![]))
            .unwrap();
        assert!(!session.is_current_answered());
        session
            .record_answer("q5", AnswerValue::Choices(vec!["Leadership".to_string()]))
            .unwrap();
        assert!(session.is_current_answered());
    }

    #[test]
    fn test_optional_question_always_passes() {
        let mut set = default_question_set();
        set.questions[0].required = false;
        let mut session = AssessmentSession::intro(set);
        session.start().unwrap();
        assert_eq!(session.advance().unwrap(), Advance::Moved);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_answer_shape_and_range_checked() {
        let mut session = AssessmentSession::intro(default_question_set());
        session.start().unwrap();
        assert!(matches!(
            session.record_answer("q3", AnswerValue::Number(11.0)),
            Err(SessionError::InvalidAnswer(_))
        ));
        assert!(matches!(
            session.record_answer("q5", AnswerValue::Text("Leadership".to_string())),
            Err(SessionError::InvalidAnswer(_))
        ));
        assert!(matches!(
            session.record_answer("q9", AnswerValue::Text("x".to_string())),
            Err(SessionError::UnknownQuestion(_))
        ));
    }

    #[test]
    fn test_previous_stops_at_first_question() {
        let mut session = AssessmentSession::intro(default_question_set());
        session.start().unwrap();
        session.previous().unwrap();
        assert_eq!(session.current_index(), 0);

        session
            .record_answer("q1", AnswerValue::Text("Arts and Creativity".to_string()))
            .unwrap();
        session.advance().unwrap();
        session.previous().unwrap();
        assert_eq!(session.current_question().unwrap().id, "q1");
        assert_eq!(
            session.responses()["q1"],
            AnswerValue::Text("Arts and Creativity".to_string())
        );
    }

    #[test]
    fn test_abort_submit_returns_to_last_question() {
        let mut session = AssessmentSession::intro(default_question_set());
        session.start().unwrap();
        answer_all(&mut session);
        session.abort_submit();
        assert_eq!(session.step(), Step::Assessment);
        assert_eq!(session.current_question().unwrap().id, "q5");
        assert_eq!(session.responses().len(), 5);
    }

    #[test]
    fn test_retake_clears_responses() {
        let mut session = AssessmentSession::intro(default_question_set());
        session.start().unwrap();
        answer_all(&mut session);
        session
            .finish(AnalysisResult::default(), AssessmentResult::default())
            .unwrap();

        session.retake(None).unwrap();
        assert_eq!(session.step(), Step::Intro);
        assert!(session.responses().is_empty());
        assert!(session.result().is_none());
        assert_eq!(session.question_count(), 5);
    }

    #[test]
    fn test_completed_session_cannot_start_without_questions() {
        let mut session = AssessmentSession::completed(AssessmentResult::default());
        assert!(matches!(
            session.start(),
            Err(SessionError::InvalidTransition { .. })
        ));
        session.retake(None).unwrap();
        assert!(matches!(session.start(), Err(SessionError::NoQuestions)));
    }

    #[test]
    fn test_transitions_outside_assessment_rejected() {
        let mut session = AssessmentSession::intro(default_question_set());
        assert!(session.advance().is_err());
        assert!(session.previous().is_err());
        assert!(session
            .record_answer("q1", AnswerValue::Text("x".to_string()))
            .is_err());
    }
}
