//! Report content derived from a normalized result. Everything here is a pure
//! function of the result (and the clock, for retake checks).

use chrono::{DateTime, Months, Utc};
use serde::Serialize;

use crate::assessment::models::AssessmentResult;
use crate::generation::defaults::strings;

/// Results older than this should be retaken.
const RETAKE_AFTER_MONTHS: u32 = 6;
const PROGRESS_COMPONENTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRecommendation {
    pub career: String,
    pub match_percentage: u32,
    pub priority: Priority,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Importance {
    Critical,
    Important,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Course,
    Certification,
    Practice,
    Project,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningResource {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl LearningResource {
    fn new(kind: ResourceKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            url: None,
            priority: None,
        }
    }

    fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    pub skill: String,
    pub importance: Importance,
    pub time_to_learn: String,
    pub resources: Vec<LearningResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningPhase {
    pub phase: String,
    pub duration: String,
    pub skills: Vec<String>,
    pub milestones: Vec<String>,
    pub resources: Vec<LearningResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryInsights {
    pub trends: Vec<String>,
    pub outlook: String,
    pub key_skills: Vec<String>,
    pub average_salary: String,
    pub job_growth: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInsights {
    pub career_recommendations: Vec<CareerRecommendation>,
    pub skill_gap_analysis: Vec<SkillGap>,
    pub learning_path: Vec<LearningPhase>,
    pub industry_insights: IndustryInsights,
    pub progress: u32,
    pub should_retake: bool,
}

impl ReportInsights {
    pub fn build(result: &AssessmentResult, now: DateTime<Utc>) -> Self {
        Self {
            career_recommendations: career_recommendations(result),
            skill_gap_analysis: skill_gap_analysis(result),
            learning_path: learning_path(result),
            industry_insights: industry_insights(result),
            progress: progress(Some(result)),
            should_retake: should_retake(result, now),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Derivations
// ────────────────────────────────────────────────────────────────────────────

pub fn career_recommendations(result: &AssessmentResult) -> Vec<CareerRecommendation> {
    result
        .top_career_matches
        .iter()
        .map(|m| {
            let (priority, reason) = match m.match_percentage {
                85.. => (Priority::High, "Excellent match for your skills and interests"),
                70..=84 => (Priority::Medium, "Good alignment with your profile"),
                _ => (Priority::Low, "Based on your assessment results"),
            };
            CareerRecommendation {
                career: m.career.clone(),
                match_percentage: m.match_percentage,
                priority,
                reason: reason.to_string(),
            }
        })
        .collect()
}

pub fn skill_gap_analysis(result: &AssessmentResult) -> Vec<SkillGap> {
    result
        .skill_gaps
        .iter()
        .map(|skill| {
            let needle = skill.to_lowercase();
            let in_strong_match = result
                .top_career_matches
                .iter()
                .filter(|m| m.match_percentage >= 80)
                .any(|m| {
                    m.required_skills
                        .iter()
                        .any(|req| req.to_lowercase().contains(&needle))
                });

            let time_to_learn = if needle.contains("programming") || needle.contains("data") {
                "3-6 months"
            } else {
                "1-3 months"
            };

            SkillGap {
                skill: skill.clone(),
                importance: if in_strong_match {
                    Importance::Critical
                } else {
                    Importance::Important
                },
                time_to_learn: time_to_learn.to_string(),
                resources: vec![
                    LearningResource {
                        url: Some(format!("/courses?search={}", urlencoding::encode(skill))),
                        ..LearningResource::new(ResourceKind::Course, format!("Learn {skill}"))
                    },
                    LearningResource::new(ResourceKind::Practice, format!("{skill} Practice Projects")),
                ],
            }
        })
        .collect()
}

/// Three fixed phases seeded from the skill gaps. Empty without a career match.
pub fn learning_path(result: &AssessmentResult) -> Vec<LearningPhase> {
    if result.top_career_matches.is_empty() {
        return Vec::new();
    }

    let gaps = &result.skill_gaps;
    let slice = |from: usize, to: usize| -> Vec<String> {
        gaps.iter().skip(from).take(to - from).cloned().collect()
    };

    vec![
        LearningPhase {
            phase: "Foundation (Months 1-3)".to_string(),
            duration: "3 months".to_string(),
            skills: slice(0, 3),
            milestones: strings(&[
                "Complete foundational courses",
                "Build first portfolio project",
                "Join relevant communities",
            ]),
            resources: vec![
                LearningResource::new(ResourceKind::Course, "Foundations Course")
                    .with_priority(Priority::High),
                LearningResource::new(ResourceKind::Project, "Beginner Project")
                    .with_priority(Priority::High),
            ],
        },
        LearningPhase {
            phase: "Development (Months 4-8)".to_string(),
            duration: "5 months".to_string(),
            skills: slice(3, 6),
            milestones: strings(&[
                "Complete intermediate projects",
                "Gain practical experience",
                "Start networking in the field",
            ]),
            resources: vec![
                LearningResource::new(ResourceKind::Project, "Advanced Project")
                    .with_priority(Priority::High),
                LearningResource::new(ResourceKind::Certification, "Professional Certification")
                    .with_priority(Priority::Medium),
            ],
        },
        LearningPhase {
            phase: "Specialization (Months 9-12)".to_string(),
            duration: "4 months".to_string(),
            skills: strings(&["Advanced specialization", "Leadership", "Industry expertise"]),
            milestones: strings(&[
                "Complete capstone project",
                "Apply for target positions",
                "Become job-ready",
            ]),
            resources: vec![
                LearningResource::new(ResourceKind::Project, "Capstone Project")
                    .with_priority(Priority::High),
                LearningResource::new(ResourceKind::Course, "Advanced Specialization")
                    .with_priority(Priority::Medium),
            ],
        },
    ]
}

pub fn industry_insights(result: &AssessmentResult) -> IndustryInsights {
    let Some(top) = result.top_career_matches.first() else {
        return IndustryInsights {
            trends: strings(&["Complete your assessment to see industry insights"]),
            outlook: "Assessment needed".to_string(),
            key_skills: Vec::new(),
            average_salary: "N/A".to_string(),
            job_growth: "N/A".to_string(),
        };
    };

    let or = |s: &str, default: &str| {
        if s.is_empty() {
            default.to_string()
        } else {
            s.to_string()
        }
    };

    IndustryInsights {
        trends: strings(&[
            "Increasing demand for digital skills",
            "Remote work opportunities growing",
            "AI and automation changing job requirements",
            "Emphasis on continuous learning",
        ]),
        outlook: "Positive growth expected in the coming years".to_string(),
        key_skills: top.required_skills.clone(),
        average_salary: or(&top.industry_trends.average_salary, "Competitive"),
        job_growth: or(&top.industry_trends.growth, "Steady growth"),
    }
}

/// Percentage of the five result components that are populated.
pub fn progress(result: Option<&AssessmentResult>) -> u32 {
    let Some(r) = result else {
        return 0;
    };
    let populated = [
        !r.top_career_matches.is_empty(),
        !r.skill_gaps.is_empty(),
        !r.personality_type.is_empty(),
        !r.interests.is_empty(),
        !r.recommended_learning_path.is_empty(),
    ]
    .into_iter()
    .filter(|&p| p)
    .count() as u32;

    (populated * 100 + PROGRESS_COMPONENTS / 2) / PROGRESS_COMPONENTS
}

/// True when there is no completion date or it is more than six months old.
pub fn should_retake(result: &AssessmentResult, now: DateTime<Utc>) -> bool {
    match (result.completed_at, now.checked_sub_months(Months::new(RETAKE_AFTER_MONTHS))) {
        (Some(completed), Some(cutoff)) => completed < cutoff,
        (Some(_), None) => false,
        (None, _) => true,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentStatus {
    pub completed: bool,
    pub results: Option<AssessmentResult>,
    pub needs_retake: bool,
}

impl AssessmentStatus {
    pub fn of(results: Option<AssessmentResult>, now: DateTime<Utc>) -> Self {
        Self {
            completed: results.is_some(),
            needs_retake: results.as_ref().is_some_and(|r| should_retake(r, now)),
            results,
        }
    }
}
