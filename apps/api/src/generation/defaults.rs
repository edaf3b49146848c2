//! Fixed payloads returned by the generation handlers when the model replies
//! with text that cannot be used.

use serde_json::Map;

use crate::assessment::models::{
    ActionPhase, AnalysisResult, AssessmentQuestionSet, CourseRecommendation, Question,
    QuestionKind, RecommendedCareer, ScaleRange,
};

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn choice_question(
    id: &str,
    kind: QuestionKind,
    category: &str,
    question: &str,
    options: &[&str],
) -> Question {
    Question {
        id: id.to_string(),
        kind,
        category: category.to_string(),
        question: question.to_string(),
        options: Some(strings(options)),
        placeholder: None,
        scale_range: None,
        required: true,
        extra: Map::new(),
    }
}

/// The three-question set served when generated questions are unusable.
/// Covers choice, free-text and scale questions.
pub fn fallback_question_set() -> AssessmentQuestionSet {
    AssessmentQuestionSet {
        title: "Career Assessment".to_string(),
        description: "Discover your ideal career path through this comprehensive assessment"
            .to_string(),
        estimated_time: 15,
        questions: vec![
            choice_question(
                "q1",
                QuestionKind::SingleChoice,
                "Academic Preferences",
                "Which type of subjects do you find most engaging?",
                &[
                    "Mathematics and Logic",
                    "Languages and Literature",
                    "Science and Research",
                    "Arts and Creativity",
                ],
            ),
            Question {
                id: "q2".to_string(),
                kind: QuestionKind::FreeText,
                category: "Career Goals".to_string(),
                question: "Describe your ideal work environment in 2-3 sentences.".to_string(),
                options: None,
                placeholder: Some(
                    "E.g., I prefer working in teams, outdoor settings, creative spaces..."
                        .to_string(),
                ),
                scale_range: None,
                required: true,
                extra: Map::new(),
            },
            Question {
                id: "q3".to_string(),
                kind: QuestionKind::Scale,
                category: "Work Preferences".to_string(),
                question: "How important is work-life balance to you?".to_string(),
                options: None,
                placeholder: None,
                scale_range: Some(ScaleRange {
                    min: 1,
                    max: 10,
                    min_label: "Not Important".to_string(),
                    max_label: "Very Important".to_string(),
                }),
                required: true,
                extra: Map::new(),
            },
        ],
        extra: Map::new(),
    }
}

pub(crate) fn career(
    title: &str,
    match_percentage: u32,
    description: &str,
    growth_path: &str,
    average_salary: &str,
    key_skills: &[&str],
    education_path: &str,
) -> RecommendedCareer {
    RecommendedCareer {
        title: title.to_string(),
        match_percentage,
        description: description.to_string(),
        growth_path: growth_path.to_string(),
        average_salary: average_salary.to_string(),
        key_skills: strings(key_skills),
        education_path: education_path.to_string(),
    }
}

pub(crate) fn phase(timeline: &str, actions: Vec<String>) -> ActionPhase {
    ActionPhase {
        timeline: timeline.to_string(),
        actions,
    }
}

/// Stock analysis served when the model's analysis is unusable. It does not
/// depend on the profile or the responses.
pub fn fallback_analysis() -> AnalysisResult {
    AnalysisResult {
        overall_analysis: "Based on your responses, you show strong analytical thinking and \
            problem-solving abilities. You prefer structured environments and enjoy working \
            with data and technology."
            .to_string(),
        recommended_careers: vec![
            career(
                "Software Developer",
                85,
                "Your logical thinking and interest in technology make this a great fit",
                "Junior Developer → Senior Developer → Tech Lead → Engineering Manager",
                "₹6-20 LPA",
                &["Programming", "Problem Solving", "Logical Thinking"],
                "B.Tech Computer Science or related field",
            ),
            career(
                "Data Analyst",
                78,
                "Your analytical skills and attention to detail suit data-driven roles",
                "Junior Analyst → Senior Analyst → Data Scientist → Analytics Manager",
                "₹5-15 LPA",
                &["Data Analysis", "Statistics", "Critical Thinking"],
                "B.Sc Statistics/Mathematics or B.Tech with analytics specialization",
            ),
        ],
        course_recommendations: vec![CourseRecommendation {
            course: "B.Tech Computer Science".to_string(),
            institution: "Government Engineering Colleges/IITs/NITs".to_string(),
            duration: "4 years".to_string(),
            eligibility: "12th with PCM, JEE qualification".to_string(),
            career_outcomes: strings(&[
                "Software Developer",
                "System Analyst",
                "Product Manager",
            ]),
        }],
        skill_development: strings(&[
            "Programming Languages (Python, Java)",
            "Data Analysis and Statistics",
            "Problem Solving",
            "Communication Skills",
        ]),
        action_plan: vec![
            phase(
                "Next 3 months",
                strings(&[
                    "Start learning a programming language (Python recommended)",
                    "Complete online courses in data analysis",
                    "Work on small projects to build portfolio",
                ]),
            ),
            phase(
                "6-12 months",
                strings(&[
                    "Apply for relevant degree programs",
                    "Join coding communities and hackathons",
                    "Build 2-3 substantial projects",
                ]),
            ),
            phase(
                "1-2 years",
                strings(&[
                    "Complete internships in target field",
                    "Network with professionals",
                    "Prepare for campus placements",
                ]),
            ),
        ],
        scholarships: strings(&[
            "National Scholarship Portal schemes",
            "Merit-based scholarships in engineering colleges",
            "Industry-sponsored scholarships for STEM fields",
        ]),
        resources: strings(&[
            "Codecademy for programming basics",
            "Khan Academy for mathematics",
            "GitHub for project hosting",
            "LinkedIn Learning for professional skills",
        ]),
        extra: Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_question_set_covers_three_types() {
        let set = fallback_question_set();
        let kinds: Vec<QuestionKind> = set.questions.iter().map(|q| q.kind).collect();
        assert_eq!(
            kinds,
            vec![
                QuestionKind::SingleChoice,
                QuestionKind::FreeText,
                QuestionKind::Scale
            ]
        );
        assert!(set.questions.iter().all(|q| q.required));
        assert_eq!(set.estimated_time, 15);
    }

    #[test]
    fn test_fallback_question_set_wire_shape() {
        let value = serde_json::to_value(fallback_question_set()).unwrap();
        assert_eq!(value["estimatedTime"], 15);
        assert_eq!(value["questions"][0]["type"], "mcq");
        assert_eq!(value["questions"][2]["scaleRange"]["maxLabel"], "Very Important");
        assert!(value["questions"][0].get("placeholder").is_none());
    }

    #[test]
    fn test_fallback_analysis_is_stock() {
        let analysis = fallback_analysis();
        let careers: Vec<(&str, u32)> = analysis
            .recommended_careers
            .iter()
            .map(|c| (c.title.as_str(), c.match_percentage))
            .collect();
        assert_eq!(careers, vec![("Software Developer", 85), ("Data Analyst", 78)]);
        assert_eq!(analysis.action_plan.len(), 3);
        assert_eq!(analysis.course_recommendations.len(), 1);
    }
}
