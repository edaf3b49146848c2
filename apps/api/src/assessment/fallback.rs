//! Requester-side fallbacks, used when the generation handlers cannot be
//! reached or answer without a usable payload.
//!
//! The analysis fallback is a keyword heuristic over the profile interests and
//! the free-text answers. Buckets are checked in a fixed order and the first
//! match wins: technical, business, creative, general.

use serde_json::Map;

use crate::assessment::models::{
    AnalysisResult, AnswerValue, AssessmentQuestionSet, CourseRecommendation, QuestionKind,
    RecommendedCareer, ResponseSet,
};
use crate::generation::defaults::{
    career, choice_question, fallback_question_set, phase, strings,
};
use crate::profile::models::UserProfile;

const STEM_KEYWORDS: &[&str] = &[
    "technology",
    "science",
    "mathematics",
    "engineering",
    "programming",
];
const BUSINESS_KEYWORDS: &[&str] = &["business", "management", "finance", "marketing"];
const CREATIVE_KEYWORDS: &[&str] = &["design", "art", "creative", "writing", "media"];
const ANALYTICAL_KEYWORDS: &[&str] = &["analysis", "problem", "logic"];

/// Free-text answers longer than this count as "detailed".
const DETAILED_ANSWER_CHARS: usize = 50;

/// Five-question set covering all four question types.
pub fn default_question_set() -> AssessmentQuestionSet {
    let mut set = fallback_question_set();
    set.questions.push(choice_question(
        "q4",
        QuestionKind::SingleChoice,
        "Personality",
        "You prefer to work:",
        &["Alone", "In small groups", "In large teams", "Varies by project"],
    ));
    set.questions.push(choice_question(
        "q5",
        QuestionKind::MultiChoice,
        "Skills",
        "Which skills do you want to develop further? (Select all that apply)",
        &[
            "Technical Skills",
            "Leadership",
            "Communication",
            "Creative Skills",
            "Analytical Thinking",
            "Problem Solving",
        ],
    ));
    set
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterestBucket {
    Technical,
    Business,
    Creative,
    General,
}

fn mentions_any(labels: &[String], keywords: &[&str]) -> bool {
    labels.iter().any(|label| {
        let label = label.to_lowercase();
        keywords.iter().any(|k| label.contains(k))
    })
}

fn text_answers(responses: &ResponseSet) -> impl Iterator<Item = &str> {
    responses.values().filter_map(AnswerValue::as_text)
}

/// Signals read from the profile and the answers.
#[derive(Debug, Clone, Copy)]
pub struct ProfileSignals {
    pub stem: bool,
    pub business: bool,
    pub creative: bool,
    pub analytical: bool,
    pub detailed: bool,
}

impl ProfileSignals {
    pub fn read(profile: &UserProfile, responses: &ResponseSet) -> Self {
        Self {
            stem: mentions_any(&profile.interests, STEM_KEYWORDS),
            business: mentions_any(&profile.interests, BUSINESS_KEYWORDS),
            creative: mentions_any(&profile.interests, CREATIVE_KEYWORDS),
            analytical: text_answers(responses).any(|answer| {
                let answer = answer.to_lowercase();
                ANALYTICAL_KEYWORDS.iter().any(|k| answer.contains(k))
            }),
            detailed: text_answers(responses)
                .any(|answer| answer.chars().count() > DETAILED_ANSWER_CHARS),
        }
    }

    pub fn bucket(&self) -> InterestBucket {
        if self.stem || self.analytical {
            InterestBucket::Technical
        } else if self.business {
            InterestBucket::Business
        } else if self.creative {
            InterestBucket::Creative
        } else {
            InterestBucket::General
        }
    }
}

fn career_pair(bucket: InterestBucket) -> (RecommendedCareer, RecommendedCareer) {
    match bucket {
        InterestBucket::Technical => (
            career(
                "Software Developer",
                88,
                "Your interest in technology and logical thinking make this an excellent career choice",
                "Junior Developer → Senior Developer → Tech Lead → Engineering Manager",
                "₹6-25 LPA",
                &["Programming", "Problem Solving", "Logical Thinking", "Technology"],
                "B.Tech Computer Science, B.Sc Computer Science, or coding bootcamps",
            ),
            career(
                "Data Analyst",
                82,
                "Your analytical mindset suits data-driven decision making roles",
                "Junior Analyst → Senior Analyst → Data Scientist → Analytics Manager",
                "₹5-20 LPA",
                &["Data Analysis", "Statistics", "Excel", "Python"],
                "B.Sc Statistics/Mathematics, B.Tech, or specialized analytics courses",
            ),
        ),
        InterestBucket::Business => (
            career(
                "Business Analyst",
                85,
                "Your interest in business processes and problem-solving aligns well with this role",
                "Junior BA → Senior BA → Product Manager → Business Unit Head",
                "₹5-18 LPA",
                &["Business Analysis", "Communication", "Problem Solving", "Data Analysis"],
                "BBA, B.Com, or MBA for advanced roles",
            ),
            career(
                "Digital Marketing Specialist",
                78,
                "Combines business acumen with digital skills for modern marketing",
                "Marketing Executive → Senior Specialist → Marketing Manager → Head of Marketing",
                "₹4-15 LPA",
                &["Digital Marketing", "Analytics", "Communication", "Creativity"],
                "Any degree with digital marketing certifications",
            ),
        ),
        InterestBucket::Creative => (
            career(
                "UX/UI Designer",
                83,
                "Your creative interests and user-focused thinking suit design roles perfectly",
                "Junior Designer → Senior Designer → Lead Designer → Design Manager",
                "₹4-18 LPA",
                &["Design", "User Research", "Prototyping", "Creative Thinking"],
                "Design degree or specialized UX/UI courses and portfolio development",
            ),
            career(
                "Content Creator",
                77,
                "Leverage your creativity to build engaging content across platforms",
                "Content Writer → Content Manager → Content Strategy Lead → Creative Director",
                "₹3-15 LPA",
                &["Writing", "Creativity", "Social Media", "Marketing"],
                "Mass Communication, English, or relevant skill-based courses",
            ),
        ),
        InterestBucket::General => (
            career(
                "Project Manager",
                80,
                "Your organizational skills and leadership potential make this a great fit",
                "Assistant PM → Project Manager → Senior PM → Program Manager",
                "₹6-22 LPA",
                &["Project Management", "Leadership", "Communication", "Organization"],
                "Any bachelor's degree with PMP certification",
            ),
            career(
                "Business Development Associate",
                75,
                "Combine relationship building with business growth opportunities",
                "BDA → Senior BDA → BD Manager → VP Business Development",
                "₹4-16 LPA",
                &["Communication", "Sales", "Relationship Building", "Business Acumen"],
                "BBA, B.Com, or MBA preferred",
            ),
        ),
    }
}

fn narrative(profile: &UserProfile, signals: &ProfileSignals) -> String {
    let depth = if signals.detailed {
        "your detailed responses show strong self-awareness and"
    } else {
        "you show"
    };
    let mindset = if signals.analytical {
        "Your analytical mindset and"
    } else {
        "You demonstrate"
    };
    format!(
        "Based on your profile and interests in {interests}, {depth} potential for roles that \
         combine analytical thinking with your natural interests. Your educational background in \
         {course} provides a solid foundation for multiple career paths. {mindset} \
         problem-solving abilities and show interest in continuous learning, which are valuable \
         traits in today's dynamic job market.",
        interests = profile.interests.join(", "),
        course = profile.course.as_str(),
    )
}

/// Personalized analysis built without the model.
pub fn heuristic_analysis(profile: &UserProfile, responses: &ResponseSet) -> AnalysisResult {
    let signals = ProfileSignals::read(profile, responses);
    let (primary, secondary) = career_pair(signals.bucket());

    // Course follows the interests alone; answers do not move it.
    let course = if signals.stem {
        "B.Tech Computer Science"
    } else if signals.business {
        "BBA/MBA"
    } else {
        "Relevant Specialization"
    };

    let mut skill_development = primary.key_skills.clone();
    skill_development.extend(strings(&["Communication Skills", "Leadership", "Time Management"]));

    AnalysisResult {
        overall_analysis: narrative(profile, &signals),
        course_recommendations: vec![CourseRecommendation {
            course: course.to_string(),
            institution: "Top universities and colleges in your region".to_string(),
            duration: "3-4 years".to_string(),
            eligibility: "Based on current academic performance and entrance exams".to_string(),
            career_outcomes: vec![
                primary.title.clone(),
                secondary.title.clone(),
                "Related roles in the same field".to_string(),
            ],
        }],
        skill_development,
        action_plan: vec![
            phase(
                "Next 3 months",
                vec![
                    format!("Research {} role requirements", primary.title),
                    "Start building relevant skills through online courses".to_string(),
                    "Connect with professionals in your field of interest".to_string(),
                    "Work on small projects to build experience".to_string(),
                ],
            ),
            phase(
                "6-12 months",
                strings(&[
                    "Complete relevant certifications",
                    "Build a portfolio showcasing your skills",
                    "Apply for internships in target companies",
                    "Join professional communities and networks",
                ]),
            ),
            phase(
                "1-2 years",
                strings(&[
                    "Complete formal education/training programs",
                    "Gain practical experience through internships or entry-level roles",
                    "Build a strong professional network",
                    "Apply for full-time positions in target companies",
                ]),
            ),
        ],
        scholarships: strings(&[
            "National Scholarship Portal (NSP) schemes",
            "Merit-based scholarships in target institutions",
            "Industry-sponsored scholarships and programs",
            "Government schemes for your category/region",
        ]),
        resources: strings(&[
            "Coursera and edX for online learning",
            "LinkedIn Learning for professional skills",
            "Industry-specific platforms and communities",
            "Books and resources recommended for your field",
            "Professional networking events and conferences",
        ]),
        recommended_careers: vec![primary, secondary],
        extra: Map::new(),
    }
}
