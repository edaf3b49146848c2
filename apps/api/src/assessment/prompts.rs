// Prompt templates for question generation and response analysis.
// Placeholders are filled by `fill` before sending.

use crate::assessment::models::ResponseSet;
use crate::profile::models::UserProfile;

/// Profile block shared by both prompts.
const PROFILE_BLOCK: &str = "Student Profile:
- Name: {name}
- Age: {age}
- Current Status: {course}
- Stream/Field: {stream}
- Interests: {interests}
- Location: {location}";

/// Question-set prompt. Replace `{profile}` before sending.
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"You are an expert career counselor creating a personalized career assessment for a student. Based on their profile, generate a comprehensive assessment with 15-20 questions.

{profile}

Create questions that cover:
1. Academic preferences and strengths
2. Work environment preferences
3. Personality traits and soft skills
4. Career aspirations and goals
5. Practical considerations (salary, work-life balance, etc.)
6. Specific questions based on their current educational status
7. Questions related to their stated interests

Mix different question types:
- Multiple choice (mcq)
- Text responses (text)
- Rating scales (scale)
- Multi-select options (multi-select)

Return ONLY a JSON object in this exact format:
{
  "title": "Personalized Career Assessment",
  "description": "A tailored assessment to discover your ideal career path based on your profile and preferences",
  "estimatedTime": 15,
  "questions": [
    {
      "id": "q1",
      "type": "mcq",
      "category": "Academic Preferences",
      "question": "Which type of subjects do you find most engaging?",
      "options": ["Mathematics and Logic", "Languages and Literature", "Science and Research", "Arts and Creativity"],
      "required": true
    },
    {
      "id": "q2",
      "type": "text",
      "category": "Career Goals",
      "question": "Describe your ideal work environment in 2-3 sentences.",
      "placeholder": "E.g., I prefer working in teams, outdoor settings, creative spaces...",
      "required": true
    },
    {
      "id": "q3",
      "type": "scale",
      "category": "Work Preferences",
      "question": "How important is work-life balance to you?",
      "scaleRange": {
        "min": 1,
        "max": 10,
        "minLabel": "Not Important",
        "maxLabel": "Very Important"
      },
      "required": true
    }
  ]
}

Make sure:
- Questions are specific to their educational level and interests
- Include both general career questions and ones specific to their field
- Questions help identify suitable career paths in their area of study
- Mix of question types for comprehensive assessment
- All questions are clear and actionable for career guidance
"#;

/// Analysis prompt. Replace `{profile}` and `{responses}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert career counselor. Analyze this student's profile and assessment responses to provide personalized career guidance.

{profile}

Assessment Responses:
{responses}

Provide comprehensive career guidance in this JSON format:
{
  "overallAnalysis": "Detailed analysis of their personality, strengths, and career fit based on responses",
  "recommendedCareers": [
    {
      "title": "Software Engineer",
      "match": 95,
      "description": "Why this career fits them",
      "growthPath": "Career progression path",
      "averageSalary": "₹8-25 LPA",
      "keySkills": ["Programming", "Problem Solving", "Logical Thinking"],
      "educationPath": "Recommended courses/degrees"
    }
  ],
  "courseRecommendations": [
    {
      "course": "B.Tech Computer Science",
      "institution": "IIT/NIT/Top Engineering Colleges",
      "duration": "4 years",
      "eligibility": "Requirements",
      "careerOutcomes": ["Software Developer", "Data Scientist", "Product Manager"]
    }
  ],
  "skillDevelopment": [
    "Programming Languages (Python, Java)",
    "Data Analysis",
    "Communication Skills"
  ],
  "actionPlan": [
    {
      "timeline": "Next 3 months",
      "actions": ["Specific actionable steps"]
    },
    {
      "timeline": "6-12 months",
      "actions": ["Medium-term goals"]
    },
    {
      "timeline": "1-2 years",
      "actions": ["Long-term objectives"]
    }
  ],
  "scholarships": [
    "Relevant scholarship opportunities based on their profile"
  ],
  "resources": [
    "Recommended books, courses, websites, and other resources"
  ]
}

Make recommendations specific to:
- Their current educational level
- Available colleges/courses in India (especially government colleges)
- Realistic career paths in Indian job market
- Their stated interests and assessment responses
- Location-specific opportunities if relevant
"#;

/// Replaces each `{key}` token with its value in a single pass. Inserted
/// values are never rescanned; braces that do not form a known token are kept.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = tail.find('}').and_then(|end| {
            let key = &tail[1..end];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (end, *value))
        });
        match hit {
            Some((end, value)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn profile_block(profile: &UserProfile) -> String {
    let age = profile.age.to_string();
    let interests = profile.interests.join(", ");
    fill(
        PROFILE_BLOCK,
        &[
            ("name", profile.display_name.as_str()),
            ("age", age.as_str()),
            ("course", profile.course.as_str()),
            ("stream", profile.stream.as_str()),
            ("interests", interests.as_str()),
            ("location", profile.location.as_str()),
        ],
    )
}

pub fn build_question_prompt(profile: &UserProfile) -> String {
    let profile_text = profile_block(profile);
    fill(QUESTION_PROMPT_TEMPLATE, &[("profile", profile_text.as_str())])
}

pub fn build_analysis_prompt(profile: &UserProfile, responses: &ResponseSet) -> String {
    let profile_text = profile_block(profile);
    // Pretty-printing a string-keyed map cannot fail.
    let responses_json = serde_json::to_string_pretty(responses).unwrap_or_default();
    fill(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("profile", profile_text.as_str()),
            ("responses", responses_json.as_str()),
        ],
    )
}
