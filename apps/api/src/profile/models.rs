use serde::{Deserialize, Serialize};

/// Current education stage, as offered at profile setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationStage {
    #[serde(rename = "10th-completed")]
    TenthCompleted,
    #[serde(rename = "10th-appearing")]
    TenthAppearing,
    #[serde(rename = "12th-completed")]
    TwelfthCompleted,
    #[serde(rename = "12th-appearing")]
    TwelfthAppearing,
    #[serde(rename = "diploma")]
    Diploma,
    #[serde(rename = "graduation-pursuing")]
    GraduationPursuing,
    #[serde(rename = "graduation-completed")]
    GraduationCompleted,
    #[serde(rename = "postgraduation-pursuing")]
    PostgraduationPursuing,
    #[serde(rename = "postgraduation-completed")]
    PostgraduationCompleted,
    #[serde(rename = "working-professional")]
    WorkingProfessional,
    #[serde(rename = "career-gap")]
    CareerGap,
    #[serde(rename = "other")]
    Other,
}

const SCHOOL_STREAMS: &[&str] = &["science", "commerce", "arts", "vocational"];
const SENIOR_SECONDARY_STREAMS: &[&str] =
    &["science-pcm", "science-pcb", "commerce", "arts", "vocational"];
const GRADUATION_FIELDS: &[&str] = &[
    "engineering",
    "medical",
    "bsc",
    "bca",
    "bcom",
    "ba",
    "bba",
    "law",
    "other",
];

impl EducationStage {
    pub const ALL: [EducationStage; 12] = [
        EducationStage::TenthCompleted,
        EducationStage::TenthAppearing,
        EducationStage::TwelfthCompleted,
        EducationStage::TwelfthAppearing,
        EducationStage::Diploma,
        EducationStage::GraduationPursuing,
        EducationStage::GraduationCompleted,
        EducationStage::PostgraduationPursuing,
        EducationStage::PostgraduationCompleted,
        EducationStage::WorkingProfessional,
        EducationStage::CareerGap,
        EducationStage::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EducationStage::TenthCompleted => "10th-completed",
            EducationStage::TenthAppearing => "10th-appearing",
            EducationStage::TwelfthCompleted => "12th-completed",
            EducationStage::TwelfthAppearing => "12th-appearing",
            EducationStage::Diploma => "diploma",
            EducationStage::GraduationPursuing => "graduation-pursuing",
            EducationStage::GraduationCompleted => "graduation-completed",
            EducationStage::PostgraduationPursuing => "postgraduation-pursuing",
            EducationStage::PostgraduationCompleted => "postgraduation-completed",
            EducationStage::WorkingProfessional => "working-professional",
            EducationStage::CareerGap => "career-gap",
            EducationStage::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.as_str() == s)
    }

    /// Streams selectable for this stage. Empty means the stream is free-form.
    pub fn stream_options(&self) -> &'static [&'static str] {
        match self {
            EducationStage::TenthCompleted => SCHOOL_STREAMS,
            EducationStage::TwelfthCompleted | EducationStage::TwelfthAppearing => {
                SENIOR_SECONDARY_STREAMS
            }
            EducationStage::GraduationPursuing | EducationStage::GraduationCompleted => {
                GRADUATION_FIELDS
            }
            _ => &[],
        }
    }
}

/// Student profile captured at profile setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub display_name: String,
    pub age: u32,
    pub course: EducationStage,
    #[serde(default)]
    pub stream: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
