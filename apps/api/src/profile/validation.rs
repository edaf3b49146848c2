use serde::Deserialize;

use crate::errors::AppError;
use crate::profile::models::{EducationStage, UserProfile};

const MIN_AGE: i64 = 10;
const MAX_AGE: i64 = 100;

/// Profile form as submitted. Everything is optional so that missing fields
/// produce a validation message instead of a JSON rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[serde(alias = "displayName")]
    pub name: Option<String>,
    pub age: Option<i64>,
    pub course: Option<String>,
    pub stream: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
}

pub fn validate_profile(input: ProfileInput) -> Result<UserProfile, AppError> {
    let name = input.name.as_deref().map(str::trim).unwrap_or_default();
    let course = input.course.as_deref().map(str::trim).unwrap_or_default();
    let age = match input.age {
        Some(age) if !name.is_empty() && !course.is_empty() => age,
        _ => {
            return Err(AppError::Validation(
                "Please fill in all required fields".to_string(),
            ))
        }
    };

    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(AppError::Validation(format!(
            "Please enter a valid age between {MIN_AGE} and {MAX_AGE}"
        )));
    }

    let stage = EducationStage::parse(course)
        .ok_or_else(|| AppError::Validation(format!("Unknown education status '{course}'")))?;

    let stream = input.stream.unwrap_or_default().trim().to_string();
    let options = stage.stream_options();
    if !stream.is_empty() && !options.is_empty() && !options.contains(&stream.as_str()) {
        return Err(AppError::Validation(format!(
            "Stream '{stream}' is not available for {}",
            stage.as_str()
        )));
    }

    let mut interests: Vec<String> = Vec::with_capacity(input.interests.len());
    for interest in input.interests {
        let interest = interest.trim().to_string();
        if !interest.is_empty() && !interests.contains(&interest) {
            interests.push(interest);
        }
    }

    Ok(UserProfile {
        display_name: name.to_string(),
        age: age as u32,
        course: stage,
        stream,
        interests,
        location: input.location.unwrap_or_default().trim().to_string(),
        phone: input
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
    })
}
