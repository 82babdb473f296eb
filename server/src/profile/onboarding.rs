//! Onboarding Steps
//!
//! Five steps, each writing one profile section. Step 5 is optional and
//! completes onboarding.

use serde_json::{Map, Value};
use vivah_common::{Gender, OnboardingStatus};

use super::types::ProfileError;

/// Last onboarding step.
pub const FINAL_STEP: i16 = 5;

/// Profile section written by one onboarding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    BasicInformation,
    EducationOccupation,
    FamilyContactAddress,
    PartnerPreference,
    HobbiesInterestsSkills,
}

impl Section {
    pub const fn from_step(step: i16) -> Option<Self> {
        match step {
            1 => Some(Self::BasicInformation),
            2 => Some(Self::EducationOccupation),
            3 => Some(Self::FamilyContactAddress),
            4 => Some(Self::PartnerPreference),
            5 => Some(Self::HobbiesInterestsSkills),
            _ => None,
        }
    }

    /// Column holding this section.
    pub const fn column(self) -> &'static str {
        match self {
            Self::BasicInformation => "basic_information",
            Self::EducationOccupation => "education_occupation",
            Self::FamilyContactAddress => "family_contact_address",
            Self::PartnerPreference => "partner_preference",
            Self::HobbiesInterestsSkills => "hobbies_interests_skills",
        }
    }

    const fn is_optional(self) -> bool {
        matches!(self, Self::HobbiesInterestsSkills)
    }
}

/// A validated onboarding submission, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct StepPlan {
    pub step: i16,
    pub section: Section,
    /// `None` leaves the stored section untouched.
    pub data: Option<Value>,
    pub next_step: i16,
    pub status: OnboardingStatus,
}

impl StepPlan {
    /// Message returned once the step is saved.
    pub fn success_message(&self) -> String {
        if self.status == OnboardingStatus::Completed {
            "Onboarding completed successfully.".to_string()
        } else {
            format!(
                "Step {} saved successfully. Proceed to step {}.",
                self.step, self.next_step
            )
        }
    }
}

/// Validate a step submission and work out the resulting progress.
pub fn plan_step(step: i64, data: Option<Value>) -> Result<StepPlan, ProfileError> {
    let section = i16::try_from(step)
        .ok()
        .and_then(Section::from_step)
        .ok_or_else(|| {
            ProfileError::Validation("Invalid onboarding step. Step must be between 1 and 5.".into())
        })?;
    // Lossless: from_step only accepts 1..=5
    let step = step as i16;

    let data = match data {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) if map.is_empty() => None,
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            return Err(ProfileError::Validation(format!(
                "Data for step {step} must be an object."
            )))
        }
    };

    let data = match (data, section.is_optional()) {
        (None, true) => None,
        (None, false) => {
            return Err(ProfileError::Validation(format!(
                "Data for step {step} is required."
            )))
        }
        (Some(map), _) if section == Section::BasicInformation => {
            Some(Value::Object(normalize_basic_information(map)?))
        }
        (Some(map), _) => Some(Value::Object(map)),
    };

    let (next_step, status) = if step == FINAL_STEP {
        (FINAL_STEP, OnboardingStatus::Completed)
    } else {
        (step + 1, OnboardingStatus::InProgress)
    };

    Ok(StepPlan {
        step,
        section,
        data,
        next_step,
        status,
    })
}

/// Check and lower-case `gender` when present.
fn normalize_basic_information(mut map: Map<String, Value>) -> Result<Map<String, Value>, ProfileError> {
    if let Some(raw) = map.get("gender") {
        let gender = raw
            .as_str()
            .map(|g| g.trim().to_lowercase())
            .ok_or_else(|| ProfileError::Validation("Gender must be a string.".into()))?;
        let gender: Gender = gender
            .parse()
            .map_err(|e: vivah_common::Error| ProfileError::Validation(e.to_string()))?;
        map.insert("gender".into(), Value::String(gender.as_str().into()));
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_bounds() {
        assert!(plan_step(0, Some(json!({ "a": 1 }))).is_err());
        assert!(plan_step(6, Some(json!({ "a": 1 }))).is_err());
        assert!(plan_step(-1, None).is_err());
        assert!(plan_step(i64::from(i16::MAX) + 1, None).is_err());
    }

    #[test]
    fn test_step_one_advances_to_two() {
        let plan = plan_step(1, Some(json!({ "gender": "Male", "age": 29 }))).unwrap();

        assert_eq!(plan.section, Section::BasicInformation);
        assert_eq!(plan.next_step, 2);
        assert_eq!(plan.status, OnboardingStatus::InProgress);
        assert_eq!(plan.data.unwrap()["gender"], "male");
        assert_eq!(
            plan_step(1, Some(json!({ "gender": "male" })))
                .unwrap()
                .success_message(),
            "Step 1 saved successfully. Proceed to step 2."
        );
    }

    #[test]
    fn test_unknown_gender_rejected() {
        let err = plan_step(1, Some(json!({ "gender": "unknown" }))).unwrap_err();
        assert!(err.to_string().contains("male, female"));
        assert!(plan_step(1, Some(json!({ "gender": 3 }))).is_err());
    }

    #[test]
    fn test_required_sections_need_data() {
        for step in 1..=4 {
            assert!(plan_step(step, None).is_err());
            assert!(plan_step(step, Some(json!({}))).is_err());
            assert!(plan_step(step, Some(json!("text"))).is_err());
        }
    }

    #[test]
    fn test_final_step_is_optional_and_completes() {
        let plan = plan_step(5, None).unwrap();

        assert_eq!(plan.section, Section::HobbiesInterestsSkills);
        assert_eq!(plan.data, None);
        assert_eq!(plan.next_step, FINAL_STEP);
        assert_eq!(plan.status, OnboardingStatus::Completed);
        assert_eq!(plan.success_message(), "Onboarding completed successfully.");

        let plan = plan_step(5, Some(json!({ "hobbies": ["chess"] }))).unwrap();
        assert!(plan.data.is_some());
    }

    #[test]
    fn test_columns_match_steps() {
        let columns: Vec<_> = (1..=5)
            .filter_map(Section::from_step)
            .map(Section::column)
            .collect();
        assert_eq!(
            columns,
            vec![
                "basic_information",
                "education_occupation",
                "family_contact_address",
                "partner_preference",
                "hobbies_interests_skills",
            ]
        );
    }
}
