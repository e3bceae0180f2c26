use crate::domain::form::{self, FieldError, FormValue};
use crate::domain::profile::{ActivityLevel, Gender, Goal, UserProfile};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Personal,
    Body,
    Lifestyle,
    Preferences,
    Results,
}

impl WizardStep {
    pub fn next(self) -> Option<Self> {
        match self {
            WizardStep::Personal => Some(WizardStep::Body),
            WizardStep::Body => Some(WizardStep::Lifestyle),
            WizardStep::Lifestyle => Some(WizardStep::Preferences),
            WizardStep::Preferences => Some(WizardStep::Results),
            WizardStep::Results => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            WizardStep::Personal => None,
            WizardStep::Body => Some(WizardStep::Personal),
            WizardStep::Lifestyle => Some(WizardStep::Body),
            WizardStep::Preferences => Some(WizardStep::Lifestyle),
            WizardStep::Results => Some(WizardStep::Preferences),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Personal => "personal",
            WizardStep::Body => "body",
            WizardStep::Lifestyle => "lifestyle",
            WizardStep::Preferences => "preferences",
            WizardStep::Results => "results",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partially filled onboarding form. Every field may still be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileDraft {
    pub name: Option<String>,
    pub age: Option<FormValue>,
    pub gender: Option<Gender>,
    pub height: Option<FormValue>,
    pub weight: Option<FormValue>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
    pub meals_per_day: Option<FormValue>,
    pub dietary_preferences: Option<String>,
    pub health_conditions: Option<String>,
}

impl ProfileDraft {
    /// Guard for leaving `step` forwards.
    pub fn check_step(&self, step: WizardStep) -> Result<(), FieldError> {
        match step {
            WizardStep::Personal => {
                form::required_text("name", self.name.as_deref())?;
                form::positive_whole_number("age", self.age.as_ref())?;
                self.gender.ok_or(FieldError::Missing("gender"))?;
            }
            WizardStep::Body => {
                form::positive_number("height", self.height.as_ref())?;
                form::positive_number("weight", self.weight.as_ref())?;
            }
            WizardStep::Lifestyle => {
                self.activity_level
                    .as_ref()
                    .ok_or(FieldError::Missing("activityLevel"))?;
                self.goal.as_ref().ok_or(FieldError::Missing("goal"))?;
                let meals = form::positive_whole_number("mealsPerDay", self.meals_per_day.as_ref())?;
                form::meals_per_day(meals)?;
            }
            WizardStep::Preferences => {
                form::required_text("dietaryPreferences", self.dietary_preferences.as_deref())?;
            }
            WizardStep::Results => {}
        }
        Ok(())
    }

    pub fn to_profile(&self) -> Result<UserProfile, FieldError> {
        let meals = form::positive_whole_number("mealsPerDay", self.meals_per_day.as_ref())?;
        Ok(UserProfile {
            name: form::required_text("name", self.name.as_deref())?,
            age: form::positive_whole_number("age", self.age.as_ref())?,
            gender: self.gender.ok_or(FieldError::Missing("gender"))?,
            height: form::positive_number("height", self.height.as_ref())?,
            weight: form::positive_number("weight", self.weight.as_ref())?,
            activity_level: self
                .activity_level
                .clone()
                .ok_or(FieldError::Missing("activityLevel"))?,
            goal: self.goal.clone().ok_or(FieldError::Missing("goal"))?,
            meals_per_day: u32::from(form::meals_per_day(meals)?),
            dietary_preferences: Some(form::required_text(
                "dietaryPreferences",
                self.dietary_preferences.as_deref(),
            )?),
            health_conditions: self
                .health_conditions
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    #[error("{step} step is incomplete: {reason}")]
    Incomplete { step: WizardStep, reason: FieldError },
    #[error("results are already shown")]
    Finished,
    #[error("results are not available before the last step")]
    NotFinished,
}

/// Onboarding wizard state: current step plus the draft collected so far.
#[derive(Debug, Clone, Default)]
pub struct ProfileWizard {
    step: WizardStep,
    draft: ProfileDraft,
}

impl ProfileWizard {
    /// Rebuilds wizard state sent back by a stateless client.
    pub fn resume(step: WizardStep, draft: ProfileDraft) -> Self {
        Self { step, draft }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let next = self.step.next().ok_or(WizardError::Finished)?;
        self.draft
            .check_step(self.step)
            .map_err(|reason| WizardError::Incomplete {
                step: self.step,
                reason,
            })?;
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    pub fn start_over(&mut self) {
        *self = Self::default();
    }

    pub fn profile(&self) -> Result<UserProfile, WizardError> {
        if self.step != WizardStep::Results {
            return Err(WizardError::NotFinished);
        }
        let mut step = WizardStep::default();
        while step != WizardStep::Results {
            self.draft
                .check_step(step)
                .map_err(|reason| WizardError::Incomplete { step, reason })?;
            step = step.next().unwrap_or(WizardStep::Results);
        }
        self.draft.to_profile().map_err(|reason| WizardError::Incomplete {
            step: self.step,
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_personal(draft: &mut ProfileDraft) {
        draft.name = Some("Alex".to_string());
        draft.age = Some("25".into());
        draft.gender = Some(Gender::Male);
    }

    fn at_start(fill: fn(&mut ProfileDraft)) -> ProfileWizard {
        let mut draft = ProfileDraft::default();
        fill(&mut draft);
        ProfileWizard::resume(WizardStep::Personal, draft)
    }

    fn fill_all(draft: &mut ProfileDraft) {
        fill_personal(draft);
        draft.height = Some("175".into());
        draft.weight = Some(70.0.into());
        draft.activity_level = Some(ActivityLevel::Moderate);
        draft.goal = Some(Goal::Lose);
        draft.meals_per_day = Some("3".into());
        draft.dietary_preferences = Some("No pork".to_string());
    }

    #[test]
    fn test_cannot_advance_with_incomplete_step() {
        let mut wizard = at_start(|draft| draft.name = Some("Alex".to_string()));

        let err = wizard.advance().unwrap_err();
        assert_eq!(
            err,
            WizardError::Incomplete {
                step: WizardStep::Personal,
                reason: FieldError::Missing("age"),
            }
        );
        assert_eq!(wizard.step(), WizardStep::Personal);
    }

    #[test]
    fn test_full_walkthrough_yields_profile() {
        let mut wizard = at_start(fill_all);

        assert_eq!(wizard.advance(), Ok(WizardStep::Body));
        assert_eq!(wizard.advance(), Ok(WizardStep::Lifestyle));
        assert_eq!(wizard.advance(), Ok(WizardStep::Preferences));
        assert_eq!(wizard.advance(), Ok(WizardStep::Results));
        assert_eq!(wizard.advance(), Err(WizardError::Finished));

        let profile = wizard.profile().unwrap();
        assert_eq!(profile.name, "Alex");
        assert_eq!(profile.age, 25);
        assert_eq!(profile.weight, 70.0);
        assert_eq!(profile.meals_per_day, 3);
        assert_eq!(profile.health_conditions, None);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_preferences_are_required_by_flow() {
        let mut draft = ProfileDraft::default();
        fill_all(&mut draft);
        draft.dietary_preferences = Some("   ".to_string());
        let mut wizard = ProfileWizard::resume(WizardStep::Preferences, draft);
        assert!(matches!(
            wizard.advance(),
            Err(WizardError::Incomplete {
                step: WizardStep::Preferences,
                reason: FieldError::Missing("dietaryPreferences"),
            })
        ));
    }

    #[test]
    fn test_meals_per_day_out_of_range_blocks_lifestyle() {
        let mut draft = ProfileDraft::default();
        fill_all(&mut draft);
        draft.meals_per_day = Some("8".into());
        assert!(draft.check_step(WizardStep::Lifestyle).is_err());
    }

    #[test]
    fn test_back_and_start_over() {
        let mut wizard = ProfileWizard::default();
        assert_eq!(wizard.back(), WizardStep::Personal);

        let mut wizard = at_start(fill_personal);
        wizard.advance().unwrap();
        assert_eq!(wizard.back(), WizardStep::Personal);
        assert_eq!(wizard.draft().name.as_deref(), Some("Alex"));

        wizard.advance().unwrap();
        wizard.start_over();
        assert_eq!(wizard.step(), WizardStep::Personal);
        assert_eq!(wizard.draft(), &ProfileDraft::default());
    }

    #[test]
    fn test_profile_reports_first_incomplete_step() {
        let mut draft = ProfileDraft::default();
        fill_all(&mut draft);
        draft.height = None;
        let wizard = ProfileWizard::resume(WizardStep::Results, draft);
        assert_eq!(
            wizard.profile(),
            Err(WizardError::Incomplete {
                step: WizardStep::Body,
                reason: FieldError::Missing("height"),
            })
        );
    }

    #[test]
    fn test_profile_before_results_is_rejected() {
        let wizard = at_start(fill_all);
        assert_eq!(wizard.profile(), Err(WizardError::NotFinished));
    }
}
