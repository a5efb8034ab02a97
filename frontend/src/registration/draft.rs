use std::collections::BTreeSet;

use chrono::NaiveDate;
use log::warn;
use serde::Serialize;

use super::submission::SubmitError;

/// Declares a select-backed choice enum with its wire token and display label.
macro_rules! choice {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($token:literal, $label:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub enum $name {
            $(#[serde(rename = $token)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn token(self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_token(value: &str) -> Option<Self> {
                match value {
                    $($token => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

choice!(Gender {
    Male => ("male", "Male"),
    Female => ("female", "Female"),
});

choice!(Experience {
    Beginner => ("beginner", "Beginner (less than 6 months)"),
    Intermediate => ("intermediate", "Intermediate (6 months to 2 years)"),
    Advanced => ("advanced", "Advanced (more than 2 years)"),
});

choice!(
    /// Bucketed easy-run pace in min/km.
    ComfortablePace {
        From430To530 => ("4:30-5:30", "4:30-5:30 min/km"),
        From530To630 => ("5:30-6:30", "5:30-6:30 min/km"),
        From630To700 => ("6:30-7:00", "6:30-7:00 min/km"),
        SlowerThan700 => ("7+", "Slower than 7:00 min/km"),
        Unknown => ("unknown", "I don't know my pace"),
    }
);

choice!(GoalDistance {
    FiveK => ("5k", "5 km"),
    TenK => ("10k", "10 km"),
    Half => ("21.1k", "Half marathon (21.1 km)"),
    Marathon => ("42.2k", "Marathon (42.2 km)"),
});

choice!(
    /// Declaration order is Monday first; the derived `Ord` keeps the day set in week order.
    Weekday {
        Mon => ("mon", "Monday"),
        Tue => ("tue", "Tuesday"),
        Wed => ("wed", "Wednesday"),
        Thu => ("thu", "Thursday"),
        Fri => ("fri", "Friday"),
        Sat => ("sat", "Saturday"),
        Sun => ("sun", "Sunday"),
    }
);

/// Options offered for "training days per week".
pub const TRAINING_DAYS_OPTIONS: &[&str] = &["2", "3", "4", "5", "6"];

/// Every input of the registration form. The wire name doubles as the DOM id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    TelegramUsername,
    Name,
    Gender,
    Age,
    Height,
    Weight,
    Experience,
    WeeklyVolume,
    ComfortablePace,
    GoalDistance,
    GoalDate,
    TargetTime,
    TrainingDaysPerWeek,
    PreferredTrainingDays,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::TelegramUsername => "telegram_username",
            Field::Name => "name",
            Field::Gender => "gender",
            Field::Age => "age",
            Field::Height => "height",
            Field::Weight => "weight",
            Field::Experience => "experience",
            Field::WeeklyVolume => "weekly_volume",
            Field::ComfortablePace => "comfortable_pace",
            Field::GoalDistance => "goal_distance",
            Field::GoalDate => "goal_date",
            Field::TargetTime => "target_time",
            Field::TrainingDaysPerWeek => "training_days_per_week",
            Field::PreferredTrainingDays => "preferred_training_days",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::TelegramUsername => "Telegram username",
            Field::Name => "Your name",
            Field::Gender => "Gender",
            Field::Age => "Age",
            Field::Height => "Height (cm)",
            Field::Weight => "Weight (kg)",
            Field::Experience => "Running experience",
            Field::WeeklyVolume => "Weekly running volume (km)",
            Field::ComfortablePace => "Comfortable running pace",
            Field::GoalDistance => "Race distance",
            Field::GoalDate => "Race date",
            Field::TargetTime => "Target time (h:mm:ss)",
            Field::TrainingDaysPerWeek => "Training days per week",
            Field::PreferredTrainingDays => "Preferred training days",
        }
    }
}

/// The in-progress profile. Free-text and numeric inputs stay as typed until
/// [`ProfileDraft::to_payload`] coerces them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileDraft {
    pub telegram_username: String,
    pub name: String,
    pub gender: Option<Gender>,
    pub age: String,
    pub height: String,
    pub weight: String,
    pub experience: Option<Experience>,
    pub weekly_volume: String,
    pub comfortable_pace: Option<ComfortablePace>,
    pub goal_distance: Option<GoalDistance>,
    pub goal_date: String,
    pub target_time: String,
    pub training_days_per_week: String,
    pub preferred_training_days: BTreeSet<Weekday>,
}

impl ProfileDraft {
    /// Applies one input change. Choice fields take their option token (an
    /// empty or unknown token clears the selection). The weekday field takes a
    /// day token and toggles its membership.
    pub fn update_field(&mut self, field: Field, value: &str) {
        match field {
            Field::TelegramUsername => self.telegram_username = value.to_string(),
            Field::Name => self.name = value.to_string(),
            Field::Gender => self.gender = Gender::from_token(value),
            Field::Age => self.age = value.to_string(),
            Field::Height => self.height = value.to_string(),
            Field::Weight => self.weight = value.to_string(),
            Field::Experience => self.experience = Experience::from_token(value),
            Field::WeeklyVolume => self.weekly_volume = value.to_string(),
            Field::ComfortablePace => self.comfortable_pace = ComfortablePace::from_token(value),
            Field::GoalDistance => self.goal_distance = GoalDistance::from_token(value),
            Field::GoalDate => self.goal_date = value.to_string(),
            Field::TargetTime => self.target_time = value.to_string(),
            Field::TrainingDaysPerWeek => self.training_days_per_week = value.to_string(),
            Field::PreferredTrainingDays => match Weekday::from_token(value) {
                Some(day) => {
                    if !self.preferred_training_days.remove(&day) {
                        self.preferred_training_days.insert(day);
                    }
                }
                None => warn!("Ignoring unknown weekday token: {}", value),
            },
        }
    }

    /// Raw text of a field as the form shows it.
    pub fn value(&self, field: Field) -> String {
        match field {
            Field::TelegramUsername => self.telegram_username.clone(),
            Field::Name => self.name.clone(),
            Field::Gender => self.gender.map(Gender::token).unwrap_or_default().to_string(),
            Field::Age => self.age.clone(),
            Field::Height => self.height.clone(),
            Field::Weight => self.weight.clone(),
            Field::Experience => self.experience.map(Experience::token).unwrap_or_default().to_string(),
            Field::WeeklyVolume => self.weekly_volume.clone(),
            Field::ComfortablePace => self
                .comfortable_pace
                .map(ComfortablePace::token)
                .unwrap_or_default()
                .to_string(),
            Field::GoalDistance => self.goal_distance.map(GoalDistance::token).unwrap_or_default().to_string(),
            Field::GoalDate => self.goal_date.clone(),
            Field::TargetTime => self.target_time.clone(),
            Field::TrainingDaysPerWeek => self.training_days_per_week.clone(),
            Field::PreferredTrainingDays => self
                .preferred_training_days
                .iter()
                .map(|day| day.token())
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    pub fn has_day(&self, day: Weekday) -> bool {
        self.preferred_training_days.contains(&day)
    }

    /// Builds the wire payload, coercing numeric text to integers.
    pub fn to_payload(&self) -> Result<ProfilePayload, SubmitError> {
        Ok(ProfilePayload {
            telegram_username: self.telegram_username.trim().to_string(),
            name: self.name.trim().to_string(),
            gender: required_choice(self.gender, Field::Gender)?,
            age: parse_int(&self.age, Field::Age)?,
            height: parse_int(&self.height, Field::Height)?,
            weight: parse_int(&self.weight, Field::Weight)?,
            experience: required_choice(self.experience, Field::Experience)?,
            weekly_volume: parse_int(&self.weekly_volume, Field::WeeklyVolume)?,
            comfortable_pace: required_choice(self.comfortable_pace, Field::ComfortablePace)?,
            goal_distance: required_choice(self.goal_distance, Field::GoalDistance)?,
            goal_date: NaiveDate::parse_from_str(self.goal_date.trim(), "%Y-%m-%d")
                .map_err(|_| SubmitError::Payload(Field::GoalDate))?,
            target_time: self.target_time.trim().to_string(),
            training_days_per_week: parse_int(&self.training_days_per_week, Field::TrainingDaysPerWeek)?,
            preferred_training_days: self.preferred_training_days.iter().copied().collect(),
        })
    }
}

fn parse_int(value: &str, field: Field) -> Result<i64, SubmitError> {
    value.trim().parse::<i64>().map_err(|_| SubmitError::Payload(field))
}

fn required_choice<T>(value: Option<T>, field: Field) -> Result<T, SubmitError> {
    value.ok_or(SubmitError::Payload(field))
}

/// Body of `POST /api/save_profile`.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ProfilePayload {
    pub telegram_username: String,
    pub name: String,
    pub gender: Gender,
    pub age: i64,
    pub height: i64,
    pub weight: i64,
    pub experience: Experience,
    pub weekly_volume: i64,
    pub comfortable_pace: ComfortablePace,
    pub goal_distance: GoalDistance,
    pub goal_date: NaiveDate,
    pub target_time: String,
    pub training_days_per_week: i64,
    pub preferred_training_days: Vec<Weekday>,
}

#[cfg(test)]
pub(crate) fn complete_draft() -> ProfileDraft {
    let mut draft = ProfileDraft::default();
    for (field, value) in [
        (Field::TelegramUsername, "@ivan_runs"),
        (Field::Name, "Ivan"),
        (Field::Gender, "male"),
        (Field::Age, "30"),
        (Field::Height, "180"),
        (Field::Weight, "75"),
        (Field::Experience, "intermediate"),
        (Field::WeeklyVolume, "25"),
        (Field::ComfortablePace, "5:30-6:30"),
        (Field::GoalDistance, "21.1k"),
        (Field::GoalDate, "2026-05-03"),
        (Field::TargetTime, "1:45:00"),
        (Field::TrainingDaysPerWeek, "4"),
        (Field::PreferredTrainingDays, "sat"),
        (Field::PreferredTrainingDays, "tue"),
    ] {
        draft.update_field(field, value);
    }
    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn toggling_a_day_never_duplicates_it() {
        let mut draft = ProfileDraft::default();
        for toggles in 1..=7 {
            draft.update_field(Field::PreferredTrainingDays, "wed");
            let expected = toggles % 2;
            assert_eq!(draft.preferred_training_days.len(), expected);
            assert_eq!(draft.has_day(Weekday::Wed), expected == 1);
        }
    }

    #[test]
    fn unknown_day_token_is_ignored() {
        let mut draft = ProfileDraft::default();
        draft.update_field(Field::PreferredTrainingDays, "someday");
        assert!(draft.preferred_training_days.is_empty());
    }

    #[test]
    fn empty_choice_clears_selection() {
        let mut draft = ProfileDraft::default();
        draft.update_field(Field::Gender, "female");
        assert_eq!(draft.gender, Some(Gender::Female));
        draft.update_field(Field::Gender, "");
        assert_eq!(draft.gender, None);
        assert_eq!(draft.value(Field::Gender), "");
    }

    #[test]
    fn payload_matches_wire_contract() {
        let payload = complete_draft().to_payload().unwrap();
        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            body,
            json!({
                "telegram_username": "@ivan_runs",
                "name": "Ivan",
                "gender": "male",
                "age": 30,
                "height": 180,
                "weight": 75,
                "experience": "intermediate",
                "weekly_volume": 25,
                "comfortable_pace": "5:30-6:30",
                "goal_distance": "21.1k",
                "goal_date": "2026-05-03",
                "target_time": "1:45:00",
                "training_days_per_week": 4,
                "preferred_training_days": ["tue", "sat"],
            })
        );
    }

    #[test]
    fn payload_rejects_non_numeric_age() {
        let mut draft = complete_draft();
        draft.update_field(Field::Age, "thirty");
        assert!(matches!(draft.to_payload(), Err(SubmitError::Payload(Field::Age))));
    }

    #[test]
    fn numeric_text_is_trimmed_before_coercion() {
        let mut draft = complete_draft();
        draft.update_field(Field::Weight, " 72 ");
        assert_eq!(draft.to_payload().unwrap().weight, 72);
    }
}
