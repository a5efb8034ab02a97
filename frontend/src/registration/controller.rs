use std::collections::BTreeMap;
use std::rc::Rc;

use log::{debug, info};
use yew::Reducible;

use super::draft::{Field, ProfileDraft};
use super::submission::SubmissionResult;
use super::validators;

pub type FieldErrors = BTreeMap<Field, String>;

pub const USERNAME_AVAILABLE: &str = "Great! You can continue";

/// The three screens of the form. Being an enum, a step outside 1..=3 cannot exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Personal,
    Experience,
    Goal,
}

impl Step {
    pub const COUNT: u32 = 3;

    pub fn index(self) -> u32 {
        match self {
            Step::Personal => 1,
            Step::Experience => 2,
            Step::Goal => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Personal => "Step 1: Personal data",
            Step::Experience => "Step 2: Running experience",
            Step::Goal => "Step 3: Your goal",
        }
    }

    /// Required fields owned by this step, in display order.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Step::Personal => &[
                Field::TelegramUsername,
                Field::Name,
                Field::Gender,
                Field::Age,
                Field::Height,
                Field::Weight,
            ],
            Step::Experience => &[Field::Experience, Field::WeeklyVolume, Field::ComfortablePace],
            Step::Goal => &[
                Field::GoalDistance,
                Field::GoalDate,
                Field::TargetTime,
                Field::TrainingDaysPerWeek,
            ],
        }
    }

    fn next(self) -> Option<Step> {
        match self {
            Step::Personal => Some(Step::Experience),
            Step::Experience => Some(Step::Goal),
            Step::Goal => None,
        }
    }

    fn previous(self) -> Option<Step> {
        match self {
            Step::Personal => None,
            Step::Experience => Some(Step::Personal),
            Step::Goal => Some(Step::Experience),
        }
    }

    pub fn progress_percent(self) -> u32 {
        self.index() * 100 / Self::COUNT
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Advance {
    Moved(Step),
    /// The last step validated; the form may be submitted.
    Ready,
    Blocked(FieldErrors),
}

pub fn check_field(field: Field, draft: &ProfileDraft) -> validators::Check {
    match field {
        Field::TelegramUsername => validators::telegram_username(&draft.telegram_username),
        Field::Name => validators::required(&draft.name),
        Field::Gender => validators::selected(draft.gender),
        Field::Age => validators::integer(&draft.age),
        Field::Height => validators::integer(&draft.height),
        Field::Weight => validators::integer(&draft.weight),
        Field::Experience => validators::selected(draft.experience),
        Field::WeeklyVolume => validators::integer(&draft.weekly_volume),
        Field::ComfortablePace => validators::selected(draft.comfortable_pace),
        Field::GoalDistance => validators::selected(draft.goal_distance),
        Field::GoalDate => validators::date(&draft.goal_date),
        Field::TargetTime => validators::target_time(&draft.target_time),
        Field::TrainingDaysPerWeek => validators::integer(&draft.training_days_per_week),
        Field::PreferredTrainingDays => Ok(()),
    }
}

pub fn validate_step(step: Step, draft: &ProfileDraft) -> FieldErrors {
    step.fields()
        .iter()
        .filter_map(|&field| {
            check_field(field, draft)
                .err()
                .map(|message| (field, message.to_string()))
        })
        .collect()
}

pub fn advance(step: Step, draft: &ProfileDraft) -> Advance {
    let errors = validate_step(step, draft);
    if !errors.is_empty() {
        return Advance::Blocked(errors);
    }
    match step.next() {
        Some(next) => Advance::Moved(next),
        None => Advance::Ready,
    }
}

/// Going back never validates and stops at the first step.
pub fn retreat(step: Step) -> Step {
    step.previous().unwrap_or(step)
}

#[derive(Clone, Debug, PartialEq)]
pub struct SuccessView {
    pub message: String,
    pub bot_link: String,
}

/// State of one form session, driven through `use_reducer`.
#[derive(Clone, Debug, PartialEq)]
pub struct FormSession {
    pub step: Step,
    pub draft: ProfileDraft,
    pub errors: FieldErrors,
    pub username_hint: Option<String>,
    /// Username whose availability check is still running.
    pub username_check: Option<String>,
    pub submitting: bool,
    pub submit_error: Option<String>,
    pub success: Option<SuccessView>,
}

impl Default for FormSession {
    fn default() -> Self {
        Self {
            step: Step::Personal,
            draft: ProfileDraft::default(),
            errors: FieldErrors::new(),
            username_hint: None,
            username_check: None,
            submitting: false,
            submit_error: None,
            success: None,
        }
    }
}

pub enum FormAction {
    Update(Field, String),
    Next,
    Back,
    ShowErrors(FieldErrors),
    UsernameCheckStarted(String),
    /// Result of the availability check for `username`; `Err` carries the message to show.
    UsernameChecked {
        username: String,
        outcome: Result<(), String>,
    },
    SubmitStarted,
    SubmitFinished(SubmissionResult),
}

impl FormSession {
    pub fn is_finished(&self) -> bool {
        self.success.is_some()
    }

    pub fn is_checking_username(&self) -> bool {
        self.username_check.is_some()
    }

    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    fn apply(&mut self, action: FormAction) {
        match action {
            FormAction::Update(field, value) => {
                self.draft.update_field(field, &value);
                self.errors.remove(&field);
                if field == Field::TelegramUsername {
                    self.username_hint = None;
                    self.username_check = None;
                }
            }
            FormAction::Next => match advance(self.step, &self.draft) {
                Advance::Moved(next) => {
                    info!("Registration moved to step {}", next.index());
                    self.step = next;
                    self.errors.clear();
                }
                Advance::Ready => self.errors.clear(),
                Advance::Blocked(errors) => {
                    debug!("Step {} blocked by {} field error(s)", self.step.index(), errors.len());
                    self.errors = errors;
                }
            },
            FormAction::Back => {
                self.step = retreat(self.step);
                self.errors.clear();
            }
            FormAction::ShowErrors(errors) => self.errors = errors,
            FormAction::UsernameCheckStarted(username) => {
                if self.step == Step::Personal && self.username_check.is_none() {
                    self.username_hint = None;
                    self.username_check = Some(username);
                }
            }
            FormAction::UsernameChecked { username, outcome } => {
                let pending = self.username_check.take();
                let current = self.draft.telegram_username.trim() == username.trim();
                if self.step != Step::Personal || pending.as_deref() != Some(username.as_str()) || !current {
                    debug!("Dropping stale username check for {}", username);
                    return;
                }
                match outcome {
                    Ok(()) => {
                        self.username_hint = Some(USERNAME_AVAILABLE.to_string());
                        self.apply(FormAction::Next);
                    }
                    Err(message) => {
                        self.username_hint = None;
                        self.errors.insert(Field::TelegramUsername, message);
                    }
                }
            }
            FormAction::SubmitStarted => {
                self.submitting = true;
                self.submit_error = None;
            }
            FormAction::SubmitFinished(result) => {
                self.submitting = false;
                match result {
                    SubmissionResult::Success { message, bot_link } => {
                        self.success = Some(SuccessView { message, bot_link });
                    }
                    SubmissionResult::Failure { message } => {
                        self.submit_error = Some(message);
                    }
                }
            }
        }
    }
}

impl Reducible for FormSession {
    type Action = FormAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        // A successful submission ends the session.
        if self.is_finished() {
            return self;
        }
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}
