use std::fmt;

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

use crate::domain::{Category, InvalidIdError, ProcedureId};

/// The literal that marks a step as a verbal call-out.
pub const CALL_OUT_MARKER: &str = "Call Out:";

/// A single operating procedure.
///
/// Procedures are immutable once built. Per-session state such as expansion
/// or highlighting lives outside the record, keyed by [`Procedure::id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    id: ProcedureId,
    title: NonEmptyString,
    short_title: NonEmptyString,
    category: Category,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    general_notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
    #[serde(default)]
    actions: Vec<ProcedureAction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    conditionals: Vec<ProcedureConditional>,
}

impl Procedure {
    /// Starts building a procedure with the given identifier and category.
    #[must_use]
    pub fn builder(id: &str, category: Category) -> ProcedureBuilder {
        ProcedureBuilder::new(id, category)
    }

    /// The unique identifier.
    #[must_use]
    pub const fn id(&self) -> &ProcedureId {
        &self.id
    }

    /// The full display title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// The abbreviated title, used in cross-reference buttons.
    #[must_use]
    pub fn short_title(&self) -> &str {
        self.short_title.as_str()
    }

    /// The category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Informational notes shown before the actions.
    #[must_use]
    pub fn general_notes(&self) -> &[String] {
        &self.general_notes
    }

    /// Role-scoped action lists, in order.
    #[must_use]
    pub fn actions(&self) -> &[ProcedureAction] {
        &self.actions
    }

    /// Conditional branches, in order.
    #[must_use]
    pub fn conditionals(&self) -> &[ProcedureConditional] {
        &self.conditionals
    }

    /// Trailing annotations.
    #[must_use]
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Identifiers this procedure cross-references, in conditional order.
    pub fn references(&self) -> impl Iterator<Item = &ProcedureId> {
        self.conditionals
            .iter()
            .filter_map(ProcedureConditional::reference_id)
    }

    /// Every call-out step across all roles, paired with the role that makes it.
    pub fn call_outs(&self) -> impl Iterator<Item = (Role, &str)> {
        self.actions.iter().flat_map(|action| {
            action
                .steps
                .iter()
                .filter(|step| step.is_call_out())
                .map(move |step| (action.role, step.text()))
        })
    }
}

/// An operator role within the crew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The remote pilot in command.
    RemotePilot,
    /// The visual observer maintaining sight of the aircraft and airspace.
    VisualObserver,
    /// The payload or camera operator.
    PayloadOperator,
}

impl Role {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RemotePilot => "Remote Pilot",
            Self::VisualObserver => "Visual Observer",
            Self::PayloadOperator => "Payload Operator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One role's ordered steps within a procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureAction {
    /// The role performing the steps.
    pub role: Role,
    /// Steps, in order.
    pub steps: Vec<Step>,
}

/// A single instruction.
///
/// Call-outs are instructions spoken aloud to the rest of the crew. The
/// distinction is made once, when the step is created, rather than by
/// inspecting text at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Step {
    /// An ordinary instruction.
    Plain(String),
    /// A verbal call-out. The text excludes the marker.
    CallOut(String),
}

impl Step {
    /// Classifies a step from its authored text.
    ///
    /// Text beginning with [`CALL_OUT_MARKER`] becomes a [`Step::CallOut`]
    /// with the marker and following whitespace removed.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        text.strip_prefix(CALL_OUT_MARKER).map_or_else(
            || Self::Plain(text.to_string()),
            |rest| Self::CallOut(rest.trim_start().to_string()),
        )
    }

    /// The instruction text, without any call-out marker.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::CallOut(text) => text,
        }
    }

    /// Whether this step is a verbal call-out.
    #[must_use]
    pub const fn is_call_out(&self) -> bool {
        matches!(self, Self::CallOut(_))
    }
}

impl From<String> for Step {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<Step> for String {
    fn from(step: Step) -> Self {
        step.to_string()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Plain(text) => f.write_str(text),
            Self::CallOut(text) => write!(f, "{CALL_OUT_MARKER} {text}"),
        }
    }
}

/// A branch within a procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureConditional {
    /// The triggering condition.
    pub condition: String,
    /// What to do when the condition holds.
    pub action: String,
    /// The procedure to continue with, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<ProcedureId>,
}

impl ProcedureConditional {
    /// The cross-referenced procedure, if any.
    #[must_use]
    pub const fn reference_id(&self) -> Option<&ProcedureId> {
        self.reference_id.as_ref()
    }
}

/// Errors that can occur when building a procedure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    /// The procedure or a referenced identifier is malformed.
    #[error(transparent)]
    Id(#[from] InvalidIdError),

    /// The procedure has no title.
    #[error("procedure {0} has an empty title")]
    EmptyTitle(String),
}

/// Incremental constructor for [`Procedure`].
///
/// Validation is deferred to [`ProcedureBuilder::build`] so that catalogue
/// data reads as a flat list of calls.
#[derive(Debug, Clone)]
#[must_use]
pub struct ProcedureBuilder {
    id: String,
    category: Category,
    title: String,
    short_title: Option<String>,
    description: String,
    general_notes: Vec<String>,
    actions: Vec<ProcedureAction>,
    conditionals: Vec<(String, String, Option<String>)>,
    notes: Vec<String>,
}

impl ProcedureBuilder {
    fn new(id: &str, category: Category) -> Self {
        Self {
            id: id.to_string(),
            category,
            title: String::new(),
            short_title: None,
            description: String::new(),
            general_notes: Vec::new(),
            actions: Vec::new(),
            conditionals: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Sets the title.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Sets the short title. Defaults to the title.
    pub fn short_title(mut self, short_title: &str) -> Self {
        self.short_title = Some(short_title.to_string());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Appends a general note.
    pub fn general_note(mut self, note: &str) -> Self {
        self.general_notes.push(note.to_string());
        self
    }

    /// Appends a role's steps. Each step is classified with [`Step::parse`].
    pub fn action<'a>(mut self, role: Role, steps: impl IntoIterator<Item = &'a str>) -> Self {
        self.actions.push(ProcedureAction {
            role,
            steps: steps.into_iter().map(Step::parse).collect(),
        });
        self
    }

    /// Appends a conditional with no cross-reference.
    pub fn conditional(mut self, condition: &str, action: &str) -> Self {
        self.conditionals
            .push((condition.to_string(), action.to_string(), None));
        self
    }

    /// Appends a conditional that cross-references another procedure.
    pub fn conditional_ref(mut self, condition: &str, action: &str, reference: &str) -> Self {
        self.conditionals.push((
            condition.to_string(),
            action.to_string(),
            Some(reference.to_string()),
        ));
        self
    }

    /// Appends a trailing note.
    pub fn note(mut self, note: &str) -> Self {
        self.notes.push(note.to_string());
        self
    }

    /// Validates and builds the procedure.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Id`] if the identifier or any reference is
    /// malformed, or [`BuildError::EmptyTitle`] if no title was given.
    pub fn build(self) -> Result<Procedure, BuildError> {
        let id = ProcedureId::new(self.id)?;

        let title = NonEmptyString::new(self.title)
            .map_err(|_| BuildError::EmptyTitle(id.to_string()))?;
        let short_title = match self.short_title {
            Some(short) => {
                NonEmptyString::new(short).map_err(|_| BuildError::EmptyTitle(id.to_string()))?
            }
            None => title.clone(),
        };

        let conditionals: Vec<ProcedureConditional> = self
            .conditionals
            .into_iter()
            .map(|(condition, action, reference)| {
                Ok(ProcedureConditional {
                    condition,
                    action,
                    reference_id: reference.map(ProcedureId::new).transpose()?,
                })
            })
            .collect::<Result<_, InvalidIdError>>()?;

        Ok(Procedure {
            id,
            title,
            short_title,
            category: self.category,
            description: self.description,
            general_notes: self.general_notes,
            actions: self.actions,
            conditionals,
            notes: self.notes,
        })
    }
}
