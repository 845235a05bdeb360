//! View contracts and feedback
//!
//! The controller never touches the DOM directly. It talks to:
//! - [`Form`]: the four input fields and the form element
//! - [`Banner`]: the message container
//! - [`Page`]: alert/confirm dialogs, downloads, reload
//!
//! `web` implements these over `web-sys`; [`headless`] keeps them in memory.

pub mod headless;
pub mod highlight;
pub mod message;

use thiserror::Error;

pub use highlight::FieldHighlighter;
pub use message::MessagePresenter;

use crate::store::ExportFile;
use crate::submission::FormValues;

/// DOM wiring failure
#[derive(Debug, Error)]
pub enum UiError {
    #[error("element #{0} not found")]
    MissingElement(&'static str),
    #[error("element #{0} has an unexpected type")]
    WrongElementType(&'static str),
    #[error("{0}")]
    Js(String),
}

/// Form fields, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Phone, Field::Message];

    /// Element id in the page
    pub fn id(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Message => "message",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Banner severity; the name doubles as the CSS class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    /// Auto-hide delay: short for good news, longer for anything else
    pub fn hide_after_ms(&self) -> u32 {
        match self {
            Severity::Success => crate::consts::SUCCESS_HIDE_MS,
            Severity::Error | Severity::Warning => crate::consts::ERROR_HIDE_MS,
        }
    }

    /// Full banner class list, e.g. `message-container error`
    pub fn banner_class(&self) -> String {
        format!("{} {}", crate::consts::BANNER_CLASS, self.as_str())
    }
}

/// The contact form's fields
pub trait Form {
    /// Current raw value of a field
    fn value(&self, field: Field) -> String;
    /// Add or remove the error marker
    fn set_marked(&self, field: Field, marked: bool);
    /// Move input focus to a field
    fn focus(&self, field: Field);
    /// Empty every field
    fn reset(&self);

    /// All four values, trimmed
    fn values(&self) -> FormValues {
        FormValues::new(
            &self.value(Field::Name),
            &self.value(Field::Email),
            &self.value(Field::Phone),
            &self.value(Field::Message),
        )
    }
}

/// The transient message banner
pub trait Banner {
    fn show(&self, text: &str, severity: Severity);
    fn hide(&self);
}

/// Page-level interactions used by the admin utilities
pub trait Page {
    /// Blocking notice
    fn alert(&self, text: &str);
    /// Blocking yes/no question; `false` if the user declines
    fn confirm(&self, text: &str) -> bool;
    /// Offer a file to the user as a download
    fn download(&self, file: &ExportFile) -> Result<(), UiError>;
    fn reload(&self);
}
