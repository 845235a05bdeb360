//! Contact Form - browser-resident contact form handler
//!
//! Core modules:
//! - `validate`: Email / Indian mobile number shape checks
//! - `submission`: The stored record and the raw form values
//! - `storage`: Key/value storage backends (LocalStorage on web)
//! - `store`: Append-only submission store with JSON export
//! - `timer`: Cancellable delayed callbacks
//! - `clock`: Wall clock for submission timestamps
//! - `ui`: View contracts, field highlighting and the message banner
//! - `controller`: Form-submit orchestration
//! - `admin`: Export / clear-all utilities
//! - `config`: Runtime configuration
//! - `web`: DOM / LocalStorage bindings (wasm32 only)

pub mod admin;
pub mod clock;
pub mod config;
pub mod controller;
pub mod storage;
pub mod store;
pub mod submission;
pub mod timer;
pub mod ui;
pub mod validate;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{CorruptPolicy, FormConfig};
pub use controller::{Outcome, Rejection, SubmissionController};
pub use store::{ExportFile, StoreError, SubmissionStore};
pub use submission::{FormValues, Submission};

/// Form configuration constants
pub mod consts {
    /// LocalStorage key holding the JSON array of submissions
    pub const STORAGE_KEY: &str = "contactSubmissions";
    /// LocalStorage key holding an optional `FormConfig` override
    pub const CONFIG_KEY: &str = "contactFormConfig";

    /// Error marker auto-clears after this long (ms)
    pub const HIGHLIGHT_CLEAR_MS: u32 = 3000;
    /// Success banner auto-hides after this long (ms)
    pub const SUCCESS_HIDE_MS: u32 = 5000;
    /// Any other banner auto-hides after this long (ms)
    pub const ERROR_HIDE_MS: u32 = 8000;

    /// CSS class toggled on invalid fields
    pub const ERROR_CLASS: &str = "error-highlight";
    /// Base CSS class of the banner; severity is appended
    pub const BANNER_CLASS: &str = "message-container";

    /// Export file name prefix (`<prefix><YYYY-MM-DD>.json`)
    pub const EXPORT_PREFIX: &str = "contact_submissions_";
    pub const EXPORT_MIME: &str = "application/json";
}
