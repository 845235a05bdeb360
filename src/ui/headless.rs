//! In-memory views
//!
//! Stand-ins for the DOM used by the native runner and the tests. Clones
//! share state, so a clone captured by a timer task sees the same form.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Banner, Field, Form, Page, Severity, UiError};
use crate::store::ExportFile;

#[derive(Debug, Default)]
struct FormState {
    values: [String; 4],
    marked: [bool; 4],
    focused: Option<Field>,
}

type FocusHook = Rc<dyn Fn(Field)>;

/// Headless form
#[derive(Clone, Default)]
pub struct HeadlessForm {
    state: Rc<RefCell<FormState>>,
    focus_hook: Rc<RefCell<Option<FocusHook>>>,
}

impl HeadlessForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate typing: replace a field's value
    pub fn set_value(&self, field: Field, value: &str) {
        self.state.borrow_mut().values[field.index()] = value.to_string();
    }

    /// Fill all four fields
    pub fn fill(&self, name: &str, email: &str, phone: &str, message: &str) {
        self.set_value(Field::Name, name);
        self.set_value(Field::Email, email);
        self.set_value(Field::Phone, phone);
        self.set_value(Field::Message, message);
    }

    pub fn is_marked(&self, field: Field) -> bool {
        self.state.borrow().marked[field.index()]
    }

    /// Fields currently carrying the error marker
    pub fn marked_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.is_marked(*f))
            .collect()
    }

    /// Run `hook` on every `focus()`, the way a DOM focus listener fires
    /// synchronously from `element.focus()`
    pub fn on_focus(&self, hook: impl Fn(Field) + 'static) {
        *self.focus_hook.borrow_mut() = Some(Rc::new(hook));
    }

    pub fn focused(&self) -> Option<Field> {
        self.state.borrow().focused
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().values.iter().all(|v| v.is_empty())
    }
}

impl Form for HeadlessForm {
    fn value(&self, field: Field) -> String {
        self.state.borrow().values[field.index()].clone()
    }

    fn set_marked(&self, field: Field, marked: bool) {
        self.state.borrow_mut().marked[field.index()] = marked;
    }

    fn focus(&self, field: Field) {
        self.state.borrow_mut().focused = Some(field);
        let hook = self.focus_hook.borrow().clone();
        if let Some(hook) = hook {
            hook(field);
        }
    }

    fn reset(&self) {
        self.state.borrow_mut().values = Default::default();
    }
}

#[derive(Debug, Default)]
struct BannerState {
    text: String,
    severity: Option<Severity>,
    visible: bool,
}

/// Headless message banner
#[derive(Debug, Clone, Default)]
pub struct HeadlessBanner {
    state: Rc<RefCell<BannerState>>,
}

impl HeadlessBanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    pub fn severity(&self) -> Option<Severity> {
        self.state.borrow().severity
    }

    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }
}

impl Banner for HeadlessBanner {
    fn show(&self, text: &str, severity: Severity) {
        let mut state = self.state.borrow_mut();
        state.text = text.to_string();
        state.severity = Some(severity);
        state.visible = true;
    }

    fn hide(&self) {
        self.state.borrow_mut().visible = false;
    }
}

#[derive(Debug, Default)]
struct PageState {
    alerts: Vec<String>,
    confirms: Vec<String>,
    downloads: Vec<ExportFile>,
    reloads: usize,
}

/// Headless page: records dialogs and downloads, answers confirms with a
/// preset reply
#[derive(Debug, Clone, Default)]
pub struct HeadlessPage {
    state: Rc<RefCell<PageState>>,
    confirm_reply: bool,
}

impl HeadlessPage {
    /// A page whose confirm dialogs answer `confirm_reply`
    pub fn new(confirm_reply: bool) -> Self {
        Self {
            state: Rc::default(),
            confirm_reply,
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state.borrow().alerts.clone()
    }

    pub fn confirms(&self) -> Vec<String> {
        self.state.borrow().confirms.clone()
    }

    pub fn downloads(&self) -> Vec<ExportFile> {
        self.state.borrow().downloads.clone()
    }

    pub fn reloads(&self) -> usize {
        self.state.borrow().reloads
    }
}

impl Page for HeadlessPage {
    fn alert(&self, text: &str) {
        self.state.borrow_mut().alerts.push(text.to_string());
    }

    fn confirm(&self, text: &str) -> bool {
        self.state.borrow_mut().confirms.push(text.to_string());
        self.confirm_reply
    }

    fn download(&self, file: &ExportFile) -> Result<(), UiError> {
        self.state.borrow_mut().downloads.push(file.clone());
        Ok(())
    }

    fn reload(&self) {
        self.state.borrow_mut().reloads += 1;
    }
}
