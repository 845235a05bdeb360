//! Browser bindings
//!
//! `web-sys` implementations of the storage, scheduler and view contracts,
//! plus the event wiring for the contact form page.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{
    Blob, BlobPropertyBag, Document, Element, HtmlAnchorElement, HtmlElement, HtmlFormElement,
    HtmlInputElement, HtmlTextAreaElement, Storage, Url, Window,
};

use crate::clock::SystemClock;
use crate::config::FormConfig;
use crate::consts::ERROR_CLASS;
use crate::controller::SubmissionController;
use crate::storage::{KeyValueStore, StorageError};
use crate::store::{ExportFile, SubmissionStore};
use crate::timer::{Scheduler, Task, TimerId};
use crate::ui::{Banner, Field, Form, Page, Severity, UiError};

pub const FORM_ID: &str = "contactForm";
pub const BANNER_ID: &str = "messageContainer";
pub const BANNER_TEXT_ID: &str = "messageText";

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

fn window() -> Result<Window, UiError> {
    web_sys::window().ok_or(UiError::Js("no window".to_string()))
}

fn document() -> Result<Document, UiError> {
    window()?
        .document()
        .ok_or(UiError::Js("no document".to_string()))
}

fn element(document: &Document, id: &'static str) -> Result<Element, UiError> {
    document
        .get_element_by_id(id)
        .ok_or(UiError::MissingElement(id))
}

/// `window.localStorage`
#[derive(Clone)]
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Backend {
                op: "getItem",
                message: js_message(&e),
            })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Backend {
                op: "setItem",
                message: js_message(&e),
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Backend {
                op: "removeItem",
                message: js_message(&e),
            })
    }
}

/// `setTimeout` / `clearTimeout`
pub struct BrowserScheduler {
    window: Window,
}

impl BrowserScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> Option<TimerId> {
        // Freed by wasm-bindgen once called; a cancelled callback is leaked
        let callback = Closure::once_into_js(move || task());
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms.min(i32::MAX as u32) as i32,
            )
            .map(TimerId)
            .map_err(|e| log::warn!("setTimeout failed: {}", js_message(&e)))
            .ok()
    }

    fn cancel(&self, id: TimerId) {
        self.window.clear_timeout_with_handle(id.0);
    }
}

#[derive(Clone)]
enum FieldElement {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
}

impl FieldElement {
    fn find(document: &Document, id: &'static str) -> Result<Self, UiError> {
        match element(document, id)?.dyn_into::<HtmlInputElement>() {
            Ok(input) => Ok(FieldElement::Input(input)),
            Err(el) => el
                .dyn_into::<HtmlTextAreaElement>()
                .map(FieldElement::TextArea)
                .map_err(|_| UiError::WrongElementType(id)),
        }
    }

    fn html(&self) -> &HtmlElement {
        match self {
            FieldElement::Input(el) => el.as_ref(),
            FieldElement::TextArea(el) => el.as_ref(),
        }
    }

    fn value(&self) -> String {
        match self {
            FieldElement::Input(el) => el.value(),
            FieldElement::TextArea(el) => el.value(),
        }
    }
}

/// The `#contactForm` element and its four fields
#[derive(Clone)]
pub struct WebForm {
    form: HtmlFormElement,
    fields: Rc<[FieldElement; 4]>,
}

impl WebForm {
    pub fn find(document: &Document) -> Result<Self, UiError> {
        let form = element(document, FORM_ID)?
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| UiError::WrongElementType(FORM_ID))?;
        let fields = [
            FieldElement::find(document, Field::Name.id())?,
            FieldElement::find(document, Field::Email.id())?,
            FieldElement::find(document, Field::Phone.id())?,
            FieldElement::find(document, Field::Message.id())?,
        ];
        Ok(Self {
            form,
            fields: Rc::new(fields),
        })
    }

    fn field(&self, field: Field) -> &FieldElement {
        &self.fields[field.index()]
    }
}

impl Form for WebForm {
    fn value(&self, field: Field) -> String {
        self.field(field).value()
    }

    fn set_marked(&self, field: Field, marked: bool) {
        let classes = self.field(field).html().class_list();
        let result = if marked {
            classes.add_1(ERROR_CLASS)
        } else {
            classes.remove_1(ERROR_CLASS)
        };
        if let Err(e) = result {
            log::warn!("Could not toggle marker on #{}: {}", field.id(), js_message(&e));
        }
    }

    fn focus(&self, field: Field) {
        if let Err(e) = self.field(field).html().focus() {
            log::warn!("Could not focus #{}: {}", field.id(), js_message(&e));
        }
    }

    fn reset(&self) {
        self.form.reset();
    }
}

/// `#messageContainer` / `#messageText`
#[derive(Clone)]
pub struct WebBanner {
    container: HtmlElement,
    text: Element,
}

impl WebBanner {
    pub fn find(document: &Document) -> Result<Self, UiError> {
        let container = element(document, BANNER_ID)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| UiError::WrongElementType(BANNER_ID))?;
        let text = element(document, BANNER_TEXT_ID)?;
        Ok(Self { container, text })
    }

    fn set_display(&self, display: &str) {
        if let Err(e) = self.container.style().set_property("display", display) {
            log::warn!("Could not set banner display: {}", js_message(&e));
        }
    }
}

impl Banner for WebBanner {
    fn show(&self, text: &str, severity: Severity) {
        self.text.set_text_content(Some(text));
        self.container.set_class_name(&severity.banner_class());
        self.set_display("block");
    }

    fn hide(&self) {
        self.set_display("none");
    }
}

/// Window dialogs, downloads and reload
#[derive(Clone)]
pub struct WebPage {
    window: Window,
}

impl WebPage {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Page for WebPage {
    fn alert(&self, text: &str) {
        if let Err(e) = self.window.alert_with_message(text) {
            log::warn!("Alert failed: {}", js_message(&e));
        }
    }

    fn confirm(&self, text: &str) -> bool {
        self.window.confirm_with_message(text).unwrap_or(false)
    }

    fn download(&self, file: &ExportFile) -> Result<(), UiError> {
        let js_err = |e: JsValue| UiError::Js(js_message(&e));

        let options = BlobPropertyBag::new();
        options.set_type(file.mime);
        let parts = js_sys::Array::of1(&JsValue::from_str(&file.contents));
        let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(js_err)?;
        let url = Url::create_object_url_with_blob(&blob).map_err(js_err)?;

        let document = self
            .window
            .document()
            .ok_or(UiError::Js("no document".to_string()))?;
        let link = document
            .create_element("a")
            .map_err(js_err)?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| UiError::WrongElementType("a"))?;
        link.set_href(&url);
        link.set_download(&file.filename);
        link.click();

        Url::revoke_object_url(&url).map_err(js_err)?;
        Ok(())
    }

    fn reload(&self) {
        if let Err(e) = self.window.location().reload() {
            log::warn!("Reload failed: {}", js_message(&e));
        }
    }
}

fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), UiError> {
    let closure = Closure::<dyn FnMut(_)>::new(handler);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(|e| UiError::Js(js_message(&e)))?;
    // Listeners live as long as the page
    closure.forget();
    Ok(())
}

pub type WebController = SubmissionController<WebForm, WebBanner, LocalStorage>;

/// Submission store over LocalStorage with the configured key
pub fn open_store() -> Result<SubmissionStore<LocalStorage>, StorageError> {
    let storage = LocalStorage::open()?;
    let config = FormConfig::load(&storage);
    Ok(SubmissionStore::new(storage, &config))
}

/// Find the form elements and wire submit / input / focus handlers
pub fn attach() -> Result<Rc<WebController>, UiError> {
    let window = window()?;
    let document = document()?;

    let form = WebForm::find(&document)?;
    let banner = WebBanner::find(&document)?;
    let store = open_store().map_err(|e| UiError::Js(e.to_string()))?;
    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler::new(window));

    let controller = Rc::new(SubmissionController::new(
        form.clone(),
        banner.clone(),
        store,
        scheduler,
        Box::new(SystemClock),
    ));

    // Submit: never let the browser navigate
    {
        let controller = controller.clone();
        listen(&form.form, "submit", move |event| {
            event.prevent_default();
            if let Err(e) = controller.submit() {
                log::error!("Submission not saved: {}", e);
            }
        })?;
    }

    // Live validation and marker clearing
    for field in [Field::Email, Field::Phone] {
        let target = form.field(field).html().clone();
        {
            let controller = controller.clone();
            listen(&target, "input", move |_event| {
                controller.highlighter().on_input(field);
            })?;
        }
        {
            let controller = controller.clone();
            listen(&target, "focus", move |_event| {
                controller.highlighter().on_focus(field);
            })?;
        }
    }

    // Clicking the banner dismisses it
    {
        let controller = controller.clone();
        listen(&banner.container, "click", move |_event| {
            controller.presenter().dismiss();
        })?;
    }

    controller.announce();
    log::info!("Contact form ready");
    Ok(controller)
}

/// Install panic hook and logger, then attach once the DOM is parsed
pub fn run() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    let Ok(document) = document() else {
        log::error!("Contact form: no document");
        return;
    };

    if document.ready_state() == "loading" {
        let closure = Closure::once(move |_event: web_sys::Event| start());
        if let Err(e) = document
            .add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())
        {
            log::error!("Contact form setup failed: {}", js_message(&e));
            return;
        }
        closure.forget();
    } else {
        start();
    }
}

fn start() {
    // The registered handlers keep the controller alive
    if let Err(e) = attach() {
        log::error!("Contact form setup failed: {}", e);
    }
}
