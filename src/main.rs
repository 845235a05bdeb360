//! Contact Form entry point
//!
//! In the browser this wires the form handlers and exposes the admin
//! utilities. Natively it runs one submission headless.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    contact_form::web::run();
}

/// Download every stored submission as JSON (call from a page control or
/// the console)
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn export_submissions() {
    use contact_form::admin;
    use contact_form::clock::SystemClock;
    use contact_form::web::{WebPage, open_store};

    let Some(window) = web_sys::window() else {
        return;
    };
    let store = match open_store() {
        Ok(store) => store,
        Err(e) => {
            log::error!("Export failed: {}", e);
            return;
        }
    };
    if let Err(e) = admin::export_submissions(&store, &WebPage::new(window), &SystemClock) {
        log::error!("Export failed: {}", e);
    }
}

/// Erase every stored submission after confirmation
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn clear_all_submissions() {
    use contact_form::admin;
    use contact_form::web::{WebPage, open_store};

    let Some(window) = web_sys::window() else {
        return;
    };
    let store = match open_store() {
        Ok(store) => store,
        Err(e) => {
            log::error!("Clear failed: {}", e);
            return;
        }
    };
    if let Err(e) = admin::clear_all_submissions(&store, &WebPage::new(window)) {
        log::error!("Clear failed: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Contact Form (native) starting...");
    log::info!("Native mode is headless - build for wasm32 to run in the browser");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [name, email, phone, message] = args.as_slice() else {
        eprintln!("usage: contact-form <name> <email> <phone> <message>");
        std::process::exit(2);
    };

    std::process::exit(headless::submit_once(name, email, phone, message));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::rc::Rc;

    use contact_form::clock::SystemClock;
    use contact_form::config::{CorruptPolicy, FormConfig};
    use contact_form::storage::MemoryStorage;
    use contact_form::timer::ManualScheduler;
    use contact_form::ui::Field;
    use contact_form::ui::headless::{HeadlessBanner, HeadlessForm};
    use contact_form::{Outcome, SubmissionController, SubmissionStore};

    /// Run one submission against in-memory storage; returns the exit code
    pub fn submit_once(name: &str, email: &str, phone: &str, message: &str) -> i32 {
        let mut config = FormConfig::default();
        if let Ok(policy) = std::env::var("CONTACT_FORM_ON_CORRUPT") {
            match CorruptPolicy::from_str(&policy) {
                Some(policy) => config.on_corrupt = policy,
                None => log::warn!("Unknown CONTACT_FORM_ON_CORRUPT value: {}", policy),
            }
        }

        let form = HeadlessForm::new();
        let banner = HeadlessBanner::new();
        let storage = MemoryStorage::new();
        let controller = SubmissionController::new(
            form.clone(),
            banner.clone(),
            SubmissionStore::new(storage, &config),
            Rc::new(ManualScheduler::new()),
            Box::new(SystemClock),
        );

        form.fill(name, email, phone, message);
        let outcome = controller.submit();
        println!("{}", banner.text());

        match outcome {
            Ok(Outcome::Accepted { .. }) => {
                match controller.store().load() {
                    Ok(stored) => match serde_json::to_string_pretty(&stored) {
                        Ok(json) => println!("{}", json),
                        Err(e) => log::error!("Could not encode submissions: {}", e),
                    },
                    Err(e) => log::error!("Could not read submissions: {}", e),
                }
                0
            }
            Ok(Outcome::Rejected(rejection)) => {
                if let Some(field) = rejection.field() {
                    let marked: Vec<&str> = form.marked_fields().iter().map(Field::id).collect();
                    log::info!("Highlighted {} (marked: {:?})", field.id(), marked);
                }
                1
            }
            Err(e) => {
                log::error!("{}", e);
                1
            }
        }
    }
}
