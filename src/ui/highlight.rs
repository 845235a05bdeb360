//! Error marker on form fields
//!
//! One field at a time carries the marker after a failed submit. Typing in
//! the email/phone fields re-checks them live.

use std::rc::Rc;

use super::{Field, Form};
use crate::consts::HIGHLIGHT_CLEAR_MS;
use crate::timer::{Scheduler, TimerSlot};
use crate::validate::{is_valid_email, is_valid_indian_phone, strip_phone_separators};

pub struct FieldHighlighter<F> {
    form: F,
    auto_clear: TimerSlot<Field>,
}

impl<F: Form + Clone + 'static> FieldHighlighter<F> {
    pub fn new(form: F, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            form,
            auto_clear: TimerSlot::new(scheduler),
        }
    }

    /// Mark `field` as the one in error, focus it, unmark after 3 s
    pub fn highlight(&self, field: Field) {
        for f in Field::ALL {
            self.form.set_marked(f, false);
        }

        // focus() fires the focus handler synchronously, which unmarks
        self.form.focus(field);
        self.form.set_marked(field, true);

        let form = self.form.clone();
        self.auto_clear.replace(
            field,
            HIGHLIGHT_CLEAR_MS,
            Box::new(move || form.set_marked(field, false)),
        );
    }

    /// Live check on each keystroke (email and phone only)
    pub fn on_input(&self, field: Field) {
        let value = self.form.value(field);
        let invalid = match field {
            Field::Email => {
                let email = value.trim();
                !email.is_empty() && !is_valid_email(email)
            }
            Field::Phone => {
                !strip_phone_separators(&value).is_empty() && !is_valid_indian_phone(&value)
            }
            Field::Name | Field::Message => return,
        };

        // Live state owns the marker now
        self.auto_clear.cancel_if(field);
        self.form.set_marked(field, invalid);
    }

    /// Focusing a field clears its marker
    pub fn on_focus(&self, field: Field) {
        self.auto_clear.cancel_if(field);
        self.form.set_marked(field, false);
    }

    /// Clear every marker and any pending auto-clear
    pub fn clear(&self) {
        self.auto_clear.cancel();
        for f in Field::ALL {
            self.form.set_marked(f, false);
        }
    }
}
