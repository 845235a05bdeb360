//! Transient message banner

use std::rc::Rc;

use super::{Banner, Severity};
use crate::timer::{Scheduler, TimerSlot};

pub struct MessagePresenter<B> {
    banner: B,
    auto_hide: TimerSlot,
}

impl<B: Banner + Clone + 'static> MessagePresenter<B> {
    pub fn new(banner: B, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            banner,
            auto_hide: TimerSlot::new(scheduler),
        }
    }

    /// Show `text` and hide it again after the severity's delay.
    ///
    /// A newer message cancels the older one's pending hide.
    pub fn present(&self, text: &str, severity: Severity) {
        self.banner.show(text, severity);

        let banner = self.banner.clone();
        self.auto_hide
            .replace((), severity.hide_after_ms(), Box::new(move || banner.hide()));
    }

    /// Hide immediately
    pub fn dismiss(&self) {
        self.auto_hide.cancel();
        self.banner.hide();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualScheduler;
    use crate::ui::headless::HeadlessBanner;

    fn setup() -> (HeadlessBanner, ManualScheduler, MessagePresenter<HeadlessBanner>) {
        let banner = HeadlessBanner::new();
        let scheduler = ManualScheduler::new();
        let presenter = MessagePresenter::new(banner.clone(), Rc::new(scheduler.clone()));
        (banner, scheduler, presenter)
    }

    #[test]
    fn test_success_hides_after_five_seconds() {
        let (banner, scheduler, presenter) = setup();
        presenter.present("Thanks", Severity::Success);
        assert!(banner.is_visible());
        assert_eq!(banner.text(), "Thanks");
        assert_eq!(banner.severity(), Some(Severity::Success));
        scheduler.advance(4999);
        assert!(banner.is_visible());
        scheduler.advance(1);
        assert!(!banner.is_visible());
    }

    #[test]
    fn test_error_hides_after_eight_seconds() {
        let (banner, scheduler, presenter) = setup();
        presenter.present("Nope", Severity::Error);
        scheduler.advance(5000);
        assert!(banner.is_visible());
        scheduler.advance(3000);
        assert!(!banner.is_visible());
    }

    #[test]
    fn test_newer_message_is_not_hidden_by_older_timer() {
        let (banner, scheduler, presenter) = setup();
        presenter.present("first", Severity::Success);
        scheduler.advance(4000);
        presenter.present("second", Severity::Error);
        // First message's hide was due at 5000
        scheduler.advance(2000);
        assert!(banner.is_visible());
        assert_eq!(banner.text(), "second");
        scheduler.advance(6000);
        assert!(!banner.is_visible());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_dismiss() {
        let (banner, scheduler, presenter) = setup();
        presenter.present("x", Severity::Warning);
        presenter.dismiss();
        assert!(!banner.is_visible());
        assert_eq!(scheduler.pending(), 0);
    }
}
