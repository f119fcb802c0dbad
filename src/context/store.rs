use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::stores::AppState;

/// Where the controller keeps `AppState`
///
/// The app uses a `Signal` so writes re-render; tests use a plain
/// `Rc<RefCell<_>>`. Closures must not await or re-enter the store.
pub trait StateStore: Clone + 'static {
    fn with<R>(&self, f: impl FnOnce(&AppState) -> R) -> R;

    fn update<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R;
}

impl StateStore for Signal<AppState> {
    fn with<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&*self.read())
    }

    fn update<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let mut signal = *self;
        let mut state = signal.write();
        f(&mut *state)
    }
}

impl StateStore for Rc<RefCell<AppState>> {
    fn with<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.borrow())
    }

    fn update<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}
