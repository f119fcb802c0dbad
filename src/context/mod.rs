/// Application Context
///
/// The page has one controller, provided at the root and read by every
/// component through `use_controller`. Components never mutate `AppState`
/// directly; they call controller operations and render the state signal.

pub mod controller;
pub mod store;

use dioxus::prelude::*;

use crate::services::{BrowserGeolocation, HttpBackend};
use crate::stores::AppState;

pub use controller::{CardController, FixReceiver, Followup};

/// The controller wired to the real backend and browser
pub type AppController = CardController<HttpBackend, BrowserGeolocation, Signal<AppState>>;

/// Fetch the controller provided by the root component
pub fn use_controller() -> AppController {
    use_context::<AppController>()
}
