//! use_app_controller hook - builds the page controller once per app
//!
//! - Wires the HTTP backend and browser geolocation into a `CardController`
//! - Runs the position-fix loop for the lifetime of the root component
//! - Restores a stored session on first render
//! - Schedules the controller's follow-ups on browser timers
//! - Clears the location watch when the root unmounts

use dioxus::prelude::*;
use instant::Instant;
use std::future::Future;
use std::time::Duration;

use crate::config::AppConfig;
use crate::context::{AppController, CardController, FixReceiver, Followup};
use crate::services::{BrowserGeolocation, HttpBackend};
use crate::stores::{auth_store, AppState};

/// Build the controller and provide it to every descendant
pub fn use_app_controller() -> AppController {
    let state = use_signal(AppState::default);

    let controller = use_hook(move || {
        let config = AppConfig::from_env();
        log::info!("Using API at {}", config.api_base);

        let backend = HttpBackend::new(config.api_base.clone());
        let (controller, fixes) = CardController::new(backend, BrowserGeolocation, state, config);

        spawn(track_fixes(controller.clone(), fixes));

        if let Some(session) = auth_store::load_session() {
            spawn_action(&controller, move |c| async move { c.restore_session(session).await });
        }

        controller
    });

    use_drop({
        let controller = controller.clone();
        move || controller.teardown()
    });

    use_context_provider(|| controller.clone())
}

/// Evaluate position fixes one at a time
///
/// Fixes that arrive while a check is in flight collapse into the newest one.
async fn track_fixes(controller: AppController, mut fixes: FixReceiver) {
    while fixes.changed().await.is_ok() {
        let latest = *fixes.borrow_and_update();
        let Some(location) = latest else {
            continue;
        };
        let followups = controller.check_location(location, Instant::now()).await;
        schedule_followups(&controller, followups);
    }
}

/// Run a controller operation in the background and schedule what it asks for
pub fn spawn_action<F, Fut>(controller: &AppController, action: F)
where
    F: FnOnce(AppController) -> Fut + 'static,
    Fut: Future<Output = Vec<Followup>> + 'static,
{
    let controller = controller.clone();
    spawn(async move {
        let followups = action(controller.clone()).await;
        schedule_followups(&controller, followups);
    });
}

fn schedule_followups(controller: &AppController, followups: Vec<Followup>) {
    for followup in followups {
        let controller = controller.clone();
        spawn(async move {
            match followup {
                Followup::PromptLocation { after } => {
                    sleep(after).await;
                    controller.show_location_prompt();
                }
                Followup::DismissPopup { token, after } => {
                    sleep(after).await;
                    controller.dismiss_popup(token);
                }
            }
        });
    }
}

async fn sleep(duration: Duration) {
    let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
    gloo_timers::future::TimeoutFuture::new(millis).await;
}
