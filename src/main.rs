#![allow(non_snake_case)]

use dioxus::prelude::*;

// Modules
mod components;
mod config;
mod context;
mod hooks;
mod models;
mod routes;
mod services;
mod stores;
mod utils;
mod view;

fn main() {
    // Initialize panic hook for better error messages in browser console
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
    }

    log::info!("Starting cashback card client");

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // Builds the controller, restores the session and provides it as context
    hooks::use_app_controller();

    rsx! {
        Router::<routes::Route> {}
    }
}
