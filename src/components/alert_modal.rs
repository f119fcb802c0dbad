use dioxus::prelude::*;

use crate::context::use_controller;

/// Blocking message the user has to acknowledge
#[component]
pub fn AlertModal(message: String) -> Element {
    let controller = use_controller();

    rsx! {
        div {
            class: "fixed inset-0 bg-black/50 z-[60] flex items-center justify-center p-4",
            div {
                class: "bg-card border border-border rounded-xl max-w-sm w-full p-6 shadow-xl",
                role: "alertdialog",
                aria_modal: "true",
                p { class: "mb-6", "{message}" }
                div {
                    class: "flex justify-end",
                    button {
                        class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition",
                        onclick: move |_| controller.dismiss_alert(),
                        "OK"
                    }
                }
            }
        }
    }
}
