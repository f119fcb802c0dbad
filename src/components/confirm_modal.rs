use dioxus::prelude::*;

use crate::context::use_controller;
use crate::hooks::spawn_action;

/// Asks before a card is deleted; clicking outside cancels
#[component]
pub fn ConfirmDeleteModal(card_name: String) -> Element {
    let controller = use_controller();
    let backdrop = controller.clone();
    let cancel = controller.clone();

    rsx! {
        div {
            class: "fixed inset-0 bg-black/50 z-50 flex items-center justify-center p-4",
            onclick: move |_| backdrop.cancel_delete(),

            div {
                class: "bg-card border border-border rounded-xl max-w-sm w-full p-6 shadow-xl",
                role: "dialog",
                aria_modal: "true",
                aria_labelledby: "delete-title",
                onclick: move |e| e.stop_propagation(),

                h2 {
                    class: "text-lg font-bold mb-2",
                    id: "delete-title",
                    "Delete this card?"
                }
                if !card_name.is_empty() {
                    p {
                        class: "text-muted-foreground mb-6",
                        "{card_name} will be removed from your wallet."
                    }
                }

                div {
                    class: "flex gap-3 justify-end",
                    button {
                        class: "px-4 py-2 rounded-lg hover:bg-accent transition",
                        onclick: move |_| cancel.cancel_delete(),
                        "Cancel"
                    }
                    button {
                        class: "px-4 py-2 bg-destructive text-destructive-foreground rounded-lg hover:bg-destructive/90 transition",
                        onclick: move |_| spawn_action(&controller, |c| async move { c.confirm_delete().await }),
                        "Delete"
                    }
                }
            }
        }
    }
}
