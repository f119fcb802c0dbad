use dioxus::prelude::*;

use crate::components::icons::MapPinIcon;
use crate::context::use_controller;
use crate::hooks::spawn_action;

#[component]
pub fn LocationModal() -> Element {
    let controller = use_controller();
    let backdrop = controller.clone();
    let decline = controller.clone();

    rsx! {
        div {
            class: "fixed inset-0 bg-black/50 z-50 flex items-center justify-center p-4",
            onclick: move |_| backdrop.decline_location(),

            div {
                class: "bg-card border border-border rounded-xl max-w-sm w-full p-6 shadow-xl text-center",
                role: "dialog",
                aria_modal: "true",
                onclick: move |e| e.stop_propagation(),

                div {
                    class: "mx-auto mb-4 flex h-12 w-12 items-center justify-center rounded-full bg-primary/10 text-primary",
                    MapPinIcon { class: "w-6 h-6".to_string() }
                }
                h2 { class: "text-lg font-bold mb-2", "Enable Location" }
                p {
                    class: "text-muted-foreground mb-6",
                    "Allow location access to get card recommendations when you are near stores with bonus cashback."
                }

                div {
                    class: "flex flex-col gap-2",
                    button {
                        class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition",
                        onclick: move |_| spawn_action(&controller, |c| async move { c.enable_location().await }),
                        "Allow Location"
                    }
                    button {
                        class: "px-4 py-2 rounded-lg hover:bg-accent transition",
                        onclick: move |_| decline.decline_location(),
                        "Not Now"
                    }
                }
            }
        }
    }
}
