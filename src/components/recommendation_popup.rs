use dioxus::prelude::*;

use crate::components::icons::{CloseIcon, MapPinIcon};
use crate::context::use_controller;
use crate::view::PopupView;

/// Bottom sheet showing the best card for where the user is
#[component]
pub fn RecommendationPopup(popup: PopupView) -> Element {
    let controller = use_controller();

    rsx! {
        div {
            class: "fixed inset-x-0 bottom-0 z-40 p-4 flex justify-center pointer-events-none",
            div {
                class: "pointer-events-auto bg-card border border-border rounded-2xl max-w-md w-full p-5 shadow-2xl",
                role: "status",

                div {
                    class: "flex items-center justify-between mb-3",
                    h3 { class: "font-bold", "Card Recommendation" }
                    button {
                        class: "p-1 rounded-lg hover:bg-accent transition",
                        onclick: move |_| controller.close_popup(),
                        CloseIcon { class: "w-4 h-4".to_string() }
                    }
                }

                div {
                    class: "bg-background rounded-xl p-4 mb-4",
                    div {
                        class: "flex items-center gap-2 text-sm text-muted-foreground mb-3",
                        MapPinIcon { class: "w-4 h-4".to_string() }
                        span { "{popup.location}" }
                    }
                    p {
                        class: "text-sm text-muted-foreground leading-relaxed",
                        "You are near "
                        strong { class: "text-foreground", "{popup.nearby_count}" }
                        ": {popup.nearby}"
                    }
                }

                div {
                    class: "rounded-xl border border-primary/30 p-4",
                    div {
                        class: "text-xs uppercase tracking-wide text-muted-foreground mb-2 font-medium",
                        "Recommended Card"
                    }
                    div { class: "text-xl font-bold", "{popup.card_name}" }
                    div { class: "text-2xl font-bold text-primary", "{popup.rate}" }
                    div {
                        class: "flex items-center gap-2 mt-3 text-sm",
                        span { class: "text-muted-foreground", "Best for" }
                        span { class: "rounded-full bg-primary/10 text-primary px-2 py-0.5", "{popup.merchant_category}" }
                        span { class: "text-muted-foreground", "at {popup.merchant_name}" }
                    }
                    p { class: "mt-3 text-xs text-muted-foreground", "{popup.closest}" }
                }
            }
        }
    }
}
