use dioxus::prelude::*;

pub mod wallet;

use wallet::Wallet;

use crate::components::{AlertModal, AuthPanel, LogOutIcon, RecommendationPopup};
use crate::context::use_controller;

/// App routes
#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/")]
        Wallet {},
    #[end_layout]

    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

#[component]
fn Layout() -> Element {
    let controller = use_controller();
    let page = controller.view();

    let Some(email) = page.user_email else {
        return rsx! {
            div {
                class: "min-h-screen bg-background",
                if let Some(auth) = page.auth {
                    AuthPanel { view: auth }
                }
                if let Some(message) = page.alert {
                    AlertModal { message: message }
                }
            }
        };
    };

    rsx! {
        div {
            class: "min-h-screen bg-background transition-colors",

            header {
                class: "sticky top-0 z-30 bg-background/80 backdrop-blur border-b border-border",
                div {
                    class: "max-w-xl mx-auto flex items-center justify-between px-4 py-3",
                    div {
                        class: "flex items-center gap-2",
                        div {
                            class: "w-9 h-9 bg-blue-500 rounded-full flex items-center justify-center text-white font-bold",
                            "$"
                        }
                        span { class: "font-bold text-lg", "Cashback" }
                    }
                    div {
                        class: "flex items-center gap-3 text-sm text-muted-foreground",
                        span { class: "hidden sm:inline", "{email}" }
                        button {
                            class: "p-2 rounded-full hover:bg-accent transition",
                            title: "Sign out",
                            onclick: move |_| {
                                let controller = controller.clone();
                                spawn(async move { controller.sign_out().await });
                            },
                            LogOutIcon {}
                        }
                    }
                }
            }

            main {
                class: "max-w-xl mx-auto px-4 py-6",
                Outlet::<Route> {}
            }

            if let Some(popup) = page.popup {
                RecommendationPopup { key: "{popup.token}", popup: popup }
            }
            if let Some(message) = page.alert {
                AlertModal { message: message }
            }
        }
    }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");

    rsx! {
        div {
            class: "min-h-screen flex flex-col items-center justify-center gap-4 text-center p-4",
            h1 { class: "text-2xl font-bold", "Page not found" }
            p { class: "text-muted-foreground", "Nothing lives at /{path}." }
            Link {
                to: Route::Wallet {},
                class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition",
                "Back to your cards"
            }
        }
    }
}
