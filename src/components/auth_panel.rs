use dioxus::prelude::*;

use crate::components::icons::CreditCardIcon;
use crate::context::use_controller;
use crate::hooks::spawn_action;
use crate::view::AuthView;

const INPUT_CLASS: &str = "w-full px-4 py-3 bg-background border border-border rounded-xl focus:outline-none focus:ring-2 focus:ring-primary";

/// Email/password sign-in and sign-up
#[component]
pub fn AuthPanel(view: AuthView) -> Element {
    let controller = use_controller();
    let email = controller.clone();
    let password = controller.clone();
    let toggle = controller.clone();

    rsx! {
        div {
            class: "min-h-screen flex items-center justify-center p-4",
            div {
                class: "bg-card border border-border rounded-2xl max-w-sm w-full p-6 shadow-xl space-y-4",

                div {
                    class: "flex items-center gap-2",
                    CreditCardIcon { class: "w-6 h-6 text-primary".to_string() }
                    h1 { class: "text-xl font-bold", "{view.title}" }
                }

                input {
                    class: INPUT_CLASS,
                    r#type: "email",
                    placeholder: "Email",
                    autocomplete: "email",
                    value: "{view.email}",
                    oninput: move |e| email.set_auth_email(e.value()),
                }
                input {
                    class: INPUT_CLASS,
                    r#type: "password",
                    placeholder: "Password",
                    autocomplete: "current-password",
                    value: "{view.password}",
                    oninput: move |e| password.set_auth_password(e.value()),
                }

                if let Some(error) = view.error.as_ref() {
                    p { class: "text-sm text-destructive", "{error}" }
                }

                button {
                    class: "w-full px-4 py-3 bg-primary text-primary-foreground rounded-xl font-medium hover:bg-primary/90 transition disabled:opacity-50",
                    disabled: view.busy,
                    onclick: move |_| spawn_action(&controller, |c| async move { c.submit_auth().await }),
                    "{view.submit_label}"
                }

                if !view.busy {
                    button {
                        class: "w-full text-sm text-primary hover:underline",
                        onclick: move |_| toggle.toggle_auth_mode(),
                        "{view.toggle_label}"
                    }
                }
            }
        }
    }
}
