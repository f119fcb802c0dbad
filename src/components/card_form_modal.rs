use dioxus::prelude::*;

use crate::components::icons::{CloseIcon, PlusIcon};
use crate::context::use_controller;
use crate::hooks::spawn_action;
use crate::models::Category;
use crate::stores::card_form::{COLORS, NETWORKS};
use crate::stores::BonusRow;
use crate::view::CardFormView;

const INPUT_CLASS: &str = "w-full px-4 py-3 bg-background border border-border rounded-xl focus:outline-none focus:ring-2 focus:ring-primary";

/// Add/edit card modal
#[component]
pub fn CardFormModal(view: CardFormView) -> Element {
    let controller = use_controller();
    let form = view.form;
    let saving = form.saving;

    let close = controller.clone();
    let backdrop = controller.clone();
    let cancel = controller.clone();
    let name = controller.clone();
    let network = controller.clone();
    let color = controller.clone();
    let base_rate = controller.clone();
    let add_row = controller.clone();

    rsx! {
        div {
            class: "fixed inset-0 bg-black/50 z-50 flex items-center justify-center p-4",
            onclick: move |_| backdrop.close_modals(),

            div {
                class: "bg-card border border-border rounded-xl max-w-md w-full max-h-[90vh] overflow-y-auto shadow-xl",
                role: "dialog",
                aria_modal: "true",
                onclick: move |e| e.stop_propagation(),

                div {
                    class: "flex items-center justify-between p-5 border-b border-border",
                    h2 { class: "text-lg font-bold", "{view.title}" }
                    button {
                        class: "p-1 rounded-lg hover:bg-accent transition",
                        onclick: move |_| close.close_modals(),
                        CloseIcon {}
                    }
                }

                div {
                    class: "p-5 space-y-4",

                    label {
                        class: "block space-y-1",
                        span { class: "text-sm font-medium", "Card Name" }
                        input {
                            class: INPUT_CLASS,
                            r#type: "text",
                            placeholder: "e.g. Everyday Rewards",
                            value: "{form.name}",
                            oninput: move |e| name.edit_form(|f| f.name = e.value()),
                        }
                    }

                    div {
                        class: "grid grid-cols-2 gap-3",
                        label {
                            class: "block space-y-1",
                            span { class: "text-sm font-medium", "Network" }
                            select {
                                class: INPUT_CLASS,
                                onchange: move |e| network.edit_form(|f| f.network = e.value()),
                                for (value, label) in NETWORKS {
                                    option {
                                        value: value,
                                        selected: form.network == value,
                                        "{label}"
                                    }
                                }
                            }
                        }
                        label {
                            class: "block space-y-1",
                            span { class: "text-sm font-medium", "Color" }
                            select {
                                class: INPUT_CLASS,
                                onchange: move |e| color.edit_form(|f| f.color = e.value()),
                                for (value, label) in COLORS {
                                    option {
                                        value: value,
                                        selected: form.color == value,
                                        "{label}"
                                    }
                                }
                            }
                        }
                    }

                    label {
                        class: "block space-y-1",
                        span { class: "text-sm font-medium", "Base Cashback Rate (%)" }
                        input {
                            class: INPUT_CLASS,
                            r#type: "number",
                            step: "0.01",
                            placeholder: "1.5",
                            value: "{form.base_rate}",
                            oninput: move |e| base_rate.edit_form(|f| f.base_rate = e.value()),
                        }
                    }

                    div {
                        class: "space-y-2",
                        div {
                            class: "flex items-center justify-between",
                            span { class: "text-sm font-medium", "Category Bonuses" }
                            button {
                                class: "flex items-center gap-1 text-sm text-primary hover:underline",
                                onclick: move |_| add_row.edit_form(|f| {
                                    f.add_bonus_row();
                                }),
                                PlusIcon { class: "w-4 h-4".to_string() }
                                "Add Bonus"
                            }
                        }
                        for row in form.bonuses.iter().cloned() {
                            BonusRowEditor { key: "{row.key}", row: row }
                        }
                    }

                    if let Some(error) = form.error.as_ref() {
                        p { class: "text-sm text-destructive", "{error}" }
                    }
                }

                div {
                    class: "flex gap-3 justify-end p-5 border-t border-border",
                    button {
                        class: "px-4 py-2 rounded-lg hover:bg-accent transition",
                        onclick: move |_| cancel.close_modals(),
                        "Cancel"
                    }
                    button {
                        class: "px-4 py-2 bg-primary text-primary-foreground rounded-lg hover:bg-primary/90 transition disabled:opacity-50",
                        disabled: saving,
                        onclick: move |_| spawn_action(&controller, |c| async move { c.submit_form().await }),
                        "{view.submit_label}"
                    }
                }
            }
        }
    }
}

#[component]
fn BonusRowEditor(row: BonusRow) -> Element {
    let controller = use_controller();
    let key = row.key;
    let category = controller.clone();
    let rate = controller.clone();
    let unlisted = Category::from_wire(&row.category);
    let unlisted = (!row.category.is_empty() && !unlisted.is_known()).then_some(unlisted);

    rsx! {
        div {
            class: "grid grid-cols-[1fr_6rem_auto] gap-2 items-center",
            select {
                class: INPUT_CLASS,
                onchange: move |e| category.edit_form(|f| f.set_bonus_category(key, e.value())),
                option { value: "", selected: row.category.is_empty(), "Select Category" }
                for option_category in Category::ALL {
                    option {
                        value: option_category.as_str(),
                        selected: row.category == option_category.as_str(),
                        {option_category.label()}
                    }
                }
                if let Some(other) = unlisted {
                    option { value: other.as_str(), selected: true, {other.label()} }
                }
            }
            input {
                class: INPUT_CLASS,
                r#type: "number",
                step: "0.01",
                placeholder: "Rate %",
                value: "{row.rate}",
                oninput: move |e| rate.edit_form(|f| f.set_bonus_rate(key, e.value())),
            }
            button {
                class: "p-2 rounded-lg hover:bg-accent transition",
                onclick: move |_| controller.edit_form(|f| f.remove_bonus_row(key)),
                CloseIcon { class: "w-4 h-4".to_string() }
            }
        }
    }
}
