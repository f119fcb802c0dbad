use dioxus::prelude::*;

use crate::components::icons::{CreditCardIcon, EditIcon, TrashIcon};
use crate::context::use_controller;
use crate::view::{CardView, CardsView};

/// Background gradient for a card colour theme
fn theme_class(color: &str) -> &'static str {
    match color {
        "purple" => "from-purple-600 to-purple-900",
        "green" => "from-emerald-500 to-emerald-800",
        "red" => "from-red-500 to-red-800",
        "black" => "from-zinc-700 to-black",
        "gold" => "from-amber-400 to-amber-700",
        _ => "from-blue-500 to-blue-800",
    }
}

#[component]
pub fn CardStack(cards: CardsView) -> Element {
    match cards {
        CardsView::Loading => rsx! {
            div {
                class: "flex items-center justify-center py-16 text-muted-foreground",
                "Loading cards..."
            }
        },
        CardsView::Empty => rsx! {
            div {
                class: "flex flex-col items-center justify-center gap-3 py-16 text-center text-muted-foreground",
                CreditCardIcon { class: "w-12 h-12".to_string() }
                h2 { class: "text-lg font-semibold text-foreground", "No cards yet" }
                p { "Add your first card to start earning the best cashback nearby." }
            }
        },
        CardsView::Stack { min_height_px, cards } => rsx! {
            div {
                class: "relative",
                style: "min-height: {min_height_px}px;",
                for card in cards {
                    StackedCard { key: "{card.id}", card: card }
                }
            }
        },
    }
}

#[component]
fn StackedCard(card: CardView) -> Element {
    let controller = use_controller();
    let edit_id = card.id.clone();
    let delete_id = card.id.clone();
    let edit = controller.clone();
    let theme = theme_class(&card.color);

    rsx! {
        div {
            class: "absolute inset-x-0 h-[200px] rounded-2xl p-5 text-white shadow-xl bg-gradient-to-br {theme} transition-transform hover:-translate-y-2",
            style: "top: {card.offset_px}px;",

            div {
                class: "flex items-start justify-between",
                div { class: "text-lg font-semibold", "{card.name}" }
                div { class: "text-sm uppercase tracking-wider opacity-80", "{card.network}" }
            }

            div {
                class: "mt-4",
                div { class: "text-3xl font-bold", "{card.base_rate}" }
                div { class: "text-xs uppercase opacity-80", "Base Cashback" }

                if !card.bonuses.is_empty() {
                    div {
                        class: "mt-3 flex flex-wrap gap-2",
                        for bonus in card.bonuses.iter() {
                            span {
                                class: "rounded-full bg-white/20 px-2 py-0.5 text-xs",
                                "{bonus}"
                            }
                        }
                    }
                }
            }

            div {
                class: "absolute right-4 bottom-4 flex gap-2",
                button {
                    class: "rounded-full bg-white/20 p-2 hover:bg-white/30 transition",
                    title: "Edit",
                    onclick: move |e| {
                        e.stop_propagation();
                        edit.open_edit_form(&edit_id);
                    },
                    EditIcon { class: "w-4 h-4".to_string() }
                }
                button {
                    class: "rounded-full bg-white/20 p-2 hover:bg-white/30 transition",
                    title: "Delete",
                    onclick: move |e| {
                        e.stop_propagation();
                        controller.request_delete(&delete_id);
                    },
                    TrashIcon { class: "w-4 h-4".to_string() }
                }
            }
        }
    }
}
