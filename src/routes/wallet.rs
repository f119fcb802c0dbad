use dioxus::prelude::*;

use crate::components::{
    CardFormModal, CardStack, ConfirmDeleteModal, LocationModal, MapPinIcon, PlusIcon,
};
use crate::context::use_controller;
use crate::view::ModalView;

/// The card stack with its modals
#[component]
pub fn Wallet() -> Element {
    let controller = use_controller();
    let page = controller.view();
    let add = controller.clone();

    rsx! {
        div {
            class: "space-y-6",

            div {
                class: "flex items-center justify-between",
                div {
                    h1 { class: "text-2xl font-bold", "My Cards" }
                    if page.tracking {
                        div {
                            class: "flex items-center gap-1 text-xs text-muted-foreground mt-1",
                            MapPinIcon { class: "w-3 h-3".to_string() }
                            "Watching for nearby bonuses"
                        }
                    }
                }
                button {
                    class: "flex items-center gap-2 px-4 py-2 bg-primary text-primary-foreground rounded-full hover:bg-primary/90 transition",
                    onclick: move |_| add.open_create_form(),
                    PlusIcon { class: "w-4 h-4".to_string() }
                    "Add Card"
                }
            }

            CardStack { cards: page.cards }

            match page.modal {
                Some(ModalView::CardForm(view)) => rsx! { CardFormModal { view: view } },
                Some(ModalView::LocationPrompt) => rsx! { LocationModal {} },
                Some(ModalView::ConfirmDelete { card_name, .. }) => rsx! { ConfirmDeleteModal { card_name: card_name } },
                None => rsx! {},
            }
        }
    }
}
