//! What the page shows, derived from `AppState`
//!
//! `render` is pure: components draw a `PageView` and never look at the
//! state directly.

use crate::config::StackGeometry;
use crate::models::{Card, CardId, Recommendation};
use crate::stores::{AppState, AuthForm, AuthMode, CardForm, Modal, Popup};
use crate::utils::format::*;

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    /// Sign-in panel, shown instead of the wallet while signed out
    pub auth: Option<AuthView>,
    pub user_email: Option<String>,
    pub cards: CardsView,
    pub modal: Option<ModalView>,
    pub alert: Option<String>,
    pub popup: Option<PopupView>,
    pub tracking: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardsView {
    /// No load has been applied yet
    Loading,
    Empty,
    Stack { min_height_px: u32, cards: Vec<CardView> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: CardId,
    pub name: String,
    pub network: String,
    /// Colour theme class
    pub color: String,
    pub base_rate: String,
    /// Badges such as "Dining 3%"
    pub bonuses: Vec<String>,
    /// Vertical offset within the stack
    pub offset_px: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalView {
    CardForm(CardFormView),
    LocationPrompt,
    ConfirmDelete { card_name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardFormView {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub form: CardForm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    pub token: u64,
    pub location: String,
    /// "N bonus location(s)"
    pub nearby_count: String,
    pub nearby: String,
    pub card_name: String,
    pub rate: String,
    pub merchant_category: String,
    pub merchant_name: String,
    pub closest: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthView {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub toggle_label: &'static str,
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub busy: bool,
}

/// Minimum stack height for `count` cards; `None` when there is nothing to stack
pub fn stack_height(count: usize, geometry: &StackGeometry) -> Option<u32> {
    if count == 0 {
        return None;
    }
    let layers = (count - 1).min(geometry.max_extra_layers) as u32;
    Some(geometry.card_height + layers * geometry.peek_height + geometry.padding)
}

pub fn render(state: &AppState, geometry: &StackGeometry) -> PageView {
    let Some(session) = state.session.as_ref() else {
        return PageView {
            auth: Some(auth_view(&state.auth_form)),
            user_email: None,
            cards: CardsView::Loading,
            modal: None,
            alert: state.alert.clone(),
            popup: None,
            tracking: false,
        };
    };

    PageView {
        auth: None,
        user_email: Some(session.user.email.clone()),
        cards: cards_view(state, geometry),
        modal: state.modal.as_ref().map(|modal| modal_view(state, modal)),
        alert: state.alert.clone(),
        popup: state.popup.as_ref().and_then(popup_view),
        tracking: state.is_tracking(),
    }
}

fn cards_view(state: &AppState, geometry: &StackGeometry) -> CardsView {
    if !state.loaded {
        return CardsView::Loading;
    }
    match stack_height(state.cards.len(), geometry) {
        None => CardsView::Empty,
        Some(min_height_px) => CardsView::Stack {
            min_height_px,
            cards: state
                .cards
                .iter()
                .enumerate()
                .map(|(index, card)| {
                    let layer = index.min(geometry.max_extra_layers) as u32;
                    card_view(card, layer * geometry.peek_height)
                })
                .collect(),
        },
    }
}

fn card_view(card: &Card, offset_px: u32) -> CardView {
    CardView {
        id: card.id.clone(),
        name: card.name.clone(),
        network: card.network.clone(),
        color: card.color.clone(),
        base_rate: format_rate(card.base_rate),
        bonuses: card
            .category_bonuses
            .iter()
            .map(|b| format!("{} {}", format_category(b.category.as_str()), format_rate(b.rate)))
            .collect(),
        offset_px,
    }
}

fn modal_view(state: &AppState, modal: &Modal) -> ModalView {
    match modal {
        Modal::CardForm(form) => ModalView::CardForm(CardFormView {
            title: if state.editing_id().is_some() { "Edit Card" } else { "Add Card" },
            submit_label: if form.saving { "Saving..." } else { "Save Card" },
            form: form.clone(),
        }),
        Modal::LocationPrompt => ModalView::LocationPrompt,
        Modal::ConfirmDelete(id) => ModalView::ConfirmDelete {
            card_name: state
                .find_card(id)
                .map(|card| card.name.clone())
                .unwrap_or_default(),
        },
    }
}

fn popup_view(popup: &Popup) -> Option<PopupView> {
    let Recommendation {
        card,
        merchant,
        rate,
        location,
        all_nearby,
    } = &popup.recommendation;
    let card = card.as_ref()?;

    Some(PopupView {
        token: popup.token,
        location: format!("Your current location: {}", format_coords(location.lat, location.lng)),
        nearby_count: format_location_count(all_nearby.len()),
        nearby: format_nearby(all_nearby),
        card_name: card.name.clone(),
        rate: format!("{} cashback", format_rate(*rate)),
        merchant_category: merchant.category.clone(),
        merchant_name: merchant.name.clone(),
        closest: format!("Closest bonus location: {} miles away", format_miles(merchant.distance)),
    })
}

fn auth_view(form: &AuthForm) -> AuthView {
    let (submit_label, toggle_label) = match (form.mode, form.busy) {
        (_, true) => ("Please wait...", ""),
        (AuthMode::SignIn, false) => ("Sign in", "Need an account? Sign up"),
        (AuthMode::SignUp, false) => ("Sign up", "Have an account? Sign in"),
    };
    AuthView {
        title: form.mode.title(),
        submit_label,
        toggle_label,
        email: form.email.clone(),
        password: form.password.clone(),
        error: form.error.clone(),
        busy: form.busy,
    }
}
