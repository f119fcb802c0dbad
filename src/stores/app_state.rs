use instant::Instant;
use std::time::Duration;

use super::auth_store::AuthForm;
use super::card_form::CardForm;
use crate::models::{Card, CardId, CardsResponse, Recommendation, Session};

/// Blocking alert text for a failed save
pub const SAVE_FAILED: &str = "Failed to save card. Please try again.";
/// Blocking alert text for a failed delete
pub const DELETE_FAILED: &str = "Failed to delete card. Please try again.";

/// Location feature lifecycle
///
/// `Tracking` is terminal for the page lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationPhase {
    #[default]
    Unprompted,
    Tracking,
}

/// The modal currently covering the page
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    CardForm(CardForm),
    LocationPrompt,
    ConfirmDelete(CardId),
}

/// A recommendation on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub token: u64,
    pub recommendation: Recommendation,
}

/// Identifies one reload request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What a fresh card list asks the controller to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOutcome {
    /// Show the enable-location prompt after the usual delay
    pub prompt_location: bool,
    /// The backend remembers a grant; start watching without prompting
    pub resume_tracking: bool,
}

/// Everything the page knows
///
/// The card list is a read-through cache of the backend: it is replaced
/// wholesale on every accepted reload and never patched locally.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub session: Option<Session>,
    pub auth_form: AuthForm,
    pub cards: Vec<Card>,
    pub location_enabled: bool,
    /// At least one reload has been applied
    pub loaded: bool,
    pub modal: Option<Modal>,
    pub alert: Option<String>,
    pub location: LocationPhase,
    /// The enable prompt was already offered (or refused) this session
    pub location_prompted: bool,
    pub last_shown: Option<Instant>,
    pub popup: Option<Popup>,
    latest_ticket: u64,
    next_popup_token: u64,
}

impl AppState {
    // ========================================================================
    // Session
    // ========================================================================

    pub fn sign_in(&mut self, session: Session) {
        self.session = Some(session);
        self.auth_form = AuthForm::default();
    }

    /// Drop the session, its location grant and everything loaded under it
    ///
    /// Reloads still in flight are invalidated so they cannot repopulate
    /// the cache.
    pub fn sign_out(&mut self) {
        let latest_ticket = self.latest_ticket + 1;
        let next_popup_token = self.next_popup_token;
        *self = AppState {
            latest_ticket,
            next_popup_token,
            ..AppState::default()
        };
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    // ========================================================================
    // Card list
    // ========================================================================

    /// Issue a ticket for a new reload; any older ticket becomes stale
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        LoadTicket(self.latest_ticket)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest_ticket
    }

    /// Replace the cache with a reload result
    ///
    /// Returns `None` and leaves the state untouched when a newer reload was
    /// issued after `ticket`.
    pub fn apply_load(&mut self, ticket: LoadTicket, response: CardsResponse) -> Option<LoadOutcome> {
        if !self.is_current(ticket) {
            return None;
        }

        self.cards = response.cards;
        self.location_enabled = response.location_enabled;
        self.loaded = true;

        let untracked = self.location == LocationPhase::Unprompted;
        let prompt_location = untracked
            && !self.cards.is_empty()
            && !self.location_enabled
            && !self.location_prompted;
        if prompt_location {
            self.location_prompted = true;
        }

        Some(LoadOutcome {
            prompt_location,
            resume_tracking: untracked && self.location_enabled,
        })
    }

    pub fn find_card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|card| &card.id == id)
    }

    // ========================================================================
    // Modals
    // ========================================================================

    pub fn open_create_form(&mut self) {
        self.modal = Some(Modal::CardForm(CardForm::blank()));
    }

    /// Open the form pre-populated from the cache; unknown ids are ignored
    pub fn open_edit_form(&mut self, id: &CardId) -> bool {
        match self.find_card(id).map(CardForm::for_card) {
            Some(form) => {
                self.modal = Some(Modal::CardForm(form));
                true
            }
            None => false,
        }
    }

    pub fn card_form(&self) -> Option<&CardForm> {
        match &self.modal {
            Some(Modal::CardForm(form)) => Some(form),
            _ => None,
        }
    }

    pub fn card_form_mut(&mut self) -> Option<&mut CardForm> {
        match &mut self.modal {
            Some(Modal::CardForm(form)) => Some(form),
            _ => None,
        }
    }

    /// Id bound to the open edit form
    pub fn editing_id(&self) -> Option<&CardId> {
        self.card_form().and_then(|form| form.editing.as_ref())
    }

    /// Closing any modal also ends an edit in progress
    pub fn close_modals(&mut self) {
        self.modal = None;
    }

    /// Ask for confirmation before deleting a cached card
    pub fn request_delete(&mut self, id: &CardId) -> bool {
        if self.find_card(id).is_none() {
            return false;
        }
        self.modal = Some(Modal::ConfirmDelete(id.clone()));
        true
    }

    /// Consume the confirmation modal, yielding the id it was shown for
    pub fn take_confirmed_delete(&mut self) -> Option<CardId> {
        match self.modal.take() {
            Some(Modal::ConfirmDelete(id)) => Some(id),
            other => {
                self.modal = other;
                None
            }
        }
    }

    pub fn show_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    // ========================================================================
    // Location
    // ========================================================================

    /// Show the enable-location prompt if it is still relevant
    ///
    /// When another modal is open the prompt is deferred to the next reload.
    pub fn show_location_prompt(&mut self) -> bool {
        if self.location != LocationPhase::Unprompted || self.location_enabled {
            return false;
        }
        if self.modal.is_some() {
            self.location_prompted = false;
            return false;
        }
        self.modal = Some(Modal::LocationPrompt);
        true
    }

    /// The user said no; stay unprompted for the rest of the session
    pub fn decline_location(&mut self) {
        if self.modal == Some(Modal::LocationPrompt) {
            self.modal = None;
        }
        self.location_prompted = true;
    }

    pub fn start_tracking(&mut self) {
        self.location = LocationPhase::Tracking;
        self.location_enabled = true;
    }

    pub fn is_tracking(&self) -> bool {
        self.location == LocationPhase::Tracking
    }

    /// Whether a new recommendation may be shown at `now`
    pub fn cooldown_elapsed(&self, now: Instant, cooldown: Duration) -> bool {
        match self.last_shown {
            Some(shown) => now >= shown + cooldown,
            None => true,
        }
    }

    /// Put a recommendation on screen and restart the cooldown
    pub fn show_recommendation(&mut self, recommendation: Recommendation, now: Instant) -> u64 {
        self.next_popup_token += 1;
        let token = self.next_popup_token;
        self.popup = Some(Popup { token, recommendation });
        self.last_shown = Some(now);
        token
    }

    /// Timed dismissal; ignored if a different popup replaced this one
    pub fn dismiss_popup(&mut self, token: u64) {
        if self.popup.as_ref().is_some_and(|p| p.token == token) {
            self.popup = None;
        }
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }
}
