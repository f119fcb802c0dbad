use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::watch;

use super::store::StateStore;
use crate::config::AppConfig;
use crate::models::{CardId, Location, Session};
use crate::services::{ApiError, CardsBackend, GeoError, Geolocator};
use crate::stores::app_state::{DELETE_FAILED, SAVE_FAILED};
use crate::stores::{auth_store, AuthMode, CardForm, Submission};
use crate::view::{self, PageView};

/// A delayed effect the UI layer should schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Followup {
    /// Call `show_location_prompt` after the delay
    PromptLocation { after: Duration },
    /// Call `dismiss_popup(token)` after the delay
    DismissPopup { token: u64, after: Duration },
}

/// Latest position fix produced by the active watch
///
/// Only the newest fix is kept; fixes arriving while a check is in flight
/// replace each other instead of queueing.
pub type FixReceiver = watch::Receiver<Option<Location>>;

/// Owns every operation of the page
///
/// State lives in the `StateStore`; the controller itself only holds the
/// collaborators and the live location watch. Cloning is cheap and all
/// clones share the same watch.
pub struct CardController<B, G: Geolocator, S> {
    backend: Rc<B>,
    geolocator: Rc<G>,
    store: S,
    config: Rc<AppConfig>,
    watch: Rc<RefCell<Option<G::Watch>>>,
    fixes: Rc<watch::Sender<Option<Location>>>,
}

impl<B, G: Geolocator, S: Clone> Clone for CardController<B, G, S> {
    fn clone(&self) -> Self {
        Self {
            backend: Rc::clone(&self.backend),
            geolocator: Rc::clone(&self.geolocator),
            store: self.store.clone(),
            config: Rc::clone(&self.config),
            watch: Rc::clone(&self.watch),
            fixes: Rc::clone(&self.fixes),
        }
    }
}

impl<B, G, S> CardController<B, G, S>
where
    B: CardsBackend + 'static,
    G: Geolocator + 'static,
    S: StateStore,
{
    /// Build a controller; the receiver sees the latest tracked position fix
    pub fn new(backend: B, geolocator: G, store: S, config: AppConfig) -> (Self, FixReceiver) {
        let (fixes, receiver) = watch::channel(None);
        let controller = Self {
            backend: Rc::new(backend),
            geolocator: Rc::new(geolocator),
            store,
            config: Rc::new(config),
            watch: Rc::new(RefCell::new(None)),
            fixes: Rc::new(fixes),
        };
        (controller, receiver)
    }

    /// Current page description
    pub fn view(&self) -> PageView {
        self.store.with(|state| view::render(state, &self.config.stack))
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Resume a stored session and load its cards
    pub async fn restore_session(&self, session: Session) -> Vec<Followup> {
        self.backend.set_access_token(Some(session.access_token.clone()));
        self.store.update(|s| s.sign_in(session));

        match self.backend.current_user().await {
            Ok(user) => {
                log::info!("Signed in as {}", user.email);
                self.store.update(|s| {
                    if let Some(session) = s.session.as_mut() {
                        session.user = user;
                    }
                });
            }
            Err(ApiError::Unauthorized) => {
                log::warn!("Stored session expired");
                self.end_session();
                return Vec::new();
            }
            Err(e) => log::warn!("Could not verify session: {}", e),
        }

        self.reload().await
    }

    /// Submit the sign-in panel in its current mode
    pub async fn submit_auth(&self) -> Vec<Followup> {
        let Some((mode, credentials)) = self.store.update(|s| s.auth_form.begin()) else {
            return Vec::new();
        };

        let result = match mode {
            AuthMode::SignIn => self.backend.login(&credentials).await,
            AuthMode::SignUp => self.backend.signup(&credentials).await,
        };

        match result {
            Ok(session) => {
                log::info!("Authenticated as {}", session.user.email);
                self.backend.set_access_token(Some(session.access_token.clone()));
                auth_store::save_session(&session);
                self.store.update(|s| s.sign_in(session));
                self.reload().await
            }
            Err(e) => {
                log::error!("Authentication failed: {}", e);
                self.store.update(|s| s.auth_form.fail(e.user_message()));
                Vec::new()
            }
        }
    }

    pub fn toggle_auth_mode(&self) {
        self.store.update(|s| s.auth_form.toggle_mode());
    }

    pub fn set_auth_email(&self, email: String) {
        self.store.update(|s| s.auth_form.email = email);
    }

    pub fn set_auth_password(&self, password: String) {
        self.store.update(|s| s.auth_form.password = password);
    }

    pub async fn sign_out(&self) {
        if let Err(e) = self.backend.logout().await {
            log::warn!("Logout request failed: {}", e);
        }
        self.end_session();
    }

    /// Forget the signed-in user, including their location grant
    fn end_session(&self) {
        self.teardown();
        self.backend.set_access_token(None);
        auth_store::clear_session();
        self.store.update(|s| s.sign_out());
    }

    /// Shared reaction to backend failures
    fn note_api_error(&self, error: &ApiError) {
        if *error == ApiError::Unauthorized {
            self.end_session();
        }
    }

    // ========================================================================
    // Card list
    // ========================================================================

    /// Fetch the card list and replace the cache
    ///
    /// Failures keep whatever was displayed before. A response overtaken by
    /// a newer reload is dropped.
    pub async fn reload(&self) -> Vec<Followup> {
        let ticket = self.store.update(|s| s.begin_load());

        let response = match self.backend.list_cards().await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Error loading cards: {}", e);
                self.note_api_error(&e);
                return Vec::new();
            }
        };

        let count = response.cards.len();
        let Some(outcome) = self.store.update(|s| s.apply_load(ticket, response)) else {
            log::debug!("Discarding stale card list");
            return Vec::new();
        };
        log::info!("Loaded {} cards", count);

        if outcome.resume_tracking {
            self.start_tracking();
        }

        let mut followups = Vec::new();
        if outcome.prompt_location {
            followups.push(Followup::PromptLocation {
                after: self.config.location_prompt_delay,
            });
        }
        followups
    }

    pub fn request_delete(&self, id: &CardId) {
        self.store.update(|s| s.request_delete(id));
    }

    /// The user backed out of the delete confirmation
    pub fn cancel_delete(&self) {
        self.store.update(|s| s.close_modals());
    }

    /// Delete the card the confirmation was shown for, then reload
    pub async fn confirm_delete(&self) -> Vec<Followup> {
        let Some(id) = self.store.update(|s| s.take_confirmed_delete()) else {
            return Vec::new();
        };

        match self.backend.delete_card(&id).await {
            Ok(()) => {
                log::info!("Deleted card {}", id);
                self.reload().await
            }
            Err(e) => {
                log::error!("Error deleting card: {}", e);
                self.note_api_error(&e);
                self.store.update(|s| s.show_alert(DELETE_FAILED));
                Vec::new()
            }
        }
    }

    // ========================================================================
    // Card form
    // ========================================================================

    pub fn open_create_form(&self) {
        self.store.update(|s| s.open_create_form());
    }

    pub fn open_edit_form(&self, id: &CardId) {
        if !self.store.update(|s| s.open_edit_form(id)) {
            log::warn!("Card {} is not in the cache", id);
        }
    }

    /// Apply an edit to the open card form, if any
    pub fn edit_form(&self, f: impl FnOnce(&mut CardForm)) {
        self.store.update(|s| {
            if let Some(form) = s.card_form_mut() {
                f(form);
            }
        });
    }

    pub fn close_modals(&self) {
        self.store.update(|s| s.close_modals());
    }

    /// Create or update from the open form
    ///
    /// Success closes the modal and reloads. Failure raises the save alert
    /// and leaves the form open with its contents.
    pub async fn submit_form(&self) -> Vec<Followup> {
        let submission = self.store.update(|s| {
            let form = s.card_form_mut()?;
            if form.saving {
                return None;
            }
            match form.submission() {
                Ok(submission) => {
                    form.saving = true;
                    form.error = None;
                    Some(submission)
                }
                Err(e) => {
                    form.error = Some(e.to_string());
                    None
                }
            }
        });
        let Some(submission) = submission else {
            return Vec::new();
        };

        let result = match &submission {
            Submission::Create(fields) => self.backend.create_card(fields).await,
            Submission::Update(id, fields) => self.backend.update_card(id, fields).await,
        };

        match result {
            Ok(card) => {
                if let Some(card) = card {
                    log::info!("Saved card {}", card.id);
                }
                self.store.update(|s| s.close_modals());
                self.reload().await
            }
            Err(e) => {
                log::error!("Error saving card: {}", e);
                self.note_api_error(&e);
                self.store.update(|s| {
                    if let Some(form) = s.card_form_mut() {
                        form.saving = false;
                    }
                    s.show_alert(SAVE_FAILED);
                });
                Vec::new()
            }
        }
    }

    pub fn dismiss_alert(&self) {
        self.store.update(|s| s.dismiss_alert());
    }

    // ========================================================================
    // Location
    // ========================================================================

    pub fn show_location_prompt(&self) {
        self.store.update(|s| s.show_location_prompt());
    }

    pub fn decline_location(&self) {
        self.store.update(|s| s.decline_location());
    }

    /// The user allowed location: ask the device, persist, track, check
    pub async fn enable_location(&self) -> Vec<Followup> {
        self.store.update(|s| {
            s.close_modals();
            s.location_prompted = true;
        });

        let position = match self.geolocator.current_position().await {
            Ok(position) => position,
            Err(GeoError::Unsupported) => {
                self.store.update(|s| s.show_alert(GeoError::Unsupported.to_string()));
                return Vec::new();
            }
            Err(e) => {
                log::error!("Location permission denied: {}", e);
                return Vec::new();
            }
        };

        if let Err(e) = self.backend.enable_location().await {
            log::error!("Failed to save location preference: {}", e);
            self.note_api_error(&e);
            return Vec::new();
        }

        self.start_tracking();
        self.check_location(position, Instant::now()).await
    }

    /// Install the position watch, replacing any previous one
    pub fn start_tracking(&self) {
        // Clear the old watch before the browser registers a new one
        drop(self.watch.borrow_mut().take());

        let fixes = Rc::clone(&self.fixes);
        let on_fix = Box::new(move |location: Location| {
            fixes.send_replace(Some(location));
        });

        match self.geolocator.watch_position(self.config.watch, on_fix) {
            Ok(watch) => {
                *self.watch.borrow_mut() = Some(watch);
                self.store.update(|s| s.start_tracking());
                log::info!("Location tracking started");
            }
            Err(e) => log::error!("Location tracking error: {}", e),
        }
    }

    /// Evaluate a position fix
    ///
    /// Nothing is sent unless tracking is on, the cache has cards and the
    /// cooldown since the last shown recommendation has run out. Tracking
    /// and cooldown are checked again when the answer arrives so overlapping
    /// checks show one popup and a sign-out in between shows none.
    pub async fn check_location(&self, location: Location, now: Instant) -> Vec<Followup> {
        let cooldown = self.config.recommendation_cooldown;
        let ready = self.store.with(|s| {
            s.is_tracking() && !s.cards.is_empty() && s.cooldown_elapsed(now, cooldown)
        });
        if !ready {
            return Vec::new();
        }

        log::debug!("Checking location {:.4}, {:.4}", location.latitude, location.longitude);
        let response = match self.backend.check_location(location).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Error checking location: {}", e);
                self.note_api_error(&e);
                return Vec::new();
            }
        };

        let Some(recommendation) = response.into_recommendation() else {
            return Vec::new();
        };

        let token = self.store.update(|s| {
            if !s.is_tracking() || !s.cooldown_elapsed(now, cooldown) {
                return None;
            }
            Some(s.show_recommendation(recommendation, now))
        });

        match token {
            Some(token) => vec![Followup::DismissPopup {
                token,
                after: self.config.popup_duration,
            }],
            None => Vec::new(),
        }
    }

    pub fn dismiss_popup(&self, token: u64) {
        self.store.update(|s| s.dismiss_popup(token));
    }

    pub fn close_popup(&self) {
        self.store.update(|s| s.close_popup());
    }

    /// Release the position watch and drop any fix not yet checked
    pub fn teardown(&self) {
        if self.watch.borrow_mut().take().is_some() {
            log::info!("Location tracking stopped");
        }
        self.fixes.send_replace(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Card, CardFields, CardsResponse, Category, CategoryBonus, Credentials, LatLng,
        LocationCheckResponse, Merchant, Recommendation, User,
    };
    use crate::services::FixCallback;
    use crate::stores::{AppState, LocationPhase, Modal};
    use async_trait::async_trait;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List,
        Create(CardFields),
        Update(CardId, CardFields),
        Delete(CardId),
        EnableLocation,
        Check(Location),
        Login(String),
        Logout,
        CurrentUser,
    }

    #[derive(Default)]
    struct BackendState {
        calls: RefCell<Vec<Call>>,
        cards: RefCell<CardsResponse>,
        recommendation: RefCell<Option<Recommendation>>,
        token: RefCell<Option<String>>,
        fail_reads: Cell<bool>,
        fail_writes: Cell<bool>,
        unauthorized: Cell<bool>,
        yield_on_check: Cell<bool>,
    }

    #[derive(Clone, Default)]
    struct MockBackend(Rc<BackendState>);

    impl MockBackend {
        fn calls(&self) -> Vec<Call> {
            self.0.calls.borrow().clone()
        }

        fn record(&self, call: Call) -> Result<(), ApiError> {
            self.0.calls.borrow_mut().push(call);
            if self.0.unauthorized.get() {
                return Err(ApiError::Unauthorized);
            }
            Ok(())
        }

        fn write(&self, call: Call) -> Result<(), ApiError> {
            self.record(call)?;
            if self.0.fail_writes.get() {
                return Err(ApiError::Status { status: 500, message: None });
            }
            Ok(())
        }
    }

    #[async_trait(?Send)]
    impl CardsBackend for MockBackend {
        fn set_access_token(&self, token: Option<String>) {
            *self.0.token.borrow_mut() = token;
        }

        async fn list_cards(&self) -> Result<CardsResponse, ApiError> {
            self.record(Call::List)?;
            if self.0.fail_reads.get() {
                return Err(ApiError::Network("connection refused".to_string()));
            }
            Ok(self.0.cards.borrow().clone())
        }

        async fn create_card(&self, fields: &CardFields) -> Result<Option<Card>, ApiError> {
            self.write(Call::Create(fields.clone()))?;
            Ok(None)
        }

        async fn update_card(&self, id: &CardId, fields: &CardFields) -> Result<Option<Card>, ApiError> {
            self.write(Call::Update(id.clone(), fields.clone()))?;
            Ok(None)
        }

        async fn delete_card(&self, id: &CardId) -> Result<(), ApiError> {
            self.write(Call::Delete(id.clone()))
        }

        async fn enable_location(&self) -> Result<(), ApiError> {
            self.write(Call::EnableLocation)
        }

        async fn check_location(&self, location: Location) -> Result<LocationCheckResponse, ApiError> {
            self.record(Call::Check(location))?;
            if self.0.yield_on_check.get() {
                tokio::task::yield_now().await;
            }
            let recommendation = self.0.recommendation.borrow().clone();
            Ok(LocationCheckResponse {
                success: true,
                recommendation,
            })
        }

        async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
            self.record(Call::Login(credentials.email.clone()))?;
            Ok(session("fresh-token"))
        }

        async fn signup(&self, credentials: &Credentials) -> Result<Session, ApiError> {
            self.login(credentials).await
        }

        async fn logout(&self) -> Result<(), ApiError> {
            self.record(Call::Logout)
        }

        async fn current_user(&self) -> Result<User, ApiError> {
            self.record(Call::CurrentUser)?;
            Ok(session("").user)
        }
    }

    struct MockWatch {
        active: Rc<Cell<usize>>,
    }

    impl Drop for MockWatch {
        fn drop(&mut self) {
            self.active.set(self.active.get() - 1);
        }
    }

    #[derive(Clone)]
    struct MockGeo {
        position: Result<Location, GeoError>,
        callbacks: Rc<RefCell<Vec<FixCallback>>>,
        active: Rc<Cell<usize>>,
        installs: Rc<Cell<usize>>,
    }

    impl MockGeo {
        fn at(location: Location) -> Self {
            Self {
                position: Ok(location),
                callbacks: Rc::new(RefCell::new(Vec::new())),
                active: Rc::new(Cell::new(0)),
                installs: Rc::new(Cell::new(0)),
            }
        }

        fn failing(error: GeoError) -> Self {
            Self {
                position: Err(error),
                ..Self::at(here())
            }
        }

        fn emit(&self, location: Location) {
            if let Some(callback) = self.callbacks.borrow_mut().last_mut() {
                callback(location);
            }
        }
    }

    #[async_trait(?Send)]
    impl Geolocator for MockGeo {
        type Watch = MockWatch;

        async fn current_position(&self) -> Result<Location, GeoError> {
            self.position.clone()
        }

        fn watch_position(
            &self,
            options: crate::config::WatchOptions,
            on_fix: FixCallback,
        ) -> Result<MockWatch, GeoError> {
            assert!(options.high_accuracy);
            self.callbacks.borrow_mut().push(on_fix);
            self.active.set(self.active.get() + 1);
            self.installs.set(self.installs.get() + 1);
            Ok(MockWatch {
                active: Rc::clone(&self.active),
            })
        }
    }

    type TestController = CardController<MockBackend, MockGeo, Rc<RefCell<AppState>>>;

    fn here() -> Location {
        Location::new(42.160, -87.967)
    }

    fn session(token: &str) -> Session {
        Session {
            access_token: token.to_string(),
            user: User {
                id: "u-1".to_string(),
                email: "sam@example.com".to_string(),
            },
        }
    }

    fn card(id: &str) -> Card {
        Card {
            id: CardId::new(id),
            name: format!("Card {}", id),
            network: "visa".to_string(),
            color: "blue".to_string(),
            base_rate: 1.0,
            category_bonuses: vec![CategoryBonus { category: Category::Gas, rate: 3.0 }],
        }
    }

    fn recommendation() -> Recommendation {
        Recommendation {
            card: Some(card("1")),
            merchant: Merchant {
                name: "Shell".to_string(),
                category: "gas".to_string(),
                distance: 0.4,
            },
            rate: 3.0,
            location: LatLng { lat: 42.16, lng: -87.967 },
            all_nearby: vec![],
        }
    }

    fn setup(geo: MockGeo) -> (TestController, MockBackend, FixReceiver) {
        let backend = MockBackend::default();
        let store = Rc::new(RefCell::new(AppState::default()));
        let (controller, fixes) =
            CardController::new(backend.clone(), geo, store, AppConfig::default());
        (controller, backend, fixes)
    }

    fn state(controller: &TestController) -> AppState {
        controller.store.borrow().clone()
    }

    #[tokio::test]
    async fn test_empty_load_shows_empty_state_without_prompt() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));

        let followups = controller.reload().await;

        assert!(followups.is_empty());
        assert_eq!(backend.calls(), vec![Call::List]);
        let state = state(&controller);
        assert!(state.loaded);
        assert!(state.cards.is_empty());
        assert!(state.modal.is_none());
    }

    #[tokio::test]
    async fn test_first_cards_schedule_location_prompt() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        backend.0.cards.borrow_mut().cards = vec![card("1")];

        let followups = controller.reload().await;
        assert_eq!(
            followups,
            vec![Followup::PromptLocation { after: Duration::from_millis(500) }]
        );

        controller.show_location_prompt();
        assert_eq!(state(&controller).modal, Some(Modal::LocationPrompt));

        controller.decline_location();
        assert!(state(&controller).modal.is_none());
        assert!(controller.reload().await.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_keeps_previous_cards() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        backend.0.cards.borrow_mut().cards = vec![card("1")];
        controller.reload().await;

        backend.0.fail_reads.set(true);
        backend.0.cards.borrow_mut().cards = vec![];
        assert!(controller.reload().await.is_empty());

        let state = state(&controller);
        assert_eq!(state.cards, vec![card("1")]);
        assert!(state.alert.is_none());
    }

    #[tokio::test]
    async fn test_declined_delete_issues_no_call() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        backend.0.cards.borrow_mut().cards = vec![card("1")];
        controller.reload().await;

        controller.request_delete(&CardId::new("1"));
        assert_eq!(
            state(&controller).modal,
            Some(Modal::ConfirmDelete(CardId::new("1")))
        );
        controller.cancel_delete();
        assert!(controller.confirm_delete().await.is_empty());

        assert_eq!(backend.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn test_confirmed_delete_calls_backend_and_reloads() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        backend.0.cards.borrow_mut().cards = vec![card("1")];
        controller.reload().await;

        controller.request_delete(&CardId::new("1"));
        backend.0.cards.borrow_mut().cards = vec![];
        controller.confirm_delete().await;

        assert_eq!(
            backend.calls(),
            vec![Call::List, Call::Delete(CardId::new("1")), Call::List]
        );
        assert!(state(&controller).cards.is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_raises_alert() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        backend.0.cards.borrow_mut().cards = vec![card("1")];
        controller.reload().await;
        backend.0.fail_writes.set(true);

        controller.request_delete(&CardId::new("1"));
        controller.confirm_delete().await;

        let state = state(&controller);
        assert_eq!(state.alert.as_deref(), Some(DELETE_FAILED));
        assert_eq!(state.cards, vec![card("1")]);
    }

    #[tokio::test]
    async fn test_create_posts_form_and_reloads() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        controller.open_create_form();
        controller.edit_form(|form| {
            form.name = "Dining Plus".to_string();
            form.base_rate = "1".to_string();
            let key = form.add_bonus_row();
            form.set_bonus_category(key, "dining".to_string());
            form.set_bonus_rate(key, "3".to_string());
        });

        controller.submit_form().await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        match &calls[0] {
            Call::Create(fields) => {
                assert_eq!(fields.base_rate, 1.0);
                assert_eq!(
                    fields.category_bonuses,
                    vec![CategoryBonus { category: Category::Dining, rate: 3.0 }]
                );
            }
            other => panic!("expected create, got {:?}", other),
        }
        assert_eq!(calls[1], Call::List);
        assert!(state(&controller).modal.is_none());
    }

    #[tokio::test]
    async fn test_edit_puts_to_bound_id() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        backend.0.cards.borrow_mut().cards = vec![card("7")];
        controller.reload().await;

        controller.open_edit_form(&CardId::new("7"));
        controller.edit_form(|form| form.name = "Renamed".to_string());
        controller.submit_form().await;

        match &backend.calls()[1] {
            Call::Update(id, fields) => {
                assert_eq!(id, &CardId::new("7"));
                assert_eq!(fields.name, "Renamed");
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_save_keeps_form_open() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        backend.0.fail_writes.set(true);
        controller.open_create_form();
        controller.edit_form(|form| {
            form.name = "Keep Me".to_string();
            form.base_rate = "2".to_string();
        });

        controller.submit_form().await;

        let state = state(&controller);
        assert_eq!(state.alert.as_deref(), Some(SAVE_FAILED));
        let form = state.card_form().expect("form stays open");
        assert_eq!(form.name, "Keep Me");
        assert!(!form.saving);
        assert!(!backend.calls().contains(&Call::List));
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        controller.open_create_form();
        controller.edit_form(|form| form.name = "No Rate".to_string());

        controller.submit_form().await;

        assert!(backend.calls().is_empty());
        let state = state(&controller);
        assert_eq!(
            state.card_form().and_then(|f| f.error.clone()).as_deref(),
            Some("Base rate must be a number")
        );
    }

    #[tokio::test]
    async fn test_enable_location_tracks_and_checks_immediately() {
        let geo = MockGeo::at(here());
        let (controller, backend, _fixes) = setup(geo.clone());
        backend.0.cards.borrow_mut().cards = vec![card("1")];
        *backend.0.recommendation.borrow_mut() = Some(recommendation());
        controller.reload().await;
        controller.show_location_prompt();

        let followups = controller.enable_location().await;

        assert_eq!(
            backend.calls(),
            vec![Call::List, Call::EnableLocation, Call::Check(here())]
        );
        let state = state(&controller);
        assert_eq!(state.location, LocationPhase::Tracking);
        assert!(state.location_enabled);
        assert!(state.modal.is_none());
        let token = state.popup.as_ref().map(|p| p.token).unwrap();
        assert_eq!(
            followups,
            vec![Followup::DismissPopup { token, after: Duration::from_secs(10) }]
        );
        assert_eq!(geo.active.get(), 1);
    }

    #[tokio::test]
    async fn test_failed_location_save_does_not_track() {
        let geo = MockGeo::at(here());
        let (controller, backend, _fixes) = setup(geo.clone());
        backend.0.cards.borrow_mut().cards = vec![card("1")];
        *backend.0.recommendation.borrow_mut() = Some(recommendation());
        controller.reload().await;
        backend.0.fail_writes.set(true);

        assert!(controller.enable_location().await.is_empty());

        assert_eq!(backend.calls(), vec![Call::List, Call::EnableLocation]);
        assert_eq!(geo.installs.get(), 0);
        let state = state(&controller);
        assert!(!state.is_tracking());
        assert!(!state.location_enabled);
        assert!(state.popup.is_none());
        assert!(controller.reload().await.is_empty());
    }

    #[tokio::test]
    async fn test_permission_denied_leaves_location_off() {
        let geo = MockGeo::failing(GeoError::PermissionDenied);
        let (controller, backend, _fixes) = setup(geo.clone());
        backend.0.cards.borrow_mut().cards = vec![card("1")];
        controller.reload().await;

        controller.enable_location().await;

        assert_eq!(backend.calls(), vec![Call::List]);
        let state = state(&controller);
        assert_eq!(state.location, LocationPhase::Unprompted);
        assert!(state.alert.is_none());
        assert_eq!(geo.installs.get(), 0);
        assert!(controller.reload().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_geolocation_alerts() {
        let (controller, _backend, _fixes) = setup(MockGeo::failing(GeoError::Unsupported));
        controller.enable_location().await;
        assert_eq!(
            state(&controller).alert.as_deref(),
            Some("Geolocation is not supported by your browser")
        );
    }

    #[tokio::test]
    async fn test_cooldown_limits_popups() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        backend.0.cards.borrow_mut().cards = vec![card("1")];
        *backend.0.recommendation.borrow_mut() = Some(recommendation());
        controller.reload().await;
        controller.start_tracking();

        let start = Instant::now();
        let first = controller.check_location(here(), start).await;
        let second = controller
            .check_location(here(), start + Duration::from_secs(30))
            .await;
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(
            backend.calls().iter().filter(|c| matches!(c, Call::Check(_))).count(),
            1
        );

        let later = controller
            .check_location(here(), start + Duration::from_secs(61))
            .await;
        assert_eq!(later.len(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_checks_show_one_popup() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        backend.0.cards.borrow_mut().cards = vec![card("1")];
        *backend.0.recommendation.borrow_mut() = Some(recommendation());
        backend.0.yield_on_check.set(true);
        controller.reload().await;
        controller.start_tracking();

        let now = Instant::now();
        let (a, b) = tokio::join!(
            controller.check_location(here(), now),
            controller.check_location(here(), now + Duration::from_secs(1)),
        );

        assert_eq!(
            backend.calls().iter().filter(|c| matches!(c, Call::Check(_))).count(),
            2
        );
        assert_eq!(a.len() + b.len(), 1);
    }

    #[tokio::test]
    async fn test_no_check_without_cards() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        *backend.0.recommendation.borrow_mut() = Some(recommendation());
        controller.reload().await;
        controller.start_tracking();

        assert!(controller.check_location(here(), Instant::now()).await.is_empty());
        assert_eq!(backend.calls(), vec![Call::List]);
    }

    #[tokio::test]
    async fn test_restarting_tracking_replaces_watch() {
        let geo = MockGeo::at(here());
        let (controller, _backend, mut fixes) = setup(geo.clone());

        controller.start_tracking();
        controller.start_tracking();
        assert_eq!(geo.installs.get(), 2);
        assert_eq!(geo.active.get(), 1);

        let moved = Location::new(42.17, -87.98);
        geo.emit(moved);
        assert!(fixes.has_changed().unwrap());
        assert_eq!(*fixes.borrow_and_update(), Some(moved));

        controller.teardown();
        assert_eq!(geo.active.get(), 0);
        assert_eq!(*fixes.borrow_and_update(), None);
    }

    #[tokio::test]
    async fn test_only_latest_fix_is_pending() {
        let geo = MockGeo::at(here());
        let (controller, _backend, mut fixes) = setup(geo.clone());
        controller.start_tracking();

        let stale = Location::new(42.17, -87.98);
        let latest = Location::new(42.18, -87.99);
        geo.emit(stale);
        geo.emit(latest);

        assert!(fixes.has_changed().unwrap());
        assert_eq!(*fixes.borrow_and_update(), Some(latest));
        assert!(!fixes.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_remembered_grant_resumes_tracking() {
        let geo = MockGeo::at(here());
        let (controller, backend, _fixes) = setup(geo.clone());
        *backend.0.cards.borrow_mut() = CardsResponse {
            cards: vec![card("1")],
            location_enabled: true,
        };

        let followups = controller.reload().await;

        assert!(followups.is_empty());
        assert_eq!(geo.installs.get(), 1);
        assert!(state(&controller).is_tracking());
    }

    #[tokio::test]
    async fn test_popup_dismissal_by_token() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        backend.0.cards.borrow_mut().cards = vec![card("1")];
        *backend.0.recommendation.borrow_mut() = Some(recommendation());
        controller.reload().await;
        controller.start_tracking();

        let followups = controller.check_location(here(), Instant::now()).await;
        let Some(Followup::DismissPopup { token, .. }) = followups.first().copied() else {
            panic!("expected a dismissal");
        };
        controller.dismiss_popup(token + 1);
        assert!(state(&controller).popup.is_some());
        controller.dismiss_popup(token);
        assert!(state(&controller).popup.is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_ends_session() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        controller.store.update(|s| s.sign_in(session("old")));
        backend.0.unauthorized.set(true);

        controller.reload().await;

        assert!(!state(&controller).is_signed_in());
        assert!(backend.0.token.borrow().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_stores_token_and_loads() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        controller.set_auth_email("sam@example.com".to_string());
        controller.set_auth_password("hunter2".to_string());

        controller.submit_auth().await;

        assert_eq!(
            backend.calls(),
            vec![Call::Login("sam@example.com".to_string()), Call::List]
        );
        assert_eq!(backend.0.token.borrow().as_deref(), Some("fresh-token"));
        assert!(state(&controller).is_signed_in());
    }

    #[tokio::test]
    async fn test_restore_session_verifies_then_loads() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));

        controller.restore_session(session("kept")).await;

        assert_eq!(backend.calls(), vec![Call::CurrentUser, Call::List]);
        assert_eq!(backend.0.token.borrow().as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn test_sign_out_clears_everything() {
        let (controller, backend, _fixes) = setup(MockGeo::at(here()));
        controller.restore_session(session("kept")).await;

        controller.sign_out().await;

        assert!(backend.calls().contains(&Call::Logout));
        assert!(backend.0.token.borrow().is_none());
        assert!(!state(&controller).is_signed_in());
    }

    #[tokio::test]
    async fn test_sign_out_stops_tracking_for_next_user() {
        let geo = MockGeo::at(here());
        let (controller, backend, mut fixes) = setup(geo.clone());
        backend.0.cards.borrow_mut().cards = vec![card("1")];
        *backend.0.recommendation.borrow_mut() = Some(recommendation());
        controller.restore_session(session("first")).await;
        controller.enable_location().await;
        assert_eq!(geo.active.get(), 1);

        controller.sign_out().await;
        assert_eq!(geo.active.get(), 0);
        assert!(!state(&controller).is_tracking());

        *backend.0.cards.borrow_mut() = CardsResponse {
            cards: vec![card("2")],
            location_enabled: false,
        };
        controller.set_auth_email("alex@example.com".to_string());
        controller.set_auth_password("hunter2".to_string());
        let followups = controller.submit_auth().await;
        assert_eq!(
            followups,
            vec![Followup::PromptLocation { after: Duration::from_millis(500) }]
        );
        let signed_in = backend.calls().len();

        // A fix the browser delivers after the old watch was cleared
        geo.emit(Location::new(42.17, -87.98));
        let pending = *fixes.borrow_and_update();
        let location = pending.expect("late fix reaches the channel");
        assert!(controller.check_location(location, Instant::now()).await.is_empty());

        assert!(!backend.calls()[signed_in..]
            .iter()
            .any(|c| matches!(c, Call::Check(_))));
        let state = state(&controller);
        assert!(state.popup.is_none());
        assert!(!state.is_tracking());
    }
}
