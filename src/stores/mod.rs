// Application state
// Plain data plus the transitions the controller applies to it

pub mod app_state;
pub mod auth_store;
pub mod card_form;

pub use app_state::{AppState, LocationPhase, Modal, Popup};
pub use auth_store::{AuthForm, AuthMode};
pub use card_form::{BonusRow, CardForm, Submission};
