// UI Components
// Everything here draws a piece of `PageView` and calls back into the controller

pub mod alert_modal;
pub mod auth_panel;
pub mod card_form_modal;
pub mod card_stack;
pub mod confirm_modal;
pub mod icons;
pub mod location_modal;
pub mod recommendation_popup;

pub use alert_modal::AlertModal;
pub use auth_panel::AuthPanel;
pub use card_form_modal::CardFormModal;
pub use card_stack::CardStack;
pub use confirm_modal::ConfirmDeleteModal;
pub use icons::{LogOutIcon, MapPinIcon, PlusIcon};
pub use location_modal::LocationModal;
pub use recommendation_popup::RecommendationPopup;
