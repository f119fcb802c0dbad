// Domain types shared by the backend client, the state store and the views

pub mod card;
pub mod recommendation;
pub mod session;

pub use card::{Card, CardFields, CardId, CardsResponse, Category, CategoryBonus};
pub use recommendation::{LatLng, Location, LocationCheckResponse, Merchant, Recommendation};
pub use session::{AuthResponse, Credentials, Session, User};
