// Backend and device services
// Everything that leaves the page goes through these seams

pub mod api;
pub mod geolocation;
pub mod http;

pub use api::{ApiError, CardsBackend};
pub use geolocation::{BrowserGeolocation, FixCallback, GeoError, Geolocator};
pub use http::HttpBackend;
