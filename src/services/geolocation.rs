use async_trait::async_trait;

use crate::config::WatchOptions;
use crate::models::Location;

/// Why a position could not be obtained
#[derive(Debug, Clone, PartialEq)]
pub enum GeoError {
    /// The browser has no geolocation API
    Unsupported,
    PermissionDenied,
    Unavailable,
    Timeout,
    Other(String),
}

impl GeoError {
    /// Map a `GeolocationPositionError.code`
    pub fn from_code(code: u16, message: String) -> Self {
        match code {
            1 => GeoError::PermissionDenied,
            2 => GeoError::Unavailable,
            3 => GeoError::Timeout,
            _ => GeoError::Other(message),
        }
    }
}

impl std::fmt::Display for GeoError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            GeoError::Unsupported => write!(f, "Geolocation is not supported by your browser"),
            GeoError::PermissionDenied => write!(f, "Location permission denied"),
            GeoError::Unavailable => write!(f, "Position unavailable"),
            GeoError::Timeout => write!(f, "Timed out waiting for a position"),
            GeoError::Other(e) => write!(f, "Geolocation error: {}", e),
        }
    }
}

impl std::error::Error for GeoError {}

/// Callback invoked for every position update of a watch
pub type FixCallback = Box<dyn FnMut(Location)>;

/// Device positioning
///
/// `Watch` is the live subscription; dropping it stops the updates.
#[async_trait(?Send)]
pub trait Geolocator {
    type Watch: 'static;

    /// One-shot fix; the first call is what triggers the permission request
    async fn current_position(&self) -> Result<Location, GeoError>;

    fn watch_position(&self, options: WatchOptions, on_fix: FixCallback) -> Result<Self::Watch, GeoError>;
}

/// `navigator.geolocation` backed implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserGeolocation;

/// Active `watchPosition` subscription, cleared on drop
#[cfg_attr(not(target_family = "wasm"), allow(dead_code))]
pub struct BrowserWatch {
    id: i32,
    #[cfg(target_family = "wasm")]
    geolocation: web_sys::Geolocation,
    #[cfg(target_family = "wasm")]
    _on_fix: wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>,
    #[cfg(target_family = "wasm")]
    _on_error: wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>,
}

impl Drop for BrowserWatch {
    fn drop(&mut self) {
        #[cfg(target_family = "wasm")]
        {
            self.geolocation.clear_watch(self.id);
            log::debug!("Cleared location watch {}", self.id);
        }
    }
}

#[cfg(target_family = "wasm")]
mod browser {
    use super::GeoError;
    use crate::models::Location;
    use wasm_bindgen::{JsCast, JsValue};

    pub fn geolocation() -> Result<web_sys::Geolocation, GeoError> {
        web_sys::window()
            .ok_or(GeoError::Unsupported)?
            .navigator()
            .geolocation()
            .map_err(|_| GeoError::Unsupported)
    }

    pub fn to_location(value: JsValue) -> Location {
        let position: web_sys::GeolocationPosition = value.unchecked_into();
        let coords = position.coords();
        Location::new(coords.latitude(), coords.longitude())
    }

    pub fn to_error(value: JsValue) -> GeoError {
        match value.dyn_into::<web_sys::GeolocationPositionError>() {
            Ok(err) => GeoError::from_code(err.code(), err.message()),
            Err(other) => GeoError::Other(format!("{:?}", other)),
        }
    }
}

#[async_trait(?Send)]
impl Geolocator for BrowserGeolocation {
    type Watch = BrowserWatch;

    async fn current_position(&self) -> Result<Location, GeoError> {
        #[cfg(target_family = "wasm")]
        {
            let geolocation = browser::geolocation()?;
            let promise = js_sys::Promise::new(&mut |resolve, reject| {
                if let Err(e) = geolocation.get_current_position_with_error_callback(&resolve, Some(&reject)) {
                    let _ = reject.call1(&wasm_bindgen::JsValue::NULL, &e);
                }
            });

            match wasm_bindgen_futures::JsFuture::from(promise).await {
                Ok(value) => Ok(browser::to_location(value)),
                Err(err) => Err(browser::to_error(err)),
            }
        }

        #[cfg(not(target_family = "wasm"))]
        {
            Err(GeoError::Unsupported)
        }
    }

    #[cfg_attr(not(target_family = "wasm"), allow(unused_variables))]
    fn watch_position(&self, options: WatchOptions, on_fix: FixCallback) -> Result<BrowserWatch, GeoError> {
        #[cfg(target_family = "wasm")]
        {
            use wasm_bindgen::closure::Closure;
            use wasm_bindgen::{JsCast, JsValue};

            let geolocation = browser::geolocation()?;

            let mut on_fix = on_fix;
            let success = Closure::wrap(Box::new(move |value: JsValue| {
                on_fix(browser::to_location(value));
            }) as Box<dyn FnMut(JsValue)>);

            let failure = Closure::wrap(Box::new(move |value: JsValue| {
                log::error!("Location tracking error: {}", browser::to_error(value));
            }) as Box<dyn FnMut(JsValue)>);

            let position_options = web_sys::PositionOptions::new();
            position_options.set_enable_high_accuracy(options.high_accuracy);
            position_options.set_timeout(options.timeout.as_millis() as u32);
            position_options.set_maximum_age(options.maximum_age.as_millis() as u32);

            let id = geolocation
                .watch_position_with_error_callback_and_options(
                    success.as_ref().unchecked_ref(),
                    Some(failure.as_ref().unchecked_ref()),
                    &position_options,
                )
                .map_err(|e| GeoError::Other(format!("{:?}", e)))?;

            Ok(BrowserWatch {
                id,
                geolocation,
                _on_fix: success,
                _on_error: failure,
            })
        }

        #[cfg(not(target_family = "wasm"))]
        {
            Err(GeoError::Unsupported)
        }
    }
}
