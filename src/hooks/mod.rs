pub mod use_controller;

pub use use_controller::{spawn_action, use_app_controller};
