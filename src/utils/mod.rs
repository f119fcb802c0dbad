// Formatting helpers shared by the page view

pub mod format;
