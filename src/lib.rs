//! Application navigation with pluggable interception, and a retained state
//! store for UI-local values that must outlive teardown and recreation.

pub mod config;
pub mod intercept;
pub mod logging;
pub mod navigation;
pub mod overlay;
pub mod retained;
pub mod script;
