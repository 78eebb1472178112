pub mod besselian;
pub mod constants;
pub mod curves;
pub mod eclipse_errors;
pub mod frames;
pub mod greatest;
pub mod lunar;
pub mod observer;
pub mod shadow_axis;
pub mod site;
pub mod tangency;
pub mod time;
