//! Ready-made block models: the tractor steering system and a delay demo.

pub mod delay_demo;
pub mod steering;

pub use delay_demo::{DEFAULT_DELAY, build_delay_demo, delay_model};
pub use steering::{
    DEFAULT_INFO, DEFAULT_REQUEST, INFO_SIGNALS, build_steering_system, default_parameters, pinpoint, pt,
    steering_model,
};
