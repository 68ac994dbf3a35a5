//! 🜂 Priests: model hardware and inference

pub mod classifier;
pub mod device;
#[cfg(test)]
pub mod dummy_classifier;
pub mod service;

pub use service::PersonalityService;
