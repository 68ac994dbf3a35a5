//! 🎭 Effigy: avatar options, builder and export
//!
//! Options → Builder → Exporter. A failed build never reaches the exporter.

pub mod builder;
pub mod canvas;
pub mod exporter;
pub mod options;

pub use builder::AvatarBuilder;
pub use exporter::{download_link, ImageExporter};
pub use options::{AvatarOptions, Category};
