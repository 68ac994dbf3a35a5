//! 🜁 Demiurge: personality traits
//!
//! Source → scores → statements + chart.

pub mod describer;
pub mod plotter;
pub mod source;
pub mod traits;

pub use describer::{describe, Statement};
pub use plotter::TraitPlotter;
pub use source::{ManualScores, TraitSource};
pub use traits::TraitScores;
