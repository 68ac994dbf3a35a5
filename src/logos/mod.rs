//! Logos: text preparation for the model

pub mod tokenizer;
