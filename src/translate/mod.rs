pub mod interface;
pub mod client;

pub use interface::{TranslateError, TranslationOutcome, Translator};
pub use client::TranslationClient;
