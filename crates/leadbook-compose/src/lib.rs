//! Leadbook Compose - follow-up message drafting
//!
//! Provides:
//! - [`MessageGenerator`]: the async seam every provider implements
//! - [`GeminiGenerator`]: Google Gemini `generateContent` over reqwest
//! - [`draft_or_fallback`]: generation that degrades to [`FALLBACK_MESSAGE`]
//! - [`greeting`], [`compose_with_greeting`], [`whatsapp_link`]
//!
//! # Example
//!
//! ```rust
//! use leadbook_compose::{compose_with_greeting, whatsapp_link, FALLBACK_MESSAGE};
//!
//! let message = compose_with_greeting("Ada Lovelace", FALLBACK_MESSAGE);
//! assert!(message.starts_with("Hi Ada, "));
//! assert!(whatsapp_link("+44 20 7946 0000", &message).starts_with("https://wa.me/442079460000?text=Hi%20Ada"));
//! ```

#![warn(unreachable_pub)]

pub mod contact;
pub mod draft;
pub mod error;
pub mod gemini;
pub mod prompt;
pub mod request;

pub use contact::{compose_with_greeting, greeting, whatsapp_link};
pub use draft::{draft_or_fallback, Draft, FALLBACK_MESSAGE};
pub use error::GenerateError;
pub use gemini::{GeminiConfig, GeminiGenerator};
pub use prompt::build_prompt;
pub use request::{MessageGenerator, MessageRequest};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
