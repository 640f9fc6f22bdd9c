//! Domain types for Gena Card
//! Card content, artwork selection, language settings, verses and errors.

pub mod card;
pub mod error;
pub mod language;
pub mod verse;

pub use card::*;
pub use error::*;
pub use language::*;
pub use verse::*;
