//! Public types shared by the client and the tool layer.

mod content_type;
mod detail;
mod language;
mod response;

pub use content_type::ContentType;
pub use detail::{ADDITIONAL_INFO_KEY, DetailRecord};
pub use language::Language;
pub use response::{Item, NormalizedResponse, Page};
