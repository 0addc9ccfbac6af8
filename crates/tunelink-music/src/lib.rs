pub mod api;
mod converter;
mod direction;
mod message;
pub mod parsers;

pub use converter::LinkConverter;
pub use direction::Direction;
pub use message::render_reply;
