//! Discord front end: slash command definitions, registration and the
//! gateway event handler.

mod bot;
mod commands;
mod handler;
mod reply;

pub use bot::run_bot;
pub use commands::{URL_OPTION, build_command, build_commands, register_commands};
pub use handler::Handler;
pub use reply::{Responder, answer_command, converted_reply};
