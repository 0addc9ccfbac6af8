use tunelink_core::ConversionResult;

use crate::direction::Direction;

/// Renders a conversion outcome as the chat reply for `direction`.
pub fn render_reply(direction: Direction, result: &ConversionResult) -> String {
    match result {
        ConversionResult::Match { top, .. } => {
            format!("🎵 **{}**\n{}", top.display_text(), top.url)
        }
        ConversionResult::NoMatch { manual_search_link } => format!(
            "🔍 No {} match found for that link.\nTry searching manually: {manual_search_link}",
            direction.target().display_name()
        ),
        ConversionResult::Failure { message } => format!("❌ Conversion failed: {message}"),
    }
}
