use async_trait::async_trait;
use tracing::debug;
use tunelink_core::TunelinkResult;
use tunelink_music::{Direction, LinkConverter, render_reply};

/// The three ways a command can answer the user.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Private, immediate reply; no conversion happens.
    async fn reject(&self, content: &str) -> TunelinkResult<()>;

    /// Acknowledges the command while the conversion runs.
    async fn defer(&self) -> TunelinkResult<()>;

    /// Replaces the deferred acknowledgement with the final reply.
    async fn complete(&self, content: &str) -> TunelinkResult<()>;
}

pub async fn converted_reply(converter: &LinkConverter, direction: Direction, url: &str) -> String {
    let result = converter.convert(url, direction.target()).await;
    render_reply(direction, &result)
}

/// Runs one slash command from raw input to final reply.
pub async fn answer_command(
    responder: &dyn Responder,
    converter: &LinkConverter,
    direction: Direction,
    raw_url: &str,
) -> TunelinkResult<()> {
    let url = match direction.accept(raw_url) {
        Ok(url) => url,
        Err(rejection) => {
            debug!(command = direction.command_name(), input = raw_url, "rejected link");
            return responder.reject(rejection).await;
        }
    };

    responder.defer().await?;
    let content = converted_reply(converter, direction, &url).await;
    responder.complete(&content).await
}
