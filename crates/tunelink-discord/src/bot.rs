use serenity::all::{ApplicationId, Client, GatewayIntents};
use tracing::info;
use tunelink_config::BotCredentials;
use tunelink_core::{TunelinkError, TunelinkResult};
use tunelink_music::LinkConverter;

use crate::handler::Handler;

/// Connects to the gateway and serves slash commands until the connection
/// ends or the process receives Ctrl-C.
pub async fn run_bot(credentials: &BotCredentials, converter: LinkConverter) -> TunelinkResult<()> {
    info!(endpoint = %converter.endpoint(), "starting bot");

    let mut client = Client::builder(&credentials.token, GatewayIntents::GUILDS)
        .application_id(ApplicationId::new(credentials.application_id))
        .event_handler(Handler::new(converter))
        .await
        .map_err(|err| TunelinkError::Discord(format!("failed to build client: {err}")))?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutting down");
            shard_manager.shutdown_all().await;
        }
    });

    client
        .start()
        .await
        .map_err(|err| TunelinkError::Discord(format!("gateway connection failed: {err}")))
}
