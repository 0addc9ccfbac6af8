use async_trait::async_trait;
use serenity::all::{
    CommandDataOptionValue, CommandInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseMessage, EditInteractionResponse, EventHandler, Interaction, Ready,
};
use tracing::{info, warn};
use tunelink_core::{TunelinkError, TunelinkResult};
use tunelink_music::{Direction, LinkConverter};

use crate::commands::URL_OPTION;
use crate::reply::{Responder, answer_command};

pub struct Handler {
    converter: LinkConverter,
}

impl Handler {
    pub fn new(converter: LinkConverter) -> Self {
        Self { converter }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.tag(), guilds = ready.guilds.len(), "logged in");
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        let Some(direction) = Direction::from_command_name(&command.data.name) else {
            warn!(command = %command.data.name, "ignoring unknown command");
            return;
        };

        let raw_url = url_option(&command).unwrap_or_default().to_string();
        let responder = InteractionResponder {
            ctx: &ctx,
            command: &command,
        };
        if let Err(err) = answer_command(&responder, &self.converter, direction, &raw_url).await {
            warn!(command = %command.data.name, error = %err, "failed to answer interaction");
        }
    }
}

fn url_option(command: &CommandInteraction) -> Option<&str> {
    command
        .data
        .options
        .iter()
        .find(|option| option.name == URL_OPTION)
        .and_then(|option| match &option.value {
            CommandDataOptionValue::String(value) => Some(value.as_str()),
            _ => None,
        })
}

struct InteractionResponder<'a> {
    ctx: &'a Context,
    command: &'a CommandInteraction,
}

#[async_trait]
impl Responder for InteractionResponder<'_> {
    async fn reject(&self, content: &str) -> TunelinkResult<()> {
        let message = CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true);
        self.command
            .create_response(&self.ctx.http, CreateInteractionResponse::Message(message))
            .await
            .map_err(discord_error)
    }

    async fn defer(&self) -> TunelinkResult<()> {
        self.command
            .defer(&self.ctx.http)
            .await
            .map_err(discord_error)
    }

    async fn complete(&self, content: &str) -> TunelinkResult<()> {
        self.command
            .edit_response(&self.ctx.http, EditInteractionResponse::new().content(content))
            .await
            .map(|_| ())
            .map_err(discord_error)
    }
}

fn discord_error(err: serenity::Error) -> TunelinkError {
    TunelinkError::Discord(err.to_string())
}
