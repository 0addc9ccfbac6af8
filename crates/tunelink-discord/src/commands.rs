use serenity::all::{
    ApplicationId, Command, CommandOptionType, CreateCommand, CreateCommandOption, Http,
    InstallationContext, InteractionContext,
};
use tracing::info;
use tunelink_config::BotCredentials;
use tunelink_core::{TunelinkError, TunelinkResult};
use tunelink_music::Direction;

pub const URL_OPTION: &str = "url";

pub fn build_command(direction: Direction) -> CreateCommand {
    CreateCommand::new(direction.command_name())
        .description(direction.command_description())
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                URL_OPTION,
                direction.option_description(),
            )
            .required(true),
        )
        .integration_types(vec![InstallationContext::Guild, InstallationContext::User])
        .contexts(vec![
            InteractionContext::Guild,
            InteractionContext::BotDm,
            InteractionContext::PrivateChannel,
        ])
}

pub fn build_commands() -> Vec<CreateCommand> {
    Direction::ALL.into_iter().map(build_command).collect()
}

/// Replaces the application's global slash commands with ours.
pub async fn register_commands(credentials: &BotCredentials) -> TunelinkResult<usize> {
    let http = Http::new(&credentials.token);
    http.set_application_id(ApplicationId::new(credentials.application_id));

    info!(application_id = credentials.application_id, "registering slash commands");
    let registered = Command::set_global_commands(&http, build_commands())
        .await
        .map_err(|err| TunelinkError::Discord(format!("failed to register commands: {err}")))?;

    for command in &registered {
        info!(name = %command.name, id = %command.id, "registered command");
    }
    Ok(registered.len())
}
