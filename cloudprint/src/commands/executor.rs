use anyhow::Result;
use cloudprint_auth::{CredentialStore, Settings};
use std::io::Write;

use super::handlers;
use super::{AuthAction, Command};

/// Everything a command needs for one invocation
pub struct Context<S, W> {
    pub settings: Settings,
    pub store: S,
    pub out: W,
}

impl<S, W> Context<S, W>
where
    S: CredentialStore,
    W: Write,
{
    pub fn new(settings: Settings, store: S, out: W) -> Self {
        Self {
            settings,
            store,
            out,
        }
    }
}

/// Run one parsed command against the context
pub async fn execute_command<S, W>(command: Command, ctx: &mut Context<S, W>) -> Result<()>
where
    S: CredentialStore,
    W: Write,
{
    match command {
        Command::Auth(action) => match action {
            AuthAction::Setcreds {
                client_id,
                client_secret,
            } => handlers::auth_setcreds(ctx, client_id, client_secret),
            AuthAction::Login { no_browser } => handlers::auth_login(ctx, !no_browser).await,
            AuthAction::Refresh { force } => handlers::auth_refresh(ctx, force).await,
            AuthAction::Clear { all, yes } => handlers::auth_clear(ctx, all, yes),
            AuthAction::Status => handlers::auth_status(ctx),
        },
        Command::Printers => handlers::printers(ctx).await,
        Command::Submit {
            printer,
            filename,
            title,
        } => handlers::submit(ctx, &printer, &filename, title).await,
    }
}
