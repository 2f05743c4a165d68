use anyhow::{anyhow, Context as _, Result};
use cloudprint_api::endpoints::{jobs::SubmitJob, printers::Printer};
use cloudprint_api::Client;
use cloudprint_auth::{
    authorize, login, AuthError, AuthState, CredentialStore, Credentials, DeviceCode,
    DeviceFlowClient,
};
use std::io::Write;
use std::path::Path;

use super::executor::Context;

pub fn auth_setcreds<S, W>(
    ctx: &mut Context<S, W>,
    client_id: String,
    client_secret: String,
) -> Result<()>
where
    S: CredentialStore,
    W: Write,
{
    // Tokens issued to a previous client are useless with the new one
    ctx.store
        .save(&Credentials::with_client(client_id, client_secret))?;
    tracing::info!("Stored new client credentials");
    writeln!(ctx.out, "Client credentials saved")?;
    Ok(())
}

pub async fn auth_login<S, W>(ctx: &mut Context<S, W>, open_browser: bool) -> Result<()>
where
    S: CredentialStore,
    W: Write,
{
    let Context {
        settings,
        store,
        out,
    } = ctx;

    let credentials = store.load()?;
    if credentials.state() == AuthState::Authenticated {
        writeln!(out, "Already authenticated")?;
        return Ok(());
    }

    let client = DeviceFlowClient::new(settings)?;

    login(&client, &*store, |code| present_code(&mut *out, code, open_browser)).await?;

    writeln!(out, "Authenticated successfully")?;
    Ok(())
}

fn present_code<W: Write>(out: &mut W, code: &DeviceCode, open_browser: bool) -> Result<()> {
    if open_browser {
        if let Err(e) = open::that(&code.verification_url) {
            tracing::warn!("Failed to open browser: {}", e);
            writeln!(out, "Could not open a browser, please visit the URL below.")?;
        }
    }
    writeln!(out, "\nVisit:             {}", code.verification_url)?;
    writeln!(out, "Verification code: {}\n", code.user_code)?;
    writeln!(out, "Waiting for authorization...")?;
    out.flush()?;
    Ok(())
}

pub async fn auth_refresh<S, W>(ctx: &mut Context<S, W>, force: bool) -> Result<()>
where
    S: CredentialStore,
    W: Write,
{
    let mut credentials = ctx.store.load_required()?;

    if !credentials.is_authenticated() {
        return Err(AuthError::NotAuthenticated.into());
    }
    if !credentials.is_expired() && !force {
        writeln!(ctx.out, "Token is not expired")?;
        return Ok(());
    }

    let client = DeviceFlowClient::new(&ctx.settings)?;
    client.refresh_token(&mut credentials).await?;
    ctx.store.save(&credentials)?;

    writeln!(ctx.out, "Token refreshed")?;
    Ok(())
}

pub fn auth_clear<S, W>(ctx: &mut Context<S, W>, all: bool, yes: bool) -> Result<()>
where
    S: CredentialStore,
    W: Write,
{
    if !yes {
        writeln!(ctx.out, "Use --yes to confirm")?;
        return Ok(());
    }

    if all {
        ctx.store.clear_all()?;
        writeln!(ctx.out, "Cleared all stored credentials")?;
    } else {
        ctx.store.clear_tokens()?;
        writeln!(ctx.out, "Cleared tokens, client credentials kept")?;
    }
    Ok(())
}

pub fn auth_status<S, W>(ctx: &mut Context<S, W>) -> Result<()>
where
    S: CredentialStore,
    W: Write,
{
    let credentials = ctx.store.load()?;
    let out = &mut ctx.out;

    let Some((client_id, client_secret)) = credentials.client() else {
        writeln!(out, "Please set client id/secret with `cloudprint auth setcreds`")?;
        return Ok(());
    };

    writeln!(out, "Client ID:     {}", client_id)?;
    writeln!(out, "Client Secret: {}", mask(client_secret))?;

    match credentials.state() {
        AuthState::Authenticated | AuthState::Expired => {
            let validity = if credentials.is_expired() {
                "expired"
            } else {
                "valid"
            };
            writeln!(
                out,
                "Access token:  {} ({})",
                mask(credentials.access_token().unwrap_or_default()),
                validity
            )?;
            if let Some(expires_at) = credentials.expires_at() {
                writeln!(out, "Expires at:    {}", expires_at.to_rfc3339())?;
            }
            writeln!(
                out,
                "Refresh token: {}",
                credentials.refresh_token().map(mask).unwrap_or_else(|| "none".to_string())
            )?;
        }
        AuthState::Configured | AuthState::Unconfigured => {
            writeln!(out, "Not authenticated")?;
        }
    }
    Ok(())
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if visible.len() == secret.len() {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

async fn api_client<S, W>(ctx: &Context<S, W>) -> Result<Client>
where
    S: CredentialStore,
{
    let auth = DeviceFlowClient::new(&ctx.settings)?;
    let credentials = authorize(&auth, &ctx.store).await?;
    let access_token = credentials
        .access_token()
        .ok_or(AuthError::NotAuthenticated)?;

    Ok(Client::with_base_url(&ctx.settings.service_url, access_token)
        .timeout(ctx.settings.http_timeout()))
}

pub async fn printers<S, W>(ctx: &mut Context<S, W>) -> Result<()>
where
    S: CredentialStore,
    W: Write,
{
    let client = api_client(ctx).await?;
    let printers = client.list_printers().await?;

    if printers.is_empty() {
        writeln!(ctx.out, "No printers found")?;
        return Ok(());
    }

    for (index, printer) in printers.iter().enumerate() {
        writeln!(
            ctx.out,
            "{:>3}  {}  {}  [{}]",
            index, printer.id, printer.name, printer.status
        )?;
        if !printer.description.is_empty() {
            writeln!(ctx.out, "     {}", printer.description)?;
        }
    }
    Ok(())
}

/// How the `submit` command names its printer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinterTarget {
    /// Position in the `printers` listing, starting at 0
    Index(usize),
    Id(String),
}

impl PrinterTarget {
    pub fn parse(target: &str) -> Self {
        match target.parse::<usize>() {
            Ok(index) => Self::Index(index),
            Err(_) => Self::Id(target.to_string()),
        }
    }
}

pub fn select_printer(printers: &[Printer], index: usize) -> Result<&Printer> {
    printers.get(index).ok_or_else(|| {
        anyhow!(
            "No printer at index {} ({} printers available)",
            index,
            printers.len()
        )
    })
}

pub async fn submit<S, W>(
    ctx: &mut Context<S, W>,
    target: &str,
    filename: &Path,
    title: Option<String>,
) -> Result<()>
where
    S: CredentialStore,
    W: Write,
{
    let client = api_client(ctx).await?;

    let printer_id = match PrinterTarget::parse(target) {
        PrinterTarget::Index(index) => {
            let printers = client.list_printers().await?;
            select_printer(&printers, index)?.id.clone()
        }
        PrinterTarget::Id(id) => id,
    };

    let mut job = SubmitJob::from_path(printer_id.clone(), filename)
        .with_context(|| format!("Failed to read {}", filename.display()))?;
    if let Some(title) = title {
        job = job.title(title);
    }

    let submitted = client.submit(job).await?;
    writeln!(
        ctx.out,
        "Submitted job {} to printer {}",
        submitted.id, printer_id
    )?;
    Ok(())
}
