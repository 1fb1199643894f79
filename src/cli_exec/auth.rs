use particle::backend::{Query, select_as};
use particle::host::{Confirm, ConfirmPrompt, StdinConfirm, open_in_browser};
use particle::model::Profile;
use particle::session::{AuthHook, Credential, extract_auth_code};

use crate::cli_commands::auth::LoginArgs;

use super::context::open_context;
use super::*;

pub(super) fn handle_login_command(args: LoginArgs) -> Result<()> {
    let ctx = open_context()?;
    let mut auth = ctx.auth_hook();
    let mut notifier = StderrNotifier;

    if args.oauth {
        if ctx.config.oauth.is_none() {
            anyhow::bail!(
                "browser sign-in is not configured (run `particle config set --oauth-redirect ...`)"
            );
        }
        return oauth_login(&mut auth);
    }

    if let Some(code) = args.code {
        let verifier = auth
            .pending_verifier()
            .context("no browser sign-in in progress (run `particle login --oauth`)")?;
        let credential = Credential::OAuthCode {
            code: extract_auth_code(&code),
            verifier,
        };
        return reported(auth.login(credential, &mut notifier));
    }

    if let Some(token) = args.otp {
        let email = match args.email {
            Some(e) => e,
            None => auth
                .pending_otp_email()
                .context("no code request pending (run `particle login --email ...`)")?,
        };
        let credential = Credential::Otp {
            email: email.trim().to_string(),
            token: token.trim().to_string(),
        };
        return reported(auth.login(credential, &mut notifier));
    }

    let Some(email) = args.email else {
        anyhow::bail!("pass --email, --otp, --oauth or --code");
    };
    let email = email.trim().to_string();

    match args.password {
        Some(password) => {
            let password = if password.is_empty() {
                prompt_line("Password: ")?.context("no terminal to read the password from")?
            } else {
                password
            };
            reported(auth.login(Credential::Password { email, password }, &mut notifier))
        }
        None => {
            reported(auth.send_otp(&email, &mut notifier))?;
            println!("Finish with `particle login --otp CODE`");
            Ok(())
        }
    }
}

fn oauth_login(auth: &mut AuthHook) -> Result<()> {
    let mut notifier = StderrNotifier;
    let Some(start) = auth.begin_oauth(&mut notifier) else {
        return Err(Reported.into());
    };

    println!("{}", start.url);
    if let Err(err) = open_in_browser(&start.url) {
        tracing::warn!(error = %format!("{:#}", err), "browser not opened");
        eprintln!("Open the URL above to continue.");
    }

    match prompt_line("Paste the code or redirect URL: ")? {
        Some(value) if !value.trim().is_empty() => {
            let credential = Credential::OAuthCode {
                code: extract_auth_code(&value),
                verifier: start.verifier,
            };
            reported(auth.login(credential, &mut notifier))
        }
        _ => {
            println!("Finish with `particle login --code CODE`");
            Ok(())
        }
    }
}

pub(super) fn handle_logout_command(yes: bool) -> Result<()> {
    let ctx = open_context()?;
    let mut auth = ctx.auth_hook();
    if !auth.has_local_state() {
        println!("Not signed in");
        return Ok(());
    }

    let mut confirm = StdinConfirm { assume_yes: yes };
    if !confirm.confirm(&ConfirmPrompt::logout()) {
        eprintln!("Cancelled");
        return Ok(());
    }
    reported(auth.logout(&mut StderrNotifier))
}

pub(super) fn handle_whoami_command(json: bool) -> Result<()> {
    let ctx = open_context()?;
    let auth = ctx.auth_hook();
    let user = auth
        .user()
        .cloned()
        .context("not signed in (run `particle login`)")?;

    let profile = match select_as::<Profile>(
        ctx.client.as_ref(),
        &Query::from("profile").eq("id", &user.id),
    ) {
        Ok(mut rows) => rows.pop(),
        Err(err) => {
            tracing::warn!(error = %format!("{:#}", err), "profile lookup failed");
            None
        }
    };

    if json {
        print_json(
            &serde_json::json!({ "user": user, "profile": profile }),
            "whoami",
        )?;
        return Ok(());
    }

    println!("id: {}", user.id);
    if let Some(email) = &user.email {
        println!("email: {}", email);
    }
    if let Some(p) = profile
        && let Some(name) = p.full_name.or(p.username)
    {
        println!("name: {}", name);
    }
    println!("backend: {}", ctx.config.base_url);
    Ok(())
}
