use particle::context::NOT_CONFIGURED;
use particle::model::{ClientConfig, CompletionConfig, OAuthConfig};

use super::*;

pub(super) fn handle_config_command(command: ConfigCommands) -> Result<()> {
    let store = LocalStore::open_default()?;
    match command {
        ConfigCommands::Show { json } => show_config(&store, json),
        ConfigCommands::Set {
            url,
            anon_key,
            bucket,
            storage_key,
            oauth_redirect,
            oauth_provider,
            oauth_scopes,
            no_oauth,
            completion_url,
            completion_model,
            completion_key_env,
            no_completion,
        } => {
            let mut cfg = match store.read_config()? {
                Some(cfg) => cfg,
                None => ClientConfig::new(
                    url.clone()
                        .context("--url is required when no config exists yet")?,
                    anon_key
                        .clone()
                        .context("--anon-key is required when no config exists yet")?,
                ),
            };

            if let Some(url) = url {
                let parsed = url::Url::parse(&url).with_context(|| format!("invalid --url {}", url))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    anyhow::bail!("--url must be http or https");
                }
                cfg.base_url = url.trim_end_matches('/').to_string();
            }
            if let Some(key) = anon_key {
                cfg.anon_key = key;
            }
            if let Some(bucket) = bucket {
                cfg.bucket = bucket;
            }
            if let Some(key) = storage_key {
                cfg.storage_key = key;
            }

            if no_oauth {
                cfg.oauth = None;
            } else if let Some(redirect) = oauth_redirect {
                let mut oauth = cfg.oauth.take().unwrap_or_else(|| OAuthConfig::new(""));
                oauth.redirect_to = redirect;
                if let Some(p) = oauth_provider {
                    oauth.provider = p;
                }
                if oauth_scopes.is_some() {
                    oauth.scopes = oauth_scopes;
                }
                cfg.oauth = Some(oauth);
            }

            if no_completion {
                cfg.completion = None;
            } else if let (Some(base_url), Some(model)) = (completion_url, completion_model) {
                let mut completion = CompletionConfig::new(base_url, model);
                if let Some(env) = completion_key_env {
                    completion.api_key_env = env;
                }
                cfg.completion = Some(completion);
            }

            store.write_config(&cfg)?;
            tracing::info!(url = %cfg.base_url, "config saved");
            println!("Saved {}", store.root().join("config.json").display());
            Ok(())
        }
    }
}

fn mask(secret: &str) -> String {
    let shown: String = secret.chars().take(6).collect();
    if shown.len() < secret.len() {
        format!("{}...", shown)
    } else {
        shown
    }
}

fn show_config(store: &LocalStore, json: bool) -> Result<()> {
    let cfg = store.load_config()?.context(NOT_CONFIGURED)?;
    if json {
        return print_json(&cfg, "config");
    }

    println!("home: {}", store.root().display());
    println!("url: {}", cfg.base_url);
    println!("anon_key: {}", mask(&cfg.anon_key));
    println!("bucket: {}", cfg.bucket);
    println!("storage_key: {}", cfg.storage_key);
    match &cfg.oauth {
        Some(o) => println!("oauth: {} -> {}", o.provider, o.redirect_to),
        None => println!("oauth: off"),
    }
    match &cfg.completion {
        Some(c) => println!("completion: {} ({}, key in ${})", c.base_url, c.model, c.api_key_env),
        None => println!("completion: off"),
    }
    Ok(())
}
