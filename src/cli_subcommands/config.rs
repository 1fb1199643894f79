use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show the effective configuration (file plus environment overrides)
    Show {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Create or update the configuration file
    Set {
        /// Backend root URL (required the first time)
        #[arg(long)]
        url: Option<String>,
        /// Public API key (required the first time)
        #[arg(long)]
        anon_key: Option<String>,
        /// Object storage namespace for media
        #[arg(long)]
        bucket: Option<String>,
        /// Key the session is persisted under
        #[arg(long)]
        storage_key: Option<String>,

        /// Redirect URL for browser sign-in; enables `login --oauth`
        #[arg(long)]
        oauth_redirect: Option<String>,
        /// Identity provider for browser sign-in
        #[arg(long, requires = "oauth_redirect")]
        oauth_provider: Option<String>,
        /// Extra OAuth scopes
        #[arg(long, requires = "oauth_redirect")]
        oauth_scopes: Option<String>,
        /// Disable browser sign-in
        #[arg(long, conflicts_with = "oauth_redirect")]
        no_oauth: bool,

        /// Chat completion endpoint base URL; enables auto titles and summaries
        #[arg(long, requires = "completion_model")]
        completion_url: Option<String>,
        /// Chat completion model name
        #[arg(long, requires = "completion_url")]
        completion_model: Option<String>,
        /// Environment variable holding the completion API key
        #[arg(long, requires = "completion_url")]
        completion_key_env: Option<String>,
        /// Disable auto titles and summaries
        #[arg(long, conflicts_with = "completion_url")]
        no_completion: bool,
    },
}
