use clap::Args;

#[derive(Args)]
pub(crate) struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub(crate) email: Option<String>,
    /// Password; prompted for when the flag is given without a value
    #[arg(long, num_args = 0..=1, default_missing_value = "", requires = "email")]
    pub(crate) password: Option<String>,
    /// One-time code from the sign-in email
    #[arg(long, conflicts_with = "password")]
    pub(crate) otp: Option<String>,
    /// Start a browser sign-in
    #[arg(long, conflicts_with_all = ["email", "password", "otp", "code"])]
    pub(crate) oauth: bool,
    /// Authorization code (or the whole redirect URL) of a browser sign-in
    #[arg(long, conflicts_with_all = ["email", "password", "otp"])]
    pub(crate) code: Option<String>,
}

#[derive(Args)]
pub(crate) struct LogoutArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub(crate) yes: bool,
}

#[derive(Args)]
pub(crate) struct WhoamiArgs {
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}
