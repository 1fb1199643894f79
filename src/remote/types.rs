//! Wire payloads for the row, identity and storage APIs.

#[derive(Debug, Default, serde::Deserialize)]
pub(super) struct ApiErrorBody {
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) msg: Option<String>,
    #[serde(default)]
    pub(super) error: Option<String>,
    #[serde(default)]
    pub(super) error_description: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct PasswordGrant<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct RefreshGrant<'a> {
    pub(super) refresh_token: &'a str,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct PkceGrant<'a> {
    pub(super) auth_code: &'a str,
    pub(super) code_verifier: &'a str,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct OtpRequest<'a> {
    pub(super) email: &'a str,
    pub(super) create_user: bool,
}

#[derive(Debug, serde::Serialize)]
pub(super) struct VerifyRequest<'a> {
    #[serde(rename = "type")]
    pub(super) kind: &'a str,
    pub(super) email: &'a str,
    pub(super) token: &'a str,
}

#[derive(Debug, serde::Deserialize)]
pub(super) struct UploadResponse {
    #[serde(rename = "Key")]
    pub(super) key: String,
}
