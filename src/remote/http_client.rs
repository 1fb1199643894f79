use super::*;

impl RemoteClient {
    /// Maps a non-success response to an error carrying the backend's message.
    pub(super) fn ensure_ok(
        &self,
        resp: reqwest::blocking::Response,
        label: &str,
    ) -> Result<reqwest::blocking::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        let msg = error_message(&body).unwrap_or_else(|| match status {
            reqwest::StatusCode::UNAUTHORIZED => {
                "unauthorized (session missing or expired; run `particle login`)".to_string()
            }
            reqwest::StatusCode::FORBIDDEN => "forbidden".to_string(),
            _ => format!("{} failed with status {}", label, status),
        });
        tracing::debug!(%status, label, "remote call failed");
        Err(anyhow!(msg))
    }

    /// Bearer for row/storage calls: the session's access token, else the public key.
    pub(super) fn bearer(&self) -> String {
        let token = self
            .cached_session()
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.config.anon_key.clone());
        format!("Bearer {}", token)
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    pub(super) fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> reqwest::blocking::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("apikey", &self.config.anon_key)
            .header(reqwest::header::AUTHORIZATION, self.bearer())
    }
}

/// Pulls a human-readable message out of a PostgREST/GoTrue/storage error body.
pub(super) fn error_message(body: &str) -> Option<String> {
    let v: ApiErrorBody = serde_json::from_str(body).ok()?;
    [v.message, v.error_description, v.msg, v.error]
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "../tests/remote/http_client_tests.rs"]
mod tests;
