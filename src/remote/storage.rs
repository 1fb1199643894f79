use super::*;

impl RemoteClient {
    pub fn upload_object(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let bucket = &self.config.bucket;
        let size = bytes.len();
        let resp = self
            .request(
                reqwest::Method::POST,
                &format!("/storage/v1/object/{}/{}", bucket, key),
            )
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .context("upload object")?;
        let out: UploadResponse = self
            .ensure_ok(resp, "upload object")?
            .json()
            .context("parse upload response")?;

        // The store answers with `<bucket>/<key>`; callers keep the bare key.
        let prefix = format!("{}/", bucket);
        let stored = out
            .key
            .strip_prefix(&prefix)
            .unwrap_or(&out.key)
            .to_string();
        tracing::info!(key = %stored, size, "uploaded media object");
        Ok(stored)
    }

    pub fn public_url(&self, key: &str) -> String {
        self.url(&format!(
            "/storage/v1/object/public/{}/{}",
            self.config.bucket, key
        ))
    }
}
