//! Row operations against `/rest/v1/{relation}` plus the media namespace.

use super::*;

fn filter_pairs(filters: &[Filter]) -> Vec<(String, String)> {
    filters.iter().map(Filter::to_pair).collect()
}

impl Backend for RemoteClient {
    fn select_rows(&self, query: &Query) -> Result<Vec<serde_json::Value>> {
        let label = format!("select {}", query.relation);
        let resp = self
            .request(reqwest::Method::GET, &format!("/rest/v1/{}", query.relation))
            .query(&query.to_pairs())
            .send()
            .with_context(|| label.clone())?;
        let rows: Vec<serde_json::Value> = self
            .ensure_ok(resp, &label)?
            .json()
            .with_context(|| format!("parse {} rows", query.relation))?;
        tracing::debug!(relation = %query.relation, rows = rows.len(), "selected rows");
        Ok(rows)
    }

    fn insert_row(&self, relation: &str, row: &serde_json::Value) -> Result<serde_json::Value> {
        let label = format!("insert {}", relation);
        let resp = self
            .request(reqwest::Method::POST, &format!("/rest/v1/{}", relation))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .with_context(|| label.clone())?;
        let mut rows: Vec<serde_json::Value> = self
            .ensure_ok(resp, &label)?
            .json()
            .with_context(|| format!("parse inserted {} row", relation))?;
        if rows.is_empty() {
            anyhow::bail!("{} returned no row", label);
        }
        Ok(rows.swap_remove(0))
    }

    fn update_rows(
        &self,
        relation: &str,
        filters: &[Filter],
        patch: &serde_json::Value,
    ) -> Result<()> {
        let label = format!("update {}", relation);
        let resp = self
            .request(reqwest::Method::PATCH, &format!("/rest/v1/{}", relation))
            .header("Prefer", "return=minimal")
            .query(&filter_pairs(filters))
            .json(patch)
            .send()
            .with_context(|| label.clone())?;
        self.ensure_ok(resp, &label)?;
        Ok(())
    }

    fn delete_rows(&self, relation: &str, filters: &[Filter]) -> Result<()> {
        let label = format!("delete {}", relation);
        let resp = self
            .request(reqwest::Method::DELETE, &format!("/rest/v1/{}", relation))
            .query(&filter_pairs(filters))
            .send()
            .with_context(|| label.clone())?;
        self.ensure_ok(resp, &label)?;
        Ok(())
    }

    fn upload_media(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        self.upload_object(key, bytes, content_type)
    }

    fn media_url(&self, key: &str) -> String {
        self.public_url(key)
    }
}
