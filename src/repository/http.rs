//! Backend access over HTTP.
//!
//! [`HttpRepository`] owns the single configured `reqwest` client (base URL,
//! bearer credentials, timeout). Entity modules implement the repository
//! traits on top of the generic helpers below.

use std::time::Duration;

use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE, HeaderMap, HeaderValue,
};
use reqwest::multipart::Form;
use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::document::DownloadedFile;
use crate::envelope::{ListEnvelope, normalize_as};
use crate::pagination::{MAX_ITEMS_PER_PAGE, PageRequest};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::filters::ListQuery;

/// Upper bound on pages followed by [`HttpRepository::list_all`].
pub const MAX_FOLLOWED_PAGES: usize = 50;

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct HttpRepository {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRepository {
    pub fn new(config: &BackendConfig) -> RepositoryResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| RepositoryError::Unexpected(format!("Invalid API token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetches one page and normalizes whichever envelope the endpoint used.
    pub(crate) async fn list<T, F>(
        &self,
        path: &str,
        query: &ListQuery<F>,
    ) -> RepositoryResult<ListEnvelope<T>>
    where
        T: DeserializeOwned,
        F: Serialize,
    {
        let url = self.url(path);
        log::debug!("GET {url} page={}", query.page.page);
        let response = self
            .client
            .get(&url)
            .query(&query.filters)
            .query(&query.page)
            .send()
            .await?;
        let body = json_body(check(response).await?).await?;
        Ok(normalize_as(body)?)
    }

    /// Follows pages until the backend reports no `next` link.
    pub(crate) async fn list_all<T, F>(&self, path: &str, filters: &F) -> RepositoryResult<Vec<T>>
    where
        T: DeserializeOwned,
        F: Serialize + Clone,
    {
        let mut query = ListQuery::new(filters.clone())
            .paginate(PageRequest::new(Some(1), Some(MAX_ITEMS_PER_PAGE)));
        let mut items = Vec::new();

        for _ in 0..MAX_FOLLOWED_PAGES {
            let envelope: ListEnvelope<T> = self.list(path, &query).await?;
            let done = !envelope.has_next() || envelope.results.is_empty();
            items.extend(envelope.results);
            if done {
                return Ok(items);
            }
            query.page = query.page.next();
        }

        log::warn!("Stopped following {path} after {MAX_FOLLOWED_PAGES} pages");
        Ok(items)
    }

    /// `None` when the backend answers 404.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> RepositoryResult<Option<T>> {
        let url = self.url(path);
        log::debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        match check(response).await {
            Ok(response) => Ok(Some(serde_json::from_value(json_body(response).await?)?)),
            Err(RepositoryError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> RepositoryResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        log::debug!("{method} {url}");
        let response = self.client.request(method, &url).json(body).send().await?;
        let body = json_body(check(response).await?).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub(crate) async fn delete(&self, path: &str) -> RepositoryResult<()> {
        let url = self.url(path);
        log::debug!("DELETE {url}");
        let response = self.client.delete(&url).send().await?;
        check(response).await?;
        Ok(())
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> RepositoryResult<T> {
        let url = self.url(path);
        log::debug!("POST {url} (multipart)");
        let response = self.client.post(&url).multipart(form).send().await?;
        let body = json_body(check(response).await?).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Downloads a blob, naming it from `Content-Disposition` when present.
    pub(crate) async fn download(&self, path: &str, default_name: &str) -> RepositoryResult<DownloadedFile> {
        let url = self.url(path);
        log::debug!("GET {url} (download)");
        let response = check(self.client.get(&url).send().await?).await?;

        let filename = header_str(response.headers(), CONTENT_DISPOSITION)
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| default_name.to_string());
        let content_type = header_str(response.headers(), CONTENT_TYPE)
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        Ok(DownloadedFile {
            filename,
            content_type,
            bytes,
        })
    }
}

fn header_str(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Passes successful responses through and turns the others into errors.
async fn check(response: Response) -> RepositoryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| {
        let trimmed: String = text.trim().chars().take(200).collect();
        Value::String(trimmed)
    });
    let err = RepositoryError::from_response(status.as_u16(), &body);
    log::debug!("Backend answered {status}: {err}");
    Err(err)
}

async fn json_body(response: Response) -> RepositoryResult<Value> {
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Keeps only the last path component so a header cannot point elsewhere.
fn base_name(name: &str) -> Option<String> {
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Extracts the filename from a `Content-Disposition` header.
///
/// RFC 5987 `filename*=UTF-8''…` takes precedence over `filename="…"`.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let mut plain = None;

    for part in header.split(';').map(str::trim) {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let encoded = value.splitn(3, '\'').nth(2).unwrap_or(value);
                if let Some(name) = percent_decode(encoded).as_deref().and_then(base_name) {
                    return Some(name);
                }
            }
            "filename" => {
                if let Some(name) = base_name(value) {
                    plain = Some(name);
                }
            }
            _ => {}
        }
    }

    plain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_filename() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="planning.pdf""#).as_deref(),
            Some("planning.pdf")
        );
    }

    #[test]
    fn extended_filename_wins() {
        let header = r#"attachment; filename="fallback.pdf"; filename*=UTF-8''na%C3%AFve%20plan.pdf"#;
        assert_eq!(filename_from_disposition(header).as_deref(), Some("naïve plan.pdf"));
    }

    #[test]
    fn malformed_extended_falls_back_to_plain() {
        let header = "attachment; filename*=UTF-8''bad%ZZ.pdf; filename=ok.pdf";
        assert_eq!(filename_from_disposition(header).as_deref(), Some("ok.pdf"));
    }

    #[test]
    fn missing_or_empty_names() {
        assert_eq!(filename_from_disposition("inline"), None);
        assert_eq!(filename_from_disposition("attachment; filename=\"\""), None);
    }

    #[test]
    fn path_components_are_stripped() {
        assert_eq!(
            filename_from_disposition("attachment; filename=\"../../etc/passwd\"").as_deref(),
            Some("passwd")
        );
    }

    #[test]
    fn urls_are_joined_without_double_slashes() {
        let repo = HttpRepository::with_client(reqwest::Client::new(), "http://api.local/api/");
        assert_eq!(repo.url("/formations/"), "http://api.local/api/formations/");
        assert_eq!(repo.url("declic/3/"), "http://api.local/api/declic/3/");
    }
}
