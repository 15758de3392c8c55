// src/wiki/http.rs

//! MediaWiki action API and REST rendering endpoint over reqwest.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, NetworkError, Result};
use crate::models::{Config, ImageMetadata, MediaType, PageDescriptor};
use crate::utils::http::create_async_client;
use crate::utils::resolve_url;
use crate::utils::retry::RetryPolicy;

use super::{PAGE_BATCH_SIZE, PageBatch, WikiClient};

/// Production [`WikiClient`].
pub struct HttpWikiClient {
    client: Client,
    api_url: Url,
    render_url: String,
    pin_revision: bool,
    api_policy: RetryPolicy,
    content_policy: RetryPolicy,
}

impl HttpWikiClient {
    /// Create a client for the wiki named in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            api_url: Url::parse(&config.api_url())?,
            render_url: config.render_url(),
            pin_revision: config.wiki.pin_revision,
            api_policy: RetryPolicy::generic(&config.retry),
            content_policy: RetryPolicy::content(&config.retry),
        })
    }

    /// Rendering URL for a page.
    fn render_target(&self, page: &PageDescriptor) -> String {
        let title = page.title.replace(' ', "_");
        let mut target = format!("{}{}", self.render_url, urlencoding::encode(&title));
        if self.pin_revision {
            target.push('/');
            target.push_str(&page.page_id.to_string());
        }
        target
    }

    /// Issue an `action=query` request and decode its body.
    async fn query<T>(&self, label: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut pairs: Vec<(&str, String)> = vec![
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("formatversion", "2".to_string()),
        ];
        pairs.extend(params.iter().cloned());

        let envelope: Envelope<T> = self
            .api_policy
            .execute(label, || {
                let client = &self.client;
                let url = self.api_url.clone();
                let pairs = &pairs;
                async move {
                    let response = client
                        .get(url)
                        .query(pairs)
                        .send()
                        .await
                        .map_err(|e| NetworkError::from_reqwest(&e))?;
                    let bytes = check_status(response)?
                        .bytes()
                        .await
                        .map_err(|e| NetworkError::from_reqwest(&e))?;
                    serde_json::from_slice(&bytes).map_err(NetworkError::malformed)
                }
            })
            .await
            .map_err(|e| AppError::network(label, e))?;

        match envelope.error {
            Some(error) => Err(AppError::Api {
                code: error.code,
                info: error.info,
            }),
            None => Ok(envelope.body),
        }
    }

    /// First `imageinfo` entry for `name`, if the wiki has one.
    async fn first_image_info(
        &self,
        label: &str,
        name: &str,
        extra: &[(&str, String)],
    ) -> Result<Option<RawImageInfo>> {
        let mut params = vec![
            ("prop", "imageinfo".to_string()),
            ("titles", name.to_string()),
        ];
        params.extend(extra.iter().cloned());
        let response: ImageInfoResponse = self.query(label, &params).await?;
        Ok(response.first_info())
    }
}

#[async_trait]
impl WikiClient for HttpWikiClient {
    async fn list_pages(&self, cursor: Option<&str>) -> Result<PageBatch> {
        let mut params = vec![
            ("list", "allpages".to_string()),
            ("apnamespace", "0".to_string()),
            ("apfilterredir", "nonredirects".to_string()),
            ("aplimit", PAGE_BATCH_SIZE.to_string()),
        ];
        if let Some(cursor) = cursor {
            params.push(("apcontinue", cursor.to_string()));
        }
        let response: AllPagesResponse = self.query("allpages", &params).await?;
        Ok(response.into_batch())
    }

    async fn image_info(&self, name: &str) -> Result<Option<ImageMetadata>> {
        let info = self
            .first_image_info("imageinfo", name, &[("iiprop", "size|mediatype".to_string())])
            .await?;
        Ok(info.and_then(|info| info.into_metadata(name)))
    }

    async fn thumbnail_url(&self, name: &str, bounding_box: u32) -> Result<Option<String>> {
        let extra = [
            ("iiprop", "url".to_string()),
            ("iiurlwidth", bounding_box.to_string()),
            ("iiurlheight", bounding_box.to_string()),
        ];
        let info = self.first_image_info("thumburl", name, &extra).await?;
        Ok(info
            .and_then(|info| info.thumburl)
            .map(|url| resolve_url(&self.api_url, &url)))
    }

    async fn render_page(&self, page: &PageDescriptor) -> Result<String> {
        let target = self.render_target(page);
        self.content_policy
            .execute(&page.title, || {
                let client = &self.client;
                let target = target.as_str();
                async move {
                    let response = client
                        .get(target)
                        .send()
                        .await
                        .map_err(|e| NetworkError::from_reqwest(&e))?;
                    check_status(response)?
                        .text()
                        .await
                        .map_err(|e| NetworkError::from_reqwest(&e))
                }
            })
            .await
            .map_err(|e| AppError::network(target.as_str(), e))
    }

    async fn fetch_length(&self, url: &str) -> Result<usize> {
        self.api_policy
            .execute(url, || {
                let client = &self.client;
                async move {
                    let response = client
                        .get(url)
                        .send()
                        .await
                        .map_err(|e| NetworkError::from_reqwest(&e))?;
                    let bytes = check_status(response)?
                        .bytes()
                        .await
                        .map_err(|e| NetworkError::from_reqwest(&e))?;
                    Ok(bytes.len())
                }
            })
            .await
            .map_err(|e| AppError::network(url, e))
    }
}

fn check_status(response: Response) -> std::result::Result<Response, NetworkError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(NetworkError::Status {
            code: status.as_u16(),
        })
    }
}

// --- Response shapes (formatversion=2) ---

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    error: Option<ApiErrorBody>,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize, Default)]
struct AllPagesResponse {
    #[serde(default)]
    query: AllPagesQuery,
    #[serde(rename = "continue", default)]
    continuation: Option<AllPagesContinue>,
}

#[derive(Debug, Deserialize, Default)]
struct AllPagesQuery {
    #[serde(default)]
    allpages: Vec<PageDescriptor>,
}

#[derive(Debug, Deserialize)]
struct AllPagesContinue {
    #[serde(default)]
    apcontinue: Option<String>,
}

impl AllPagesResponse {
    fn into_batch(self) -> PageBatch {
        PageBatch {
            pages: self.query.allpages,
            next: self.continuation.and_then(|c| c.apcontinue),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct ImageInfoResponse {
    #[serde(default)]
    query: ImageInfoQuery,
}

#[derive(Debug, Deserialize, Default)]
struct ImageInfoQuery {
    #[serde(default)]
    pages: Vec<ImageInfoPage>,
}

#[derive(Debug, Deserialize)]
struct ImageInfoPage {
    #[serde(default)]
    imageinfo: Vec<RawImageInfo>,
}

#[derive(Debug, Deserialize)]
struct RawImageInfo {
    width: Option<u32>,
    height: Option<u32>,
    mediatype: Option<String>,
    thumburl: Option<String>,
}

impl ImageInfoResponse {
    /// The first entry of the first page; absent for unknown files.
    fn first_info(self) -> Option<RawImageInfo> {
        self.query
            .pages
            .into_iter()
            .next()
            .and_then(|page| page.imageinfo.into_iter().next())
    }
}

impl RawImageInfo {
    /// Complete metadata, or `None` when any field is missing.
    fn into_metadata(self, name: &str) -> Option<ImageMetadata> {
        Some(ImageMetadata::new(
            name,
            self.width?,
            self.height?,
            MediaType::from(self.mediatype?),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn client(config: &Config) -> HttpWikiClient {
        HttpWikiClient::new(config).unwrap()
    }

    #[test]
    fn test_allpages_batch_with_continuation() {
        let json = r#"{
            "batchcomplete": true,
            "continue": {"apcontinue": "Abc", "continue": "-||"},
            "query": {"allpages": [
                {"pageid": 1, "ns": 0, "title": "A"},
                {"pageid": 2, "ns": 0, "title": "Ab"}
            ]}
        }"#;
        let envelope: Envelope<AllPagesResponse> = serde_json::from_str(json).unwrap();
        assert!(envelope.error.is_none());
        let batch = envelope.body.into_batch();
        assert_eq!(batch.pages.len(), 2);
        assert_eq!(batch.pages[1], PageDescriptor::new("Ab", 2));
        assert_eq!(batch.next.as_deref(), Some("Abc"));
    }

    #[test]
    fn test_allpages_last_batch_has_no_cursor() {
        let json = r#"{"batchcomplete": true, "query": {"allpages": []}}"#;
        let envelope: Envelope<AllPagesResponse> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.body.into_batch(), PageBatch::default());
    }

    #[test]
    fn test_api_error_is_captured() {
        let json = r#"{"error": {"code": "badcontinue", "info": "Invalid continue param."}}"#;
        let envelope: Envelope<AllPagesResponse> = serde_json::from_str(json).unwrap();
        let error = envelope.error.unwrap();
        assert_eq!(error.code, "badcontinue");
    }

    #[test]
    fn test_imageinfo_first_entry() {
        let json = r#"{"query": {"pages": [{
            "ns": 6, "title": "File:Foo.jpg",
            "imageinfo": [{"width": 600, "height": 800, "mediatype": "BITMAP"}]
        }]}}"#;
        let response: ImageInfoResponse = serde_json::from_str(json).unwrap();
        let metadata = response.first_info().unwrap().into_metadata("File:Foo.jpg");
        assert_eq!(
            metadata,
            Some(ImageMetadata::new("File:Foo.jpg", 600, 800, MediaType::Bitmap))
        );
    }

    #[test]
    fn test_imageinfo_missing_file() {
        let json = r#"{"query": {"pages": [{
            "ns": 6, "title": "File:Nope.jpg", "missing": true, "imagerepository": ""
        }]}}"#;
        let response: ImageInfoResponse = serde_json::from_str(json).unwrap();
        assert!(response.first_info().is_none());
    }

    #[test]
    fn test_imageinfo_partial_fields_are_not_metadata() {
        let json = r#"{"query": {"pages": [{"imageinfo": [{"width": 600}]}]}}"#;
        let response: ImageInfoResponse = serde_json::from_str(json).unwrap();
        assert!(response.first_info().unwrap().into_metadata("x").is_none());
    }

    #[test]
    fn test_imageinfo_thumburl() {
        let json = r#"{"query": {"pages": [{"imageinfo": [{
            "thumburl": "https://upload.wikimedia.org/thumb/a/ab/Foo.jpg/165px-Foo.jpg",
            "thumbwidth": 165, "thumbheight": 220
        }]}]}}"#;
        let response: ImageInfoResponse = serde_json::from_str(json).unwrap();
        let info = response.first_info().unwrap();
        assert!(info.thumburl.unwrap().ends_with("165px-Foo.jpg"));
    }

    #[test]
    fn test_render_target_encodes_title() {
        let config = Config::default();
        let page = PageDescriptor::new("AC/DC live", 42);
        assert_eq!(
            client(&config).render_target(&page),
            "https://en.wikipedia.org/api/rest_v1/page/html/AC%2FDC_live"
        );
    }

    /// Serve `responses` in order, one per connection, then 404.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let hit = counter.fetch_add(1, Ordering::SeqCst);
                let (status, body) = responses.get(hit).copied().unwrap_or((404, ""));
                let response = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        (format!("http://{addr}/w/api.php"), hits)
    }

    fn local_config(api_url: String) -> Config {
        let mut config = Config::default();
        config.wiki.api_url = Some(api_url);
        config.retry.backoff_step_secs = 0;
        config
    }

    const BATCH: &str = r#"{"batchcomplete": true, "query": {"allpages": [
        {"pageid": 7, "ns": 0, "title": "Foo"}
    ]}}"#;

    #[tokio::test]
    async fn test_index_retries_unavailable_server() {
        let (url, hits) = serve(vec![(503, ""), (429, ""), (200, BATCH)]).await;
        let wiki = client(&local_config(url));

        let batch = wiki.list_pages(None).await.unwrap();

        assert_eq!(batch.pages, vec![PageDescriptor::new("Foo", 7)]);
        assert_eq!(batch.next, None);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_index_gives_up_after_budget() {
        let (url, hits) = serve(vec![(503, ""); 10]).await;
        let wiki = client(&local_config(url));

        let err = wiki.list_pages(None).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Network {
                source: NetworkError::Status { code: 503 },
                ..
            }
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_thumbnail_fetch_fails_fast_on_forbidden() {
        let (url, hits) = serve(vec![(403, "")]).await;
        let wiki = client(&local_config(url.clone()));

        assert!(wiki.fetch_length(&url).await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_thumbnail_fetch_measures_body_after_retry() {
        let (url, hits) = serve(vec![(502, ""), (200, "0123456789")]).await;
        let wiki = client(&local_config(url.clone()));

        assert_eq!(wiki.fetch_length(&url).await.unwrap(), 10);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_render_target_pins_revision() {
        let mut config = Config::default();
        config.wiki.pin_revision = true;
        config.wiki.render_url = Some("http://parsoid.local/enwiki".to_string());
        let page = PageDescriptor::new("Foo", 42);
        assert_eq!(
            client(&config).render_target(&page),
            "http://parsoid.local/enwiki/Foo/42"
        );
    }
}
