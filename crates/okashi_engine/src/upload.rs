use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::CONTENT_TYPE;

/// Where and how the one-shot image upload is posted.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost/LAB5/Photo_Life/get_file.php".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("upload endpoint is not a valid url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// One best-effort POST; the response body is returned verbatim as
    /// text, with no structured parsing.
    async fn upload(&self, image_png: &[u8]) -> Result<String, UploadError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: UploadSettings,
}

impl ReqwestUploader {
    pub fn new(settings: UploadSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, UploadError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| UploadError::Network(err.to_string()))
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(&self, image_png: &[u8]) -> Result<String, UploadError> {
        let endpoint = reqwest::Url::parse(&self.settings.endpoint)
            .map_err(|err| UploadError::InvalidUrl(err.to_string()))?;
        let client = self.build_client()?;

        // The receiving script reads exactly one form field: `imageStr=`
        // followed by the raw base64 text.
        let body = format!("imageStr={}", BASE64.encode(image_png));

        let response = client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(map_upload_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::HttpStatus(status.as_u16()));
        }

        response.text().await.map_err(map_upload_error)
    }
}

fn map_upload_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        return UploadError::Timeout;
    }
    UploadError::Network(err.to_string())
}
