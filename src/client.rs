//! Zenodo deposition API client.
//!
//! Blocking reqwest client (no Tokio runtime required).
//! Covers the full deposit lifecycle: create, retrieve, upload, edit
//! metadata, publish, new version, delete files.
//!
//! No retries, no backoff, no local enforcement of the remote state
//! machine beyond the [`Draft`]/[`Published`] typestate. The service has
//! the final word; a rejected request comes back as
//! [`ZenodoError::Remote`] with the status and body intact.

use std::path::Path;
use std::time::Duration;

use crate::deposit::{
    AnyDeposit, Deposit, DepositFile, Draft, Published, RawDeposit, UploadTag, UploadedFile,
};

/// Default host for throwaway test records.
pub const SANDBOX_API_BASE: &str = "https://sandbox.zenodo.org";
/// The real thing. Published records here are permanent.
pub const PRODUCTION_API_BASE: &str = "https://zenodo.org";

/// Error type for deposit operations.
#[derive(Debug)]
pub enum ZenodoError {
    /// Local file access failed (token file, upload source)
    Io(String),
    /// Transport-level failure (connect, timeout, TLS)
    Network(String),
    /// Non-success HTTP status from the service, body preserved verbatim
    Remote { status: u16, body: String },
    /// Response body was not the JSON shape this client consumes
    Parse(String),
    /// The handle lacks the action URL this operation needs
    MissingLink(&'static str),
}

impl std::fmt::Display for ZenodoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZenodoError::Io(msg) => write!(f, "I/O error: {}", msg),
            ZenodoError::Network(msg) => write!(f, "Network error: {}", msg),
            ZenodoError::Remote { status, body } => {
                write!(f, "Remote service rejected request (HTTP {}): {}", status, body)
            }
            ZenodoError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ZenodoError::MissingLink(name) => write!(
                f,
                "deposit handle has no '{}' link; it must come from a prior call that provides one",
                name
            ),
        }
    }
}

impl std::error::Error for ZenodoError {}

/// Zenodo deposition client (blocking).
///
/// Holds the access token for the session. The token is sent as the
/// `access_token` query parameter on every request, which is the wire
/// contract of the deposition API.
#[derive(Clone)]
pub struct ZenodoClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

impl ZenodoClient {
    /// Create a client against an explicit base URL.
    pub fn new(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("zenodozen/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Client against the sandbox host.
    pub fn sandbox(token: impl Into<String>) -> Self {
        Self::new(token, SANDBOX_API_BASE)
    }

    /// Client against the production host.
    pub fn production(token: impl Into<String>) -> Self {
        Self::new(token, PRODUCTION_API_BASE)
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Create a new deposit with an empty payload.
    ///
    /// Allocates a fresh remote record; the returned draft handle carries
    /// the action links for everything that follows.
    pub fn create_deposit(&self) -> Result<Deposit<Draft>, ZenodoError> {
        let url = format!("{}/api/deposit/depositions", self.api_base);
        let resp = self.send(self.http.post(&url).json(&serde_json::json!({})))?;
        let raw: RawDeposit = parse_json(resp)?;
        log::info!("Created new deposit with id {}", raw.id);
        Ok(raw.into_state())
    }

    /// Fetch the current state of an existing deposit by record id.
    ///
    /// The draft/published distinction is decided here at runtime from the
    /// remote `submitted` flag. An unknown id surfaces as
    /// [`ZenodoError::Remote`] with status 404 for the caller to inspect.
    pub fn retrieve_deposit(&self, id: u64) -> Result<AnyDeposit, ZenodoError> {
        let url = format!("{}/api/deposit/depositions/{}", self.api_base, id);
        let resp = self.send(self.http.get(&url))?;
        let raw: RawDeposit = parse_json(resp)?;
        log::debug!("Retrieved deposit {} (submitted: {})", raw.id, raw.submitted);
        Ok(raw.classify())
    }

    /// Stream a local file into the draft's storage bucket.
    ///
    /// The remote object name is derived from the tag and the file's base
    /// name (see [`UploadTag::object_name`]). No retry; a transport
    /// failure mid-upload is surfaced as [`ZenodoError::Network`].
    pub fn upload_file(
        &self,
        draft: &Deposit<Draft>,
        local_path: impl AsRef<Path>,
        tag: &UploadTag,
    ) -> Result<UploadedFile, ZenodoError> {
        let local_path = local_path.as_ref();
        let bucket = require_link(&draft.links.bucket, "bucket")?;
        let object_name = tag.object_name(local_path);

        let file = std::fs::File::open(local_path)
            .map_err(|e| ZenodoError::Io(format!("{}: {}", local_path.display(), e)))?;

        let url = format!("{}/{}", bucket, object_name);
        let resp = self.send(self.http.put(&url).body(file))?;
        log::debug!("Uploaded {} as {}", local_path.display(), object_name);
        parse_json(resp)
    }

    /// Delete every file currently attached to the draft.
    ///
    /// Lists the files, then issues one delete per entry, sequentially,
    /// stopping at the first failure. There is no rollback; a partial
    /// failure leaves some files deleted and others not. Returns the
    /// listing snapshot taken before the deletes, which no longer
    /// reflects remote state by the time it is returned.
    pub fn delete_all_files(
        &self,
        draft: &Deposit<Draft>,
    ) -> Result<Vec<DepositFile>, ZenodoError> {
        let files_url = require_link(&draft.links.files, "files")?;
        let resp = self.send(self.http.get(files_url))?;
        let listing: Vec<DepositFile> = parse_json(resp)?;

        for file in &listing {
            let url = require_link(&file.links.self_url, "self")?;
            self.send(self.http.delete(url))?;
        }

        log::info!("Deleted {} file(s) from draft {}", listing.len(), draft.id);
        Ok(listing)
    }

    /// Set the publication date to today and optionally replace the
    /// description, resubmitting all other metadata unchanged.
    ///
    /// The date is the local calendar date in `YYYY-MM-DD` form. Returns
    /// the updated draft handle from the service's response; the input
    /// handle is left as it was.
    pub fn set_publication_metadata(
        &self,
        draft: &Deposit<Draft>,
        description: Option<&str>,
    ) -> Result<Deposit<Draft>, ZenodoError> {
        let draft_url = require_link(&draft.links.latest_draft, "latest_draft")?;

        let mut metadata = draft.metadata.clone();
        metadata.publication_date = Some(chrono::Local::now().format("%Y-%m-%d").to_string());
        if let Some(desc) = description {
            metadata.description = Some(desc.to_string());
        }

        let body = serde_json::json!({ "metadata": metadata });
        let resp = self.send(self.http.put(draft_url).json(&body))?;
        let raw: RawDeposit = parse_json(resp)?;
        Ok(raw.into_state())
    }

    /// Publish the draft, making this version final.
    ///
    /// Consumes the draft handle; after this call the record can only be
    /// changed by creating a new version. No local pre-check that the
    /// draft has files: the service rejects a zero-file publish and that
    /// rejection comes back as [`ZenodoError::Remote`].
    pub fn publish(&self, draft: Deposit<Draft>) -> Result<Deposit<Published>, ZenodoError> {
        let url = require_link(&draft.links.publish, "publish")?;
        let resp = self.send(self.http.post(url))?;
        let raw: RawDeposit = parse_json(resp)?;
        log::info!("Published deposit {}", raw.id);
        Ok(raw.into_state())
    }

    /// Create a new draft version of a published deposit.
    ///
    /// Two sequential calls: the newversion action, then a fetch of the
    /// resulting draft via its `latest_draft` link. If the second call
    /// fails, the new version exists remotely with no handle to it; the
    /// caller must re-retrieve by id. When a description is given, a
    /// third call applies it together with today's publication date.
    pub fn create_new_version(
        &self,
        published: &Deposit<Published>,
        description: Option<&str>,
    ) -> Result<Deposit<Draft>, ZenodoError> {
        let url = require_link(&published.links.newversion, "newversion")?;
        log::debug!("Requesting new version via {}", url);
        let resp = self.send(self.http.post(url))?;
        let raw: RawDeposit = parse_json(resp)?;

        let draft_url = require_link(&raw.links.latest_draft, "latest_draft")?;
        let resp = self.send(self.http.get(draft_url))?;
        let draft: Deposit<Draft> = parse_json::<RawDeposit>(resp)?.into_state();
        log::info!(
            "Created new draft {} from published deposit {}",
            draft.id,
            published.id
        );

        if description.is_some() {
            return self.set_publication_metadata(&draft, description);
        }
        Ok(draft)
    }

    // ── Internal helpers ────────────────────────────────────────────

    /// Attach the token and send, mapping transport failures and
    /// non-success statuses to their error variants.
    fn send(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::Response, ZenodoError> {
        let response = req
            .query(&[("access_token", self.token.as_str())])
            .send()
            .map_err(|e| ZenodoError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ZenodoError::Remote { status, body });
        }

        Ok(response)
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::blocking::Response,
) -> Result<T, ZenodoError> {
    resp.json().map_err(|e| ZenodoError::Parse(e.to_string()))
}

fn require_link<'a>(
    link: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, ZenodoError> {
    link.as_deref().ok_or(ZenodoError::MissingLink(name))
}
