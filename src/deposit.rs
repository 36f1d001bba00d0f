//! Typed deposit model.
//!
//! The Zenodo API answers every deposition call with a JSON document
//! describing the deposit's current remote state. This module types the
//! parts of that document the client actually consumes: the numeric id, the
//! action links used to drive follow-up calls, the metadata object, and the
//! attached-file listing. Everything else in the response is ignored, except
//! metadata keys, which are preserved verbatim so edits round-trip fields the
//! client does not interpret.

use std::marker::PhantomData;
use std::path::Path;

use serde::{Deserialize, Serialize};

// ── State markers ───────────────────────────────────────────────────

/// Marker: the deposit is an editable draft.
#[derive(Debug, Clone, Copy)]
pub struct Draft;

/// Marker: the deposit has been published and is final for this version.
#[derive(Debug, Clone, Copy)]
pub struct Published;

// ── Deposit handle ──────────────────────────────────────────────────

/// A deposit's remote state as of the most recent response.
///
/// Each operation returns a fresh handle; nothing is mutated in place.
/// The `S` marker ([`Draft`] or [`Published`]) records which lifecycle
/// state the handle was in when the service produced it.
#[derive(Debug, Clone)]
pub struct Deposit<S> {
    /// Numeric record id.
    pub id: u64,
    /// Action URLs for follow-up calls.
    pub links: DepositLinks,
    /// Descriptive metadata as last reported by the service.
    pub metadata: DepositMetadata,
    /// Files attached to the deposit, as of this response.
    pub files: Vec<DepositFile>,
    state: PhantomData<S>,
}

/// Action links embedded in a deposition response.
///
/// Which links are present depends on the deposit's state; an operation
/// that needs an absent link fails with `ZenodoError::MissingLink` before
/// any network traffic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepositLinks {
    /// Upload target for file objects (draft only).
    pub bucket: Option<String>,
    /// The current editable draft of this record.
    pub latest_draft: Option<String>,
    /// Publish action (draft only).
    pub publish: Option<String>,
    /// New-version action (published only).
    pub newversion: Option<String>,
    /// Listing of attached files.
    pub files: Option<String>,
    #[serde(rename = "self")]
    pub self_url: Option<String>,
}

/// Deposit metadata, with only the fields this client edits typed out.
///
/// All other keys pass through `extra` untouched, so a metadata update
/// resubmits whatever title, creators, upload type, etc. the deposit
/// already carried.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepositMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One entry of a deposit's file listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositFile {
    pub id: Option<String>,
    pub filename: String,
    pub filesize: Option<u64>,
    pub checksum: Option<String>,
    #[serde(default)]
    pub links: FileLinks,
}

/// Links on a file-listing entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileLinks {
    #[serde(rename = "self")]
    pub self_url: Option<String>,
    pub download: Option<String>,
}

/// The bucket's response to a completed upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    /// Object name the file was stored under.
    pub key: String,
    pub size: Option<u64>,
    pub checksum: Option<String>,
}

// ── Retrieval result ────────────────────────────────────────────────

/// A retrieved deposit, classified by the remote `submitted` flag.
///
/// Retrieval is the one seam where the draft/published distinction is
/// decided at runtime rather than in the types.
#[derive(Debug, Clone)]
pub enum AnyDeposit {
    Draft(Deposit<Draft>),
    Published(Deposit<Published>),
}

impl AnyDeposit {
    pub fn id(&self) -> u64 {
        match self {
            AnyDeposit::Draft(d) => d.id,
            AnyDeposit::Published(d) => d.id,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, AnyDeposit::Draft(_))
    }

    pub fn into_draft(self) -> Option<Deposit<Draft>> {
        match self {
            AnyDeposit::Draft(d) => Some(d),
            AnyDeposit::Published(_) => None,
        }
    }

    pub fn into_published(self) -> Option<Deposit<Published>> {
        match self {
            AnyDeposit::Published(d) => Some(d),
            AnyDeposit::Draft(_) => None,
        }
    }
}

// ── Wire form ───────────────────────────────────────────────────────

/// Deserialized deposition response before state classification.
#[derive(Debug, Deserialize)]
pub(crate) struct RawDeposit {
    pub id: u64,
    #[serde(default)]
    pub links: DepositLinks,
    #[serde(default)]
    pub metadata: DepositMetadata,
    #[serde(default)]
    pub files: Vec<DepositFile>,
    #[serde(default)]
    pub submitted: bool,
}

impl RawDeposit {
    pub(crate) fn into_state<S>(self) -> Deposit<S> {
        Deposit {
            id: self.id,
            links: self.links,
            metadata: self.metadata,
            files: self.files,
            state: PhantomData,
        }
    }

    pub(crate) fn classify(self) -> AnyDeposit {
        if self.submitted {
            AnyDeposit::Published(self.into_state())
        } else {
            AnyDeposit::Draft(self.into_state())
        }
    }
}

// ── Remote object naming ────────────────────────────────────────────

/// Scope/project/version triple prefixed onto uploaded object names.
///
/// `UploadTag::new("IGWN", "GWTC2", "1")` applied to `GW150914.json`
/// yields `IGWN-GWTC2-1-GW150914.json`. There is no `v` marker before the
/// version segment; the deployed naming convention omits it.
#[derive(Debug, Clone)]
pub struct UploadTag {
    pub scope: String,
    pub project: String,
    pub version: String,
}

impl UploadTag {
    pub fn new(
        scope: impl Into<String>,
        project: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            scope: scope.into(),
            project: project.into(),
            version: version.into(),
        }
    }

    /// Derive the remote object name for a local file.
    pub fn object_name(&self, local_path: &Path) -> String {
        let base = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}-{}-{}-{}", self.scope, self.project, self.version, base)
    }
}
