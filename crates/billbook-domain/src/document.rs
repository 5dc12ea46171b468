//! Source documents and their transport encoding
//!
//! A [`SourceDocument`] is the uploaded file as the user selected it. It is
//! checked once at intake ([`SourceDocument::accept`]) and never mutated
//! afterwards. The extraction service receives it as a [`DataBlob`], a
//! base64 payload tagged with its MIME type (`data:<mime>;base64,<payload>`).

use crate::error::{DataUriError, IntakeError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// Default per-file size limit (5 MiB)
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Document formats accepted for ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// `application/pdf`
    Pdf,
    /// `image/png`
    Png,
    /// `image/jpeg`
    Jpeg,
}

impl DocumentKind {
    /// Canonical MIME type
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Png => "image/png",
            DocumentKind::Jpeg => "image/jpeg",
        }
    }

    /// Resolve a MIME type string, ignoring case and parameters
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            "application/pdf" => Some(DocumentKind::Pdf),
            "image/png" => Some(DocumentKind::Png),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(DocumentKind::Jpeg),
            _ => None,
        }
    }

    /// Whether the format is a raster image (as opposed to PDF)
    pub fn is_image(&self) -> bool {
        !matches!(self, DocumentKind::Pdf)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// An uploaded invoice file: name, format and raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    file_name: String,
    kind: DocumentKind,
    bytes: Vec<u8>,
}

impl SourceDocument {
    /// Check a selected file and wrap it as a source document
    ///
    /// The MIME type is taken from `declared_mime` when given, otherwise
    /// guessed from the file extension.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::UnsupportedType`] for anything but PDF, PNG, JPEG
    /// - [`IntakeError::Empty`] for a zero-length file
    /// - [`IntakeError::TooLarge`] when `bytes.len() > max_bytes`
    ///
    /// # Examples
    ///
    /// ```
    /// use billbook_domain::{DocumentKind, SourceDocument, MAX_FILE_BYTES};
    ///
    /// let doc = SourceDocument::accept("bill.pdf", b"%PDF-1.7".to_vec(), None, MAX_FILE_BYTES).unwrap();
    /// assert_eq!(doc.kind(), DocumentKind::Pdf);
    ///
    /// assert!(SourceDocument::accept("notes.txt", b"hi".to_vec(), None, MAX_FILE_BYTES).is_err());
    /// ```
    pub fn accept(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        declared_mime: Option<&str>,
        max_bytes: usize,
    ) -> Result<Self, IntakeError> {
        let file_name = file_name.into();

        let mime = match declared_mime {
            Some(mime) => mime.to_string(),
            None => mime_guess::from_path(&file_name)
                .first()
                .map(|m| m.essence_str().to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string()),
        };

        let kind = DocumentKind::from_mime(&mime).ok_or(IntakeError::UnsupportedType(mime))?;

        if bytes.is_empty() {
            return Err(IntakeError::Empty);
        }
        if bytes.len() > max_bytes {
            return Err(IntakeError::TooLarge {
                size: bytes.len(),
                max: max_bytes,
            });
        }

        Ok(Self {
            file_name,
            kind,
            bytes,
        })
    }

    /// Original file name
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Document format
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Raw file content
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for an accepted document
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encode for transmission to the extraction service
    pub fn to_data_blob(&self) -> DataBlob {
        DataBlob::from_document(self)
    }
}

/// A payload tagged with its MIME type and encoded as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlob {
    /// MIME type of the decoded payload
    pub mime_type: String,
    /// Standard base64 (padded) encoding of the payload
    pub base64_payload: String,
}

impl DataBlob {
    /// Base64-encode a source document
    pub fn from_document(doc: &SourceDocument) -> Self {
        Self {
            mime_type: doc.kind().mime_type().to_string(),
            base64_payload: STANDARD.encode(doc.bytes()),
        }
    }

    /// Render as `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_payload)
    }

    /// Parse a `data:<mime>;base64,<payload>` URI
    pub fn parse(uri: &str) -> Result<Self, DataUriError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| DataUriError("missing 'data:' scheme".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| DataUriError("missing ',' separator".to_string()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| DataUriError("only base64 payloads are supported".to_string()))?;
        if mime_type.is_empty() {
            return Err(DataUriError("missing MIME type".to_string()));
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            base64_payload: payload.to_string(),
        })
    }

    /// Decode the payload back into bytes
    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        STANDARD
            .decode(&self.base64_payload)
            .map_err(|e| DataUriError(format!("bad base64 payload: {}", e)))
    }
}

impl fmt::Display for DataBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_data_uri())
    }
}
