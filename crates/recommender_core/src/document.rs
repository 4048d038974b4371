use crate::ServiceError;

pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

/// A resume picked by the user, held in memory until it is uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Byte payloads are large; keep debug output to the metadata.
impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Which documents may be sent for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPolicy {
    pub allowed_content_types: Vec<String>,
    pub max_bytes: u64,
}

impl Default for DocumentPolicy {
    fn default() -> Self {
        Self {
            allowed_content_types: vec!["application/pdf".to_string()],
            max_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

impl DocumentPolicy {
    pub fn validate(&self, document: &Document) -> Result<(), ServiceError> {
        if !self.is_content_type_allowed(&document.content_type) {
            return Err(ServiceError::validation(format!(
                "unsupported document type {} (expected one of: {})",
                document.content_type,
                self.allowed_content_types.join(", ")
            )));
        }
        if document.is_empty() {
            return Err(ServiceError::validation("document is empty"));
        }
        if document.len() > self.max_bytes {
            return Err(ServiceError::validation(format!(
                "document is {} bytes, limit is {}",
                document.len(),
                self.max_bytes
            )));
        }
        Ok(())
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }
}
