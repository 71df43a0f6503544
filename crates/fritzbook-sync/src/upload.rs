use crate::error::Result;
use crate::transport::Transport;
use crate::xml::write_document;
use fritzbook_core::PhonebookCollection;
use tracing::{debug, warn};

pub const IMPORT_PATH: &str = "/cgi-bin/firmwarecfg";
pub const MAIN_PHONEBOOK_ID: u32 = 0;

const FILE_FIELD: &str = "PhonebookImportFile";
const FILE_NAME: &str = "book.xml";
const FILE_CONTENT_TYPE: &str = "text/xml";

const SUCCESS_MARKER: &str = "Das Telefonbuch der FRITZ!Box wurde wiederhergestellt.";
const FAILURE_MARKER: &str = "Beim Wiederherstellen des Telefonbuchs ist ein Fehler aufgetreten.";

/// A ready-to-send phonebook import request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
    pub path: &'static str,
    pub boundary: String,
    pub body: Vec<u8>,
}

impl UploadPayload {
    pub fn build(document: &[u8], session_id: &str, phonebook_id: u32) -> Self {
        let boundary = format!("----------{}", uuid::Uuid::new_v4().simple());
        Self::with_boundary(document, session_id, phonebook_id, boundary)
    }

    pub fn with_boundary(
        document: &[u8],
        session_id: &str,
        phonebook_id: u32,
        boundary: String,
    ) -> Self {
        let mut body = Vec::with_capacity(document.len() + 512);
        push_field(&mut body, &boundary, "sid", session_id);
        push_field(&mut body, &boundary, "PhonebookId", &phonebook_id.to_string());

        push_line(&mut body, &format!("--{boundary}"));
        push_line(
            &mut body,
            &format!(
                "Content-Disposition: form-data; name=\"{FILE_FIELD}\"; filename=\"{FILE_NAME}\""
            ),
        );
        push_line(&mut body, &format!("Content-Type: {FILE_CONTENT_TYPE}"));
        push_line(&mut body, "");
        body.extend_from_slice(document);
        push_line(&mut body, "");
        push_line(&mut body, &format!("--{boundary}--"));

        Self {
            path: IMPORT_PATH,
            boundary,
            body,
        }
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Content-type".to_string(), self.content_type()),
            ("Content-length".to_string(), self.body.len().to_string()),
        ]
    }
}

fn push_field(body: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    push_line(body, &format!("--{boundary}"));
    push_line(
        body,
        &format!("Content-Disposition: form-data; name=\"{name}\""),
    );
    push_line(body, "");
    push_line(body, value);
}

fn push_line(body: &mut Vec<u8>, line: &str) {
    body.extend_from_slice(line.as_bytes());
    body.extend_from_slice(b"\r\n");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Success,
    Failure,
    /// Neither marker matched; carries the raw response body.
    Unknown(String),
}

impl UploadOutcome {
    pub fn classify(body: &str) -> Self {
        if body.contains(SUCCESS_MARKER) {
            Self::Success
        } else if body.contains(FAILURE_MARKER) {
            Self::Failure
        } else {
            Self::Unknown(body.to_string())
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Serializes `collection` and posts it to the router's import endpoint.
/// Only transport errors fail; the firmware's verdict is returned as an outcome.
pub fn upload<T: Transport + ?Sized>(
    transport: &T,
    collection: &PhonebookCollection,
    phonebook_id: u32,
) -> Result<UploadOutcome> {
    let document = write_document(collection)?;
    let session_id = transport.session_id()?;
    let payload = UploadPayload::build(&document, &session_id, phonebook_id);
    debug!(
        bytes = payload.body.len(),
        phonebook_id, "posting phonebook import"
    );

    let response = transport.post_form(payload.path, &payload.headers(), payload.body)?;
    let outcome = UploadOutcome::classify(&response);
    if let UploadOutcome::Unknown(body) = &outcome {
        warn!(%body, "unknown answer from phonebook import");
    }
    Ok(outcome)
}
