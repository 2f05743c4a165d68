use crate::macros::setter;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cloud Job Ticket used when the caller does not supply one
pub const DEFAULT_TICKET: &str = r#"{"version":"1.0","print":{}}"#;

// Common

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
}

// Requests

/// Multipart job submission
#[derive(Debug, Clone)]
pub struct SubmitJob {
    pub(crate) printer_id: String,
    pub(crate) title: String,
    pub(crate) ticket: String,
    pub(crate) file_name: String,
    pub(crate) content_type: String,
    pub(crate) content: Vec<u8>,
}

impl SubmitJob {
    pub fn new(
        printer_id: impl Into<String>,
        file_name: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        let file_name = file_name.into();
        Self {
            printer_id: printer_id.into(),
            title: file_name.clone(),
            ticket: DEFAULT_TICKET.to_string(),
            content_type: content_type_for(&file_name).to_string(),
            file_name,
            content,
        }
    }

    /// Read `path` into a job titled by its file name
    pub fn from_path(printer_id: impl Into<String>, path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(printer_id, file_name, content))
    }

    setter!(title: String);
    setter!(ticket: String);
    setter!(content_type: String);

    pub fn printer_id(&self) -> &str {
        &self.printer_id
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

// Responses

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub job: Option<Job>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type_for("report.PDF"), "application/pdf");
        assert_eq!(content_type_for("notes.txt"), "text/plain");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("archive"), "application/octet-stream");
    }

    #[test]
    fn test_from_path_titles_job_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letter.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"%PDF-1.4")
            .unwrap();

        let job = SubmitJob::from_path("printer-1", &path).unwrap();

        assert_eq!(job.printer_id(), "printer-1");
        assert_eq!(job.title, "letter.pdf");
        assert_eq!(job.content_type, "application/pdf");
        assert_eq!(job.content, b"%PDF-1.4");
        assert_eq!(job.ticket, DEFAULT_TICKET);
    }

    #[test]
    fn test_from_missing_path_fails() {
        assert!(SubmitJob::from_path("printer-1", Path::new("/nonexistent/file.pdf")).is_err());
    }
}
