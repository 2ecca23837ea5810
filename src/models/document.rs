/// MIME type used when neither the client nor content sniffing can tell.
pub const OCTET_STREAM: &str = "application/octet-stream";

pub const PDF_MIME: &str = "application/pdf";

/// A file received in a multipart upload. Lives only for the request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Build a document, falling back to content sniffing when the client
    /// did not declare a usable content type.
    pub fn new(file_name: Option<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        let content_type = content_type
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty() && ct != OCTET_STREAM)
            .unwrap_or_else(|| sniff_content_type(&bytes).to_string());

        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == PDF_MIME
    }

    /// File name to send to vendors, which reject parts without one.
    pub fn upload_name(&self) -> String {
        self.file_name.clone().unwrap_or_else(|| {
            let ext = match self.content_type.as_str() {
                PDF_MIME => "pdf",
                "image/png" => "png",
                "image/jpeg" | "image/jpg" => "jpg",
                "image/webp" => "webp",
                _ => "bin",
            };
            format!("upload.{ext}")
        })
    }
}

/// Guess a MIME type from magic bytes.
pub fn sniff_content_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"%PDF-") {
        return PDF_MIME;
    }
    match image::guess_format(bytes) {
        Ok(format) => format.to_mime_type(),
        Err(_) => OCTET_STREAM,
    }
}
