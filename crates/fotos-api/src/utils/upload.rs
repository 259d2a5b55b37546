//! Multipart helpers shared by the upload handlers

use axum::extract::Multipart;
use fotos_core::AppError;

use crate::services::ingest::UploadedFile;

/// Parts of a batch upload form
#[derive(Debug, Default)]
pub struct BatchForm {
    pub files: Vec<UploadedFile>,
    pub title: String,
    pub description: String,
}

/// Collect every `files`/`file` part plus the `title` and `description` fields.
/// Unknown fields are ignored.
pub async fn extract_batch_form(mut multipart: Multipart) -> Result<BatchForm, AppError> {
    let mut form = BatchForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "files" | "file" => {
                let filename = sanitize_filename(field.file_name().unwrap_or("unknown"));
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read file data: {}", e))
                })?;

                form.files.push(UploadedFile {
                    filename,
                    content_type,
                    data: data.to_vec(),
                });
            }
            "title" => form.title = read_text(field).await?.trim().to_string(),
            "description" => form.description = read_text(field).await?,
            _ => {}
        }
    }

    Ok(form)
}

/// Extract the single `file` part of a replacement upload.
/// Multiple file parts are rejected.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if file.is_some() {
            return Err(AppError::Validation(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let filename = sanitize_filename(field.file_name().unwrap_or("unknown"));
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?;

        file = Some(UploadedFile {
            filename,
            content_type,
            data: data.to_vec(),
        });
    }

    file.ok_or_else(|| AppError::Validation("No file provided".to_string()))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form field: {}", e)))
}

/// Reduce a client supplied filename to a printable base name for error reports
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control())
        .take(255)
        .collect();

    if cleaned.trim().is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("beach.png"), "beach.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\dog.jpg"), "dog.jpg");
        assert_eq!(sanitize_filename("bad\nname.png"), "badname.png");
        assert_eq!(sanitize_filename(""), "unknown");
        assert_eq!(sanitize_filename("dir/"), "unknown");
    }
}
