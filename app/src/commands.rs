//! Contract generation command

use crate::delivery::Download;
use contract_form::FieldMapping;
use docx_template::{fill_template, FillError, Substitutions};
use std::path::Path;

pub const SUCCESS_MESSAGE: &str = "✅ Contrato gerado com sucesso!";

/// Message shown to the user for a failed generation
pub fn user_message(error: &FillError) -> String {
    match error {
        FillError::TemplateNotFound { path } => format!(
            "Erro: O arquivo de template não foi encontrado em '{}'.",
            path.display()
        ),
        FillError::Unexpected(e) => {
            format!("Ocorreu um erro inesperado ao gerar o documento: {}", e)
        }
    }
}

/// Fill the template with the collected values.
///
/// Errors are returned as the message to show the user.
pub fn generate_contract(mapping: &FieldMapping, template_path: &Path) -> Result<Download, String> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("generate_contract", id = %request_id);
    let _guard = span.enter();

    let subs = Substitutions::from_pairs(mapping.iter());
    match fill_template(&subs, template_path) {
        Ok(filled) => {
            let report = filled.report().clone();
            let download = Download::new(mapping, filled);
            if !report.unresolved.is_empty() {
                tracing::warn!(
                    placeholders = ?report.unresolved,
                    "Template still contains placeholders after filling"
                );
            }
            tracing::info!(
                file = %download.file_name,
                bytes = download.bytes.len(),
                replacements = report.replacements,
                "Contract generated"
            );
            Ok(download)
        }
        Err(e) => {
            tracing::error!("Contract generation failed: {}", e);
            Err(user_message(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_template::TemplateError;
    use std::io::{Cursor, Write};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_template(dir: &TempDir, paragraphs: &[&str]) -> PathBuf {
        let body: String = paragraphs
            .iter()
            .map(|text| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", text))
            .collect();
        let document = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in [
            ("[Content_Types].xml", r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#),
            ("word/document.xml", document.as_str()),
        ] {
            zip.start_file(name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        let path = dir.path().join("contrato.docx");
        std::fs::write(&path, zip.finish().unwrap().into_inner()).unwrap();
        path
    }

    #[test]
    fn test_generate_with_defaults() {
        let dir = TempDir::new().unwrap();
        let template = write_template(&dir, &["COMPRADOR: {{comprador_nome}}", "{{uf_contrato}}"]);

        let download = generate_contract(&FieldMapping::with_defaults(), &template).unwrap();

        assert_eq!(download.file_name, "Contrato_JOÃO.docx");
        assert_eq!(download.mime_type, docx_template::DOCX_MIME_TYPE);

        let filled = docx_template::TemplateDocument::from_bytes(&download.bytes).unwrap();
        let body = filled.body();
        let texts: Vec<String> = body
            .reachable_paragraphs()
            .into_iter()
            .map(|p| body.paragraph_text(p))
            .collect();
        assert_eq!(texts, vec!["COMPRADOR: JOÃO", "PR"]);
    }

    #[test]
    fn test_missing_template_message() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nao_existe.docx");

        let message = generate_contract(&FieldMapping::new(), &missing).unwrap_err();
        assert_eq!(
            message,
            format!(
                "Erro: O arquivo de template não foi encontrado em '{}'.",
                missing.display()
            )
        );
    }

    #[test]
    fn test_corrupt_template_message() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("contrato.docx");
        std::fs::write(&path, "isto não é um docx").unwrap();

        let message = generate_contract(&FieldMapping::new(), &path).unwrap_err();
        assert!(message.starts_with("Ocorreu um erro inesperado ao gerar o documento: "));
    }

    #[test]
    fn test_unexpected_message_carries_cause() {
        let error = FillError::Unexpected(TemplateError::MissingPart("word/document.xml".into()));
        assert_eq!(
            user_message(&error),
            "Ocorreu um erro inesperado ao gerar o documento: Missing required part: word/document.xml"
        );
    }
}
