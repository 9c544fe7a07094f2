//! Literal `{{tag}}` substitution over template content.
//!
//! Replacement is exact and case-sensitive: every occurrence of
//! `{{tagname}}` is replaced with the mapped value, unrecognized tags are
//! left verbatim, and there is no nesting or escaping. Protocol records are
//! never passed through substitution; this exists for preview rendering
//! with synthetic example values.

use chrono::Local;

/// Replaces every `{{tag}}` occurrence in `content` with its mapped value.
pub fn render_tags<'a>(content: &str, values: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut rendered = content.to_string();
    for (tag, value) in values {
        let placeholder = format!("{{{{{tag}}}}}");
        rendered = rendered.replace(&placeholder, value);
    }
    rendered
}

/// Synthetic example values used when previewing a template.
#[must_use]
pub fn sample_values(username: &str) -> Vec<(&'static str, String)> {
    vec![
        ("protocol_id", "20260221132200000".to_string()),
        ("title", "Exemplo de Título de Processo".to_string()),
        (
            "description",
            "Este é um exemplo de descrição de conteúdo que será substituído \
             dinamicamente pelo sistema quando o protocolo for gerado."
                .to_string(),
        ),
        ("created_at", Local::now().format("%d/%m/%Y %H:%M:%S").to_string()),
        ("username", username.to_string()),
    ]
}
