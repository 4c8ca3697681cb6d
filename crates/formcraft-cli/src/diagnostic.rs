use miette::{Diagnostic, NamedSource, SourceSpan};

use formcraft_formula::{FormulaError, Span};

/// A diagnostic wrapping a `FormulaError` for rich miette rendering.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct SchemaDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("{label}")]
    span: SourceSpan,

    message: String,
    label: String,

    #[help]
    suggestion: Option<String>,
}

fn span_to_source_span(span: Span) -> SourceSpan {
    (span.start, span.end.saturating_sub(span.start)).into()
}

/// Convert a `FormulaError` into a miette `SchemaDiagnostic`.
pub fn formula_error_to_diagnostic(
    error: &FormulaError,
    source: &str,
    filename: &str,
) -> SchemaDiagnostic {
    let named_src = NamedSource::new(filename, source.to_string());

    match error {
        FormulaError::InvalidToken { span } => SchemaDiagnostic {
            src: named_src,
            span: span_to_source_span(*span),
            message: "invalid token".to_string(),
            label: "unrecognized token".to_string(),
            suggestion: Some("Check for typos or unsupported characters.".to_string()),
        },

        FormulaError::UnexpectedToken {
            expected,
            found,
            span,
        } => SchemaDiagnostic {
            src: named_src,
            span: span_to_source_span(*span),
            message: format!("unexpected token: expected {expected}, found {found}"),
            label: format!("expected {expected}"),
            suggestion: None,
        },

        FormulaError::UnexpectedEndOfInput { expected } => SchemaDiagnostic {
            src: named_src,
            span: (source.len().saturating_sub(1), 1).into(),
            message: format!("unexpected end of input: expected {expected}"),
            label: "input ended here".to_string(),
            suggestion: Some(format!("Add {expected} to complete the formula.")),
        },

        FormulaError::InvalidNumberLiteral { text, span } => SchemaDiagnostic {
            src: named_src,
            span: span_to_source_span(*span),
            message: format!("invalid number literal '{text}'"),
            label: "expected a valid number".to_string(),
            suggestion: None,
        },

        FormulaError::EmptyFieldReference { span } => SchemaDiagnostic {
            src: named_src,
            span: span_to_source_span(*span),
            message: "empty field reference".to_string(),
            label: "field name expected here".to_string(),
            suggestion: Some("Reference a field, e.g. [field_id].".to_string()),
        },

        // Catch future non_exhaustive variants.
        _ => SchemaDiagnostic {
            src: named_src,
            span: (0, 0).into(),
            message: error.to_string(),
            label: "error".to_string(),
            suggestion: None,
        },
    }
}

/// Render all formula errors for a field using miette.
pub fn render_diagnostics(
    errors: &[FormulaError],
    source: &str,
    filename: &str,
) -> Vec<miette::Report> {
    errors
        .iter()
        .map(|e| {
            let diagnostic = formula_error_to_diagnostic(e, source, filename);
            miette::Report::new(diagnostic)
        })
        .collect()
}
