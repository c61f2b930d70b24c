#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Message,
}

/// A diagnostic with no span of its own.
///
/// Most compiler diagnostics are anchored to a byte range in one file.
/// Diagnostics produced by the dependency-graph core are anchored to a
/// *set of declarations* spread across the module instead (an illegal
/// cycle names every participating binding), so there is no single
/// `file`/`start`/`length` to attach here — callers that want a span
/// resolve it themselves via `DependencyGraph::decls_of`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            message: message.into(),
        }
    }
}
