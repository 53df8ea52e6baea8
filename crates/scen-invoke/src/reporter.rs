//! Code-to-name resolution for on-chain error codes

use std::sync::Arc;

/// Maps numeric on-chain codes to symbolic names
pub trait ErrorReporter: Send + Sync {
    /// Name of an error code
    fn resolve_error(&self, code: u64) -> Option<String>;

    /// Name of an info code
    fn resolve_info(&self, code: u64) -> Option<String>;

    /// Rendering of a detail code, which may depend on the error code
    fn resolve_detail(&self, error: u64, detail: u64) -> String;
}

/// Reporter that resolves nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoErrorReporter;

impl ErrorReporter for NoErrorReporter {
    fn resolve_error(&self, _code: u64) -> Option<String> {
        None
    }

    fn resolve_info(&self, _code: u64) -> Option<String> {
        None
    }

    fn resolve_detail(&self, _error: u64, detail: u64) -> String {
        format!("unknown detail={}", detail)
    }
}

/// Reporter backed by ordered name tables, where a code is the index of its name.
///
/// When the resolved error name equals the configured rejection name, the
/// detail code is an error code of another contract and is resolved through
/// the delegate instead.
#[derive(Clone, Default)]
pub struct TableErrorReporter {
    errors: Vec<String>,
    infos: Vec<String>,
    rejection: Option<(String, Arc<dyn ErrorReporter>)>,
}

impl TableErrorReporter {
    /// Create a reporter from error and info tables
    pub fn new<E, I>(errors: E, infos: I) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            errors: errors.into_iter().map(Into::into).collect(),
            infos: infos.into_iter().map(Into::into).collect(),
            rejection: None,
        }
    }

    /// Delegate detail resolution for `error_name` to `reporter`
    pub fn with_rejection(
        mut self,
        error_name: impl Into<String>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        self.rejection = Some((error_name.into(), reporter));
        self
    }
}

fn lookup(table: &[String], code: u64) -> Option<String> {
    usize::try_from(code)
        .ok()
        .and_then(|idx| table.get(idx))
        .cloned()
}

impl ErrorReporter for TableErrorReporter {
    fn resolve_error(&self, code: u64) -> Option<String> {
        lookup(&self.errors, code)
    }

    fn resolve_info(&self, code: u64) -> Option<String> {
        lookup(&self.infos, code)
    }

    fn resolve_detail(&self, error: u64, detail: u64) -> String {
        if let Some((name, delegate)) = &self.rejection {
            if self.resolve_error(error).as_deref() == Some(name.as_str()) {
                if let Some(resolved) = delegate.resolve_error(detail) {
                    return resolved;
                }
            }
        }
        detail.to_string()
    }
}

impl std::fmt::Debug for TableErrorReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableErrorReporter")
            .field("errors", &self.errors.len())
            .field("infos", &self.infos.len())
            .field("rejection", &self.rejection.as_ref().map(|(name, _)| name))
            .finish()
    }
}
