//! Bound-SQL reconstruction for diagnostics.
//!
//! The recorder watches every bind on the current statement and, once per
//! execute, substitutes the recorded values into the prepared SQL text. The
//! output is a debugging artifact: values are not escaped and the string must
//! never be sent back to a database.

use sqlchain_driver::{DeclaredType, SqlValue};

/// One recorded bind.
#[derive(Debug, Clone)]
struct Binding {
    placeholder: String,
    value: SqlValue,
    declared: Option<DeclaredType>,
}

impl Binding {
    /// The text that replaces the placeholder in the rendered SQL.
    ///
    /// Numeric values (declared or inferred) print bare; text values print
    /// single-quoted with no escaping; everything else uses the value's
    /// default printed form.
    fn substitution(&self) -> String {
        let numeric = self.declared == Some(DeclaredType::Integer) || self.value.is_numeric();
        let text = self.declared == Some(DeclaredType::Text) || self.value.is_text();
        if numeric {
            self.value.to_string()
        } else if text {
            format!("'{}'", self.value)
        } else {
            self.value.to_string()
        }
    }
}

/// Tracks binds for one statement's current execution cycle and renders the
/// fully substituted diagnostic SQL.
#[derive(Debug, Default)]
pub(crate) struct BoundSqlRecorder {
    template: String,
    pending: Vec<Binding>,
    rendered: String,
}

impl BoundSqlRecorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seed the substitution base with freshly prepared SQL text, discarding
    /// any state from the previous statement.
    pub(crate) fn seed(&mut self, sql: &str) {
        self.template = sql.to_owned();
        self.rendered = sql.to_owned();
        self.pending.clear();
    }

    /// Append a binding. No deduplication happens here; later entries for the
    /// same placeholder win at render time.
    pub(crate) fn record(
        &mut self,
        placeholder: String,
        value: SqlValue,
        declared: Option<DeclaredType>,
    ) {
        self.pending.push(Binding {
            placeholder,
            value,
            declared,
        });
    }

    /// Render the diagnostic SQL from the template and consume the pending
    /// bindings. Called once per execute cycle, on both the success and the
    /// failure path; the result stays readable until the next flush or reset.
    pub(crate) fn flush(&mut self) -> &str {
        // Collapse duplicate placeholders, last write wins, keeping the order
        // of first appearance.
        let mut effective: Vec<&Binding> = Vec::with_capacity(self.pending.len());
        for binding in &self.pending {
            match effective
                .iter_mut()
                .find(|b| b.placeholder == binding.placeholder)
            {
                Some(slot) => *slot = binding,
                None => effective.push(binding),
            }
        }

        let mut out = self.template.clone();
        for binding in effective {
            out = out.replace(&binding.placeholder, &binding.substitution());
        }
        self.rendered = out;
        self.pending.clear();
        &self.rendered
    }

    /// The most recently rendered diagnostic SQL.
    pub(crate) fn rendered(&self) -> &str {
        &self.rendered
    }

    /// Drop all state, template included.
    pub(crate) fn reset(&mut self) {
        self.template.clear();
        self.rendered.clear();
        self.pending.clear();
    }
}
