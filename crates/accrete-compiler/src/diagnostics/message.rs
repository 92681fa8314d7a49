use std::fmt;

use rowan::TextRange;

/// Diagnostic kinds reported while building accumulate clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Abort the accumulate clause
    UnknownAccumulateFunction,
    AccumulateAnalysisFailed,
    AccumulateCompileFailed,

    // Skip one binding, keep building
    DuplicateDeclaration,

    // Informational
    IgnoredArguments,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::IgnoredArguments => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether this kind aborts the whole accumulate clause.
    pub fn aborts_clause(&self) -> bool {
        matches!(
            self,
            Self::UnknownAccumulateFunction
                | Self::AccumulateAnalysisFailed
                | Self::AccumulateCompileFailed
        )
    }

    /// Default hint for this kind, automatically included in diagnostics.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownAccumulateFunction => Some(
                "all accumulate functions must be registered before building a resource",
            ),
            Self::DuplicateDeclaration => {
                Some("the function still runs, but its result cannot be referenced")
            }
            Self::IgnoredArguments => Some("only the first argument is accumulated"),
            _ => None,
        }
    }

    /// Base message for this kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnknownAccumulateFunction => "unknown accumulate function",
            Self::AccumulateAnalysisFailed => "accumulate code could not be analyzed",
            Self::AccumulateCompileFailed => "accumulate code could not be compiled",
            Self::DuplicateDeclaration => "duplicate declaration",
            Self::IgnoredArguments => "extra accumulate function arguments",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnknownAccumulateFunction => "unknown accumulate function `{}`".to_string(),
            Self::DuplicateDeclaration => "duplicate declaration for variable `{}`".to_string(),
            Self::IgnoredArguments => "extra arguments to `{}` are ignored".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One reported diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// Name of the rule being built.
    pub(crate) rule: String,
    /// Location of the offending clause in the rule source.
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(
        rule: &str,
        kind: DiagnosticKind,
        range: TextRange,
        message: impl Into<String>,
    ) -> Self {
        let hints = kind.default_hint().map(str::to_owned).into_iter().collect();
        Self {
            kind,
            rule: rule.to_owned(),
            range,
            message: message.into(),
            hints,
        }
    }

    pub(crate) fn with_default_message(rule: &str, kind: DiagnosticKind, range: TextRange) -> Self {
        Self::new(rule, kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in rule `{}` at {}..{}: {}",
            self.severity(),
            self.rule,
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
