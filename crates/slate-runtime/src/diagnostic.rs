//! Compile-time diagnostics
//!
//! Every error the front end or code generator can raise flows through the
//! `Diagnostic` type. Compilation is all-or-nothing: the first error aborts
//! the pipeline and no partial program is produced.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Fatal error that aborts compilation
    Error,
    /// Warning that doesn't prevent compilation
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "error"),
            DiagnosticLevel::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message (error or warning)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Error code (e.g. "SL3001")
    pub code: String,
    /// Main diagnostic message
    pub message: String,
    /// Source line (1-based; 0 when unknown)
    pub line: u32,
    /// Suggested fix (optional)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic with code
    pub fn error_with_code(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            code: code.into(),
            message: message.into(),
            line: span.line,
            help: None,
        }
    }

    /// Create a new error diagnostic (uses the generic error code)
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::error_with_code(error_codes::GENERIC_ERROR, message, span)
    }

    /// Add a help message
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Format as human-readable string
    ///
    /// ```text
    /// error[SL3001]: unresolved name `x`
    ///   --> line 4
    ///    = help: declare it with `let x;` before use
    /// ```
    pub fn to_human_string(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}[{}]: {}\n", self.level, self.code, self.message));

        if self.line > 0 {
            output.push_str(&format!("  --> line {}\n", self.line));
        }

        if let Some(help) = &self.help {
            output.push_str(&format!("   = help: {}\n", help));
        }

        output
    }

    /// Format as JSON string
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.level, self.code, self.message)
    }
}

/// Error code registry
pub mod error_codes {
    // SL1xxx - Syntax Errors
    pub const SYNTAX_ERROR: &str = "SL1000";
    pub const UNEXPECTED_TOKEN: &str = "SL1001";
    pub const UNEXPECTED_CHARACTER: &str = "SL1002";
    pub const INVALID_LITERAL: &str = "SL1003";

    // SL3xxx - Semantic Errors
    pub const UNRESOLVED_NAME: &str = "SL3001";
    pub const UNKNOWN_FUNCTION: &str = "SL3002";
    pub const MISSING_MAIN: &str = "SL3003";
    pub const DUPLICATE_FUNCTION: &str = "SL3004";
    pub const ARITY_MISMATCH: &str = "SL3005";
    pub const MAIN_ARITY: &str = "SL3006";
    pub const INVALID_ASSIGN_TARGET: &str = "SL3010";
    pub const UNSUPPORTED_INDEXING: &str = "SL3011";

    // SL9xxx - Internal Errors
    pub const INTERNAL_ERROR: &str = "SL9998";
    pub const GENERIC_ERROR: &str = "SL9999";
}
