//! Error types for filter declaration, predicate compilation and binding.
//!
//! Every error carries an [`ErrorCode`] for programmatic handling plus an
//! [`ErrorContext`] with actionable suggestions.
//!
//! # Error Codes
//!
//! Error codes follow a pattern: P{category}{number}
//! - 1xxx: Filter errors (unsupported type, unknown key)
//! - 5xxx: Binding errors (malformed template, bad parameter)
//! - 7xxx: Configuration errors
//! - 9xxx: Integration errors
//!
//! ```rust
//! use filterkit_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::unknown_filter_key("User", "email_gt");
//! assert_eq!(err.code, ErrorCode::UnknownFilterKey);
//! assert!(err.to_string().contains("email_gt"));
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for filter and query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Filter errors (1xxx)
    /// Invalid filter or criteria shape (P1003).
    InvalidFilter = 1003,
    /// Filter declared with a value type the registry does not know (P1006).
    NonSupportedFilterType = 1006,
    /// Criteria reference a variant that was never declared (P1007).
    UnknownFilterKey = 1007,

    // Binding errors (5xxx)
    /// Malformed template placeholder (P5002).
    SqlSyntax = 5002,
    /// Invalid or missing parameter value (P5003).
    InvalidParameter = 5003,

    // Configuration errors (7xxx)
    /// Invalid configuration (P7001).
    InvalidConfiguration = 7001,

    // Integration errors (9xxx)
    /// Persistence operation left unimplemented by an entity (P9002).
    ImplementationPending = 9002,
}

impl ErrorCode {
    /// Get the error code string (e.g., "P1007").
    pub fn code(&self) -> String {
        format!("P{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidFilter => "Invalid filter criteria",
            Self::NonSupportedFilterType => "Unsupported filter type",
            Self::UnknownFilterKey => "Unknown filter key",
            Self::SqlSyntax => "Malformed predicate template",
            Self::InvalidParameter => "Invalid parameter",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::ImplementationPending => "Implementation pending",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Suggestion for fixing an error.
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The suggestion text.
    pub text: String,
    /// Optional code example.
    pub code: Option<String>,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            code: None,
        }
    }

    /// Add a code example.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was being performed.
    pub operation: Option<String>,
    /// The entity involved.
    pub entity: Option<String>,
    /// The filter or variant involved.
    pub filter: Option<String>,
    /// The predicate template (if available).
    pub template: Option<String>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<Suggestion>,
    /// Help text.
    pub help: Option<String>,
}

/// Errors raised while declaring filters, compiling criteria or binding templates.
#[derive(Error, Debug)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add context about the operation.
    pub fn with_context(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(Suggestion::new(suggestion));
        self
    }

    /// Add a code suggestion.
    pub fn with_code_suggestion(
        mut self,
        text: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        self.context
            .suggestions
            .push(Suggestion::new(text).with_code(code));
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the entity.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.context.entity = Some(entity.into());
        self
    }

    /// Set the filter or variant name.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.context.filter = Some(filter.into());
        self
    }

    /// Set the predicate template.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.context.template = Some(template.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// Create an unsupported filter type error.
    pub fn unsupported_filter_type(
        filter: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        let filter = filter.into();
        let type_name = type_name.into();
        Self::new(
            ErrorCode::NonSupportedFilterType,
            format!("Filter '{}' declared with unsupported type '{}'", filter, type_name),
        )
        .with_filter(&filter)
        .with_suggestion("Supported filter types are BOOLEAN, TEXT, NUMBER and BINARY")
        .with_code_suggestion(
            "Declare the filter with one of the supported types",
            format!("builder.declare(\"{}\", FilterType::Text, DeclareOptions::default())", filter),
        )
    }

    /// Create an unknown filter key error.
    pub fn unknown_filter_key(entity: impl Into<String>, key: impl Into<String>) -> Self {
        let entity = entity.into();
        let key = key.into();
        Self::new(
            ErrorCode::UnknownFilterKey,
            format!("Unknown filter '{}' for {}", key, entity),
        )
        .with_entity(&entity)
        .with_filter(&key)
        .with_suggestion(format!("Declare a filter that produces '{}' before querying", key))
        .with_help("Use list_filters() to see every variant the entity accepts")
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        let message = message.into();
        Self::new(
            ErrorCode::InvalidParameter,
            format!("Invalid value for '{}': {}", name, message),
        )
        .with_filter(&name)
    }

    /// Create a malformed template error.
    pub fn template_syntax(message: impl Into<String>, template: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            ErrorCode::SqlSyntax,
            format!("Malformed predicate template: {}", message),
        )
        .with_template(template)
        .with_help("Placeholders take the form ${name} or ${name:csv}")
    }

    /// Create an invalid configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidConfiguration,
            format!("Invalid configuration: {}", message.into()),
        )
    }

    /// Create an error for a persistence operation an entity has not implemented.
    pub fn implementation_pending(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        Self::new(
            ErrorCode::ImplementationPending,
            format!("Operation '{}' is not implemented for this entity", operation),
        )
        .with_context(&operation)
        .with_help("This is an integration gap in the entity, not a query failure")
    }

    // ============== Error Checks ==============

    /// Check if this is an unknown filter key error.
    pub fn is_unknown_filter_key(&self) -> bool {
        self.code == ErrorCode::UnknownFilterKey
    }

    /// Check if this is an unsupported filter type error.
    pub fn is_unsupported_filter_type(&self) -> bool {
        self.code == ErrorCode::NonSupportedFilterType
    }

    /// Check if this is an implementation pending error.
    pub fn is_implementation_pending(&self) -> bool {
        self.code == ErrorCode::ImplementationPending
    }

    /// Check if this error is retryable.
    ///
    /// Declaration and compilation never touch I/O, so nothing raised here is.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Display the full error with all context and suggestions.
    pub fn display_full(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error [{}]: {}\n", self.code.code(), self.message));

        if let Some(ref op) = self.context.operation {
            output.push_str(&format!("  → While: {}\n", op));
        }
        if let Some(ref entity) = self.context.entity {
            output.push_str(&format!("  → Entity: {}\n", entity));
        }
        if let Some(ref filter) = self.context.filter {
            output.push_str(&format!("  → Filter: {}\n", filter));
        }
        if let Some(ref template) = self.context.template {
            output.push_str(&format!("  → Template: {}\n", template));
        }

        if !self.context.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for (i, suggestion) in self.context.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion.text));
                if let Some(ref code) = suggestion.code {
                    output.push_str(&format!(
                        "     ```\n     {}\n     ```\n",
                        code.replace('\n', "\n     ")
                    ));
                }
            }
        }

        if let Some(ref help) = self.context.help {
            output.push_str(&format!("\nHelp: {}\n", help));
        }

        output
    }
}

/// Helper for creating errors with context.
#[macro_export]
macro_rules! query_error {
    ($code:expr, $msg:expr) => {
        $crate::error::QueryError::new($code, $msg)
    };
    ($code:expr, $msg:expr, $($key:ident = $value:expr),+ $(,)?) => {{
        let mut err = $crate::error::QueryError::new($code, $msg);
        $(
            err = err.$key($value);
        )+
        err
    }};
}
