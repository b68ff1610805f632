use thiserror::Error;

/// Error category, mirrors the exception classes callers distinguish on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed pattern, bad replacement reference, duplicate group name
    Syntax,
    /// Missing subject, empty union or chain
    Type,
    /// matchChain backreference that does not exist on its pattern
    Reference,
    /// Invalid token flag or optional flag
    Value,
    /// Native engine gave up while matching (backtrack limit, stack)
    Native,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "SyntaxError"),
            ErrorKind::Type => write!(f, "TypeError"),
            ErrorKind::Reference => write!(f, "ReferenceError"),
            ErrorKind::Value => write!(f, "ValueError"),
            ErrorKind::Native => write!(f, "NativeError"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct XRegexError {
    pub kind: ErrorKind,
    pub message: String,
    /// Byte offset into the pattern, when the error points at one
    pub offset: Option<usize>,
}

pub type XResult<T> = Result<T, XRegexError>;

impl XRegexError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        XRegexError {
            kind,
            message: message.into(),
            offset: None,
        }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    pub fn syntax_at(message: impl Into<String>, offset: usize) -> Self {
        XRegexError {
            kind: ErrorKind::Syntax,
            message: message.into(),
            offset: Some(offset),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    pub fn reference(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Reference, message)
    }

    pub fn value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Value, message)
    }

    pub fn native(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Native, message)
    }

    /// Attach an offset unless one is already set.
    pub fn with_offset(mut self, offset: usize) -> Self {
        if self.offset.is_none() {
            self.offset = Some(offset);
        }
        self
    }

    pub fn is_syntax(&self) -> bool {
        self.kind == ErrorKind::Syntax
    }
}

impl From<fancy_regex::Error> for XRegexError {
    fn from(err: fancy_regex::Error) -> Self {
        match err {
            fancy_regex::Error::RuntimeError(e) => XRegexError::native(e.to_string()),
            other => XRegexError::syntax(format!("Invalid native pattern: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind() {
        let err = XRegexError::syntax("Unknown regex flag q");
        assert_eq!(err.to_string(), "SyntaxError: Unknown regex flag q");
        assert_eq!(err.offset, None);
    }

    #[test]
    fn test_offset_is_kept_once_set() {
        let err = XRegexError::syntax_at("Invalid escape \\e", 3).with_offset(9);
        assert_eq!(err.offset, Some(3));
        assert!(err.is_syntax());
    }
}
