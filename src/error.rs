//! Error types for the text-extraction core.

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Error kinds that can occur while interpreting content streams and
/// decoding text.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// An object had the wrong structural kind for the operation (e.g. a
    /// `/Differences` entry that isn't an array).
    #[error("malformed object: {0}")]
    MalformedObject(String),

    /// An object's kind did not match what the caller required.
    #[error("expected {expected}, found {found}")]
    UnexpectedKind {
        /// The kind the caller required.
        expected: String,
        /// The kind actually encountered.
        found: String,
    },

    /// A required dictionary key was absent.
    #[error("missing key: {0}")]
    MissingKey(String),

    /// A fixed-arity operator was invoked with too few operands on the
    /// stack.
    #[error("operand stack underflow")]
    StackUnderflow,

    /// A page-tree or Form XObject graph exceeded the configured recursion
    /// depth, indicating a cycle.
    #[error("cycle detected at id {0}")]
    Cycle(String),

    /// A `/Encoding` name string did not match any entry in the named-charset
    /// dispatch table, or named a charset family this crate cannot decode.
    #[error("unknown encoding name: {0}")]
    UnknownEncodingName(String),

    /// A `cm`/`Tm` operand set did not form six valid matrix scalars.
    #[error("invalid matrix operands")]
    InvalidMatrix,

    /// An operand expected to be numeric was not.
    #[error("invalid numeric operand: {0}")]
    InvalidNumeric(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_object_message() {
        let err = ExtractError::MalformedObject("/Differences not an array".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("malformed object"));
        assert!(msg.contains("Differences"));
    }

    #[test]
    fn test_unexpected_kind_message() {
        let err = ExtractError::UnexpectedKind {
            expected: "Dictionary".to_string(),
            found: "Array".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("Dictionary"));
        assert!(msg.contains("Array"));
    }

    #[test]
    fn test_unknown_encoding_name_message() {
        let err = ExtractError::UnknownEncodingName("/ISO-2022-KR".to_string());
        assert!(format!("{err}").contains("/ISO-2022-KR"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExtractError>();
    }
}
