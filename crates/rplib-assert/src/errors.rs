use thiserror::Error;

/// Errors raised while reading or building assertion text.
#[derive(Error, Debug)]
pub enum AssertError {
    /// The document is not an assertion of the expected type.
    #[error("not a {expected} assertion (type: '{found}')")]
    WrongType {
        /// Assertion type that was required.
        expected: &'static str,
        /// Value of the `type` header, empty when absent.
        found: String,
    },
    /// A header line could not be parsed.
    #[error("malformed header at line {line}: {reason}")]
    MalformedHeader {
        /// 1-based line number.
        line: usize,
        /// Reason for rejection.
        reason: String,
    },
    /// A required field is missing or empty.
    #[error("'{0}' field not presented")]
    MissingField(&'static str),
}

/// Errors raised while walking an OpenPGP packet stream.
#[derive(Error, Debug)]
pub enum PacketError {
    /// The stream ended inside a packet header or body.
    #[error("truncated packet at offset {offset}")]
    Truncated {
        /// Byte offset where the packet starts.
        offset: usize,
    },
    /// The tag byte does not have the packet marker bit set.
    #[error("invalid packet tag byte {byte:#04x} at offset {offset}")]
    InvalidTag {
        /// Offending byte.
        byte: u8,
        /// Byte offset of the tag byte.
        offset: usize,
    },
    /// Partial body lengths are only used for streamed data, never for keys.
    #[error("partial body length at offset {offset} is not supported")]
    PartialLength {
        /// Byte offset where the packet starts.
        offset: usize,
    },
    /// No primary key carries a user ID with the requested name.
    #[error("no key named '{0}' in keyring")]
    KeyNotFound(String),
}
