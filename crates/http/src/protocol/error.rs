use std::io;
use thiserror::Error;

use crate::connection::WriterState;
use crate::protocol::ParseState;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed request line: {line}")]
    MalformedRequestLine { line: String },

    #[error("invalid http method: {method}")]
    InvalidMethod { method: String },

    #[error("unrecognized http version: {version}")]
    InvalidVersion { version: String },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("parser invoked after completion")]
    AlreadyDone,

    #[error("incomplete request, in state: {state}, {buffered} bytes buffered at end of input")]
    Incomplete { state: ParseState, buffered: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_request_line<S: ToString>(line: S) -> Self {
        Self::MalformedRequestLine { line: line.to_string() }
    }

    pub fn invalid_method<S: ToString>(method: S) -> Self {
        Self::InvalidMethod { method: method.to_string() }
    }

    pub fn invalid_version<S: ToString>(version: S) -> Self {
        Self::InvalidVersion { version: version.to_string() }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn incomplete(state: ParseState, buffered: usize) -> Self {
        Self::Incomplete { state, buffered }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Rejected input to [`HeaderCollection::set`](crate::protocol::HeaderCollection::set)
/// and friends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("invalid header name: {name:?}")]
    InvalidName { name: String },

    #[error("invalid value for header {name}: {value:?}")]
    InvalidValue { name: String, value: String },
}

impl From<HeaderError> for ParseError {
    fn from(e: HeaderError) -> Self {
        ParseError::invalid_header(e)
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("writer is in state {actual}, expected {expected}")]
    StateMismatch { expected: WriterState, actual: WriterState },

    #[error("empty chunk is reserved for the end of a chunked body")]
    EmptyChunk,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn state_mismatch(expected: WriterState, actual: WriterState) -> Self {
        Self::StateMismatch { expected, actual }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
