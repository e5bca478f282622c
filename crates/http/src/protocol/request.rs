//! Parsed HTTP request types.
//!
//! A [`Request`] is the request line plus its header block. It is produced by
//! [`RequestDecoder`](crate::codec::RequestDecoder) once the blank line ending the
//! header block has been seen; request bodies are never read.

use std::fmt;

use http::{Method, Version};

use crate::protocol::HeaderCollection;

/// Progress of the request parser. Transitions only move forward.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParseState {
    /// Waiting for the request line
    Initialized,
    /// Request line parsed, reading header lines
    ParsingHeaders,
    /// Header block terminated, request complete
    Done,
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseState::Initialized => "initialized",
            ParseState::ParsingHeaders => "parsing headers",
            ParseState::Done => "done",
        };
        f.write_str(name)
    }
}

/// `METHOD SP request-target SP HTTP/1.1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: Method,
    target: String,
    version: Version,
}

impl RequestLine {
    pub(crate) fn new(method: Method, target: String) -> Self {
        Self { method, target, version: Version::HTTP_11 }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request-target exactly as it appeared on the wire.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Always [`Version::HTTP_11`]; any other version is rejected by the parser.
    pub fn version(&self) -> Version {
        self.version
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    line: RequestLine,
    headers: HeaderCollection,
}

impl Request {
    pub(crate) fn new(line: RequestLine, headers: HeaderCollection) -> Self {
        Self { line, headers }
    }

    pub fn method(&self) -> &Method {
        self.line.method()
    }

    pub fn target(&self) -> &str {
        self.line.target()
    }

    pub fn version(&self) -> Version {
        self.line.version()
    }

    pub fn headers(&self) -> &HeaderCollection {
        &self.headers
    }
}
