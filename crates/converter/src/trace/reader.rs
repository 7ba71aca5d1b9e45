//! Buffered trace reading.
//!
//! [`TraceReader`] wraps a [`BufRead`] source and yields masked
//! [`Request`] values. End of sequence is the iterator returning `None`;
//! there is no readable-polling. Two quirks of the on-disk formats are
//! absorbed here:
//!
//! - Addresses may come from a wider address space than the configured
//!   geometry; they are masked before the converter sees them.
//! - The "bubbled" intermediate format carries stall counts on standalone
//!   single-token lines. Such a line is held and attached to the next
//!   request, overriding that request's inline bubble token, then reset.

use std::io::{BufRead, Lines};

use crate::codec::AddressSpec;
use crate::error::{ConvertError, FormatError};
use crate::trace::parse::parse_request;
use crate::trace::request::Request;

/// Iterator over masked row requests from a buffered line source.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: Lines<R>,
    spec: AddressSpec,
    pending_bubble: Option<u64>,
}

impl<R: BufRead> TraceReader<R> {
    /// Creates a reader that masks addresses against `spec`.
    pub fn new(spec: &AddressSpec, reader: R) -> Self {
        Self {
            lines: reader.lines(),
            spec: *spec,
            pending_bubble: None,
        }
    }

    /// Applies a carried standalone bubble count, if any.
    fn attach_bubble(&mut self, request: Request) -> Request {
        let Some(bubble) = self.pending_bubble.take() else {
            return request;
        };
        match request {
            Request::Read { source, .. } => Request::Read { source, bubble },
            Request::Write { target, .. } => Request::Write { target, bubble },
        }
    }

    /// Masks the request's row address to the configured width.
    fn mask(&self, request: Request) -> Request {
        match request {
            Request::Read { source, bubble } => Request::Read {
                source: self.spec.mask(source),
                bubble,
            },
            Request::Write { target, bubble } => Request::Write {
                target: self.spec.mask(target),
                bubble,
            },
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<Request, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(ConvertError::Io(e))),
            };
            let mut tokens = line.split_whitespace();
            let Some(first) = tokens.next() else {
                continue; // blank line
            };
            if tokens.next().is_none() {
                // Standalone bubble count for the next request.
                match first.parse::<u64>() {
                    Ok(bubble) => {
                        self.pending_bubble = Some(bubble);
                        continue;
                    }
                    Err(_) => {
                        return Some(Err(ConvertError::Format(FormatError::InvalidInteger {
                            token: first.to_owned(),
                        })));
                    }
                }
            }
            return Some(
                parse_request(&line)
                    .map(|request| {
                        let request = self.attach_bubble(request);
                        self.mask(request)
                    })
                    .map_err(ConvertError::Format),
            );
        }
    }
}
