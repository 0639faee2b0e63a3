//! # Source Materializer
//!
//! Turns a source reference into raw bytes. A reference is resolved in this
//! order:
//!
//! 1. The sentinel `-` reads the whole of standard input.
//! 2. A URL whose scheme has a registered [`Getter`](crate::getter::Getter) is
//!    fetched through it.
//! 3. Anything else (no scheme, or a scheme nobody handles) is read from the
//!    local filesystem.
//!
//! Standard input is a one-shot resource. Reading it a second time in the same
//! merge yields whatever is left in the stream, normally nothing. That is
//! accepted behavior; the reader only logs a warning when it happens.

use std::cell::{Cell, RefCell};
use std::io::{self, Read};

use log::{debug, warn};
use url::Url;

use crate::defaults::STDIN_SENTINEL;
use crate::error::{Error, Result};
use crate::getter::Providers;

/// Reads source references through a provider registry.
pub struct SourceReader<'a> {
    providers: &'a Providers,
    stdin: RefCell<Box<dyn Read + 'a>>,
    stdin_reads: Cell<usize>,
}

impl<'a> SourceReader<'a> {
    /// Create a reader backed by the process's standard input.
    pub fn new(providers: &'a Providers) -> Self {
        Self::with_stdin(providers, io::stdin())
    }

    /// Create a reader whose `-` sentinel reads from `stdin` instead.
    pub fn with_stdin<R: Read + 'a>(providers: &'a Providers, stdin: R) -> Self {
        Self {
            providers,
            stdin: RefCell::new(Box::new(stdin)),
            stdin_reads: Cell::new(0),
        }
    }

    /// Retrieve the bytes behind `reference`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Retrieval` naming the reference when standard input
    /// cannot be read, the reference is a malformed locator, the local file
    /// cannot be read, or a registered getter fails.
    pub fn read(&self, reference: &str) -> Result<Vec<u8>> {
        if reference.trim() == STDIN_SENTINEL {
            return self.read_stdin();
        }

        check_escapes(reference)?;

        match Url::parse(reference) {
            Ok(url) => {
                if let Some(getter) = self.providers.by_scheme(url.scheme()) {
                    debug!("Reading {} via '{}' getter", reference, url.scheme());
                    return getter.get(reference).map_err(|err| match err {
                        err @ Error::Retrieval { .. } => err,
                        other => Error::Retrieval {
                            reference: reference.to_string(),
                            message: other.to_string(),
                        },
                    });
                }
                debug!("No getter for scheme '{}', reading {} from disk", url.scheme(), reference);
            }
            Err(url::ParseError::RelativeUrlWithoutBase) => {}
            Err(err) => {
                debug!("{} is not a URL ({}), reading from disk", reference, err);
            }
        }

        self.read_local(reference)
    }

    fn read_stdin(&self) -> Result<Vec<u8>> {
        let reads = self.stdin_reads.get() + 1;
        self.stdin_reads.set(reads);
        if reads > 1 {
            warn!(
                "Standard input is read {} times in one merge; it was already consumed and yields no further data",
                reads
            );
        }

        let mut buf = Vec::new();
        self.stdin
            .borrow_mut()
            .read_to_end(&mut buf)
            .map_err(|err| Error::Retrieval {
                reference: STDIN_SENTINEL.to_string(),
                message: format!("failed to read standard input: {}", err),
            })?;
        Ok(buf)
    }

    fn read_local(&self, path: &str) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(|err| Error::Retrieval {
            reference: path.to_string(),
            message: err.to_string(),
        })
    }
}

/// Reject references with malformed percent-escapes (`%` not followed by two
/// hex digits); such a string is not a valid locator of any kind.
fn check_escapes(reference: &str) -> Result<()> {
    let bytes = reference.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let end = (i + 3).min(bytes.len());
                return Err(Error::Retrieval {
                    reference: reference.to_string(),
                    message: format!(
                        "invalid URL escape {:?}",
                        String::from_utf8_lossy(&bytes[i..end])
                    ),
                });
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}
