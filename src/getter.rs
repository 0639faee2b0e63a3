//! # Retrieval by Scheme
//!
//! This module provides the registry of retrieval capabilities that the
//! source reader consults for URL-shaped references.
//!
//! ## Design
//!
//! Retrieval is split behind the **`Getter`** trait: a getter turns one URL
//! into bytes. A **`Providers`** registry maps URL schemes to getters. The
//! registry is an explicit value handed to the pipeline, never ambient state,
//! so tests can register mock getters for made-up schemes and production code
//! can decide which network schemes are allowed at all.
//!
//! `Providers::with_defaults` registers [`HttpGetter`] for `http` and
//! `https`. References whose scheme has no getter fall back to the local
//! filesystem in the source reader.

use std::time::Duration;

use log::debug;

use crate::error::{Error, Result};

/// A capability that retrieves the bytes behind a URL.
pub trait Getter: Send + Sync {
    /// Fetch the full content addressed by `url`.
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// A getter registered for one or more URL schemes.
pub struct Provider {
    /// Schemes handled by this getter (e.g. `["http", "https"]`).
    pub schemes: Vec<String>,
    /// The retrieval capability itself.
    pub getter: Box<dyn Getter>,
}

/// Registry mapping URL schemes to getters.
#[derive(Default)]
pub struct Providers {
    providers: Vec<Provider>,
}

impl Providers {
    /// Create an empty registry. Every reference then resolves to a local path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in HTTP(S) getter.
    pub fn with_defaults(timeout: Duration) -> Result<Self> {
        let mut providers = Self::new();
        providers.register(["http", "https"], HttpGetter::new(timeout)?);
        Ok(providers)
    }

    /// Register `getter` for every scheme in `schemes`.
    ///
    /// Getters registered earlier win when two claim the same scheme.
    pub fn register<I, S, G>(&mut self, schemes: I, getter: G)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        G: Getter + 'static,
    {
        self.providers.push(Provider {
            schemes: schemes.into_iter().map(Into::into).collect(),
            getter: Box::new(getter),
        });
    }

    /// Look up the getter for `scheme`, if any.
    pub fn by_scheme(&self, scheme: &str) -> Option<&dyn Getter> {
        self.providers
            .iter()
            .find(|p| p.schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme)))
            .map(|p| p.getter.as_ref())
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no provider is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| &p.schemes))
            .finish()
    }
}

/// Blocking HTTP(S) getter.
pub struct HttpGetter {
    client: reqwest::blocking::Client,
}

impl HttpGetter {
    /// Create a getter whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("values-overlay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| Error::Retrieval {
                reference: "http client".to_string(),
                message: err.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl Getter for HttpGetter {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Fetching {}", url);
        let retrieval = |err: reqwest::Error| Error::Retrieval {
            reference: url.to_string(),
            message: err.to_string(),
        };
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(retrieval)?;
        let body = response.bytes().map_err(retrieval)?;
        Ok(body.to_vec())
    }
}
