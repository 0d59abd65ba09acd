//! Link resolution with key → trainer → default precedence.
//!
//! # Design Decisions
//! - An explicit key always short-circuits: if it does not resolve, the
//!   trainer and default tiers are not consulted
//! - Resolution only answers "which URL"; HTTPS and domain policy are
//!   applied afterwards by the caller

use serde::Serialize;

use crate::links::store::LinkConfig;

/// Which tier produced a resolved link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Key,
    Trainer,
    Default,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Key => "key",
            Provenance::Trainer => "trainer",
            Provenance::Default => "default",
        }
    }
}

/// Inputs to a resolution. Any combination may be present.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionRequest<'a> {
    pub key: Option<&'a str>,
    pub trainer_id: Option<&'a str>,
    pub link_type: Option<&'a str>,
}

impl<'a> ResolutionRequest<'a> {
    /// Resolve a single link key.
    pub fn by_key(key: &'a str) -> Self {
        Self {
            key: Some(key),
            ..Self::default()
        }
    }

    /// Resolve a link type, optionally scoped to a trainer.
    pub fn by_type(link_type: &'a str, trainer_id: Option<&'a str>) -> Self {
        Self {
            key: None,
            trainer_id,
            link_type: Some(link_type),
        }
    }

    pub fn with_key(mut self, key: Option<&'a str>) -> Self {
        self.key = key;
        self
    }
}

/// A successfully resolved link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub source_key: String,
    pub url: String,
    pub provenance: Provenance,
}

/// Resolves link requests against an immutable [`LinkConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    config: &'a LinkConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a LinkConfig) -> Self {
        Self { config }
    }

    /// Resolve a request; `None` when no tier yields a URL.
    pub fn resolve(&self, request: &ResolutionRequest<'_>) -> Option<ResolutionResult> {
        if let Some(key) = non_empty(request.key) {
            return self.lookup(key, Provenance::Key);
        }

        if let (Some(trainer_id), Some(link_type)) =
            (non_empty(request.trainer_id), non_empty(request.link_type))
        {
            let found = self
                .config
                .trainer_key(trainer_id, link_type)
                .and_then(|key| self.lookup(key, Provenance::Trainer));
            if found.is_some() {
                return found;
            }
        }

        let link_type = non_empty(request.link_type)?;
        self.config
            .default_key(link_type)
            .and_then(|key| self.lookup(key, Provenance::Default))
    }

    fn lookup(&self, key: &str, provenance: Provenance) -> Option<ResolutionResult> {
        self.config.url_for(key).map(|url| ResolutionResult {
            source_key: key.to_string(),
            url: url.to_string(),
            provenance,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
