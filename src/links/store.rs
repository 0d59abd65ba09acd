//! Link configuration loading.
//!
//! The links file is a JSON document with three top-level maps:
//!
//! ```json
//! {
//!   "links":    { "calendly_main": "https://calendly.com/coach" },
//!   "defaults": { "checkout": "stripe_basic" },
//!   "trainers": { "t-42": { "checkout": "stripe_pro" } }
//! }
//! ```
//!
//! Loading never fails the service. A missing or unparseable file degrades
//! to an empty [`LinkConfig`]; a document with shape problems is still used,
//! and every problem is reported as a [`ShapeIssue`] warning.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::links::validator::{is_allowed_domain, is_https};

/// Parsed link configuration. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Link key → URL.
    #[serde(default)]
    pub links: HashMap<String, String>,

    /// Link type → link key.
    #[serde(default)]
    pub defaults: HashMap<String, String>,

    /// Trainer id → (link type → link key).
    #[serde(default)]
    pub trainers: HashMap<String, HashMap<String, String>>,
}

impl LinkConfig {
    /// Build from an arbitrary JSON value, keeping only well-typed entries.
    ///
    /// Missing or non-object sections become empty maps. Falsy entries
    /// (`null`, `false`, `0`, `""`) are skipped; other non-string entries are
    /// kept as their JSON text, so a link such as `42` still resolves and is
    /// then refused by the HTTPS check.
    pub fn from_value(value: &Value) -> Self {
        let root = match value.as_object() {
            Some(obj) => obj,
            None => return Self::default(),
        };

        let trainers: HashMap<String, HashMap<String, String>> = section(root, "trainers")
            .map(|obj| {
                obj.iter()
                    .filter_map(|(id, mapping)| {
                        mapping.as_object().map(|m| (id.clone(), text_entries(m)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            links: section(root, "links").map(text_entries).unwrap_or_default(),
            defaults: section(root, "defaults").map(text_entries).unwrap_or_default(),
            trainers,
        }
    }

    /// URL for a link key. Empty values count as absent.
    pub fn url_for(&self, key: &str) -> Option<&str> {
        self.links
            .get(key)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }

    /// Link key a trainer has mapped for the given link type.
    pub fn trainer_key(&self, trainer_id: &str, link_type: &str) -> Option<&str> {
        self.trainers
            .get(trainer_id)?
            .get(link_type)
            .map(String::as_str)
            .filter(|key| !key.is_empty())
    }

    /// Default link key for the given link type.
    pub fn default_key(&self, link_type: &str) -> Option<&str> {
        self.defaults
            .get(link_type)
            .map(String::as_str)
            .filter(|key| !key.is_empty())
    }
}

fn section<'a>(root: &'a Map<String, Value>, name: &str) -> Option<&'a Map<String, Value>> {
    root.get(name).and_then(Value::as_object)
}

fn text_entries(obj: &Map<String, Value>) -> HashMap<String, String> {
    obj.iter()
        .filter_map(|(k, v)| entry_text(v).map(|text| (k.clone(), text)))
        .collect()
}

/// Text of a present entry; `None` for falsy values.
fn entry_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Failure to read or parse the links file.
#[derive(Debug, Error)]
pub enum LinkLoadError {
    #[error("cannot read links file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse links file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A structural problem found in a links document. Reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeIssue {
    #[error("document is not an object")]
    NotAnObject,

    #[error("missing '{0}'")]
    MissingSection(&'static str),

    #[error("links.{0} is not a string")]
    NonStringLink(String),

    #[error("links.{0} is not HTTPS")]
    NotHttps(String),

    #[error("links.{0} has a domain that is not allowed")]
    DomainNotAllowed(String),
}

/// Check a links document and return every problem found.
pub fn validate_shape(value: &Value) -> Vec<ShapeIssue> {
    let root = match value.as_object() {
        Some(obj) => obj,
        None => return vec![ShapeIssue::NotAnObject],
    };

    let mut issues = Vec::new();
    for name in ["links", "defaults", "trainers"] {
        if section(root, name).is_none() {
            issues.push(ShapeIssue::MissingSection(name));
        }
    }

    if let Some(links) = section(root, "links") {
        for (key, value) in links {
            match value.as_str() {
                None => issues.push(ShapeIssue::NonStringLink(key.clone())),
                Some(url) if !is_https(url) => issues.push(ShapeIssue::NotHttps(key.clone())),
                Some(url) if !is_allowed_domain(url) => {
                    issues.push(ShapeIssue::DomainNotAllowed(key.clone()))
                }
                Some(_) => {}
            }
        }
    }

    issues
}

/// A links document as read from disk, with its shape report.
#[derive(Debug, Clone)]
pub struct LoadedLinks {
    pub config: LinkConfig,
    pub issues: Vec<ShapeIssue>,
}

/// Read, parse and shape-check a links file.
pub fn read_links(path: &Path) -> Result<LoadedLinks, LinkLoadError> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    Ok(LoadedLinks {
        config: LinkConfig::from_value(&value),
        issues: validate_shape(&value),
    })
}

/// Load the links file for serving, degrading to an empty config on failure.
pub fn load_links(path: &Path) -> LinkConfig {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Links file not found, using empty configuration");
        return LinkConfig::default();
    }

    match read_links(path) {
        Ok(loaded) => {
            if !loaded.issues.is_empty() {
                let report: Vec<String> = loaded.issues.iter().map(ToString::to_string).collect();
                tracing::warn!(
                    path = %path.display(),
                    issues = %report.join("; "),
                    "Links file has problems, using it as-is"
                );
            }
            tracing::info!(
                links = loaded.config.links.len(),
                defaults = loaded.config.defaults.len(),
                trainers = loaded.config.trainers.len(),
                "Links loaded"
            );
            loaded.config
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to load links, using empty configuration");
            LinkConfig::default()
        }
    }
}
