//! Session identifiers and the process-wide identifier generator.

use crate::errors::{ContextError, Result};
use arc_swap::ArcSwapOption;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Leading segment of generated ids unless a brand is configured
pub const DEFAULT_ID_BRAND: &str = "REWIND";

static GLOBAL_GENERATOR: Lazy<Arc<IdGenerator>> = Lazy::new(|| Arc::new(IdGenerator::new()));

/// Opaque session identifier, `<brand>-<hostTag>-<epochMillis><counter>`.
///
/// Cloning is a reference-count bump.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct SessionId(Arc<str>);

impl SessionId {
    /// Wrap an externally supplied id (e.g. one received on an inbound request)
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for SessionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(SessionId::from)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Generates process-unique session ids.
///
/// The prefix can be swapped at any time with [`configure`](Self::configure);
/// the counter is never reset, so ids issued after a reconfiguration cannot
/// collide with earlier ones even when the host tag is unchanged.
#[derive(Debug)]
pub struct IdGenerator {
    prefix: ArcSwapOption<String>,
    counter: AtomicU64,
}

impl IdGenerator {
    /// Create an unconfigured generator
    pub fn new() -> Self {
        Self {
            prefix: ArcSwapOption::empty(),
            counter: AtomicU64::new(0),
        }
    }

    /// Create a generator configured for `host_tag`
    pub fn with_host_tag(host_tag: &str) -> Self {
        let generator = Self::new();
        generator.configure(host_tag);
        generator
    }

    /// The generator shared by the whole process
    pub fn global() -> Arc<IdGenerator> {
        GLOBAL_GENERATOR.clone()
    }

    /// (Re)set the prefix from a host or instance tag
    pub fn configure(&self, host_tag: &str) {
        self.configure_with_brand(DEFAULT_ID_BRAND, host_tag);
    }

    /// (Re)set the prefix from an explicit brand and a host or instance tag
    pub fn configure_with_brand(&self, brand: &str, host_tag: &str) {
        let prefix = format!("{}-{}-", brand, normalize_host_tag(host_tag));
        tracing::debug!(
            prefix = %prefix,
            counter = self.counter.load(Ordering::Relaxed),
            "session id generator configured"
        );
        self.prefix.store(Some(Arc::new(prefix)));
    }

    pub fn is_configured(&self) -> bool {
        self.prefix.load().is_some()
    }

    /// Issue the next id.
    ///
    /// Fails with [`ContextError::NotConfigured`] until `configure` has run.
    pub fn next(&self) -> Result<SessionId> {
        let prefix = self.prefix.load_full().ok_or(ContextError::NotConfigured)?;
        let sequence = self.counter.fetch_add(1, Ordering::AcqRel);
        let millis = chrono::Utc::now().timestamp_millis();
        Ok(SessionId::new(format!("{}{}{}", prefix, millis, sequence)))
    }

    /// Number of ids issued so far
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Acquire)
    }
}

/// Replace separator characters (`.`, `:`, `/`, `\`, whitespace) with `-`
pub fn normalize_host_tag(host_tag: &str) -> String {
    host_tag
        .trim()
        .chars()
        .map(|c| match c {
            '.' | ':' | '/' | '\\' => '-',
            c if c.is_whitespace() => '-',
            c => c,
        })
        .collect()
}
