//! Tag dictionaries and the provider registry
//!
//! A [`TlvInfoService`] answers "what does tag T mean in this context" for
//! one payment standard or scheme. The [`TlvInfoRegistry`] holds an ordered
//! list of providers and dispatches to the first one that claims the
//! (standard, context) pair.
//!
//! Registration is an explicit initialisation step. A built registry is
//! immutable and can be shared across threads. For callers that want a
//! process-wide instance, [`install_global`] stores one registry before first
//! use and [`global`] falls back to the default providers.

use crate::context::{Context, Standard};
use crate::providers;
use once_cell::sync::OnceCell;
use qrdata_core::{QrDataError, QrDataResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to the formatter that renders a value for display
///
/// Formatting itself happens outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueFormat {
    Ascii,
    Number,
    LargeInteger,
    Timestamp,
    Duration,
    Amount,
    UniqueId,
    PayloadFormatIndicator,
    PointOfInitiation,
    MerchantCategory,
    Currency,
    Country,
    Crc,
    AlipayData,
    QcatSignature,
    NestedTlv,
}

/// Metadata of a tag in a given context
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TlvInfo {
    pub tag: u32,
    pub name: &'static str,
    pub is_template: bool,
    pub format: Option<ValueFormat>,
}

impl TlvInfo {
    pub const fn leaf(tag: u32, name: &'static str, format: ValueFormat) -> Self {
        Self {
            tag,
            name,
            is_template: false,
            format: Some(format),
        }
    }

    pub const fn template(tag: u32, name: &'static str) -> Self {
        Self {
            tag,
            name,
            is_template: true,
            format: None,
        }
    }

    /// Generic entry for scheme-specific data without a known meaning
    pub const fn proprietary(tag: u32) -> Self {
        Self {
            tag,
            name: "Proprietary",
            is_template: false,
            format: None,
        }
    }
}

/// Provider of tag metadata for one standard or payment scheme
///
/// Providers hold fixed dictionaries and never change state, so a single
/// instance can answer concurrent lookups.
#[cfg_attr(test, mockall::automock)]
pub trait TlvInfoService: Send + Sync {
    /// Provider name used in diagnostics
    fn name(&self) -> &'static str;

    /// Whether this provider has the dictionary for `standard` in `context`
    fn is_responsible_for(&self, standard: Standard, context: &Context) -> bool;

    /// Metadata of `tag` in `context`, `None` if the dictionary has no entry
    fn info(&self, tag: u32, context: &Context) -> Option<TlvInfo>;
}

/// Ordered, immutable collection of providers
pub struct TlvInfoRegistry {
    providers: Vec<Box<dyn TlvInfoService>>,
}

impl TlvInfoRegistry {
    pub fn builder() -> TlvInfoRegistryBuilder {
        TlvInfoRegistryBuilder::new()
    }

    /// Registry with the built-in providers only
    pub fn with_default_providers() -> Self {
        Self::builder().with_default_providers().build()
    }

    /// Providers in registration order
    pub fn providers(&self) -> impl Iterator<Item = &dyn TlvInfoService> {
        self.providers.iter().map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// First provider in registration order responsible for `standard`/`context`
    ///
    /// # Error Handling
    /// Returns [`QrDataError::ProviderNotFound`] if no provider claims the pair.
    pub fn lookup(&self, standard: Standard, context: &Context) -> QrDataResult<&dyn TlvInfoService> {
        self.providers()
            .find(|p| p.is_responsible_for(standard, context))
            .ok_or_else(|| {
                QrDataError::ProviderNotFound(format!(
                    "No TLV info service for {} / {}",
                    standard, context
                ))
            })
    }

    /// Metadata of `tag`
    ///
    /// # Returns
    /// - `Err` if no provider is responsible for the context
    /// - `Ok(None)` if the responsible provider has no entry for the tag
    pub fn info(&self, standard: Standard, context: &Context, tag: u32) -> QrDataResult<Option<TlvInfo>> {
        let provider = self.lookup(standard, context)?;
        let info = provider.info(tag, context);
        if info.is_none() {
            log::trace!(
                "{} has no info for tag 0x{:02X} in {}",
                provider.name(),
                tag,
                context
            );
        }
        Ok(info)
    }

    /// Like [`TlvInfoRegistry::info`] but a missing entry is an error as well
    pub fn require_info(&self, standard: Standard, context: &Context, tag: u32) -> QrDataResult<TlvInfo> {
        let provider = self.lookup(standard, context)?;
        provider.info(tag, context).ok_or_else(|| {
            QrDataError::LookupMiss(format!(
                "{} does not provide info for tag 0x{:02X} in context: {}",
                provider.name(),
                tag,
                context
            ))
        })
    }
}

impl fmt::Debug for TlvInfoRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.name()))
            .finish()
    }
}

impl Default for TlvInfoRegistry {
    fn default() -> Self {
        Self::with_default_providers()
    }
}

/// Builder collecting providers before the registry is frozen
#[derive(Default)]
pub struct TlvInfoRegistryBuilder {
    providers: Vec<Box<dyn TlvInfoService>>,
}

impl TlvInfoRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the built-in providers
    pub fn with_default_providers(mut self) -> Self {
        self.providers.extend(providers::default_providers());
        self
    }

    /// Append a provider. Earlier registrations take precedence.
    pub fn register<P>(mut self, provider: P) -> Self
    where
        P: TlvInfoService + 'static,
    {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn register_boxed(mut self, provider: Box<dyn TlvInfoService>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn build(self) -> TlvInfoRegistry {
        log::debug!("TLV info registry built with {} providers", self.providers.len());
        TlvInfoRegistry {
            providers: self.providers,
        }
    }
}

static GLOBAL_REGISTRY: OnceCell<TlvInfoRegistry> = OnceCell::new();

/// Install the process-wide registry
///
/// # Error Handling
/// Fails with [`QrDataError::InvalidData`] if a registry was already
/// installed or [`global`] has already been used.
pub fn install_global(registry: TlvInfoRegistry) -> QrDataResult<()> {
    GLOBAL_REGISTRY.set(registry).map_err(|_| {
        QrDataError::InvalidData("Global TLV info registry is already initialised".to_string())
    })
}

/// Process-wide registry, initialised with the default providers on first use
pub fn global() -> &'static TlvInfoRegistry {
    GLOBAL_REGISTRY.get_or_init(TlvInfoRegistry::with_default_providers)
}
