//! Resolution of the platform conversion service
//!
//! A host can expose the converter in two ways: bound directly, or
//! registered by name in a legacy module registry. The choice is made once
//! when a [`Binding`] is built. The resulting binding never changes and is
//! injected into [`crate::converter::WebpConverter`].

use crate::platform::{ConversionService, UnlinkedConverter};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// Name the converter is registered under in a [`ModuleRegistry`].
pub const MODULE_NAME: &str = "WebpConverter";

/// Module-registration mechanism enabled in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    /// The service is handed over directly.
    Direct,
    /// The service is looked up by name in a [`ModuleRegistry`].
    Bridge,
}

impl FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Architecture::Direct),
            "bridge" => Ok(Architecture::Bridge),
            _ => Err(format!(
                "Invalid architecture '{}'. Expected direct or bridge",
                s
            )),
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::Direct => write!(f, "direct"),
            Architecture::Bridge => write!(f, "bridge"),
        }
    }
}

/// Legacy name-based lookup of conversion services.
#[derive(Default, Clone)]
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<dyn ConversionService>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, service: Arc<dyn ConversionService>) {
        self.modules.insert(name.into(), service);
    }

    pub fn with_module(mut self, name: impl Into<String>, service: Arc<dyn ConversionService>) -> Self {
        self.register(name, service);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ConversionService>> {
        self.modules.get(name).cloned()
    }
}

/// The conversion service selected for the lifetime of the process.
#[derive(Clone)]
pub struct Binding {
    architecture: Architecture,
    linked: bool,
    service: Arc<dyn ConversionService>,
}

impl Binding {
    /// Pick the service for `architecture`.
    ///
    /// Falls back to [`UnlinkedConverter`] when the chosen mechanism has
    /// nothing to offer, so every later call fails with a linking error.
    pub fn resolve(
        architecture: Architecture,
        direct: Option<Arc<dyn ConversionService>>,
        registry: &ModuleRegistry,
    ) -> Self {
        let resolved = match architecture {
            Architecture::Direct => direct,
            Architecture::Bridge => registry.get(MODULE_NAME),
        };

        match resolved {
            Some(service) => {
                info!("Resolved WebP converter via {} binding", architecture);
                Self {
                    architecture,
                    linked: true,
                    service,
                }
            }
            None => {
                warn!(
                    "No WebP converter available via {} binding; conversions will fail",
                    architecture
                );
                Self::unlinked(architecture)
            }
        }
    }

    /// Bind a service directly, bypassing resolution.
    pub fn direct(service: Arc<dyn ConversionService>) -> Self {
        Self {
            architecture: Architecture::Direct,
            linked: true,
            service,
        }
    }

    pub fn unlinked(architecture: Architecture) -> Self {
        Self {
            architecture,
            linked: false,
            service: Arc::new(UnlinkedConverter::new()),
        }
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn service(&self) -> &Arc<dyn ConversionService> {
        &self.service
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("architecture", &self.architecture)
            .field("linked", &self.linked)
            .finish()
    }
}
