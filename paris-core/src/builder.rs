//! Builder utilities for configuring Paris runs.
//!
//! Exposes the engine selection surface and the validation performed before a
//! [`Paris`] instance is constructed.

use std::{fmt, str::FromStr, sync::Arc};

use crate::{Result, error::ParisError, paris::Paris};

/// Aggregate graph representation used by [`Paris::fit`].
///
/// Both engines produce identical dendrograms; they differ only in memory
/// layout and speed. `Auto` resolves to [`Engine::Flat`].
///
/// # Examples
/// ```
/// use paris_core::Engine;
///
/// let engine: Engine = "numba".parse()?;
/// assert_eq!(engine, Engine::Flat);
/// assert_eq!(Engine::Auto.resolve(), Engine::Flat);
/// assert!("gpu".parse::<Engine>().is_err());
/// # Ok::<(), paris_core::ParisError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Engine {
    /// Let the library choose.
    #[default]
    Auto,
    /// Arena of per-cluster neighbour maps.
    Reference,
    /// Flat adjacency lists with a packed-pair weight map.
    Flat,
}

impl Engine {
    /// Maps [`Engine::Auto`] to a concrete engine and leaves the others
    /// unchanged.
    #[must_use]
    pub const fn resolve(self) -> Self {
        match self {
            Self::Auto | Self::Flat => Self::Flat,
            Self::Reference => Self::Reference,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Reference => "reference",
            Self::Flat => "flat",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = ParisError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" | "default" => Ok(Self::Auto),
            "reference" | "python" => Ok(Self::Reference),
            "flat" | "numba" => Ok(Self::Flat),
            _ => Err(ParisError::UnknownEngine {
                name: Arc::from(raw),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EngineChoice {
    Selected(Engine),
    Named(String),
}

/// Configures and constructs [`Paris`] instances.
///
/// # Examples
/// ```
/// use paris_core::{Engine, ParisBuilder};
///
/// let paris = ParisBuilder::new()
///     .with_engine(Engine::Reference)
///     .with_reorder(false)
///     .build()?;
/// assert_eq!(paris.engine(), Engine::Reference);
/// assert!(!paris.reorder());
/// # Ok::<(), paris_core::ParisError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ParisBuilder {
    engine: EngineChoice,
    reorder: bool,
}

impl Default for ParisBuilder {
    fn default() -> Self {
        Self {
            engine: EngineChoice::Selected(Engine::Auto),
            reorder: true,
        }
    }
}

impl ParisBuilder {
    /// Creates a builder with the automatic engine and reordering enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the engine.
    #[must_use]
    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = EngineChoice::Selected(engine);
        self
    }

    /// Selects the engine by name; the name is validated by
    /// [`ParisBuilder::build`].
    ///
    /// # Examples
    /// ```
    /// use paris_core::{ParisBuilder, ParisErrorCode};
    ///
    /// let err = ParisBuilder::new().with_engine_name("gpu").build().unwrap_err();
    /// assert_eq!(err.code(), ParisErrorCode::UnknownEngine);
    /// ```
    #[must_use]
    pub fn with_engine_name(mut self, name: impl Into<String>) -> Self {
        self.engine = EngineChoice::Named(name.into());
        self
    }

    /// Controls whether the dendrogram is reordered by height.
    #[must_use]
    pub fn with_reorder(mut self, reorder: bool) -> Self {
        self.reorder = reorder;
        self
    }

    /// Returns whether reordering is enabled.
    #[must_use]
    pub fn reorder(&self) -> bool {
        self.reorder
    }

    /// Validates the configuration and constructs a [`Paris`] instance.
    ///
    /// # Errors
    /// Returns [`ParisError::UnknownEngine`] when the engine was given by a
    /// name that does not match any engine.
    pub fn build(self) -> Result<Paris> {
        let engine = match self.engine {
            EngineChoice::Selected(engine) => engine,
            EngineChoice::Named(name) => name.parse()?,
        };
        Ok(Paris::new(engine, self.reorder))
    }
}
