//! Handler identities and the factory registry.
//!
//! Each registered factory gets one freshly-minted [`HandlerId`]; the same
//! factory value registered twice gets two. Resolution is an explicit
//! compute-once cache: the factory is taken out of the pending table and
//! invoked at most once, its product memoized for the remainder of the
//! process.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;
use uuid::Uuid;

use crate::error::UpdaterError;
use crate::handler::{BoxedHandler, HandlerFactory, UpdateHandler};

/// Opaque identity of one registered handler factory.
///
/// Unique for the process lifetime and never reused, even when the factory
/// it names is later superseded. Uniqueness is probabilistic (random v4
/// UUID), acceptable for a process-lifetime handler count in the tens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerId(String);

impl HandlerId {
    /// Mint a fresh identity: a v4 UUID with the dashes stripped.
    pub(crate) fn mint() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Reconstruct an identity from its text form (callback-name decoding).
    pub(crate) fn from_token(token: &str) -> Self {
        Self(token.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Factory and instance tables keyed by [`HandlerId`].
#[derive(Default)]
pub struct HandlerRegistry {
    /// Factories not yet invoked.
    factories: HashMap<HandlerId, HandlerFactory>,
    /// Memoized handler instances.
    handlers: HashMap<HandlerId, BoxedHandler>,
}

impl HandlerRegistry {
    /// Store `factory` under a freshly minted identity and return it.
    pub fn add(&mut self, factory: HandlerFactory) -> HandlerId {
        let id = HandlerId::mint();
        debug!(handler = %id, "handler factory registered");
        self.factories.insert(id.clone(), factory);
        id
    }

    /// Resolve `id` to its handler, instantiating on first resolution.
    ///
    /// The factory is `FnOnce` and removed from the pending table before
    /// invocation, so a second invocation for the same identity is
    /// unrepresentable.
    pub fn resolve(&mut self, id: &HandlerId) -> Result<&dyn UpdateHandler, UpdaterError> {
        if !self.handlers.contains_key(id) {
            let factory = self
                .factories
                .remove(id)
                .ok_or_else(|| UpdaterError::UnknownHandler(id.to_string()))?;
            debug!(handler = %id, "instantiating handler");
            self.handlers.insert(id.clone(), factory());
        }

        self.handlers
            .get(id)
            .map(|h| h.as_ref())
            .ok_or_else(|| UpdaterError::UnknownHandler(id.to_string()))
    }
}
