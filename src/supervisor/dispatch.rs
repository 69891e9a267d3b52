//! Dispatch vocabulary — operation kinds, callback names, filter payloads.
//!
//! A callback's text form is `"<kind>_<identity>"`. Parsing is anchored: the
//! prefix must be exactly one of the two operation kinds followed by `_`;
//! everything after the first separator is the identity token.

use std::fmt;

use serde_json::Value;

use super::registry::HandlerId;

/// The two callback shapes the host dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// The host's "is there a new version" flow (arity 4).
    Update,
    /// The host's "show me details about this package" flow (arity 3).
    Api,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Api => "api",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "update" => Some(Self::Update),
            "api" => Some(Self::Api),
            _ => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite identity of one registered callback: operation kind plus the
/// handler identity it routes to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackName {
    pub kind: OperationKind,
    pub id: HandlerId,
}

impl CallbackName {
    pub(crate) fn new(kind: OperationKind, id: HandlerId) -> Self {
        Self { kind, id }
    }

    /// Parse `"<kind>_<identity>"`. `None` when the prefix is not a
    /// recognized operation kind.
    pub fn parse(name: &str) -> Option<Self> {
        let (prefix, token) = name.split_once('_')?;
        let kind = OperationKind::from_prefix(prefix)?;
        Some(Self {
            kind,
            id: HandlerId::from_token(token),
        })
    }
}

impl fmt::Display for CallbackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.as_str(), self.id)
    }
}

/// Request portion of an informational-API invocation.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub slug: String,
    /// Requested locale; the supervisor falls back to its configured default.
    pub locale: Option<String>,
}

/// Update-check filter payload (arity 4).
#[derive(Debug, Clone)]
pub struct UpdateCheckArgs {
    /// Current update data — `false`, or whatever an earlier callback produced.
    pub update_data: Value,
    /// Package header metadata as the host parsed it. Passed through untouched.
    pub package_data: Value,
    /// Package file, e.g. `"myplugin/myplugin.php"`.
    pub package_file: String,
    /// Locales the host wants update metadata for.
    pub locales: Vec<String>,
}

/// Informational-API filter payload (arity 3).
#[derive(Debug, Clone)]
pub struct ApiArgs {
    /// Current package info — `false`, or whatever an earlier callback produced.
    pub package_info: Value,
    /// Requested action, e.g. `"plugin_information"`.
    pub action: String,
    pub request: ApiRequest,
}

/// One dispatch request's payload, by filter shape.
///
/// The passthrough slots are [`serde_json::Value`] because the host's filter
/// values are host-typed, not ours — earlier callbacks in a chain may have
/// written anything into them.
#[derive(Debug, Clone)]
pub enum DispatchArgs {
    UpdateCheck(UpdateCheckArgs),
    Api(ApiArgs),
}

impl DispatchArgs {
    /// The slot a filter chain threads between callbacks.
    pub fn value(&self) -> &Value {
        match self {
            Self::UpdateCheck(a) => &a.update_data,
            Self::Api(a) => &a.package_info,
        }
    }

    /// Replace the threaded slot with `value`.
    pub(crate) fn with_value(mut self, value: Value) -> Self {
        match &mut self {
            Self::UpdateCheck(a) => a.update_data = value,
            Self::Api(a) => a.package_info = value,
        }
        self
    }

    pub(crate) fn shape(&self) -> &'static str {
        match self {
            Self::UpdateCheck(_) => "update-check",
            Self::Api(_) => "api",
        }
    }
}

/// Host-convention truthiness: `null`, `false`, `0`, `""`, `"0"` and empty
/// collections are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
