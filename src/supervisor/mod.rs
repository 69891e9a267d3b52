//! Supervisor — binds update handlers to hostnames and routes the host's
//! update-check and informational-API filters to them.
//!
//! The supervisor is constructed once at process start and threaded through
//! to whatever drives dispatch; there is no global instance. Registration
//! expands a hook-binding table the host's filter mechanism consults.
//! Dispatch resolves the named handler (instantiating it on first use) and
//! runs the matching callback. Malformed requests never escape: they are
//! logged and degrade to the neutral "no data" value, so the host's control
//! flow is undisturbed.
//!
//! # Concurrency
//!
//! The execution model is single-threaded and request-driven. `register` and
//! `dispatch` take `&mut self`, which makes the first-resolution
//! read-modify-write safe by construction; a concurrent host must put the
//! supervisor behind its own lock to keep the one-instantiation-per-identity
//! guarantee.

pub mod dispatch;
pub mod registry;

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::UpdaterConfig;
use crate::error::UpdaterError;
use crate::handler::{HandlerFactory, UpdateHandler, UpdateInfo};
use dispatch::{is_truthy, ApiArgs, CallbackName, DispatchArgs, OperationKind, UpdateCheckArgs};
use registry::HandlerRegistry;

/// Informational actions the API callback answers.
const API_ACTIONS: [&str; 2] = ["plugin_information", "theme_information"];

/// Package types the host fires update hooks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageType {
    Plugin,
    Theme,
}

impl PackageType {
    /// Parse a type name, tolerating singular and plural spellings.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim_end_matches('s') {
            "plugin" => Some(Self::Plugin),
            "theme" => Some(Self::Theme),
            _ => None,
        }
    }

    /// Plural form, as used in hook names.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Plugin => "plugins",
            Self::Theme => "themes",
        }
    }
}

/// One callback wired into a host hook.
#[derive(Debug, Clone)]
pub struct HookBinding {
    /// Composite callback identity the host addresses the supervisor with.
    pub callback: CallbackName,
    /// Per-hostname registration order; lower runs first.
    pub priority: u32,
    /// Number of filter arguments the callback accepts.
    pub arity: u8,
}

/// Registry and dispatcher for update-source handlers.
pub struct Supervisor {
    config: UpdaterConfig,
    registry: HandlerRegistry,
    /// hostname -> next registration priority.
    hostnames: HashMap<String, u32>,
    /// hook name -> bindings in execution order.
    hooks: HashMap<String, Vec<HookBinding>>,
}

impl Supervisor {
    pub fn new(config: UpdaterConfig) -> Self {
        Self {
            config,
            registry: HandlerRegistry::default(),
            hostnames: HashMap::new(),
            hooks: HashMap::new(),
        }
    }

    /// Register an update handler factory for `hostname` and `types`.
    ///
    /// `hostname` accepts a bare hostname or a full URL; the host component
    /// is what the registration binds under. Each call mints a fresh handler
    /// identity and the next priority for that hostname, then wires two
    /// hooks per type: the update-check hook `update_<types>_<hostname>`
    /// (arity 4) and the informational hook `<types>_api` (arity 3).
    ///
    /// Registrations are independent: registering twice for one hostname
    /// never overwrites the first — both run, in increasing priority order,
    /// each wrapping the previous result.
    ///
    /// Rejected with [`UpdaterError::Registration`] when `hostname` yields no
    /// host component or `types` is empty.
    pub fn register(
        &mut self,
        hostname: &str,
        types: &[PackageType],
        factory: HandlerFactory,
    ) -> Result<(), UpdaterError> {
        let hostname = normalize_hostname(hostname).ok_or_else(|| {
            UpdaterError::Registration(format!("no host component in {hostname:?}"))
        })?;
        if types.is_empty() {
            return Err(UpdaterError::Registration(format!(
                "no package types given for {hostname}"
            )));
        }

        let id = self.registry.add(factory);
        let priority = self.next_priority(&hostname);

        for ty in types {
            let update_hook = format!("update_{}_{}", ty.plural(), hostname);
            let api_hook = format!("{}_api", ty.plural());

            self.bind(
                update_hook,
                CallbackName::new(OperationKind::Update, id.clone()),
                priority,
                4,
            );
            self.bind(
                api_hook,
                CallbackName::new(OperationKind::Api, id.clone()),
                priority,
                3,
            );
        }

        debug!(%hostname, priority, handler = %id, "updater registered");
        Ok(())
    }

    /// Callbacks bound to `hook`, in execution order.
    pub fn bindings(&self, hook: &str) -> &[HookBinding] {
        self.hooks.get(hook).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Hook names with at least one binding.
    pub fn hooks(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }

    /// String-addressed router entry: decode `name`, then dispatch.
    ///
    /// A name matching neither operation kind degrades to the neutral
    /// `false` after a warning.
    pub fn call(&mut self, name: &str, args: DispatchArgs) -> Value {
        match CallbackName::parse(name) {
            Some(callback) => self.dispatch(&callback, args),
            None => {
                warn!(%name, "invalid callback name; returning no data");
                Value::Bool(false)
            }
        }
    }

    /// Route one dispatch request to its handler's callback.
    ///
    /// Any failure — unknown identity, kind/payload mismatch — is caught
    /// here, reported through the warning channel, and degraded to `false`.
    pub fn dispatch(&mut self, callback: &CallbackName, args: DispatchArgs) -> Value {
        match self.try_dispatch(callback, args) {
            Ok(value) => value,
            Err(e) => {
                warn!(callback = %callback, error = %e, "dispatch failed; returning no data");
                Value::Bool(false)
            }
        }
    }

    /// Drive a host filter chain: run every callback bound to `hook` in
    /// priority order, threading each return value into the next
    /// invocation's passthrough slot. Unknown hooks return the initial value
    /// unchanged.
    pub fn run_hook(&mut self, hook: &str, args: DispatchArgs) -> Value {
        let callbacks: Vec<CallbackName> = self
            .bindings(hook)
            .iter()
            .map(|b| b.callback.clone())
            .collect();
        if callbacks.is_empty() {
            debug!(%hook, "no bindings for hook");
            return args.value().clone();
        }

        let mut args = args;
        for callback in &callbacks {
            let value = self.dispatch(callback, args.clone());
            args = args.with_value(value);
        }
        args.value().clone()
    }

    fn try_dispatch(
        &mut self,
        callback: &CallbackName,
        args: DispatchArgs,
    ) -> Result<Value, UpdaterError> {
        let default_locale = &self.config.default_locale;
        let handler = self.registry.resolve(&callback.id)?;

        match (callback.kind, args) {
            (OperationKind::Update, DispatchArgs::UpdateCheck(args)) => {
                Ok(update_callback(args, handler))
            }
            (OperationKind::Api, DispatchArgs::Api(args)) => {
                Ok(api_callback(args, handler, default_locale))
            }
            (kind, args) => Err(UpdaterError::InvalidCallback(format!(
                "{kind} callback invoked with {} arguments",
                args.shape()
            ))),
        }
    }

    fn next_priority(&mut self, hostname: &str) -> u32 {
        let next = self.hostnames.entry(hostname.to_string()).or_insert(0);
        let priority = *next;
        *next += 1;
        priority
    }

    fn bind(&mut self, hook: String, callback: CallbackName, priority: u32, arity: u8) {
        let bindings = self.hooks.entry(hook).or_default();
        // Re-binding the same callback at the same priority is a no-op.
        if bindings
            .iter()
            .any(|b| b.callback == callback && b.priority == priority)
        {
            return;
        }
        bindings.push(HookBinding {
            callback,
            priority,
            arity,
        });
        bindings.sort_by_key(|b| b.priority);
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new(UpdaterConfig::default())
    }
}

/// Extract the host component, accepting bare hostnames or full URLs.
fn normalize_hostname(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let url = Url::parse(&candidate).ok()?;
    url.host_str().map(|h| h.to_ascii_lowercase())
}

/// Update-check callback: first writer wins across the priority chain.
fn update_callback(args: UpdateCheckArgs, handler: &dyn UpdateHandler) -> Value {
    if is_truthy(&args.update_data) {
        return args.update_data;
    }

    match handler.get_update_data(&args.package_file, &args.locales) {
        Some(info) => info_to_value(info),
        None => Value::Bool(false),
    }
}

/// Informational-API callback: only the recognized actions, and only when no
/// earlier callback produced data.
fn api_callback(args: ApiArgs, handler: &dyn UpdateHandler, default_locale: &str) -> Value {
    if !API_ACTIONS.contains(&args.action.as_str()) || is_truthy(&args.package_info) {
        return args.package_info;
    }

    let locale = args
        .request
        .locale
        .clone()
        .unwrap_or_else(|| default_locale.to_string());

    match handler.get_update_data(&args.request.slug, &[locale]) {
        Some(info) => info_to_value(info),
        None => Value::Bool(false),
    }
}

fn info_to_value(info: UpdateInfo) -> Value {
    serde_json::to_value(info).unwrap_or(Value::Bool(false))
}
