//! Registry/dispatcher for CMS package update sources.
//!
//! Update handlers are registered per hostname. When the host asks whether a
//! package originating from that hostname has an update — or for details
//! about it — the supervisor routes the host's filter invocation to the
//! matching handler, instantiating it on first use and caching it for the
//! rest of the process. Multiple registrations for one hostname run in
//! registration order, first writer wins.
//!
//! ```no_run
//! use update_supervisor::{register_updater, RemoteHandler, RemoteSource, Supervisor, UpdaterConfig};
//!
//! struct AcmeUpdates;
//!
//! impl RemoteSource for AcmeUpdates {
//!     fn update_uri(&self, slug: &str) -> String {
//!         format!("https://updates.acme.dev/info/{slug}")
//!     }
//! }
//!
//! let mut supervisor = Supervisor::new(UpdaterConfig::default());
//! register_updater(
//!     &mut supervisor,
//!     || RemoteHandler::new(AcmeUpdates).expect("HTTP client"),
//!     "updates.acme.dev",
//!     &["plugin", "theme"],
//! )
//! .expect("registration");
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod supervisor;

pub use config::UpdaterConfig;
pub use error::UpdaterError;
pub use handler::{
    slug_from_package_file, BoxedHandler, HandlerFactory, RemoteHandler, RemoteSource,
    UpdateHandler, UpdateInfo,
};
pub use supervisor::dispatch::{
    ApiArgs, ApiRequest, CallbackName, DispatchArgs, OperationKind, UpdateCheckArgs,
};
pub use supervisor::registry::HandlerId;
pub use supervisor::{HookBinding, PackageType, Supervisor};

/// Register an updater produced by `factory` for `hostname` and `types`.
///
/// `types` tolerates singular and plural spellings (`"plugin"`, `"plugins"`,
/// `"theme"`, `"themes"`). The factory runs at most once, on the first
/// dispatch that needs the handler.
pub fn register_updater<F, H>(
    supervisor: &mut Supervisor,
    factory: F,
    hostname: &str,
    types: &[&str],
) -> Result<(), UpdaterError>
where
    F: FnOnce() -> H + Send + 'static,
    H: UpdateHandler + 'static,
{
    let types = parse_types(hostname, types)?;
    supervisor.register(
        hostname,
        &types,
        Box::new(move || -> BoxedHandler { Box::new(factory()) }),
    )
}

/// Register a pre-built handler instance.
pub fn register_updater_instance<H>(
    supervisor: &mut Supervisor,
    handler: H,
    hostname: &str,
    types: &[&str],
) -> Result<(), UpdaterError>
where
    H: UpdateHandler + 'static,
{
    register_updater(supervisor, move || handler, hostname, types)
}

/// Register a handler type constructed with no arguments.
pub fn register_updater_default<H>(
    supervisor: &mut Supervisor,
    hostname: &str,
    types: &[&str],
) -> Result<(), UpdaterError>
where
    H: UpdateHandler + Default + 'static,
{
    register_updater(supervisor, H::default, hostname, types)
}

fn parse_types(hostname: &str, types: &[&str]) -> Result<Vec<PackageType>, UpdaterError> {
    types
        .iter()
        .map(|t| {
            PackageType::parse(t).ok_or_else(|| {
                UpdaterError::Registration(format!("unknown package type {t:?} for {hostname}"))
            })
        })
        .collect()
}
