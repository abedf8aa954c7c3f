use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use opentelemetry::metrics::MeterProvider;

use crate::backend::{MeterBackend, OpenTelemetry};
use crate::constants::DEFAULT_INSTRUMENTATION_NAME;

/// Settings the middleware is built from.
///
/// Either fold a list of [`Opt`] over the defaults with [`Config::new`], or
/// use struct update syntax on [`Config::default`].
#[derive(Clone)]
pub struct Config {
    pub backend: Arc<dyn MeterBackend>,
    pub instrumentation_name: String,

    pub instrument_request_duration: bool,
    pub instrument_request_count: bool,

    pub instrument_resolver_duration: bool,
    pub instrument_resolver_count: bool,
    pub instrument_resolver_custom_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Arc::new(OpenTelemetry::global()),
            instrumentation_name: DEFAULT_INSTRUMENTATION_NAME.to_string(),
            instrument_request_duration: true,
            instrument_request_count: true,
            instrument_resolver_duration: true,
            instrument_resolver_count: true,
            instrument_resolver_custom_only: false,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("instrumentation_name", &self.instrumentation_name)
            .field(
                "instrument_request_duration",
                &self.instrument_request_duration,
            )
            .field("instrument_request_count", &self.instrument_request_count)
            .field(
                "instrument_resolver_duration",
                &self.instrument_resolver_duration,
            )
            .field("instrument_resolver_count", &self.instrument_resolver_count)
            .field(
                "instrument_resolver_custom_only",
                &self.instrument_resolver_custom_only,
            )
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Applies `options` over the defaults, in order. A later option setting
    /// the same field wins. Values are not validated.
    pub fn new(options: impl IntoIterator<Item = Opt>) -> Self {
        options
            .into_iter()
            .fold(Self::default(), |mut config, option| {
                option.apply(&mut config);
                config
            })
    }
}

/// Sets one field of a [`Config`] under construction.
pub struct Opt(Box<dyn FnOnce(&mut Config) + Send>);

impl Opt {
    fn new(f: impl FnOnce(&mut Config) + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn apply(self, config: &mut Config) {
        (self.0)(config)
    }
}

/// Custom name for the metrics scope.
pub fn with_instrumentation_name(name: impl Into<String>) -> Opt {
    let name = name.into();
    Opt::new(move |config| config.instrumentation_name = name)
}

pub fn with_meter_backend(backend: Arc<dyn MeterBackend>) -> Opt {
    Opt::new(move |config| config.backend = backend)
}

/// Use a specific OpenTelemetry meter provider instead of the global one.
pub fn with_meter_provider<P>(provider: P) -> Opt
where
    P: MeterProvider + Send + Sync + 'static,
{
    with_meter_backend(Arc::new(OpenTelemetry::new(provider)))
}

/// Enable/disable reporting of `gql.request.duration`, a histogram that can
/// result in high cardinality. Enabled by default.
pub fn with_instrument_request_duration(enabled: bool) -> Opt {
    Opt::new(move |config| config.instrument_request_duration = enabled)
}

/// Enable/disable reporting of `gql.request.completed`. Enabled by default.
pub fn with_instrument_request_count(enabled: bool) -> Opt {
    Opt::new(move |config| config.instrument_request_count = enabled)
}

/// Enable/disable reporting of `gql.resolver.duration`, a histogram that can
/// result in high cardinality. Enabled by default.
pub fn with_instrument_resolver_duration(enabled: bool) -> Opt {
    Opt::new(move |config| config.instrument_resolver_duration = enabled)
}

/// Enable/disable reporting of `gql.resolver.completed`. Enabled by default.
pub fn with_instrument_resolver_count(enabled: bool) -> Opt {
    Opt::new(move |config| config.instrument_resolver_count = enabled)
}

/// Only report resolver metrics for custom field resolvers, reducing the
/// cardinality of `gql.resolver.duration` and `gql.resolver.completed`.
/// Disabled by default.
///
/// As an `async-graphql` extension only introspection fields are treated as
/// non-custom: plain `SimpleObject` fields are still reported.
pub fn with_instrument_resolver_custom_only(enabled: bool) -> Opt {
    Opt::new(move |config| config.instrument_resolver_custom_only = enabled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new(Vec::new());
        assert_eq!(config.instrumentation_name, DEFAULT_INSTRUMENTATION_NAME);
        assert!(config.instrument_request_duration);
        assert!(config.instrument_request_count);
        assert!(config.instrument_resolver_duration);
        assert!(config.instrument_resolver_count);
        assert!(!config.instrument_resolver_custom_only);
    }

    #[test]
    fn options_override_only_their_field() {
        let config = Config::new(vec![
            with_instrument_request_count(false),
            with_instrument_resolver_custom_only(true),
        ]);
        assert_eq!(config.instrumentation_name, DEFAULT_INSTRUMENTATION_NAME);
        assert!(config.instrument_request_duration);
        assert!(!config.instrument_request_count);
        assert!(config.instrument_resolver_duration);
        assert!(config.instrument_resolver_count);
        assert!(config.instrument_resolver_custom_only);
    }

    #[test]
    fn last_option_wins() {
        let config = Config::new(vec![
            with_instrumentation_name("first"),
            with_instrument_resolver_duration(false),
            with_instrumentation_name("second"),
            with_instrument_resolver_duration(true),
        ]);
        assert_eq!(config.instrumentation_name, "second");
        assert!(config.instrument_resolver_duration);
    }

    #[test]
    fn empty_scope_name_is_accepted() {
        let config = Config::new(vec![with_instrumentation_name("")]);
        assert_eq!(config.instrumentation_name, "");
    }
}
