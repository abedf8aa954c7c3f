use gqlmetrics_core::{
    with_instrument_request_count, with_instrument_request_duration,
    with_instrument_resolver_count, with_instrument_resolver_custom_only,
    with_instrument_resolver_duration, with_instrumentation_name, Opt,
};
use serde::Deserialize;

/// Metrics toggles. Unset entries keep the middleware defaults.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    pub instrumentation_name: Option<String>,
    pub request_duration: Option<bool>,
    pub request_count: Option<bool>,
    pub resolver_duration: Option<bool>,
    pub resolver_count: Option<bool>,
    pub resolver_custom_only: Option<bool>,
}

impl MetricsConfig {
    pub fn options(&self) -> Vec<Opt> {
        let mut options = Vec::new();
        if let Some(name) = &self.instrumentation_name {
            options.push(with_instrumentation_name(name.clone()));
        }
        if let Some(enabled) = self.request_duration {
            options.push(with_instrument_request_duration(enabled));
        }
        if let Some(enabled) = self.request_count {
            options.push(with_instrument_request_count(enabled));
        }
        if let Some(enabled) = self.resolver_duration {
            options.push(with_instrument_resolver_duration(enabled));
        }
        if let Some(enabled) = self.resolver_count {
            options.push(with_instrument_resolver_count(enabled));
        }
        if let Some(enabled) = self.resolver_custom_only {
            options.push(with_instrument_resolver_custom_only(enabled));
        }
        options
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}
