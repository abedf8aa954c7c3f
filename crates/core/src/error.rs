use opentelemetry::metrics::MetricsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to create instrument '{name}': {source}")]
    CreateInstrument {
        name: &'static str,
        #[source]
        source: MetricsError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
