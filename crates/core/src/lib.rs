#![forbid(unsafe_code)]

mod backend;
mod config;
mod constants;
mod error;
mod extension;
mod middleware;
mod pipeline;

pub use backend::{
    CounterRecorder, HistogramRecorder, InstrumentDescriptor, MeterBackend, MeterScope,
    OpenTelemetry,
};
pub use config::{
    with_instrument_request_count, with_instrument_request_duration,
    with_instrument_resolver_count, with_instrument_resolver_custom_only,
    with_instrument_resolver_duration, with_instrumentation_name, with_meter_backend,
    with_meter_provider, Config, Opt,
};
pub use constants::*;
pub use error::{Error, Result};
pub use extension::MetricsExtension;
pub use middleware::Middleware;
pub use pipeline::{
    FieldContext, FieldInterceptor, HandlerExtension, OperationContext, ResponseInterceptor,
};
