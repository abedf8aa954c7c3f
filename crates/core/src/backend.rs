use std::borrow::Cow;
use std::sync::Arc;

use opentelemetry::global::{self, GlobalMeterProvider};
use opentelemetry::metrics::{Counter, Histogram, Meter, MeterProvider, Unit};
use opentelemetry::KeyValue;

use crate::error::{Error, Result};

/// Name, unit and description of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentDescriptor {
    pub name: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
}

/// A metrics backend hands out reporting scopes keyed by name.
pub trait MeterBackend: Send + Sync {
    fn scope(&self, name: &str) -> Arc<dyn MeterScope>;
}

/// Creates instruments within a single reporting scope.
pub trait MeterScope: Send + Sync {
    fn f64_histogram(&self, descriptor: &InstrumentDescriptor)
        -> Result<Arc<dyn HistogramRecorder>>;

    fn u64_counter(&self, descriptor: &InstrumentDescriptor) -> Result<Arc<dyn CounterRecorder>>;
}

/// Recording is fire-and-forget. Implementations must accept concurrent calls.
pub trait HistogramRecorder: Send + Sync {
    fn record(&self, value: f64, attributes: &[KeyValue]);
}

pub trait CounterRecorder: Send + Sync {
    fn add(&self, delta: u64, attributes: &[KeyValue]);
}

/// Backend over an OpenTelemetry meter provider.
///
/// The default wraps the process-wide provider installed with
/// [`global::set_meter_provider`].
pub struct OpenTelemetry<P = GlobalMeterProvider> {
    provider: P,
}

impl<P> OpenTelemetry<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl OpenTelemetry {
    pub fn global() -> Self {
        Self::new(global::meter_provider())
    }
}

impl<P: MeterProvider + Send + Sync> MeterBackend for OpenTelemetry<P> {
    fn scope(&self, name: &str) -> Arc<dyn MeterScope> {
        Arc::new(OpenTelemetryScope {
            meter: self.provider.meter(Cow::Owned(name.to_string())),
        })
    }
}

struct OpenTelemetryScope {
    meter: Meter,
}

impl MeterScope for OpenTelemetryScope {
    fn f64_histogram(
        &self,
        descriptor: &InstrumentDescriptor,
    ) -> Result<Arc<dyn HistogramRecorder>> {
        let histogram = self
            .meter
            .f64_histogram(descriptor.name)
            .with_unit(Unit::new(descriptor.unit))
            .with_description(descriptor.description)
            .try_init()
            .map_err(|source| Error::CreateInstrument {
                name: descriptor.name,
                source,
            })?;
        Ok(Arc::new(histogram))
    }

    fn u64_counter(&self, descriptor: &InstrumentDescriptor) -> Result<Arc<dyn CounterRecorder>> {
        let counter = self
            .meter
            .u64_counter(descriptor.name)
            .with_unit(Unit::new(descriptor.unit))
            .with_description(descriptor.description)
            .try_init()
            .map_err(|source| Error::CreateInstrument {
                name: descriptor.name,
                source,
            })?;
        Ok(Arc::new(counter))
    }
}

impl HistogramRecorder for Histogram<f64> {
    fn record(&self, value: f64, attributes: &[KeyValue]) {
        Histogram::record(self, value, attributes);
    }
}

impl CounterRecorder for Counter<u64> {
    fn add(&self, delta: u64, attributes: &[KeyValue]) {
        Counter::add(self, delta, attributes);
    }
}
