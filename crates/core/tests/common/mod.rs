#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Instant;

use gqlmetrics_core::{
    CounterRecorder, Error, FieldContext, HistogramRecorder, InstrumentDescriptor, MeterBackend,
    MeterScope, OperationContext, Result,
};
use opentelemetry::metrics::MetricsError;
use opentelemetry::{Key, KeyValue, Value};
use spin::Mutex;

#[derive(Debug, Clone)]
pub struct Measurement {
    pub scope: String,
    pub instrument: &'static str,
    pub value: f64,
    pub attributes: Vec<KeyValue>,
}

impl Measurement {
    pub fn attribute(&self, key: Key) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|kv| kv.key == key)
            .map(|kv| &kv.value)
    }
}

#[derive(Default)]
struct State {
    scopes: Vec<String>,
    instruments: Vec<InstrumentDescriptor>,
    measurements: Vec<Measurement>,
}

/// Keeps every scope, instrument and measurement in memory.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    state: Arc<Mutex<State>>,
    fail_on: Option<&'static str>,
}

impl RecordingBackend {
    /// A backend refusing to create the instrument named `name`.
    pub fn failing_on(name: &'static str) -> Self {
        Self {
            fail_on: Some(name),
            ..Default::default()
        }
    }

    pub fn scopes(&self) -> Vec<String> {
        self.state.lock().scopes.clone()
    }

    pub fn instruments(&self) -> Vec<InstrumentDescriptor> {
        self.state.lock().instruments.clone()
    }

    pub fn measurements(&self) -> Vec<Measurement> {
        self.state.lock().measurements.clone()
    }

    pub fn measurements_of(&self, instrument: &str) -> Vec<Measurement> {
        self.measurements()
            .into_iter()
            .filter(|m| m.instrument == instrument)
            .collect()
    }
}

impl MeterBackend for RecordingBackend {
    fn scope(&self, name: &str) -> Arc<dyn MeterScope> {
        self.state.lock().scopes.push(name.to_string());
        Arc::new(RecordingScope {
            name: name.to_string(),
            backend: self.clone(),
        })
    }
}

struct RecordingScope {
    name: String,
    backend: RecordingBackend,
}

impl RecordingScope {
    fn register(&self, descriptor: &InstrumentDescriptor) -> Result<Arc<RecordingInstrument>> {
        if self.backend.fail_on == Some(descriptor.name) {
            return Err(Error::CreateInstrument {
                name: descriptor.name,
                source: MetricsError::Other("instrument rejected".to_string()),
            });
        }
        self.backend.state.lock().instruments.push(*descriptor);
        Ok(Arc::new(RecordingInstrument {
            scope: self.name.clone(),
            name: descriptor.name,
            state: self.backend.state.clone(),
        }))
    }
}

impl MeterScope for RecordingScope {
    fn f64_histogram(
        &self,
        descriptor: &InstrumentDescriptor,
    ) -> Result<Arc<dyn HistogramRecorder>> {
        Ok(self.register(descriptor)?)
    }

    fn u64_counter(&self, descriptor: &InstrumentDescriptor) -> Result<Arc<dyn CounterRecorder>> {
        Ok(self.register(descriptor)?)
    }
}

struct RecordingInstrument {
    scope: String,
    name: &'static str,
    state: Arc<Mutex<State>>,
}

impl RecordingInstrument {
    fn push(&self, value: f64, attributes: &[KeyValue]) {
        self.state.lock().measurements.push(Measurement {
            scope: self.scope.clone(),
            instrument: self.name,
            value,
            attributes: attributes.to_vec(),
        });
    }
}

impl HistogramRecorder for RecordingInstrument {
    fn record(&self, value: f64, attributes: &[KeyValue]) {
        self.push(value, attributes);
    }
}

impl CounterRecorder for RecordingInstrument {
    fn add(&self, delta: u64, attributes: &[KeyValue]) {
        self.push(delta as f64, attributes);
    }
}

pub struct Operation {
    pub name: &'static str,
    pub start: Instant,
    pub errors: RefCell<Vec<String>>,
}

impl Operation {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
            errors: Default::default(),
        }
    }
}

impl OperationContext for Operation {
    fn operation_name(&self) -> &str {
        self.name
    }

    fn operation_start(&self) -> Instant {
        self.start
    }

    fn has_errors(&self) -> bool {
        !self.errors.borrow().is_empty()
    }
}

pub struct Field {
    pub object: &'static str,
    pub field: &'static str,
    pub is_resolver: bool,
}

impl FieldContext for Field {
    fn object(&self) -> &str {
        self.object
    }

    fn field(&self) -> &str {
        self.field
    }

    fn is_resolver(&self) -> bool {
        self.is_resolver
    }
}
