use std::sync::Arc;
use std::time::{Duration, Instant};

use opentelemetry::KeyValue;

use crate::backend::{CounterRecorder, HistogramRecorder, MeterScope};
use crate::config::{Config, Opt};
use crate::constants::*;
use crate::error::Result;
use crate::pipeline::{
    FieldContext, FieldInterceptor, HandlerExtension, OperationContext, ResponseInterceptor,
};

struct Instruments {
    request_duration: Option<Arc<dyn HistogramRecorder>>,
    request_completed: Option<Arc<dyn CounterRecorder>>,

    resolver_duration: Option<Arc<dyn HistogramRecorder>>,
    resolver_completed: Option<Arc<dyn CounterRecorder>>,

    custom_resolver_only: bool,
}

impl Instruments {
    fn create(config: &Config, scope: &dyn MeterScope) -> Result<Self> {
        Ok(Self {
            request_duration: config
                .instrument_request_duration
                .then(|| scope.f64_histogram(&REQUEST_DURATION))
                .transpose()?,
            request_completed: config
                .instrument_request_count
                .then(|| scope.u64_counter(&REQUEST_COMPLETED))
                .transpose()?,
            resolver_duration: config
                .instrument_resolver_duration
                .then(|| scope.f64_histogram(&RESOLVER_DURATION))
                .transpose()?,
            resolver_completed: config
                .instrument_resolver_count
                .then(|| scope.u64_counter(&RESOLVER_COMPLETED))
                .transpose()?,
            custom_resolver_only: config.instrument_resolver_custom_only,
        })
    }
}

/// Records request and resolver metrics for a GraphQL pipeline.
///
/// The instrument set is fixed at construction. Cloning is cheap and clones
/// share the same instruments.
#[derive(Clone)]
pub struct Middleware {
    instruments: Arc<Instruments>,
}

impl Middleware {
    /// Builds the middleware from `options` applied over the default config.
    ///
    /// Fails if any enabled instrument can't be created; a middleware with
    /// only some of its instruments is never returned.
    pub fn new(options: impl IntoIterator<Item = Opt>) -> Result<Self> {
        Self::from_config(Config::new(options))
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let scope = config.backend.scope(&config.instrumentation_name);
        let instruments = Instruments::create(&config, scope.as_ref())?;

        tracing::debug!(
            scope = %config.instrumentation_name,
            request_duration = instruments.request_duration.is_some(),
            request_count = instruments.request_completed.is_some(),
            resolver_duration = instruments.resolver_duration.is_some(),
            resolver_count = instruments.resolver_completed.is_some(),
            custom_resolver_only = instruments.custom_resolver_only,
            "Metrics instruments created."
        );

        Ok(Self {
            instruments: Arc::new(instruments),
        })
    }

    pub(crate) fn record_request(&self, operation_name: &str, elapsed: Duration, failed: bool) {
        let operation_name = if operation_name.is_empty() {
            NAMELESS_OPERATION
        } else {
            operation_name
        };

        if let Some(histogram) = &self.instruments.request_duration {
            histogram.record(
                as_millis(elapsed),
                &[KeyValue::new(KEY_REQUEST_NAME, operation_name.to_string())],
            );
        }

        if let Some(counter) = &self.instruments.request_completed {
            counter.add(
                1,
                &[
                    KeyValue::new(KEY_REQUEST_NAME, operation_name.to_string()),
                    KeyValue::new(KEY_REQUEST_ERROR, failed),
                ],
            );
        }
    }

    pub(crate) fn record_field(
        &self,
        object: &str,
        field: &str,
        is_resolver: bool,
        elapsed: Duration,
        failed: bool,
    ) {
        if self.instruments.custom_resolver_only && !is_resolver {
            return;
        }

        if let Some(histogram) = &self.instruments.resolver_duration {
            histogram.record(
                as_millis(elapsed),
                &[
                    KeyValue::new(KEY_RESOLVER_OBJECT, object.to_string()),
                    KeyValue::new(KEY_RESOLVER_FIELD, field.to_string()),
                ],
            );
        }

        if let Some(counter) = &self.instruments.resolver_completed {
            counter.add(
                1,
                &[
                    KeyValue::new(KEY_RESOLVER_OBJECT, object.to_string()),
                    KeyValue::new(KEY_RESOLVER_FIELD, field.to_string()),
                    KeyValue::new(KEY_RESOLVER_ERROR, failed),
                ],
            );
        }
    }
}

#[inline]
fn as_millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

impl HandlerExtension for Middleware {
    fn extension_name(&self) -> &'static str {
        EXTENSION_NAME
    }

    fn validate(&self, _sdl: &str) -> Result<()> {
        Ok(())
    }
}

impl ResponseInterceptor for Middleware {
    fn intercept_response<C, R, F>(&self, ctx: &C, next: F) -> R
    where
        C: OperationContext + ?Sized,
        F: FnOnce() -> R,
    {
        let resp = next();
        self.record_request(
            ctx.operation_name(),
            ctx.operation_start().elapsed(),
            ctx.has_errors(),
        );
        resp
    }
}

impl FieldInterceptor for Middleware {
    fn intercept_field<C, T, E, F>(&self, ctx: &C, next: F) -> Result<T, E>
    where
        C: FieldContext + ?Sized,
        F: FnOnce() -> Result<T, E>,
    {
        let begin = Instant::now();
        let res = next();
        self.record_field(
            ctx.object(),
            ctx.field(),
            ctx.is_resolver(),
            begin.elapsed(),
            res.is_err(),
        );
        res
    }
}
