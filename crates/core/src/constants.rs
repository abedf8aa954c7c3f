use opentelemetry::Key;

use crate::backend::InstrumentDescriptor;

/// The default scope name used when creating meters.
pub const DEFAULT_INSTRUMENTATION_NAME: &str = "github.com/mahboubii/gqlgenmetrics";

pub const EXTENSION_NAME: &str = "gqlmetrics";

/// Recorded in place of the operation name for anonymous operations.
pub const NAMELESS_OPERATION: &str = "nameless-op";

pub const REQUEST_DURATION: InstrumentDescriptor = InstrumentDescriptor {
    name: "gql.request.duration",
    unit: "ms",
    description: "The time taken for server to process the request.",
};
pub const REQUEST_COMPLETED: InstrumentDescriptor = InstrumentDescriptor {
    name: "gql.request.completed",
    unit: "1",
    description: "Total number of requests completed.",
};
pub const RESOLVER_DURATION: InstrumentDescriptor = InstrumentDescriptor {
    name: "gql.resolver.duration",
    unit: "ms",
    description: "The time taken for server to resolve a resolver.",
};
pub const RESOLVER_COMPLETED: InstrumentDescriptor = InstrumentDescriptor {
    name: "gql.resolver.completed",
    unit: "1",
    description: "Total number of resolvers completed.",
};

pub const KEY_REQUEST_NAME: Key = Key::from_static_str("gql.request.name");
pub const KEY_REQUEST_ERROR: Key = Key::from_static_str("gql.request.error");
pub const KEY_RESOLVER_OBJECT: Key = Key::from_static_str("gql.resolver.object");
pub const KEY_RESOLVER_FIELD: Key = Key::from_static_str("gql.resolver.field");
pub const KEY_RESOLVER_ERROR: Key = Key::from_static_str("gql.resolver.error");
