//! Extension points of a GraphQL execution pipeline.
//!
//! The pipeline calls [`ResponseInterceptor::intercept_response`] once per
//! operation and [`FieldInterceptor::intercept_field`] once per resolved
//! field, possibly concurrently. Interceptors must run the continuation
//! exactly once and hand back its result untouched.

use std::time::Instant;

use crate::error::Result;

pub trait OperationContext {
    /// Name of the executed operation, empty for anonymous operations.
    fn operation_name(&self) -> &str;

    /// When the pipeline started processing the operation.
    fn operation_start(&self) -> Instant;

    /// Whether any error was accumulated while processing the operation.
    fn has_errors(&self) -> bool;
}

pub trait FieldContext {
    /// Name of the type owning the field.
    fn object(&self) -> &str;

    fn field(&self) -> &str;

    /// `true` for user defined resolvers, `false` for trivial accessors.
    fn is_resolver(&self) -> bool;
}

pub trait HandlerExtension {
    fn extension_name(&self) -> &'static str;

    /// Called once with the SDL of the schema the extension is attached to.
    fn validate(&self, sdl: &str) -> Result<()>;
}

pub trait ResponseInterceptor {
    fn intercept_response<C, R, F>(&self, ctx: &C, next: F) -> R
    where
        C: OperationContext + ?Sized,
        F: FnOnce() -> R;
}

pub trait FieldInterceptor {
    fn intercept_field<C, T, E, F>(&self, ctx: &C, next: F) -> Result<T, E>
    where
        C: FieldContext + ?Sized,
        F: FnOnce() -> Result<T, E>;
}
