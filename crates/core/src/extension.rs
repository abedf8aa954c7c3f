use std::sync::Arc;
use std::time::Instant;

use async_graphql::extensions::{
    Extension, ExtensionContext, ExtensionFactory, NextExecute, NextPrepareRequest, NextRequest,
    NextResolve, ResolveInfo,
};
use async_graphql::{Request, Response, ServerResult, Value};
use spin::Mutex;

use crate::middleware::Middleware;

/// Lets the middleware be registered with
/// `async_graphql::SchemaBuilder::extension`.
impl ExtensionFactory for Middleware {
    fn create(&self) -> Arc<dyn Extension> {
        Arc::new(MetricsExtension {
            middleware: self.clone(),
            operation_start: Instant::now(),
            operation_name: Default::default(),
        })
    }
}

/// Per-request extension created by [`Middleware`].
///
/// The schema creates one for each incoming request, so the creation time is
/// the start of the operation. Request metrics are recorded around the whole
/// request, so parse and validation failures are counted too.
pub struct MetricsExtension {
    middleware: Middleware,
    operation_start: Instant,
    operation_name: Mutex<Option<String>>,
}

#[async_trait::async_trait]
impl Extension for MetricsExtension {
    async fn request(&self, ctx: &ExtensionContext<'_>, next: NextRequest<'_>) -> Response {
        let resp = next.run(ctx).await;
        let operation_name = self.operation_name.lock().take().unwrap_or_default();
        self.middleware.record_request(
            &operation_name,
            self.operation_start.elapsed(),
            !resp.errors.is_empty(),
        );
        resp
    }

    async fn prepare_request(
        &self,
        ctx: &ExtensionContext<'_>,
        request: Request,
        next: NextPrepareRequest<'_>,
    ) -> ServerResult<Request> {
        // known before parsing, kept if the request fails to validate
        if let Some(name) = &request.operation_name {
            *self.operation_name.lock() = Some(name.clone());
        }
        next.run(ctx, request).await
    }

    async fn execute(
        &self,
        ctx: &ExtensionContext<'_>,
        operation_name: Option<&str>,
        next: NextExecute<'_>,
    ) -> Response {
        if let Some(name) = operation_name {
            *self.operation_name.lock() = Some(name.to_string());
        }
        next.run(ctx, operation_name).await
    }

    async fn resolve(
        &self,
        ctx: &ExtensionContext<'_>,
        info: ResolveInfo<'_>,
        next: NextResolve<'_>,
    ) -> ServerResult<Option<Value>> {
        let object = info.parent_type;
        let field = info.name;
        // async-graphql can't tell custom resolvers from plain field accessors
        let is_resolver = !info.is_for_introspection;

        let begin = Instant::now();
        let res = next.run(ctx, info).await;
        self.middleware.record_field(
            object,
            field,
            is_resolver,
            begin.elapsed(),
            res.is_err(),
        );
        res
    }
}
