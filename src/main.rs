#![forbid(unsafe_code)]

mod config;
mod options;
mod schema;

use std::convert::Infallible;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use futures_util::FutureExt;
use gqlmetrics_core::{HandlerExtension, Middleware};
use opentelemetry::global;
use opentelemetry::sdk::metrics::MeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use structopt::StructOpt;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use warp::hyper::StatusCode;
use warp::{Filter, Rejection, Reply};

use config::Config;
use options::Options;
use schema::DemoSchema;

// Use Jemalloc only for musl-64 bits platforms
#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static ALLOC: jemallocator::Jemalloc = jemallocator::Jemalloc;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Installs a Prometheus backed meter provider as the global provider, which
/// the middleware picks up unless configured otherwise.
fn init_meter_provider() -> Result<Registry> {
    let registry = Registry::new();
    let exporter = opentelemetry_prometheus::exporter()
        .with_registry(registry.clone())
        .build()
        .context("Failed to initialize prometheus exporter.")?;
    global::set_meter_provider(MeterProvider::builder().with_reader(exporter).build());
    Ok(registry)
}

pub fn metrics(
    registry: Registry,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("metrics").and(warp::get()).map({
        move || {
            let mut buffer = Vec::new();
            let encoder = TextEncoder::new();
            let metric_families = registry.gather();
            if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
                return warp::reply::with_status(
                    err.to_string().into_bytes(),
                    StatusCode::INTERNAL_SERVER_ERROR,
                );
            }
            warp::reply::with_status(buffer, StatusCode::OK)
        }
    })
}

pub fn graphql_routes(
    schema: DemoSchema,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let request = async_graphql_warp::graphql(schema).and(warp::post()).and_then(
        |(schema, request): (DemoSchema, async_graphql::Request)| async move {
            Ok::<_, Infallible>(warp::reply::json(&schema.execute(request).await).into_response())
        },
    );
    let playground = warp::get()
        .map(|| warp::reply::html(playground_source(GraphQLPlaygroundConfig::new("/"))));
    request.or(playground)
}

#[tokio::main]
async fn main() -> Result<()> {
    let options: Options = Options::from_args();
    init_tracing();

    let mut config = toml::from_str::<Config>(
        &std::fs::read_to_string(&options.config)
            .with_context(|| format!("Failed to load config file '{}'.", options.config))?,
    )
    .with_context(|| format!("Failed to parse config file '{}'.", options.config))?;
    if let Some(bind) = options.bind {
        config.bind = bind;
    }

    let registry = init_meter_provider()?;
    let middleware = Middleware::new(config.metrics.options())
        .context("Failed to create metrics middleware.")?;
    let schema = schema::build(middleware.clone());
    middleware
        .validate(&schema.sdl())
        .with_context(|| {
            format!("Extension '{}' rejected the schema.", middleware.extension_name())
        })?;
    tracing::info!(extension = middleware.extension_name(), "Metrics enabled.");

    let graphql = warp::path::end().and(graphql_routes(schema));
    let health = warp::path!("health").map(|| warp::reply::json(&"healthy"));
    let routes = graphql.or(health).or(metrics(registry));

    let bind_addr: SocketAddr = config
        .bind
        .parse()
        .context(format!("Failed to parse bind addr '{}'", config.bind))?;
    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown(bind_addr, signal::ctrl_c().map(|_| ()));
    tracing::info!(addr = %addr, "Listening");
    server.await;
    tracing::info!("Server shutdown");

    Ok(())
}
