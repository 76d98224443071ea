//! Logging and tracing bootstrap

use std::fs;
use svcwatch_common::config::{LogConfig, SvcwatchConfig};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[cfg(feature = "opentelemetry")]
use opentelemetry::KeyValue;
#[cfg(feature = "opentelemetry")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "opentelemetry")]
use opentelemetry_sdk::propagation::TraceContextPropagator;
#[cfg(feature = "opentelemetry")]
use opentelemetry_sdk::{
    Resource,
    trace::{Sampler, SdkTracerProvider},
};
#[cfg(feature = "opentelemetry")]
use tracing_subscriber::filter::filter_fn;
#[cfg(feature = "opentelemetry")]
use svcwatch::Error;
use svcwatch::Result;

const LOG_FILE_NAME: &str = "svcwatch.log";

/// Keeps the log writer and tracer provider alive; flushes on drop
#[derive(Default)]
pub struct ObservabilityGuard {
    #[cfg(feature = "opentelemetry")]
    tracer_provider: Option<SdkTracerProvider>,
    _log_guard: Option<WorkerGuard>,
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        #[cfg(feature = "opentelemetry")]
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shutdown tracer provider: {e:?}");
        }
    }
}

/// Initialize logging and tracing based on configuration
pub fn init_observability(config: &SvcwatchConfig) -> Result<ObservabilityGuard> {
    let mut guard = ObservabilityGuard::default();
    let log_config = config.log_config();

    if config.is_console_logging() {
        init_subscriber_with_writer(std::io::stdout, true, &mut guard, config)?;
    } else {
        fs::create_dir_all(&log_config.path)?;
        let (non_blocking, worker_guard) =
            build_file_writer(log_config, config.should_rotate_logs())?;
        guard._log_guard = Some(worker_guard);

        init_subscriber_with_writer(non_blocking, false, &mut guard, config)?;
    }

    Ok(guard)
}

/// EnvFilter from config, RUST_LOG taking precedence
fn create_env_filter(config: &SvcwatchConfig) -> EnvFilter {
    let directive = config.get_filter_level();

    EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        println!("Failed to parse filter directive: {directive}. Falling back to default: info");
        EnvFilter::new("info")
    })
}

fn init_subscriber_with_writer<W>(
    writer: W,
    use_ansi: bool,
    #[cfg_attr(not(feature = "opentelemetry"), allow(unused_variables))]
    guard: &mut ObservabilityGuard,
    config: &SvcwatchConfig,
) -> Result<()>
where
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(use_ansi)
        .with_writer(writer);

    let filter = create_env_filter(config);

    #[cfg(feature = "opentelemetry")]
    {
        if let Some(provider) = build_tracing_provider(config)? {
            use opentelemetry::trace::TracerProvider as _;
            let tracing_cfg = config.tracing_config().clone();
            let tracer = provider.tracer(tracing_cfg.service_name().to_string());
            guard.tracer_provider = Some(provider);

            // Probe spans can be dropped from export while still feeding the log output
            let otel_layer = tracing_opentelemetry::layer()
                .with_tracer(tracer)
                .with_filter(filter_fn(move |meta| {
                    !meta.is_span() || tracing_cfg.exports_span(meta.name())
                }));

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .with(otel_layer)
                .try_init()
                .ok();
            return Ok(());
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .ok();

    Ok(())
}

fn build_file_writer(log_config: &LogConfig, rotate: bool) -> Result<(NonBlocking, WorkerGuard)> {
    println!(
        "Logging to {} (daily rotation {})",
        log_config.path,
        if rotate { "on" } else { "off" }
    );

    if rotate {
        let file_appender = tracing_appender::rolling::daily(&log_config.path, LOG_FILE_NAME);
        Ok(tracing_appender::non_blocking(file_appender))
    } else {
        let log_file_path = std::path::Path::new(&log_config.path).join(LOG_FILE_NAME);
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path)?;
        Ok(tracing_appender::non_blocking(file))
    }
}

#[cfg(feature = "opentelemetry")]
fn build_tracing_provider(config: &SvcwatchConfig) -> Result<Option<SdkTracerProvider>> {
    let tracing_cfg = config.tracing_config();

    if !tracing_cfg.is_enabled() {
        return Ok(None);
    }

    if let Some(problem) = tracing_cfg.problems().into_iter().next() {
        return Err(Error::custom(problem));
    }

    println!(
        "Initializing OpenTelemetry tracing: service_name={}, endpoint={}, sample_ratio={}, probe_spans={}",
        tracing_cfg.service_name(),
        tracing_cfg.endpoint(),
        tracing_cfg.sample_ratio,
        tracing_cfg.probe_spans
    );

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(tracing_cfg.endpoint())
        .build()
        .map_err(|e| Error::custom(format!("Failed to build OTLP exporter: {e}")))?;

    let resource = Resource::builder()
        .with_service_name(tracing_cfg.service_name().to_string())
        .with_attributes([
            KeyValue::new("service.instance.id", config.name.clone()),
            KeyValue::new("service.environment", config.env.clone()),
            KeyValue::new("svcwatch.monitored_host", config.monitor.host.clone()),
            KeyValue::new("svcwatch.services", config.services.len() as i64),
        ])
        .build();

    let tracer_provider = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(
            tracing_cfg.sample_ratio,
        ))))
        .with_batch_exporter(exporter)
        .build();

    opentelemetry::global::set_tracer_provider(tracer_provider.clone());
    opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());

    Ok(Some(tracer_provider))
}
