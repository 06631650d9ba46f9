use super::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Counts every event emitted while installed.
#[derive(Clone, Default)]
struct EventCounter(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for EventCounter {
    fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_empty_sources_yield_defaults() {
    let service = ServiceConfig::from_builder(config::Config::builder()).unwrap();

    assert_eq!(service, ServiceConfig::default());
    assert_eq!(service.server.port, 8888);
    assert_eq!(service.telemetry.log_filter, "info");
    assert!(service.telemetry.json);
    assert_eq!(service.telemetry.otlp_endpoint, None);
}

#[test]
fn test_partial_file_keeps_remaining_defaults() {
    let builder = config::Config::builder().add_source(File::from_str(
        r#"
        [server]
        port = 9000

        [telemetry]
        json = false
        otlp_endpoint = "http://localhost:4317"
        "#,
        FileFormat::Toml,
    ));

    let service = ServiceConfig::from_builder(builder).unwrap();

    assert_eq!(service.server.port, 9000);
    assert_eq!(service.server.hook_path, "/gitee-hook");
    assert!(!service.telemetry.json);
    assert_eq!(
        service.telemetry.otlp_endpoint.as_deref(),
        Some("http://localhost:4317")
    );
}

#[test]
fn test_later_sources_override_earlier() {
    let env = HashMap::from([(
        "ROBOT__SERVER__HOOK_PATH".to_string(),
        "/hooks/gitee".to_string(),
    )]);
    let builder = config::Config::builder()
        .add_source(File::from_str(
            "[server]\nport = 9000\nhook_path = \"/from-file\"",
            FileFormat::Toml,
        ))
        .add_source(File::from_str("[server]\nport = 9100", FileFormat::Toml))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .source(Some(env)),
        );

    let service = ServiceConfig::from_builder(builder).unwrap();

    assert_eq!(service.server.port, 9100);
    assert_eq!(service.server.hook_path, "/hooks/gitee");
}

#[test]
fn test_invalid_listener_settings_are_fatal() {
    let builder = config::Config::builder()
        .add_source(File::from_str("[server]\nhook_path = \"/\"", FileFormat::Toml));

    let err = ServiceConfig::from_builder(builder).unwrap_err();

    assert!(err.to_string().contains("hook_path"));
}

#[test]
fn test_wrongly_typed_value_is_fatal() {
    let builder = config::Config::builder()
        .add_source(File::from_str("[server]\nport = \"eighty\"", FileFormat::Toml));

    assert!(ServiceConfig::from_builder(builder).is_err());
}

#[test]
fn test_missing_explicit_file_is_fatal() {
    let builder = file_sources(Some("/nonexistent/robot-gitee/service.toml"));

    assert!(ServiceConfig::from_builder(builder).is_err());
}

#[test]
fn test_loading_emits_no_log_events() {
    // Configuration is read before the subscriber exists, so nothing logged
    // here would ever be seen.
    let counter = EventCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());

    tracing::subscriber::with_default(subscriber, || {
        let builder = file_sources(Some("/nonexistent/robot-gitee/service.toml"));
        let _ = ServiceConfig::from_builder(builder);

        let builder = config::Config::builder()
            .add_source(File::from_str("[server]\nport = 9000", FileFormat::Toml));
        ServiceConfig::from_builder(builder).unwrap();
    });

    assert_eq!(counter.0.load(Ordering::SeqCst), 0);
}
