use std::time::Duration;

use pretty_assertions::assert_eq;
use vitrine::{RoutePattern, Strategy, showcase};
use vitrine_backend::Expiration;
use vitrine_configuration::{Config, ConfigError};
use vitrine_core::{Destination, FetchRequest, PartitionLabel};

const SHOWCASE: &str = r#"
cache:
  scope: https://example.com/
  current_caches:
    - businesspro-static-v1.0.0
    - businesspro-dynamic-v1.0.0
    - fonts-cache
  precache: [./, ./index.html, ./css/main.css]
  routes:
    images:
      pattern: '(?i)\.(?:png|jpg|jpeg|svg|gif|webp|ico)$'
      strategy: cache-first
      cache: businesspro-static-v1.0.0
      expiration:
        max_entries: 100
        max_age: 30days
    assets:
      pattern: '(?i)\.(?:css|js)$'
      strategy: stale-while-revalidate
      cache: businesspro-static-v1.0.0
      expiration:
        max_entries: 50
        max_age: 7days
    fonts:
      pattern: '^https://fonts\.'
      strategy: cache-first
      cache: fonts-cache
      expiration:
        max_entries: 30
        max_age: 365days
    api:
      pattern: '/api/'
      strategy: network-first
      cache: businesspro-dynamic-v1.0.0
      expiration:
        max_entries: 50
        max_age: 5m
analytics:
  require_consent: true
  poll_interval: 250ms
"#;

#[test]
fn test_yaml_builds_the_showcase_route_table() {
    let config = Config::from_yaml(SHOWCASE).expect("failed to deserialize");
    let table = config.cache.unwrap().route_table().unwrap();
    let expected = showcase::routes().unwrap();

    for url in [
        "https://example.com/img/photo.png",
        "https://example.com/css/style.css",
        "https://fonts.gstatic.com/s/inter.woff2",
        "https://example.com/api/projects",
        "https://example.com/about",
    ] {
        let got = table
            .resolve(url)
            .map(|r| (r.strategy(), r.cache_name().clone(), *r.expiration()));
        let want = expected
            .resolve(url)
            .map(|r| (r.strategy(), r.cache_name().clone(), *r.expiration()));
        assert_eq!(got, want, "{url}");
    }
}

#[test]
fn test_worker_config_and_defaults() {
    let config = Config::from_yaml(SHOWCASE).unwrap();
    let cache = config.cache.unwrap();
    assert_eq!(cache.precache.len(), 3);

    let worker = cache.worker_config().unwrap();
    assert_eq!(worker.scope.as_str(), "https://example.com/");
    assert_eq!(worker.static_cache, showcase::STATIC_CACHE);
    assert_eq!(worker.offline_page, "./index.html");
    assert_eq!(worker.cleanup_interval, Duration::from_secs(24 * 60 * 60));
    assert_eq!(worker.current_caches.len(), 3);
}

#[test]
fn test_analytics_settings() {
    let config = Config::from_yaml(SHOWCASE).unwrap();
    let dispatcher = config.analytics.into_dispatcher_config();
    assert!(dispatcher.require_consent);
    assert_eq!(dispatcher.poll_interval, Duration::from_millis(250));
    assert_eq!(dispatcher.performance_delay, Duration::from_secs(3));
}

#[test]
fn test_analytics_only_document() {
    let config = Config::from_yaml("analytics: {}\n").unwrap();
    assert!(config.cache.is_none());
    assert!(!config.analytics.require_consent);
    assert_eq!(config.analytics.poll_interval, Duration::from_millis(100));
}

#[test]
fn test_destination_route() {
    let yaml = r#"
cache:
  scope: https://example.com/
  routes:
    pictures:
      destination: image
      strategy: cache-first
      cache: images
"#;
    let table = Config::from_yaml(yaml)
        .unwrap()
        .cache
        .unwrap()
        .route_table()
        .unwrap();
    let route = &table.routes()[0];
    assert!(matches!(
        route.pattern(),
        RoutePattern::Destination(Destination::Image)
    ));
    assert_eq!(route.expiration(), &Expiration::UNBOUNDED);

    let request = FetchRequest::get("https://cdn.example.com/x").with_destination(Destination::Image);
    assert_eq!(
        table.resolve_request(&request).map(|r| r.strategy()),
        Some(Strategy::CacheFirst)
    );
}

#[test]
fn test_route_needs_exactly_one_matcher() {
    let yaml = r#"
cache:
  scope: https://example.com/
  routes:
    broken:
      pattern: '\.png$'
      destination: image
      strategy: cache-first
      cache: images
"#;
    let err = Config::from_yaml(yaml)
        .unwrap()
        .cache
        .unwrap()
        .route_table()
        .unwrap_err();
    assert!(matches!(err, ConfigError::Matcher { ref route } if route == "broken"), "{err}");
}

#[test]
fn test_invalid_pattern_is_reported() {
    let yaml = r#"
cache:
  scope: https://example.com/
  routes:
    broken:
      pattern: '(unclosed'
      strategy: network-only
      cache: x
"#;
    let err = Config::from_yaml(yaml)
        .unwrap()
        .cache
        .unwrap()
        .route_table()
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern { .. }), "{err}");
}

#[test]
fn test_route_partition_must_be_current() {
    let yaml = r#"
cache:
  scope: https://example.com/
  current_caches: [businesspro-static-v1.0.0]
  routes:
    api:
      pattern: '/api/'
      strategy: network-first
      cache: dynamic
"#;
    let err = Config::from_yaml(yaml)
        .unwrap()
        .cache
        .unwrap()
        .worker_config()
        .unwrap_err();
    assert!(
        matches!(err, ConfigError::UnknownPartition(ref label) if *label == PartitionLabel::from("dynamic")),
        "{err}"
    );
}

#[test]
fn test_unknown_strategy_is_a_yaml_error() {
    let yaml = r#"
cache:
  scope: https://example.com/
  routes:
    api:
      pattern: '/api/'
      strategy: cache-sometimes
      cache: dynamic
"#;
    assert!(matches!(Config::from_yaml(yaml), Err(ConfigError::Yaml(_))));
}
