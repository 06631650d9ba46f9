use super::*;

#[test]
fn test_defaults_are_valid() {
    let config = ListenerConfig::default();

    assert_eq!(config.bind_address(), "0.0.0.0:8888");
    assert_eq!(config.hook_path, "/gitee-hook");
    assert!(config.validate().is_ok());
}

#[test]
fn test_relative_hook_path_is_rejected() {
    let config = ListenerConfig {
        hook_path: "gitee-hook".to_string(),
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ListenerError::InvalidConfig { .. })
    ));
}

#[test]
fn test_hook_path_may_not_shadow_health_path() {
    let config = ListenerConfig {
        hook_path: "/".to_string(),
        ..Default::default()
    };

    assert!(config.validate().is_err());
}

#[test]
fn test_zero_body_limit_is_rejected() {
    let config = ListenerConfig {
        max_body_bytes: 0,
        ..Default::default()
    };

    assert!(config.validate().is_err());
}

#[test]
fn test_hook_path_with_route_syntax_is_rejected() {
    for hook_path in ["/gitee-hook{", "/{hook}", "/hooks/}", "/hooks/{*rest}", "/*"] {
        let config = ListenerConfig {
            hook_path: hook_path.to_string(),
            ..Default::default()
        };

        assert!(
            matches!(config.validate(), Err(ListenerError::InvalidConfig { .. })),
            "{hook_path} must be rejected"
        );
    }
}

#[test]
fn test_nested_literal_hook_path_is_accepted() {
    let config = ListenerConfig {
        hook_path: "/hooks/gitee-v5".to_string(),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}
