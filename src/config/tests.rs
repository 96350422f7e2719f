use clap::Parser;

use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_are_usable_without_any_source() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.database.max_connections.get(), 8);
    assert!(settings.database.url.is_none());
    assert!(settings.cache.enabled);
    assert!(settings.cache.default_revalidate.is_none());
    assert!(settings.auth.jwt_secret.is_none());
    assert!(settings.auth.secure_cookies);
    assert_eq!(
        settings.storefront.placeholder_image,
        DEFAULT_PLACEHOLDER_IMAGE
    );
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_port_is_rejected() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(0);

    let err = Settings::from_raw(raw).expect_err("port zero");
    assert!(matches!(err, LoadError::Invalid { key: "server.port", .. }));
}

#[test]
fn zero_pool_size_is_rejected() {
    let mut raw = RawSettings::default();
    raw.database.max_connections = Some(0);

    let err = Settings::from_raw(raw).expect_err("pool size zero");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "database.max_connections",
            ..
        }
    ));
}

#[test]
fn blank_credentials_are_treated_as_missing() {
    let mut raw = RawSettings::default();
    raw.auth.jwt_secret = Some("   ".to_string());
    raw.auth.admin_email = Some(" admin@maherbites.id ".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.auth.jwt_secret.is_none());
    assert_eq!(
        settings.auth.admin_email.as_deref(),
        Some("admin@maherbites.id")
    );
}

#[test]
fn auth_debug_output_redacts_secrets() {
    let settings = AuthSettings {
        jwt_secret: Some("super-secret".to_string()),
        admin_email: Some("admin@maherbites.id".to_string()),
        admin_password: Some("hunter2".to_string()),
        secure_cookies: true,
    };

    let rendered = format!("{settings:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(!rendered.contains("hunter2"));
    assert!(rendered.contains("admin@maherbites.id"));
}

#[test]
fn zero_revalidate_means_until_invalidated() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        cache_revalidate_seconds: Some(0),
        ..Default::default()
    };
    raw.apply_serve_overrides(&overrides);
    assert!(
        Settings::from_raw(raw.clone())
            .expect("valid settings")
            .cache
            .default_revalidate
            .is_none()
    );

    raw.cache.default_revalidate_seconds = Some(120);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.cache.default_revalidate,
        Some(Duration::from_secs(120))
    );
}

#[test]
fn blank_placeholder_image_is_rejected() {
    let mut raw = RawSettings::default();
    raw.storefront.placeholder_image = Some("  ".to_string());

    let err = Settings::from_raw(raw).expect_err("blank placeholder");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "storefront.placeholder_image",
            ..
        }
    ));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["maherbites"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_seed_arguments() {
    let args = CliArgs::parse_from([
        "maherbites",
        "seed",
        "--database-url",
        "postgres://example",
    ]);

    match args.command.expect("seed command") {
        Command::Seed(seed) => {
            assert_eq!(
                seed.database.database_url.as_deref(),
                Some("postgres://example")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn auth_flags_apply_over_file_values() {
    let args = CliArgs::parse_from([
        "maherbites",
        "serve",
        "--jwt-secret",
        "from-cli",
        "--port",
        "8080",
    ]);

    let mut raw = RawSettings::default();
    raw.auth.jwt_secret = Some("from-file".to_string());
    raw.apply_auth_overrides(&args.auth);
    if let Some(Command::Serve(serve)) = args.command.as_ref() {
        raw.apply_serve_overrides(&serve.overrides);
    }

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.auth.jwt_secret.as_deref(), Some("from-cli"));
    assert_eq!(settings.server.addr.port(), 8080);
}

#[test]
fn secure_cookies_can_be_disabled_for_local_http() {
    let args = CliArgs::parse_from(["maherbites", "serve", "--secure-cookies", "false"]);

    let mut raw = RawSettings::default();
    if let Some(Command::Serve(serve)) = args.command.as_ref() {
        raw.apply_serve_overrides(&serve.overrides);
    }

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(!settings.auth.secure_cookies);
}
