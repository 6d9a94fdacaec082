use srctl::config::{self, AuthConfig, GlobalConfig, RegistryConfig};
use tempfile::TempDir;

// Lives in its own test binary: SRCTL_REGISTRIES_PATH is process-global.
#[test]
fn global_registries_round_trip_through_the_env_configured_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("registries.yaml");
    std::env::set_var("SRCTL_REGISTRIES_PATH", &path);

    let global = GlobalConfig {
        registries: vec![
            RegistryConfig {
                name: "staging".to_string(),
                url: "https://sr-staging.example.com".to_string(),
                auth: AuthConfig::Bearer {
                    token_env: "SR_STAGING_TOKEN".to_string(),
                },
            },
            RegistryConfig {
                name: "local".to_string(),
                url: "http://localhost:8081".to_string(),
                auth: AuthConfig::None,
            },
        ],
    };
    config::save_global_config(&global).unwrap();
    assert!(path.exists());

    let loaded = config::load_global_config().unwrap();
    assert_eq!(loaded.registries.len(), 2);
    let staging = loaded
        .registries
        .iter()
        .find(|r| r.name == "staging")
        .unwrap();
    assert_eq!(staging.url, "https://sr-staging.example.com");
    match &staging.auth {
        AuthConfig::Bearer { token_env } => assert_eq!(token_env, "SR_STAGING_TOKEN"),
        other => panic!("unexpected auth config: {:?}", other),
    }
}
