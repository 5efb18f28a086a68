//! Integration tests for TOML and environment configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use pugh_config::PughConfig;

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
data_dir = "state"
persist_key = "team-matrix"

[general]
author = "ana"
weight_min = 1
weight_max = 5
"#,
        )?;

        let config: PughConfig = Figment::from(Serialized::defaults(PughConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.store.data_dir, "state");
        assert_eq!(config.store.persist_key, "team-matrix");
        assert_eq!(config.general.author, "ana");
        assert_eq!(config.general.weight_min, 1);
        assert_eq!(config.general.weight_max, 5);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[general]\nauthor = \"bo\"\n")?;

        let config: PughConfig = Figment::from(Serialized::defaults(PughConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.general.author, "bo");
        assert_eq!(config.general.weight_max, 10);
        assert_eq!(config.store.persist_key, "pugh-matrix");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[general]\nauthor = \"from-toml\"\n")?;
        jail.set_env("PUGH_GENERAL__AUTHOR", "from-env");
        jail.set_env("PUGH_GENERAL__WEIGHT_MAX", "20");

        let config: PughConfig = Figment::from(Serialized::defaults(PughConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("PUGH_").split("__"))
            .extract()?;

        assert_eq!(config.general.author, "from-env");
        assert_eq!(config.general.weight_max, 20);
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".pugh")?;
        jail.create_file(".pugh/config.toml", "[store]\npersist_key = \"local\"\n")?;

        let config = PughConfig::load_for(jail.directory()).map_err(|e| e.to_string())?;
        assert_eq!(config.store.persist_key, "local");
        Ok(())
    });
}

#[test]
fn invalid_type_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.set_env("PUGH_GENERAL__WEIGHT_MIN", "lots");
        assert!(PughConfig::load_for(jail.directory()).is_err());
        Ok(())
    });
}
