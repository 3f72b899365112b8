use std::path::Path;

use anyhow::Context;

use crate::Config;

pub(crate) fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse configuration file {}", path.display()))?;

    if config.llm.enabled() && config.llm.api_key().is_none() {
        log::warn!(
            "No provider API key configured. Set llm.api_key in the configuration file, \
            or export OPENAI_API_KEY before starting the server."
        );
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use insta::assert_debug_snapshot;

    use crate::Config;

    #[test]
    fn defaults_from_empty_config() {
        let config: Config = toml::from_str("").unwrap();

        assert!(config.llm.enabled());
        assert_eq!(config.llm.path, "/api/v1");
        assert!(config.llm.default_model.is_none());
        assert_eq!(config.llm.recipes.temperature, 0.3);
        assert_eq!(config.llm.recipes.max_tokens, 2000);
        assert!(config.server.listen_address.is_none());
        assert!(config.server.health.enabled);
        assert_eq!(config.server.health.path, "/health");
    }

    #[test]
    fn recipe_defaults_are_overridable() {
        let config_str = indoc! {r#"
            [llm.recipes]
            model = "gpt-4o-mini"
            temperature = 0.5
            max_tokens = 3000
        "#};

        let config: Config = toml::from_str(config_str).unwrap();

        assert_eq!(config.llm.recipes.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.llm.recipes.temperature, 0.5);
        assert_eq!(config.llm.recipes.max_tokens, 3000);
    }

    #[test]
    fn llm_section_parses() {
        let config_str = indoc! {r#"
            [llm]
            path = "/v1"
            api_key = "sk-test"
            base_url = "http://localhost:8080/v1"
            default_model = "gpt-3.5-turbo"
        "#};

        let config: Config = toml::from_str(config_str).unwrap();

        assert_eq!(config.llm.path, "/v1");
        assert!(config.llm.api_key().is_some());
        assert_eq!(config.llm.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.llm.default_model.as_deref(), Some("gpt-3.5-turbo"));
    }

    #[test]
    fn cors_origins_parse_as_list_or_wildcard() {
        let config_str = indoc! {r#"
            [server.cors]
            allow_credentials = true
            allow_origins = ["http://localhost:3000", "http://localhost:5173"]
            allow_methods = "*"
        "#};

        let config: Config = toml::from_str(config_str).unwrap();
        let cors = config.server.cors.unwrap();

        assert!(cors.allow_credentials);
        assert_debug_snapshot!(cors.allow_origins, @r#"
        Some(
            Explicit(
                [
                    Url {
                        scheme: "http",
                        cannot_be_a_base: false,
                        username: "",
                        password: None,
                        host: Some(
                            Domain(
                                "localhost",
                            ),
                        ),
                        port: Some(
                            3000,
                        ),
                        path: "/",
                        query: None,
                        fragment: None,
                    },
                    Url {
                        scheme: "http",
                        cannot_be_a_base: false,
                        username: "",
                        password: None,
                        host: Some(
                            Domain(
                                "localhost",
                            ),
                        ),
                        port: Some(
                            5173,
                        ),
                        path: "/",
                        query: None,
                        fragment: None,
                    },
                ],
            ),
        )
        "#);
        assert_debug_snapshot!(cors.allow_methods, @r#"
        Some(
            Any,
        )
        "#);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let config_str = indoc! {r#"
            [llm]
            temprature = 0.5
        "#};

        let result: Result<Config, _> = toml::from_str(config_str);
        assert!(result.is_err());
    }
}
