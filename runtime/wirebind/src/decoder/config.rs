use serde::{Deserialize, Serialize};

use crate::literal::NumberPolicy;

/// Tune the behaviour of a [`Decoder`](super::Decoder).
///
/// Every field has a sensible default: missing fields are filled in
/// when deserializing.
///
/// # Loading from the environment
///
/// With the `config` feature enabled, [`DecoderConfig::from_env`] reads overrides
/// from `WIREBIND_`-prefixed environment variables, e.g.
/// `WIREBIND_NUMBER_POLICY=exact` or `WIREBIND_REPEATED_QUERY_VALUES=last`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct DecoderConfig {
    /// How numbers are represented in dynamic fields.
    pub number_policy: NumberPolicy,
    /// How path and query tokens are interpreted.
    pub token_syntax: TokenSyntax,
    /// What to do when a query parameter is repeated for a single-valued field.
    pub repeated_query_values: RepeatedValuePolicy,
}

impl DecoderConfig {
    pub fn number_policy(mut self, policy: NumberPolicy) -> Self {
        self.number_policy = policy;
        self
    }

    pub fn token_syntax(mut self, syntax: TokenSyntax) -> Self {
        self.token_syntax = syntax;
        self
    }

    pub fn repeated_query_values(mut self, policy: RepeatedValuePolicy) -> Self {
        self.repeated_query_values = policy;
        self
    }
}

/// The syntax of path and query tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSyntax {
    /// Tokens are plain text: `?name=ann&age=3`.
    #[default]
    Plain,
    /// Tokens are JSON literals: `?name="ann"&age=3`.
    ///
    /// Fields marked with `#[wire(quoted)]` reject literals that don't fit them,
    /// rather than reporting a type mismatch.
    Json,
}

/// What to do when a single-valued field receives more than one query value.
///
/// Sequence fields (e.g. `Vec<T>`) always receive every value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatedValuePolicy {
    /// Fail with [`DecodeError::RepeatedQueryParameter`](super::DecodeError::RepeatedQueryParameter).
    #[default]
    Reject,
    /// Keep the first value.
    First,
    /// Keep the last value.
    Last,
}

#[cfg(feature = "config")]
mod loading {
    use figment::Figment;
    use figment::providers::{Env, Serialized};

    use super::DecoderConfig;

    /// The prefix of the environment variables read by [`DecoderConfig::from_env`].
    pub const ENV_PREFIX: &str = "WIREBIND_";

    #[derive(Debug, thiserror::Error)]
    #[error("Failed to load the decoder configuration")]
    /// The error returned by [`DecoderConfig::from_env`].
    pub struct ConfigLoadError(#[source] figment::Error);

    impl DecoderConfig {
        /// The default configuration, overridden by `WIREBIND_`-prefixed environment variables.
        ///
        /// Merge in more providers to load the configuration from other sources.
        pub fn figment() -> Figment {
            Figment::from(Serialized::defaults(DecoderConfig::default()))
                .merge(Env::prefixed(ENV_PREFIX))
        }

        /// Load the configuration from the environment.
        pub fn from_env() -> Result<Self, ConfigLoadError> {
            let span = tracing::debug_span!("Loading decoder configuration");
            let _guard = span.enter();
            Self::figment().extract().map_err(ConfigLoadError)
        }
    }
}

#[cfg(feature = "config")]
pub use loading::{ConfigLoadError, ENV_PREFIX};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_their_default() {
        let config: DecoderConfig = serde_json::from_str(r#"{"token_syntax": "json"}"#).unwrap();
        assert_eq!(config.token_syntax, TokenSyntax::Json);
        assert_eq!(config.number_policy, NumberPolicy::Float);
        assert_eq!(config.repeated_query_values, RepeatedValuePolicy::Reject);
    }

    #[cfg(feature = "config")]
    #[test]
    fn environment_variables_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("WIREBIND_NUMBER_POLICY", "exact");
            jail.set_env("WIREBIND_REPEATED_QUERY_VALUES", "last");

            let config = DecoderConfig::from_env().unwrap();
            assert_eq!(config.number_policy, NumberPolicy::Exact);
            assert_eq!(config.repeated_query_values, RepeatedValuePolicy::Last);
            assert_eq!(config.token_syntax, TokenSyntax::Plain);
            Ok(())
        });
    }

    #[cfg(feature = "config")]
    #[test]
    fn invalid_values_are_reported() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("WIREBIND_TOKEN_SYNTAX", "xml");
            let err = DecoderConfig::from_env().unwrap_err();
            insta::assert_snapshot!(err, @"Failed to load the decoder configuration");
            Ok(())
        });
    }
}
