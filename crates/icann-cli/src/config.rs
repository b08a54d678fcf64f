//! Client configuration from command-line flags and a credentials profile
//!
//! Precedence for every field is flag, then credentials record, then the
//! computed default. The merge is pure; loading the record is the caller's
//! job.

use crate::cli::ConnectionArgs;
use crate::credentials::Record;
use icann_client::{ApiVersion, AuthType, Config, ConfigError, Entity, Environment};

/// Merge flags and a credentials record into a validated client config
///
/// `profile` is the profile chosen on the command line; it stands in for
/// the TLD when neither the flag nor the record names one.
pub fn resolve_config(
    flags: &ConnectionArgs,
    record: &Record,
    profile: Option<&str>,
) -> Result<Config, ConfigError> {
    let tld = first_non_empty([flags.tld.as_deref(), record.get("tld"), profile]);
    let Some(tld) = tld else {
        return Err(ConfigError::TldRequired);
    };

    let environment: Environment = first_non_empty([flags.environment.as_deref(), record.get("environment")])
        .unwrap_or(Environment::Prod.as_str())
        .parse()?;
    let version: ApiVersion = first_non_empty([flags.api_version.as_deref(), record.get("version")])
        .unwrap_or(ApiVersion::V2.as_str())
        .parse()?;
    let entity: Entity = first_non_empty([flags.entity.as_deref(), record.get("entity")])
        .unwrap_or(Entity::Registry.as_str())
        .parse()?;
    let auth_type = derive_auth_type(flags.auth_type.as_deref(), record)?;

    let mut config = Config {
        tld: tld.to_string(),
        auth_type: Some(auth_type),
        version: Some(version),
        entity: Some(entity),
        environment: Some(environment),
        ..Config::default()
    };

    match auth_type {
        AuthType::Basic => {
            config.username = owned(first_non_empty([flags.username.as_deref(), record.get("username")]));
            config.password = owned(first_non_empty([flags.password.as_deref(), record.get("password")]));
        }
        AuthType::Tlsa => {
            config.certificate_pem = expand_escapes(owned(first_non_empty([
                flags.cert_pem.as_deref(),
                record.get("certificate_pem"),
                record.get("certificate"),
            ])));
            config.key_pem = expand_escapes(owned(first_non_empty([
                flags.key_pem.as_deref(),
                record.get("key_pem"),
                record.get("key"),
            ])));
        }
    }

    config.validate()?;
    Ok(config)
}

/// Auth type: flag, then record `auth_type`, then TLSA when the record
/// carries PEM material, otherwise Basic
pub fn derive_auth_type(explicit: Option<&str>, record: &Record) -> Result<AuthType, ConfigError> {
    if let Some(value) = first_non_empty([explicit, record.get("auth_type")]) {
        return value.parse();
    }
    if record.get("certificate_pem").is_some() || record.get("key_pem").is_some() {
        return Ok(AuthType::Tlsa);
    }
    Ok(AuthType::Basic)
}

fn first_non_empty<'a, const N: usize>(values: [Option<&'a str>; N]) -> Option<&'a str> {
    values.into_iter().flatten().find(|v| !v.is_empty())
}

fn owned(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Turn literal `\n` escapes (and CRLF) into newlines so PEM text can be
/// passed on one line
pub fn expand_escapes(value: String) -> String {
    if !value.contains('\r') && !value.contains("\\n") {
        return value;
    }
    value.replace("\r\n", "\n").replace("\\n", "\n")
}
