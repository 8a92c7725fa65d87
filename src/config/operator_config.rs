use serde::de::DeserializeOwned;

/// Decode a node's opaque `config` blob into an operator's typed settings.
///
/// A missing blob (`null`) decodes as an empty mapping, so settings structs
/// whose fields all carry `#[serde(default)]` accept nodes without a `config`
/// section.
///
/// # Examples
/// ```
/// use serde::Deserialize;
/// use the_dagstream::config::decode_operator_config;
///
/// #[derive(Deserialize)]
/// struct Settings {
///     #[serde(default = "one")]
///     factor: f64,
/// }
/// fn one() -> f64 { 1.0 }
///
/// let blob: serde_yaml::Value = serde_yaml::from_str("factor: 3").unwrap();
/// let settings: Settings = decode_operator_config(&blob).unwrap();
/// assert_eq!(settings.factor, 3.0);
///
/// let settings: Settings = decode_operator_config(&serde_yaml::Value::Null).unwrap();
/// assert_eq!(settings.factor, 1.0);
/// ```
pub fn decode_operator_config<T: DeserializeOwned>(
    config: &serde_yaml::Value,
) -> Result<T, serde_yaml::Error> {
    match config {
        serde_yaml::Value::Null => {
            serde_yaml::from_value(serde_yaml::Value::Mapping(serde_yaml::Mapping::new()))
        }
        other => serde_yaml::from_value(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Required {
        interval: u64,
    }

    #[test]
    fn test_missing_required_field_fails() {
        let result: Result<Required, _> = decode_operator_config(&serde_yaml::Value::Null);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_type_fails() {
        let blob: serde_yaml::Value = serde_yaml::from_str("interval: soon").unwrap();
        let result: Result<Required, _> = decode_operator_config(&blob);
        assert!(result.is_err());
    }

    #[test]
    fn test_decodes_mapping() {
        let blob: serde_yaml::Value = serde_yaml::from_str("interval: 100").unwrap();
        let decoded: Required = decode_operator_config(&blob).unwrap();
        assert_eq!(decoded, Required { interval: 100 });
    }
}
