//! Backend configuration, loaded from TOML.
use std::path::Path;

use log::debug;
use pktir::packet::PacketSignature;
use serde::{Deserialize, Serialize};

use crate::utils::error::{SketchError, SketchResult};

/// Naming and selection settings of the sketch backend.
///
/// Defaults produce `void spec(int state_1,int pkt_1)` style signatures and select
/// `void f(struct Packet p)` functions.
///
/// ```toml
/// spec_name = "spec"
/// param_type = "int"
/// packet_prefix = "pkt_"
/// state_prefix = "state_"
/// packet_type = "struct Packet"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SketchConfig {
    /// Name of the generated function.
    pub spec_name: String,
    /// Type written in front of every generated parameter.
    pub param_type: String,
    /// Prefix of synthetic names for incoming packet fields.
    pub packet_prefix: String,
    /// Prefix of synthetic names for state variables.
    pub state_prefix: String,
    /// Parameter type identifying packet functions.
    pub packet_type: String,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            spec_name: "spec".to_string(),
            param_type: "int".to_string(),
            packet_prefix: "pkt_".to_string(),
            state_prefix: "state_".to_string(),
            packet_type: PacketSignature::DEFAULT_PACKET_TYPE.to_string(),
        }
    }
}

impl SketchConfig {
    pub fn from_toml_str(source: &str) -> SketchResult<Self> {
        Self::parse(source, "<inline>")
    }

    pub fn from_path(path: impl AsRef<Path>) -> SketchResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source, &path.display().to_string())
    }

    fn parse(source: &str, file: &str) -> SketchResult<Self> {
        let config: SketchConfig = toml::from_str(source).map_err(|source| SketchError::ConfigParse {
            source,
            file: file.to_string(),
        })?;
        debug!("Loaded sketch configuration from {}: {:?}", file, config);
        Ok(config)
    }

    /// Packet-function filter matching the configured packet type.
    pub fn packet_filter(&self) -> PacketSignature {
        PacketSignature::new(self.packet_type.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(SketchConfig::from_toml_str("").unwrap(), SketchConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = SketchConfig::from_toml_str(
            r#"
            spec_name = "atom"
            state_prefix = "s"
            "#,
        )
        .unwrap();

        assert_eq!(config.spec_name, "atom");
        assert_eq!(config.state_prefix, "s");
        assert_eq!(config.packet_prefix, "pkt_");
        assert_eq!(config.packet_filter(), PacketSignature::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SketchConfig::from_toml_str("spec_nmae = \"x\"").unwrap_err();
        assert!(err.is_config_parse());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SketchConfig::from_path("/nonexistent/pktsketch.toml").unwrap_err();
        assert!(err.is_io());
    }
}
