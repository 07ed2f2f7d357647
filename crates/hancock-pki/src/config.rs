use serde::{Deserialize, Serialize};

/// How certificate serial numbers are assigned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerialNumberPolicy {
    /// 128-bit random positive serial
    #[default]
    Random,
    /// Constant serial 1 on every certificate, for compatibility with
    /// data produced by older deployments
    Fixed,
}

/// Immutable certificate issuance parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PkiConfig {
    pub serial_number: SerialNumberPolicy,
    /// Path length constraint placed on root CAs
    pub root_max_path_len: u8,
}

impl Default for PkiConfig {
    fn default() -> Self {
        Self {
            serial_number: SerialNumberPolicy::Random,
            root_max_path_len: 1,
        }
    }
}
