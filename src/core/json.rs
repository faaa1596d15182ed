use super::error::RpsError;
use super::types::{IssuerConfig, Rps};

impl Rps {
    /// Load an RPS record from JSON. Both the field names of this crate and
    /// the flat lowercase keys of legacy payloads are accepted.
    pub fn from_json(json: &str) -> Result<Self, RpsError> {
        serde_json::from_str(json).map_err(|e| RpsError::Json(e.to_string()))
    }
}

impl IssuerConfig {
    /// Load issuer data from a JSON config payload (`cnpj`, `cpf`, `im`).
    /// Unrelated keys are ignored.
    pub fn from_json(json: &str) -> Result<Self, RpsError> {
        serde_json::from_str(json).map_err(|e| RpsError::Json(e.to_string()))
    }
}
