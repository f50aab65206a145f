use serde::{Deserialize, Serialize};

/// ADF name of the QCAT application
pub const QCAT_ADF_NAME: &[u8] = b"QCAT01";

/// EMV point-of-interaction data of the application template
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmvPoiData {
    /// Application identifier, tag `4F`, 5-16 bytes
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    pub adf_name: Option<Vec<u8>>,

    /// Application PAN, tag `5A`, up to 10 bytes
    #[serde(with = "serde_bytes", default, skip_serializing_if = "Option::is_none")]
    pub app_pan: Option<Vec<u8>>,
}

impl EmvPoiData {
    pub fn new(adf_name: Option<Vec<u8>>, app_pan: Option<Vec<u8>>) -> Self {
        Self { adf_name, app_pan }
    }

    /// POI data naming the QCAT application and no PAN
    pub fn qcat() -> Self {
        Self::new(Some(QCAT_ADF_NAME.to_vec()), None)
    }

    pub fn is_empty(&self) -> bool {
        self.adf_name.is_none() && self.app_pan.is_none()
    }
}
