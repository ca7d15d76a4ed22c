use serde::{Deserialize, Serialize};

use crate::Result;

pub const URI_SCHEME: &str = "korea-tourism://";
pub const JSON_MIME_TYPE: &str = "application/json";

/// Addressable text payload returned by every tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextResource {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

impl TextResource {
    /// Pretty-printed JSON body under `korea-tourism://{path}`.
    ///
    /// Non-ASCII text (Korean titles and addresses) is written as-is.
    pub fn json<T: Serialize + ?Sized>(path: &str, body: &T) -> Result<Self> {
        Ok(Self {
            uri: format!("{URI_SCHEME}{path}"),
            mime_type: JSON_MIME_TYPE.to_string(),
            text: serde_json::to_string_pretty(body)?,
        })
    }

    /// Parse the body back into a JSON value.
    pub fn body(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.text)?)
    }
}
