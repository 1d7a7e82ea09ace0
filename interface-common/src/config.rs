use std::collections::{HashMap, HashSet};

/// Allow-list of header keys that may appear unmasked in logs; everything
/// else is masked. Keys are matched case-insensitively.
#[derive(Clone, Debug)]
pub struct HeaderMaskingConfig {
    keys: HashSet<String>,
}

impl<'de> serde::Deserialize<'de> for HeaderMaskingConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Config {
            keys: Vec<String>,
        }

        Config::deserialize(deserializer).map(|config| Self {
            keys: config
                .keys
                .into_iter()
                .map(|key| key.to_lowercase())
                .collect(),
        })
    }
}

impl Default for HeaderMaskingConfig {
    fn default() -> Self {
        Self {
            keys: ["content-type", "content-length", "user-agent"]
                .iter()
                .map(|&key| key.to_string())
                .collect(),
        }
    }
}

impl HeaderMaskingConfig {
    pub fn is_header_unmasked(&self, header_key: &str) -> bool {
        self.keys.contains(&header_key.to_lowercase())
    }

    pub fn should_mask(&self, header_key: &str) -> bool {
        !self.is_header_unmasked(header_key)
    }

    /// Renders headers into a loggable map, masking everything not on the
    /// allow-list.
    pub fn mask_headers(&self, headers: &http::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .map(|(key, value)| {
                let name = key.as_str();
                let rendered = if self.should_mask(name) {
                    "**MASKED**".to_string()
                } else {
                    match value.to_str() {
                        Ok(text) => text.to_string(),
                        Err(_) => {
                            tracing::warn!("Invalid UTF-8 in header '{}'", name);
                            "**INVALID-UTF8**".to_string()
                        }
                    }
                };
                (name.to_string(), rendered)
            })
            .collect()
    }
}
