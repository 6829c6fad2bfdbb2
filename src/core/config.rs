use crate::core::errors::{FlowError, Result};
use serde::{Deserialize, Serialize};

/// Settings shared by every batch a [`Flow`](crate::flow::Flow) runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Label attached to every batch span
    #[serde(default = "default_name")]
    pub name: String,
    /// Log completions from units that already completed at warn level
    /// instead of debug (default: true)
    #[serde(default = "default_warn_on_duplicate")]
    pub warn_on_duplicate_completion: bool,
}

fn default_name() -> String {
    "flow".to_string()
}

fn default_warn_on_duplicate() -> bool {
    true
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            warn_on_duplicate_completion: default_warn_on_duplicate(),
        }
    }
}

impl FlowConfig {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_duplicate_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_duplicate_completion = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FlowError::configuration_field(
                "name must not be empty",
                "name",
                Some("non-empty string".to_string()),
                Some(self.name.clone()),
            ));
        }
        Ok(())
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
