use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dpi: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings { dpi: 300 }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        let settings: Settings = serde_yml::from_str(yaml).map_err(|e| {
            crate::error::PdfDarkError::config(format!("Failed to parse settings YAML: {e}"))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// DPIは正の値でなければならない（72ポイント/インチ基準のスケール係数になる）。
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.dpi == 0 {
            return Err(crate::error::PdfDarkError::config(
                "dpi must be greater than 0",
            ));
        }
        Ok(())
    }
}
