pub mod settings;

use settings::Settings;
use std::path::{Path, PathBuf};

/// 入力PDFのパスからsettings.yamlを自動検出して読み込む。
///
/// 入力PDFと同じディレクトリに `settings.yaml` が存在すれば読み込み、
/// 存在しなければデフォルト設定を返す。
pub fn load_settings_for_input(input_path: &Path) -> crate::error::Result<Settings> {
    let dir = input_path
        .parent()
        .ok_or_else(|| crate::error::PdfDarkError::config("Cannot determine input directory"))?;

    let settings_path = dir.join("settings.yaml");

    if settings_path.exists() {
        Settings::from_file(&settings_path)
    } else {
        Ok(Settings::default())
    }
}

/// Derive the default output path: `<stem>_darkmode.<ext>` next to the input.
/// Inputs without an extension get `.pdf` appended.
pub fn derive_output_path(input_path: &Path) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = input_path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pdf".to_string());
    input_path.with_file_name(format!("{stem}_darkmode.{ext}"))
}
