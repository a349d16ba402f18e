use std::{fs, path::Path};

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

// 書き出しの言語ごとに変わる文字列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ClippingsConfig {
    pub page_keyword: String,     // "página 42" の "página"
    pub position_keyword: String, // "posición 813" の "posición"
    pub added_marker: String,     // 追加日時のメタデータ行 "Añadido el ..."
}

impl Default for ClippingsConfig {
    fn default() -> Self {
        Language::Spanish.config()
    }
}

impl ClippingsConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.page_keyword.trim().is_empty(),
            "page keyword must not be empty"
        );
        ensure!(
            !self.position_keyword.trim().is_empty(),
            "position keyword must not be empty"
        );
        ensure!(
            !self.added_marker.trim().is_empty(),
            "added marker must not be empty"
        );
        Ok(())
    }

    // JSON に書かれた項目だけを上書きする
    pub fn merge_json_file(self, path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        self.merge_json(&json)
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn merge_json(self, json: &str) -> Result<Self> {
        let partial: PartialClippingsConfig = serde_json::from_str(json)?;
        Ok(ClippingsConfig {
            page_keyword: partial.page_keyword.unwrap_or(self.page_keyword),
            position_keyword: partial.position_keyword.unwrap_or(self.position_keyword),
            added_marker: partial.added_marker.unwrap_or(self.added_marker),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialClippingsConfig {
    page_keyword: Option<String>,
    position_keyword: Option<String>,
    added_marker: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Spanish,
    English,
    German,
    Italian,
    French,
}

impl Language {
    pub fn of(code: &str) -> Result<Self> {
        match code.to_lowercase().as_str() {
            "es" => Ok(Self::Spanish),
            "en" => Ok(Self::English),
            "de" => Ok(Self::German),
            "it" => Ok(Self::Italian),
            "fr" => Ok(Self::French),
            code => bail!("Unknown language: {} (expected es, en, de, it or fr)", code),
        }
    }

    pub fn config(self) -> ClippingsConfig {
        let (page, position, added) = match self {
            Self::Spanish => ("página", "posición", "Añadido el"),
            Self::English => ("page", "location", "Added on"),
            Self::German => ("Seite", "Position", "Hinzugefügt am"),
            Self::Italian => ("pagina", "posizione", "Aggiunto in data"),
            Self::French => ("page", "emplacement", "Ajouté le"),
        };

        ClippingsConfig {
            page_keyword: page.to_owned(),
            position_keyword: position.to_owned(),
            added_marker: added.to_owned(),
        }
    }
}
