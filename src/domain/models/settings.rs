//! Formatting settings sent with every `/format` request.
//!
//! The document uses the same camelCase layout as the project settings file
//! (`.assistantConfig`). Unknown keys are rejected so a typo never silently
//! falls back to a default.

use serde::{Deserialize, Serialize};

use crate::domain::errors::SettingsError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FormatSettings {
    #[serde(default = "default_brace_style")]
    pub brace_style: BraceStyle,
    #[serde(default = "default_true")]
    pub space_around_operators: bool,
    #[serde(default = "default_max_line_length")]
    pub max_line_length: u32,
    #[serde(default)]
    pub modifier_order: ModifierOrder,
    #[serde(default)]
    pub naming_conventions: NamingConventions,
    #[serde(default)]
    pub imports: ImportSettings,
    #[serde(default)]
    pub indents: IndentSettings,
    #[serde(default)]
    pub aligns: AlignSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BraceStyle {
    Break,
    Attach,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModifierOrder {
    pub class: Vec<String>,
    pub method: Vec<String>,
}

impl Default for ModifierOrder {
    fn default() -> Self {
        Self {
            class: vec!["public".into(), "abstract".into(), "final".into()],
            method: vec!["public".into(), "static".into(), "final".into()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStyle {
    Pascalcase,
    Camelcase,
    Uppercase,
    Snakecase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamingConventions {
    pub class: NamingStyle,
    pub method: NamingStyle,
    pub variable: NamingStyle,
    pub parameter: NamingStyle,
    pub constant: NamingStyle,
}

impl Default for NamingConventions {
    fn default() -> Self {
        Self {
            class: NamingStyle::Pascalcase,
            method: NamingStyle::Camelcase,
            variable: NamingStyle::Camelcase,
            parameter: NamingStyle::Camelcase,
            constant: NamingStyle::Uppercase,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportOrder {
    Preserve,
    Sort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportSettings {
    pub order: ImportOrder,
    pub merge: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            order: ImportOrder::Preserve,
            merge: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentType {
    Spaces,
    Tabs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchCaseLabels {
    Indent,
    NoIndent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IndentSettings {
    pub size: u32,
    #[serde(rename = "type")]
    pub indent_type: IndentType,
    pub switch_case_labels: SwitchCaseLabels,
}

impl Default for IndentSettings {
    fn default() -> Self {
        Self {
            size: 4,
            indent_type: IndentType::Spaces,
            switch_case_labels: SwitchCaseLabels::Indent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketAlign {
    Align,
    DontAlign,
    AlwaysBreak,
    BlockIndent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AlignSettings {
    pub after_open_bracket: BracketAlign,
    pub parameters_before_align: u32,
}

impl Default for AlignSettings {
    fn default() -> Self {
        Self {
            after_open_bracket: BracketAlign::Align,
            parameters_before_align: 2,
        }
    }
}

fn default_brace_style() -> BraceStyle {
    BraceStyle::Break
}

const fn default_true() -> bool {
    true
}

const fn default_max_line_length() -> u32 {
    100
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            brace_style: default_brace_style(),
            space_around_operators: true,
            max_line_length: default_max_line_length(),
            modifier_order: ModifierOrder::default(),
            naming_conventions: NamingConventions::default(),
            imports: ImportSettings::default(),
            indents: IndentSettings::default(),
            aligns: AlignSettings::default(),
        }
    }
}

impl FormatSettings {
    /// Parse and validate a settings document.
    pub fn from_json(content: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(content).map_err(|e| SettingsError::Invalid(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_line_length == 0 {
            return Err(SettingsError::Invalid(
                "maxLineLength must be at least 1".to_string(),
            ));
        }
        if self.indents.size == 0 {
            return Err(SettingsError::Invalid(
                "indents.size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
