//! Output token files.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// The five theme variants, each published to its own file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ThemeName {
    Light,
    Dark,
    HighContrastLight,
    HighContrastDark,
    Dim,
}

impl ThemeName {
    pub const ALL: [ThemeName; 5] = [
        ThemeName::Light,
        ThemeName::Dark,
        ThemeName::HighContrastLight,
        ThemeName::HighContrastDark,
        ThemeName::Dim,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::HighContrastLight => "high-contrast-light",
            Self::HighContrastDark => "high-contrast-dark",
            Self::Dim => "dim",
        }
    }

    /// Match a mode name such as `High Contrast Light` to a theme.
    pub fn from_mode_name(name: &str) -> Option<Self> {
        let normalized = name
            .trim()
            .to_lowercase()
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        Self::ALL.into_iter().find(|t| t.as_str() == normalized)
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one of the eleven published token files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenFileId {
    FoundationColor,
    FoundationRadius,
    FoundationSpacing,
    FoundationTypography,
    SemanticAttachment,
    SemanticTypography,
    Theme(ThemeName),
}

impl TokenFileId {
    pub const ALL: [TokenFileId; 11] = [
        TokenFileId::FoundationColor,
        TokenFileId::FoundationRadius,
        TokenFileId::FoundationSpacing,
        TokenFileId::FoundationTypography,
        TokenFileId::SemanticAttachment,
        TokenFileId::SemanticTypography,
        TokenFileId::Theme(ThemeName::Light),
        TokenFileId::Theme(ThemeName::Dark),
        TokenFileId::Theme(ThemeName::HighContrastLight),
        TokenFileId::Theme(ThemeName::HighContrastDark),
        TokenFileId::Theme(ThemeName::Dim),
    ];

    /// Repository-relative POSIX path of the file.
    pub fn path(&self) -> &'static str {
        match self {
            Self::FoundationColor => "tokens/src/foundation/color.json",
            Self::FoundationRadius => "tokens/src/foundation/radius.json",
            Self::FoundationSpacing => "tokens/src/foundation/spacing.json",
            Self::FoundationTypography => "tokens/src/foundation/typography.json",
            Self::SemanticAttachment => "tokens/src/semantic/attachment.json",
            Self::SemanticTypography => "tokens/src/semantic/typography.json",
            Self::Theme(ThemeName::Light) => "tokens/src/themes/light.json",
            Self::Theme(ThemeName::Dark) => "tokens/src/themes/dark.json",
            Self::Theme(ThemeName::HighContrastLight) => "tokens/src/themes/high-contrast-light.json",
            Self::Theme(ThemeName::HighContrastDark) => "tokens/src/themes/high-contrast-dark.json",
            Self::Theme(ThemeName::Dim) => "tokens/src/themes/dim.json",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.path() == path)
    }

    /// Path of the node all tokens of this file live under.
    pub fn root(&self) -> &'static [&'static str] {
        match self {
            Self::FoundationColor => &["color", "foundation"],
            Self::FoundationRadius => &["radius", "foundation"],
            Self::FoundationSpacing => &["spacing", "foundation"],
            Self::FoundationTypography => &["typography", "foundation"],
            Self::SemanticAttachment => &["color", "semantic", "attachment"],
            Self::SemanticTypography => &["typography", "semantic"],
            Self::Theme(_) => &["color", "theme"],
        }
    }

    pub fn is_foundation(&self) -> bool {
        matches!(
            self,
            Self::FoundationColor
                | Self::FoundationRadius
                | Self::FoundationSpacing
                | Self::FoundationTypography
        )
    }

    /// An empty tree holding only the root groups.
    ///
    /// Stands in for a file that does not exist remotely yet.
    pub fn skeleton(&self) -> Value {
        self.root()
            .iter()
            .rev()
            .fold(Value::Object(Map::new()), |inner, key| {
                let mut map = Map::new();
                map.insert((*key).to_string(), inner);
                Value::Object(map)
            })
    }
}

impl fmt::Display for TokenFileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl Serialize for TokenFileId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

impl<'de> Deserialize<'de> for TokenFileId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        Self::from_path(&path)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown token file `{path}`")))
    }
}
