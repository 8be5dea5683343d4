//! Naming taxonomy.
//!
//! Maps variable and text-style names onto token categories. Every category
//! pairs a recognizer with a parser over the same pattern, so a name that
//! classifies always parses. Categories are tried in [`NAME_PRIORITY`] order
//! and the first match wins.

use crate::file::{ThemeName, TokenFileId};
use crate::token::TokenType;
use crate::variable::{Collection, ModeId, PrimitiveKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

pub const COLOR_FAMILIES: [&str; 10] = [
    "blue", "indigo", "neutral", "cyan", "purple", "teal", "yellow", "orange", "green", "red",
];

pub const ATTACHMENT_COLORS: [&str; 5] = ["blue", "green", "orange", "red", "grey"];

pub const RADIUS_SIZES: [&str; 6] = ["xs", "s", "m", "l", "xl", "full"];

pub const SPACING_SIZES: [&str; 8] = ["xxxxs", "xs", "m", "l", "xl", "xxl", "xxxl", "xxxxl"];

/// Text style groups in canonical order.
pub const TEXT_STYLE_GROUPS: [&str; 3] = ["heading", "body", "code"];

static FOUNDATION_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(blue|indigo|neutral|cyan|purple|teal|yellow|orange|green|red)/(\d{1,9})$")
        .expect("valid regex")
});
static ATTACHMENT_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^attachment/(blue|green|orange|red|grey)$").expect("valid regex"));
static RADIUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^radius-(xs|s|m|l|xl|full)$").expect("valid regex"));
static SPACING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^spacing-(xxxxs|xs|m|l|xl|xxl|xxxl|xxxxl)$").expect("valid regex")
});
static FONT_FAMILY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^font/family/([A-Za-z0-9_-]+)$").expect("valid regex"));
static FONT_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^font/size/(\d{1,9})$").expect("valid regex"));
static FONT_WEIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^font/weight/([A-Za-z0-9_-]+)$").expect("valid regex"));
static LINE_HEIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^line-height/(?:heading|body)/(\d{1,9})$").expect("valid regex"));
static LETTER_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^letter-spacing/([A-Za-z0-9_-]+)$").expect("valid regex"));
static TEXT_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(Heading|Body|Code) (\d{1,9})(?: - (.+))?$").expect("valid regex"));
static OPACITY_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-(\d{1,3})$").expect("valid regex"));

/// Foundation typography sub-kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypographyKind {
    FontFamily,
    FontSize,
    FontWeight,
    LineHeight,
    LetterSpacing,
}

impl TypographyKind {
    /// Canonical group order inside the foundation typography file.
    pub const ALL: [TypographyKind; 5] = [
        TypographyKind::FontFamily,
        TypographyKind::FontSize,
        TypographyKind::FontWeight,
        TypographyKind::LineHeight,
        TypographyKind::LetterSpacing,
    ];

    /// Group key under `typography.foundation`.
    pub fn group(&self) -> &'static str {
        match self {
            Self::FontFamily => "fontFamily",
            Self::FontSize => "fontSize",
            Self::FontWeight => "fontWeight",
            Self::LineHeight => "lineHeight",
            Self::LetterSpacing => "letterSpacing",
        }
    }

    pub fn from_group(group: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.group() == group)
    }

    pub fn token_type(&self) -> TokenType {
        match self {
            Self::FontFamily => TokenType::FontFamily,
            Self::FontWeight => TokenType::FontWeight,
            Self::FontSize | Self::LineHeight | Self::LetterSpacing => TokenType::Dimension,
        }
    }

    fn accepts(&self, kind: PrimitiveKind) -> bool {
        match self {
            Self::FontFamily => kind == PrimitiveKind::String,
            Self::FontSize | Self::LineHeight => kind == PrimitiveKind::Number,
            Self::FontWeight | Self::LetterSpacing => {
                matches!(kind, PrimitiveKind::Number | PrimitiveKind::String)
            }
        }
    }
}

/// Token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenCategory {
    FoundationColor,
    SemanticAttachmentColor,
    FoundationRadius,
    FoundationSpacing,
    FoundationTypography(TypographyKind),
    SemanticTypography,
    ThemeColor,
}

/// Recognizes a category from a name alone.
pub type Recognizer = fn(&str) -> Option<TokenCategory>;

/// Name-recognized categories in priority order.
///
/// Semantic typography comes from text styles and theme colors from
/// collection modes, so neither appears here.
pub const NAME_PRIORITY: [Recognizer; 5] = [
    recognize_foundation_color,
    recognize_attachment_color,
    recognize_radius,
    recognize_spacing,
    recognize_typography,
];

fn recognize_foundation_color(name: &str) -> Option<TokenCategory> {
    FOUNDATION_COLOR
        .is_match(name)
        .then_some(TokenCategory::FoundationColor)
}

fn recognize_attachment_color(name: &str) -> Option<TokenCategory> {
    ATTACHMENT_COLOR
        .is_match(name)
        .then_some(TokenCategory::SemanticAttachmentColor)
}

fn recognize_radius(name: &str) -> Option<TokenCategory> {
    RADIUS.is_match(name).then_some(TokenCategory::FoundationRadius)
}

fn recognize_spacing(name: &str) -> Option<TokenCategory> {
    SPACING.is_match(name).then_some(TokenCategory::FoundationSpacing)
}

fn recognize_typography(name: &str) -> Option<TokenCategory> {
    typography_kind(name).map(TokenCategory::FoundationTypography)
}

impl TokenCategory {
    /// Stable label used for counters and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FoundationColor => "foundation-color",
            Self::SemanticAttachmentColor => "semantic-attachment-color",
            Self::FoundationRadius => "foundation-radius",
            Self::FoundationSpacing => "foundation-spacing",
            Self::FoundationTypography(_) => "foundation-typography",
            Self::SemanticTypography => "semantic-typography",
            Self::ThemeColor => "theme-color",
        }
    }

    /// Output file for the category. Theme colors fan out to one file per
    /// theme and have no single target.
    pub fn target_file(&self) -> Option<TokenFileId> {
        match self {
            Self::FoundationColor => Some(TokenFileId::FoundationColor),
            Self::SemanticAttachmentColor => Some(TokenFileId::SemanticAttachment),
            Self::FoundationRadius => Some(TokenFileId::FoundationRadius),
            Self::FoundationSpacing => Some(TokenFileId::FoundationSpacing),
            Self::FoundationTypography(_) => Some(TokenFileId::FoundationTypography),
            Self::SemanticTypography => Some(TokenFileId::SemanticTypography),
            Self::ThemeColor => None,
        }
    }

    /// Whether a variable of `kind` can belong to this category.
    pub fn accepts(&self, kind: PrimitiveKind) -> bool {
        match self {
            Self::FoundationColor | Self::SemanticAttachmentColor | Self::ThemeColor => {
                kind == PrimitiveKind::Color
            }
            Self::FoundationRadius | Self::FoundationSpacing => kind == PrimitiveKind::Number,
            Self::FoundationTypography(sub) => sub.accepts(kind),
            Self::SemanticTypography => false,
        }
    }

    /// Whether tokens of this category may hold references.
    pub fn permits_reference(&self) -> bool {
        matches!(
            self,
            Self::SemanticAttachmentColor | Self::SemanticTypography | Self::ThemeColor
        )
    }

    /// Decompose a name this category recognized.
    pub fn parse(&self, name: &str) -> Option<ParsedName> {
        match self {
            Self::FoundationColor => parse_foundation_color(name),
            Self::SemanticAttachmentColor => parse_attachment_color(name),
            Self::FoundationRadius => parse_radius(name),
            Self::FoundationSpacing => parse_spacing(name),
            Self::FoundationTypography(_) => parse_typography(name),
            Self::SemanticTypography | Self::ThemeColor => None,
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decomposed variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedName {
    FoundationColor { family: String, shade: String },
    AttachmentColor { color: String },
    Radius { size: String },
    Spacing { size: String },
    Typography { kind: TypographyKind, key: String },
}

impl ParsedName {
    pub fn file(&self) -> TokenFileId {
        match self {
            Self::FoundationColor { .. } => TokenFileId::FoundationColor,
            Self::AttachmentColor { .. } => TokenFileId::SemanticAttachment,
            Self::Radius { .. } => TokenFileId::FoundationRadius,
            Self::Spacing { .. } => TokenFileId::FoundationSpacing,
            Self::Typography { .. } => TokenFileId::FoundationTypography,
        }
    }

    /// Path below the file root.
    pub fn relative_path(&self) -> Vec<String> {
        match self {
            Self::FoundationColor { family, shade } => vec![family.clone(), shade.clone()],
            Self::AttachmentColor { color } => vec![color.clone()],
            Self::Radius { size } | Self::Spacing { size } => vec![size.clone()],
            Self::Typography { kind, key } => vec![kind.group().to_string(), key.clone()],
        }
    }

    /// Full dotted path of the token, as used inside references.
    pub fn token_path(&self) -> String {
        self.file()
            .root()
            .iter()
            .map(|s| (*s).to_string())
            .chain(self.relative_path())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Classify a variable name.
pub fn classify(name: &str, kind: PrimitiveKind) -> Option<TokenCategory> {
    NAME_PRIORITY
        .iter()
        .filter_map(|recognize| recognize(name))
        .find(|category| category.accepts(kind))
}

pub fn parse_foundation_color(name: &str) -> Option<ParsedName> {
    let caps = FOUNDATION_COLOR.captures(name)?;
    Some(ParsedName::FoundationColor {
        family: caps[1].to_string(),
        shade: caps[2].to_string(),
    })
}

pub fn parse_attachment_color(name: &str) -> Option<ParsedName> {
    let caps = ATTACHMENT_COLOR.captures(name)?;
    Some(ParsedName::AttachmentColor {
        color: caps[1].to_string(),
    })
}

pub fn parse_radius(name: &str) -> Option<ParsedName> {
    let caps = RADIUS.captures(name)?;
    Some(ParsedName::Radius {
        size: caps[1].to_string(),
    })
}

pub fn parse_spacing(name: &str) -> Option<ParsedName> {
    let caps = SPACING.captures(name)?;
    Some(ParsedName::Spacing {
        size: caps[1].to_string(),
    })
}

pub fn parse_typography(name: &str) -> Option<ParsedName> {
    let kind = typography_kind(name)?;
    let pattern = match kind {
        TypographyKind::FontFamily => &FONT_FAMILY,
        TypographyKind::FontSize => &FONT_SIZE,
        TypographyKind::FontWeight => &FONT_WEIGHT,
        TypographyKind::LineHeight => &LINE_HEIGHT,
        TypographyKind::LetterSpacing => &LETTER_SPACING,
    };
    let caps = pattern.captures(name)?;
    let key = match kind {
        TypographyKind::FontWeight => weight_key(&caps[1]),
        _ => caps[1].to_string(),
    };
    Some(ParsedName::Typography { kind, key })
}

/// Lowercase and drop separators: `Semi Bold` -> `semibold`.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Font weight keys share one spelling with text-style font styles, so
/// `font/weight/semi-bold` and `Semi Bold` meet at `semibold`.
fn weight_key(raw: &str) -> String {
    let key = normalize_name(raw);
    if key.is_empty() {
        raw.to_string()
    } else {
        key
    }
}

fn typography_kind(name: &str) -> Option<TypographyKind> {
    if FONT_FAMILY.is_match(name) {
        Some(TypographyKind::FontFamily)
    } else if FONT_SIZE.is_match(name) {
        Some(TypographyKind::FontSize)
    } else if FONT_WEIGHT.is_match(name) {
        Some(TypographyKind::FontWeight)
    } else if LINE_HEIGHT.is_match(name) {
        Some(TypographyKind::LineHeight)
    } else if LETTER_SPACING.is_match(name) {
        Some(TypographyKind::LetterSpacing)
    } else {
        None
    }
}

/// Decomposed text style name, e.g. `Heading 700 - Regular`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyleName {
    /// Lowercase group: `heading`, `body` or `code`.
    pub group: String,
    pub size: String,
    pub variant: Option<String>,
}

impl TextStyleName {
    /// Key inside the group: the size, suffixed with the variant slug.
    pub fn key(&self) -> String {
        match &self.variant {
            Some(variant) => format!("{}-{}", self.size, slug(variant)),
            None => self.size.clone(),
        }
    }
}

pub fn parse_text_style_name(name: &str) -> Option<TextStyleName> {
    let caps = TEXT_STYLE.captures(name.trim())?;
    let variant = caps
        .get(3)
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty());
    Some(TextStyleName {
        group: caps[1].to_lowercase(),
        size: caps[2].to_string(),
        variant,
    })
}

/// Lowercase and join whitespace-separated words with dashes.
pub fn slug(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Opacity steps generated at build time: 4, 8, ... 96.
pub fn is_opacity_step(value: u32) -> bool {
    (4..=96).contains(&value) && value % 4 == 0
}

/// Whether a name or key ends in an opacity variant suffix such as `-16`.
pub fn has_opacity_suffix(name: &str) -> bool {
    OPACITY_SUFFIX
        .captures(name)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .is_some_and(is_opacity_step)
}

/// Modes of a collection that encode one of the theme variants.
pub fn theme_modes(collection: &Collection) -> Vec<(ModeId, ThemeName)> {
    collection
        .modes
        .iter()
        .filter_map(|mode| ThemeName::from_mode_name(&mode.name).map(|t| (mode.mode_id.clone(), t)))
        .collect()
}

pub fn is_theme_collection(collection: &Collection) -> bool {
    !theme_modes(collection).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Mode;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("blue/300", PrimitiveKind::Color => Some(TokenCategory::FoundationColor))]
    #[test_case("neutral/0", PrimitiveKind::Color => Some(TokenCategory::FoundationColor))]
    #[test_case("attachment/grey", PrimitiveKind::Color => Some(TokenCategory::SemanticAttachmentColor))]
    #[test_case("radius-full", PrimitiveKind::Number => Some(TokenCategory::FoundationRadius))]
    #[test_case("spacing-xxxxl", PrimitiveKind::Number => Some(TokenCategory::FoundationSpacing))]
    #[test_case("font/family/sans", PrimitiveKind::String => Some(TokenCategory::FoundationTypography(TypographyKind::FontFamily)))]
    #[test_case("font/size/700", PrimitiveKind::Number => Some(TokenCategory::FoundationTypography(TypographyKind::FontSize)))]
    #[test_case("font/weight/regular", PrimitiveKind::String => Some(TokenCategory::FoundationTypography(TypographyKind::FontWeight)))]
    #[test_case("line-height/body/300", PrimitiveKind::Number => Some(TokenCategory::FoundationTypography(TypographyKind::LineHeight)))]
    #[test_case("letter-spacing/tight", PrimitiveKind::Number => Some(TokenCategory::FoundationTypography(TypographyKind::LetterSpacing)))]
    #[test_case("Blue/300", PrimitiveKind::Color => None; "case sensitive")]
    #[test_case("blue/500-8", PrimitiveKind::Color => None; "opacity variant")]
    #[test_case("spacing-s", PrimitiveKind::Number => None; "unknown spacing size")]
    #[test_case("attachment/purple", PrimitiveKind::Color => None; "unknown attachment")]
    #[test_case("blue/300", PrimitiveKind::Number => None; "wrong kind")]
    #[test_case("line-height/caption/100", PrimitiveKind::Number => None; "unknown line height group")]
    fn test_classify(name: &str, kind: PrimitiveKind) -> Option<TokenCategory> {
        classify(name, kind)
    }

    #[test]
    fn test_line_height_key_is_numeric_suffix_only() {
        assert_eq!(
            parse_typography("line-height/heading/700"),
            Some(ParsedName::Typography {
                kind: TypographyKind::LineHeight,
                key: "700".into()
            })
        );
    }

    #[test]
    fn test_token_path() {
        let parsed = parse_foundation_color("blue/300").unwrap();
        assert_eq!(parsed.token_path(), "color.foundation.blue.300");
        let parsed = parse_typography("font/weight/regular").unwrap();
        assert_eq!(parsed.token_path(), "typography.foundation.fontWeight.regular");
    }

    #[test]
    fn test_text_style_names() {
        let parsed = parse_text_style_name("Heading 700 - Regular").unwrap();
        assert_eq!(parsed.group, "heading");
        assert_eq!(parsed.key(), "700-regular");

        let parsed = parse_text_style_name("Body 300").unwrap();
        assert_eq!(parsed.variant, None);
        assert_eq!(parsed.key(), "300");

        assert_eq!(parse_text_style_name("Code 100 - Semi Bold").unwrap().key(), "100-semi-bold");
        assert!(parse_text_style_name("Caption 100").is_none());
    }

    #[test_case("sidebar-bg-16" => true)]
    #[test_case("blue/500-8" => true)]
    #[test_case("sidebar-bg-96" => true)]
    #[test_case("sidebar-bg-100" => false)]
    #[test_case("sidebar-bg-10" => false)]
    #[test_case("sidebar-bg" => false)]
    fn test_opacity_suffix(name: &str) -> bool {
        has_opacity_suffix(name)
    }

    #[test]
    fn test_theme_modes() {
        let collection = Collection {
            id: "c".into(),
            name: "Themes".into(),
            modes: vec![Mode::new("1", "Light"), Mode::new("2", "Dark"), Mode::new("3", "Brand")],
            default_mode_id: None,
        };
        assert_eq!(
            theme_modes(&collection),
            vec![("1".to_string(), ThemeName::Light), ("2".to_string(), ThemeName::Dark)]
        );
    }

    proptest! {
        #[test]
        fn prop_foundation_color_names_classify_and_parse(
            family in proptest::sample::select(COLOR_FAMILIES.to_vec()),
            shade in 0u32..100_000,
        ) {
            let name = format!("{family}/{shade}");
            prop_assert_eq!(classify(&name, PrimitiveKind::Color), Some(TokenCategory::FoundationColor));
            prop_assert!(parse_foundation_color(&name).is_some());
        }

        #[test]
        fn prop_unknown_families_do_not_classify(family in "[a-z]{3,8}", shade in 0u32..1000) {
            prop_assume!(!COLOR_FAMILIES.contains(&family.as_str()));
            let name = format!("{family}/{shade}");
            prop_assert_eq!(classify(&name, PrimitiveKind::Color), None);
        }

        #[test]
        fn prop_classified_names_always_parse(name in "[a-z/0-9-]{1,24}") {
            for kind in [PrimitiveKind::Color, PrimitiveKind::Number, PrimitiveKind::String] {
                if let Some(category) = classify(&name, kind) {
                    prop_assert!(category.parse(&name).is_some());
                }
            }
        }
    }
}
