use std::fmt;
use std::str::FromStr;

/// Static description of one icon font style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontTypeConfig {
    /// File name of the source font, shared by the original and subset directories
    pub file: &'static str,

    /// CSS class that marks an element as rendering this font
    pub css_class: &'static str,

    /// Human-readable name used in summaries
    pub name: &'static str,
}

/// The known Material Symbols styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontType {
    Rounded,
    Outlined,
    Sharp,
}

impl FontType {
    pub const ALL: [FontType; 3] = [FontType::Rounded, FontType::Outlined, FontType::Sharp];

    /// Identifier used on the command line and in report file names
    pub fn key(self) -> &'static str {
        match self {
            FontType::Rounded => "rounded",
            FontType::Outlined => "outlined",
            FontType::Sharp => "sharp",
        }
    }

    pub fn config(self) -> FontTypeConfig {
        match self {
            FontType::Rounded => FontTypeConfig {
                file: "MaterialSymbolsRounded.woff2",
                css_class: "ms-round",
                name: "Rounded",
            },
            FontType::Outlined => FontTypeConfig {
                file: "MaterialSymbolsOutlined.woff2",
                css_class: "ms-outline",
                name: "Outlined",
            },
            FontType::Sharp => FontTypeConfig {
                file: "MaterialSymbolsSharp.woff2",
                css_class: "ms-sharp",
                name: "Sharp",
            },
        }
    }

    /// Comma-separated list of every valid key
    pub fn valid_keys() -> String {
        Self::ALL
            .iter()
            .map(|t| t.key())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FontType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid font type: {given} (available font types: {valid})")]
pub struct UnknownFontType {
    pub given: String,
    pub valid: String,
}

impl FromStr for FontType {
    type Err = UnknownFontType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontType::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| UnknownFontType {
                given: s.to_string(),
                valid: FontType::valid_keys(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_key() {
        for font_type in FontType::ALL {
            assert_eq!(font_type.key().parse::<FontType>(), Ok(font_type));
        }
    }

    #[test]
    fn rejects_unknown_keys_with_valid_list() {
        for bad in ["", "Rounded", "round", "filled", "sharp "] {
            let err = bad.parse::<FontType>().unwrap_err();
            assert_eq!(err.given, bad);
            assert_eq!(err.valid, "rounded, outlined, sharp");
            assert!(err.to_string().contains("rounded, outlined, sharp"));
        }
    }

    #[test]
    fn css_classes_are_distinct() {
        let classes: std::collections::HashSet<_> =
            FontType::ALL.iter().map(|t| t.config().css_class).collect();
        assert_eq!(classes.len(), FontType::ALL.len());
    }
}
