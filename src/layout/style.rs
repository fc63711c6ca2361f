//! The fixed vocabulary of visual styles for component types.

use serde::Serialize;

/// Known UI archetypes, plus a fallback for anything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Button,
    Text,
    Image,
    Icon,
    Input,
    List,
    Card,
    Toolbar,
    Drawer,
    Background,
    Generic,
}

impl Style {
    /// Every style, in stylesheet order.
    pub const ALL: [Style; 11] = [
        Style::Button,
        Style::Text,
        Style::Image,
        Style::Icon,
        Style::Input,
        Style::List,
        Style::Card,
        Style::Toolbar,
        Style::Drawer,
        Style::Background,
        Style::Generic,
    ];

    /// Maps a component type onto the vocabulary; unknown types are
    /// [`Style::Generic`].
    pub fn for_type(kind: &str) -> Style {
        match normalize_type(kind).as_str() {
            "button" => Style::Button,
            "text" => Style::Text,
            "image" => Style::Image,
            "icon" => Style::Icon,
            "input" => Style::Input,
            "list" => Style::List,
            "card" => Style::Card,
            "toolbar" => Style::Toolbar,
            "drawer" => Style::Drawer,
            "background" => Style::Background,
            _ => Style::Generic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Style::Button => "button",
            Style::Text => "text",
            Style::Image => "image",
            Style::Icon => "icon",
            Style::Input => "input",
            Style::List => "list",
            Style::Card => "card",
            Style::Toolbar => "toolbar",
            Style::Drawer => "drawer",
            Style::Background => "background",
            Style::Generic => "generic",
        }
    }

    /// `(fill, border)` CSS colours.
    pub fn colors(self) -> (&'static str, &'static str) {
        match self {
            Style::Button => ("rgba(0, 123, 255, 0.3)", "rgba(0, 123, 255, 0.8)"),
            Style::Text => ("rgba(255, 255, 255, 0.5)", "rgba(100, 100, 100, 0.8)"),
            Style::Image => ("rgba(255, 192, 203, 0.3)", "rgba(255, 20, 147, 0.8)"),
            Style::Icon => ("rgba(255, 165, 0, 0.3)", "rgba(255, 140, 0, 0.8)"),
            Style::Input => ("rgba(144, 238, 144, 0.3)", "rgba(0, 128, 0, 0.8)"),
            Style::List => ("rgba(138, 43, 226, 0.3)", "rgba(138, 43, 226, 0.8)"),
            Style::Card => ("rgba(255, 20, 147, 0.3)", "rgba(199, 21, 133, 0.8)"),
            Style::Toolbar => ("rgba(70, 130, 180, 0.3)", "rgba(70, 130, 180, 0.8)"),
            Style::Drawer => ("rgba(128, 128, 128, 0.3)", "rgba(64, 64, 64, 0.8)"),
            Style::Background => ("rgba(240, 240, 240, 0.3)", "rgba(200, 200, 200, 0.8)"),
            Style::Generic => ("rgba(200, 200, 200, 0.3)", "rgba(255, 0, 0, 0.5)"),
        }
    }
}

/// Lowercases and replaces whitespace with underscores.
pub(crate) fn normalize_type(kind: &str) -> String {
    kind.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_are_case_insensitive() {
        assert_eq!(Style::for_type("Button"), Style::Button);
        assert_eq!(Style::for_type(" toolbar "), Style::Toolbar);
    }

    #[test]
    fn unknown_types_fall_back_to_generic() {
        assert_eq!(Style::for_type("class_17"), Style::Generic);
        assert_eq!(Style::for_type(""), Style::Generic);
        assert_eq!(Style::for_type("radio button"), Style::Generic);
    }

    #[test]
    fn vocabulary_round_trips_through_names() {
        for style in Style::ALL {
            assert_eq!(Style::for_type(style.as_str()), style);
        }
    }
}
