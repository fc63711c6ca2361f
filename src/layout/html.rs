//! Static HTML preview of a layout document.

use std::fmt;
use std::fs;
use std::path::Path;

use super::style::{normalize_type, Style};
use super::LayoutDocument;
use crate::error::SeguiError;

/// Renders a self-contained HTML page with one absolutely positioned box
/// per component.
///
/// Output is a pure function of the document. Component types are escaped
/// before they reach markup, so any string is safe to render.
pub fn render_html(document: &LayoutDocument) -> String {
    HtmlPage(document).to_string()
}

struct HtmlPage<'a>(&'a LayoutDocument);

impl fmt::Display for HtmlPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let document = self.0;
        let (width, height) = (document.canvas_width, document.canvas_height);

        writeln!(f, "<!DOCTYPE html>\n<html lang=\"en\">\n<head>")?;
        writeln!(f, "    <meta charset=\"UTF-8\">")?;
        writeln!(
            f,
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(f, "    <title>UI Components</title>\n    <style>")?;
        write!(
            f,
            "        body {{\n            margin: 0;\n            padding: 0;\n            \
             font-family: Arial, sans-serif;\n            position: relative;\n            \
             width: {width}px;\n            height: {height}px;\n            overflow: hidden;\n        }}\n\n"
        )?;

        write!(
            f,
            "        .container {{\n            position: relative;\n            width: {width}px;\n            \
             height: {height}px;\n            "
        )?;
        match &document.background_reference {
            Some(reference) => write!(
                f,
                "background-image: url(\"{}\"); background-size: cover; background-position: center;",
                escape(reference)
            )?,
            None => f.write_str("background-color: #f0f0f0;")?,
        }
        write!(f, "\n        }}\n\n")?;

        let (fill, border) = Style::Generic.colors();
        write!(
            f,
            "        .component {{\n            position: absolute;\n            \
             border: 2px solid {border};\n            box-sizing: border-box;\n            \
             display: flex;\n            align-items: center;\n            justify-content: center;\n            \
             font-size: 12px;\n            color: #333;\n            background-color: {fill};\n        }}\n"
        )?;
        for style in Style::ALL.into_iter().filter(|s| *s != Style::Generic) {
            let (fill, border) = style.colors();
            write!(
                f,
                "\n        .{} {{\n            background-color: {fill};\n            border-color: {border};\n        }}\n",
                style.as_str()
            )?;
        }
        writeln!(f, "    </style>\n</head>\n<body>\n    <div class=\"container\">")?;

        for component in &document.components {
            let b = component.bbox;
            let kind = escape(&component.kind);
            write!(
                f,
                "        <div class=\"component {}\" style=\"left: {}px; top: {}px; width: {}px; height: {}px;\" \
                 title=\"{kind} ({}, {}, {}, {})\">\n            <span>{kind}</span>\n        </div>\n",
                escape(&normalize_type(&component.kind)),
                b.x,
                b.y,
                b.width,
                b.height,
                b.x,
                b.y,
                b.width,
                b.height,
            )?;
        }

        writeln!(f, "    </div>\n</body>\n</html>")
    }
}

/// Renders `document` and writes it to `path`, creating parent directories.
pub fn write_html(path: &Path, document: &LayoutDocument) -> Result<(), SeguiError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_html(document))?;
    Ok(())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
