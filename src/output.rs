//! Rendering of focused-window reports.

use std::borrow::Cow;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::{WindowId, WindowInfo};

/// Presentation mode selected with `-m`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Labelled lines: `id: ...`, `name: ...`, `instance: ...`, `class: ...`.
    #[default]
    Text,
    /// The same four values without labels.
    #[value(name = "mintext")]
    MinText,
    /// A single-line JSON object.
    Json,
}

impl OutputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::MinText => "mintext",
            Self::Json => "json",
        }
    }
}

/// JSON shape of a report. Text is decoded here, since JSON strings must be
/// UTF-8.
#[derive(Serialize)]
struct JsonReport<'a> {
    id: WindowId,
    name: Cow<'a, str>,
    instance: Cow<'a, str>,
    class: Cow<'a, str>,
}

impl<'a> From<&'a WindowInfo> for JsonReport<'a> {
    fn from(info: &'a WindowInfo) -> Self {
        Self {
            id: info.id,
            name: String::from_utf8_lossy(&info.name),
            instance: String::from_utf8_lossy(&info.instance),
            class: String::from_utf8_lossy(&info.class),
        }
    }
}

/// Render `info` in the given mode, including the trailing newline.
///
/// `text` and `mintext` copy property bytes through unchanged; `json`
/// replaces invalid UTF-8.
pub fn render(info: &WindowInfo, mode: OutputMode) -> Result<Vec<u8>, serde_json::Error> {
    let rendered = match mode {
        OutputMode::Text | OutputMode::MinText => {
            let id = info.id.to_string();
            let fields: [(&str, &[u8]); 4] = [
                ("id", id.as_bytes()),
                ("name", &info.name),
                ("instance", &info.instance),
                ("class", &info.class),
            ];

            let mut out = Vec::new();
            for (label, value) in fields {
                if mode == OutputMode::Text {
                    out.extend_from_slice(label.as_bytes());
                    out.extend_from_slice(b": ");
                }
                out.extend_from_slice(value);
                out.push(b'\n');
            }
            out
        }
        OutputMode::Json => {
            let mut json = serde_json::to_vec(&JsonReport::from(info))?;
            json.push(b'\n');
            json
        }
    };

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WmClass;

    fn terminal() -> WindowInfo {
        WindowInfo::new(
            WindowId::new(12345),
            b"Terminal".to_vec(),
            WmClass {
                instance: b"urxvt".to_vec(),
                class: b"URxvt".to_vec(),
            },
        )
    }

    #[test]
    fn test_render_text() {
        assert_eq!(
            render(&terminal(), OutputMode::Text).unwrap(),
            b"id: 12345\nname: Terminal\ninstance: urxvt\nclass: URxvt\n"
        );
    }

    #[test]
    fn test_render_mintext() {
        assert_eq!(
            render(&terminal(), OutputMode::MinText).unwrap(),
            b"12345\nTerminal\nurxvt\nURxvt\n"
        );
    }

    #[test]
    fn test_render_json() {
        assert_eq!(
            render(&terminal(), OutputMode::Json).unwrap(),
            b"{\"id\":\"12345\",\"name\":\"Terminal\",\"instance\":\"urxvt\",\"class\":\"URxvt\"}\n"
        );
    }

    #[test]
    fn test_render_empty_name() {
        let mut info = terminal();
        info.name.clear();
        assert_eq!(
            render(&info, OutputMode::Text).unwrap(),
            b"id: 12345\nname: \ninstance: urxvt\nclass: URxvt\n"
        );
    }

    #[test]
    fn test_render_latin1_title_verbatim() {
        let mut info = terminal();
        info.name = b"Caf\xe9".to_vec();

        assert_eq!(
            render(&info, OutputMode::Text).unwrap(),
            b"id: 12345\nname: Caf\xe9\ninstance: urxvt\nclass: URxvt\n"
        );
        assert_eq!(
            render(&info, OutputMode::MinText).unwrap(),
            b"12345\nCaf\xe9\nurxvt\nURxvt\n"
        );
    }

    #[test]
    fn test_render_json_replaces_invalid_utf8() {
        let mut info = terminal();
        info.name = b"Caf\xe9".to_vec();

        let rendered = render(&info, OutputMode::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&rendered).unwrap();
        assert_eq!(parsed["name"], "Caf\u{fffd}");
    }

    #[test]
    fn test_render_json_escapes() {
        let mut info = terminal();
        info.name = "say \"hi\"\tnow".as_bytes().to_vec();
        let rendered = String::from_utf8(render(&info, OutputMode::Json).unwrap()).unwrap();
        assert!(rendered.contains(r#""name":"say \"hi\"\tnow""#));

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["name"], "say \"hi\"\tnow");
        assert_eq!(parsed["id"], "12345");
    }

    #[test]
    fn test_mode_names() {
        for mode in [OutputMode::Text, OutputMode::MinText, OutputMode::Json] {
            let parsed = OutputMode::from_str(mode.as_str(), false).unwrap();
            assert_eq!(parsed, mode);
        }
        assert!(OutputMode::from_str("bogus", false).is_err());
    }
}
