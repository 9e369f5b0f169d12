//! Domain types for focused-window reports.

use std::fmt;

use serde::Serialize;
use serde::Serializer;

use crate::backend::QueryError;

/// Server-assigned X11 window identifier (newtype for type safety).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(u32);

impl WindowId {
    /// Create a new window id.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw protocol value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for WindowId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serialized as a decimal string, e.g. `"12345"`.
impl Serialize for WindowId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Instance and class names from `WM_CLASS`, as stored (Latin-1 by ICCCM).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmClass {
    pub instance: Vec<u8>,
    pub class: Vec<u8>,
}

impl WmClass {
    /// Parse a raw `WM_CLASS` value.
    ///
    /// The value is `instance\0class\0`, so splitting on NUL must give
    /// exactly three segments.
    pub fn parse(raw: &[u8]) -> Result<Self, QueryError> {
        let parts: Vec<&[u8]> = raw.split(|&b| b == 0).collect();
        match parts.as_slice() {
            [instance, class, _] => Ok(Self {
                instance: instance.to_vec(),
                class: class.to_vec(),
            }),
            _ => Err(QueryError::ClassParse {
                raw: String::from_utf8_lossy(raw).into_owned(),
            }),
        }
    }
}

/// Everything reported about the focused window.
///
/// Text fields keep the property bytes unchanged; decoding is left to the
/// output mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub id: WindowId,

    /// Window title; empty when no title property is set.
    pub name: Vec<u8>,

    pub instance: Vec<u8>,
    pub class: Vec<u8>,
}

impl WindowInfo {
    /// Assemble a report from its resolved parts.
    pub fn new(id: WindowId, name: Vec<u8>, wm_class: WmClass) -> Self {
        Self {
            id,
            name,
            instance: wm_class.instance,
            class: wm_class.class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wm_class() {
        let wm_class = WmClass::parse(b"urxvt\0URxvt\0").unwrap();
        assert_eq!(wm_class.instance, b"urxvt");
        assert_eq!(wm_class.class, b"URxvt");
    }

    #[test]
    fn test_parse_wm_class_empty_segments() {
        let wm_class = WmClass::parse(b"\0\0").unwrap();
        assert!(wm_class.instance.is_empty());
        assert!(wm_class.class.is_empty());
    }

    #[test]
    fn test_parse_wm_class_latin1() {
        let wm_class = WmClass::parse(b"caf\xe9\0Caf\xe9\0").unwrap();
        assert_eq!(wm_class.instance, b"caf\xe9");
        assert_eq!(wm_class.class, b"Caf\xe9");
    }

    #[test]
    fn test_parse_wm_class_wrong_segment_count() {
        for raw in ["", "urxvt", "urxvt\0", "a\0b\0c\0", "a\0b\0\0\0"] {
            match WmClass::parse(raw.as_bytes()) {
                Err(QueryError::ClassParse { raw: got }) => assert_eq!(got, raw),
                other => panic!("Expected ClassParse for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_wm_class_without_trailing_nul() {
        // Only the segment count is checked.
        let wm_class = WmClass::parse(b"a\0b\0c").unwrap();
        assert_eq!(wm_class.instance, b"a");
        assert_eq!(wm_class.class, b"b");
    }

    #[test]
    fn test_window_id_display() {
        assert_eq!(WindowId::new(12345).to_string(), "12345");
        assert_eq!(WindowId::from(0).get(), 0);
    }

    #[test]
    fn test_window_id_serializes_as_string() {
        assert_eq!(serde_json::to_string(&WindowId::new(42)).unwrap(), r#""42""#);
    }
}
