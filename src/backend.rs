//! Window property queries.
//!
//! `PropertySource` abstracts a single display-server connection. `WindowQuery`
//! runs the focused-window lookups (active window, title, class) on top of any
//! source, so the lookup order and error rules live in one place.

mod x11;

pub use x11::X11Source;

use thiserror::Error;
use tracing::debug;
use x11rb::errors::ConnectionError;
use x11rb::errors::ReplyError;
use x11rb::protocol::xproto::Atom;

use crate::config::ReadStrategy;
use crate::domain::WindowId;
use crate::domain::WindowInfo;
use crate::domain::WmClass;

/// Length of a single property read, in 32-bit units.
pub const PROPERTY_READ_UNITS: u32 = 64;

/// A property name paired with the type it is requested as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySpec {
    pub property: &'static str,
    pub kind: &'static str,
}

impl PropertySpec {
    pub const fn new(property: &'static str, kind: &'static str) -> Self {
        Self { property, kind }
    }
}

/// Title properties, tried in order until one is non-empty.
pub const NAME_PROPERTIES: [PropertySpec; 3] = [
    PropertySpec::new("_NET_WM_NAME", "UTF8_STRING"),
    PropertySpec::new("WM_NAME", "UTF8_STRING"),
    PropertySpec::new("WM_NAME", "STRING"),
];

const ACTIVE_WINDOW: PropertySpec = PropertySpec::new("_NET_ACTIVE_WINDOW", "WINDOW");
const WM_CLASS: PropertySpec = PropertySpec::new("WM_CLASS", "STRING");

/// Raw property value copied out of a server reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyReply {
    /// Item width in bits (0 when the property does not exist).
    pub format: u8,

    /// Bytes left on the server past the end of `value`.
    pub bytes_after: u32,

    pub value: Vec<u8>,
}

impl PropertyReply {
    /// Returns true if the server holds more data than was read.
    pub fn is_truncated(&self) -> bool {
        self.bytes_after > 0
    }

    /// Returns true if the window has no such property.
    pub fn is_absent(&self) -> bool {
        self.format == 0
    }
}

/// Trait for display-server connections that can answer property requests.
pub trait PropertySource {
    /// Root window of the screen in use.
    fn root_window(&self) -> WindowId;

    /// Intern `name` and return its atom.
    fn intern_atom(&self, name: &str) -> Result<Atom, RequestError>;

    /// Issue one `GetProperty` request. Offset and length are in 32-bit units.
    fn get_property(
        &self,
        window: WindowId,
        property: Atom,
        kind: Atom,
        long_offset: u32,
        long_length: u32,
    ) -> Result<PropertyReply, RequestError>;
}

/// A request that got no usable reply.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct RequestError(pub String);

impl From<ConnectionError> for RequestError {
    fn from(e: ConnectionError) -> Self {
        Self(e.to_string())
    }
}

impl From<ReplyError> for RequestError {
    fn from(e: ReplyError) -> Self {
        Self(e.to_string())
    }
}

/// Errors that can occur while querying the focused window.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("cannot connect to X server: {0}")]
    Connection(String),

    #[error("cannot get screen")]
    Screen,

    #[error("cannot get {name} atom")]
    Atom {
        name: String,
        #[source]
        source: RequestError,
    },

    #[error("cannot get {property} property atom")]
    PropertyAtom {
        property: String,
        #[source]
        source: Box<QueryError>,
    },

    #[error("cannot get {kind} type atom")]
    TypeAtom {
        kind: String,
        #[source]
        source: Box<QueryError>,
    },

    #[error("cannot get {property} property: {reason}")]
    Property { property: String, reason: String },

    #[error("cannot find class")]
    ClassNotFound(#[source] Box<QueryError>),

    #[error("cannot parse class: {raw}")]
    ClassParse { raw: String },
}

/// Focused-window lookups over a `PropertySource`.
pub struct WindowQuery<'a, S: ?Sized> {
    source: &'a S,
    name_properties: &'a [PropertySpec],
    strategy: ReadStrategy,
}

impl<'a, S: PropertySource + ?Sized> WindowQuery<'a, S> {
    /// Create a query using the standard title properties.
    pub fn new(source: &'a S, strategy: ReadStrategy) -> Self {
        Self {
            source,
            name_properties: &NAME_PROPERTIES,
            strategy,
        }
    }

    /// Replace the ordered list of title properties.
    #[must_use]
    pub fn with_name_properties(mut self, name_properties: &'a [PropertySpec]) -> Self {
        self.name_properties = name_properties;
        self
    }

    /// Resolve everything reported about the focused window.
    pub fn focused_window_info(&self) -> Result<WindowInfo, QueryError> {
        let id = self.focused_window()?;
        let name = self.window_name(id)?;
        let wm_class = self.window_class(id)?;

        Ok(WindowInfo::new(id, name, wm_class))
    }

    /// Map an atom name to its server id.
    pub fn resolve_atom(&self, name: &str) -> Result<Atom, QueryError> {
        self.source
            .intern_atom(name)
            .map_err(|source| QueryError::Atom {
                name: name.to_string(),
                source,
            })
    }

    /// Read `spec` from `window`, following the configured read strategy.
    pub fn fetch_property(
        &self,
        window: WindowId,
        spec: PropertySpec,
    ) -> Result<PropertyReply, QueryError> {
        let property_atom = self
            .resolve_atom(spec.property)
            .map_err(|e| QueryError::PropertyAtom {
                property: spec.property.to_string(),
                source: Box::new(e),
            })?;
        let kind_atom = self
            .resolve_atom(spec.kind)
            .map_err(|e| QueryError::TypeAtom {
                kind: spec.kind.to_string(),
                source: Box::new(e),
            })?;

        let mut reply = self.read_chunk(window, spec, property_atom, kind_atom, 0)?;

        match self.strategy {
            ReadStrategy::Truncate => {
                if reply.is_truncated() {
                    debug!(
                        property = spec.property,
                        bytes_after = reply.bytes_after,
                        "Property value truncated by read cap"
                    );
                }
            }
            ReadStrategy::Full => {
                let mut offset = 0;
                while reply.is_truncated() {
                    offset += PROPERTY_READ_UNITS;
                    let chunk = self.read_chunk(window, spec, property_atom, kind_atom, offset)?;
                    if chunk.value.is_empty() {
                        break;
                    }
                    reply.value.extend_from_slice(&chunk.value);
                    reply.bytes_after = chunk.bytes_after;
                }
            }
        }

        Ok(reply)
    }

    /// Read `_NET_ACTIVE_WINDOW` from the root window.
    pub fn focused_window(&self) -> Result<WindowId, QueryError> {
        let reply = self.fetch_property(self.source.root_window(), ACTIVE_WINDOW)?;

        let Some(bytes) = reply.value.first_chunk::<4>() else {
            return Err(QueryError::Property {
                property: ACTIVE_WINDOW.property.to_string(),
                reason: "reply holds no window".to_string(),
            });
        };

        let window = WindowId::new(u32::from_ne_bytes(*bytes));
        debug!("Focused window: {}", window);
        Ok(window)
    }

    /// Resolve the window title.
    ///
    /// An empty value falls through to the next property; a failed request
    /// aborts. Returns an empty title if every property is empty. The bytes
    /// are returned as stored, since `STRING` values are Latin-1.
    pub fn window_name(&self, window: WindowId) -> Result<Vec<u8>, QueryError> {
        for spec in self.name_properties {
            let name = self.fetch_property(window, *spec)?.value;
            if !name.is_empty() {
                return Ok(name);
            }
            debug!("{}/{} is empty", spec.property, spec.kind);
        }

        Ok(Vec::new())
    }

    /// Resolve `WM_CLASS` into instance and class.
    pub fn window_class(&self, window: WindowId) -> Result<WmClass, QueryError> {
        let raw = self
            .fetch_property(window, WM_CLASS)
            .map_err(|e| QueryError::ClassNotFound(Box::new(e)))?
            .value;

        WmClass::parse(&raw)
    }

    fn read_chunk(
        &self,
        window: WindowId,
        spec: PropertySpec,
        property_atom: Atom,
        kind_atom: Atom,
        long_offset: u32,
    ) -> Result<PropertyReply, QueryError> {
        debug!(
            window = window.get(),
            property = spec.property,
            kind = spec.kind,
            long_offset,
            "GetProperty"
        );

        let reply = self
            .source
            .get_property(
                window,
                property_atom,
                kind_atom,
                long_offset,
                PROPERTY_READ_UNITS,
            )
            .map_err(|e| QueryError::Property {
                property: spec.property.to_string(),
                reason: e.to_string(),
            })?;

        if reply.is_absent() {
            debug!("{} is not set on window {}", spec.property, window);
        }

        Ok(reply)
    }
}
