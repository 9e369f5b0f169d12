//! X11 property source over an x11rb `RustConnection`.
//!
//! Connects to the display named by `$DISPLAY` and answers atom and property
//! requests synchronously. The connection is closed when the source is dropped.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::debug;
use tracing::trace;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::Atom;
use x11rb::protocol::xproto::ConnectionExt;
use x11rb::rust_connection::RustConnection;

use super::PropertyReply;
use super::PropertySource;
use super::QueryError;
use super::RequestError;
use crate::domain::WindowId;

/// X11 property source implementation.
pub struct X11Source {
    conn: RustConnection,
    root: WindowId,

    /// Interned atoms by name. Atom ids are stable for the connection.
    atoms: RefCell<HashMap<String, Atom>>,
}

impl X11Source {
    /// Connect to the default display and use its first screen.
    pub fn connect() -> Result<Self, QueryError> {
        let (conn, screen_num) =
            RustConnection::connect(None).map_err(|e| QueryError::Connection(e.to_string()))?;

        let root = first_root(conn.setup().roots.iter().map(|screen| screen.root))?;

        debug!("Connected to X server (default screen {}, root {})", screen_num, root);

        Ok(Self {
            conn,
            root,
            atoms: RefCell::new(HashMap::new()),
        })
    }
}

/// Root window of the first screen. The screen named in `$DISPLAY` is not
/// consulted.
fn first_root(roots: impl IntoIterator<Item = u32>) -> Result<WindowId, QueryError> {
    roots
        .into_iter()
        .next()
        .map(WindowId::new)
        .ok_or(QueryError::Screen)
}

impl PropertySource for X11Source {
    fn root_window(&self) -> WindowId {
        self.root
    }

    fn intern_atom(&self, name: &str) -> Result<Atom, RequestError> {
        if let Some(&atom) = self.atoms.borrow().get(name) {
            trace!("Atom cache hit: {} = {}", name, atom);
            return Ok(atom);
        }

        let atom = self.conn.intern_atom(false, name.as_bytes())?.reply()?.atom;
        trace!("Interned atom: {} = {}", name, atom);

        self.atoms.borrow_mut().insert(name.to_string(), atom);
        Ok(atom)
    }

    fn get_property(
        &self,
        window: WindowId,
        property: Atom,
        kind: Atom,
        long_offset: u32,
        long_length: u32,
    ) -> Result<PropertyReply, RequestError> {
        let reply = self
            .conn
            .get_property(false, window.get(), property, kind, long_offset, long_length)?
            .reply()?;

        Ok(PropertyReply {
            format: reply.format,
            bytes_after: reply.bytes_after,
            value: reply.value,
        })
    }
}

impl Drop for X11Source {
    fn drop(&mut self) {
        debug!("Disconnecting from X server");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_root_ignores_later_screens() {
        assert_eq!(first_root([0x1e3, 0x2a7]).unwrap(), WindowId::new(0x1e3));
    }

    #[test]
    fn test_first_root_no_screens() {
        assert!(matches!(first_root(Vec::<u32>::new()), Err(QueryError::Screen)));
    }
}
