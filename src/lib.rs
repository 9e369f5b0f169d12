//! x11wininfo - report the focused X11 window.
//!
//! Reads `_NET_ACTIVE_WINDOW` from the root window, then the title and
//! `WM_CLASS` of the window it names, and renders them as text or JSON.

pub mod backend;
pub mod config;
pub mod domain;
pub mod output;
