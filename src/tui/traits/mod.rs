//! Input contracts for focusable panes
//!
//! The App routes keys in layers: modal, palette, global keys, then the
//! focused pane. Panes that own their key handling implement
//! [`Interactive`] and report whether they consumed the key.

mod interactive;

pub use interactive::{Handled, Interactive};
