//! Three-level help generated from the registry.
//!
//! | Arguments | Shows |
//! |-----------|-------|
//! | `-?` | every candidate group |
//! | `Group -?` | the visible actions of the group, one line per name |
//! | `Group Action -?` | the parameters of the widest overload |
//!
//! [`collect`] turns the registry into a [`HelpPage`] of plain rows;
//! [`render_lines`] applies the configured row layouts. Output depends only
//! on the registry, the store and the options, so rendering twice yields the
//! same lines.

mod data;
mod render;

pub use data::{collect, HelpPage, HelpRow, HelpSection, HelpTopic, Tier};
pub use render::{render, render_lines};
