//! Host page surface and embedding strategies.
//!
//! The host page is a trait ([`HostPage`]) so the render pass can target any host that
//! can show notices, raw HTML or an external URL in a sandboxed frame. [`HtmlPage`]
//! renders a standalone HTML document.

mod embed;
mod error;
mod page;

pub use embed::{embed, load_entry_markup, EmbedSource};
pub use error::EmbedError;
pub use page::{Block, HostPage, HtmlPage, NoticeKind};
