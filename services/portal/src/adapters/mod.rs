pub mod db;
pub mod html;
pub mod sessions;

pub use db::DbAdapter;
pub use html::HtmlRenderer;
pub use sessions::{MemorySessionStore, PgSessionStore};
