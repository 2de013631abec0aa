//! Session tokens and where they are kept.
//!
//! The [`Client`](crate::Client) never owns tokens directly: it reads and
//! writes them through an injected [`TokenStore`], so the same client works
//! with an in-process store, a credentials file, or an application keyring.

mod storage;
mod tokens;

pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use tokens::AuthTokens;
