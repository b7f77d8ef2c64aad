//! ion-sso — single sign-on client for the Aruba Instant On cloud.
//!
//! Implements the credential → session token → authorization code → bearer
//! token login (OAuth2 authorization code with PKCE) and the refresh-token
//! exchange.
//!
//! # Architecture
//!
//! ```text
//! SsoClient
//!   ├── settings()      → SsoSettings (configured or portal settings.json)
//!   ├── authenticate()  → session token
//!   ├── authorize()     → (code, code_verifier)
//!   ├── fetch_tokens()  → TokenSet
//!   └── refresh_token() → TokenSet
//! ```

pub mod client;
pub mod error;
pub mod pkce;

pub use client::{SsoClient, SsoConfig, SsoSettings, TokenSet};
pub use error::{SsoError, SsoResult};
