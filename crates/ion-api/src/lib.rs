//! ion-api — client for the Aruba Instant On REST API.
//!
//! [`ApiSession`] holds the bearer/refresh token pair and performs
//! authenticated GETs with a single reauthenticate-and-retry on failure.
//! [`model`] holds the typed entities the exporter reads.
//!
//! # Endpoints
//!
//! | Path | Elements |
//! |---|---|
//! | `/sites` | [`Site`] |
//! | `/sites/{id}/clientSummary` | [`ClientSummary`] |
//! | `/sites/{id}/inventory` | [`Device`] (with ports and radios) |

pub mod error;
pub mod model;
pub mod session;
pub mod source;

pub use error::{ApiError, ApiResult};
pub use reqwest::StatusCode;
pub use model::{ClientSummary, Device, EthernetPort, Radio, Site};
pub use session::{ApiConfig, ApiSession, Credentials};
pub use source::ElementSource;
