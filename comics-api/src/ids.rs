//! Type-safe identifiers using the TypeID specification
//!
//! Identifiers combine a short prefix with a base32-encoded UUIDv7, so they are
//! readable in logs, time-sortable, and cannot be confused across entity types:
//!
//! ```rust
//! use comics_api::ids::{ComicId, RequestId};
//!
//! let request_id = RequestId::new();
//! assert!(request_id.as_str().starts_with("req_"));
//!
//! let comic_id = ComicId::new();
//! assert!(comic_id.as_str().starts_with("comic_"));
//! ```

use http::Request;
use mti::prelude::*;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};

/// Error returned when parsing a typed identifier fails
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    #[error("failed to parse identifier: {0}")]
    Parse(#[from] MagicTypeIdError),

    #[error("invalid prefix: expected '{expected}', got '{actual}'")]
    InvalidPrefix { expected: String, actual: String },
}

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(MagicTypeId);

        impl $name {
            /// The TypeID prefix for this identifier
            pub const PREFIX: &'static str = $prefix;

            /// Creates a new identifier backed by a UUIDv7.
            #[must_use]
            pub fn new() -> Self {
                Self(Self::PREFIX.create_type_id::<V7>())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            #[must_use]
            pub fn prefix(&self) -> &str {
                self.0.prefix().as_str()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let mti = MagicTypeId::from_str(s)?;

                if mti.prefix().as_str() != Self::PREFIX {
                    return Err(IdError::InvalidPrefix {
                        expected: Self::PREFIX.to_string(),
                        actual: mti.prefix().as_str().to_string(),
                    });
                }

                Ok(Self(mti))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

typed_id!(
    /// A request identifier for log correlation.
    ///
    /// Example format: `req_01h455vb4pex5vsknk084sn02q`
    RequestId,
    "req"
);

typed_id!(
    /// Store-assigned identifier of a comic. Immutable once assigned.
    ///
    /// Example format: `comic_01h455vb4pex5vsknk084sn02q`
    ComicId,
    "comic"
);

/// Generates a [`RequestId`] for every incoming request.
///
/// ```rust
/// use comics_api::ids::MakeTypedRequestId;
/// use tower_http::request_id::SetRequestIdLayer;
///
/// let layer = SetRequestIdLayer::x_request_id(MakeTypedRequestId);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let id = RequestId::new();
        let header_value = http::HeaderValue::from_str(id.as_str()).ok()?;
        Some(TowerRequestId::new(header_value))
    }
}
