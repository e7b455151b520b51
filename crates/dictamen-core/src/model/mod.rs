//! Modelos neutrales (Request, Fingerprint, CanonicalResult).

pub mod fingerprint;
pub mod request;
pub mod result;

pub use fingerprint::{Fingerprint, FingerprintInput};
pub use request::{Request, RequestContext};
pub use result::CanonicalResult;
