//! # credlog-core: Foundational Types
//!
//! Every other crate in the workspace depends on `credlog-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for scheme identifiers.** `SchemeManagerId`,
//!    `IssuerId`, `CredentialTypeId`, `AttributeTypeId` are validated at
//!    construction. A credential type can never be passed where an
//!    attribute type is expected.
//!
//! 2. **UTC-only timestamps.** `Timestamp` is UTC with seconds precision,
//!    so a stored log reads back to the same instant it was written with.
//!
//! 3. **`BigNumber` for protocol integers.** Nonces, contexts and proof
//!    values exceed 64 bits; they are kept as validated decimal strings and
//!    never routed through floating point.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `credlog-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod number;
pub mod temporal;
pub mod translated;

pub use error::CoreError;
pub use identity::{AttributeTypeId, CredentialTypeId, IssuerId, SchemeManagerId};
pub use number::BigNumber;
pub use temporal::Timestamp;
pub use translated::TranslatedString;
