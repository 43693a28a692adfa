//! # credlog-protocol: Credential Session Shapes
//!
//! The data a credential-protocol engine hands over when a session
//! completes, and the pure functions that turn it back into something a
//! holder can read:
//!
//! - **Requests** (`request.rs`): disclosure, signature and issuance
//!   requests, and the [`SessionRequest`] union selected by [`Action`].
//!
//! - **Proofs** (`proof.rs`): disclosure proofs (`ProofD`), issuance
//!   commitments (`ProofU`), and the messages that carry them.
//!
//! - **Registry** (`registry.rs`): the [`DescriptorRegistry`] trait through
//!   which scheme descriptions are consulted, plus [`InMemoryRegistry`].
//!
//! - **Derived data** (`disclosed.rs`, `credential_info.rs`,
//!   `signed_message.rs`): revealed attributes, issued credential
//!   descriptions, and standalone signed-message artifacts.
//!
//! - **Session initiation** (`session_info.rs`): the first protocol
//!   messages, including the list-of-pairs key map legacy peers send.
//!
//! ## Crate Policy
//!
//! - Depends only on `credlog-core` internally.
//! - No proof verification math: proofs are carried and inspected
//!   structurally, never checked cryptographically.

pub mod action;
pub mod credential_info;
pub mod disclosed;
pub mod error;
pub mod proof;
pub mod registry;
pub mod request;
pub mod session_info;
pub mod signed_message;
pub mod version;

pub use action::{Action, Status};
pub use credential_info::{CredentialInfo, IssuedAttribute, DEFAULT_VALIDITY_MONTHS};
pub use disclosed::{AttributeProofStatus, DisclosedAttribute};
pub use error::ProtocolError;
pub use proof::{Disclosure, IssueCommitmentMessage, MetadataAttribute, Proof, ProofD, ProofU};
pub use registry::{
    AttributeDescriptor, CredentialTypeDescriptor, DescriptorRegistry, InMemoryRegistry,
    IssuerDescriptor,
};
pub use request::{
    AttributeDisjunction, BaseRequest, CredentialRequest, DisclosureRequest, ExternalTimestamp,
    IssuanceRequest, SessionRequest, SignatureRequest,
};
pub use session_info::{Qr, SessionInfo};
pub use signed_message::{SignedMessage, SIGNED_MESSAGE_LD_CONTEXT};
pub use version::ProtocolVersion;
