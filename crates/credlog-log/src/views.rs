//! # Derived Views
//!
//! What a holder wants to see about a past session, recomputed from the
//! stored record and the scheme descriptions: which attributes went out,
//! which credentials came in, and what was signed.
//!
//! Each view applies to some kinds only. On any other kind it is empty
//! (`Vec::new()` or `None`), not an error.

use std::borrow::Cow;
use std::sync::Arc;

use credlog_protocol::{
    CredentialInfo, DescriptorRegistry, DisclosedAttribute, Disclosure, SessionRequest,
    SignedMessage,
};

use crate::error::LogError;
use crate::kind::LogKind;
use crate::payload::LogPayload;
use crate::record::LogRecord;

impl LogRecord {
    /// The attributes disclosed in this session, in proof order.
    ///
    /// Issuance sessions report the attributes disclosed as a condition of
    /// issuance. Removals report none.
    pub fn disclosed_attributes(
        &self,
        registry: &dyn DescriptorRegistry,
    ) -> Result<Vec<DisclosedAttribute>, LogError> {
        let disclosure: Cow<'_, Disclosure> = match self.payload() {
            LogPayload::Removal(_) => return Ok(Vec::new()),
            LogPayload::Disclosing(disclosure) | LogPayload::Signing { disclosure, .. } => {
                Cow::Borrowed(disclosure)
            }
            LogPayload::Issuing(commitment) => Cow::Owned(commitment.disclosure()),
        };
        let request = self.require_request()?;
        let (_, attributes) = disclosure.disclosed_attributes(registry, request.to_disclose())?;
        Ok(attributes)
    }

    /// The credentials issued in this session, in request order. Empty for
    /// every kind but `Issuing`.
    pub fn issued_credentials(
        &self,
        registry: &dyn DescriptorRegistry,
    ) -> Result<Vec<CredentialInfo>, LogError> {
        if self.kind() != LogKind::Issuing {
            return Ok(Vec::new());
        }
        let request = self.require_request()?;
        let issuance = request.as_issuance().ok_or_else(|| {
            LogError::InvariantViolation("issuing record without issuance request".into())
        })?;
        let credentials =
            issuance.credential_info_list(registry, self.protocol_version(), self.completed_at())?;
        Ok(credentials)
    }

    /// The signed message produced by this session. `None` for every kind
    /// but `Signing`.
    pub fn signed_message(&self) -> Result<Option<SignedMessage>, LogError> {
        let LogPayload::Signing {
            message,
            timestamp,
            ld_context,
            disclosure,
        } = self.payload()
        else {
            return Ok(None);
        };
        let request = self.require_request()?;
        let signature = request.as_signature().ok_or_else(|| {
            LogError::InvariantViolation("signing record without signature request".into())
        })?;
        let message = String::from_utf8(message.clone())
            .map_err(|e| LogError::MalformedRecord(format!("signed message is not UTF-8: {e}")))?;

        Ok(Some(SignedMessage {
            ld_context: ld_context.clone(),
            signature: disclosure.proofs.clone(),
            nonce: signature.disclosure.base.nonce.clone(),
            context: signature.disclosure.base.context.clone(),
            message,
            timestamp: timestamp.clone(),
        }))
    }

    fn require_request(&self) -> Result<Arc<SessionRequest>, LogError> {
        self.session_request()?.ok_or_else(|| {
            LogError::InvariantViolation(format!("{} record has no session request", self.kind()))
        })
    }
}
