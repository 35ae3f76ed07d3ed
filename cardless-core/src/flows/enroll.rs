//! First-run enrollment: wallet, credential issuance and local persistence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CardlessError;
use crate::storage::{DocumentType, SecureStores};
use crate::types::{CredentialResponse, IdType};

/// Verified identity fields submitted for issuance.
///
/// The wallet address is supplied separately by [`enroll`] once the wallet
/// exists.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceRequest {
    /// Token returned by the document verification step.
    pub verification_token: String,
    /// Given name.
    pub first_name: String,
    /// Middle name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    /// Family name.
    pub last_name: String,
    /// ISO-8601 date of birth.
    pub birth_date: String,
    /// Document number.
    pub government_id: String,
    /// Document kind.
    pub id_type: IdType,
    /// Issuing US state code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Document expiry date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}

impl std::fmt::Debug for IssuanceRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuanceRequest")
            .field("id_type", &self.id_type)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Remote credential-issuance service.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    /// Issues a credential bound to `wallet_address`.
    ///
    /// # Errors
    ///
    /// Implementations return [`CardlessError::Issuance`] when the service
    /// rejects the request or cannot be reached.
    async fn issue(
        &self,
        request: &IssuanceRequest,
        wallet_address: &str,
    ) -> Result<CredentialResponse, CardlessError>;
}

/// Result of a completed enrollment.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment {
    /// Address the credential was issued to.
    pub wallet_address: String,
    /// The stored issuance response.
    pub response: CredentialResponse,
}

/// Runs enrollment end to end.
///
/// 1. Ensures a wallet exists and takes its address.
/// 2. Requests a credential for that address.
/// 3. Saves the response in the credential store.
/// 4. Stores the document number under [`DocumentType::Passport`] for
///    passports and [`DocumentType::GovernmentId`] otherwise.
///
/// # Errors
///
/// Returns the first failing step's error. A credential that was saved stays
/// saved if the document number cannot be stored afterwards.
pub async fn enroll(
    stores: &SecureStores,
    issuer: &dyn CredentialIssuer,
    request: &IssuanceRequest,
) -> Result<Enrollment, CardlessError> {
    let wallet_address = stores.wallet().initialize_wallet().await?;

    let response = issuer.issue(request, &wallet_address).await?;
    stores.credentials().save_credential(response.clone()).await?;

    let document_type = match request.id_type {
        IdType::Passport => DocumentType::Passport,
        IdType::DriversLicense | IdType::GovernmentId => DocumentType::GovernmentId,
    };
    stores
        .documents()
        .store_document_id(document_type, request.government_id.clone())
        .await?;

    log::info!("enrolled credential for wallet {wallet_address}");
    Ok(Enrollment {
        wallet_address,
        response,
    })
}
