//! Payloads returned by the credential-issuance service and persisted in the
//! credential slots.
//!
//! Field names on the wire follow the issuance API (camelCase, JSON-LD keys for
//! the verifiable credential).

use serde::{Deserialize, Serialize};

use crate::config::AlgorandNetwork;

/// Kind of government document the identity was verified with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "snake_case")]
pub enum IdType {
    /// Driver's license.
    DriversLicense,
    /// Passport.
    Passport,
    /// Any other government-issued ID card.
    GovernmentId,
}

/// Confidence tier reported by the verification provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    /// High confidence.
    High,
    /// Medium confidence.
    Medium,
    /// Low confidence.
    Low,
}

/// Identity fields extracted from the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct PersonalData {
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
    pub state: String,
}

/// Reference to the credential issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct IssuerRef {
    /// Issuer DID.
    pub id: String,
}

/// Hashed identity claims bound to the holder's wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct CredentialSubject {
    /// Subject DID.
    pub id: String,
    /// Hash of the document number.
    #[serde(rename = "cardlessid:governmentIdHash")]
    pub government_id_hash: String,
    /// Hash of the given name.
    #[serde(rename = "cardlessid:firstNameHash")]
    pub first_name_hash: String,
    /// Hash of the middle name.
    #[serde(rename = "cardlessid:middleNameHash")]
    pub middle_name_hash: String,
    /// Hash of the family name.
    #[serde(rename = "cardlessid:lastNameHash")]
    pub last_name_hash: String,
    /// Hash of the date of birth.
    #[serde(rename = "cardlessid:birthDateHash")]
    pub birth_date_hash: String,
    /// Hash over all identity fields.
    #[serde(rename = "cardlessid:compositeHash")]
    pub composite_hash: String,
    /// Document kind.
    #[serde(rename = "cardlessid:idType")]
    pub id_type: IdType,
    /// Issuing US state code.
    #[serde(rename = "cardlessid:state")]
    pub state: String,
}

/// One fraud check signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct FraudSignal {
    /// Signal kind.
    #[serde(rename = "type")]
    pub signal_type: String,
    /// Outcome reported by the provider.
    pub result: String,
}

/// Fraud detection evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct FraudDetection {
    /// Whether the check ran.
    pub performed: bool,
    /// Whether it passed.
    pub passed: bool,
    /// Detection method.
    pub method: String,
    /// Provider name.
    pub provider: String,
    /// Individual signals.
    pub signals: Vec<FraudSignal>,
}

/// Document analysis evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysis {
    /// Provider name.
    pub provider: String,
    /// Whether front and back were analyzed.
    pub both_sides_analyzed: bool,
    /// Fields extracted with low confidence.
    pub low_confidence_fields: Vec<String>,
    /// Overall quality tier.
    pub quality_level: QualityLevel,
}

/// A provider confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct ConfidenceScore {
    /// Score in `[0, 1]`.
    pub confidence: f64,
    /// Provider name.
    pub provider: String,
}

/// Selfie-to-document biometric evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct BiometricVerification {
    /// Whether the check ran.
    pub performed: bool,
    /// Face match score.
    pub face_match: ConfidenceScore,
    /// Liveness score.
    pub liveness: ConfidenceScore,
}

/// Verification evidence attached to the credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// Evidence types.
    #[serde(rename = "type")]
    pub evidence_type: Vec<String>,
    /// Verifier identifier.
    pub verifier: String,
    /// Document used as evidence.
    pub evidence_document: String,
    /// How the subject was present.
    pub subject_presence: String,
    /// How the document was present.
    pub document_presence: String,
    /// Verification method.
    pub verification_method: String,
    /// Fraud detection results.
    pub fraud_detection: FraudDetection,
    /// Document analysis results.
    pub document_analysis: DocumentAnalysis,
    /// Biometric results.
    pub biometric_verification: BiometricVerification,
}

/// Service endpoint linking the credential to the issuing code revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoint {
    /// Fragment id, e.g. `#system-attestation`.
    pub id: String,
    /// Endpoint type.
    #[serde(rename = "type")]
    pub service_type: String,
    /// Endpoint URL.
    pub service_endpoint: String,
}

/// Issuer proof over the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct CredentialProof {
    /// Proof suite.
    #[serde(rename = "type")]
    pub proof_type: String,
    /// Creation time.
    pub created: String,
    /// Verification method reference.
    pub verification_method: String,
    /// Proof purpose.
    pub proof_purpose: String,
    /// Encoded proof.
    pub proof_value: String,
}

/// W3C-style verifiable credential issued by the verification service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    /// JSON-LD contexts.
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    /// Credential id.
    pub id: String,
    /// Credential types.
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,
    /// Issuer.
    pub issuer: IssuerRef,
    /// Issuance time.
    pub issuance_date: String,
    /// Claims.
    pub credential_subject: CredentialSubject,
    /// Verification evidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Vec<Evidence>>,
    /// Audit links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<Vec<ServiceEndpoint>>,
    /// Issuer proof.
    pub proof: CredentialProof,
}

/// Summary of verification quality and fraud metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct VerificationQuality {
    /// Overall tier.
    pub level: QualityLevel,
    /// Whether fraud checks passed.
    pub fraud_check_passed: bool,
    /// How fields were extracted.
    pub extraction_method: String,
    /// Whether both sides were processed.
    pub both_sides_processed: bool,
    /// Fields extracted with low confidence.
    pub low_confidence_fields: Vec<String>,
    /// Fraud signals.
    pub fraud_signals: Vec<FraudSignal>,
    /// Face match score.
    pub face_match_confidence: f64,
    /// Liveness score.
    pub liveness_confidence: f64,
}

/// Human-readable steps for claiming the credential NFT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct NftInstructions {
    /// First step.
    pub step1: String,
    /// Second step.
    pub step2: String,
    /// Third step.
    pub step3: String,
}

/// State of the credential NFT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct NftInfo {
    /// Algorand asset id. Sent as a string because it may exceed 2^53.
    pub asset_id: String,
    /// Whether the wallet still has to opt in before the transfer.
    pub requires_opt_in: bool,
    /// Claim instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<NftInstructions>,
}

/// Reference to an on-chain transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainTransaction {
    /// Transaction id.
    pub id: String,
    /// Block explorer link.
    pub explorer_url: String,
    /// Transaction note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Blockchain receipt for the issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct BlockchainInfo {
    /// Issuance transaction.
    pub transaction: BlockchainTransaction,
    /// Network the transaction landed on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<AlgorandNetwork>,
}

/// Result of the issuer's duplicate-identity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateDetection {
    /// Number of earlier credentials for the same identity.
    pub duplicate_count: u32,
    /// Whether the identity was already issued a credential.
    pub is_duplicate: bool,
    /// Issuer message.
    pub message: String,
}

/// Everything the issuance service returns; the shape persisted by
/// [`CredentialStore::save_credential`](crate::CredentialStore::save_credential).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct CredentialResponse {
    /// The verifiable credential.
    pub credential: VerifiableCredential,
    /// Extracted identity fields.
    pub personal_data: PersonalData,
    /// Quality and fraud metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_quality: Option<VerificationQuality>,
    /// Credential NFT state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nft: Option<NftInfo>,
    /// Issuance transaction receipt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain: Option<BlockchainInfo>,
    /// Duplicate check result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_detection: Option<DuplicateDetection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE_JSON: &str = r##"{
        "credential": {
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "id": "urn:uuid:1234",
            "type": ["VerifiableCredential", "BirthDateCredential"],
            "issuer": {"id": "did:algo:ISSUER"},
            "issuanceDate": "2025-01-01T00:00:00Z",
            "credentialSubject": {
                "id": "did:algo:HOLDER",
                "cardlessid:governmentIdHash": "h1",
                "cardlessid:firstNameHash": "h2",
                "cardlessid:middleNameHash": "h3",
                "cardlessid:lastNameHash": "h4",
                "cardlessid:birthDateHash": "h5",
                "cardlessid:compositeHash": "h6",
                "cardlessid:idType": "drivers_license",
                "cardlessid:state": "CA"
            },
            "service": [{"id": "#system-attestation", "type": "ZkProofSystemVersion", "serviceEndpoint": "https://example.com/commit"}],
            "proof": {
                "type": "Ed25519Signature2020",
                "created": "2025-01-01T00:00:00Z",
                "verificationMethod": "did:algo:ISSUER#key-1",
                "proofPurpose": "assertionMethod",
                "proofValue": "z3sig"
            }
        },
        "personalData": {
            "firstName": "Ada",
            "lastName": "Lovelace",
            "birthDate": "1990-12-10",
            "governmentId": "D1234567",
            "idType": "drivers_license",
            "state": "CA"
        },
        "nft": {"assetId": "123456789", "requiresOptIn": true},
        "blockchain": {"transaction": {"id": "TX1", "explorerUrl": "https://explorer/tx/TX1"}, "network": "testnet"},
        "duplicateDetection": {"duplicateCount": 0, "isDuplicate": false, "message": "none"}
    }"##;

    #[test]
    fn test_parses_issuance_response() {
        let response: CredentialResponse =
            serde_json::from_str(RESPONSE_JSON).expect("parse response");
        assert_eq!(response.credential.credential_subject.state, "CA");
        assert_eq!(
            response.credential.credential_subject.id_type,
            IdType::DriversLicense
        );
        assert_eq!(response.personal_data.middle_name, None);
        assert_eq!(response.nft.as_ref().map(|nft| nft.asset_id.as_str()), Some("123456789"));
        assert_eq!(
            response.blockchain.as_ref().and_then(|b| b.network),
            Some(AlgorandNetwork::Testnet)
        );
        assert!(response.verification_quality.is_none());
    }

    #[test]
    fn test_serializes_wire_names() {
        let response: CredentialResponse =
            serde_json::from_str(RESPONSE_JSON).expect("parse response");
        let value = serde_json::to_value(&response.credential).expect("to value");
        assert!(value.get("@context").is_some());
        assert!(value["credentialSubject"]
            .get("cardlessid:compositeHash")
            .is_some());
        assert!(value.get("evidence").is_none());
    }
}
