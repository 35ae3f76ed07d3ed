//! Common test utilities shared across integration tests.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared fixtures; each test binary uses a subset"
)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cardless_core::flows::{
    AssetOptIn, CredentialIssuer, IssuanceRequest, NftTransferApi, NftTransferReceipt,
    NftTransferTransactions, TransactionRef,
};
use cardless_core::storage::memory::{FixedClock, MemorySecureStore};
use cardless_core::storage::SecureEnvelope;
use cardless_core::{
    AlgorandNetwork, BlockchainInfo, BlockchainTransaction, CardlessError, CredentialResponse,
    IdType, NftInfo, PersonalData, SecureBlobStore, SecureStores, StorageError, StorageResult,
    StoreConfig, VerifiableCredential,
};

pub const CREDENTIAL_SERVICE: &str = "cardlessid.credentials.credential";
pub const PERSONAL_DATA_SERVICE: &str = "cardlessid.credentials.personal_data";
pub const NFT_SERVICE: &str = "cardlessid.credentials.nft";
pub const CREDENTIALS_KEY_SERVICE: &str = "cardlessid.credentials_signing_key";
pub const WALLET_ADDRESS_SERVICE: &str = "cardlessid.wallet.wallet_address";
pub const WALLET_MNEMONIC_SERVICE: &str = "cardlessid.wallet.wallet_mnemonic";
pub const WALLET_KEY_SERVICE: &str = "cardlessid.wallet_signing_key";
pub const GOVERNMENT_ID_SERVICE: &str = "cardlessid.document.governmentId";
pub const PASSPORT_SERVICE: &str = "cardlessid.document.passport";

pub const START_MILLIS: u64 = 1_700_000_000_000;

/// Stores over a fresh memory store with a fixed clock.
pub fn stores() -> (Arc<MemorySecureStore>, SecureStores) {
    let blob_store = Arc::new(MemorySecureStore::new());
    let stores = SecureStores::with_config(
        blob_store.clone(),
        Arc::new(FixedClock::new(START_MILLIS)),
        StoreConfig::default(),
    );
    (blob_store, stores)
}

/// Memory store whose writes and removals fail for one service.
pub struct FailingService {
    pub inner: Arc<MemorySecureStore>,
    pub service: &'static str,
}

impl FailingService {
    fn check(&self, service: &str) -> StorageResult<()> {
        if service == self.service {
            return Err(StorageError::unavailable(format!("{service} is locked")));
        }
        Ok(())
    }
}

impl SecureBlobStore for FailingService {
    fn get(&self, service: String) -> StorageResult<Option<String>> {
        self.inner.get(service)
    }

    fn set(&self, service: String, value: String) -> StorageResult<()> {
        self.check(&service)?;
        self.inner.set(service, value)
    }

    fn remove(&self, service: String) -> StorageResult<()> {
        self.check(&service)?;
        self.inner.remove(service)
    }
}

/// Stores whose writes and removals of `service` fail.
pub fn stores_failing_on(service: &'static str) -> (Arc<MemorySecureStore>, SecureStores) {
    let blob_store = Arc::new(MemorySecureStore::new());
    let stores = SecureStores::with_config(
        Arc::new(FailingService {
            inner: blob_store.clone(),
            service,
        }),
        Arc::new(FixedClock::new(START_MILLIS)),
        StoreConfig::default(),
    );
    (blob_store, stores)
}

pub fn credential() -> VerifiableCredential {
    serde_json::from_value(serde_json::json!({
        "@context": [
            "https://www.w3.org/2018/credentials/v1",
            "https://cardlessid.org/credentials/v1"
        ],
        "id": "urn:uuid:3f1c2d4e",
        "type": ["VerifiableCredential", "BirthDateCredential"],
        "issuer": {"id": "did:algo:ISSUERADDRESS"},
        "issuanceDate": "2025-03-01T12:00:00Z",
        "credentialSubject": {
            "id": "did:algo:HOLDERADDRESS",
            "cardlessid:governmentIdHash": "gid",
            "cardlessid:firstNameHash": "first",
            "cardlessid:middleNameHash": "middle",
            "cardlessid:lastNameHash": "last",
            "cardlessid:birthDateHash": "dob",
            "cardlessid:compositeHash": "composite",
            "cardlessid:idType": "drivers_license",
            "cardlessid:state": "CA"
        },
        "evidence": [{
            "type": ["DocumentVerification"],
            "verifier": "did:algo:ISSUERADDRESS",
            "evidenceDocument": "DriversLicense",
            "subjectPresence": "Digital",
            "documentPresence": "Digital",
            "verificationMethod": "aws-textract",
            "fraudDetection": {
                "performed": true,
                "passed": true,
                "method": "google-document-ai",
                "provider": "Google Document AI",
                "signals": [{"type": "tamper", "result": "pass"}]
            },
            "documentAnalysis": {
                "provider": "AWS Textract",
                "bothSidesAnalyzed": true,
                "lowConfidenceFields": [],
                "qualityLevel": "high"
            },
            "biometricVerification": {
                "performed": true,
                "faceMatch": {"confidence": 0.97, "provider": "AWS Rekognition"},
                "liveness": {"confidence": 0.92, "provider": "AWS Rekognition"}
            }
        }],
        "proof": {
            "type": "Ed25519Signature2020",
            "created": "2025-03-01T12:00:00Z",
            "verificationMethod": "did:algo:ISSUERADDRESS#key-1",
            "proofPurpose": "assertionMethod",
            "proofValue": "z58DAdFfa9SkqZMVPxAQp"
        }
    }))
    .expect("credential fixture")
}

pub fn personal_data() -> PersonalData {
    PersonalData {
        first_name: "Ada".to_string(),
        middle_name: Some("King".to_string()),
        last_name: "Lovelace".to_string(),
        birth_date: "1990-12-10".to_string(),
        government_id: "D1234567".to_string(),
        id_type: IdType::DriversLicense,
        state: "CA".to_string(),
    }
}

/// Response with only the two required slots.
pub fn minimal_response() -> CredentialResponse {
    CredentialResponse {
        credential: credential(),
        personal_data: personal_data(),
        verification_quality: None,
        nft: None,
        blockchain: None,
        duplicate_detection: None,
    }
}

/// Response carrying NFT and blockchain metadata.
pub fn response_with_nft(asset_id: &str) -> CredentialResponse {
    CredentialResponse {
        nft: Some(NftInfo {
            asset_id: asset_id.to_string(),
            requires_opt_in: true,
            instructions: None,
        }),
        blockchain: Some(BlockchainInfo {
            transaction: BlockchainTransaction {
                id: "ISSUETX".to_string(),
                explorer_url: "https://lora.algokit.io/testnet/transaction/ISSUETX".to_string(),
                note: None,
            },
            network: Some(AlgorandNetwork::Testnet),
        }),
        ..minimal_response()
    }
}

pub fn issuance_request(id_type: IdType, government_id: &str) -> IssuanceRequest {
    IssuanceRequest {
        verification_token: "token-123".to_string(),
        first_name: "Ada".to_string(),
        middle_name: None,
        last_name: "Lovelace".to_string(),
        birth_date: "1990-12-10".to_string(),
        government_id: government_id.to_string(),
        id_type,
        state: Some("CA".to_string()),
        expiration_date: None,
    }
}

/// Rewrites one character of the persisted signature under `service`.
pub fn flip_signature_char(blob_store: &MemorySecureStore, service: &str) {
    let raw = blob_store.raw_get(service).expect("slot present");
    let mut envelope = SecureEnvelope::from_json(&raw).expect("envelope");
    let mut chars: Vec<char> = envelope.signature.chars().collect();
    chars[0] = if chars[0] == '0' { '1' } else { '0' };
    envelope.signature = chars.into_iter().collect();
    blob_store.raw_set(service, &envelope.to_json().expect("json"));
}

/// Issuer that records the address it was asked to bind and returns a fixed
/// response.
pub struct FakeIssuer {
    pub response: CredentialResponse,
    pub fail: bool,
    pub seen_addresses: Mutex<Vec<String>>,
}

impl FakeIssuer {
    pub fn new(response: CredentialResponse) -> Self {
        Self {
            response,
            fail: false,
            seen_addresses: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(minimal_response())
        }
    }
}

#[async_trait]
impl CredentialIssuer for FakeIssuer {
    async fn issue(
        &self,
        _request: &IssuanceRequest,
        wallet_address: &str,
    ) -> Result<CredentialResponse, CardlessError> {
        self.seen_addresses
            .lock()
            .unwrap()
            .push(wallet_address.to_string());
        if self.fail {
            return Err(CardlessError::Issuance("verification token expired".to_string()));
        }
        Ok(self.response.clone())
    }
}

/// Opt-in collaborator returning a fixed transaction id.
pub struct FakeOptIn {
    pub fail: bool,
    pub calls: Mutex<Vec<(String, u64, usize)>>,
}

impl FakeOptIn {
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }
}

#[async_trait]
impl AssetOptIn for FakeOptIn {
    async fn opt_in(
        &self,
        address: &str,
        secret_key: &[u8; 64],
        asset_id: u64,
    ) -> Result<String, CardlessError> {
        self.calls
            .lock()
            .unwrap()
            .push((address.to_string(), asset_id, secret_key.len()));
        if self.fail {
            return Err(CardlessError::OptIn("insufficient balance".to_string()));
        }
        Ok(format!("OPTIN-{asset_id}"))
    }
}

/// Transfer collaborator echoing the request.
pub struct FakeTransfer {
    pub success: bool,
}

#[async_trait]
impl NftTransferApi for FakeTransfer {
    async fn transfer(
        &self,
        asset_id: u64,
        wallet_address: &str,
    ) -> Result<NftTransferReceipt, CardlessError> {
        Ok(NftTransferReceipt {
            success: self.success,
            asset_id,
            wallet_address: wallet_address.to_string(),
            transactions: NftTransferTransactions {
                transfer: TransactionRef {
                    id: "XFER".to_string(),
                    explorer_url: "https://lora.algokit.io/testnet/transaction/XFER".to_string(),
                },
                freeze: TransactionRef {
                    id: "FRZ".to_string(),
                    explorer_url: "https://lora.algokit.io/testnet/transaction/FRZ".to_string(),
                },
            },
            message: if self.success {
                "transferred".to_string()
            } else {
                "asset already transferred".to_string()
            },
        })
    }
}
