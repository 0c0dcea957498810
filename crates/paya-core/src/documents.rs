//! Uploaded file descriptors and the named document slots of the onboarding
//! wizard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Descriptor of a file the server has stored.
///
/// The server keeps empty placeholders (`{"filename": null, ...}`) for slots
/// that have never been filled, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub upload_date: Option<DateTime<Utc>>,
}

impl StoredFile {
    /// Returns `true` when the descriptor points at an actual stored file
    /// rather than an empty placeholder.
    #[must_use]
    pub fn is_stored(&self) -> bool {
        [&self.id, &self.filename, &self.path, &self.url]
            .into_iter()
            .any(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }
}

/// Business registration documents collected in step 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BusinessDocumentSlot {
    CertificateOfIncorporation,
    KraPinCertificate,
    Cr12,
    BusinessPermit,
}

impl BusinessDocumentSlot {
    pub const ALL: [BusinessDocumentSlot; 4] = [
        BusinessDocumentSlot::CertificateOfIncorporation,
        BusinessDocumentSlot::KraPinCertificate,
        BusinessDocumentSlot::Cr12,
        BusinessDocumentSlot::BusinessPermit,
    ];

    /// Key used on the wire and in the server's `documents` map.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            BusinessDocumentSlot::CertificateOfIncorporation => "certificateOfIncorporation",
            BusinessDocumentSlot::KraPinCertificate => "kraPinCertificate",
            BusinessDocumentSlot::Cr12 => "cr12",
            BusinessDocumentSlot::BusinessPermit => "businessPermit",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            BusinessDocumentSlot::CertificateOfIncorporation => "Certificate of Incorporation",
            BusinessDocumentSlot::KraPinCertificate => "KRA PIN Certificate",
            BusinessDocumentSlot::Cr12 => "CR-12",
            BusinessDocumentSlot::BusinessPermit => "Business Permit",
        }
    }

    /// Document type code expected by the partner organization API.
    #[must_use]
    pub fn partner_type(self) -> &'static str {
        match self {
            BusinessDocumentSlot::CertificateOfIncorporation => "CERT_OF_INCORP",
            BusinessDocumentSlot::KraPinCertificate => "TAX",
            BusinessDocumentSlot::Cr12 => "BUSINESS_CERTIFICATE",
            BusinessDocumentSlot::BusinessPermit => "BUSINESS_LICENSE",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }
}

impl std::fmt::Display for BusinessDocumentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-director identity documents collected in step 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DirectorDocumentSlot {
    PhotoIdFront,
    PhotoIdBack,
    KraCertificate,
    ProofOfAddress,
    Selfie,
}

impl DirectorDocumentSlot {
    pub const ALL: [DirectorDocumentSlot; 5] = [
        DirectorDocumentSlot::PhotoIdFront,
        DirectorDocumentSlot::PhotoIdBack,
        DirectorDocumentSlot::KraCertificate,
        DirectorDocumentSlot::ProofOfAddress,
        DirectorDocumentSlot::Selfie,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            DirectorDocumentSlot::PhotoIdFront => "photoIdFront",
            DirectorDocumentSlot::PhotoIdBack => "photoIdBack",
            DirectorDocumentSlot::KraCertificate => "kraCertificate",
            DirectorDocumentSlot::ProofOfAddress => "proofOfAddress",
            DirectorDocumentSlot::Selfie => "selfie",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DirectorDocumentSlot::PhotoIdFront => "Photo ID (front)",
            DirectorDocumentSlot::PhotoIdBack => "Photo ID (back)",
            DirectorDocumentSlot::KraCertificate => "KRA Certificate",
            DirectorDocumentSlot::ProofOfAddress => "Proof of Address",
            DirectorDocumentSlot::Selfie => "Facial Photo / Selfie",
        }
    }

    /// Whether the slot must be filled before step 4 can be submitted.
    #[must_use]
    pub fn is_required(self) -> bool {
        matches!(
            self,
            DirectorDocumentSlot::PhotoIdFront
                | DirectorDocumentSlot::PhotoIdBack
                | DirectorDocumentSlot::Selfie
        )
    }

    #[must_use]
    pub fn partner_type(self) -> &'static str {
        match self {
            DirectorDocumentSlot::PhotoIdFront => "NATIONAL_IDENTITY",
            DirectorDocumentSlot::PhotoIdBack => "BACK_OF_NATIONAL_IDENTITY",
            DirectorDocumentSlot::KraCertificate => "TAX",
            DirectorDocumentSlot::ProofOfAddress => "PROOF_OF_ADDRESS",
            DirectorDocumentSlot::Selfie => "FACIAL_PHOTO",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }
}

impl std::fmt::Display for DirectorDocumentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_descriptor_is_not_stored() {
        let file: StoredFile =
            serde_json::from_str(r#"{"filename": null, "originalName": null, "path": null, "size": null}"#)
                .unwrap();
        assert!(!file.is_stored());
    }

    #[test]
    fn upload_response_descriptor_is_stored() {
        let file: StoredFile = serde_json::from_str(
            r#"{"filename": "doc-1.pdf", "originalName": "cert.pdf", "path": "/uploads/doc-1.pdf", "size": 2048}"#,
        )
        .unwrap();
        assert!(file.is_stored());
        assert_eq!(file.size, Some(2048));
    }

    #[test]
    fn slot_keys_match_serde_names() {
        for slot in BusinessDocumentSlot::ALL {
            let json = serde_json::to_string(&slot).unwrap();
            assert_eq!(json, format!("\"{}\"", slot.key()));
            assert_eq!(BusinessDocumentSlot::from_key(slot.key()), Some(slot));
        }
        for slot in DirectorDocumentSlot::ALL {
            let json = serde_json::to_string(&slot).unwrap();
            assert_eq!(json, format!("\"{}\"", slot.key()));
        }
    }

    #[test]
    fn only_identity_and_selfie_are_required_for_directors() {
        let required: Vec<_> = DirectorDocumentSlot::ALL
            .into_iter()
            .filter(|s| s.is_required())
            .collect();
        assert_eq!(
            required,
            vec![
                DirectorDocumentSlot::PhotoIdFront,
                DirectorDocumentSlot::PhotoIdBack,
                DirectorDocumentSlot::Selfie
            ]
        );
    }
}
