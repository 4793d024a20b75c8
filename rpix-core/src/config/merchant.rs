//! Merchant identity attached to every gateway customer block.

use compact_str::CompactString;
use rpix_sdk::objects::DocumentType;
use serde::{Deserialize, Serialize};

/// The merchant's registered document and phone country code.
///
/// The document rides along on every transaction in place of a buyer
/// document, which the storefront never collects. Kept as configuration so
/// a deployment can change it without a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantIdentity {
    pub document_type: DocumentType,
    pub document: CompactString,
    /// Country calling code prefixed onto phone numbers that lack one.
    pub phone_country_code: CompactString,
}

impl Default for MerchantIdentity {
    fn default() -> Self {
        Self {
            document_type: DocumentType::Cpf,
            document: CompactString::const_new("20264830106"),
            phone_country_code: CompactString::const_new("55"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_storefront() {
        let merchant = MerchantIdentity::default();
        assert_eq!(merchant.document_type, DocumentType::Cpf);
        assert_eq!(merchant.document, "20264830106");
        assert_eq!(merchant.phone_country_code, "55");
    }
}
