//! Document model for goods introduction into circulation.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::types::serde_helpers::{iso_date, option_iso_date};

/// Document type accepted by the create endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocType {
    /// Introduction of goods produced in the country
    LpIntroduceGoods,
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocType::LpIntroduceGoods => write!(f, "LP_INTRODUCE_GOODS"),
        }
    }
}

/// A document submitted to the registry.
///
/// Optional fields are omitted from the JSON body when `None`.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Free-form description
    pub description: Option<String>,
    /// Document identifier
    pub doc_id: String,
    /// Document status
    pub doc_status: String,
    /// Document type
    pub doc_type: DocType,
    /// Whether the goods are imported
    pub import_request: bool,
    /// Taxpayer number of the owner
    pub owner_inn: String,
    /// Taxpayer number of the participant submitting the document
    pub participant_inn: String,
    /// Taxpayer number of the producer
    pub producer_inn: String,
    /// Production date
    #[serde(with = "iso_date")]
    pub production_date: Date,
    /// Production type
    pub production_type: String,
    /// Products covered by the document
    #[serde(default)]
    pub products: Vec<Product>,
    /// Registration date
    #[serde(with = "iso_date")]
    pub reg_date: Date,
    /// Registration number
    pub reg_number: Option<String>,
}

impl Document {
    /// Encode the document as the JSON request body.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// A single product line within a [`Document`].
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Conformity certificate type
    pub certificate_document: Option<String>,
    /// Conformity certificate date
    #[serde(default, with = "option_iso_date")]
    pub certificate_document_date: Option<Date>,
    /// Conformity certificate number
    pub certificate_document_number: Option<String>,
    /// Taxpayer number of the owner
    pub owner_inn: String,
    /// Taxpayer number of the producer
    pub producer_inn: String,
    /// Production date
    ///
    /// Serialized under the registry's `production_date` key; the legacy
    /// misspelled `production_datte` key is neither written nor accepted.
    #[serde(with = "iso_date")]
    pub production_date: Date,
    /// Commodity classification code
    pub tnved_code: String,
    /// Unit identification code
    pub uit_code: Option<String>,
    /// Transport package identification code
    pub uitu_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn sample_document() -> Document {
        Document {
            description: None,
            doc_id: "doc-1".to_string(),
            doc_status: "DRAFT".to_string(),
            doc_type: DocType::LpIntroduceGoods,
            import_request: false,
            owner_inn: "7700000000".to_string(),
            participant_inn: "7700000001".to_string(),
            producer_inn: "7700000002".to_string(),
            production_date: date!(2024 - 05 - 01),
            production_type: "OWN_PRODUCTION".to_string(),
            products: vec![Product {
                certificate_document: Some("CONFORMITY_CERTIFICATE".to_string()),
                certificate_document_date: Some(date!(2024 - 04 - 15)),
                certificate_document_number: None,
                owner_inn: "7700000000".to_string(),
                producer_inn: "7700000002".to_string(),
                production_date: date!(2024 - 05 - 01),
                tnved_code: "6401100000".to_string(),
                uit_code: Some("010460043993125621JgXJ5.T".to_string()),
                uitu_code: None,
            }],
            reg_date: date!(2024 - 05 - 02),
            reg_number: None,
        }
    }

    #[test]
    fn test_document_field_names() {
        let json = serde_json::to_value(sample_document()).unwrap();

        assert_eq!(json["doc_type"], "LP_INTRODUCE_GOODS");
        assert_eq!(json["import_request"], false);
        assert_eq!(json["production_date"], "2024-05-01");
        assert_eq!(json["reg_date"], "2024-05-02");
        assert_eq!(json["products"][0]["tnved_code"], "6401100000");
        assert_eq!(json["products"][0]["certificate_document_date"], "2024-04-15");
    }

    #[test]
    fn test_none_fields_are_omitted() {
        let json = serde_json::to_value(sample_document()).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("description"));
        assert!(!object.contains_key("reg_number"));

        let product = json["products"][0].as_object().unwrap();
        assert!(!product.contains_key("certificate_document_number"));
        assert!(!product.contains_key("uitu_code"));
    }

    #[test]
    fn test_product_uses_registry_date_key() {
        let json = serde_json::to_value(sample_document()).unwrap();
        let product = json["products"][0].as_object().unwrap();
        assert_eq!(product["production_date"], "2024-05-01");
        assert!(!product.contains_key("production_datte"));

        let misspelled = r#"{
            "owner_inn": "1",
            "producer_inn": "2",
            "production_datte": "2024-05-01",
            "tnved_code": "6401100000"
        }"#;
        assert!(serde_json::from_str::<Product>(misspelled).is_err());
    }

    #[test]
    fn test_document_from_registry_json() {
        let json = r#"{
            "doc_id": "doc-2",
            "doc_status": "CHECKED_OK",
            "doc_type": "LP_INTRODUCE_GOODS",
            "import_request": true,
            "owner_inn": "1",
            "participant_inn": "2",
            "producer_inn": "3",
            "production_date": "2023-12-31",
            "production_type": "CONTRACT_PRODUCTION",
            "reg_date": "2024-01-10",
            "reg_number": "R-10"
        }"#;

        let document: Document = serde_json::from_str(json).unwrap();
        assert!(document.import_request);
        assert!(document.products.is_empty());
        assert_eq!(document.reg_number.as_deref(), Some("R-10"));
        assert_eq!(document.production_date, date!(2023 - 12 - 31));
    }
}
