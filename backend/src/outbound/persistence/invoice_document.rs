//! JSONB encoding of invoice terms.
//!
//! Money is stored as decimal strings so no precision is lost in the column.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{InvoiceItem, InvoiceTerms, Payment};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceDocumentRef<'a> {
    items: &'a [InvoiceItem],
    payments: &'a [Payment],
    issue_date: NaiveDate,
    due_date: NaiveDate,
    total: Decimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceDocument {
    items: Vec<InvoiceItem>,
    #[serde(default)]
    payments: Vec<Payment>,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    total: Decimal,
}

pub(super) fn encode_terms(terms: &InvoiceTerms) -> Result<Value, serde_json::Error> {
    serde_json::to_value(InvoiceDocumentRef {
        items: &terms.items,
        payments: &terms.payments,
        issue_date: terms.issue_date,
        due_date: terms.due_date,
        total: terms.total,
    })
}

pub(super) fn decode_terms(document: Value) -> Result<InvoiceTerms, serde_json::Error> {
    let InvoiceDocument {
        items,
        payments,
        issue_date,
        due_date,
        total,
    } = serde_json::from_value(document)?;
    Ok(InvoiceTerms {
        items,
        payments,
        issue_date,
        due_date,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaymentMethod;
    use serde_json::json;

    fn terms() -> InvoiceTerms {
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date");
        InvoiceTerms {
            items: vec![InvoiceItem {
                name: "Hosting".to_owned(),
                description: None,
                quantity: 3,
                price: Decimal::new(1999, 2),
                discount: None,
            }],
            payments: vec![Payment {
                date,
                amount: Decimal::new(5997, 2),
                method: PaymentMethod::Transfer,
            }],
            issue_date: date,
            due_date: date,
            total: Decimal::new(5997, 2),
        }
    }

    #[test]
    fn money_is_stored_as_exact_strings() {
        let document = encode_terms(&terms()).expect("encode");
        assert_eq!(document["items"][0]["price"], json!("19.99"));
        assert_eq!(document["total"], json!("59.97"));
        assert_eq!(document["payments"][0]["method"], json!("transfer"));
        assert_eq!(document["issueDate"], json!("2026-02-01"));
    }

    #[test]
    fn decoding_restores_terms() {
        let original = terms();
        let decoded = decode_terms(encode_terms(&original).expect("encode")).expect("decode");
        assert_eq!(decoded, original);
    }

    #[test]
    fn missing_payments_default_to_empty() {
        let decoded = decode_terms(json!({
            "items": [{ "name": "x", "quantity": 1, "price": "1" }],
            "issueDate": "2026-02-01",
            "dueDate": "2026-02-01",
            "total": "1"
        }))
        .expect("decode");
        assert!(decoded.payments.is_empty());
    }
}
