//! Invoice request parsing and response bodies.
//!
//! Requests are read from loose JSON so that every malformed field is reported
//! together. Responses serialise money as JSON numbers and dates as
//! `YYYY-MM-DD`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::domain::{
    ClientReference, ContactDraft, Error, FieldViolation, Invoice, InvoiceDraft, InvoiceItem,
    InvoiceTerms, Payment, PaymentMethod, ProviderContactId,
};
use crate::inbound::http::validation::{
    Violations, optional, parse_array, parse_date, parse_decimal, parse_identifier, parse_object,
    parse_quantity, parse_string, required,
};

/// Request payload for creating or replacing an invoice.
///
/// `client` accepts a provider contact id (string or integer), an object
/// `{ "id": ... }`, or a full contact object to provision first.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequestBody {
    #[schema(value_type = Object, example = json!("3"))]
    pub client: Value,
    pub items: Vec<InvoiceItemBody>,
    #[serde(default)]
    pub payments: Vec<PaymentBody>,
    #[schema(format = "date", example = "2026-01-15")]
    pub date: String,
    /// Defaults to `date`.
    #[schema(format = "date")]
    pub due_date: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 20.0)]
    pub total: Decimal,
}

/// One invoice line.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct InvoiceItemBody {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    /// Percentage between 0 and 100.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>)]
    pub discount: Option<Decimal>,
}

/// A payment registered against the invoice.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PaymentBody {
    #[schema(format = "date")]
    pub date: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    #[schema(example = "transfer")]
    pub method: String,
}

/// Invoice as stored locally.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceBody {
    #[schema(format = "uuid")]
    pub id: String,
    /// Provider invoice id once the provider accepted the invoice.
    pub provider_id: Option<String>,
    pub provider_number: Option<String>,
    /// Provider contact id of the client.
    pub client: String,
    pub items: Vec<InvoiceItemBody>,
    pub payments: Vec<PaymentBody>,
    #[schema(format = "date")]
    pub date: String,
    #[schema(format = "date")]
    pub due_date: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total: Decimal,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

const DATE_FORMAT: &str = "%Y-%m-%d";

impl From<&InvoiceItem> for InvoiceItemBody {
    fn from(item: &InvoiceItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            quantity: item.quantity,
            price: item.price,
            discount: item.discount,
        }
    }
}

impl From<&Payment> for PaymentBody {
    fn from(payment: &Payment) -> Self {
        Self {
            date: payment.date.format(DATE_FORMAT).to_string(),
            amount: payment.amount,
            method: payment.method.as_str().to_owned(),
        }
    }
}

impl From<&Invoice> for InvoiceBody {
    fn from(invoice: &Invoice) -> Self {
        let terms = &invoice.terms;
        Self {
            id: invoice.id.to_string(),
            provider_id: invoice.provider_id.as_ref().map(ToString::to_string),
            provider_number: invoice.provider_number.clone(),
            client: invoice.client.to_string(),
            items: terms.items.iter().map(InvoiceItemBody::from).collect(),
            payments: terms.payments.iter().map(PaymentBody::from).collect(),
            date: terms.issue_date.format(DATE_FORMAT).to_string(),
            due_date: terms.due_date.format(DATE_FORMAT).to_string(),
            total: terms.total,
            created_at: invoice.created_at.to_rfc3339(),
            updated_at: invoice.updated_at.to_rfc3339(),
        }
    }
}

/// Parse a raw JSON request body into an [`InvoiceDraft`].
///
/// # Errors
/// Returns an [`crate::domain::ErrorCode::InvalidRequest`] error listing every
/// missing or malformed field.
pub(crate) fn parse_invoice_draft(body: &Value) -> Result<InvoiceDraft, Error> {
    let mut violations = Violations::default();
    let Some(object) = body.as_object() else {
        violations.push("body", "must be a JSON object");
        return violations.finish(None);
    };

    let client = violations
        .check(required(object, "client", "client"))
        .and_then(|value| violations.check(parse_client(value)));
    let items = parse_items(object, &mut violations);
    let payments = parse_payments(object, &mut violations);
    let issue_date = violations
        .check(required(object, "date", "date"))
        .and_then(|value| violations.check(parse_date(value, "date")));
    let due_date = match optional(object, "dueDate") {
        Some(value) => violations.check(parse_date(value, "dueDate")),
        None => issue_date,
    };
    let total = violations
        .check(required(object, "total", "total"))
        .and_then(|value| violations.check(parse_decimal(value, "total")));

    let draft = match (client, items, payments, issue_date, due_date, total) {
        (Some(client), Some(items), Some(payments), Some(issue_date), Some(due_date), Some(total))
            if violations.is_empty() =>
        {
            Some(InvoiceDraft {
                client,
                terms: InvoiceTerms {
                    items,
                    payments,
                    issue_date,
                    due_date,
                    total,
                },
            })
        }
        _ => None,
    };
    violations.finish(draft)
}

fn parse_client(value: &Value) -> Result<ClientReference, FieldViolation> {
    let linked = |raw: String| {
        ProviderContactId::new(raw)
            .map(ClientReference::Linked)
            .map_err(|err| FieldViolation::new("client", err.to_string()))
    };
    match value {
        Value::Object(object) => match optional(object, "id") {
            Some(id) => linked(parse_identifier(id, "client.id")?),
            None => serde_json::from_value::<ContactDraft>(value.clone())
                .map(ClientReference::Embedded)
                .map_err(|err| FieldViolation::new("client", format!("invalid contact: {err}"))),
        },
        other => linked(parse_identifier(other, "client")?),
    }
}

fn parse_items(
    object: &Map<String, Value>,
    violations: &mut Violations,
) -> Option<Vec<InvoiceItem>> {
    let entries = violations
        .check(required(object, "items", "items"))
        .and_then(|value| violations.check(parse_array(value, "items")))?;
    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let prefix = format!("items[{index}]");
        let Some(item) = violations.check(parse_object(entry, &prefix)) else {
            continue;
        };
        let field = |name: &str| format!("{prefix}.{name}");
        let name = violations
            .check(required(item, "name", &field("name")))
            .and_then(|value| violations.check(parse_string(value, &field("name"))));
        let description = optional(item, "description")
            .and_then(|value| violations.check(parse_string(value, &field("description"))));
        let quantity = violations
            .check(required(item, "quantity", &field("quantity")))
            .and_then(|value| violations.check(parse_quantity(value, &field("quantity"))));
        let price = violations
            .check(required(item, "price", &field("price")))
            .and_then(|value| violations.check(parse_decimal(value, &field("price"))));
        let discount = optional(item, "discount")
            .and_then(|value| violations.check(parse_decimal(value, &field("discount"))));
        if let (Some(name), Some(quantity), Some(price)) = (name, quantity, price) {
            items.push(InvoiceItem {
                name,
                description,
                quantity,
                price,
                discount,
            });
        }
    }
    Some(items)
}

fn parse_payments(object: &Map<String, Value>, violations: &mut Violations) -> Option<Vec<Payment>> {
    let Some(value) = optional(object, "payments") else {
        return Some(Vec::new());
    };
    let entries = violations.check(parse_array(value, "payments"))?;
    let mut payments = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let prefix = format!("payments[{index}]");
        let Some(payment) = violations.check(parse_object(entry, &prefix)) else {
            continue;
        };
        let field = |name: &str| format!("{prefix}.{name}");
        let date = violations
            .check(required(payment, "date", &field("date")))
            .and_then(|value| violations.check(parse_date(value, &field("date"))));
        let amount = violations
            .check(required(payment, "amount", &field("amount")))
            .and_then(|value| violations.check(parse_decimal(value, &field("amount"))));
        let method = optional(payment, "method")
            .or_else(|| optional(payment, "paymentMethod"))
            .ok_or_else(|| FieldViolation::new(field("method"), "field required"))
            .and_then(|value| parse_string(value, &field("method")))
            .and_then(|raw| {
                raw.parse::<PaymentMethod>()
                    .map_err(|err| FieldViolation::new(field("method"), err.to_string()))
            });
        let method = violations.check(method);
        if let (Some(date), Some(amount), Some(method)) = (date, amount, method) {
            payments.push(Payment {
                date,
                amount,
                method,
            });
        }
    }
    Some(payments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn body() -> Value {
        json!({
            "client": "3",
            "items": [{ "name": "Consulting", "quantity": 2, "price": 10 }],
            "date": "2026-01-15",
            "total": 20
        })
    }

    fn violation_fields(err: &Error) -> Vec<String> {
        err.details().expect("details")["violations"]
            .as_array()
            .expect("violations")
            .iter()
            .map(|violation| violation["field"].as_str().expect("field").to_owned())
            .collect()
    }

    #[rstest]
    fn minimal_body_parses_with_due_date_defaulted(body: Value) {
        let draft = parse_invoice_draft(&body).expect("draft");
        assert_eq!(
            draft.client,
            ClientReference::Linked(ProviderContactId::new("3").expect("id"))
        );
        assert_eq!(draft.terms.due_date, draft.terms.issue_date);
        assert_eq!(draft.terms.items[0].price, Decimal::new(10, 0));
        assert!(draft.terms.payments.is_empty());
    }

    #[rstest]
    #[case::number(json!(3))]
    #[case::id_object(json!({ "id": 3 }))]
    #[case::id_object_string(json!({ "id": "3" }))]
    fn client_ids_are_accepted_in_several_shapes(mut body: Value, #[case] client: Value) {
        body["client"] = client;
        let draft = parse_invoice_draft(&body).expect("draft");
        assert!(matches!(draft.client, ClientReference::Linked(ref id) if id.as_str() == "3"));
    }

    #[rstest]
    fn contact_objects_become_embedded_clients(mut body: Value) {
        body["client"] = json!({
            "name": "Acme Ltda",
            "identification": { "type": "NIT", "number": "900123" },
            "kindOfPerson": "LEGAL_ENTITY",
            "email": "billing@acme.test"
        });
        let draft = parse_invoice_draft(&body).expect("draft");
        let ClientReference::Embedded(contact) = draft.client else {
            panic!("expected an embedded contact");
        };
        assert_eq!(contact.name, "Acme Ltda");
    }

    #[rstest]
    fn missing_client_is_reported_by_name(mut body: Value) {
        body.as_object_mut().expect("object").remove("client");
        let err = parse_invoice_draft(&body).expect_err("missing client");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.message().contains("client"), "{}", err.message());
    }

    #[rstest]
    fn every_malformed_field_is_collected(mut body: Value) {
        body["client"] = json!("");
        body["items"] = json!([{ "name": "Consulting", "quantity": 0, "price": "ten" }]);
        body["payments"] = json!([{ "date": "yesterday", "amount": 5, "method": "barter" }]);
        body["date"] = json!("15/01/2026");

        let err = parse_invoice_draft(&body).expect_err("invalid");

        assert_eq!(
            violation_fields(&err),
            [
                "client",
                "items[0].quantity",
                "items[0].price",
                "payments[0].date",
                "payments[0].method",
                "date"
            ]
        );
    }

    #[rstest]
    fn non_object_bodies_are_rejected() {
        let err = parse_invoice_draft(&json!([1, 2])).expect_err("array body");
        assert_eq!(violation_fields(&err), ["body"]);
    }

    #[rstest]
    fn payment_method_accepts_provider_spelling(mut body: Value) {
        body["payments"] = json!([
            { "date": "2026-01-15", "amount": 5, "paymentMethod": "credit_card" }
        ]);
        let draft = parse_invoice_draft(&body).expect("draft");
        assert_eq!(draft.terms.payments[0].method, PaymentMethod::CreditCard);
    }
}
