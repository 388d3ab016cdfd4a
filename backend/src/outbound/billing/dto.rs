//! DTOs for the billing provider's JSON documents.
//!
//! Requests are built from domain records in one pass. Responses are kept as
//! raw JSON for callers and only the identifiers are decoded into typed form.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    ContactDraft, Identification, Invoice, InvoiceItem, Payment, PersonKind, ProviderContactId,
    ProviderInvoiceId, RemoteContact, RemoteInvoice,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InvoiceRequestDto<'a> {
    date: String,
    due_date: String,
    client: ClientRefDto<'a>,
    items: Vec<ItemDto<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    payments: Vec<PaymentDto>,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
}

#[derive(Debug, Serialize)]
struct ClientRefDto<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct ItemDto<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    discount: Option<Decimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentDto {
    date: String,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    payment_method: &'static str,
}

impl<'a> From<&'a Invoice> for InvoiceRequestDto<'a> {
    fn from(invoice: &'a Invoice) -> Self {
        let terms = &invoice.terms;
        Self {
            date: format_date(terms.issue_date),
            due_date: format_date(terms.due_date),
            client: ClientRefDto {
                id: invoice.client.as_str(),
            },
            items: terms.items.iter().map(ItemDto::from).collect(),
            payments: terms.payments.iter().map(PaymentDto::from).collect(),
            total: terms.total,
        }
    }
}

impl<'a> From<&'a InvoiceItem> for ItemDto<'a> {
    fn from(item: &'a InvoiceItem) -> Self {
        Self {
            name: &item.name,
            description: item.description.as_deref(),
            quantity: item.quantity,
            price: item.price,
            discount: item.discount,
        }
    }
}

impl From<&Payment> for PaymentDto {
    fn from(payment: &Payment) -> Self {
        Self {
            date: format_date(payment.date),
            amount: payment.amount,
            payment_method: payment.method.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ContactRequestDto<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    identification: Option<&'a Identification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind_of_person: Option<PersonKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    regime: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mobile: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

impl<'a> From<&'a ContactDraft> for ContactRequestDto<'a> {
    fn from(draft: &'a ContactDraft) -> Self {
        Self {
            name: &draft.name,
            identification: draft.identification.as_ref(),
            kind_of_person: draft.kind_of_person,
            regime: draft.regime.as_deref(),
            mobile: draft.mobile.as_deref(),
            email: draft.email.as_deref(),
        }
    }
}

/// Provider ids arrive as JSON strings or numbers depending on the endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawIdDto {
    Text(String),
    Number(i64),
}

impl RawIdDto {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentHeaderDto {
    id: RawIdDto,
    number_template: Option<NumberTemplateDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NumberTemplateDto {
    full_number: Option<String>,
}

fn decode_header(document: &Value) -> Result<DocumentHeaderDto, String> {
    DocumentHeaderDto::deserialize(document).map_err(|err| format!("document header: {err}"))
}

pub(super) fn into_remote_invoice(document: Value) -> Result<RemoteInvoice, String> {
    let header = decode_header(&document)?;
    let provider_id = ProviderInvoiceId::new(header.id.into_string())
        .map_err(|err| format!("invoice id: {err}"))?;
    let number = header
        .number_template
        .and_then(|template| template.full_number)
        .filter(|number| !number.trim().is_empty());
    Ok(RemoteInvoice {
        provider_id,
        number,
        document,
    })
}

pub(super) fn into_remote_contact(document: Value) -> Result<RemoteContact, String> {
    let header = decode_header(&document)?;
    let provider_id = ProviderContactId::new(header.id.into_string())
        .map_err(|err| format!("contact id: {err}"))?;
    Ok(RemoteContact {
        provider_id,
        document,
    })
}

pub(super) fn into_remote_invoices(document: Value) -> Result<Vec<RemoteInvoice>, String> {
    match document {
        Value::Array(entries) => entries.into_iter().map(into_remote_invoice).collect(),
        other => Err(format!("expected an invoice array, found {}", kind_of(&other))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
