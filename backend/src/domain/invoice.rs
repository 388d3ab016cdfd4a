//! Invoice aggregate, its draft form, and the read models built from it.
//!
//! The local store owns invoice identity: an [`InvoiceId`] is generated before
//! any provider call so the record stays addressable whatever happens remotely.
//! Provider identifiers are optional foreign references that appear once the
//! billing provider has accepted the document.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::contact::ContactDraft;
use super::error::FieldViolation;
use super::provider_id::{ProviderContactId, ProviderInvoiceId};
use super::sync_outcome::SyncOutcome;

/// Locally generated invoice identifier.
///
/// # Examples
/// ```
/// use backend::domain::InvoiceId;
///
/// let id = InvoiceId::random();
/// let parsed: InvoiceId = id.to_string().parse().expect("uuid");
/// assert_eq!(id, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(Uuid);

impl InvoiceId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InvoiceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Item name shown on the invoice.
    pub name: String,
    /// Optional longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Units sold; always positive.
    pub quantity: u32,
    /// Unit price; never negative.
    pub price: Decimal,
    /// Percentage discount applied to the line, 0 to 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
}

impl InvoiceItem {
    /// Line amount after discount.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::InvoiceItem;
    /// use rust_decimal::Decimal;
    ///
    /// let item = InvoiceItem {
    ///     name: "Widget".into(),
    ///     description: None,
    ///     quantity: 2,
    ///     price: Decimal::new(1000, 2),
    ///     discount: Some(Decimal::new(10, 0)),
    /// };
    /// assert_eq!(item.line_total(), Some(Decimal::new(18, 0)));
    /// ```
    ///
    /// Returns `None` when the amount does not fit in a `Decimal`.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        let gross = self.price.checked_mul(Decimal::from(self.quantity))?;
        match self.discount {
            Some(discount) => gross
                .checked_mul(Decimal::ONE_HUNDRED.checked_sub(discount)?)?
                .checked_div(Decimal::ONE_HUNDRED),
            None => Some(gross),
        }
    }
}

/// Payment method tag understood by the billing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Cash.
    Cash,
    /// Bank deposit.
    Deposit,
    /// Bank transfer.
    Transfer,
    /// Cheque.
    Check,
    /// Credit card.
    CreditCard,
    /// Debit card.
    DebitCard,
    /// Anything else.
    Other,
}

/// Rejected payment method label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment method `{0}`")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "cash" => Ok(Self::Cash),
            "deposit" => Ok(Self::Deposit),
            "transfer" => Ok(Self::Transfer),
            "check" => Ok(Self::Check),
            "credit-card" => Ok(Self::CreditCard),
            "debit-card" => Ok(Self::DebitCard),
            "other" => Ok(Self::Other),
            _ => Err(UnknownPaymentMethod(s.to_owned())),
        }
    }
}

impl PaymentMethod {
    /// Wire label, identical to the serde form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Deposit => "deposit",
            Self::Transfer => "transfer",
            Self::Check => "check",
            Self::CreditCard => "credit-card",
            Self::DebitCard => "debit-card",
            Self::Other => "other",
        }
    }
}

/// A payment already received against the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Date the payment was received.
    pub date: NaiveDate,
    /// Amount received; always positive.
    pub amount: Decimal,
    /// How it was paid.
    pub method: PaymentMethod,
}

/// Who the invoice is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientReference {
    /// A contact the billing provider already knows.
    Linked(ProviderContactId),
    /// A new contact that must be provisioned before the invoice.
    Embedded(ContactDraft),
}

/// Commercial content of an invoice, independent of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceTerms {
    /// Lines in caller order.
    pub items: Vec<InvoiceItem>,
    /// Payments in caller order.
    pub payments: Vec<Payment>,
    /// Issue date.
    pub issue_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Caller-supplied total, checked against the lines.
    pub total: Decimal,
}

impl InvoiceTerms {
    /// Sum of the discounted line amounts, or `None` on overflow.
    #[must_use]
    pub fn computed_total(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
    }

    /// Collect every violation of the invoice invariants.
    #[must_use]
    pub fn violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.items.is_empty() {
            violations.push(FieldViolation::new("items", "must contain at least one item"));
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                violations.push(FieldViolation::new(
                    format!("items[{index}].name"),
                    "must not be empty",
                ));
            }
            if item.quantity == 0 {
                violations.push(FieldViolation::new(
                    format!("items[{index}].quantity"),
                    "must be a positive integer",
                ));
            }
            if item.price.is_sign_negative() {
                violations.push(FieldViolation::new(
                    format!("items[{index}].price"),
                    "must not be negative",
                ));
            }
            if let Some(discount) = item.discount {
                if discount.is_sign_negative() || discount > Decimal::ONE_HUNDRED {
                    violations.push(FieldViolation::new(
                        format!("items[{index}].discount"),
                        "must be a percentage between 0 and 100",
                    ));
                }
            }
            if item.line_total().is_none() {
                violations.push(FieldViolation::new(
                    format!("items[{index}].price"),
                    "amount out of range",
                ));
            }
        }
        for (index, payment) in self.payments.iter().enumerate() {
            if payment.amount <= Decimal::ZERO {
                violations.push(FieldViolation::new(
                    format!("payments[{index}].amount"),
                    "must be positive",
                ));
            }
        }
        if self.due_date < self.issue_date {
            violations.push(FieldViolation::new("dueDate", "must not be before date"));
        }
        if violations.is_empty() {
            match self.computed_total().map(|total| total.round_dp(2)) {
                None => violations.push(FieldViolation::new("total", "amount out of range")),
                Some(expected) if expected != self.total.round_dp(2) => {
                    violations.push(FieldViolation::new(
                        "total",
                        format!("does not match the item lines (expected {expected})"),
                    ));
                }
                Some(_) => {}
            }
        }
        violations
    }
}

/// Invoice payload as accepted from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    /// Client reference.
    pub client: ClientReference,
    /// Lines, payments, dates and total.
    pub terms: InvoiceTerms,
}

impl InvoiceDraft {
    /// Validate the whole draft, reporting every violation at once.
    ///
    /// # Errors
    /// Returns the collected [`FieldViolation`]s when any invariant fails.
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = match &self.client {
            ClientReference::Linked(_) => Vec::new(),
            ClientReference::Embedded(contact) => contact.violations("client"),
        };
        violations.extend(self.terms.violations());
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Canonical invoice record held by the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    /// Local identifier, assigned before any remote call.
    pub id: InvoiceId,
    /// Provider invoice id once the provider accepted the invoice.
    pub provider_id: Option<ProviderInvoiceId>,
    /// Provider's human-facing invoice number, when it issued one.
    pub provider_number: Option<String>,
    /// Provider-linked client.
    pub client: ProviderContactId,
    /// Lines, payments, dates and total.
    pub terms: InvoiceTerms,
    /// First local write.
    pub created_at: DateTime<Utc>,
    /// Last local write.
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Build a new, not yet synced invoice.
    #[must_use]
    pub fn create(
        id: InvoiceId,
        client: ProviderContactId,
        terms: InvoiceTerms,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            provider_id: None,
            provider_number: None,
            client,
            terms,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace client and terms, keeping identity and provider link.
    #[must_use]
    pub fn revise(&self, client: ProviderContactId, terms: InvoiceTerms, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            provider_id: self.provider_id.clone(),
            provider_number: self.provider_number.clone(),
            client,
            terms,
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Record the provider's identifiers on the local record.
    #[must_use]
    pub fn linked_to(
        &self,
        provider_id: ProviderInvoiceId,
        provider_number: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            provider_id: Some(provider_id),
            provider_number,
            updated_at: now,
            ..self.clone()
        }
    }
}

/// Invoice document returned by the billing provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteInvoice {
    /// Provider-issued identifier.
    pub provider_id: ProviderInvoiceId,
    /// Provider's invoice number, when present.
    pub number: Option<String>,
    /// Raw provider payload.
    pub document: Value,
}

/// Result of a single-invoice read, labelled with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub enum InvoiceLookup {
    /// Found in the local store; the provider was not contacted.
    Local(Invoice),
    /// Missing locally and served by the billing provider.
    Remote(RemoteInvoice),
}

/// Both invoice collections, deliberately left unmerged.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceListing {
    /// Every locally stored invoice.
    pub local: Vec<Invoice>,
    /// Every invoice the provider reports; empty when the provider failed.
    pub remote: Vec<RemoteInvoice>,
    /// `FullySynced` when both sources answered, `LocalOnly` otherwise.
    pub outcome: SyncOutcome,
}
