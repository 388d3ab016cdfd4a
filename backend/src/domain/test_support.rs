//! Shared fixtures for domain unit tests.

use chrono::{DateTime, Local, NaiveDate, Utc};
use mockable::Clock;
use rust_decimal::Decimal;

use super::{InvoiceItem, InvoiceTerms};

/// Clock pinned to 2026-01-01T00:00:00Z.
pub(crate) struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_767_225_600, 0).expect("fixture timestamp")
    }
}

/// One item at 10 x 2 with a matching total of 20.
pub(crate) fn simple_terms() -> InvoiceTerms {
    let issue_date = NaiveDate::from_ymd_opt(2026, 1, 15).expect("valid date");
    InvoiceTerms {
        items: vec![InvoiceItem {
            name: "Consulting".to_owned(),
            description: Some("January retainer".to_owned()),
            quantity: 2,
            price: Decimal::new(10, 0),
            discount: None,
        }],
        payments: Vec::new(),
        issue_date,
        due_date: issue_date,
        total: Decimal::new(20, 0),
    }
}
