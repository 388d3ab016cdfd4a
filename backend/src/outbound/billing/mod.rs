//! Billing provider outbound adapter.
//!
//! This module provides the HTTP implementation of the `BillingProvider` port.

mod dto;
mod http_client;

pub use http_client::{DEFAULT_BILLING_BASE_URL, DEFAULT_BILLING_TIMEOUT, HttpBillingProvider};
