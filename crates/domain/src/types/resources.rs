//! Typed Ponto resources
//!
//! Each type is decoded from a JSON:API resource's `attributes` object; the
//! resource `id` lives outside the attributes and is injected through
//! [`Identified`].

use serde::{Deserialize, Serialize};

use crate::constants::{SYNC_STATUS_ERROR, SYNC_STATUS_SUCCESS};

/// Resources that carry the identity of their JSON:API envelope
pub trait Identified {
    /// Store the envelope id on the decoded value
    fn set_id(&mut self, id: String);
}

macro_rules! impl_identified {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Identified for $ty {
                fn set_id(&mut self, id: String) {
                    self.id = id;
                }
            }
        )+
    };
}

impl_identified!(
    Account,
    Transaction,
    PendingTransaction,
    Synchronization,
    FinancialInstitution,
    Organization,
);

/// A bank account linked to the organization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    pub id: String,
    pub description: String,
    /// IBAN or other account reference
    pub reference: String,
    pub product: String,
    pub currency: String,
    pub current_balance: f64,
    pub available_balance: f64,
    pub deprecated: bool,
}

/// A booked transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub counterpart_name: String,
    pub counterpart_reference: String,
    pub remittance_information: String,
    pub remittance_information_type: String,
    pub end_to_end_id: String,
    pub internal_reference: String,
    pub bank_transaction_code: String,
    pub execution_date: String,
    pub value_date: String,
}

/// A transaction the bank has not booked yet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PendingTransaction {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub counterpart_name: String,
    pub counterpart_reference: String,
    pub remittance_information: String,
    pub value_date: String,
}

/// Error reported by a failed synchronization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncError {
    pub code: String,
    pub message: String,
}

/// A synchronization of account data with the bank
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Synchronization {
    pub id: String,
    pub subtype: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SyncError>,
}

impl Synchronization {
    /// Whether the synchronization has reached `success` or `error`
    pub fn is_terminal(&self) -> bool {
        self.status == SYNC_STATUS_SUCCESS || self.status == SYNC_STATUS_ERROR
    }
}

/// A bank supported by Ponto
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialInstitution {
    pub id: String,
    pub name: String,
    pub country: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_to: Option<String>,
}

/// The organization the integration belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    pub id: String,
    pub name: String,
}
