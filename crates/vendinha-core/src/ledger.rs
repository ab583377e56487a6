//! # Ledger Operations
//!
//! Receivables (what clients owe the shop) and payables (what the shop owes).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Receivables                           Payables                         │
//! │  ───────────                           ────────                         │
//! │  DEBT checkout  → balance -= total     add_store_debt  → unpaid debt    │
//! │  settle         → balance += amount    reconcile       → unpaid debt    │
//! │                                        mark_debt_paid  → paid (final)   │
//! │                                                                         │
//! │  total_receivable = Σ |balance| of     total_payable = Σ amount of      │
//! │                     clients below 0                    unpaid debts     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::new_id;
use crate::store::LedgerStore;
use crate::types::{Client, StoreDebt};
use crate::validation::{
    validate_client_name, validate_debt_amount, validate_debt_title, validate_settlement_amount,
};

/// Input of the client registration form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl LedgerStore {
    // =========================================================================
    // Receivables
    // =========================================================================

    /// Registers a new client with a zero balance.
    pub fn register_client(&mut self, draft: ClientDraft) -> CoreResult<Client> {
        validate_client_name(&draft.name)?;

        let client = Client {
            id: new_id(),
            name: draft.name.trim().to_string(),
            balance: Money::zero(),
            phone: non_blank(draft.phone),
            cpf: non_blank(draft.cpf),
            address: non_blank(draft.address),
        };

        info!(client_id = %client.id, name = %client.name, "Client registered");
        self.push_client(client.clone());
        Ok(client)
    }

    /// Records a payment from a client: `balance += amount`.
    ///
    /// No ceiling: paying more than owed leaves the client with credit.
    ///
    /// ## Returns
    /// The new balance.
    pub fn settle_receivable(&mut self, client_id: &str, amount: Money) -> CoreResult<Money> {
        validate_settlement_amount(amount)?;

        let client = self
            .client_mut(client_id)
            .ok_or_else(|| CoreError::ClientNotFound(client_id.to_string()))?;
        client.balance += amount;

        info!(client_id = %client_id, amount = %amount, balance = %client.balance, "Receivable settled");
        Ok(client.balance)
    }

    /// Clients that owe the shop, in registration order.
    pub fn debtors(&self) -> Vec<&Client> {
        self.clients().iter().filter(|c| c.is_debtor()).collect()
    }

    /// Total owed to the shop.
    pub fn total_receivable(&self) -> Money {
        self.debtors().iter().map(|c| c.balance.abs()).sum()
    }

    // =========================================================================
    // Payables
    // =========================================================================

    /// Records a bill typed in by the operator, due now.
    pub fn add_store_debt(&mut self, title: &str, amount: Money) -> CoreResult<StoreDebt> {
        validate_debt_title(title)?;
        validate_debt_amount(amount)?;

        let debt = StoreDebt {
            id: new_id(),
            title: title.trim().to_string(),
            amount,
            due_date: Utc::now(),
            is_paid: false,
            is_recurring: false,
            proof_image: None,
        };

        info!(debt_id = %debt.id, title = %debt.title, amount = %amount, "Store debt added");
        self.push_store_debt(debt.clone());
        Ok(debt)
    }

    /// Flags a debt as paid. There is no way back to unpaid.
    pub fn mark_debt_paid(&mut self, debt_id: &str) -> CoreResult<()> {
        let debt = self
            .store_debt_mut(debt_id)
            .ok_or_else(|| CoreError::DebtNotFound(debt_id.to_string()))?;

        if debt.is_paid {
            return Err(CoreError::DebtAlreadyPaid(debt_id.to_string()));
        }
        debt.is_paid = true;

        info!(debt_id = %debt_id, amount = %debt.amount, "Store debt paid");
        Ok(())
    }

    /// Debts not yet paid, in creation order.
    pub fn open_debts(&self) -> Vec<&StoreDebt> {
        self.store_debts().iter().filter(|d| !d.is_paid).collect()
    }

    /// Total the shop still has to pay.
    pub fn total_payable(&self) -> Money {
        self.open_debts().iter().map(|d| d.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::ShopData;

    fn ledger() -> LedgerStore {
        ShopData::seed().into_stores().1
    }

    #[test]
    fn test_register_client() {
        let mut ledger = ledger();
        let client = ledger
            .register_client(ClientDraft {
                name: " Ana Lima ".to_string(),
                phone: Some("".to_string()),
                ..ClientDraft::default()
            })
            .unwrap();

        assert_eq!(client.name, "Ana Lima");
        assert_eq!(client.balance, Money::zero());
        assert!(client.phone.is_none());
        assert_eq!(ledger.clients().len(), 4);

        assert!(ledger.register_client(ClientDraft::default()).is_err());
    }

    #[test]
    fn test_settle_receivable() {
        let mut ledger = ledger();
        assert_eq!(ledger.total_receivable(), Money::from_cents(5000));

        let balance = ledger.settle_receivable("1", Money::from_cents(2000)).unwrap();
        assert_eq!(balance, Money::from_cents(-3000));
        assert_eq!(ledger.total_receivable(), Money::from_cents(3000));

        // Overpaying leaves credit and drops the client from the debtors
        ledger.settle_receivable("1", Money::from_cents(5000)).unwrap();
        assert_eq!(ledger.client("1").unwrap().balance, Money::from_cents(2000));
        assert!(ledger.debtors().is_empty());

        assert!(matches!(
            ledger.settle_receivable("99", Money::from_cents(1)),
            Err(CoreError::ClientNotFound(_))
        ));
        assert!(ledger.settle_receivable("1", Money::zero()).is_err());
    }

    #[test]
    fn test_payables() {
        let mut ledger = ledger();
        // Seed: DAS MEI 76.00 unpaid, Luz 250.00 paid
        assert_eq!(ledger.total_payable(), Money::from_cents(7600));

        let debt = ledger.add_store_debt("Aluguel", Money::from_cents(80000)).unwrap();
        assert!(!debt.is_paid);
        assert_eq!(ledger.total_payable(), Money::from_cents(87600));

        ledger.mark_debt_paid(&debt.id).unwrap();
        assert_eq!(ledger.total_payable(), Money::from_cents(7600));

        assert!(matches!(
            ledger.mark_debt_paid(&debt.id),
            Err(CoreError::DebtAlreadyPaid(_))
        ));
        assert!(ledger.store_debt(&debt.id).unwrap().is_paid);
    }

    #[test]
    fn test_add_store_debt_validation() {
        let mut ledger = ledger();
        assert!(ledger.add_store_debt("", Money::from_cents(100)).is_err());
        assert!(ledger.add_store_debt("Água", Money::zero()).is_err());
        assert!(matches!(
            ledger.mark_debt_paid("nope"),
            Err(CoreError::DebtNotFound(_))
        ));
    }
}
