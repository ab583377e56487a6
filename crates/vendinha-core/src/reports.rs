//! # Reports
//!
//! Dashboard figures computed from the sales history.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::store::LedgerStore;
use crate::types::Sale;

/// Days shown on the sales chart.
pub const DEFAULT_CHART_DAYS: usize = 7;

/// Sales shown in the "latest sales" list.
pub const DEFAULT_RECENT_SALES: usize = 5;

/// Sales total of one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: Money,
}

/// Everything the dashboard shows, in one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_sales: Money,
    pub total_receivable: Money,
    pub total_payable: Money,
    pub daily_totals: Vec<DailyTotal>,
    pub recent_sales: Vec<Sale>,
}

/// Sum of every sale total.
pub fn total_sales(sales: &[Sale]) -> Money {
    sales.iter().map(|s| s.total).sum()
}

/// Totals per day for the last `days` days that had sales, oldest first.
pub fn daily_totals(sales: &[Sale], days: usize) -> Vec<DailyTotal> {
    let mut by_day: BTreeMap<NaiveDate, Money> = BTreeMap::new();
    for sale in sales {
        *by_day.entry(sale.timestamp.date_naive()).or_default() += sale.total;
    }

    let skip = by_day.len().saturating_sub(days);
    by_day
        .into_iter()
        .skip(skip)
        .map(|(date, total)| DailyTotal { date, total })
        .collect()
}

/// The last `count` sales, newest first.
pub fn recent_sales(sales: &[Sale], count: usize) -> Vec<&Sale> {
    sales.iter().rev().take(count).collect()
}

impl Dashboard {
    pub fn build(ledger: &LedgerStore) -> Self {
        Dashboard {
            total_sales: total_sales(ledger.sales()),
            total_receivable: ledger.total_receivable(),
            total_payable: ledger.total_payable(),
            daily_totals: daily_totals(ledger.sales(), DEFAULT_CHART_DAYS),
            recent_sales: recent_sales(ledger.sales(), DEFAULT_RECENT_SALES)
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;
    use chrono::{TimeZone, Utc};

    fn sale(id: &str, day: u32, cents: i64) -> Sale {
        Sale {
            id: id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, day, 14, 30, 0).unwrap(),
            client_id: "0".to_string(),
            client_name: "NI".to_string(),
            items: Vec::new(),
            total: Money::from_cents(cents),
            payment_method: PaymentMethod::Cash,
            amount_paid: Money::from_cents(cents),
            change: Money::zero(),
        }
    }

    #[test]
    fn test_total_sales() {
        let sales = vec![sale("a", 1, 1000), sale("b", 1, 250)];
        assert_eq!(total_sales(&sales), Money::from_cents(1250));
        assert_eq!(total_sales(&[]), Money::zero());
    }

    #[test]
    fn test_daily_totals_keeps_last_days() {
        let sales: Vec<Sale> = (1..=9)
            .map(|d| sale(&format!("s{}", d), d, 100 * d as i64))
            .chain(std::iter::once(sale("extra", 9, 50)))
            .collect();

        let days = daily_totals(&sales, 7);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert_eq!(days[6].total, Money::from_cents(950));
    }

    #[test]
    fn test_recent_sales_newest_first() {
        let sales: Vec<Sale> = (1..=7).map(|d| sale(&format!("s{}", d), d, 100)).collect();
        let recent = recent_sales(&sales, 5);
        let ids: Vec<&str> = recent.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s7", "s6", "s5", "s4", "s3"]);
    }

    #[test]
    fn test_dashboard_from_seed() {
        let (_, ledger) = crate::seed::ShopData::seed().into_stores();
        let dashboard = Dashboard::build(&ledger);
        assert_eq!(dashboard.total_sales, Money::zero());
        assert_eq!(dashboard.total_receivable, Money::from_cents(5000));
        assert_eq!(dashboard.total_payable, Money::from_cents(7600));
        assert!(dashboard.recent_sales.is_empty());
    }
}
