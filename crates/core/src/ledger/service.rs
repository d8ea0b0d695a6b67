//! Ledger entry generation and trial balance.

use std::collections::{BTreeMap, HashMap};

use racha_shared::types::{AccountId, CategoryId, Money};

use super::entry::{LedgerEntry, TrialBalanceItem};
use crate::model::{Account, Category, Transaction, TransactionKind};

/// Debit label for uncategorized expenses.
pub const EXPENSE_FALLBACK: &str = "Despesa";
/// Credit label for uncategorized income.
pub const INCOME_FALLBACK: &str = "Receita";
/// Debit label for transfers to an external destination.
pub const EXTERNAL_FALLBACK: &str = "Externo";

/// Stateless ledger derivation service.
///
/// Pure business logic over in-memory slices; callers load the records
/// from the store.
pub struct LedgerService;

impl LedgerService {
    /// Derives one debit/credit entry per qualifying transaction.
    ///
    /// Transactions are silently skipped (not errored on) when the amount
    /// is not positive, when the account reference does not resolve, or -
    /// for transfers - when a set destination does not resolve. Skipped
    /// transactions stay in the source data; integrity verification
    /// reports the orphaned ones separately.
    ///
    /// Entry mapping:
    /// - expense: debit = category name (or "Despesa"), credit = account
    /// - income: debit = account, credit = category name (or "Receita")
    /// - transfer: debit = destination (or "Externo"), credit = source
    ///
    /// Entries are sorted by date descending.
    #[must_use]
    pub fn generate(
        transactions: &[Transaction],
        accounts: &[Account],
        categories: &[Category],
    ) -> Vec<LedgerEntry> {
        let accounts_by_id: HashMap<AccountId, &Account> =
            accounts.iter().map(|a| (a.id, a)).collect();
        let categories_by_id: HashMap<CategoryId, &Category> =
            categories.iter().map(|c| (c.id, c)).collect();

        let mut entries: Vec<LedgerEntry> = transactions
            .iter()
            .filter_map(|txn| Self::derive_entry(txn, &accounts_by_id, &categories_by_id))
            .collect();

        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    fn derive_entry(
        txn: &Transaction,
        accounts: &HashMap<AccountId, &Account>,
        categories: &HashMap<CategoryId, &Category>,
    ) -> Option<LedgerEntry> {
        if txn.amount <= Money::ZERO {
            return None;
        }

        let category_name = |fallback: &str| {
            txn.category_id
                .and_then(|id| categories.get(&id))
                .map_or_else(|| fallback.to_string(), |c| c.name.clone())
        };

        let (debit_account, credit_account) = match txn.kind {
            TransactionKind::Expense { account_id } => {
                let account = accounts.get(&account_id?)?;
                (category_name(EXPENSE_FALLBACK), account.name.clone())
            }
            TransactionKind::Income { account_id } => {
                let account = accounts.get(&account_id?)?;
                (account.name.clone(), category_name(INCOME_FALLBACK))
            }
            TransactionKind::Transfer {
                account_id,
                destination_account_id,
            } => {
                let source = accounts.get(&account_id)?;
                let debit = match destination_account_id {
                    Some(id) => accounts.get(&id)?.name.clone(),
                    None => EXTERNAL_FALLBACK.to_string(),
                };
                (debit, source.name.clone())
            }
        };

        Some(LedgerEntry {
            date: txn.date,
            description: txn.description.clone(),
            debit_account,
            credit_account,
            amount: txn.amount,
        })
    }

    /// Accumulates debit and credit totals per account/category name.
    ///
    /// Every name appearing on either side of any entry gets one item,
    /// sorted alphabetically.
    #[must_use]
    pub fn trial_balance(entries: &[LedgerEntry]) -> Vec<TrialBalanceItem> {
        let mut buckets: BTreeMap<&str, (Money, Money)> = BTreeMap::new();

        for entry in entries {
            let debit = buckets.entry(&entry.debit_account).or_default();
            debit.0 += entry.amount;
            let credit = buckets.entry(&entry.credit_account).or_default();
            credit.1 += entry.amount;
        }

        buckets
            .into_iter()
            .map(|(name, (debit, credit))| TrialBalanceItem {
                name: name.to_string(),
                debit,
                credit,
                balance: debit - credit,
            })
            .collect()
    }
}
