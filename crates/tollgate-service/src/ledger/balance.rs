//! Balance reads against the processor ledger.

use tollgate_core::{Balance, CustomerRef};

use crate::processor::{PaymentProcessor, ProcessorError};

/// Transactions fetched per processor call.
pub(crate) const PAGE_SIZE: u32 = 100;

/// Derive a customer's balance by folding their full transaction history.
///
/// Pages through the processor's list so the balance stays exact for
/// customers with more than one page of lifetime transactions. An empty
/// history folds to an all-zero balance.
pub(crate) async fn fetch_balance(
    processor: &dyn PaymentProcessor,
    customer_ref: &CustomerRef,
) -> Result<Balance, ProcessorError> {
    let mut balance = Balance::zero();
    let mut cursor: Option<String> = None;

    loop {
        let page = processor
            .list_balance_transactions(customer_ref, PAGE_SIZE, cursor.as_deref())
            .await?;

        for tx in &page.transactions {
            balance.apply(tx);
        }

        cursor = page.transactions.last().map(|tx| tx.id.clone());

        // A processor reporting has_more with an empty page would loop forever.
        if !page.has_more || cursor.is_none() {
            break;
        }
    }

    Ok(balance)
}
