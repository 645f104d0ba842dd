//! Usage pricing.
//!
//! Converts raw usage counters into a signed cost in integer cents.

use serde::{Deserialize, Serialize};

use crate::{ConsumptionKind, CreditConsumption, CreditConsumptionItem};

/// Prices for the three metered usage kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTable {
    /// Cost per tool call, in cents.
    pub tool_call_cents: i64,

    /// Cost per 1 million input tokens, in cents.
    pub input_cents_per_million: i64,

    /// Cost per 1 million output tokens, in cents.
    pub output_cents_per_million: i64,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            tool_call_cents: 1,
            input_cents_per_million: 300,   // $3.00 per 1M input tokens
            output_cents_per_million: 1500, // $15.00 per 1M output tokens
        }
    }
}

impl PriceTable {
    /// Price a usage report into a per-kind breakdown.
    ///
    /// Token lines round to the nearest cent with a floor of 1 cent whenever
    /// the token count is non-zero, so small usage never rounds to free.
    /// Pure function; absent counters are reported as 0 by the caller.
    #[must_use]
    pub fn price_usage(
        &self,
        tool_calls: u64,
        input_tokens: u64,
        output_tokens: u64,
    ) -> CreditConsumption {
        let items = vec![
            CreditConsumptionItem {
                kind: ConsumptionKind::ToolCall,
                units: tool_calls,
                amount_cents: saturating_units(tool_calls) * self.tool_call_cents,
            },
            CreditConsumptionItem {
                kind: ConsumptionKind::InputToken,
                units: input_tokens,
                amount_cents: token_cost(input_tokens, self.input_cents_per_million),
            },
            CreditConsumptionItem {
                kind: ConsumptionKind::OutputToken,
                units: output_tokens,
                amount_cents: token_cost(output_tokens, self.output_cents_per_million),
            },
        ];

        let total_cents = items.iter().map(|item| item.amount_cents).sum();

        CreditConsumption { items, total_cents }
    }
}

fn saturating_units(units: u64) -> i64 {
    i64::try_from(units).unwrap_or(i64::MAX)
}

/// Token cost in cents, rounded to nearest with a 1-cent floor for non-zero counts.
fn token_cost(tokens: u64, cents_per_million: i64) -> i64 {
    if tokens == 0 {
        return 0;
    }

    let cost = saturating_units(tokens)
        .saturating_mul(cents_per_million)
        .saturating_add(500_000)
        / 1_000_000;
    cost.max(1)
}
