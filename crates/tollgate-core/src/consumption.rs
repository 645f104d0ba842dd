//! Credit consumption types.
//!
//! A `CreditConsumption` is the priced breakdown of one usage report. It is
//! ephemeral: computed per deduction request and never persisted apart from
//! the resulting ledger transaction.

use serde::{Deserialize, Serialize};

/// What kind of usage a consumption item prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionKind {
    /// A tool invocation.
    ToolCall,

    /// Prompt tokens sent to a model.
    InputToken,

    /// Completion tokens produced by a model.
    OutputToken,
}

/// One priced line of a usage report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditConsumptionItem {
    /// The kind of usage.
    pub kind: ConsumptionKind,

    /// How many units were consumed.
    pub units: u64,

    /// Cost of this line in cents.
    pub amount_cents: i64,
}

/// The priced breakdown of one usage report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditConsumption {
    /// Per-kind line items.
    pub items: Vec<CreditConsumptionItem>,

    /// Sum of the item amounts, in cents.
    pub total_cents: i64,
}

impl CreditConsumption {
    /// Units recorded for a given kind (0 if the kind has no line).
    #[must_use]
    pub fn units(&self, kind: ConsumptionKind) -> u64 {
        self.items
            .iter()
            .find(|item| item.kind == kind)
            .map_or(0, |item| item.units)
    }

    /// A one-line description for the resulting ledger transaction.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Usage: {} tool calls, {} input tokens, {} output tokens",
            self.units(ConsumptionKind::ToolCall),
            self.units(ConsumptionKind::InputToken),
            self.units(ConsumptionKind::OutputToken),
        )
    }
}
