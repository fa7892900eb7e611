use serde::{Deserialize, Serialize};

use super::Cents;

/// Built-in comparison table, embedded at compile time.
const REFERENCE_WEALTH_JSON: &str = include_str!("reference_wealth.json");

/// Net worth above this is considered financial freedom (1,000,000.00)
const FINANCIAL_FREEDOM_CENTS: Cents = 100_000_000;

/// One point on the wealth comparison scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceWealthPoint {
    pub label: String,
    pub amount_cents: Cents,
}

/// Fixed comparison dataset for the net worth feature. Loaded once at
/// startup, sorted richest-first, and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    points: Vec<ReferenceWealthPoint>,
}

impl ReferenceTable {
    pub fn new(mut points: Vec<ReferenceWealthPoint>) -> Self {
        points.sort_by(|a, b| b.amount_cents.cmp(&a.amount_cents));
        Self { points }
    }

    /// The table shipped with the binary.
    pub fn builtin() -> Self {
        let points: Vec<ReferenceWealthPoint> = serde_json::from_str(REFERENCE_WEALTH_JSON)
            .expect("embedded reference wealth table is valid JSON");
        Self::new(points)
    }

    /// Points in descending wealth order.
    pub fn points(&self) -> &[ReferenceWealthPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Where a net worth figure lands on the reference scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WealthComparison {
    /// 1-based position among reference points, richest first
    pub rank: usize,
    /// Reference point closest above the figure, if any
    pub nearest_above: Option<ReferenceWealthPoint>,
    /// Reference point closest at-or-below the figure, if any
    pub nearest_below: Option<ReferenceWealthPoint>,
    /// Position between the poorest and richest points, clamped to 0..=100
    pub relative_position: f64,
}

/// Rank a net worth figure against the reference table with a linear scan.
pub fn compare(
    table: &ReferenceTable,
    amount_cents: Cents,
) -> Result<WealthComparison, InvalidInputError> {
    if amount_cents < 0 {
        return Err(InvalidInputError::NegativeAmount {
            requested: amount_cents,
        });
    }

    let points = table.points();
    let above = points
        .iter()
        .filter(|p| p.amount_cents > amount_cents)
        .count();

    let nearest_above = if above > 0 { points.get(above - 1) } else { None };
    let nearest_below = points.get(above);

    let relative_position = match (points.first(), points.last()) {
        (Some(richest), Some(poorest)) if richest.amount_cents > poorest.amount_cents => {
            let span = (richest.amount_cents - poorest.amount_cents) as f64;
            ((amount_cents - poorest.amount_cents) as f64 / span * 100.0).clamp(0.0, 100.0)
        }
        (Some(richest), Some(_)) if amount_cents >= richest.amount_cents => 100.0,
        _ => 0.0,
    };

    Ok(WealthComparison {
        rank: above + 1,
        nearest_above: nearest_above.cloned(),
        nearest_below: nearest_below.cloned(),
        relative_position,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WealthTier {
    /// Net worth below zero
    InTheRed,
    /// Positive but under the financial freedom mark
    Building,
    /// At or above the financial freedom mark
    FinancialFreedom,
}

impl WealthTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            WealthTier::InTheRed => "in-the-red",
            WealthTier::Building => "building",
            WealthTier::FinancialFreedom => "financial-freedom",
        }
    }

    fn for_net(net: Cents) -> Self {
        if net < 0 {
            WealthTier::InTheRed
        } else if net < FINANCIAL_FREEDOM_CENTS {
            WealthTier::Building
        } else {
            WealthTier::FinancialFreedom
        }
    }
}

impl std::fmt::Display for WealthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetWorthSummary {
    pub assets_cents: Cents,
    pub liabilities_cents: Cents,
    pub net_cents: Cents,
    pub tier: WealthTier,
}

/// Net worth = assets - liabilities. Inputs must be non-negative; the net
/// itself may be negative.
pub fn net_worth(
    assets_cents: Cents,
    liabilities_cents: Cents,
) -> Result<NetWorthSummary, InvalidInputError> {
    for figure in [assets_cents, liabilities_cents] {
        if figure < 0 {
            return Err(InvalidInputError::NegativeAmount { requested: figure });
        }
    }

    let net_cents = assets_cents - liabilities_cents;
    Ok(NetWorthSummary {
        assets_cents,
        liabilities_cents,
        net_cents,
        tier: WealthTier::for_net(net_cents),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    NegativeAmount { requested: Cents },
}

impl std::fmt::Display for InvalidInputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidInputError::NegativeAmount { requested } => {
                write!(f, "figure must not be negative (got {} cents)", requested)
            }
        }
    }
}

impl std::error::Error for InvalidInputError {}
