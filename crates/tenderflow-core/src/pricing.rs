//! Commercial pricing: per-line totals, service add-ons, and tax.

use serde::{Deserialize, Serialize};

use crate::quote::{LineItem, QuoteResult};
use crate::scoring::StrategicAnalysis;

/// Fixed service rate card. The line formula only applies the testing
/// surcharge; `logistics` is on the card for manual quoting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateCard {
    pub testing: f64,
    pub logistics: f64,
    pub tax_rate: f64,
}

impl Default for RateCard {
    fn default() -> Self {
        Self {
            testing: 5000.0,
            logistics: 2000.0,
            tax_rate: 0.18,
        }
    }
}

/// Pricing annotation attached to a line item by the calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pricing {
    pub unit_price: f64,
    pub quantity: f64,
    pub service_add_ons: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommercialSummary {
    pub subtotal: f64,
    pub tax: f64,
    pub grand_total: f64,
}

impl CommercialSummary {
    pub fn zero() -> Self {
        Self {
            subtotal: 0.0,
            tax: 0.0,
            grand_total: 0.0,
        }
    }
}

/// Static price fallback for recommendations that carry no catalog price
/// (sentinels, externally sourced SKUs). Unknown SKUs price at zero.
fn fallback_price(sku: &str) -> f64 {
    match sku {
        "CABLE-A1" => 4500.0,
        "CABLE-B2" => 850.0,
        _ => 0.0,
    }
}

/// Price every line item and assemble the final quote.
///
/// `total_price = unit_price * quantity + service_add_ons` per item;
/// `grand_total = subtotal * (1 + tax_rate)` exactly.
pub fn price_quote(
    summary: String,
    raw_text_snippet: String,
    strategic_analysis: StrategicAnalysis,
    line_items: Vec<LineItem>,
    rates: &RateCard,
) -> QuoteResult {
    let mut subtotal = 0.0;

    let priced: Vec<LineItem> = line_items
        .into_iter()
        .map(|mut item| {
            let unit_price = item
                .recommendation
                .price
                .unwrap_or_else(|| fallback_price(&item.recommendation.sku));
            let quantity = item.requirement.quantity;
            let service_add_ons = rates.testing;
            let total_price = unit_price * quantity + service_add_ons;

            subtotal += total_price;
            item.pricing = Some(Pricing {
                unit_price,
                quantity,
                service_add_ons,
                total_price,
            });
            item
        })
        .collect();

    QuoteResult {
        summary,
        strategic_analysis,
        line_items: priced,
        commercial_summary: CommercialSummary {
            subtotal,
            tax: subtotal * rates.tax_rate,
            grand_total: subtotal * (1.0 + rates.tax_rate),
        },
        raw_text_snippet,
    }
}
