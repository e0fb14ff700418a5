use chrono::{NaiveDate, NaiveTime};
use charter_shared::money::{format_amount, round_for_display};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::legs::DistanceSource;

const IDENTITY_EPSILON: f64 = 1e-6;

/// The stored cost breakdown of a quote or booking.
///
/// Field names and the arithmetic between them are read back verbatim by
/// the quote and booking pages. Values keep full precision; see
/// [`Pricing::display`] for rounded amounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub base_flying_cost: f64,
    pub fuel_surcharge: f64,
    pub airport_fees: f64,
    pub crew_expenses: f64,
    /// base + fuel + airport + crew
    pub subtotal: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub discount_amount: f64,
    pub discounted_subtotal: f64,
    pub margin_amount: f64,
    pub margin_percentage: f64,
    pub tax_amount: f64,
    pub tax_rate: f64,
    pub tax_label: Option<String>,
    /// discountedSubtotal + margin + tax
    pub total_cost: f64,
    pub currency: String,
    #[serde(default)]
    pub used_default_pricing: bool,
    pub pricing_rule_id: Option<Uuid>,
}

impl Pricing {
    /// Whether both stored identities hold within floating-point tolerance.
    pub fn is_consistent(&self) -> bool {
        let subtotal = self.base_flying_cost + self.fuel_surcharge + self.airport_fees + self.crew_expenses;
        let total = self.discounted_subtotal + self.margin_amount + self.tax_amount;
        let discounted = self.subtotal - self.discount_amount;

        close(subtotal, self.subtotal)
            && close(discounted, self.discounted_subtotal)
            && close(total, self.total_cost)
    }

    /// Amounts rounded to the currency's minor unit, for presentation only.
    pub fn display(&self) -> DisplayPricing {
        let c = self.currency.as_str();
        DisplayPricing {
            base_flying_cost: round_for_display(self.base_flying_cost, c),
            fuel_surcharge: round_for_display(self.fuel_surcharge, c),
            airport_fees: round_for_display(self.airport_fees, c),
            crew_expenses: round_for_display(self.crew_expenses, c),
            subtotal: round_for_display(self.subtotal, c),
            discount_amount: round_for_display(self.discount_amount, c),
            margin_amount: round_for_display(self.margin_amount, c),
            tax_amount: round_for_display(self.tax_amount, c),
            total_cost: round_for_display(self.total_cost, c),
            formatted_total: format_amount(self.total_cost, c),
            currency: self.currency.clone(),
        }
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= IDENTITY_EPSILON * a.abs().max(b.abs()).max(1.0)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPricing {
    pub base_flying_cost: f64,
    pub fuel_surcharge: f64,
    pub airport_fees: f64,
    pub crew_expenses: f64,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub margin_amount: f64,
    pub tax_amount: f64,
    pub total_cost: f64,
    pub formatted_total: String,
    pub currency: String,
}

/// Per-leg line of a quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LegBreakdown {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub departure_time: Option<NaiveTime>,
    #[serde(rename = "distance")]
    pub distance_km: f64,
    pub distance_source: DistanceSource,
    pub flight_hours: f64,
    pub leg_cost: f64,
    pub fuel_surcharge: f64,
    pub airport_fees: f64,
    pub crew_expenses: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Pricing {
        Pricing {
            base_flying_cost: 12500.0,
            fuel_surcharge: 16000.0,
            airport_fees: 2000.0,
            crew_expenses: 0.0,
            subtotal: 30500.0,
            discount_percentage: 0.0,
            discount_amount: 0.0,
            discounted_subtotal: 30500.0,
            margin_amount: 3050.0,
            margin_percentage: 10.0,
            tax_amount: 6039.0,
            tax_rate: 18.0,
            tax_label: Some("GST".to_string()),
            total_cost: 39589.0,
            currency: "USD".to_string(),
            used_default_pricing: false,
            pricing_rule_id: None,
        }
    }

    #[test]
    fn test_consistency_check() {
        let mut pricing = sample();
        assert!(pricing.is_consistent());

        pricing.total_cost += 1.0;
        assert!(!pricing.is_consistent());
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["baseFlyingCost"], 12500.0);
        assert_eq!(json["totalCost"], 39589.0);
        assert_eq!(json["usedDefaultPricing"], false);
        assert!(json.get("base_flying_cost").is_none());
    }

    #[test]
    fn test_display_rounds_without_touching_stored_values() {
        let mut pricing = sample();
        pricing.tax_amount = 6039.004;
        pricing.total_cost = 39589.004;

        let display = pricing.display();
        assert_eq!(display.total_cost, 39589.0);
        assert_eq!(display.formatted_total, "USD 39589.00");
        assert_eq!(pricing.total_cost, 39589.004);
    }
}
