use charter_quote::{DisplayPricing, Exclusion, SearchOutcome, SearchResult};
use serde::Serialize;

/// A priced aircraft as returned to search clients, with rounded amounts
/// alongside the stored full-precision breakdown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultView {
    #[serde(flatten)]
    pub result: SearchResult,
    pub display: DisplayPricing,
}

impl From<SearchResult> for SearchResultView {
    fn from(result: SearchResult) -> Self {
        let display = result.pricing.display();
        Self { result, display }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultView>,
    pub excluded: Vec<Exclusion>,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            results: outcome.results.into_iter().map(SearchResultView::from).collect(),
            excluded: outcome.excluded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charter_catalog::AircraftCategory;
    use charter_quote::{AircraftSummary, Pricing};
    use uuid::Uuid;

    fn result(total_cost: f64) -> SearchResult {
        SearchResult {
            aircraft: AircraftSummary {
                id: Uuid::new_v4(),
                name: "Phenom 300".to_string(),
                tail_number: "VT-PHN".to_string(),
                category: AircraftCategory::Light,
                seats: Some(6),
            },
            pricing: Pricing {
                base_flying_cost: total_cost,
                fuel_surcharge: 0.0,
                airport_fees: 0.0,
                crew_expenses: 0.0,
                subtotal: total_cost,
                discount_percentage: 0.0,
                discount_amount: 0.0,
                discounted_subtotal: total_cost,
                margin_amount: 0.0,
                margin_percentage: 0.0,
                tax_amount: 0.0,
                tax_rate: 0.0,
                tax_label: None,
                total_cost,
                currency: "USD".to_string(),
                used_default_pricing: true,
                pricing_rule_id: None,
            },
            legs: Vec::new(),
            used_default_pricing: true,
        }
    }

    #[test]
    fn test_search_response_shape() {
        let outcome = SearchOutcome {
            results: vec![result(12345.678)],
            excluded: vec![Exclusion {
                aircraft_id: Uuid::nil(),
                aircraft_name: "Grounded".to_string(),
                code: "AIRCRAFT_INACTIVE".to_string(),
                reason: "Aircraft Grounded is not available for charter".to_string(),
            }],
        };

        let json = serde_json::to_value(SearchResponse::from(outcome)).unwrap();
        let first = &json["results"][0];
        assert_eq!(first["usedDefaultPricing"], true);
        assert_eq!(first["pricing"]["totalCost"], 12345.678);
        assert_eq!(first["display"]["totalCost"], 12345.68);
        assert_eq!(first["display"]["formattedTotal"], "USD 12345.68");
        assert_eq!(json["excluded"][0]["aircraftId"], Uuid::nil().to_string());
        assert_eq!(json["excluded"][0]["code"], "AIRCRAFT_INACTIVE");
    }
}
