use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::aircraft::{Aircraft, AircraftCategory};
use crate::CatalogError;

/// Taxi, climb and descent allowance added to raw flight time when a rule
/// does not set one.
pub const DEFAULT_FLIGHT_TIME_BUFFER_HOURS: f64 = 0.5;

/// Fee fields. `None` means "not configured" and prices as zero unless an
/// aircraft-level cost fills it in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeeStructure {
    pub fuel_surcharge_per_km: Option<f64>,
    pub airport_fee_per_leg: Option<f64>,
    pub ground_handling_per_leg: Option<f64>,
    pub crew_expense_per_hour: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MultiLegRules {
    pub max_legs: Option<usize>,
    pub min_layover_hours: Option<f64>,
    /// Percentage taken off the pre-margin subtotal
    pub multi_leg_discount: Option<f64>,
    /// Discount applies once the leg count exceeds this value
    pub apply_discount_after_legs: Option<usize>,
}

impl MultiLegRules {
    /// Discount percentage for a trip of `leg_count` legs, 0 when it does not apply.
    pub fn discount_for(&self, leg_count: usize) -> f64 {
        match (self.apply_discount_after_legs, self.multi_leg_discount) {
            (Some(threshold), Some(pct)) if leg_count > threshold && pct > 0.0 => pct,
            _ => 0.0,
        }
    }
}

/// Which aircraft a rule applies to, from least to most specific.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleScope {
    #[default]
    Global,
    Category { categories: Vec<AircraftCategory> },
    Aircraft { aircraft_ids: Vec<Uuid> },
}

impl RuleScope {
    pub fn specificity(&self) -> u8 {
        match self {
            RuleScope::Global => 0,
            RuleScope::Category { .. } => 1,
            RuleScope::Aircraft { .. } => 2,
        }
    }

    pub fn matches(&self, aircraft: &Aircraft) -> bool {
        match self {
            RuleScope::Global => true,
            RuleScope::Category { categories } => categories.contains(&aircraft.category),
            RuleScope::Aircraft { aircraft_ids } => aircraft_ids.contains(&aircraft.id),
        }
    }
}

/// Administrator-configured fee, margin, tax and discount bundle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingRule {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub scope: RuleScope,
    pub margin_percentage: Option<f64>,
    #[serde(default)]
    pub margin_by_aircraft_type: BTreeMap<AircraftCategory, f64>,
    pub tax_rate: Option<f64>,
    pub tax_label: Option<String>,
    #[serde(default)]
    pub fees: FeeStructure,
    #[serde(default)]
    pub multi_leg: MultiLegRules,
    pub default_currency: Option<String>,
    pub flight_time_buffer_hours: Option<f64>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingRule {
    /// The documented fallback used when no configured rule applies:
    /// no margin, no tax, no fees, no discount.
    pub fn fallback() -> Self {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        Self {
            id: Uuid::nil(),
            name: "default".to_string(),
            is_active: true,
            priority: 0,
            scope: RuleScope::Global,
            margin_percentage: None,
            margin_by_aircraft_type: BTreeMap::new(),
            tax_rate: None,
            tax_label: None,
            fees: FeeStructure::default(),
            multi_leg: MultiLegRules::default(),
            default_currency: None,
            flight_time_buffer_hours: None,
            valid_from: None,
            valid_until: None,
            created_at: epoch,
            updated_at: epoch,
        }
    }

    /// Category override when present and non-zero, else the global margin.
    pub fn margin_for(&self, category: AircraftCategory) -> f64 {
        match self.margin_by_aircraft_type.get(&category) {
            Some(m) if *m != 0.0 => *m,
            _ => self.margin_percentage.unwrap_or(0.0),
        }
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate.unwrap_or(0.0)
    }

    pub fn buffer_hours_or(&self, default: f64) -> f64 {
        self.flight_time_buffer_hours.unwrap_or(default)
    }

    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        let after_start = self.valid_from.map_or(true, |from| date >= from);
        let before_end = self.valid_until.map_or(true, |until| date <= until);
        after_start && before_end
    }

    pub fn applies_to(&self, aircraft: &Aircraft, date: NaiveDate) -> bool {
        self.is_active && self.is_valid_on(date) && self.scope.matches(aircraft)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::InvalidRule("name is required".to_string()));
        }

        let percentages = [
            ("margin percentage", self.margin_percentage),
            ("tax rate", self.tax_rate),
            ("multi-leg discount", self.multi_leg.multi_leg_discount),
        ];
        for (label, value) in percentages {
            if let Some(v) = value {
                if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                    return Err(CatalogError::InvalidRule(format!(
                        "{} must be between 0 and 100, got {}",
                        label, v
                    )));
                }
            }
        }
        for (category, v) in &self.margin_by_aircraft_type {
            if !v.is_finite() || !(0.0..=100.0).contains(v) {
                return Err(CatalogError::InvalidRule(format!(
                    "margin for {} must be between 0 and 100, got {}",
                    category, v
                )));
            }
        }

        let amounts = [
            ("fuel surcharge per km", self.fees.fuel_surcharge_per_km),
            ("airport fee per leg", self.fees.airport_fee_per_leg),
            ("ground handling per leg", self.fees.ground_handling_per_leg),
            ("crew expense per hour", self.fees.crew_expense_per_hour),
            ("minimum layover", self.multi_leg.min_layover_hours),
            ("flight time buffer", self.flight_time_buffer_hours),
        ];
        for (label, value) in amounts {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(CatalogError::InvalidRule(format!(
                        "{} must be non-negative, got {}",
                        label, v
                    )));
                }
            }
        }

        if self.multi_leg.max_legs == Some(0) {
            return Err(CatalogError::InvalidRule("max legs must be at least 1".to_string()));
        }
        if let (Some(from), Some(until)) = (self.valid_from, self.valid_until) {
            if from > until {
                return Err(CatalogError::InvalidRule(format!(
                    "validity window starts {} after it ends {}",
                    from, until
                )));
            }
        }
        Ok(())
    }
}

/// Administrator input for creating or replacing a pricing rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPricingRule {
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub scope: RuleScope,
    pub margin_percentage: Option<f64>,
    #[serde(default)]
    pub margin_by_aircraft_type: BTreeMap<AircraftCategory, f64>,
    pub tax_rate: Option<f64>,
    pub tax_label: Option<String>,
    #[serde(default)]
    pub fees: FeeStructure,
    #[serde(default)]
    pub multi_leg: MultiLegRules,
    pub default_currency: Option<String>,
    pub flight_time_buffer_hours: Option<f64>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
}

fn default_active() -> bool {
    true
}

impl NewPricingRule {
    pub fn into_rule(self, id: Uuid, created_at: DateTime<Utc>) -> PricingRule {
        PricingRule {
            id,
            name: self.name.trim().to_string(),
            is_active: self.is_active,
            priority: self.priority,
            scope: self.scope,
            margin_percentage: self.margin_percentage,
            margin_by_aircraft_type: self.margin_by_aircraft_type,
            tax_rate: self.tax_rate,
            tax_label: self.tax_label,
            fees: self.fees,
            multi_leg: self.multi_leg,
            default_currency: self.default_currency.map(|c| c.trim().to_ascii_uppercase()),
            flight_time_buffer_hours: self.flight_time_buffer_hours,
            valid_from: self.valid_from,
            valid_until: self.valid_until,
            created_at,
            updated_at: created_at,
        }
    }
}

impl PricingRule {
    /// Replace every editable field, keeping identity and creation time.
    pub fn apply(&mut self, input: NewPricingRule) {
        let id = self.id;
        let created_at = self.created_at;
        *self = input.into_rule(id, created_at);
        self.updated_at = Utc::now();
    }
}

/// Outcome of rule resolution. `Default` is the tagged "no applicable rule"
/// case and must be surfaced to callers as such.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedRule<'a> {
    Configured(&'a PricingRule),
    Default(PricingRule),
}

impl ResolvedRule<'_> {
    pub fn rule(&self) -> &PricingRule {
        match self {
            ResolvedRule::Configured(rule) => rule,
            ResolvedRule::Default(rule) => rule,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ResolvedRule::Default(_))
    }

    pub fn rule_id(&self) -> Option<Uuid> {
        match self {
            ResolvedRule::Configured(rule) => Some(rule.id),
            ResolvedRule::Default(_) => None,
        }
    }
}

/// Pick the pricing rule for `aircraft` on `date`.
///
/// Aircraft-specific beats category-level beats global. Ties go to the
/// higher priority, then the later `valid_from`, then the lower id.
pub fn resolve_active_rule<'a>(
    rules: &'a [PricingRule],
    aircraft: &Aircraft,
    date: NaiveDate,
) -> ResolvedRule<'a> {
    rules
        .iter()
        .filter(|rule| rule.applies_to(aircraft, date))
        .max_by(|a, b| compare_specificity(a, b))
        .map(ResolvedRule::Configured)
        .unwrap_or_else(|| ResolvedRule::Default(PricingRule::fallback()))
}

fn compare_specificity(a: &PricingRule, b: &PricingRule) -> Ordering {
    a.scope
        .specificity()
        .cmp(&b.scope.specificity())
        .then(a.priority.cmp(&b.priority))
        .then(a.valid_from.cmp(&b.valid_from))
        .then(b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::NewAircraft;

    fn aircraft(category: AircraftCategory) -> Aircraft {
        NewAircraft {
            name: "Test Jet".to_string(),
            tail_number: "N100".to_string(),
            category,
            hourly_rate: 5000.0,
            currency: Some("USD".to_string()),
            commission_percentage: 0.0,
            operating_costs: Default::default(),
            specs: Default::default(),
            passenger_capacity: Some(8),
            cruise_speed: Some(800.0),
            is_active: true,
        }
        .into_aircraft(Uuid::new_v4(), Utc::now())
    }

    fn rule(name: &str, scope: RuleScope) -> PricingRule {
        PricingRule {
            id: Uuid::new_v4(),
            name: name.to_string(),
            is_active: true,
            scope,
            margin_percentage: Some(10.0),
            ..PricingRule::fallback()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_most_specific_rule_wins() {
        let jet = aircraft(AircraftCategory::Mid);
        let rules = vec![
            rule("global", RuleScope::Global),
            rule("mid", RuleScope::Category { categories: vec![AircraftCategory::Mid] }),
            rule("this jet", RuleScope::Aircraft { aircraft_ids: vec![jet.id] }),
        ];

        let resolved = resolve_active_rule(&rules, &jet, date(2026, 5, 1));
        assert_eq!(resolved.rule().name, "this jet");
        assert!(!resolved.is_default());

        let other = aircraft(AircraftCategory::Mid);
        assert_eq!(resolve_active_rule(&rules, &other, date(2026, 5, 1)).rule().name, "mid");

        let heavy = aircraft(AircraftCategory::Large);
        assert_eq!(resolve_active_rule(&rules, &heavy, date(2026, 5, 1)).rule().name, "global");
    }

    #[test]
    fn test_priority_breaks_ties() {
        let jet = aircraft(AircraftCategory::Light);
        let mut low = rule("low", RuleScope::Global);
        low.priority = 1;
        let mut high = rule("high", RuleScope::Global);
        high.priority = 5;
        let rules = vec![low, high];

        assert_eq!(resolve_active_rule(&rules, &jet, date(2026, 1, 1)).rule().name, "high");
    }

    #[test]
    fn test_inactive_and_out_of_window_rules_are_skipped() {
        let jet = aircraft(AircraftCategory::Light);
        let mut inactive = rule("inactive", RuleScope::Aircraft { aircraft_ids: vec![jet.id] });
        inactive.is_active = false;
        let mut expired = rule("expired", RuleScope::Category { categories: vec![AircraftCategory::Light] });
        expired.valid_until = Some(date(2025, 12, 31));
        let mut seasonal = rule("seasonal", RuleScope::Global);
        seasonal.valid_from = Some(date(2026, 1, 1));
        seasonal.valid_until = Some(date(2026, 3, 31));
        let rules = vec![inactive, expired, seasonal];

        assert_eq!(resolve_active_rule(&rules, &jet, date(2026, 3, 31)).rule().name, "seasonal");
        assert!(resolve_active_rule(&rules, &jet, date(2026, 4, 1)).is_default());
    }

    #[test]
    fn test_no_rule_resolves_to_tagged_default() {
        let jet = aircraft(AircraftCategory::Turboprop);
        let resolved = resolve_active_rule(&[], &jet, date(2026, 1, 1));

        assert!(resolved.is_default());
        assert_eq!(resolved.rule_id(), None);
        assert_eq!(resolved.rule().margin_for(AircraftCategory::Turboprop), 0.0);
        assert_eq!(resolved.rule().tax_rate(), 0.0);
        assert_eq!(
            resolved.rule().buffer_hours_or(DEFAULT_FLIGHT_TIME_BUFFER_HOURS),
            DEFAULT_FLIGHT_TIME_BUFFER_HOURS
        );
    }

    #[test]
    fn test_category_margin_override() {
        let mut r = rule("global", RuleScope::Global);
        r.margin_by_aircraft_type.insert(AircraftCategory::Large, 15.0);
        r.margin_by_aircraft_type.insert(AircraftCategory::Light, 0.0);

        assert_eq!(r.margin_for(AircraftCategory::Large), 15.0);
        assert_eq!(r.margin_for(AircraftCategory::Light), 10.0);
        assert_eq!(r.margin_for(AircraftCategory::Mid), 10.0);
    }

    #[test]
    fn test_discount_threshold_is_exclusive() {
        let rules = MultiLegRules {
            multi_leg_discount: Some(5.0),
            apply_discount_after_legs: Some(3),
            ..Default::default()
        };
        assert_eq!(rules.discount_for(3), 0.0);
        assert_eq!(rules.discount_for(4), 5.0);
        assert_eq!(MultiLegRules::default().discount_for(10), 0.0);
    }

    #[test]
    fn test_rule_validation() {
        let mut r = rule("bad", RuleScope::Global);
        r.tax_rate = Some(150.0);
        assert!(r.validate().is_err());

        let mut r = rule("bad window", RuleScope::Global);
        r.valid_from = Some(date(2026, 2, 1));
        r.valid_until = Some(date(2026, 1, 1));
        assert!(r.validate().is_err());

        let mut r = rule("bad fee", RuleScope::Global);
        r.fees.airport_fee_per_leg = Some(-1.0);
        assert!(r.validate().is_err());

        assert!(rule("ok", RuleScope::Global).validate().is_ok());
    }

    #[test]
    fn test_rule_deserializes_with_missing_optionals() {
        let json = serde_json::json!({
            "id": Uuid::nil(),
            "name": "minimal",
            "is_active": true,
            "margin_percentage": 12.5,
            "margin_by_aircraft_type": { "Super Mid": 14.0 },
            "tax_rate": null,
            "tax_label": null,
            "default_currency": null,
            "flight_time_buffer_hours": null,
            "valid_from": null,
            "valid_until": null,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        });
        let r: PricingRule = serde_json::from_value(json).unwrap();
        assert_eq!(r.scope, RuleScope::Global);
        assert_eq!(r.fees, FeeStructure::default());
        assert_eq!(r.margin_for(AircraftCategory::SuperMid), 14.0);
    }
}
