use charter_catalog::{Aircraft, NewAircraft, NewPricingRule, PricingRule, Route};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::repository::{AircraftRepository, PricingRuleRepository, RouteRepository, Stores};
use crate::{CoreError, CoreResult};

/// Administrator operations on reference data: aircraft, pricing rules
/// and route distances. Last write wins.
pub struct CatalogAdmin {
    aircraft: Arc<dyn AircraftRepository>,
    rules: Arc<dyn PricingRuleRepository>,
    routes: Arc<dyn RouteRepository>,
}

impl CatalogAdmin {
    pub fn new(stores: &Stores) -> Self {
        Self {
            aircraft: stores.aircraft.clone(),
            rules: stores.rules.clone(),
            routes: stores.routes.clone(),
        }
    }

    pub async fn list_aircraft(&self) -> CoreResult<Vec<Aircraft>> {
        let mut fleet = self.aircraft.list_aircraft(false).await?;
        fleet.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(fleet)
    }

    pub async fn get_aircraft(&self, id: Uuid) -> CoreResult<Aircraft> {
        self.aircraft
            .get_aircraft(id)
            .await?
            .ok_or(CoreError::not_found("Aircraft", id))
    }

    pub async fn create_aircraft(&self, input: NewAircraft) -> CoreResult<Aircraft> {
        let aircraft = input.into_aircraft(Uuid::new_v4(), Utc::now());
        aircraft.validate()?;
        self.aircraft.save_aircraft(&aircraft).await?;
        info!(aircraft_id = %aircraft.id, tail_number = %aircraft.tail_number, "Aircraft created");
        Ok(aircraft)
    }

    pub async fn update_aircraft(&self, id: Uuid, input: NewAircraft) -> CoreResult<Aircraft> {
        let mut aircraft = self.get_aircraft(id).await?;
        aircraft.apply(input);
        aircraft.validate()?;
        self.aircraft.save_aircraft(&aircraft).await?;
        info!(aircraft_id = %id, "Aircraft updated");
        Ok(aircraft)
    }

    pub async fn delete_aircraft(&self, id: Uuid) -> CoreResult<()> {
        if !self.aircraft.delete_aircraft(id).await? {
            return Err(CoreError::not_found("Aircraft", id));
        }
        info!(aircraft_id = %id, "Aircraft deleted");
        Ok(())
    }

    pub async fn list_rules(&self) -> CoreResult<Vec<PricingRule>> {
        let mut rules = self.rules.list_rules().await?;
        rules.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.name.cmp(&b.name)));
        Ok(rules)
    }

    pub async fn get_rule(&self, id: Uuid) -> CoreResult<PricingRule> {
        self.rules
            .get_rule(id)
            .await?
            .ok_or(CoreError::not_found("Pricing rule", id))
    }

    pub async fn create_rule(&self, input: NewPricingRule) -> CoreResult<PricingRule> {
        let rule = input.into_rule(Uuid::new_v4(), Utc::now());
        rule.validate()?;
        self.rules.save_rule(&rule).await?;
        info!(rule_id = %rule.id, name = %rule.name, "Pricing rule created");
        Ok(rule)
    }

    /// Issued quotes keep their own pricing snapshot and are not touched.
    pub async fn update_rule(&self, id: Uuid, input: NewPricingRule) -> CoreResult<PricingRule> {
        let mut rule = self.get_rule(id).await?;
        rule.apply(input);
        rule.validate()?;
        self.rules.save_rule(&rule).await?;
        info!(rule_id = %id, "Pricing rule updated");
        Ok(rule)
    }

    pub async fn delete_rule(&self, id: Uuid) -> CoreResult<()> {
        if !self.rules.delete_rule(id).await? {
            return Err(CoreError::not_found("Pricing rule", id));
        }
        info!(rule_id = %id, "Pricing rule deleted");
        Ok(())
    }

    pub async fn list_routes(&self) -> CoreResult<Vec<Route>> {
        let mut routes = self.routes.list_routes().await?;
        routes.sort_by(|a, b| a.key().cmp(&b.key()));
        Ok(routes)
    }

    pub async fn create_route(
        &self,
        origin: &str,
        destination: &str,
        distance_km: f64,
        estimated_time_hours: Option<f64>,
    ) -> CoreResult<Route> {
        let route = Route::new(origin, destination, distance_km, estimated_time_hours)?;
        if !self.routes.insert_route(&route).await? {
            return Err(CoreError::Conflict(format!(
                "route {} -> {} already exists",
                route.origin, route.destination
            )));
        }
        info!(origin = %route.origin, destination = %route.destination, distance_km, "Route saved");
        Ok(route)
    }
}
