use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::CatalogError;

/// Aircraft size classes offered for charter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AircraftCategory {
    Light,
    Mid,
    #[serde(rename = "Super Mid")]
    SuperMid,
    Large,
    Airliner,
    Helicopter,
    Turboprop,
}

impl AircraftCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AircraftCategory::Light => "Light",
            AircraftCategory::Mid => "Mid",
            AircraftCategory::SuperMid => "Super Mid",
            AircraftCategory::Large => "Large",
            AircraftCategory::Airliner => "Airliner",
            AircraftCategory::Helicopter => "Helicopter",
            AircraftCategory::Turboprop => "Turboprop",
        }
    }
}

impl fmt::Display for AircraftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AircraftCategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "light" => Ok(AircraftCategory::Light),
            "mid" => Ok(AircraftCategory::Mid),
            "supermid" => Ok(AircraftCategory::SuperMid),
            "large" => Ok(AircraftCategory::Large),
            "airliner" => Ok(AircraftCategory::Airliner),
            "helicopter" => Ok(AircraftCategory::Helicopter),
            "turboprop" => Ok(AircraftCategory::Turboprop),
            _ => Err(CatalogError::UnknownCategory(s.to_string())),
        }
    }
}

/// Documented operating cost components, used when the hourly rate or a
/// pricing-rule fee field is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OperatingCosts {
    pub hourly_operating_cost: Option<f64>,
    pub fuel_cost_per_km: Option<f64>,
    pub crew_expense_per_hour: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AircraftSpecs {
    pub seats: Option<u32>,
    /// Cruise speed in km/h
    pub speed_kmh: Option<f64>,
    pub range_km: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Aircraft {
    pub id: Uuid,
    pub name: String,
    pub tail_number: String,
    pub category: AircraftCategory,
    #[serde(default)]
    pub hourly_rate: f64,
    pub currency: Option<String>,
    #[serde(default)]
    pub commission_percentage: f64,
    #[serde(default)]
    pub operating_costs: OperatingCosts,
    #[serde(default)]
    pub specs: AircraftSpecs,
    /// Legacy mirror of `specs.seats`
    pub passenger_capacity: Option<u32>,
    /// Legacy mirror of `specs.speed_kmh`
    pub cruise_speed: Option<f64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Aircraft {
    /// Keep the legacy mirrors in step with `specs`.
    ///
    /// `specs` is authoritative. A missing spec value is back-filled from
    /// its mirror so records written before `specs` existed keep working.
    pub fn sync_legacy_fields(&mut self) {
        if self.specs.seats.is_none() {
            self.specs.seats = self.passenger_capacity;
        }
        if self.specs.speed_kmh.is_none() {
            self.specs.speed_kmh = self.cruise_speed;
        }
        self.passenger_capacity = self.specs.seats;
        self.cruise_speed = self.specs.speed_kmh;
    }

    /// Cruise speed usable as a divisor, if any.
    pub fn cruise_speed_kmh(&self) -> Option<f64> {
        self.specs
            .speed_kmh
            .or(self.cruise_speed)
            .filter(|s| s.is_finite() && *s > 0.0)
    }

    /// Hourly rate, falling back to the documented operating cost.
    pub fn effective_hourly_rate(&self) -> Option<f64> {
        if self.hourly_rate.is_finite() && self.hourly_rate > 0.0 {
            return Some(self.hourly_rate);
        }
        self.operating_costs
            .hourly_operating_cost
            .filter(|c| c.is_finite() && *c > 0.0)
    }

    pub fn seats(&self) -> Option<u32> {
        self.specs.seats.or(self.passenger_capacity)
    }

    pub fn range_km(&self) -> Option<f64> {
        self.specs.range_km.filter(|r| r.is_finite() && *r > 0.0)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::InvalidAircraft("name is required".to_string()));
        }
        if self.tail_number.trim().is_empty() {
            return Err(CatalogError::InvalidAircraft("tail number is required".to_string()));
        }
        if !self.hourly_rate.is_finite() || self.hourly_rate < 0.0 {
            return Err(CatalogError::InvalidAircraft("hourly rate must be non-negative".to_string()));
        }
        if !(0.0..=100.0).contains(&self.commission_percentage) {
            return Err(CatalogError::InvalidAircraft(
                "commission percentage must be between 0 and 100".to_string(),
            ));
        }
        let costs = [
            self.operating_costs.hourly_operating_cost,
            self.operating_costs.fuel_cost_per_km,
            self.operating_costs.crew_expense_per_hour,
            self.specs.speed_kmh,
            self.specs.range_km,
        ];
        if costs.iter().flatten().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(CatalogError::InvalidAircraft(
                "operating costs and specs must be non-negative numbers".to_string(),
            ));
        }
        Ok(())
    }

    /// Replace every administrator-editable field, keeping identity and creation time.
    pub fn apply(&mut self, input: NewAircraft) {
        let id = self.id;
        let created_at = self.created_at;
        *self = input.into_aircraft(id, created_at);
        self.updated_at = Utc::now();
    }
}

/// Administrator input for creating or replacing an aircraft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAircraft {
    pub name: String,
    pub tail_number: String,
    pub category: AircraftCategory,
    #[serde(default)]
    pub hourly_rate: f64,
    pub currency: Option<String>,
    #[serde(default)]
    pub commission_percentage: f64,
    #[serde(default)]
    pub operating_costs: OperatingCosts,
    #[serde(default)]
    pub specs: AircraftSpecs,
    pub passenger_capacity: Option<u32>,
    pub cruise_speed: Option<f64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl NewAircraft {
    pub fn into_aircraft(self, id: Uuid, created_at: DateTime<Utc>) -> Aircraft {
        let mut aircraft = Aircraft {
            id,
            name: self.name.trim().to_string(),
            tail_number: self.tail_number.trim().to_ascii_uppercase(),
            category: self.category,
            hourly_rate: self.hourly_rate,
            currency: self.currency.map(|c| c.trim().to_ascii_uppercase()),
            commission_percentage: self.commission_percentage,
            operating_costs: self.operating_costs,
            specs: self.specs,
            passenger_capacity: self.passenger_capacity,
            cruise_speed: self.cruise_speed,
            is_active: self.is_active,
            created_at,
            updated_at: created_at,
        };
        aircraft.sync_legacy_fields();
        aircraft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewAircraft {
        NewAircraft {
            name: "Citation XLS+".to_string(),
            tail_number: "vt-abc".to_string(),
            category: AircraftCategory::Mid,
            hourly_rate: 5000.0,
            currency: Some("usd".to_string()),
            commission_percentage: 5.0,
            operating_costs: OperatingCosts::default(),
            specs: AircraftSpecs {
                seats: Some(9),
                speed_kmh: Some(800.0),
                range_km: Some(3400.0),
            },
            passenger_capacity: Some(6),
            cruise_speed: Some(650.0),
            is_active: true,
        }
    }

    #[test]
    fn test_specs_override_legacy_mirrors() {
        let aircraft = input().into_aircraft(Uuid::new_v4(), Utc::now());

        assert_eq!(aircraft.passenger_capacity, Some(9));
        assert_eq!(aircraft.cruise_speed, Some(800.0));
        assert_eq!(aircraft.tail_number, "VT-ABC");
        assert_eq!(aircraft.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_legacy_mirrors_backfill_specs() {
        let mut new = input();
        new.specs = AircraftSpecs::default();
        let aircraft = new.into_aircraft(Uuid::new_v4(), Utc::now());

        assert_eq!(aircraft.specs.seats, Some(6));
        assert_eq!(aircraft.specs.speed_kmh, Some(650.0));
        assert_eq!(aircraft.cruise_speed_kmh(), Some(650.0));
    }

    #[test]
    fn test_apply_keeps_identity() {
        let created = Utc::now();
        let id = Uuid::new_v4();
        let mut aircraft = input().into_aircraft(id, created);

        let mut update = input();
        update.specs.seats = Some(12);
        aircraft.apply(update);

        assert_eq!(aircraft.id, id);
        assert_eq!(aircraft.created_at, created);
        assert_eq!(aircraft.passenger_capacity, Some(12));
    }

    #[test]
    fn test_zero_cruise_speed_is_unusable() {
        let mut new = input();
        new.specs.speed_kmh = Some(0.0);
        let aircraft = new.into_aircraft(Uuid::new_v4(), Utc::now());
        assert_eq!(aircraft.cruise_speed_kmh(), None);
    }

    #[test]
    fn test_hourly_rate_falls_back_to_operating_cost() {
        let mut new = input();
        new.hourly_rate = 0.0;
        new.operating_costs.hourly_operating_cost = Some(4200.0);
        let aircraft = new.into_aircraft(Uuid::new_v4(), Utc::now());
        assert_eq!(aircraft.effective_hourly_rate(), Some(4200.0));
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Super Mid".parse::<AircraftCategory>().unwrap(), AircraftCategory::SuperMid);
        assert_eq!("super-mid".parse::<AircraftCategory>().unwrap(), AircraftCategory::SuperMid);
        assert!("jumbo".parse::<AircraftCategory>().is_err());

        let json = serde_json::to_string(&AircraftCategory::SuperMid).unwrap();
        assert_eq!(json, "\"Super Mid\"");
    }

    #[test]
    fn test_validation() {
        let mut new = input();
        new.commission_percentage = 120.0;
        let aircraft = new.into_aircraft(Uuid::new_v4(), Utc::now());
        assert!(aircraft.validate().is_err());

        let aircraft = input().into_aircraft(Uuid::new_v4(), Utc::now());
        assert!(aircraft.validate().is_ok());
    }
}
