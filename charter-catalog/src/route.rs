use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::CatalogError;

/// Airport codes are compared trimmed and upper-cased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// A known distance between two airports, in the direction flown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub id: Uuid,
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub estimated_time_hours: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Route {
    pub fn new(
        origin: &str,
        destination: &str,
        distance_km: f64,
        estimated_time_hours: Option<f64>,
    ) -> Result<Self, CatalogError> {
        let origin = normalize_code(origin);
        let destination = normalize_code(destination);

        if origin.is_empty() || destination.is_empty() {
            return Err(CatalogError::InvalidRoute("origin and destination are required".to_string()));
        }
        if origin == destination {
            return Err(CatalogError::InvalidRoute(format!(
                "origin and destination are both {}",
                origin
            )));
        }
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(CatalogError::InvalidRoute(format!(
                "distance must be a non-negative number, got {}",
                distance_km
            )));
        }
        if let Some(hours) = estimated_time_hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(CatalogError::InvalidRoute("estimated time must be non-negative".to_string()));
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            origin,
            destination,
            distance_km,
            estimated_time_hours,
            created_at: Utc::now(),
        })
    }

    pub fn key(&self) -> (String, String) {
        (self.origin.clone(), self.destination.clone())
    }
}

/// Read-only distance index keyed by ordered (origin, destination).
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<(String, String), Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later inserts for the same ordered pair replace earlier ones.
    pub fn insert(&mut self, route: Route) {
        self.routes.insert(route.key(), route);
    }

    pub fn lookup(&self, origin: &str, destination: &str) -> Option<&Route> {
        self.routes
            .get(&(normalize_code(origin), normalize_code(destination)))
    }

    pub fn distance_km(&self, origin: &str, destination: &str) -> Option<f64> {
        self.lookup(origin, destination).map(|r| r.distance_km)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl FromIterator<Route> for RouteTable {
    fn from_iter<I: IntoIterator<Item = Route>>(iter: I) -> Self {
        let mut table = RouteTable::new();
        for route in iter {
            table.insert(route);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_ordered_and_normalized() {
        let table: RouteTable = vec![Route::new("del", " bom ", 1150.0, Some(2.1)).unwrap()]
            .into_iter()
            .collect();

        assert_eq!(table.distance_km("DEL", "BOM"), Some(1150.0));
        assert_eq!(table.distance_km(" del", "bom"), Some(1150.0));
        assert_eq!(table.distance_km("BOM", "DEL"), None);
    }

    #[test]
    fn test_route_validation() {
        assert!(Route::new("DEL", "DEL", 10.0, None).is_err());
        assert!(Route::new("", "BOM", 10.0, None).is_err());
        assert!(Route::new("DEL", "BOM", -1.0, None).is_err());
        assert!(Route::new("DEL", "BOM", f64::NAN, None).is_err());
        assert!(Route::new("DEL", "BOM", 0.0, None).is_ok());
    }

    #[test]
    fn test_insert_replaces_same_pair() {
        let mut table = RouteTable::new();
        table.insert(Route::new("DEL", "BOM", 1100.0, None).unwrap());
        table.insert(Route::new("DEL", "BOM", 1150.0, None).unwrap());

        assert_eq!(table.len(), 1);
        assert_eq!(table.distance_km("DEL", "BOM"), Some(1150.0));
    }
}
