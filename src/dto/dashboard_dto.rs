use serde::Serialize;

use crate::models::{driver::DriverStats, rental::RentalStats, vehicle::VehicleStats};

// Response de GET /dashboard/stats
#[derive(Debug, Serialize, PartialEq)]
pub struct DashboardStats {
    pub total_drivers: i64,
    pub active_drivers: i64,
    pub total_vehicles: i64,
    pub available_vehicles: i64,
    pub rented_vehicles: i64,
    pub maintenance_vehicles: i64,
    /// Solicitudes en `payment_received` esperando decisión
    pub payment_alerts: i64,
    /// Vehículos actualmente alquilados
    pub active_trips: i64,
}

impl DashboardStats {
    pub fn from_parts(drivers: &DriverStats, vehicles: &VehicleStats, rentals: &RentalStats) -> Self {
        Self {
            total_drivers: drivers.total_drivers,
            active_drivers: drivers.active_drivers,
            total_vehicles: vehicles.total_vehicles,
            available_vehicles: vehicles.available_vehicles,
            rented_vehicles: vehicles.rented_vehicles,
            maintenance_vehicles: vehicles.maintenance_vehicles,
            payment_alerts: rentals.payment_received_applications,
            active_trips: vehicles.rented_vehicles,
        }
    }
}
