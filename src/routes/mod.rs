pub mod auth_routes;
pub mod dashboard_routes;
pub mod driver_routes;
pub mod rental_routes;
pub mod vehicle_routes;
