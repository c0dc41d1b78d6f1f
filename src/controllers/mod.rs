//! Controladores
//!
//! Cada controlador toma lo que necesita de `AppState` y agrupa la lógica de
//! un recurso; las rutas solo extraen y delegan.

pub mod auth_controller;
pub mod dashboard_controller;
pub mod document_controller;
pub mod driver_controller;
pub mod rental_controller;
pub mod vehicle_controller;
