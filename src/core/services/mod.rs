pub mod inventory_service;
pub mod resign_service;
