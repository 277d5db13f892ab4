//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use jsonwebtoken::DecodingKey;

use crate::config::EnvironmentConfig;
use crate::repositories::FleetStore;
use crate::services::{ActivityService, ConsumptionService, FuelService, VesselService, VoyageService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub decoding_key: DecodingKey,
    pub vessels: VesselService,
    pub voyages: VoyageService,
    pub activities: ActivityService,
    pub consumptions: ConsumptionService,
    pub fuel: FuelService,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, store: Arc<dyn FleetStore>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            config: Arc::new(config),
            vessels: VesselService::new(store.clone()),
            voyages: VoyageService::new(store.clone()),
            activities: ActivityService::new(store.clone()),
            consumptions: ConsumptionService::new(store.clone()),
            fuel: FuelService::new(store),
        }
    }
}
