use axum::extract::FromRef;

use crate::catalog::MetadataRepository;
use crate::fixes::FixCoordinator;
use crate::search::SearchEngine;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedRepository = Arc<dyn MetadataRepository>;
pub type GuardedCoordinator = Arc<FixCoordinator>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub repository: GuardedRepository,
    pub engine: SearchEngine,
    pub coordinator: GuardedCoordinator,
}

impl ServerState {
    pub fn new(config: ServerConfig, repository: GuardedRepository) -> Self {
        let coordinator = Arc::new(FixCoordinator::new(config.fix_fault_probability));
        Self {
            config,
            start_time: Instant::now(),
            repository,
            engine: SearchEngine::new(),
            coordinator,
        }
    }
}

impl FromRef<ServerState> for GuardedRepository {
    fn from_ref(input: &ServerState) -> Self {
        input.repository.clone()
    }
}

impl FromRef<ServerState> for GuardedCoordinator {
    fn from_ref(input: &ServerState) -> Self {
        input.coordinator.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for SearchEngine {
    fn from_ref(input: &ServerState) -> Self {
        input.engine
    }
}
