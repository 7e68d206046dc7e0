use std::sync::Arc;

use crate::domain::auth::{AuthService, Authorization, PasswordHasher, TokenIssuer, UserRepository};
use crate::domain::pvz::{
  MetricsRecorder, ProductOperations, ProductService, PvzOperations, PvzService,
  ReceptionOperations, ReceptionService, TransactionCoordinator, TransactionManager,
};

/// Collaborators needed to build [`Services`]
pub struct ServiceDependencies {
  pub storage: Arc<dyn TransactionManager>,
  pub users: Arc<dyn UserRepository>,
  pub password_hasher: Arc<dyn PasswordHasher>,
  pub token_issuer: Arc<dyn TokenIssuer>,
  pub metrics: Arc<dyn MetricsRecorder>,
  pub password_min_length: usize,
}

/// Capability sets handed to the transport, one per concern
#[derive(Clone)]
pub struct Services {
  pub auth: Arc<dyn Authorization>,
  pub pvz: Arc<dyn PvzOperations>,
  pub receptions: Arc<dyn ReceptionOperations>,
  pub products: Arc<dyn ProductOperations>,
}

impl Services {
  pub fn new(deps: ServiceDependencies) -> Self {
    let transactions = TransactionCoordinator::new(deps.storage);

    Self {
      auth: Arc::new(AuthService::new(
        deps.users,
        deps.password_hasher,
        deps.token_issuer,
        deps.password_min_length,
      )),
      pvz: Arc::new(PvzService::new(transactions.clone(), deps.metrics.clone())),
      receptions: Arc::new(ReceptionService::new(
        transactions.clone(),
        deps.metrics.clone(),
      )),
      products: Arc::new(ProductService::new(transactions, deps.metrics)),
    }
  }
}
