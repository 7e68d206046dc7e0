use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::PvzError;
use super::value_objects::{City, ProductType, ReceptionStatus};

// PVZ - registered pickup point, immutable after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pvz {
  pub id: Uuid,
  pub registration_date: DateTime<Utc>,
  pub city: City,
}

impl Pvz {
  pub fn new(city: City) -> Self {
    Self {
      id: Uuid::new_v4(),
      registration_date: Utc::now(),
      city,
    }
  }

  pub fn from_db(id: Uuid, registration_date: DateTime<Utc>, city: City) -> Self {
    Self {
      id,
      registration_date,
      city,
    }
  }
}

// Reception - intake batch opened at a PVZ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reception {
  pub id: Uuid,
  pub date_time: DateTime<Utc>,
  pub pvz_id: Uuid,
  pub status: ReceptionStatus,
  pub created_at: DateTime<Utc>,
  pub closed_at: Option<DateTime<Utc>>,
}

impl Reception {
  pub fn open(pvz_id: Uuid) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      date_time: now,
      pvz_id,
      status: ReceptionStatus::Open,
      created_at: now,
      closed_at: None,
    }
  }

  pub fn is_open(&self) -> bool {
    self.status.is_open()
  }

  /// Moves the reception to `Closed`, stamping the close time once.
  pub fn close(&mut self, closed_at: DateTime<Utc>) -> Result<(), PvzError> {
    if !self.status.can_transition_to(ReceptionStatus::Closed) {
      return Err(PvzError::ReceptionAlreadyClosed(self.id));
    }

    self.status = ReceptionStatus::Closed;
    self.closed_at = Some(closed_at);
    Ok(())
  }
}

// Product - item recorded against an open reception
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
  pub id: Uuid,
  pub date_time: DateTime<Utc>,
  pub product_type: ProductType,
  pub reception_id: Uuid,
}

impl Product {
  pub fn new(reception_id: Uuid, product_type: ProductType) -> Self {
    Self {
      id: Uuid::new_v4(),
      date_time: Utc::now(),
      product_type,
      reception_id,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceptionWithProducts {
  pub reception: Reception,
  pub products: Vec<Product>,
}

/// A PVZ with its date-filtered receptions and their products
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullPvzInfo {
  pub pvz: Pvz,
  pub receptions: Vec<ReceptionWithProducts>,
}
