use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::auth::entities::User;
use crate::domain::pvz::entities::{FullPvzInfo, Product, Pvz, Reception, ReceptionWithProducts};
use crate::domain::pvz::value_objects::{DateRange, Pagination};

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DummyLoginRequest {
  #[validate(length(min = 1, message = "Role is required"))]
  pub role: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,

  #[validate(length(min = 1, message = "Role is required"))]
  pub role: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
  pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
  pub id: Uuid,
  pub email: String,
  pub role: String,
}

impl From<User> for UserResponse {
  fn from(user: User) -> Self {
    Self {
      id: user.id,
      email: user.email.into_inner(),
      role: user.role.as_str().to_string(),
    }
  }
}

// ============================================================================
// PVZ
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePvzRequest {
  #[validate(length(min = 1, message = "City is required"))]
  pub city: String,
}

/// Query string of `GET /pvz`; dates are RFC 3339
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PvzListQuery {
  pub start_date: Option<DateTime<Utc>>,

  pub end_date: Option<DateTime<Utc>>,

  #[validate(range(min = 1, message = "Page must be at least 1"))]
  pub page: Option<u32>,

  #[validate(range(min = 1, max = 30, message = "Limit must be between 1 and 30"))]
  pub limit: Option<u32>,
}

impl PvzListQuery {
  pub fn date_range(&self) -> DateRange {
    DateRange::new(self.start_date, self.end_date)
  }

  pub fn pagination(&self) -> Pagination {
    Pagination::new(
      self.page.unwrap_or(Pagination::DEFAULT_PAGE),
      self.limit.unwrap_or(Pagination::DEFAULT_LIMIT),
    )
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PvzResponse {
  pub id: Uuid,
  pub registration_date: DateTime<Utc>,
  pub city: String,
}

impl From<Pvz> for PvzResponse {
  fn from(pvz: Pvz) -> Self {
    Self {
      id: pvz.id,
      registration_date: pvz.registration_date,
      city: pvz.city.as_str().to_string(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullPvzResponse {
  pub pvz: PvzResponse,
  pub receptions: Vec<ReceptionWithProductsResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceptionWithProductsResponse {
  pub reception: ReceptionResponse,
  pub products: Vec<ProductResponse>,
}

impl From<FullPvzInfo> for FullPvzResponse {
  fn from(info: FullPvzInfo) -> Self {
    Self {
      pvz: info.pvz.into(),
      receptions: info.receptions.into_iter().map(Into::into).collect(),
    }
  }
}

impl From<ReceptionWithProducts> for ReceptionWithProductsResponse {
  fn from(entry: ReceptionWithProducts) -> Self {
    Self {
      reception: entry.reception.into(),
      products: entry.products.into_iter().map(Into::into).collect(),
    }
  }
}

// ============================================================================
// Receptions and products
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceptionRequest {
  pub pvz_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionResponse {
  pub id: Uuid,
  pub date_time: DateTime<Utc>,
  pub pvz_id: Uuid,
  pub status: String,
}

impl From<Reception> for ReceptionResponse {
  fn from(reception: Reception) -> Self {
    Self {
      id: reception.id,
      date_time: reception.date_time,
      pvz_id: reception.pvz_id,
      status: reception.status.as_str().to_string(),
    }
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
  #[serde(rename = "type")]
  #[validate(length(min = 1, message = "Type is required"))]
  pub product_type: String,

  pub pvz_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
  pub id: Uuid,
  pub date_time: DateTime<Utc>,
  #[serde(rename = "type")]
  pub product_type: String,
  pub reception_id: Uuid,
}

impl From<Product> for ProductResponse {
  fn from(product: Product) -> Self {
    Self {
      id: product.id,
      date_time: product.date_time,
      product_type: product.product_type.as_str().to_string(),
      reception_id: product.reception_id,
    }
  }
}

// ============================================================================
// Generic
// ============================================================================

/// Generic error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
  /// Error type identifier
  pub error: String,

  /// Human-readable error message
  pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
  pub message: String,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::pvz::value_objects::ProductType;

  #[test]
  fn test_product_response_wire_names() {
    let product = Product::new(Uuid::new_v4(), ProductType::Clothing);

    let json = serde_json::to_value(ProductResponse::from(product.clone())).unwrap();

    assert_eq!(json["type"], "одежда");
    assert_eq!(json["receptionId"], product.reception_id.to_string());
    assert!(json.get("dateTime").is_some());
  }

  #[test]
  fn test_add_product_request_accepts_wire_names() {
    let pvz_id = Uuid::new_v4();
    let request: AddProductRequest =
      serde_json::from_value(serde_json::json!({ "type": "обувь", "pvzId": pvz_id })).unwrap();

    assert_eq!(request.product_type, "обувь");
    assert_eq!(request.pvz_id, pvz_id);
  }

  #[test]
  fn test_list_query_defaults_and_bounds() {
    let query = PvzListQuery {
      start_date: None,
      end_date: None,
      page: None,
      limit: None,
    };
    assert!(query.validate().is_ok());
    assert_eq!(query.pagination(), Pagination::new(1, 10));

    let too_big = PvzListQuery {
      limit: Some(31),
      ..query.clone()
    };
    assert!(too_big.validate().is_err());

    let page_zero = PvzListQuery {
      page: Some(0),
      ..query
    };
    assert!(page_zero.validate().is_err());
  }
}
