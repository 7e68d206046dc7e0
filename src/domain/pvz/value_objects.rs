use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::PvzError;

// City - closed set of cities a pickup point may be registered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
  #[serde(rename = "Москва")]
  Moscow,
  #[serde(rename = "Санкт-Петербург")]
  SaintPetersburg,
  #[serde(rename = "Казань")]
  Kazan,
}

impl City {
  pub const ALL: [City; 3] = [City::Moscow, City::SaintPetersburg, City::Kazan];

  pub fn as_str(&self) -> &'static str {
    match self {
      City::Moscow => "Москва",
      City::SaintPetersburg => "Санкт-Петербург",
      City::Kazan => "Казань",
    }
  }
}

impl FromStr for City {
  type Err = PvzError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    City::ALL
      .into_iter()
      .find(|city| city.as_str() == s)
      .ok_or_else(|| PvzError::InvalidCity(s.to_string()))
  }
}

impl fmt::Display for City {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// Product Type - closed set of product categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
  #[serde(rename = "электроника")]
  Electronics,
  #[serde(rename = "одежда")]
  Clothing,
  #[serde(rename = "обувь")]
  Shoes,
}

impl ProductType {
  pub const ALL: [ProductType; 3] = [
    ProductType::Electronics,
    ProductType::Clothing,
    ProductType::Shoes,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      ProductType::Electronics => "электроника",
      ProductType::Clothing => "одежда",
      ProductType::Shoes => "обувь",
    }
  }
}

impl FromStr for ProductType {
  type Err = PvzError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    ProductType::ALL
      .into_iter()
      .find(|product_type| product_type.as_str() == s)
      .ok_or_else(|| PvzError::InvalidProductType(s.to_string()))
  }
}

impl fmt::Display for ProductType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// Reception Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceptionStatus {
  #[serde(rename = "in_progress")]
  Open,
  #[serde(rename = "close")]
  Closed,
}

impl ReceptionStatus {
  pub fn can_transition_to(&self, new_status: ReceptionStatus) -> bool {
    // Closed is terminal
    matches!(
      (self, new_status),
      (ReceptionStatus::Open, ReceptionStatus::Closed)
    )
  }

  pub fn is_open(&self) -> bool {
    matches!(self, ReceptionStatus::Open)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      ReceptionStatus::Open => "in_progress",
      ReceptionStatus::Closed => "close",
    }
  }
}

impl FromStr for ReceptionStatus {
  type Err = PvzError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "in_progress" => Ok(ReceptionStatus::Open),
      "close" => Ok(ReceptionStatus::Closed),
      _ => Err(PvzError::Internal(format!("Unknown reception status: {}", s))),
    }
  }
}

impl fmt::Display for ReceptionStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Page window over the PVZ list, 1-based pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
  page: u32,
  limit: u32,
}

impl Pagination {
  pub const DEFAULT_PAGE: u32 = 1;
  pub const DEFAULT_LIMIT: u32 = 10;

  /// Zero values are raised to 1.
  pub fn new(page: u32, limit: u32) -> Self {
    Self {
      page: page.max(1),
      limit: limit.max(1),
    }
  }

  pub fn page(&self) -> u32 {
    self.page
  }

  pub fn limit(&self) -> u32 {
    self.limit
  }

  /// Returns the `[start, end)` window for a list of `total` items, or `None`
  /// when the page starts past the end.
  pub fn window(&self, total: usize) -> Option<(usize, usize)> {
    let limit = self.limit as usize;
    let start = (self.page as usize - 1).saturating_mul(limit);
    if start >= total {
      return None;
    }

    Some((start, start.saturating_add(limit).min(total)))
  }

  pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
    match self.window(items.len()) {
      Some((start, end)) => items.into_iter().skip(start).take(end - start).collect(),
      None => Vec::new(),
    }
  }
}

impl Default for Pagination {
  fn default() -> Self {
    Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_LIMIT)
  }
}

/// Inclusive reception date filter; a missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
  pub start: Option<DateTime<Utc>>,
  pub end: Option<DateTime<Utc>>,
}

impl DateRange {
  pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
    Self { start, end }
  }

  pub fn unbounded() -> Self {
    Self::default()
  }

  pub fn contains(&self, moment: DateTime<Utc>) -> bool {
    self.start.is_none_or(|start| moment >= start) && self.end.is_none_or(|end| moment <= end)
  }
}
