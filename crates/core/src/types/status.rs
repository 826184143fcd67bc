//! Status enums for catalog entities.

use serde::{Deserialize, Serialize};

/// Where a product currently lives.
///
/// Every product is either on the catalog page or in the basket; there are
/// no other states. Deletion removes the row outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Listed on the catalog page.
    #[default]
    Catalog,
    /// Moved into the basket, awaiting checkout.
    Basket,
}

impl ProductStatus {
    /// The opposite location.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Catalog => Self::Basket,
            Self::Basket => Self::Catalog,
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Catalog => write!(f, "catalog"),
            Self::Basket => write!(f, "basket"),
        }
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "catalog" => Ok(Self::Catalog),
            "basket" => Ok(Self::Basket),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for status in [ProductStatus::Catalog, ProductStatus::Basket] {
            let parsed: ProductStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_rejects_unknown() {
        assert!("archived".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn test_toggled() {
        assert_eq!(ProductStatus::Catalog.toggled(), ProductStatus::Basket);
        assert_eq!(ProductStatus::Basket.toggled(), ProductStatus::Catalog);
    }
}
