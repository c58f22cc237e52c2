//! Fixture management — authenticated sessions and catalog-derived
//! preconditions.
//!
//! Fixtures are re-evaluated per run: the catalog is queried live and a
//! stock predicate selects a product, because catalog state is not assumed
//! stable across runs. A predicate with no match yields `Ok(None)` —
//! absence is a valid state the caller converts into a skip, never a
//! failure.

use crate::http::ApiClient;
use crate::result::{HarnessError, HarnessResult};
use crate::session::{Credentials, Session};
use serde::{Deserialize, Serialize};

/// A catalog entry as served by `GET /products`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Remaining stock
    #[serde(rename = "availableStock")]
    pub available_stock: i64,
    /// Long description
    #[serde(default)]
    pub description: Option<String>,
    /// Picture URL
    #[serde(default)]
    pub picture: Option<String>,
    /// Skin type the product targets
    #[serde(default)]
    pub skin: Option<String>,
    /// Aroma notes
    #[serde(default)]
    pub aromas: Option<String>,
    /// Ingredient list
    #[serde(default)]
    pub ingredients: Option<String>,
}

/// Stock state of a fixture product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockState {
    /// `availableStock > 0`
    Available,
    /// `availableStock == 0` (or negative, which some deployments use for
    /// oversold lines)
    OutOfStock,
}

/// Predicate selecting a fixture product by stock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockPredicate {
    /// First product with stock remaining
    Available,
    /// First product with no stock remaining
    OutOfStock,
}

impl StockPredicate {
    /// Whether `product` satisfies the predicate
    #[must_use]
    pub const fn matches(&self, product: &Product) -> bool {
        match self {
            Self::Available => product.available_stock > 0,
            Self::OutOfStock => product.available_stock <= 0,
        }
    }

    /// The stock state a matching product is in
    #[must_use]
    pub const fn state(&self) -> StockState {
        match self {
            Self::Available => StockState::Available,
            Self::OutOfStock => StockState::OutOfStock,
        }
    }
}

/// A product selected from the live catalog as a scenario precondition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: i64,
    /// Stock state the product matched
    pub stock_state: StockState,
}

/// First catalog entry matching the predicate, if any
#[must_use]
pub fn select_by_stock(products: &[Product], predicate: StockPredicate) -> Option<ProductFixture> {
    products.iter().find(|p| predicate.matches(p)).map(|p| ProductFixture {
        id: p.id,
        stock_state: predicate.state(),
    })
}

/// Parse a login response into a session.
///
/// # Errors
///
/// `Fixture` when the status is not 200 or the body lacks a non-empty
/// `token` field — a broken fixture aborts dependent scenarios.
pub fn parse_login_response(
    status: u16,
    body: &serde_json::Value,
    username: &str,
) -> HarnessResult<Session> {
    if status != 200 {
        return Err(HarnessError::Fixture {
            message: format!("login for '{username}' returned status {status}, expected 200"),
        });
    }
    match body.get("token").and_then(serde_json::Value::as_str) {
        Some(token) if !token.is_empty() => Ok(Session::new(token, username)),
        _ => Err(HarnessError::Fixture {
            message: format!("login response for '{username}' lacks a token field"),
        }),
    }
}

/// Establishes scenario preconditions against the live system under test
#[derive(Debug, Clone)]
pub struct FixtureManager {
    api: ApiClient,
}

impl FixtureManager {
    /// Create a fixture manager sharing the harness API client
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Obtain an authenticated session for `credentials`.
    ///
    /// # Errors
    ///
    /// `Fixture` when login does not yield a token; `Transport` when the
    /// system under test is unreachable.
    pub async fn login(&self, credentials: &Credentials) -> HarnessResult<Session> {
        tracing::info!(username = %credentials.username, "fixture login");
        let resp = self
            .api
            .post("/login")
            .json(credentials.login_body())
            .fail_on_status(false)
            .send()
            .await?;
        parse_login_response(resp.status, &resp.body, &credentials.username)
    }

    /// Fetch the full catalog.
    ///
    /// # Errors
    ///
    /// `Fixture` when the catalog response does not deserialize.
    pub async fn fetch_catalog(&self) -> HarnessResult<Vec<Product>> {
        let resp = self.api.get("/products").send().await?;
        serde_json::from_value(resp.body).map_err(|e| HarnessError::Fixture {
            message: format!("catalog response did not deserialize: {e}"),
        })
    }

    /// First catalog product matching `predicate`, re-evaluated against the
    /// live catalog. `Ok(None)` when nothing matches.
    pub async fn find_product_by_stock(
        &self,
        predicate: StockPredicate,
    ) -> HarnessResult<Option<ProductFixture>> {
        let products = self.fetch_catalog().await?;
        let fixture = select_by_stock(&products, predicate);
        tracing::debug!(?predicate, found = fixture.is_some(), "stock fixture lookup");
        Ok(fixture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(id: i64, stock: i64) -> Product {
        Product {
            id,
            name: format!("product-{id}"),
            price: 12.5,
            available_stock: stock,
            description: None,
            picture: None,
            skin: None,
            aromas: None,
            ingredients: None,
        }
    }

    #[test]
    fn available_predicate_selects_first_in_stock() {
        let products = vec![product(1, 0), product(2, 3), product(3, 7)];
        let fixture = select_by_stock(&products, StockPredicate::Available).unwrap();
        assert_eq!(fixture.id, 2);
        assert_eq!(fixture.stock_state, StockState::Available);
    }

    #[test]
    fn available_predicate_absent_when_everything_sold_out() {
        let products = vec![product(1, 0), product(2, -2)];
        assert!(select_by_stock(&products, StockPredicate::Available).is_none());
    }

    #[test]
    fn out_of_stock_predicate_matches_zero_and_negative() {
        let products = vec![product(1, 5), product(2, 0)];
        let fixture = select_by_stock(&products, StockPredicate::OutOfStock).unwrap();
        assert_eq!(fixture.id, 2);
        assert_eq!(fixture.stock_state, StockState::OutOfStock);

        let oversold = vec![product(3, -1)];
        assert!(select_by_stock(&oversold, StockPredicate::OutOfStock).is_some());
    }

    #[test]
    fn out_of_stock_absent_is_none_not_error() {
        let products = vec![product(1, 5)];
        assert!(select_by_stock(&products, StockPredicate::OutOfStock).is_none());
        assert!(select_by_stock(&[], StockPredicate::OutOfStock).is_none());
    }

    #[test]
    fn login_response_with_token_builds_session() {
        let session =
            parse_login_response(200, &json!({"token": "abc"}), "test2@test.fr").unwrap();
        assert_eq!(session.token(), "abc");
        assert_eq!(session.username, "test2@test.fr");
    }

    #[test]
    fn login_response_without_token_is_a_fixture_error() {
        let err = parse_login_response(200, &json!({}), "u").unwrap_err();
        assert!(matches!(err, HarnessError::Fixture { .. }));
        assert!(err.to_string().contains("token"));

        let err = parse_login_response(200, &json!({"token": ""}), "u").unwrap_err();
        assert!(matches!(err, HarnessError::Fixture { .. }));
    }

    #[test]
    fn login_response_with_bad_status_is_a_fixture_error() {
        let err = parse_login_response(401, &json!({"token": "abc"}), "u").unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn product_deserializes_catalog_shape() {
        let value = json!({
            "id": 8,
            "name": "Sentiments printaniers",
            "price": 60.0,
            "availableStock": 0,
            "description": "...",
            "picture": "http://example/p.jpg",
            "skin": "Sèche",
            "aromas": "Floral",
            "ingredients": "Savon"
        });
        let product: Product = serde_json::from_value(value).unwrap();
        assert_eq!(product.available_stock, 0);
        assert!(StockPredicate::OutOfStock.matches(&product));
    }
}
