//! Stable `data-cy` identifiers the storefront UI exposes.
//!
//! These are the contract between the suite and the UI: renames here mean
//! the application broke its test surface.

use vitrina::TestId;

/// `localStorage` key holding the session token after a UI login
pub const LOCAL_STORAGE_USER_KEY: &str = "user";

/// Login form element
pub const LOGIN_FORM: TestId = TestId::new("login-form");
/// Email/username input on the login form
pub const LOGIN_USERNAME: TestId = TestId::new("login-input-username");
/// Password input on the login form
pub const LOGIN_PASSWORD: TestId = TestId::new("login-input-password");
/// Login submit button
pub const LOGIN_SUBMIT: TestId = TestId::new("login-submit");

/// Cart link in the navigation (authenticated users only)
pub const NAV_CART: TestId = TestId::new("nav-link-cart");
/// Login link in the navigation
pub const NAV_LOGIN: TestId = TestId::new("nav-link-login");
/// Register link in the navigation
pub const NAV_REGISTER: TestId = TestId::new("nav-link-register");
/// Logout link in the navigation (authenticated users only)
pub const NAV_LOGOUT: TestId = TestId::new("nav-link-logout");

/// Product card on the home page
pub const PRODUCT_HOME: TestId = TestId::new("product-home");
/// Product image within a home card
pub const PRODUCT_HOME_IMG: TestId = TestId::new("product-home-img");
/// Product name within a home card
pub const PRODUCT_HOME_NAME: TestId = TestId::new("product-home-name");
/// Product price within a home card
pub const PRODUCT_HOME_PRICE: TestId = TestId::new("product-home-price");
/// Product ingredients within a home card
pub const PRODUCT_HOME_INGREDIENTS: TestId = TestId::new("product-home-ingredients");
/// Detail link within a home card
pub const PRODUCT_HOME_LINK: TestId = TestId::new("product-home-link");

/// Product card on the products page
pub const PRODUCT: TestId = TestId::new("product");
/// Detail link within a products-page card
pub const PRODUCT_LINK: TestId = TestId::new("product-link");

/// Add-to-cart form on the product detail page
pub const DETAIL_FORM: TestId = TestId::new("detail-product-form");
/// Product name on the detail page
pub const DETAIL_NAME: TestId = TestId::new("detail-product-name");
/// Stock field on the detail page
pub const DETAIL_STOCK: TestId = TestId::new("detail-product-stock");
/// Quantity input on the detail page
pub const DETAIL_QUANTITY: TestId = TestId::new("detail-product-quantity");
/// Add-to-cart button on the detail page
pub const DETAIL_ADD: TestId = TestId::new("detail-product-add");

/// One line item on the cart page
pub const CART_LINE: TestId = TestId::new("cart-line");
