use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiDocument,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    breaker::BreakerState,
    catalog::{
        facets::{PriceBucket, ProductSort},
        projection::ProductCard,
    },
    dto::{
        admins::CreateAdminRequest,
        auth::{LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest},
        cart::{AddToCartRequest, CartItemDto, CartList},
        customers::{CustomerDetail, UserList},
        orders::{CheckoutRequest, OrderList, OrderWithItems, UpdateOrderStatusRequest},
        otp::{OtpIssued, OtpPurpose, OtpRequest, OtpVerified, OtpVerifyRequest},
        products::{
            CreateProductRequest, InventoryAdjustRequest, ProductList, SizeStock,
            UpdateProductRequest,
        },
        settings::{SettingList, UpdateSettingRequest},
        stats::{MonthlyRevenue, Overview, StatusCount, TopProduct},
    },
    error::ErrorData,
    models::{LookupItem, Order, OrderItem, OrderStatus, Setting, User},
    notify::OrderEvent,
    response::{ApiResponse, Meta},
    routes::{admin, admins, auth, cart, customers, health, orders, products, settings, stats, ws},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        auth::register,
        auth::login,
        auth::me,
        auth::reset_password,
        auth::request_otp,
        auth::verify_otp,
        products::list_products,
        products::get_product,
        products::list_categories,
        products::list_brands,
        products::list_leagues,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        orders::cancel_order,
        ws::order_events,
        admin::list_products_admin,
        admin::get_product_admin,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
        admin::list_low_stock,
        admin::adjust_inventory,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        customers::list_customers,
        customers::get_customer,
        customers::delete_customer,
        admins::list_admins,
        admins::create_admin,
        admins::delete_admin,
        settings::list_settings,
        settings::update_setting,
        stats::overview,
        stats::revenue,
        stats::top_products
    ),
    components(
        schemas(
            User,
            LookupItem,
            Order,
            OrderItem,
            OrderStatus,
            OrderEvent,
            Setting,
            ProductCard,
            PriceBucket,
            ProductSort,
            SizeStock,
            CreateProductRequest,
            UpdateProductRequest,
            InventoryAdjustRequest,
            ProductList,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ResetPasswordRequest,
            OtpPurpose,
            OtpRequest,
            OtpVerifyRequest,
            OtpIssued,
            OtpVerified,
            AddToCartRequest,
            CartItemDto,
            CartList,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            OrderList,
            OrderWithItems,
            CustomerDetail,
            UserList,
            CreateAdminRequest,
            UpdateSettingRequest,
            SettingList,
            Overview,
            StatusCount,
            MonthlyRevenue,
            TopProduct,
            BreakerState,
            ErrorData,
            Meta,
            ApiResponse<ProductList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Products", description = "Storefront catalog"),
        (name = "Catalog", description = "Category, brand and league lookups"),
        (name = "Auth", description = "Accounts, login and one-time codes"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Checkout, order history and live status"),
        (name = "Admin", description = "Back office"),
        (name = "Stats", description = "Back office reports"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiDocument> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
