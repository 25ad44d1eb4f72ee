use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    audit::AuditEntry,
    domain::{
        cart::{Cart, CartSummary},
        lifecycle::OrderStatus,
        subscription::{
            DeliveryDay, MealPlan, MealTime, Subscription, SubscriptionPlan, SubscriptionQuote,
            SubscriptionStatus,
        },
    },
    dto::{
        auth::{AuthResponse, DeliveryRegistration, KitchenRegistration, LoginRequest, RegisterRequest},
        cart::{AddToCartRequest, UpdateQuantityRequest},
        catalog::{KitchenList, KitchenMenu, PartnerList},
        favorites::{AddFavoriteRequest, FavoriteKitchenList},
        subscriptions::{SubscriptionList, SubscriptionRequest},
        orders::{
            BidList, BidQuote, CheckoutRequest, KitchenBoard, KitchenStats, OrderList,
            PlaceBidRequest, UpdateOrderStatusRequest,
        },
    },
    models::{
        BidStatus, CartItem, CloudKitchen, DeliveryAddress, DeliveryBid, DeliveryPartner,
        DeliveryProfile, DeliveryRoute, KitchenProfile, KitchenType, MenuItem, OperatingHours,
        Order, OrderItem, Role, TrafficCondition, User, VehicleType,
    },
    response::{ApiResponse, Meta},
    routes::{
        admin, auth, cart, catalog, delivery, favorites, health, kitchen, orders, params,
        subscriptions,
    },
    services::admin_service::{AuditLogList, PlatformStats, UserList},
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
        auth::register,
        auth::login,
        auth::me,
        catalog::list_kitchens,
        catalog::get_kitchen,
        catalog::kitchen_menu,
        catalog::list_partners,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        orders::list_order,
        orders::checkout,
        orders::get_order,
        orders::cancel_order,
        orders::list_bids,
        orders::simulate_bids,
        orders::accept_bid,
        kitchen::kitchen_board,
        kitchen::advance_order,
        kitchen::kitchen_stats,
        delivery::available_orders,
        delivery::my_deliveries,
        delivery::place_bid,
        delivery::accept_order,
        delivery::pickup_order,
        delivery::deliver_order,
        favorites::add_favorite,
        favorites::remove_favorite,
        favorites::list_favorites,
        subscriptions::quote_subscription,
        subscriptions::create_subscription,
        subscriptions::list_subscriptions,
        subscriptions::cancel_subscription,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::list_users,
        admin::list_audit_logs,
        admin::platform_stats
    ),
    components(
        schemas(
            Role,
            User,
            KitchenProfile,
            DeliveryProfile,
            KitchenType,
            OperatingHours,
            CloudKitchen,
            MenuItem,
            VehicleType,
            DeliveryPartner,
            CartItem,
            Cart,
            CartSummary,
            DeliveryAddress,
            OrderItem,
            OrderStatus,
            Order,
            TrafficCondition,
            DeliveryRoute,
            BidStatus,
            DeliveryBid,
            AuditEntry,
            RegisterRequest,
            KitchenRegistration,
            DeliveryRegistration,
            LoginRequest,
            AuthResponse,
            AddToCartRequest,
            UpdateQuantityRequest,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            PlaceBidRequest,
            BidQuote,
            BidList,
            KitchenBoard,
            KitchenStats,
            KitchenList,
            KitchenMenu,
            PartnerList,
            AddFavoriteRequest,
            FavoriteKitchenList,
            SubscriptionPlan,
            MealTime,
            DeliveryDay,
            MealPlan,
            SubscriptionRequest,
            SubscriptionQuote,
            SubscriptionStatus,
            Subscription,
            SubscriptionList,
            OrderList,
            UserList,
            AuditLogList,
            PlatformStats,
            params::Pagination,
            params::KitchenQuery,
            params::OrderListQuery,
            params::UserListQuery,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<CartSummary>,
            ApiResponse<AuthResponse>,
            ApiResponse<KitchenList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Mock sign-in for every role"),
        (name = "Kitchens", description = "Kitchen, menu and partner catalog"),
        (name = "Cart", description = "Single-kitchen cart"),
        (name = "Orders", description = "Checkout, tracking and partner bids"),
        (name = "Kitchen", description = "Kitchen order board"),
        (name = "Delivery", description = "Delivery partner workflow"),
        (name = "Favorites", description = "Favorite kitchens"),
        (name = "Subscriptions", description = "Recurring meal plans"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
