use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::subscription::{DeliveryDay, MealPlan, MealTime, Subscription, SubscriptionPlan},
    models::DeliveryAddress,
};

fn lunch() -> Vec<MealTime> {
    vec![MealTime::Lunch]
}

fn one() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubscriptionRequest {
    pub kitchen_id: String,
    pub plan: SubscriptionPlan,
    #[serde(default = "DeliveryDay::default_days")]
    pub delivery_days: Vec<DeliveryDay>,
    #[serde(default = "lunch")]
    pub meal_times: Vec<MealTime>,
    #[serde(default = "one")]
    pub portions: i32,
    /// Needed to subscribe; quotes ignore it.
    pub delivery_address: Option<DeliveryAddress>,
}

impl SubscriptionRequest {
    pub fn meal_plan(&self) -> MealPlan {
        MealPlan {
            plan: self.plan,
            delivery_days: self.delivery_days.clone(),
            meal_times: self.meal_times.clone(),
            portions: self.portions,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionList {
    pub items: Vec<Subscription>,
}
