//! Recurring meal plans.
//!
//! A plan repeats the chosen meal slots on the chosen weekdays for one week
//! or one month (counted as four weeks). Every delivered meal costs the same
//! flat price per portion.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{CloudKitchen, DeliveryAddress};

/// Minor units per portion per delivery.
pub const PRICE_PER_MEAL: i64 = 12000;
pub const MAX_PORTIONS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    Weekly,
    Monthly,
}

impl SubscriptionPlan {
    pub fn weeks(self) -> i32 {
        match self {
            SubscriptionPlan::Weekly => 1,
            SubscriptionPlan::Monthly => 4,
        }
    }

    /// Calendar days from the start date to the end date.
    pub fn length_days(self) -> u64 {
        match self {
            SubscriptionPlan::Weekly => 7,
            SubscriptionPlan::Monthly => 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MealTime {
    Breakfast,
    Lunch,
    Dinner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum DeliveryDay {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DeliveryDay {
    pub fn default_days() -> Vec<DeliveryDay> {
        vec![DeliveryDay::Mon, DeliveryDay::Wed, DeliveryDay::Fri]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("pick at least one delivery day")]
    NoDeliveryDays,

    #[error("pick at least one meal time")]
    NoMealTimes,

    #[error("portions must be between 1 and {MAX_PORTIONS}, got {0}")]
    InvalidPortions(i32),

    #[error("kitchen {0} does not offer subscriptions")]
    NotOffered(String),
}

/// What the customer picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MealPlan {
    pub plan: SubscriptionPlan,
    pub delivery_days: Vec<DeliveryDay>,
    pub meal_times: Vec<MealTime>,
    pub portions: i32,
}

impl MealPlan {
    /// Sorted, duplicate-free selection, or the first rule it breaks.
    pub fn validated(mut self) -> Result<Self, SubscriptionError> {
        self.delivery_days.sort();
        self.delivery_days.dedup();
        self.meal_times.sort();
        self.meal_times.dedup();

        if self.delivery_days.is_empty() {
            return Err(SubscriptionError::NoDeliveryDays);
        }
        if self.meal_times.is_empty() {
            return Err(SubscriptionError::NoMealTimes);
        }
        if !(1..=MAX_PORTIONS).contains(&self.portions) {
            return Err(SubscriptionError::InvalidPortions(self.portions));
        }
        Ok(self)
    }

    pub fn deliveries_per_week(&self) -> i32 {
        (self.delivery_days.len() * self.meal_times.len()) as i32
    }

    pub fn total_deliveries(&self) -> i32 {
        self.deliveries_per_week() * self.plan.weeks()
    }

    pub fn estimated_price(&self) -> i64 {
        PRICE_PER_MEAL * i64::from(self.total_deliveries()) * i64::from(self.portions)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionQuote {
    pub kitchen_id: String,
    #[serde(flatten)]
    pub meal_plan: MealPlan,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_deliveries: i32,
    pub price_per_meal: i64,
    pub estimated_price: i64,
}

pub fn quote(
    meal_plan: MealPlan,
    kitchen: &CloudKitchen,
    today: NaiveDate,
) -> Result<SubscriptionQuote, SubscriptionError> {
    if !kitchen.subscription_available {
        return Err(SubscriptionError::NotOffered(kitchen.id.clone()));
    }
    let meal_plan = meal_plan.validated()?;
    let end_date = today
        .checked_add_days(Days::new(meal_plan.plan.length_days()))
        .unwrap_or(NaiveDate::MAX);

    Ok(SubscriptionQuote {
        kitchen_id: kitchen.id.clone(),
        start_date: today,
        end_date,
        total_deliveries: meal_plan.total_deliveries(),
        price_per_meal: PRICE_PER_MEAL,
        estimated_price: meal_plan.estimated_price(),
        meal_plan,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Subscription {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub quote: SubscriptionQuote,
    pub delivery_address: DeliveryAddress,
    pub status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KitchenType, OperatingHours};

    fn kitchen(subscriptions: bool) -> CloudKitchen {
        CloudKitchen {
            id: "ck-test".into(),
            name: "Tiffin House".into(),
            description: String::new(),
            rating: 4.4,
            delivery_time: 35,
            delivery_fee: 3000,
            cuisine_type: vec!["South Indian".into()],
            address: String::new(),
            kitchen_type: KitchenType::HomeOffice,
            operating_hours: OperatingHours {
                open: "07:00".into(),
                close: "21:00".into(),
                days: vec![],
            },
            min_order_amount: 0,
            subscription_available: subscriptions,
        }
    }

    fn plan(plan: SubscriptionPlan, portions: i32) -> MealPlan {
        MealPlan {
            plan,
            delivery_days: DeliveryDay::default_days(),
            meal_times: vec![MealTime::Lunch],
            portions,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekly_plan_prices_each_delivery() {
        let q = quote(plan(SubscriptionPlan::Weekly, 1), &kitchen(true), day(2026, 3, 2)).unwrap();
        assert_eq!(q.total_deliveries, 3);
        assert_eq!(q.estimated_price, 3 * PRICE_PER_MEAL);
        assert_eq!(q.start_date, day(2026, 3, 2));
        assert_eq!(q.end_date, day(2026, 3, 9));
    }

    #[test]
    fn monthly_plan_counts_four_weeks() {
        let mut meal_plan = plan(SubscriptionPlan::Monthly, 2);
        meal_plan.meal_times = vec![MealTime::Dinner, MealTime::Breakfast];
        let q = quote(meal_plan, &kitchen(true), day(2026, 1, 15)).unwrap();
        assert_eq!(q.total_deliveries, 3 * 2 * 4);
        assert_eq!(q.estimated_price, 24 * 2 * PRICE_PER_MEAL);
        assert_eq!(q.end_date, day(2026, 2, 14));
        assert_eq!(q.meal_plan.meal_times, vec![MealTime::Breakfast, MealTime::Dinner]);
    }

    #[test]
    fn repeated_picks_count_once() {
        let mut meal_plan = plan(SubscriptionPlan::Weekly, 1);
        meal_plan.delivery_days = vec![DeliveryDay::Fri, DeliveryDay::Mon, DeliveryDay::Fri];
        let validated = meal_plan.validated().unwrap();
        assert_eq!(validated.delivery_days, vec![DeliveryDay::Mon, DeliveryDay::Fri]);
        assert_eq!(validated.total_deliveries(), 2);
    }

    #[test]
    fn invalid_selections_are_refused() {
        let mut no_days = plan(SubscriptionPlan::Weekly, 1);
        no_days.delivery_days.clear();
        assert_eq!(no_days.validated(), Err(SubscriptionError::NoDeliveryDays));

        let mut no_meals = plan(SubscriptionPlan::Weekly, 1);
        no_meals.meal_times.clear();
        assert_eq!(no_meals.validated(), Err(SubscriptionError::NoMealTimes));

        assert_eq!(
            plan(SubscriptionPlan::Weekly, 0).validated(),
            Err(SubscriptionError::InvalidPortions(0))
        );
        assert_eq!(
            plan(SubscriptionPlan::Weekly, 11).validated(),
            Err(SubscriptionError::InvalidPortions(11))
        );

        let refused = quote(plan(SubscriptionPlan::Weekly, 1), &kitchen(false), day(2026, 3, 2));
        assert_eq!(refused, Err(SubscriptionError::NotOffered("ck-test".into())));
    }
}
