//! Delivery bid pricing.
//!
//! A [`PricingPolicy`] turns an order, a vehicle and a set of road/weather
//! [`Conditions`] into a bid. Conditions are sampled separately so a policy
//! stays a pure function and can be swapped for one backed by real market
//! data without touching callers.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, seq::IndexedRandom};
use uuid::Uuid;

use crate::models::{
    BidStatus, DeliveryBid, DeliveryPartner, DeliveryRoute, Order, TrafficCondition, VehicleType,
};

pub const BASE_DELIVERY_MINUTES: f64 = 25.0;
pub const PRIORITY_MULTIPLIER: f64 = 1.3;
pub const PRIORITY_BOOST_AMOUNT: f64 = 1.2;
pub const PRIORITY_BOOST_TIME: f64 = 0.8;
pub const PEAK_MULTIPLIER: f64 = 1.2;
pub const WEATHER_PRICE_MULTIPLIER: f64 = 1.1;
pub const WEATHER_TIME_MULTIPLIER: f64 = 1.2;
pub const AVERAGE_MARKET_PRICE: i64 = 2500;
pub const BID_TTL_MINUTES: i64 = 5;
pub const MAX_SIMULATED_BIDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleProfile {
    pub vehicle: VehicleType,
    /// Minor units.
    pub base_price: i64,
    pub time_multiplier: f64,
}

pub fn vehicle_profile(vehicle: VehicleType) -> VehicleProfile {
    let (base_price, time_multiplier) = match vehicle {
        VehicleType::Cycle => (1500, 1.2),
        VehicleType::EVehicle => (1800, 1.0),
        VehicleType::Motorcycle => (2200, 0.9),
        VehicleType::PublicTransport => (2000, 1.3),
        VehicleType::Car => (2800, 1.1),
    };
    VehicleProfile {
        vehicle,
        base_price,
        time_multiplier,
    }
}

pub fn traffic_multiplier(traffic: TrafficCondition) -> f64 {
    match traffic {
        TrafficCondition::Light => 0.9,
        TrafficCondition::Moderate => 1.0,
        TrafficCondition::Heavy => 1.3,
    }
}

/// Lunch (12-14h) and dinner (19-21h) rush, inclusive.
pub fn is_peak_hour(hour: u32) -> bool {
    (12..=14).contains(&hour) || (19..=21).contains(&hour)
}

/// Inclusive band a quote is clamped into: `[base * 0.8, base * 1.5 * priority]`.
pub fn price_band(vehicle: VehicleType, priority: bool) -> (i64, i64) {
    let base = vehicle_profile(vehicle).base_price as f64;
    let priority = if priority { PRIORITY_MULTIPLIER } else { 1.0 };
    (
        (base * 0.8).round() as i64,
        (base * 1.5 * priority).round() as i64,
    )
}

/// Chance, in percent, that a bid wins the job.
pub fn win_probability(bid_amount: i64, partner_rating: f64) -> f64 {
    let avg = AVERAGE_MARKET_PRICE as f64;
    let competitiveness = (100.0 - ((bid_amount as f64 - avg) / avg) * 50.0).max(0.0);
    let rating_bonus = (partner_rating - 4.0) * 20.0;
    (competitiveness + rating_bonus).clamp(5.0, 95.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    /// Scales price, in `[1.0, 1.5)`.
    pub distance_factor: f64,
    /// Scales travel time, in `[1.0, 1.3)`.
    pub eta_distance_factor: f64,
    pub traffic: TrafficCondition,
    pub peak_hour: bool,
    pub weather_surcharge: bool,
    pub weather_delay: bool,
    pub route_distance_km: f64,
}

impl Conditions {
    /// No surcharges, moderate traffic.
    pub fn calm() -> Self {
        Self {
            distance_factor: 1.0,
            eta_distance_factor: 1.0,
            traffic: TrafficCondition::Moderate,
            peak_hour: false,
            weather_surcharge: false,
            weather_delay: false,
            route_distance_km: 2.0,
        }
    }

    pub fn sample<R: Rng + ?Sized>(rng: &mut R, hour: u32) -> Self {
        let traffic = match rng.random_range(0..3) {
            0 => TrafficCondition::Light,
            1 => TrafficCondition::Moderate,
            _ => TrafficCondition::Heavy,
        };
        Self {
            distance_factor: rng.random_range(1.0..1.5),
            eta_distance_factor: rng.random_range(1.0..1.3),
            traffic,
            peak_hour: is_peak_hour(hour),
            weather_surcharge: rng.random_bool(0.3),
            weather_delay: rng.random_bool(0.2),
            route_distance_km: rng.random_range(2.0..10.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuoteRequest<'a> {
    pub order: &'a Order,
    pub partner_id: &'a str,
    pub partner_rating: f64,
    pub vehicle: VehicleType,
    /// Partner opts into the priority premium; ignored for non-priority orders.
    pub priority_boost: bool,
    pub now: DateTime<Utc>,
}

pub trait PricingPolicy: Send + Sync {
    fn quote(&self, request: &QuoteRequest<'_>, conditions: &Conditions) -> DeliveryBid;
}

/// Base fare per vehicle scaled by distance, priority, rating, rush hour and weather.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmartPricing;

impl SmartPricing {
    pub fn amount(&self, request: &QuoteRequest<'_>, conditions: &Conditions) -> i64 {
        let profile = vehicle_profile(request.vehicle);
        let priority = request.order.priority_delivery;

        let mut price = profile.base_price as f64 * conditions.distance_factor;
        if priority {
            price *= PRIORITY_MULTIPLIER;
        }
        price *= 1.0 + (request.partner_rating - 4.5) * 0.1;
        if conditions.peak_hour {
            price *= PEAK_MULTIPLIER;
        }
        if conditions.weather_surcharge {
            price *= WEATHER_PRICE_MULTIPLIER;
        }

        let (low, high) = price_band(request.vehicle, priority);
        (price.round() as i64).clamp(low, high)
    }

    pub fn estimated_minutes(&self, request: &QuoteRequest<'_>, conditions: &Conditions) -> i32 {
        let profile = vehicle_profile(request.vehicle);
        let mut minutes = BASE_DELIVERY_MINUTES
            * profile.time_multiplier
            * conditions.eta_distance_factor
            * traffic_multiplier(conditions.traffic);
        if conditions.weather_delay {
            minutes *= WEATHER_TIME_MULTIPLIER;
        }
        (minutes.round() as i32).max(1)
    }
}

impl PricingPolicy for SmartPricing {
    fn quote(&self, request: &QuoteRequest<'_>, conditions: &Conditions) -> DeliveryBid {
        let mut amount = self.amount(request, conditions);
        let mut minutes = self.estimated_minutes(request, conditions);

        if request.priority_boost && request.order.priority_delivery {
            amount = (amount as f64 * PRIORITY_BOOST_AMOUNT).round() as i64;
            minutes = ((minutes as f64 * PRIORITY_BOOST_TIME).round() as i32).max(1);
        }

        DeliveryBid {
            id: Uuid::new_v4(),
            order_id: request.order.id,
            delivery_partner_id: request.partner_id.to_string(),
            bid_amount: amount,
            estimated_time: minutes,
            vehicle_type: request.vehicle,
            delivery_route: DeliveryRoute {
                distance: (conditions.route_distance_km * 10.0).round() / 10.0,
                estimated_duration: minutes,
                traffic_condition: conditions.traffic,
            },
            status: BidStatus::Open,
            created_at: request.now,
            expires_at: request.now + Duration::minutes(BID_TTL_MINUTES),
        }
    }
}

/// Samples conditions and asks the configured policy for quotes.
#[derive(Clone)]
pub struct BidEstimator {
    policy: Arc<dyn PricingPolicy>,
}

impl Default for BidEstimator {
    fn default() -> Self {
        Self::new(Arc::new(SmartPricing))
    }
}

impl BidEstimator {
    pub fn new(policy: Arc<dyn PricingPolicy>) -> Self {
        Self { policy }
    }

    pub fn quote<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        request: &QuoteRequest<'_>,
        hour: u32,
    ) -> DeliveryBid {
        let conditions = Conditions::sample(rng, hour);
        self.policy.quote(request, &conditions)
    }

    /// One quote from each of the first few available partners, cheapest first.
    pub fn simulate_bids<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        order: &Order,
        partners: &[DeliveryPartner],
        now: DateTime<Utc>,
        hour: u32,
    ) -> Vec<DeliveryBid> {
        let mut bids: Vec<DeliveryBid> = partners
            .iter()
            .filter(|p| p.is_available)
            .take(MAX_SIMULATED_BIDS)
            .map(|partner| {
                let vehicle = partner
                    .available_vehicles
                    .choose(&mut *rng)
                    .copied()
                    .unwrap_or(VehicleType::Motorcycle);
                let request = QuoteRequest {
                    order,
                    partner_id: &partner.id,
                    partner_rating: partner.rating,
                    vehicle,
                    priority_boost: false,
                    now,
                };
                self.quote(&mut *rng, &request, hour)
            })
            .collect();
        bids.sort_by_key(|b| b.bid_amount);
        bids
    }
}
