//! Read-only kitchen, menu and delivery partner catalog.

use crate::models::{
    CloudKitchen, DeliveryPartner, KitchenType, MenuItem, OperatingHours, VehicleType,
};

#[derive(Debug, Clone, Default)]
pub struct KitchenFilter {
    /// Case-insensitive match on name, description or cuisine.
    pub q: Option<String>,
    pub cuisine: Option<String>,
    pub vegetarian_only: bool,
    pub subscription_only: bool,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    kitchens: Vec<CloudKitchen>,
    menu_items: Vec<MenuItem>,
    partners: Vec<DeliveryPartner>,
}

impl Catalog {
    pub fn new(
        kitchens: Vec<CloudKitchen>,
        menu_items: Vec<MenuItem>,
        partners: Vec<DeliveryPartner>,
    ) -> Self {
        Self {
            kitchens,
            menu_items,
            partners,
        }
    }

    pub fn kitchens(&self) -> &[CloudKitchen] {
        &self.kitchens
    }

    pub fn kitchen(&self, id: &str) -> Option<&CloudKitchen> {
        self.kitchens.iter().find(|k| k.id == id)
    }

    pub fn menu(&self, kitchen_id: &str) -> Vec<&MenuItem> {
        self.menu_items
            .iter()
            .filter(|item| item.restaurant_id == kitchen_id)
            .collect()
    }

    pub fn menu_item(&self, id: &str) -> Option<&MenuItem> {
        self.menu_items.iter().find(|item| item.id == id)
    }

    pub fn partners(&self) -> &[DeliveryPartner] {
        &self.partners
    }

    pub fn partner(&self, id: &str) -> Option<&DeliveryPartner> {
        self.partners.iter().find(|p| p.id == id)
    }

    pub fn available_partners(&self) -> Vec<&DeliveryPartner> {
        self.partners.iter().filter(|p| p.is_available).collect()
    }

    pub fn search(&self, filter: &KitchenFilter) -> Vec<&CloudKitchen> {
        let q = filter
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let cuisine = filter
            .cuisine
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase);

        self.kitchens
            .iter()
            .filter(|k| {
                q.as_ref().is_none_or(|q| {
                    k.name.to_lowercase().contains(q)
                        || k.description.to_lowercase().contains(q)
                        || k.cuisine_type.iter().any(|c| c.to_lowercase().contains(q))
                })
            })
            .filter(|k| {
                cuisine
                    .as_ref()
                    .is_none_or(|c| k.cuisine_type.iter().any(|kc| kc.to_lowercase() == *c))
            })
            .filter(|k| !filter.subscription_only || k.subscription_available)
            .filter(|k| {
                !filter.vegetarian_only
                    || self
                        .menu_items
                        .iter()
                        .filter(|item| item.restaurant_id == k.id)
                        .all(|item| item.vegetarian)
            })
            .collect()
    }

    pub fn demo() -> Self {
        let kitchens = vec![
            kitchen(
                "ck-1",
                "Spice Route Kitchen",
                "North Indian curries and tandoor breads",
                4.6,
                30,
                4000,
                &["Indian", "North Indian"],
                "12 Residency Road, Bengaluru",
                KitchenType::CloudKitchen,
                ("11:00", "23:00"),
                20000,
                true,
            ),
            kitchen(
                "ck-2",
                "Green Bowl Co.",
                "Salads, grain bowls and cold-pressed juices",
                4.4,
                25,
                3000,
                &["Healthy", "Salads"],
                "88 Koramangala 5th Block, Bengaluru",
                KitchenType::HomeOffice,
                ("08:00", "21:00"),
                15000,
                true,
            ),
            kitchen(
                "ck-3",
                "Dragon Wok",
                "Indo-Chinese noodles, momos and stir fries",
                4.2,
                35,
                3500,
                &["Chinese", "Asian"],
                "5 HSR Layout Sector 2, Bengaluru",
                KitchenType::CloudKitchen,
                ("12:00", "23:30"),
                25000,
                false,
            ),
            kitchen(
                "ck-4",
                "Amma's Tiffin",
                "Home-style South Indian meals",
                4.8,
                40,
                2500,
                &["Indian", "South Indian"],
                "21 Jayanagar 4th Block, Bengaluru",
                KitchenType::Both,
                ("07:00", "15:00"),
                10000,
                true,
            ),
        ];

        let menu_items = vec![
            item("mi-1", "ck-1", "Butter Chicken", "Creamy tomato gravy", 32000, "Mains", false),
            item("mi-2", "ck-1", "Paneer Tikka", "Char-grilled cottage cheese", 26000, "Starters", true),
            item("mi-3", "ck-1", "Garlic Naan", "Tandoor baked", 6000, "Breads", true),
            item("mi-4", "ck-1", "Dal Makhani", "Slow-cooked black lentils", 22000, "Mains", true),
            item("mi-5", "ck-2", "Quinoa Power Bowl", "Quinoa, chickpeas, greens", 28000, "Bowls", true),
            item("mi-6", "ck-2", "Greek Salad", "Feta, olives, cucumber", 24000, "Salads", true),
            item("mi-7", "ck-2", "Green Detox Juice", "Spinach, apple, ginger", 15000, "Drinks", true),
            item("mi-8", "ck-3", "Hakka Noodles", "Wok-tossed with vegetables", 18000, "Noodles", true),
            item("mi-9", "ck-3", "Chicken Momos", "Steamed, with red chutney", 16000, "Starters", false),
            item("mi-10", "ck-3", "Chilli Chicken", "Dry, Indo-Chinese style", 24000, "Mains", false),
            item("mi-11", "ck-4", "Masala Dosa", "Potato filling, sambar, chutney", 9000, "Breakfast", true),
            item("mi-12", "ck-4", "Idli Vada Combo", "Two idli, one vada", 8000, "Breakfast", true),
            item("mi-13", "ck-4", "Meals Thali", "Rice, sambar, rasam, two curries", 15000, "Meals", true),
        ];

        let partners = vec![
            partner("dp-1", "Ravi Kumar", 4.8, 1240, true, &[VehicleType::Motorcycle, VehicleType::EVehicle], 22),
            partner("dp-2", "Anita Desai", 4.6, 860, true, &[VehicleType::Cycle], 28),
            partner("dp-3", "Suresh Babu", 4.3, 410, true, &[VehicleType::Car, VehicleType::Motorcycle], 26),
            partner("dp-4", "Meera Nair", 4.9, 1530, false, &[VehicleType::EVehicle], 20),
            partner("dp-5", "Imran Sheikh", 4.1, 95, true, &[VehicleType::PublicTransport, VehicleType::Cycle], 34),
        ];

        let mut catalog = Self::new(kitchens, menu_items, partners);
        // Sold out for the day.
        if let Some(item) = catalog.menu_items.iter_mut().find(|i| i.id == "mi-10") {
            item.available = false;
        }
        catalog
    }
}

#[allow(clippy::too_many_arguments)]
fn kitchen(
    id: &str,
    name: &str,
    description: &str,
    rating: f64,
    delivery_time: i32,
    delivery_fee: i64,
    cuisine: &[&str],
    address: &str,
    kitchen_type: KitchenType,
    (open, close): (&str, &str),
    min_order_amount: i64,
    subscription_available: bool,
) -> CloudKitchen {
    CloudKitchen {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        rating,
        delivery_time,
        delivery_fee,
        cuisine_type: cuisine.iter().map(|c| c.to_string()).collect(),
        address: address.to_string(),
        kitchen_type,
        operating_hours: OperatingHours {
            open: open.to_string(),
            close: close.to_string(),
            days: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
        },
        min_order_amount,
        subscription_available,
    }
}

fn item(
    id: &str,
    kitchen_id: &str,
    name: &str,
    description: &str,
    price: i64,
    category: &str,
    vegetarian: bool,
) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        restaurant_id: kitchen_id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        category: category.to_string(),
        available: true,
        vegetarian,
    }
}

fn partner(
    id: &str,
    name: &str,
    rating: f64,
    completed_deliveries: i32,
    is_available: bool,
    vehicles: &[VehicleType],
    average_delivery_time: i32,
) -> DeliveryPartner {
    DeliveryPartner {
        id: id.to_string(),
        name: name.to_string(),
        phone: format!("+91-98450-{:05}", completed_deliveries),
        rating,
        completed_deliveries,
        is_available,
        available_vehicles: vehicles.to_vec(),
        average_delivery_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_menu_item_belongs_to_a_kitchen() {
        let catalog = Catalog::demo();
        for kitchen in catalog.kitchens() {
            assert!(!catalog.menu(&kitchen.id).is_empty(), "{} has no menu", kitchen.id);
        }
        let total: usize = catalog
            .kitchens()
            .iter()
            .map(|k| catalog.menu(&k.id).len())
            .sum();
        assert_eq!(total, 13);
    }

    #[test]
    fn search_matches_name_and_cuisine() {
        let catalog = Catalog::demo();
        let hits = catalog.search(&KitchenFilter {
            q: Some("wok".into()),
            ..Default::default()
        });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "ck-3");

        let indian = catalog.search(&KitchenFilter {
            cuisine: Some("indian".into()),
            ..Default::default()
        });
        let ids: Vec<_> = indian.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids, vec!["ck-1", "ck-4"]);
    }

    #[test]
    fn vegetarian_filter_requires_all_veg_menu() {
        let catalog = Catalog::demo();
        let veg = catalog.search(&KitchenFilter {
            vegetarian_only: true,
            ..Default::default()
        });
        let ids: Vec<_> = veg.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids, vec!["ck-2", "ck-4"]);
    }

    #[test]
    fn unavailable_partners_are_hidden() {
        let catalog = Catalog::demo();
        assert!(catalog.available_partners().iter().all(|p| p.id != "dp-4"));
        assert!(catalog.partner("dp-4").is_some());
    }
}
