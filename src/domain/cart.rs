//! Single-kitchen shopping cart with derived totals.
//!
//! A cart only ever holds items from one kitchen. Adding an item from a
//! different kitchen is refused unless the caller explicitly asks to
//! replace the current contents.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::{CartItem, CloudKitchen, MenuItem};

/// Flat surcharge applied to every cart and order, in minor units.
pub const PLATFORM_FEE: i64 = 250;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity must be greater than 0")]
    InvalidQuantity,

    #[error("menu item {0} is not available")]
    Unavailable(String),

    #[error("menu item {item} does not belong to kitchen {kitchen}")]
    WrongKitchen { item: String, kitchen: String },

    #[error("cart holds items from kitchen {current}; confirm to replace them with items from {requested}")]
    KitchenMismatch { current: String, requested: String },

    #[error("menu item {0} is not in the cart")]
    NotInCart(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Merged,
    KitchenReplaced,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    pub kitchen: Option<CloudKitchen>,
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartSummary {
    pub kitchen: Option<CloudKitchen>,
    pub items: Vec<CartItem>,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub platform_fee: i64,
    pub total: i64,
    pub item_count: i32,
    /// Distinct menu items, independent of quantity.
    pub line_count: usize,
}

impl Cart {
    pub fn add_item(
        &mut self,
        item: MenuItem,
        quantity: i32,
        instructions: Option<String>,
        kitchen: &CloudKitchen,
        replace_kitchen: bool,
    ) -> Result<AddOutcome, CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity);
        }
        if !item.available {
            return Err(CartError::Unavailable(item.id));
        }
        if item.restaurant_id != kitchen.id {
            return Err(CartError::WrongKitchen {
                item: item.id,
                kitchen: kitchen.id.clone(),
            });
        }
        let instructions = instructions
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if let Some(current) = self.kitchen.as_ref().filter(|k| k.id != kitchen.id) {
            if !self.items.is_empty() {
                if !replace_kitchen {
                    return Err(CartError::KitchenMismatch {
                        current: current.id.clone(),
                        requested: kitchen.id.clone(),
                    });
                }
                self.items = vec![CartItem {
                    item,
                    quantity,
                    special_instructions: instructions,
                }];
                self.kitchen = Some(kitchen.clone());
                return Ok(AddOutcome::KitchenReplaced);
            }
            self.kitchen = None;
        }

        if self.kitchen.is_none() {
            self.kitchen = Some(kitchen.clone());
        }

        match self.items.iter_mut().find(|line| line.item.id == item.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
                if instructions.is_some() {
                    line.special_instructions = instructions;
                }
                Ok(AddOutcome::Merged)
            }
            None => {
                self.items.push(CartItem {
                    item,
                    quantity,
                    special_instructions: instructions,
                });
                Ok(AddOutcome::Added)
            }
        }
    }

    pub fn remove_item(&mut self, item_id: &str) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|line| line.item.id != item_id);
        if self.items.len() == before {
            return Err(CartError::NotInCart(item_id.to_string()));
        }
        if self.items.is_empty() {
            self.kitchen = None;
        }
        Ok(())
    }

    /// Set a line's quantity; zero or below drops the line.
    pub fn update_quantity(&mut self, item_id: &str, quantity: i32) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove_item(item_id);
        }
        let line = self
            .items
            .iter_mut()
            .find(|line| line.item.id == item_id)
            .ok_or_else(|| CartError::NotInCart(item_id.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.kitchen = None;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn subtotal(&self) -> i64 {
        self.items
            .iter()
            .map(|line| line.item.price * i64::from(line.quantity))
            .sum()
    }

    pub fn delivery_fee(&self) -> i64 {
        self.kitchen.as_ref().map_or(0, |k| k.delivery_fee)
    }

    pub fn platform_fee(&self) -> i64 {
        PLATFORM_FEE
    }

    pub fn total(&self) -> i64 {
        self.subtotal() + self.delivery_fee() + self.platform_fee()
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> i32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary {
            kitchen: self.kitchen.clone(),
            items: self.items.clone(),
            subtotal: self.subtotal(),
            delivery_fee: self.delivery_fee(),
            platform_fee: self.platform_fee(),
            total: self.total(),
            item_count: self.item_count(),
            line_count: self.line_count(),
        }
    }
}
