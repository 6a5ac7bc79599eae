use serde::{Deserialize, Serialize};

use super::aggregate::OrderLine;

/// One storefront cart position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_name: String,
    pub unit_price: f64,
    pub qty: u32,
}

/// Session-scoped shopping cart.
///
/// The cart is owned by whoever drives a checkout session (a storefront
/// client, a test); there is no process-wide cart state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `change` to the quantity of `product_name`, creating the line on a
    /// positive change and dropping it when the quantity reaches zero.
    pub fn update_quantity(&mut self, product_name: &str, unit_price: f64, change: i32) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_name == product_name) {
            let new_qty = line.qty as i64 + change as i64;
            if new_qty <= 0 {
                self.lines.retain(|l| l.product_name != product_name);
            } else {
                line.qty = new_qty as u32;
            }
        } else if change > 0 {
            self.lines.push(CartLine {
                product_name: product_name.to_string(),
                unit_price,
                qty: change as u32,
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_qty(&self) -> u32 {
        self.lines.iter().map(|l| l.qty).sum()
    }

    pub fn total_amount(&self) -> f64 {
        self.lines.iter().map(|l| l.unit_price * l.qty as f64).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Convert cart positions into order lines
    pub fn to_order_lines(&self) -> Vec<OrderLine> {
        self.lines
            .iter()
            .map(|l| OrderLine {
                product_name: l.product_name.clone(),
                qty: l.qty,
                unit_price: l.unit_price,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_increment() {
        let mut cart = Cart::new();
        cart.update_quantity("Classic Choc Chip", 250.0, 1);
        cart.update_quantity("Classic Choc Chip", 250.0, 1);
        cart.update_quantity("Double Fudge", 300.0, 1);
        assert_eq!(cart.total_qty(), 3);
        assert_eq!(cart.total_amount(), 800.0);
    }

    #[test]
    fn decrement_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.update_quantity("Oatmeal Raisin Spice", 250.0, 1);
        cart.update_quantity("Oatmeal Raisin Spice", 250.0, -1);
        assert!(cart.is_empty());
    }

    #[test]
    fn negative_change_on_unknown_product_is_ignored() {
        let mut cart = Cart::new();
        cart.update_quantity("White Choc Macadamia", 350.0, -1);
        assert!(cart.is_empty());
    }
}
