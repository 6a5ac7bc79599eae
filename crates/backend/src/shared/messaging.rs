use contracts::domain::a002_order::aggregate::Order;

/// Build a wa.me deep link carrying `message` as the pre-filled text
pub fn whatsapp_link(phone_number: &str, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        phone_number,
        urlencoding::encode(message)
    )
}

/// Pre-filled WhatsApp text announcing a placed storefront order.
///
/// Best-effort presentation only; nothing in the order flow depends on the
/// customer actually sending it.
pub fn order_message(order: &Order) -> String {
    let mut message = format!("*New Order: {}*\n", order.base.code);
    message.push_str(&format!("Name: {}\n", order.header.customer_name));
    message.push_str(&format!("Address: {}\n\n", order.header.address));
    message.push_str("*Items:*\n");

    for line in &order.lines {
        message.push_str(&format!(
            "{} x {} = ₹{}\n",
            line.qty,
            line.product_name,
            line.line_total()
        ));
    }

    message.push_str(&format!(
        "\n*Total to Pay: ₹{}*",
        order.header.total_amount.unwrap_or_else(|| order.computed_total())
    ));
    message.push_str("\n\n(I have placed this order on your website. Please check Admin Panel.)");
    message
}

/// Pre-filled WhatsApp text for a corporate inquiry
pub fn corporate_inquiry_message(
    contact_name: &str,
    company: &str,
    event: &str,
    estimated_qty: u32,
) -> String {
    let mut message = String::from("*Corporate Inquiry*\n\n");
    message.push_str(&format!("Name: {}\n", contact_name));
    message.push_str(&format!("Company: {}\n", company));
    message.push_str(&format!("Event: {}\n", event));
    message.push_str(&format!("Est. Quantity: {}\n", estimated_qty));
    message.push_str("\nHello! I'd like to plan a corporate order.");
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use contracts::domain::a002_order::aggregate::{
        Order, OrderHeader, OrderLine, OrderState, OrderStatus, OrderType,
    };

    fn sample_order() -> Order {
        Order::new_for_insert(
            "ORD-493021".into(),
            "Asha - 2 items".into(),
            OrderHeader {
                customer_name: "Asha".into(),
                phone: Some("9845012345".into()),
                whatsapp_phone: None,
                address: "12 Lake Rd".into(),
                order_type: Some(OrderType::Retail),
                total_amount: Some(800.0),
            },
            vec![
                OrderLine {
                    product_name: "Classic Choc Chip".into(),
                    qty: 2,
                    unit_price: 250.0,
                },
                OrderLine {
                    product_name: "Double Fudge".into(),
                    qty: 1,
                    unit_price: 300.0,
                },
            ],
            OrderState {
                status: OrderStatus::Pending,
                placed_at: Some(Utc::now()),
                status_changed_at: None,
            },
        )
    }

    #[test]
    fn order_message_lists_items_and_total() {
        let message = order_message(&sample_order());
        assert!(message.contains("*New Order: ORD-493021*"));
        assert!(message.contains("2 x Classic Choc Chip = ₹500"));
        assert!(message.contains("*Total to Pay: ₹800*"));
    }

    #[test]
    fn order_message_falls_back_to_computed_total() {
        let mut order = sample_order();
        order.header.total_amount = None;
        assert!(order_message(&order).contains("*Total to Pay: ₹800*"));
    }

    #[test]
    fn link_is_url_encoded() {
        let link = whatsapp_link("918105487345", "*New Order*\nName: Asha");
        assert!(link.starts_with("https://wa.me/918105487345?text="));
        assert!(!link.contains('\n'));
        assert!(!link.contains('*') || link.contains("%2A"));
    }
}
