//! Shopping commands: coupons, tracking, order history.

use paperback_core::{TrackingNumber, UserId};
use paperback_storefront::api::Storefront;

use super::note_degradation;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Check whether a coupon code is valid and what it is worth.
pub async fn coupon(shop: &Storefront, code: &str, user_id: &str) -> CommandResult {
    let result = shop.pricing.validate_coupon(code, &UserId::new(user_id)).await;
    note_degradation(&result);

    let validation = result.data();
    if validation.valid {
        println!(
            "{code} is valid: {} off ({}%)",
            validation.discount_amount.display(),
            validation.discount_percent
        );
    } else {
        println!("{code} is not a valid coupon");
    }
    Ok(())
}

/// Print the tracking history for a shipment.
pub async fn track(shop: &Storefront, tracking_number: &str) -> CommandResult {
    let tracking_number = TrackingNumber::new(tracking_number);
    let result = shop.shipping.track(&tracking_number).await;
    note_degradation(&result);

    let Some(info) = result.data() else {
        return Err(format!("no tracking history for {tracking_number}").into());
    };
    println!(
        "{} via {} - {}",
        info.tracking_number, info.carrier, info.status
    );
    println!(
        "estimated delivery: {}",
        info.estimated_delivery.format("%Y-%m-%d")
    );
    for event in &info.events {
        println!(
            "  {}  {:<28} {}",
            event.timestamp.format("%Y-%m-%d %H:%M"),
            event.status,
            event.location
        );
    }
    Ok(())
}

/// Print a user's order history.
pub async fn orders(shop: &Storefront, user_id: &str) -> CommandResult {
    let user_id = UserId::new(user_id);
    let result = shop.orders.history(&user_id).await;
    note_degradation(&result);

    let orders = result.data();
    if orders.is_empty() {
        println!("no orders for {user_id}");
        return Ok(());
    }
    for order in orders {
        println!(
            "{}  {}  {} item(s)  {}  {}",
            order.id,
            order.created_at.format("%Y-%m-%d"),
            order.items.len(),
            order.total_amount.display(),
            order.status
        );
        if let Some(tracking) = &order.tracking_number {
            println!("      tracking: {tracking}");
        }
    }
    Ok(())
}
