//! Test fixtures for creating marketplace data
#![allow(dead_code)]

use bazari::orm::{
    cart_items, chat_messages, chat_rooms, notifications, order_items, orders, payments, products,
    reviews, security_events, users, vendors, verification_codes,
};
use chrono::{Duration, Utc};
use sea_orm::{entity::*, ActiveValue::Set, DatabaseConnection, DbErr};

pub async fn create_user(
    db: &DatabaseConnection,
    email: Option<&str>,
    phone: Option<&str>,
    role: users::Role,
) -> Result<users::Model, DbErr> {
    users::ActiveModel {
        email: Set(email.map(str::to_owned)),
        phone: Set(phone.map(str::to_owned)),
        role: Set(role),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_vendor(
    db: &DatabaseConnection,
    user_id: i32,
    shop_name: &str,
) -> Result<vendors::Model, DbErr> {
    vendors::ActiveModel {
        user_id: Set(user_id),
        shop_name: Set(shop_name.to_owned()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_product(
    db: &DatabaseConnection,
    vendor_id: i32,
    name: &str,
) -> Result<products::Model, DbErr> {
    products::ActiveModel {
        vendor_id: Set(vendor_id),
        name: Set(name.to_owned()),
        price_cents: Set(1_999),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_order(
    db: &DatabaseConnection,
    user_id: i32,
    line_items: &[(i32, i32)],
) -> Result<orders::Model, DbErr> {
    let order = orders::ActiveModel {
        user_id: Set(user_id),
        driver_id: Set(None),
        status: Set("delivered".to_owned()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    for (product_id, quantity) in line_items {
        order_items::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(*product_id),
            quantity: Set(*quantity),
            price_cents: Set(1_999),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(order)
}

pub async fn create_payment(
    db: &DatabaseConnection,
    order_id: i32,
    amount_cents: i32,
) -> Result<payments::Model, DbErr> {
    payments::ActiveModel {
        order_id: Set(order_id),
        amount_cents: Set(amount_cents),
        provider_ref: Set(Some("test-gateway-ref".to_owned())),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_cart_item(
    db: &DatabaseConnection,
    user_id: i32,
    product_id: i32,
) -> Result<cart_items::Model, DbErr> {
    cart_items::ActiveModel {
        user_id: Set(user_id),
        product_id: Set(product_id),
        quantity: Set(1),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_review(
    db: &DatabaseConnection,
    user_id: i32,
    product_id: i32,
    rating: i32,
) -> Result<reviews::Model, DbErr> {
    reviews::ActiveModel {
        user_id: Set(user_id),
        product_id: Set(product_id),
        rating: Set(rating),
        body: Set(Some("fixture review".to_owned())),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_notification(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<notifications::Model, DbErr> {
    notifications::ActiveModel {
        user_id: Set(user_id),
        kind: Set("order_update".to_owned()),
        body: Set("your order is on the way".to_owned()),
        is_read: Set(false),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_verification_code(
    db: &DatabaseConnection,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<verification_codes::Model, DbErr> {
    verification_codes::ActiveModel {
        email: Set(email.map(str::to_owned)),
        phone: Set(phone.map(str::to_owned)),
        code: Set("123456".to_owned()),
        expires_at: Set(Utc::now().naive_utc() + Duration::minutes(15)),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn create_chat_room_with_message(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<chat_rooms::Model, DbErr> {
    let room = chat_rooms::ActiveModel {
        created_by: Set(user_id),
        name: Set("order questions".to_owned()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    chat_messages::ActiveModel {
        room_id: Set(room.id),
        sender_id: Set(user_id),
        body: Set("is this still available?".to_owned()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(room)
}

pub async fn create_security_event(
    db: &DatabaseConnection,
    user_id: i32,
    actor_id: Option<i32>,
) -> Result<security_events::Model, DbErr> {
    security_events::ActiveModel {
        user_id: Set(user_id),
        actor_id: Set(actor_id),
        kind: Set("login".to_owned()),
        detail: Set(None),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}
