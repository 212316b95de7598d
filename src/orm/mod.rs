pub mod cart_items;
pub mod chat_messages;
pub mod chat_rooms;
pub mod drivers;
pub mod notifications;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod products;
pub mod reviews;
pub mod security_events;
pub mod users;
pub mod vendors;
pub mod verification_codes;
