//! Data models for storefront entities.
//!
//! This module contains the structures exchanged with the backend:
//!
//! - `Envelope` helpers: the `{ code, message, ...payload }` wrapper
//! - `Product`, `ProductQuery`, `ProductUpload`: catalogue and admin uploads
//! - `Order`, `OrderStatus`, `Customer`: orders and their lifecycle
//! - `DeliveryFee`, `DeliveryDiscount`: delivery pricing tables
//! - `ConsultationBooking`, `ContactSubmission`, `Notification`
//! - `AdminProfile`: the logged-in admin

pub mod admin;
pub mod checkout;
pub mod consultation;
pub mod contact;
pub mod delivery;
pub mod envelope;
pub mod notification;
pub mod order;
pub mod product;

pub use admin::{AdminProfile, LoginPayload, LoginRequest};
pub use checkout::{CheckoutPayload, CheckoutRequest};
pub use consultation::{ConsultationBooking, ConsultationPayload};
pub use contact::{ContactSubmission, ContactsPayload};
pub use delivery::{
    fee_for_location, DeliveryDiscount, DeliveryDiscountsPayload, DeliveryFee, DeliveryFeesPayload,
};
pub use envelope::{unwrap_envelope, Ack, EnvelopeHead};
pub use notification::{Notification, NotificationsPayload};
pub use order::{Customer, Order, OrderItem, OrderPayload, OrderStatus, OrdersPayload};
pub use product::{ImageUpload, Product, ProductPayload, ProductQuery, ProductUpload, ProductsPayload};
