//! Typed wrappers for the storefront and admin endpoints.
//!
//! The core client passes bodies through untouched; this layer checks the
//! envelope `code` and decodes the payload.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::models::{
    unwrap_envelope, Ack, AdminProfile, CheckoutPayload, CheckoutRequest, ConsultationBooking,
    ConsultationPayload, ContactSubmission, ContactsPayload, DeliveryDiscount,
    DeliveryDiscountsPayload, DeliveryFee, DeliveryFeesPayload, LoginPayload, LoginRequest,
    Notification, NotificationsPayload, Order, OrderStatus, OrdersPayload, Product,
    ProductPayload, ProductQuery, ProductUpload, ProductsPayload,
};
use crate::storage::USER_KEY;

use super::{ApiClient, ApiError, PostOptions};

impl ApiClient {
    async fn get_envelope<T: DeserializeOwned>(
        &self,
        url: &str,
        params: Option<Value>,
    ) -> Result<T, ApiError> {
        let value: Value = self.get(url, params).await?;
        unwrap_envelope(value)
    }

    async fn post_envelope<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let value: Value = self.post(url, body, PostOptions::default()).await?;
        unwrap_envelope(value)
    }

    // ===== Admin session =====

    /// Log in as an admin. The token is stored by the response hook; the
    /// profile goes to the local `user` key.
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<AdminProfile, ApiError> {
        let payload: LoginPayload = self
            .post_envelope("/admin/login", &LoginRequest { email, password })
            .await?;

        let profile = payload.admin.unwrap_or_else(|| AdminProfile {
            id: None,
            email: email.to_string(),
            name: None,
            role: None,
        });

        if let Err(e) = self.store().save(USER_KEY, &profile) {
            warn!(error = %e, "Failed to save admin profile");
        }

        info!(email = %profile.email, "Admin logged in");
        Ok(profile)
    }

    /// Log out on the backend, then clear local credentials whatever the
    /// backend said.
    pub async fn admin_logout(&self) -> Result<(), ApiError> {
        let result: Result<Ack, ApiError> = self.post_envelope("/admin/logout", &json!({})).await;
        if let Err(e) = self.clear_auth() {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        info!("Admin logged out");
        result.map(|_| ())
    }

    /// Profile saved by the last successful login, if any.
    pub fn current_admin(&self) -> Option<AdminProfile> {
        match self.store().load(USER_KEY) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "Failed to read admin profile");
                None
            }
        }
    }

    // ===== Products =====

    pub async fn fetch_products(&self, query: &ProductQuery) -> Result<ProductsPayload, ApiError> {
        self.get_envelope("/fetch-products", query.to_params()).await
    }

    pub async fn fetch_product(&self, id: &str) -> Result<Product, ApiError> {
        let payload: ProductPayload = self
            .get_envelope("/fetch-product", Some(json!({ "id": id })))
            .await?;
        Ok(payload.product)
    }

    pub async fn add_product(&self, upload: &ProductUpload) -> Result<Product, ApiError> {
        let value: Value = self
            .post_form_data("/admin/add-product", upload.to_form_data(None))
            .await?;
        let payload: ProductPayload = unwrap_envelope(value)?;
        Ok(payload.product)
    }

    pub async fn update_product(&self, id: &str, upload: &ProductUpload) -> Result<Product, ApiError> {
        let value: Value = self
            .post_form_data("/admin/update-product", upload.to_form_data(Some(id)))
            .await?;
        let payload: ProductPayload = unwrap_envelope(value)?;
        Ok(payload.product)
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .post_envelope("/admin/delete-product", &json!({ "id": id }))
            .await?;
        Ok(())
    }

    // ===== Orders =====

    pub async fn fetch_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, ApiError> {
        let params = status.map(|s| json!({ "status": s }));
        let payload: OrdersPayload = self.get_envelope("/admin/fetch-orders", params).await?;
        Ok(payload.orders)
    }

    pub async fn change_order_status(&self, id: &str, status: OrderStatus) -> Result<(), ApiError> {
        if status == OrderStatus::Unknown {
            return Err(ApiError::Request("Cannot set an unknown order status".to_string()));
        }
        let _: Ack = self
            .post_envelope(
                "/admin/change-order-status",
                &json!({ "orderId": id, "status": status }),
            )
            .await?;
        info!(order = id, status = %status, "Order status changed");
        Ok(())
    }

    /// Start payment for a priced cart.
    pub async fn initiate_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutPayload, ApiError> {
        if request.items.is_empty() {
            return Err(ApiError::Request("Cart is empty".to_string()));
        }
        self.post_envelope("/initiate-checkout", request).await
    }

    // ===== Consultations =====

    pub async fn book_consultation(
        &self,
        booking: &ConsultationBooking,
    ) -> Result<ConsultationPayload, ApiError> {
        let missing = booking.missing_fields();
        if !missing.is_empty() {
            return Err(ApiError::Request(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        self.post_envelope("/book-consultation", booking).await
    }

    // ===== Delivery fees =====

    pub async fn fetch_delivery_fees(&self) -> Result<Vec<DeliveryFee>, ApiError> {
        let payload: DeliveryFeesPayload = self.get_envelope("/fetch-delivery-fees", None).await?;
        Ok(payload.delivery_fees)
    }

    pub async fn add_delivery_fee(&self, location: &str, fee: f64) -> Result<(), ApiError> {
        let _: Ack = self
            .post_envelope(
                "/admin/add-delivery-fee",
                &json!({ "location": location, "fee": fee }),
            )
            .await?;
        Ok(())
    }

    pub async fn update_delivery_fee(&self, fee: &DeliveryFee) -> Result<(), ApiError> {
        let _: Ack = self.post_envelope("/admin/update-delivery-fee", fee).await?;
        Ok(())
    }

    pub async fn delete_delivery_fee(&self, id: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .post_envelope("/admin/delete-delivery-fee", &json!({ "id": id }))
            .await?;
        Ok(())
    }

    // ===== Delivery discounts =====

    pub async fn fetch_delivery_discounts(&self) -> Result<Vec<DeliveryDiscount>, ApiError> {
        let payload: DeliveryDiscountsPayload =
            self.get_envelope("/fetch-delivery-discounts", None).await?;
        Ok(payload.delivery_discounts)
    }

    pub async fn add_delivery_discount(
        &self,
        min_order_amount: f64,
        percentage: f64,
    ) -> Result<(), ApiError> {
        let _: Ack = self
            .post_envelope(
                "/admin/add-delivery-discount",
                &json!({ "minOrderAmount": min_order_amount, "percentage": percentage }),
            )
            .await?;
        Ok(())
    }

    pub async fn update_delivery_discount(&self, discount: &DeliveryDiscount) -> Result<(), ApiError> {
        let _: Ack = self
            .post_envelope("/admin/update-delivery-discount", discount)
            .await?;
        Ok(())
    }

    pub async fn delete_delivery_discount(&self, id: &str) -> Result<(), ApiError> {
        let _: Ack = self
            .post_envelope("/admin/delete-delivery-discount", &json!({ "id": id }))
            .await?;
        Ok(())
    }

    // ===== Inbox =====

    pub async fn fetch_contacts(&self) -> Result<Vec<ContactSubmission>, ApiError> {
        let payload: ContactsPayload = self.get_envelope("/admin/fetch-contacts", None).await?;
        Ok(payload.contacts)
    }

    pub async fn fetch_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let payload: NotificationsPayload =
            self.get_envelope("/admin/fetch-notifications", None).await?;
        Ok(payload.notifications)
    }
}
