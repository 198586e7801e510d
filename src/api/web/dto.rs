use serde::{Deserialize, Serialize};

// delivery lead time of each tier is decided by the model layer, this
// enumeration only carries what the client selected on the checkout form
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OrderUrgency {
    Standard,
    Urgent,
    Emergency,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentTerms {
    Immediate,
    Net30,
    Net60,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

// ---------- cart endpoints ----------

// joined catalog columns carried along with a cart mutation, every field is
// optional since the catalog row may lag behind or be removed
#[derive(Deserialize, Serialize)]
pub struct ProductSnapshotDto {
    pub name: Option<String>,
    pub unit_price: Option<u64>,
    pub image_url: Option<String>,
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
    pub category_id: Option<String>,
}

#[derive(Deserialize, Serialize)]
pub struct CartItemAddReqDto {
    pub product_id: String,
    pub quantity: u32,
    pub product: ProductSnapshotDto,
}

#[derive(Deserialize, Serialize)]
pub struct CartItemQtyReqDto {
    pub quantity: u32,
}

#[derive(Deserialize, Serialize)]
pub struct CartItemDto {
    pub id: String,
    pub product_id: String,
    pub quantity: u32,
    pub product_name: Option<String>,
    pub unit_price: Option<u64>,
    pub image_url: Option<String>,
    pub supplier_id: Option<String>,
    pub supplier_name: Option<String>,
    pub category_id: Option<String>,
}

#[derive(Deserialize, Serialize)]
pub struct OrderTotalDto {
    pub subtotal: u64,
    pub delivery_fee: u64,
    pub total: u64,
}

#[derive(Deserialize, Serialize)]
pub struct CartDto {
    pub items: Vec<CartItemDto>,
    pub totals: OrderTotalDto,
}

#[derive(Deserialize, Serialize)]
pub struct QuotaResourceErrorDto {
    pub max_: u32,
    pub given: usize,
}

// ---------- order submission ----------

#[derive(Deserialize, Serialize)]
pub struct OrderSubmitReqDto {
    pub urgency: OrderUrgency,
    pub delivery_address: String,
    pub contact_person: String,
    pub phone: String,
    pub notes: Option<String>,
    pub payment_terms: PaymentTerms,
}

#[derive(Deserialize, Serialize)]
pub struct OrderSummaryDto {
    pub order_id: String,
    pub order_number: String,
    pub supplier_id: String,
    pub supplier_name: String,
    pub total_amount: u64,
    pub shipping_cost: u64,
    pub status: OrderStatus,
    pub expected_delivery: String,
}

#[derive(Deserialize, Serialize)]
pub struct OrderSubmitRespOkDto {
    pub usr_id: u32,
    pub time: u64,
    pub orders: Vec<OrderSummaryDto>,
}

#[derive(Deserialize, Serialize)]
pub enum OrderSubmitNonFieldReason {
    AuthRequire,
    EmptyCart,
}

#[derive(Deserialize, Serialize)]
pub struct OrderCreateErrorDto {
    pub supplier_id: String,
    pub reason: String,
}

// every failure mode of one submission is a distinct section, a client
// seeing `cart_clear` set knows the listed orders WERE placed even though
// the cart rows are still there
#[derive(Deserialize, Serialize, Default)]
pub struct OrderSubmitRespErrorDto {
    pub validation: Option<Vec<String>>,
    pub nonfield: Option<OrderSubmitNonFieldReason>,
    pub create_failures: Option<Vec<OrderCreateErrorDto>>,
    pub cart_clear: Option<String>,
    pub orders_created: Option<Vec<OrderSummaryDto>>,
}

// ---------- order dashboard ----------

#[derive(Deserialize, Serialize)]
pub struct OrderLineDto {
    pub product_id: String,
    pub product_name: String,
    pub unit_price: u64,
    pub total_price: u64,
    pub quantity: u32,
    pub image_url: Option<String>,
}

#[derive(Deserialize, Serialize)]
pub struct OrderDto {
    pub order_id: String,
    pub order_number: String,
    pub supplier_id: String,
    pub supplier_name: String,
    pub lines: Vec<OrderLineDto>,
    pub total_amount: u64,
    pub shipping_cost: u64,
    pub status: OrderStatus,
    pub urgency: OrderUrgency,
    pub delivery_address: String,
    pub contact_person: String,
    pub phone: String,
    pub notes: Option<String>,
    pub payment_terms: PaymentTerms,
    pub expected_delivery: String,
    pub create_time: String,
}

#[derive(Deserialize, Serialize)]
pub struct OrderStatusUpdateReqDto {
    pub status: OrderStatus,
}

#[derive(Deserialize, Serialize)]
pub struct OrderStatusUpdateErrorDto {
    pub current: Option<OrderStatus>,
    pub given: OrderStatus,
}
