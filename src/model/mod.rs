mod cart;
mod checkout;
mod order;

pub use cart::{CartItemModel, CartModel, CartStreamEvent, ProductJoinModel};
pub use checkout::{validate_phone, CheckoutMetaModel};
pub use order::{
    OrderLineModel, OrderLinePriceModel, OrderModel, OrderTotalModel, SupplierGroupModel,
};
