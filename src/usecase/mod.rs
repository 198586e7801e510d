mod manage_cart;
mod manage_order;
mod place_order;

pub use manage_cart::{
    AddCartUsKsResult, AddCartItemUseCase, DiscardCartUsKsResult, DiscardCartUseCase,
    ModifyCartUsKsResult, ModifyCartItemUseCase, RemoveCartUsKsResult, RemoveCartItemUseCase,
    RetrieveCartUsKsResult, RetrieveCartUseCase,
};
pub use manage_order::{
    DeleteOrderUsKsResult, DeleteOrderUseCase, ListOwnOrdersUseCase, UpdateOrderStatusUsKsResult,
    UpdateOrderStatusUseCase,
};
pub use place_order::{PlaceOrderUsKsErr, PlaceOrderUseCase};
