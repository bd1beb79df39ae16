use depot_engine::{
    db_types::{CartItem, CheckoutResult, NewOffer, NewUserAccount, Offer, Order, OrderStatusType, Role, UserAccount},
    traits::{
        AccountApiError,
        AccountManagement,
        AuthApiError,
        AuthManagement,
        CheckoutError,
        InventoryApiError,
        InventoryManagement,
        OrderApiError,
        OrderManagement,
        StatusTally,
    },
};
use mockall::mock;

mock! {
    pub Backend {}
    impl AccountManagement for Backend {
        async fn create_account(&self, account: NewUserAccount) -> Result<UserAccount, AccountApiError>;
        async fn fetch_account_by_email(&self, email: &str) -> Result<Option<UserAccount>, AccountApiError>;
        async fn fetch_accounts(&self) -> Result<Vec<UserAccount>, AccountApiError>;
        async fn delete_account_by_email(&self, email: &str) -> Result<bool, AccountApiError>;
        async fn set_role_for_email(&self, email: &str, role: Role) -> Result<Option<UserAccount>, AccountApiError>;
    }
    impl AuthManagement for Backend {
        async fn fetch_account_by_token(&self, token: &str) -> Result<Option<UserAccount>, AuthApiError>;
        async fn set_current_token(&self, account_id: i64, token: &str) -> Result<(), AuthApiError>;
    }
    impl InventoryManagement for Backend {
        async fn fetch_offers(&self) -> Result<Vec<Offer>, InventoryApiError>;
        async fn fetch_offer(&self, offer_id: i64) -> Result<Option<Offer>, InventoryApiError>;
        async fn upsert_offer(&self, offer: NewOffer) -> Result<Offer, InventoryApiError>;
    }
    impl OrderManagement for Backend {
        async fn checkout(&self, cart: &[CartItem]) -> Result<CheckoutResult, CheckoutError>;
        async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderApiError>;
        async fn fetch_orders(&self) -> Result<Vec<Order>, OrderApiError>;
        async fn update_order_status(&self, order_id: i64, status: OrderStatusType) -> Result<Option<Order>, OrderApiError>;
        async fn fetch_status_tallies(&self) -> Result<Vec<StatusTally>, OrderApiError>;
    }
}
