pub mod brands;
pub mod cart_items;
pub mod categories;
pub mod leagues;
pub mod order_items;
pub mod orders;
pub mod otp_codes;
pub mod product_sizes;
pub mod products;
pub mod settings;
pub mod users;

pub use brands::Entity as Brands;
pub use cart_items::Entity as CartItems;
pub use categories::Entity as Categories;
pub use leagues::Entity as Leagues;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use otp_codes::Entity as OtpCodes;
pub use product_sizes::Entity as ProductSizes;
pub use products::Entity as Products;
pub use settings::Entity as Settings;
pub use users::Entity as Users;
