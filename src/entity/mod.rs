pub mod order_lines;
pub mod orders;
pub mod payments;
pub mod products;
pub mod support_questions;
pub mod users;

pub use order_lines::Entity as OrderLines;
pub use orders::Entity as Orders;
pub use payments::Entity as Payments;
pub use products::Entity as Products;
pub use support_questions::Entity as SupportQuestions;
pub use users::Entity as Users;
