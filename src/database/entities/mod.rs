pub mod expenses;
pub mod users;

pub use expenses::Entity as Expenses;
pub use expenses::ExpenseCategory;
pub use users::Entity as Users;

// Type aliases
pub type UserRecord = users::Model;
pub type ExpenseRecord = expenses::Model;
