pub mod expenses;
pub mod users;

pub use expenses::{ExpenseChanges, ExpenseQuery, ExpensesDao};
pub use users::UsersDao;
