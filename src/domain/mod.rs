mod account;
mod question;
mod result;

pub use account::{LevelInfo, UserAccount, calculate_level};
pub use question::{Difficulty, Question};
pub use result::{ExamResult, Mistake};
