pub mod dialogs;
pub mod history;
pub mod palette;
pub mod tools;
