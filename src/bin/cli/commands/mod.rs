pub mod cards;
pub mod history;
pub mod review;
pub mod settings;
