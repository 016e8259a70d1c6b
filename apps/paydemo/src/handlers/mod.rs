pub mod health;
pub mod pay;
