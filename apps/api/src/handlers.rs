pub mod applications;
pub mod health;
pub mod shares;
