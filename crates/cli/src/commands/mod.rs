pub mod gateway;
pub mod history;
pub mod interview;
pub mod onboard;
pub mod status;
