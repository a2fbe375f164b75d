pub mod agents;
pub mod chat;
pub mod instances;
pub mod transactions;
