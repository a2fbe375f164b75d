//! Data passed between the client and the agentscan API.
//!
//! Two wire formats meet here: the conversation transcript (role + content
//! pairs, camelCase JSON) and the cursor-paginated listing payloads for
//! agents, transactions and instances. Both are kept as plain serde structs
//! so the same types serve requests, responses and tests.
pub mod listing;
pub mod message;
