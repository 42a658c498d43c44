pub mod fingerprint;
pub mod inventory;
pub mod key_request;
pub mod key_role;
