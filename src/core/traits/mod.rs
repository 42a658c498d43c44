pub mod aligner;
pub mod inspector;
pub mod signer;
