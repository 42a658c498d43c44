pub mod java_runtime;
pub mod keytool_inspector;
pub mod process;
pub mod signapk_signer;
pub mod toolchain;
pub mod zipalign_aligner;
