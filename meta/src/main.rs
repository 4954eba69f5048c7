fn main() {
    // multiversx-sc-meta-lib resolves `output/` and `wasm/` relative to the
    // meta crate, so run from there regardless of the caller's cwd.
    std::env::set_current_dir(env!("CARGO_MANIFEST_DIR"))
        .expect("chdir to meta crate dir failed");
    multiversx_sc_meta_lib::cli_main::<match_signal_ledger::AbiProvider>();
}
