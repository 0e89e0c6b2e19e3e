fn main() {
    #[cfg(feature = "cli")]
    erlext::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("erlext: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
