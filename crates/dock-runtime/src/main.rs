#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = dock_runtime::run_from_env() {
        eprintln!("dockctl: {error}");
        std::process::exit(error.exit_code());
    }
}
