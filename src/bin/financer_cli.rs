use financer::{cli::run_cli, init};

fn main() {
    init();

    if let Err(err) = run_cli() {
        eprintln!("Error: {}", err.user_message());
        std::process::exit(1);
    }
}
