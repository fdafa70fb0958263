mod cli;

use cli::ExitFailure;

fn main() {
    if let Err(e) = cli::run() {
        if let Some(failure) = e.downcast_ref::<ExitFailure>() {
            if let Some(message) = failure.message() {
                eprintln!("j: {message}");
            }
            std::process::exit(1);
        }
        eprintln!("j: {e:#}"); // pretty anyhow chain
        std::process::exit(1);
    }
}
