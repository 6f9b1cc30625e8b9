use std::env;
use std::io;
use std::process::ExitCode;
use load_rs::load::{self, LoadError, ThreadSleeper};
use load_rs::logging;

fn main() -> ExitCode {
    if let Err(e) = logging::init() {
        eprintln!("load: {}", e);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let args = env::args_os().skip(1).map(|a| a.to_string_lossy().into_owned());
    match load::run(args, &mut out, &ThreadSleeper) {
        Ok(_) => ExitCode::SUCCESS,
        Err(LoadError::Usage { count }) => {
            log::warn!("rejected {} arguments", count);
            ExitCode::from(1)
        },
        Err(e) => {
            log::error!("{}", e);
            eprintln!("load: {}", e);
            ExitCode::from(1)
        },
    }
}
