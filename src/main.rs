use {
    std::{
        env,
        io::{
            self,
            prelude::*,
        },
        process::exit,
    },
    tracing_subscriber::EnvFilter,
    odate::Error,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match odate::run(env::args(), &mut out).and_then(|()| out.flush().map_err(Error::from)) {
        Ok(()) => {}
        Err(Error::Args(e)) => e.exit(),
        // reader went away, e.g. `odate help | head -1`
        Err(Error::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
        Err(e) => {
            eprintln!("odate: {}", e);
            exit(1)
        }
    }
}
