use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let instance_id = Uuid::new_v4();
    std::panic::set_hook(Box::new(move |panic| {
        error!(%instance_id, message = %panic, "panic in company registry");
    }));

    let worker_threads = configs::worker_threads();
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(n) = worker_threads {
        builder.worker_threads(n);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "cannot build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        %instance_id,
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        worker_threads = ?worker_threads,
        "company registry starting"
    );

    // run() returns once the shutdown signal has drained in-flight requests
    match rt.block_on(server::run()) {
        Ok(()) => {
            info!(%instance_id, "company registry stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(%instance_id, error = %e, "company registry failed");
            ExitCode::FAILURE
        }
    }
}
