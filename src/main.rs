use std::process::ExitCode;

use clap::Parser;

use cbor_json_bridge::config::Config;
use cbor_json_bridge::http::Server;
use cbor_json_bridge::service::{LIBRARY_NAME, LIBRARY_VERSION, Service};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::parse();

    let address = config.address();
    let server = match Server::bind(&address, Service::new(config.service_config())) {
        Ok(server) => server.with_max_body(config.max_request),
        Err(err) => {
            log::error!("failed to bind {address}: {err}");
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "CBOR bridge ({LIBRARY_NAME} {LIBRARY_VERSION}) listening on {address}, map keys: {}, max output: {} bytes",
        config.map_keys,
        config.max_output
    );

    server.run();
    ExitCode::SUCCESS
}
