use sunflower::HostConfig;
use sunflower_engine::logging::init_logging;

fn main() {
    let config = HostConfig::from_args(std::env::args_os());
    init_logging(config.logging.clone());

    std::process::exit(sunflower::run(&config));
}
