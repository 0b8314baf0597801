use std::process::ExitCode;

use clap::Parser;

use aurora::cli::{Cli, Commands, ConfigCommands};
use aurora::config::AppConfig;
use aurora::runtime::modes;
use aurora::system::init_logging;

#[actix_web::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(Commands::Config {
        action: ConfigCommands::Generate { output_path },
    }) = &cli.command
    {
        return generate_config(output_path.as_deref());
    }

    // 配置不可用时直接退出
    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Some(Commands::Migrate) => modes::run_migrate(&config).await,
        _ => modes::run_server(config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn generate_config(output_path: Option<&str>) -> ExitCode {
    let Some(path) = output_path else {
        println!("{}", AppConfig::generate_sample_config());
        return ExitCode::SUCCESS;
    };

    match AppConfig::default().save_to_file(path) {
        Ok(()) => {
            println!("Sample configuration written to {}", path);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.format_colored());
            ExitCode::FAILURE
        }
    }
}
