use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use fatflash::config::{AppConfig, CONFIG_FILE};
use fatflash::flash::{self, FlashOptions, FlashOutcome, SystemRunner};
use fatflash::serial::{list, SystemPorts};

#[derive(Parser)]
#[command(name = "fatflash")]
#[command(about = "Flash a FAT filesystem image to an ESP32 over serial", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick a serial port and write the image with esptool (default)
    Flash(FlashArgs),

    /// List available serial ports
    List,

    /// Generate configuration file (.fatflash.toml) in current directory
    Genconfig {
        /// Force overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Default)]
struct FlashArgs {
    /// Serial port name (e.g., COM3 or /dev/ttyUSB0); prompts when omitted
    #[arg(short, long, value_name = "PORT")]
    port: Option<String>,

    /// Filesystem image to write
    #[arg(short, long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Interpreter used to run esptool
    #[arg(long, value_name = "BIN")]
    interpreter: Option<String>,

    /// Print the esptool command without running it
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<ExitCode> {
    // Initialize logger, default info level, display file line number and time
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            let level_style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "[{} {level_style}{}{level_style:#} {}:{}] {level_style}{}{level_style:#}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Flash(FlashArgs::default())) {
        Commands::Flash(args) => {
            let app_config = AppConfig::load_optional(CONFIG_FILE);
            let template = app_config
                .and_then(|c| c.flash)
                .unwrap_or_default()
                .merge_cli(args.interpreter, args.image)
                .into_template();
            let options = FlashOptions {
                port: args.port,
                dry_run: args.dry_run,
            };

            let outcome = flash::run(
                SystemPorts,
                &mut io::stdin().lock(),
                &mut io::stdout(),
                &mut SystemRunner,
                &template,
                &options,
            )?;
            if matches!(outcome, FlashOutcome::Exited(_)) && outcome.success() {
                info!("Flashing completed");
            }
            Ok(outcome.exit_code())
        }

        Commands::List => {
            list::run(SystemPorts, &mut io::stdout())?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Genconfig { force } => {
            AppConfig::generate_config_file(CONFIG_FILE, force)?;
            info!("Run `fatflash` to flash with these settings");
            Ok(ExitCode::SUCCESS)
        }
    }
}
