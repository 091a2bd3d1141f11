mod cli;

use clap::Parser;

use cli::args::Args;
use cli::op::{Op, OpContext};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let ctx = OpContext::new(args.config_path);

    match args.command.execute(&ctx).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
