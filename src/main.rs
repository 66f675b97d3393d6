use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = beaconpost::cli::Cli::parse();
    if let Err(e) = beaconpost::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
