#[tokio::main]
async fn main() {
    if let Err(e) = healthrec_lib::run().await {
        tracing::error!("{e}");
        eprintln!("healthrec: {e}");
        std::process::exit(1);
    }
}
