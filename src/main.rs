#[tokio::main]
async fn main() {
    if let Err(e) = staffdir::run().await {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}
